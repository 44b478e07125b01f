use std::fmt;

use anyhow::bail;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;
use vqe_core::EstimationResult;

/// A nuclear mass of 2000 electron masses, roughly that of a proton
const REFERENCE_MASS: f64 = 2000.0;

/// What the CLI prints about one estimate. Nothing in here feeds back into the estimator.
#[derive(Serialize, Debug)]
pub struct Report {
    separation: f64,
    #[serde(flatten)]
    result: EstimationResult,
    exact_energy: Option<f64>,
    relative_mass: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fluctuations: Vec<f64>,
}

impl Report {
    pub fn new(separation: f64, result: EstimationResult, exact_energy: Option<f64>) -> Self {
        Self {
            separation,
            relative_mass: result.scaling / REFERENCE_MASS,
            result,
            exact_energy,
            fluctuations: Vec::new(),
        }
    }

    /// `samples` draws of `energy + N(0, noise²)`, for illustration only
    pub fn with_fluctuations(
        mut self,
        samples: usize,
        noise: f64,
        rng: &mut impl Rng,
    ) -> anyhow::Result<Self> {
        if !(noise >= 0.0 && noise.is_finite()) {
            bail!("noise must be a finite, non-negative standard deviation, got {noise}");
        }
        let normal = Normal::new(0.0, noise)?;
        self.fluctuations = (0..samples)
            .map(|_| self.result.energy + normal.sample(rng))
            .collect();
        Ok(self)
    }

    pub fn scan_line(&self) -> String {
        let mut line = format!(
            "{:8.4} {:14.8} {:14.8}",
            self.separation, self.result.energy, self.result.hartree_fock_energy
        );
        if let Some(exact) = self.exact_energy {
            line += &format!(" {exact:14.8}");
        }
        if !self.result.converged() {
            line += " (not converged)";
        }
        line
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = &self.result;
        writeln!(f, "separation: {}", self.separation)?;
        writeln!(f, "scaling: {}", result.scaling)?;
        writeln!(f, "estimated energy: {:.8}", result.energy)?;
        writeln!(f, "electronic energy: {:.8}", result.electronic_energy)?;
        writeln!(f, "nuclear repulsion energy: {:.8}", result.nuclear_repulsion)?;
        writeln!(f, "hartree fock energy: {:.8}", result.hartree_fock_energy)?;
        if let Some(exact) = self.exact_energy {
            writeln!(f, "exact energy: {exact:.8} (error {:.2e})", result.energy - exact)?;
        }
        writeln!(
            f,
            "{} qubits, {} iterations, {} circuit evaluations",
            result.num_qubits, result.iterations, result.evaluations
        )?;
        if let Some(warning) = &result.warning {
            writeln!(f, "warning: {warning}")?;
        }
        writeln!(f, "relative mass: {:e}", self.relative_mass)?;
        if !self.fluctuations.is_empty() {
            writeln!(f, "fluctuations: {:.5?}", self.fluctuations)?;
        }
        Ok(())
    }
}
