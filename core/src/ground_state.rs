use std::borrow::Cow;

use nalgebra::DVector;
use serde::Serialize;

use crate::{
    basis::BasisSet,
    circuit::MAX_QUBITS,
    config::{BasisSetName, EstimatorConfig, MolecularGeometry},
    error::{ConfigurationError, EstimatorError, NonConvergenceWarning},
    exact,
    expectation::StatevectorExpectation,
    operators::SparsePauliOp,
    optimize::OptimizerConfig,
    problem::ElectronicStructureProblem,
    vqe::Vqe,
};

/// A multiplier in `(0, 1]` applied to the qubit hamiltonian
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Serialize)]
pub struct ScalingFactor(f64);

impl ScalingFactor {
    pub fn new(scaling: f64) -> Result<Self, ConfigurationError> {
        // NaN fails both comparisons
        if scaling > 0.0 && scaling <= 1.0 {
            Ok(Self(scaling))
        } else {
            Err(ConfigurationError::InvalidScaling(scaling))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for ScalingFactor {
    type Error = ConfigurationError;

    fn try_from(scaling: f64) -> Result<Self, Self::Error> {
        Self::new(scaling)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct EstimationResult {
    /// the estimated ground state energy in hartree, `electronic_energy + nuclear_repulsion * scaling`
    pub energy: f64,
    /// the minimized expectation value of the scaled qubit hamiltonian, `scaling` times the
    /// unscaled minimum
    pub electronic_energy: f64,
    /// unscaled
    pub nuclear_repulsion: f64,
    pub scaling: f64,
    /// unscaled total hartree fock energy of the reference determinant
    pub hartree_fock_energy: f64,
    pub num_qubits: usize,
    pub iterations: usize,
    /// number of circuit executions
    pub evaluations: usize,
    pub optimal_parameters: DVector<f64>,
    pub warning: Option<NonConvergenceWarning>,
}

impl EstimationResult {
    pub fn converged(&self) -> bool {
        self.warning.is_none()
    }
}

/// Estimates the ground state energy of two hydrogen atoms with a variational quantum
/// eigensolver, simulated exactly on a statevector.
///
/// The estimator keeps no state between calls, so it can be shared between threads.
#[derive(Debug, Clone)]
pub struct GroundStateEstimator {
    config: EstimatorConfig,
    basis_set: BasisSet,
}

impl GroundStateEstimator {
    pub fn new(config: EstimatorConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let basis_set = resolve_basis(&config.basis)?;
        Ok(Self { config, basis_set })
    }

    /// Replaces the minimizer, keeping everything else
    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Result<Self, ConfigurationError> {
        self.config.optimizer = optimizer;
        self.config.validate()?;
        Ok(self)
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// A hydrogen pair at `separation`, in the configured unit and basis
    pub fn geometry(&self, separation: f64) -> Result<MolecularGeometry, ConfigurationError> {
        MolecularGeometry::hydrogen_pair(separation, self.config.unit, self.config.basis.clone())
    }

    pub fn estimate(
        &self,
        separation: f64,
        scaling: f64,
    ) -> Result<EstimationResult, EstimatorError> {
        let scaling = ScalingFactor::new(scaling)?;
        let geometry = self.geometry(separation)?;
        self.estimate_geometry(&geometry, scaling)
    }

    pub fn estimate_energy(&self, separation: f64, scaling: f64) -> Result<f64, EstimatorError> {
        Ok(self.estimate(separation, scaling)?.energy)
    }

    /// Minimizes the unscaled operator and scales the optimum, `s·H` and `H` share their
    /// minimizing parameters.
    pub fn estimate_geometry(
        &self,
        geometry: &MolecularGeometry,
        scaling: ScalingFactor,
    ) -> Result<EstimationResult, EstimatorError> {
        let (problem, hamiltonian) = self.electronic_operator(geometry)?;
        let num_qubits = hamiltonian.num_qubits();

        let ansatz = self.config.ansatz.two_local(num_qubits);
        let initial_points = self
            .config
            .initial_point
            .resolve_many(ansatz.num_parameters(), self.config.starting_points)?;
        log::debug!(
            "ansatz: {} qubits, {} parameters, {} gates, {} starting points",
            num_qubits,
            ansatz.num_parameters(),
            ansatz.gates().len(),
            initial_points.len()
        );

        let vqe = Vqe::new(StatevectorExpectation, &ansatz, &self.config.optimizer);
        let result = vqe.compute_minimum_eigenvalue_from(&hamiltonian, initial_points)?;

        let electronic_energy = result.optimal_value * scaling.get();
        let energy = electronic_energy + problem.nuclear_repulsion() * scaling.get();
        let warning = (!result.converged).then_some(NonConvergenceWarning {
            iterations: result.iterations,
            evaluations: result.circuit_evaluations,
        });
        if let Some(warning) = &warning {
            log::warn!("{}: {warning}", self.config.optimizer.name());
        }
        log::info!(
            "separation {} {:?}, scaling {}: energy {:.8} (hartree fock {:.8}) after {} iterations",
            geometry.separation(),
            geometry.unit(),
            scaling.get(),
            energy,
            problem.hartree_fock_energy(),
            result.iterations
        );

        Ok(EstimationResult {
            energy,
            electronic_energy,
            nuclear_repulsion: problem.nuclear_repulsion(),
            scaling: scaling.get(),
            hartree_fock_energy: problem.hartree_fock_energy(),
            num_qubits,
            iterations: result.iterations,
            evaluations: result.circuit_evaluations,
            optimal_parameters: result.optimal_parameters,
            warning,
        })
    }

    /// The scaled qubit hamiltonian of `geometry`, without nuclear repulsion
    pub fn qubit_hamiltonian(
        &self,
        geometry: &MolecularGeometry,
        scaling: ScalingFactor,
    ) -> Result<(ElectronicStructureProblem, SparsePauliOp), EstimatorError> {
        let (problem, hamiltonian) = self.electronic_operator(geometry)?;
        Ok((problem, hamiltonian * scaling.get()))
    }

    fn electronic_operator(
        &self,
        geometry: &MolecularGeometry,
    ) -> Result<(ElectronicStructureProblem, SparsePauliOp), EstimatorError> {
        let basis_set = if geometry.basis() == &self.config.basis {
            Cow::Borrowed(&self.basis_set)
        } else {
            Cow::Owned(resolve_basis(geometry.basis())?)
        };

        let molecule = geometry.molecule();
        let num_qubits = 2 * basis_set.basis_for(molecule.atoms())?.len();
        if num_qubits > MAX_QUBITS {
            return Err(ConfigurationError::TooManyQubits {
                qubits: num_qubits,
                max: MAX_QUBITS,
            }
            .into());
        }

        let problem = ElectronicStructureProblem::from_molecule(
            &molecule,
            &basis_set,
            &self.config.hartree_fock,
        )?;
        let hamiltonian = self.config.mapper.map(&problem.second_q_op());
        log::debug!(
            "{:?} hamiltonian: {} pauli terms on {} qubits",
            self.config.mapper,
            hamiltonian.len(),
            hamiltonian.num_qubits()
        );

        Ok((problem, hamiltonian))
    }

    /// The exact lowest energy the estimate approximates, from full diagonalization
    pub fn exact_energy(&self, separation: f64, scaling: f64) -> Result<f64, EstimatorError> {
        let scaling = ScalingFactor::new(scaling)?;
        let geometry = self.geometry(separation)?;
        let (problem, hamiltonian) = self.qubit_hamiltonian(&geometry, scaling)?;
        Ok(exact::minimum_eigenvalue(&hamiltonian)? + problem.nuclear_repulsion() * scaling.get())
    }
}

impl Default for GroundStateEstimator {
    fn default() -> Self {
        Self {
            config: EstimatorConfig::default(),
            basis_set: BasisSet::sto3g(),
        }
    }
}

fn resolve_basis(name: &BasisSetName) -> Result<BasisSet, ConfigurationError> {
    match name {
        BasisSetName::Sto3g => Ok(BasisSet::sto3g()),
        BasisSetName::File(path) => BasisSet::load(path),
    }
}
