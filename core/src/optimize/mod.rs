//! Classical minimizers driving the variational loop
mod bfgs;
mod nelder_mead;
mod spsa;

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

pub use bfgs::Bfgs;
pub use nelder_mead::NelderMead;
pub use spsa::Spsa;

/// Step of the central difference gradient used when an objective has no analytic one
const FINITE_DIFFERENCE_STEP: f64 = 1e-6;

/// A scalar function of a real parameter vector
pub trait Objective {
    fn value(&mut self, parameters: &DVector<f64>) -> f64;

    fn gradient(&mut self, parameters: &DVector<f64>) -> DVector<f64> {
        let mut shifted = parameters.clone();
        DVector::from_fn(parameters.len(), |k, _| {
            let step = FINITE_DIFFERENCE_STEP * parameters[k].abs().max(1.0);
            shifted[k] = parameters[k] + step;
            let forward = self.value(&shifted);
            shifted[k] = parameters[k] - step;
            let backward = self.value(&shifted);
            shifted[k] = parameters[k];
            (forward - backward) / (2.0 * step)
        })
    }
}

/// Wraps a closure as an [`Objective`] with a finite difference gradient
pub struct FnObjective<F>(pub F);

impl<F: FnMut(&DVector<f64>) -> f64> Objective for FnObjective<F> {
    fn value(&mut self, parameters: &DVector<f64>) -> f64 {
        (self.0)(parameters)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MinimizerOutcome {
    /// the best point found
    pub parameters: DVector<f64>,
    /// the objective value at `parameters`
    pub value: f64,
    pub iterations: usize,
    /// calls to [`Objective::value`] made by the minimizer itself
    pub evaluations: usize,
    /// calls to [`Objective::gradient`]
    pub gradient_evaluations: usize,
    /// whether a tolerance was met before the iteration budget ran out
    pub converged: bool,
}

pub trait Minimizer {
    fn minimize(&self, objective: &mut dyn Objective, initial: DVector<f64>) -> MinimizerOutcome;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptimizerConfig {
    Bfgs(Bfgs),
    NelderMead(NelderMead),
    Spsa(Spsa),
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        OptimizerConfig::Bfgs(Bfgs::default())
    }
}

impl OptimizerConfig {
    pub fn max_iterations(&self) -> usize {
        match self {
            OptimizerConfig::Bfgs(bfgs) => bfgs.max_iterations,
            OptimizerConfig::NelderMead(nelder_mead) => nelder_mead.max_iterations,
            OptimizerConfig::Spsa(spsa) => spsa.max_iterations,
        }
    }

    pub fn set_max_iterations(&mut self, max_iterations: usize) {
        match self {
            OptimizerConfig::Bfgs(bfgs) => bfgs.max_iterations = max_iterations,
            OptimizerConfig::NelderMead(nelder_mead) => nelder_mead.max_iterations = max_iterations,
            OptimizerConfig::Spsa(spsa) => spsa.max_iterations = max_iterations,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OptimizerConfig::Bfgs(_) => "bfgs",
            OptimizerConfig::NelderMead(_) => "nelder_mead",
            OptimizerConfig::Spsa(_) => "spsa",
        }
    }
}

impl Minimizer for OptimizerConfig {
    fn minimize(&self, objective: &mut dyn Objective, initial: DVector<f64>) -> MinimizerOutcome {
        match self {
            OptimizerConfig::Bfgs(bfgs) => bfgs.minimize(objective, initial),
            OptimizerConfig::NelderMead(nelder_mead) => nelder_mead.minimize(objective, initial),
            OptimizerConfig::Spsa(spsa) => spsa.minimize(objective, initial),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use approx::assert_relative_eq;
    use nalgebra::{dvector, DVector};

    use super::{Bfgs, FnObjective, Minimizer, NelderMead, Objective, OptimizerConfig, Spsa};

    /// `(x - 1)² + 2 (y + 0.5)²`, minimal at `(1, -0.5)`
    pub(crate) fn bowl(parameters: &DVector<f64>) -> f64 {
        (parameters[0] - 1.0).powi(2) + 2.0 * (parameters[1] + 0.5).powi(2)
    }

    #[test]
    fn finite_difference_gradient() {
        let mut objective = FnObjective(bowl);
        let gradient = objective.gradient(&dvector![0.0, 0.0]);
        assert_relative_eq!(gradient[0], -2.0, epsilon = 1e-6);
        assert_relative_eq!(gradient[1], 2.0, epsilon = 1e-6);
    }

    #[test]
    fn optimizer_config_serde() {
        let config: OptimizerConfig =
            serde_json::from_str(r#"{ "kind": "spsa", "max_iterations": 40 }"#).unwrap();
        assert_eq!(config.max_iterations(), 40);
        assert_eq!(config.name(), "spsa");

        let mut config = OptimizerConfig::default();
        assert_eq!(config.max_iterations(), 100);
        config.set_max_iterations(7);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""kind":"bfgs""#));
        assert!(json.contains(r#""max_iterations":7"#));
    }

    #[test]
    fn empty_parameter_vectors_are_handled() {
        let minimizers = [
            OptimizerConfig::Bfgs(Bfgs::default()),
            OptimizerConfig::NelderMead(NelderMead::default()),
            OptimizerConfig::Spsa(Spsa {
                max_iterations: 5,
                ..Default::default()
            }),
        ];
        for minimizer in minimizers {
            let mut objective = FnObjective(|_: &DVector<f64>| 3.0);
            let outcome = minimizer.minimize(&mut objective, DVector::zeros(0));

            assert_eq!(outcome.parameters.len(), 0, "{}", minimizer.name());
            assert_eq!(outcome.value, 3.0);
        }
    }
}
