use nalgebra::DVector;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{Minimizer, MinimizerOutcome, Objective};

/// Simultaneous perturbation stochastic approximation. Every iteration estimates the
/// gradient from two evaluations, independent of the number of parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spsa {
    pub max_iterations: usize,
    /// `a` in the step size `a / (k + 1 + A)^α`
    pub learning_rate: f64,
    /// `c` in the perturbation size `c / (k + 1)^γ`
    pub perturbation: f64,
    /// `A`
    pub stability: f64,
    /// `α`
    pub learning_rate_decay: f64,
    /// `γ`
    pub perturbation_decay: f64,
    /// seeds the random perturbation directions
    pub seed: u64,
}

impl Default for Spsa {
    fn default() -> Self {
        Self {
            max_iterations: 300,
            learning_rate: 0.2,
            perturbation: 0.1,
            stability: 0.0,
            learning_rate_decay: 0.602,
            perturbation_decay: 0.101,
            seed: 42,
        }
    }
}

impl Minimizer for Spsa {
    fn minimize(&self, objective: &mut dyn Objective, initial: DVector<f64>) -> MinimizerOutcome {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut parameters = initial;
        let mut best_value = objective.value(&parameters);
        let mut best = parameters.clone();
        let mut evaluations = 1;

        for k in 0..self.max_iterations {
            let step = self.learning_rate
                / (k as f64 + 1.0 + self.stability).powf(self.learning_rate_decay);
            let perturbation = self.perturbation / (k as f64 + 1.0).powf(self.perturbation_decay);
            let delta = DVector::from_fn(parameters.len(), |_, _| {
                if rng.gen_bool(0.5) {
                    1.0
                } else {
                    -1.0
                }
            });

            let forward = objective.value(&(&parameters + perturbation * &delta));
            let backward = objective.value(&(&parameters - perturbation * &delta));
            let difference = (forward - backward) / (2.0 * perturbation);
            // Δ has ±1 entries, so dividing by it equals multiplying by it
            parameters -= step * difference * &delta;

            let value = objective.value(&parameters);
            evaluations += 3;
            if value < best_value {
                best_value = value;
                best.copy_from(&parameters);
            }
        }

        MinimizerOutcome {
            parameters: best,
            value: best_value,
            iterations: self.max_iterations,
            evaluations,
            gradient_evaluations: 0,
            // a fixed gain schedule always runs to the end of its budget
            converged: false,
        }
    }
}
