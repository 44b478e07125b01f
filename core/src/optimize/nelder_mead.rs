use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use super::{Minimizer, MinimizerOutcome, Objective};

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Derivative free downhill simplex minimization
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NelderMead {
    pub max_iterations: usize,
    /// spread of the simplex values below which it is considered collapsed
    pub tolerance: f64,
    /// largest vertex distance from the best vertex below which it is considered collapsed
    pub parameter_tolerance: f64,
    /// edge length of the initial simplex
    pub initial_step: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-10,
            parameter_tolerance: 1e-8,
            initial_step: 0.5,
        }
    }
}

impl NelderMead {
    fn collapsed(&self, simplex: &[(DVector<f64>, f64)]) -> bool {
        let (best, best_value) = &simplex[0];
        let worst_value = simplex[simplex.len() - 1].1;
        let spread = simplex[1..]
            .iter()
            .map(|(vertex, _)| (vertex - best).amax())
            .fold(0.0, f64::max);

        worst_value - best_value < self.tolerance && spread < self.parameter_tolerance
    }
}

impl Minimizer for NelderMead {
    fn minimize(&self, objective: &mut dyn Objective, initial: DVector<f64>) -> MinimizerOutcome {
        let n = initial.len();
        let mut evaluations = 0;
        let mut evaluate = |point: DVector<f64>| {
            evaluations += 1;
            let value = objective.value(&point);
            (point, value)
        };

        let mut simplex = Vec::with_capacity(n + 1);
        simplex.push(evaluate(initial.clone()));
        for k in 0..n {
            let mut vertex = initial.clone();
            vertex[k] += self.initial_step;
            simplex.push(evaluate(vertex));
        }

        let mut iterations = 0;
        let mut converged = false;
        while iterations < self.max_iterations {
            simplex.sort_by(|(_, a), (_, b)| a.total_cmp(b));
            if self.collapsed(&simplex) {
                converged = true;
                break;
            }
            iterations += 1;

            let centroid = simplex[..n]
                .iter()
                .fold(DVector::zeros(n), |sum, (vertex, _)| sum + vertex)
                / n as f64;
            let (worst, worst_value) = simplex[n].clone();
            let second_worst_value = simplex[n - 1].1;
            let best_value = simplex[0].1;

            let (reflected, reflected_value) =
                evaluate(&centroid + REFLECTION * (&centroid - &worst));

            if reflected_value < best_value {
                let expanded = evaluate(&centroid + EXPANSION * (&reflected - &centroid));
                simplex[n] = if expanded.1 < reflected_value {
                    expanded
                } else {
                    (reflected, reflected_value)
                };
            } else if reflected_value < second_worst_value {
                simplex[n] = (reflected, reflected_value);
            } else {
                // contract towards the better of the reflected and the worst point
                let (contracted, accepted) = if reflected_value < worst_value {
                    let contracted = evaluate(&centroid + CONTRACTION * (&reflected - &centroid));
                    let accepted = contracted.1 <= reflected_value;
                    (contracted, accepted)
                } else {
                    let contracted = evaluate(&centroid + CONTRACTION * (&worst - &centroid));
                    let accepted = contracted.1 < worst_value;
                    (contracted, accepted)
                };

                if accepted {
                    simplex[n] = contracted;
                } else {
                    let best = simplex[0].0.clone();
                    for vertex in simplex.iter_mut().skip(1) {
                        let shrunk = &best + SHRINK * (&vertex.0 - &best);
                        *vertex = evaluate(shrunk);
                    }
                }
            }
        }

        let (parameters, value) = simplex
            .into_iter()
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .unwrap_or((initial, f64::INFINITY));

        MinimizerOutcome {
            parameters,
            value,
            iterations,
            evaluations,
            gradient_evaluations: 0,
            converged,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::dvector;

    use crate::optimize::{tests::bowl, FnObjective, Minimizer};

    use super::NelderMead;

    #[test]
    fn minimizes_a_quadratic() {
        let outcome = NelderMead::default().minimize(&mut FnObjective(bowl), dvector![0.0, 0.0]);

        assert!(outcome.converged);
        assert_relative_eq!(outcome.parameters[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(outcome.parameters[1], -0.5, epsilon = 1e-6);
        assert_eq!(outcome.gradient_evaluations, 0);
    }

    #[test]
    fn respects_the_iteration_budget() {
        let nelder_mead = NelderMead {
            max_iterations: 5,
            ..Default::default()
        };
        let outcome = nelder_mead.minimize(&mut FnObjective(bowl), dvector![0.0, 0.0]);

        assert!(!outcome.converged);
        assert_eq!(outcome.iterations, 5);
        assert!(outcome.value < bowl(&dvector![0.0, 0.0]));
    }
}
