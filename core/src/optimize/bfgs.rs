use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use super::{Minimizer, MinimizerOutcome, Objective};

/// sufficient decrease constant of the Armijo condition
const ARMIJO: f64 = 1e-4;
/// the line search gives up on steps shorter than this
const MIN_STEP: f64 = 1e-10;
/// the inverse hessian is only updated if `s·y` exceeds this
const CURVATURE_THRESHOLD: f64 = 1e-12;

/// Quasi-Newton minimization with a backtracking line search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bfgs {
    pub max_iterations: usize,
    /// stop once an iteration improves the value by less than this, relative to the value
    pub tolerance: f64,
    /// stop once the gradient norm drops below this
    pub gradient_tolerance: f64,
}

impl Default for Bfgs {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-10,
            gradient_tolerance: 1e-6,
        }
    }
}

impl Minimizer for Bfgs {
    fn minimize(&self, objective: &mut dyn Objective, initial: DVector<f64>) -> MinimizerOutcome {
        let n = initial.len();
        let mut parameters = initial;
        let mut value = objective.value(&parameters);
        let mut gradient = objective.gradient(&parameters);
        let mut evaluations = 1;
        let mut gradient_evaluations = 1;

        let mut inverse_hessian = DMatrix::<f64>::identity(n, n);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            if gradient.norm() < self.gradient_tolerance {
                converged = true;
                break;
            }

            let mut direction = -(&inverse_hessian * &gradient);
            let mut slope = direction.dot(&gradient);
            if slope >= 0.0 {
                // not a descent direction anymore, restart from steepest descent
                inverse_hessian = DMatrix::identity(n, n);
                direction = -&gradient;
                slope = -gradient.norm_squared();
            }

            let mut step = 1.0;
            let (candidate, candidate_value) = loop {
                let candidate = &parameters + step * &direction;
                let candidate_value = objective.value(&candidate);
                evaluations += 1;
                if candidate_value <= value + ARMIJO * step * slope || step < MIN_STEP {
                    break (candidate, candidate_value);
                }
                step *= 0.5;
            };

            if candidate_value > value {
                // no tolerance was met, so this is reported as not converged
                log::debug!(
                    "bfgs line search failed in iteration {iterations}, |g| {:.3e}",
                    gradient.norm()
                );
                break;
            }

            let candidate_gradient = objective.gradient(&candidate);
            gradient_evaluations += 1;
            iterations += 1;

            let s = &candidate - &parameters;
            let y = &candidate_gradient - &gradient;
            let sy = s.dot(&y);
            if sy > CURVATURE_THRESHOLD {
                let rho = sy.recip();
                let hy = &inverse_hessian * &y;
                let yhy = y.dot(&hy);
                inverse_hessian -= rho * (&hy * s.transpose() + &s * hy.transpose());
                inverse_hessian += (rho * rho * yhy + rho) * (&s * s.transpose());
            }

            let improvement = value - candidate_value;
            parameters = candidate;
            value = candidate_value;
            gradient = candidate_gradient;
            log::trace!(
                "bfgs iteration {iterations}: value {value:.12}, |g| {:.3e}",
                gradient.norm()
            );

            if improvement.abs() < self.tolerance * value.abs().max(1.0) {
                converged = true;
                break;
            }
        }

        MinimizerOutcome {
            parameters,
            value,
            iterations,
            evaluations,
            gradient_evaluations,
            converged,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::{dvector, DVector};

    use crate::optimize::{tests::bowl, FnObjective, Minimizer, Objective};

    use super::Bfgs;

    #[test]
    fn minimizes_a_quadratic() {
        let outcome = Bfgs::default().minimize(&mut FnObjective(bowl), dvector![0.0, 0.0]);

        assert!(outcome.converged);
        assert_relative_eq!(outcome.parameters[0], 1.0, epsilon = 1e-5);
        assert_relative_eq!(outcome.parameters[1], -0.5, epsilon = 1e-5);
        assert_relative_eq!(outcome.value, 0.0, epsilon = 1e-9);
        assert!(outcome.iterations < 10);
    }

    #[test]
    fn minimizes_rosenbrock() {
        let rosenbrock = |p: &DVector<f64>| (1.0 - p[0]).powi(2) + 100.0 * (p[1] - p[0] * p[0]).powi(2);
        let bfgs = Bfgs {
            max_iterations: 500,
            ..Default::default()
        };
        let outcome = bfgs.minimize(&mut FnObjective(rosenbrock), dvector![-1.2, 1.0]);

        assert!(outcome.converged);
        assert_relative_eq!(outcome.parameters[0], 1.0, epsilon = 1e-3);
        assert_relative_eq!(outcome.parameters[1], 1.0, epsilon = 1e-3);
    }

    #[test]
    fn exhausted_budget_is_reported() {
        let rosenbrock = |p: &DVector<f64>| (1.0 - p[0]).powi(2) + 100.0 * (p[1] - p[0] * p[0]).powi(2);
        let bfgs = Bfgs {
            max_iterations: 3,
            ..Default::default()
        };
        let outcome = bfgs.minimize(&mut FnObjective(rosenbrock), dvector![-1.2, 1.0]);

        assert!(!outcome.converged);
        assert_eq!(outcome.iterations, 3);
        assert!(outcome.value < 24.2);
    }

    /// `x²` with a gradient of the wrong sign, so every search direction goes uphill
    struct Misleading;

    impl Objective for Misleading {
        fn value(&mut self, parameters: &DVector<f64>) -> f64 {
            parameters[0] * parameters[0]
        }

        fn gradient(&mut self, parameters: &DVector<f64>) -> DVector<f64> {
            dvector![-2.0 * parameters[0]]
        }
    }

    #[test]
    fn failed_line_search_is_not_convergence() {
        let outcome = Bfgs::default().minimize(&mut Misleading, dvector![1.0]);

        assert!(!outcome.converged);
        assert_eq!(outcome.iterations, 0);
        assert_eq!(outcome.parameters, dvector![1.0]);
        assert_relative_eq!(outcome.value, 1.0);
    }
}
