use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::DVector;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    circuit::ParameterizedCircuit,
    error::{ComputationError, ConfigurationError, EstimatorError},
    expectation::ExpectationEvaluator,
    operators::SparsePauliOp,
    optimize::{Minimizer, Objective},
};

/// Where the minimizer starts
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialPoint {
    /// uniformly distributed in `[-π, π)`, drawn from a seeded generator
    Uniform { seed: u64 },
    Fixed(Vec<f64>),
}

impl Default for InitialPoint {
    fn default() -> Self {
        InitialPoint::Uniform { seed: 42 }
    }
}

impl InitialPoint {
    pub fn resolve(&self, num_parameters: usize) -> Result<DVector<f64>, ConfigurationError> {
        match self {
            InitialPoint::Uniform { seed } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                Ok(DVector::from_fn(num_parameters, |_, _| rng.gen_range(-PI..PI)))
            }
            InitialPoint::Fixed(values) if values.len() == num_parameters => {
                Ok(DVector::from_column_slice(values))
            }
            InitialPoint::Fixed(values) => Err(ConfigurationError::InitialPointLength {
                given: values.len(),
                expected: num_parameters,
            }),
        }
    }

    /// Up to `count` starting points. Uniform points are drawn one after another from the same
    /// generator, so the first one equals [`InitialPoint::resolve`]. A fixed point is returned
    /// once.
    pub fn resolve_many(
        &self,
        num_parameters: usize,
        count: usize,
    ) -> Result<Vec<DVector<f64>>, ConfigurationError> {
        match self {
            InitialPoint::Uniform { seed } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                Ok((0..count)
                    .map(|_| DVector::from_fn(num_parameters, |_, _| rng.gen_range(-PI..PI)))
                    .collect())
            }
            InitialPoint::Fixed(_) => Ok(vec![self.resolve(num_parameters)?]),
        }
    }
}

/// The energy of the ansatz state, with exact parameter shift gradients
struct EnergyObjective<'a, E> {
    evaluator: &'a E,
    ansatz: &'a ParameterizedCircuit,
    hamiltonian: &'a SparsePauliOp,
    circuit_evaluations: usize,
}

impl<E: ExpectationEvaluator> Objective for EnergyObjective<'_, E> {
    fn value(&mut self, parameters: &DVector<f64>) -> f64 {
        self.circuit_evaluations += 1;
        self.evaluator
            .expectation(self.ansatz, parameters, self.hamiltonian)
    }

    fn gradient(&mut self, parameters: &DVector<f64>) -> DVector<f64> {
        let mut shifted = parameters.clone();
        DVector::from_fn(parameters.len(), |k, _| {
            shifted[k] = parameters[k] + FRAC_PI_2;
            let forward = self.value(&shifted);
            shifted[k] = parameters[k] - FRAC_PI_2;
            let backward = self.value(&shifted);
            shifted[k] = parameters[k];
            0.5 * (forward - backward)
        })
    }
}

#[derive(Clone, Debug)]
pub struct VqeResult {
    /// the smallest expectation value found
    pub optimal_value: f64,
    pub optimal_parameters: DVector<f64>,
    pub iterations: usize,
    /// number of circuit executions, including those spent on gradients
    pub circuit_evaluations: usize,
    pub converged: bool,
}

/// Variational minimization of `<ψ(θ)|H|ψ(θ)>` over the parameters of an ansatz.
pub struct Vqe<'a, E, M> {
    evaluator: E,
    ansatz: &'a ParameterizedCircuit,
    minimizer: &'a M,
}

impl<'a, E: ExpectationEvaluator, M: Minimizer> Vqe<'a, E, M> {
    pub fn new(evaluator: E, ansatz: &'a ParameterizedCircuit, minimizer: &'a M) -> Self {
        Self {
            evaluator,
            ansatz,
            minimizer,
        }
    }

    pub fn compute_minimum_eigenvalue(
        &self,
        hamiltonian: &SparsePauliOp,
        initial_point: DVector<f64>,
    ) -> Result<VqeResult, EstimatorError> {
        if hamiltonian.num_qubits() != self.ansatz.num_qubits() {
            return Err(ConfigurationError::QubitMismatch {
                operator: hamiltonian.num_qubits(),
                ansatz: self.ansatz.num_qubits(),
            }
            .into());
        }
        if initial_point.len() != self.ansatz.num_parameters() {
            return Err(ConfigurationError::InitialPointLength {
                given: initial_point.len(),
                expected: self.ansatz.num_parameters(),
            }
            .into());
        }

        let mut objective = EnergyObjective {
            evaluator: &self.evaluator,
            ansatz: self.ansatz,
            hamiltonian,
            circuit_evaluations: 0,
        };
        let outcome = self.minimizer.minimize(&mut objective, initial_point);

        if !outcome.value.is_finite() {
            return Err(ComputationError::NonFiniteEnergy.into());
        }

        Ok(VqeResult {
            optimal_value: outcome.value,
            optimal_parameters: outcome.parameters,
            iterations: outcome.iterations,
            circuit_evaluations: objective.circuit_evaluations,
            converged: outcome.converged,
        })
    }

    /// Minimizes from every starting point and keeps the lowest result. The circuit evaluations
    /// of all runs are summed, everything else describes the kept run.
    pub fn compute_minimum_eigenvalue_from(
        &self,
        hamiltonian: &SparsePauliOp,
        initial_points: impl IntoIterator<Item = DVector<f64>>,
    ) -> Result<VqeResult, EstimatorError> {
        let mut best: Option<VqeResult> = None;
        let mut circuit_evaluations = 0;
        for (start, initial_point) in initial_points.into_iter().enumerate() {
            let result = self.compute_minimum_eigenvalue(hamiltonian, initial_point)?;
            log::debug!(
                "start {start}: value {:.10} after {} iterations",
                result.optimal_value,
                result.iterations
            );
            circuit_evaluations += result.circuit_evaluations;
            if best
                .as_ref()
                .map_or(true, |best| result.optimal_value < best.optimal_value)
            {
                best = Some(result);
            }
        }

        let mut best = best.ok_or(ConfigurationError::NoStartingPoints)?;
        best.circuit_evaluations = circuit_evaluations;
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::{dvector, Complex, DVector};

    use crate::{
        circuit::{AnsatzConfig, ParameterizedCircuit, RotationGate},
        error::{ConfigurationError, EstimatorError},
        expectation::StatevectorExpectation,
        operators::{PauliString, SparsePauliOp},
        optimize::{Bfgs, Objective},
    };

    use super::{EnergyObjective, InitialPoint, Vqe};

    fn z_plus_x() -> SparsePauliOp {
        SparsePauliOp::from_terms(
            1,
            [
                ("Z".parse::<PauliString>().unwrap(), Complex::new(1.0, 0.0)),
                ("X".parse::<PauliString>().unwrap(), Complex::new(1.0, 0.0)),
            ],
        )
    }

    #[test]
    fn uniform_initial_point_is_seeded() {
        let point = InitialPoint::default();
        let first = point.resolve(16).unwrap();
        let second = point.resolve(16).unwrap();

        assert_eq!(first, second);
        assert!(first.iter().all(|angle| (-std::f64::consts::PI..std::f64::consts::PI).contains(angle)));
        assert_ne!(first, InitialPoint::Uniform { seed: 7 }.resolve(16).unwrap());
    }

    #[test]
    fn fixed_initial_point_length_is_checked() {
        assert_eq!(
            InitialPoint::Fixed(vec![0.1, 0.2]).resolve(2).unwrap(),
            dvector![0.1, 0.2]
        );
        assert!(matches!(
            InitialPoint::Fixed(vec![0.1]).resolve(2),
            Err(ConfigurationError::InitialPointLength {
                given: 1,
                expected: 2
            })
        ));
    }

    #[test]
    fn parameter_shift_matches_finite_differences() {
        let circuit = AnsatzConfig::default().two_local(2);
        let hamiltonian = SparsePauliOp::from_terms(
            2,
            [
                ("ZZ".parse::<PauliString>().unwrap(), Complex::new(0.5, 0.0)),
                ("XI".parse::<PauliString>().unwrap(), Complex::new(-0.3, 0.0)),
                ("YY".parse::<PauliString>().unwrap(), Complex::new(0.2, 0.0)),
            ],
        );
        let parameters = DVector::from_fn(circuit.num_parameters(), |i, _| 0.3 * i as f64 - 1.0);
        let mut objective = EnergyObjective {
            evaluator: &StatevectorExpectation,
            ansatz: &circuit,
            hamiltonian: &hamiltonian,
            circuit_evaluations: 0,
        };

        let exact = objective.gradient(&parameters);
        assert_eq!(objective.circuit_evaluations, 2 * circuit.num_parameters());

        let step = 1e-5;
        for k in 0..parameters.len() {
            let mut shifted = parameters.clone();
            shifted[k] += step;
            let forward = objective.value(&shifted);
            shifted[k] -= 2.0 * step;
            let backward = objective.value(&shifted);
            assert_relative_eq!(exact[k], (forward - backward) / (2.0 * step), epsilon = 1e-7);
        }
    }

    #[test]
    fn finds_the_ground_state_of_a_single_qubit() {
        let mut circuit = ParameterizedCircuit::new(1);
        circuit.rotation(RotationGate::Ry, 0);
        let bfgs = Bfgs::default();
        let vqe = Vqe::new(StatevectorExpectation, &circuit, &bfgs);

        let result = vqe
            .compute_minimum_eigenvalue(&z_plus_x(), dvector![0.1])
            .unwrap();
        assert_relative_eq!(result.optimal_value, -std::f64::consts::SQRT_2, epsilon = 1e-8);
        assert!(result.converged);
        assert!(result.circuit_evaluations > result.iterations);
    }

    #[test]
    fn uniform_starts_extend_the_single_start() {
        let point = InitialPoint::default();
        let starts = point.resolve_many(16, 3).unwrap();

        assert_eq!(starts.len(), 3);
        assert_eq!(starts[0], point.resolve(16).unwrap());
        assert_ne!(starts[0], starts[1]);
        assert_eq!(InitialPoint::Fixed(vec![0.1]).resolve_many(1, 3).unwrap().len(), 1);
    }

    #[test]
    fn keeps_the_lowest_of_several_starts() {
        // cos θ has its minimum at π, and a start at 0 is stuck on the maximum
        let mut circuit = ParameterizedCircuit::new(1);
        circuit.rotation(RotationGate::Ry, 0);
        let z = SparsePauliOp::from_terms(
            1,
            [("Z".parse::<PauliString>().unwrap(), Complex::new(1.0, 0.0))],
        );
        let bfgs = Bfgs::default();
        let vqe = Vqe::new(StatevectorExpectation, &circuit, &bfgs);

        let stuck = vqe.compute_minimum_eigenvalue(&z, dvector![0.0]).unwrap();
        assert_relative_eq!(stuck.optimal_value, 1.0, epsilon = 1e-12);

        let result = vqe
            .compute_minimum_eigenvalue_from(&z, [dvector![0.0], dvector![2.0]])
            .unwrap();
        assert_relative_eq!(result.optimal_value, -1.0, epsilon = 1e-8);
        assert!(result.circuit_evaluations > stuck.circuit_evaluations);

        assert!(matches!(
            vqe.compute_minimum_eigenvalue_from(&z, Vec::<DVector<f64>>::new()),
            Err(EstimatorError::Configuration(ConfigurationError::NoStartingPoints))
        ));
    }

    #[test]
    fn rejects_mismatched_widths() {
        let circuit = AnsatzConfig::default().two_local(2);
        let bfgs = Bfgs::default();
        let vqe = Vqe::new(StatevectorExpectation, &circuit, &bfgs);

        let result = vqe.compute_minimum_eigenvalue(&z_plus_x(), DVector::zeros(8));
        assert!(matches!(
            result,
            Err(EstimatorError::Configuration(ConfigurationError::QubitMismatch { .. }))
        ));
    }
}
