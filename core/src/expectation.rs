use nalgebra::DVector;

use crate::{circuit::ParameterizedCircuit, operators::SparsePauliOp};

/// Evaluates `<ψ(θ)|O|ψ(θ)>` for a parameterized state.
pub trait ExpectationEvaluator {
    fn expectation(
        &self,
        circuit: &ParameterizedCircuit,
        parameters: &DVector<f64>,
        observable: &SparsePauliOp,
    ) -> f64;
}

/// Exact evaluation on the full statevector, with no sampling noise.
#[derive(Copy, Clone, Debug, Default)]
pub struct StatevectorExpectation;

impl ExpectationEvaluator for StatevectorExpectation {
    fn expectation(
        &self,
        circuit: &ParameterizedCircuit,
        parameters: &DVector<f64>,
        observable: &SparsePauliOp,
    ) -> f64 {
        circuit.statevector(parameters).expectation(observable)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::{Complex, DVector};

    use crate::{circuit::AnsatzConfig, operators::SparsePauliOp};

    use super::{ExpectationEvaluator, StatevectorExpectation};

    #[test]
    fn identity_has_unit_expectation() {
        let circuit = AnsatzConfig::default().two_local(3);
        let parameters = DVector::from_fn(circuit.num_parameters(), |i, _| 0.1 * i as f64);
        let observable = SparsePauliOp::identity(3) * Complex::new(-0.25, 0.0);

        let value = StatevectorExpectation.expectation(&circuit, &parameters, &observable);
        assert_relative_eq!(value, -0.25, epsilon = 1e-12);
    }
}
