//! Reference energies from full diagonalization
use crate::{error::ConfigurationError, operators::SparsePauliOp};

/// The dense matrix of an `n` qubit operator has `4^n` entries
pub const MAX_DENSE_QUBITS: usize = 12;

/// The lowest eigenvalue of a hermitian qubit operator, over the full Hilbert space.
pub fn minimum_eigenvalue(operator: &SparsePauliOp) -> Result<f64, ConfigurationError> {
    if operator.num_qubits() > MAX_DENSE_QUBITS {
        return Err(ConfigurationError::TooManyQubits {
            qubits: operator.num_qubits(),
            max: MAX_DENSE_QUBITS,
        });
    }

    Ok(operator
        .to_matrix()
        .symmetric_eigenvalues()
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Complex;

    use crate::operators::{PauliString, SparsePauliOp};

    use super::minimum_eigenvalue;

    #[test]
    fn lowest_eigenvalue_of_a_heisenberg_pair() {
        // XX + YY + ZZ has the singlet at -3 and the triplet at +1
        let operator = SparsePauliOp::from_terms(
            2,
            ["XX", "YY", "ZZ"].map(|label| {
                (
                    label.parse::<PauliString>().unwrap(),
                    Complex::new(1.0, 0.0),
                )
            }),
        );
        assert_relative_eq!(minimum_eigenvalue(&operator).unwrap(), -3.0, epsilon = 1e-10);
    }

    #[test]
    fn identity_offset() {
        let operator = SparsePauliOp::identity(3) * -0.5;
        assert_relative_eq!(minimum_eigenvalue(&operator).unwrap(), -0.5, epsilon = 1e-12);
    }
}
