use std::fmt;

use thiserror::Error;

use crate::periodic_table::ElementType;

/// Invalid input, detected before any computation takes place. Retrying with the same
/// inputs will fail the same way.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("separation must be a positive, finite distance, got {0}")]
    InvalidSeparation(f64),

    #[error("scaling factor must lie in (0, 1], got {0}")]
    InvalidScaling(f64),

    #[error("basis set has no functions for element {0:?}")]
    MissingBasis(ElementType),

    #[error("invalid basis set: {0}")]
    BasisSet(String),

    #[error("the iteration budget of the {0} must be non-zero")]
    ZeroIterationBudget(&'static str),

    #[error("fixed initial point has {given} parameters, ansatz needs {expected}")]
    InitialPointLength { given: usize, expected: usize },

    #[error("at least one starting point is required")]
    NoStartingPoints,

    #[error("operator acts on {operator} qubits but the ansatz on {ansatz}")]
    QubitMismatch { operator: usize, ansatz: usize },

    #[error("operator acts on {qubits} qubits, at most {max} are supported")]
    TooManyQubits { qubits: usize, max: usize },

    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure inside the structure solve, the mapping or the expectation evaluation.
#[derive(Debug, Error)]
pub enum ComputationError {
    #[error("overlap matrix is singular (smallest eigenvalue {0:e})")]
    SingularOverlap(f64),

    #[error("hartree fock did not converge after {0} iterations")]
    ScfNotConverged(usize),

    #[error("energy evaluation produced a non-finite value")]
    NonFiniteEnergy,
}

#[derive(Debug, Error)]
pub enum EstimatorError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Computation(#[from] ComputationError),
}

/// The minimizer exhausted its iteration budget before meeting its tolerance. The estimate
/// it accompanies is the best value found, which is still a valid variational upper bound.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize)]
pub struct NonConvergenceWarning {
    /// the iteration budget that was exhausted
    pub iterations: usize,
    /// the number of objective evaluations spent
    pub evaluations: usize,
}

impl fmt::Display for NonConvergenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "minimizer did not converge within {} iterations ({} evaluations)",
            self.iterations, self.evaluations
        )
    }
}
