pub mod atom;
pub mod basis;
pub mod circuit;
pub mod config;
mod diis;
pub mod error;
pub mod exact;
pub mod expectation;
pub mod ground_state;
pub mod hf;
pub mod integrals;
pub mod mapping;
pub mod molecule;
pub mod operators;
pub mod optimize;
pub mod periodic_table;
pub mod problem;
pub mod vqe;

pub use config::EstimatorConfig;
pub use error::{ComputationError, ConfigurationError, EstimatorError, NonConvergenceWarning};
pub use ground_state::{EstimationResult, GroundStateEstimator, ScalingFactor};
