pub mod rhf;
pub(crate) mod utils;

use serde::{Deserialize, Serialize};

pub use rhf::{restricted_hartree_fock, RestrictedHartreeFockOutput};

/// Settings of the self consistent field iteration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HartreeFockConfig {
    /// the maximum number of iterations to try
    pub max_iterations: usize,
    /// the smallest number that isn't treated as zero. If the density matrix rms changes by
    /// less than this, the system is considered converged.
    pub epsilon: f64,
}

impl Default for HartreeFockConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            epsilon: 1e-10,
        }
    }
}
