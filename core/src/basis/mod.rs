mod functions;
mod set;
mod sto3g;

pub use functions::{BasisFunction, ContractedGaussian, Gaussian};
pub use set::{AtomicBasis, BasisSet};
pub(crate) use set::ElectronShell;
