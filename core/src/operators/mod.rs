//! Second quantized and qubit operators
mod fermionic;
mod pauli;

pub use fermionic::{FermionicOp, Ladder};
pub use pauli::{PauliString, SparsePauliOp, DEFAULT_ATOL};
