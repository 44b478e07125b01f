use std::collections::HashMap;

use smallvec::SmallVec;

use crate::periodic_table::ElementType;

use super::{AtomicBasis, BasisSet, ContractedGaussian, ElectronShell, Gaussian};

/// Contraction coefficients shared by every 1s shell of STO-3G.
const S_COEFFICIENTS: [f64; 3] = [0.15432897, 0.53532814, 0.44463454];

const HYDROGEN_EXPONENTS: [f64; 3] = [3.42525091, 0.62391373, 0.16885540];
const HELIUM_EXPONENTS: [f64; 3] = [6.36242139, 1.15892300, 0.31364979];

impl BasisSet {
    /// The minimal STO-3G basis for the first row of the periodic table.
    pub fn sto3g() -> Self {
        let mut atomic_mapping = HashMap::with_capacity(2);
        atomic_mapping.insert(ElementType::Hydrogen, single_s_shell(HYDROGEN_EXPONENTS));
        atomic_mapping.insert(ElementType::Helium, single_s_shell(HELIUM_EXPONENTS));

        Self::new("STO-3G", atomic_mapping)
    }
}

fn single_s_shell(exponents: [f64; 3]) -> AtomicBasis {
    let primitives = exponents
        .into_iter()
        .zip(S_COEFFICIENTS)
        .map(|(exponent, coefficient)| Gaussian::normalized(exponent, coefficient, (0, 0, 0)))
        .collect::<SmallVec<_>>();

    let mut shell = ElectronShell::new(0);
    shell.basis_functions.push(ContractedGaussian(primitives));

    let mut atomic_basis = AtomicBasis::empty();
    atomic_basis.shells.push(shell);
    atomic_basis
}
