use std::fmt;

use smallvec::SmallVec;

/// A single creation or annihilation operator on a spin orbital
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ladder {
    Create(usize),
    Annihilate(usize),
}

impl Ladder {
    pub fn mode(&self) -> usize {
        match *self {
            Ladder::Create(mode) | Ladder::Annihilate(mode) => mode,
        }
    }
}

pub type LadderProduct = SmallVec<[Ladder; 4]>;

/// A real linear combination of products of ladder operators over `num_modes` spin orbitals.
/// Products are applied right to left, so `[Create(0), Annihilate(1)]` is `a†_0 a_1`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FermionicOp {
    num_modes: usize,
    terms: Vec<(LadderProduct, f64)>,
}

impl FermionicOp {
    pub fn new(num_modes: usize) -> Self {
        Self {
            num_modes,
            terms: Vec::new(),
        }
    }

    pub fn push(&mut self, product: impl IntoIterator<Item = Ladder>, coefficient: f64) {
        let product = product.into_iter().collect::<LadderProduct>();
        debug_assert!(product.iter().all(|ladder| ladder.mode() < self.num_modes));
        self.terms.push((product, coefficient));
    }

    pub fn num_modes(&self) -> usize {
        self.num_modes
    }

    pub fn terms(&self) -> &[(LadderProduct, f64)] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// The total particle number operator `Σ_j a†_j a_j`
    pub fn number(num_modes: usize) -> Self {
        let mut op = Self::new(num_modes);
        for mode in 0..num_modes {
            op.push([Ladder::Create(mode), Ladder::Annihilate(mode)], 1.0);
        }
        op
    }
}

impl fmt::Display for Ladder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ladder::Create(mode) => write!(f, "+_{mode}"),
            Ladder::Annihilate(mode) => write!(f, "-_{mode}"),
        }
    }
}

impl fmt::Display for FermionicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (product, coefficient) in &self.terms {
            write!(f, "{coefficient:+.8}")?;
            for ladder in product {
                write!(f, " {ladder}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FermionicOp, Ladder};

    #[test]
    fn number_operator_terms() {
        let op = FermionicOp::number(3);
        assert_eq!(op.len(), 3);
        assert_eq!(op.num_modes(), 3);
        assert_eq!(
            op.terms()[2].0.as_slice(),
            &[Ladder::Create(2), Ladder::Annihilate(2)]
        );
        assert_eq!(op.to_string().lines().next(), Some("+1.00000000 +_0 -_0"));
    }
}
