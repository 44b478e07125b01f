//! Fermion to qubit encodings
use nalgebra::Complex;
use serde::{Deserialize, Serialize};

use crate::operators::{FermionicOp, Ladder, PauliString, SparsePauliOp, DEFAULT_ATOL};

/// Turns a fermionic operator on `n` spin orbitals into a qubit operator on `n` qubits.
pub trait QubitMapper {
    /// Qubit image of a single ladder operator
    fn map_ladder(&self, ladder: Ladder, num_modes: usize) -> SparsePauliOp;

    fn map(&self, op: &FermionicOp) -> SparsePauliOp {
        let num_modes = op.num_modes();
        let creators = (0..num_modes)
            .map(|mode| self.map_ladder(Ladder::Create(mode), num_modes))
            .collect::<Vec<_>>();
        let annihilators = (0..num_modes)
            .map(|mode| self.map_ladder(Ladder::Annihilate(mode), num_modes))
            .collect::<Vec<_>>();

        let mut mapped = SparsePauliOp::zero(num_modes);
        for (product, coefficient) in op.terms() {
            let mut term = SparsePauliOp::identity(num_modes);
            for ladder in product {
                let image = match *ladder {
                    Ladder::Create(mode) => &creators[mode],
                    Ladder::Annihilate(mode) => &annihilators[mode],
                };
                term = term.compose(image).simplify(DEFAULT_ATOL);
            }
            mapped = mapped + term * *coefficient;
        }

        mapped.simplify(DEFAULT_ATOL)
    }
}

/// `a†_j = ½ (X_j - iY_j) Z_{j-1} ... Z_0`
#[derive(Copy, Clone, Debug, Default)]
pub struct JordanWignerMapper;

impl QubitMapper for JordanWignerMapper {
    fn map_ladder(&self, ladder: Ladder, num_modes: usize) -> SparsePauliOp {
        let mode = ladder.mode();
        let bit = 1u64 << mode;
        let below = bit - 1;

        ladder_image(
            num_modes,
            ladder,
            PauliString::new(bit, below),
            PauliString::new(bit, below | bit),
        )
    }
}

/// Qubit `j` holds the parity of modes `0..=j`.
/// `a†_j = ½ (X_j Z_{j-1} - iY_j) X_{j+1} ... X_{n-1}`
#[derive(Copy, Clone, Debug, Default)]
pub struct ParityMapper;

impl QubitMapper for ParityMapper {
    fn map_ladder(&self, ladder: Ladder, num_modes: usize) -> SparsePauliOp {
        let mode = ladder.mode();
        let bit = 1u64 << mode;
        let all = (1u64 << num_modes) - 1;
        let above = all & !(bit | (bit - 1));
        let previous = if mode > 0 { 1u64 << (mode - 1) } else { 0 };

        ladder_image(
            num_modes,
            ladder,
            PauliString::new(bit | above, previous),
            PauliString::new(bit | above, bit),
        )
    }
}

/// `½ (x_part ∓ i y_part)`, minus for creation
fn ladder_image(
    num_modes: usize,
    ladder: Ladder,
    x_part: PauliString,
    y_part: PauliString,
) -> SparsePauliOp {
    let y_coefficient = match ladder {
        Ladder::Create(_) => Complex::new(0.0, -0.5),
        Ladder::Annihilate(_) => Complex::new(0.0, 0.5),
    };
    SparsePauliOp::from_terms(
        num_modes,
        [(x_part, Complex::new(0.5, 0.0)), (y_part, y_coefficient)],
    )
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapperKind {
    #[default]
    JordanWigner,
    Parity,
}

impl MapperKind {
    pub fn map(&self, op: &FermionicOp) -> SparsePauliOp {
        match self {
            MapperKind::JordanWigner => JordanWignerMapper.map(op),
            MapperKind::Parity => ParityMapper.map(op),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::operators::{FermionicOp, Ladder, SparsePauliOp, DEFAULT_ATOL};

    use super::{JordanWignerMapper, MapperKind, ParityMapper, QubitMapper};

    fn anticommutator(mapper: &impl QubitMapper, a: Ladder, b: Ladder, n: usize) -> SparsePauliOp {
        let a = mapper.map_ladder(a, n);
        let b = mapper.map_ladder(b, n);
        (a.compose(&b) + b.compose(&a)).simplify(DEFAULT_ATOL)
    }

    fn check_canonical_relations(mapper: &impl QubitMapper) {
        let n = 4;
        for i in 0..n {
            for j in 0..n {
                let mixed = anticommutator(mapper, Ladder::Annihilate(i), Ladder::Create(j), n);
                if i == j {
                    assert_eq!(mixed, SparsePauliOp::identity(n));
                } else {
                    assert!(mixed.is_empty(), "{{a_{i}, a†_{j}}} = {mixed}");
                }

                let creators = anticommutator(mapper, Ladder::Create(i), Ladder::Create(j), n);
                assert!(creators.is_empty());
            }
        }
    }

    #[test]
    fn jordan_wigner_obeys_anticommutation() {
        check_canonical_relations(&JordanWignerMapper);
    }

    #[test]
    fn parity_obeys_anticommutation() {
        check_canonical_relations(&ParityMapper);
    }

    #[test]
    fn jordan_wigner_number_operator() {
        // a†a = ½ (I - Z) on every mode
        let mapped = JordanWignerMapper.map(&FermionicOp::number(2));
        let labels = mapped
            .terms()
            .iter()
            .map(|(pauli, coefficient)| (pauli.to_string(), coefficient.re))
            .collect::<Vec<_>>();

        assert_eq!(mapped.len(), 3);
        assert!(labels.contains(&("I".to_string(), 1.0)));
        assert!(labels.contains(&("Z".to_string(), -0.5)));
        assert!(labels.contains(&("ZI".to_string(), -0.5)));
    }

    #[test]
    fn mappings_share_a_spectrum() {
        let mut op = FermionicOp::number(3);
        op.push([Ladder::Create(0), Ladder::Annihilate(2)], 0.3);
        op.push([Ladder::Create(2), Ladder::Annihilate(0)], 0.3);
        op.push(
            [
                Ladder::Create(0),
                Ladder::Create(1),
                Ladder::Annihilate(1),
                Ladder::Annihilate(0),
            ],
            0.7,
        );

        let spectrum = |kind: MapperKind| {
            let mut eigenvalues = kind
                .map(&op)
                .to_matrix()
                .symmetric_eigenvalues()
                .iter()
                .copied()
                .collect::<Vec<f64>>();
            eigenvalues.sort_by(f64::total_cmp);
            eigenvalues
        };

        let jordan_wigner = spectrum(MapperKind::JordanWigner);
        let parity = spectrum(MapperKind::Parity);
        for (a, b) in jordan_wigner.iter().zip(&parity) {
            assert_relative_eq!(a, b, epsilon = 1e-10);
        }
        // vacuum, then the bonding orbital of the 0-2 hopping
        assert_relative_eq!(jordan_wigner[0], 0.0, epsilon = 1e-10);
        assert_relative_eq!(jordan_wigner[1], 0.7, epsilon = 1e-10);
    }

    #[test]
    fn mapped_operators_are_hermitian() {
        let mut op = FermionicOp::new(2);
        op.push([Ladder::Create(0), Ladder::Annihilate(1)], 0.25);
        op.push([Ladder::Create(1), Ladder::Annihilate(0)], 0.25);
        let mapped = ParityMapper.map(&op);
        assert!(mapped.is_hermitian(1e-12));
        assert_eq!(mapped.len(), 2);
    }
}
