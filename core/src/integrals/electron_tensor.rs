use std::ops::Index;

use crate::basis::BasisFunction;

use super::Integrator;

/// An integral index used in the two-electron integrals of a basis set.
///
/// The index represents the four indices (i, j, k, l) of the chemist notation integral
///   (ij|kl) = int phi_i(1) phi_j(1) 1/r12 phi_k(2) phi_l(2)
///
/// Two-electron integrals are invariant under i <-> j, k <-> l and (ij) <-> (kl), so this
/// struct always stores the canonical representative: i >= j, k >= l and ij >= kl.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) struct IntegralIndex(usize, usize, usize, usize);

impl IntegralIndex {
    /// Creates a new integral index with the given indices.
    pub(crate) const fn new(index: (usize, usize, usize, usize)) -> Self {
        let (i, j, k, l) = Self::correct_order(index);
        Self(i, j, k, l)
    }

    /// Returns the indices with the canonical order.
    #[inline(always)]
    const fn correct_order(
        (i, j, k, l): (usize, usize, usize, usize),
    ) -> (usize, usize, usize, usize) {
        let (i, j) = if i >= j { (i, j) } else { (j, i) };
        let (k, l) = if k >= l { (k, l) } else { (l, k) };

        if pair_index(i, j) >= pair_index(k, l) {
            (i, j, k, l)
        } else {
            (k, l, i, j)
        }
    }

    /// Position of this integral in the packed storage of unique integrals.
    #[inline(always)]
    const fn packed(&self) -> usize {
        let &Self(i, j, k, l) = self;
        let ij = pair_index(i, j);
        let kl = pair_index(k, l);
        pair_index(ij, kl)
    }
}

/// Compound index of a pair with `i >= j`.
#[inline(always)]
const fn pair_index(i: usize, j: usize) -> usize {
    i * (i + 1) / 2 + j
}

impl std::fmt::Display for IntegralIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let &Self(i, j, k, l) = self;
        write!(f, "({} {}|{} {})", i, j, k, l)
    }
}

/// The electron-electron repulsion integrals between all quadruples of basis functions.
/// Only the symmetry-unique integrals are computed and stored.
pub struct ElectronTensor {
    data: Vec<f64>,
    /// side length
    size: usize,
}

impl ElectronTensor {
    /// Computes every unique electron repulsion integral of `basis`. With the `rayon` feature,
    /// integrals are evaluated in parallel.
    pub fn from_basis(
        basis: &[BasisFunction],
        integrator: &(impl Integrator<Function = BasisFunction> + Sync),
    ) -> Self {
        let n_basis = basis.len();
        let n_pairs = n_basis * (n_basis + 1) / 2;

        let mut to_compute = Vec::with_capacity(n_pairs * (n_pairs + 1) / 2);
        for i in 0..n_basis {
            for j in 0..=i {
                for k in 0..n_basis {
                    for l in 0..=k {
                        if pair_index(i, j) >= pair_index(k, l) {
                            to_compute.push(IntegralIndex(i, j, k, l));
                        }
                    }
                }
            }
        }
        to_compute.sort_unstable_by_key(IntegralIndex::packed);

        let compute = |index: &IntegralIndex| {
            let &IntegralIndex(i, j, k, l) = index;
            let integral =
                integrator.electron_repulsion((&basis[i], &basis[j], &basis[k], &basis[l]));
            log::trace!("ERI {index} = {integral:<1.8}");
            integral
        };

        #[cfg(feature = "rayon")]
        let data = {
            use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
            to_compute.par_iter().map(compute).collect::<Vec<_>>()
        };

        #[cfg(not(feature = "rayon"))]
        let data = to_compute.iter().map(compute).collect::<Vec<_>>();

        Self {
            data,
            size: n_basis,
        }
    }

    /// the number of basis functions along each axis
    pub fn size(&self) -> usize {
        self.size
    }
}

impl Index<(usize, usize, usize, usize)> for ElectronTensor {
    type Output = f64;

    fn index(&self, index: (usize, usize, usize, usize)) -> &Self::Output {
        let (i, j, k, l) = index;
        debug_assert!(i < self.size && j < self.size && k < self.size && l < self.size);
        &self.data[IntegralIndex::new(index).packed()]
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use crate::{
        atom::Atom,
        basis::BasisSet,
        integrals::{Integrator, McMurchieDavidson},
        periodic_table::ElementType,
    };

    use super::{ElectronTensor, IntegralIndex};

    #[test]
    fn canonical_order_is_shared_by_all_permutations() {
        let canonical = IntegralIndex::new((0, 1, 2, 3));
        for permutation in [
            (1, 0, 2, 3),
            (0, 1, 3, 2),
            (2, 3, 0, 1),
            (3, 2, 1, 0),
            (2, 3, 1, 0),
        ] {
            assert_eq!(IntegralIndex::new(permutation), canonical);
        }
        assert_eq!(canonical.to_string(), "(3 2|1 0)");
    }

    #[test]
    fn packed_indices_are_dense() {
        let n = 4;
        let mut seen = Vec::new();
        for i in 0..n {
            for j in 0..=i {
                for k in 0..=i {
                    for l in 0..=k {
                        let index = IntegralIndex::new((i, j, k, l));
                        if index == IntegralIndex(i, j, k, l) {
                            seen.push(index.packed());
                        }
                    }
                }
            }
        }
        seen.sort_unstable();
        let n_pairs = n * (n + 1) / 2;
        assert_eq!(seen, (0..n_pairs * (n_pairs + 1) / 2).collect::<Vec<_>>());
    }

    #[test]
    fn tensor_matches_direct_integration() {
        let atoms = [
            Atom::new(ElementType::Hydrogen, Vector3::zeros()),
            Atom::new(ElementType::Helium, Vector3::new(0.0, 0.3, 1.4)),
            Atom::new(ElementType::Hydrogen, Vector3::new(1.0, 0.0, -0.2)),
        ];
        let basis = BasisSet::sto3g().basis_for(&atoms).unwrap();
        let integrator = McMurchieDavidson;
        let tensor = ElectronTensor::from_basis(&basis, &integrator);

        for (i, j, k, l) in itertools::iproduct!(0..3, 0..3, 0..3, 0..3) {
            let direct =
                integrator.electron_repulsion((&basis[i], &basis[j], &basis[k], &basis[l]));
            assert_relative_eq!(tensor[(i, j, k, l)], direct, epsilon = 1e-12);
        }
    }
}
