use std::ops::Index;

use itertools::iproduct;
use nalgebra::DMatrix;

use crate::{
    basis::BasisSet,
    error::EstimatorError,
    hf::{restricted_hartree_fock, HartreeFockConfig},
    integrals::{AtomicIntegrals, DefaultIntegrator, ElectronTensor},
    molecule::Molecule,
    operators::{FermionicOp, Ladder},
};

/// Integrals below this magnitude do not produce fermionic terms
const INTEGRAL_THRESHOLD: f64 = 1e-12;

/// Dense chemist's notation `(pq|rs)` in the molecular orbital basis
#[derive(Clone, Debug)]
pub struct MolecularTwoBody {
    n: usize,
    data: Vec<f64>,
}

impl MolecularTwoBody {
    fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n.pow(4)],
        }
    }

    #[inline(always)]
    fn offset(&self, p: usize, q: usize, r: usize, s: usize) -> usize {
        ((p * self.n + q) * self.n + r) * self.n + s
    }

    /// Four quarter transformations, one index at a time
    fn transform(electron: &ElectronTensor, coefficients: &DMatrix<f64>) -> Self {
        let n = coefficients.nrows();
        let mut current = Self::zeros(n);
        for (i, j, k, l) in iproduct!(0..n, 0..n, 0..n, 0..n) {
            let offset = current.offset(i, j, k, l);
            current.data[offset] = electron[(i, j, k, l)];
        }

        for position in 0..4 {
            let mut next = Self::zeros(n);
            for (a, b, c, d) in iproduct!(0..n, 0..n, 0..n, 0..n) {
                let mut indices = [a, b, c, d];
                let orbital = indices[position];
                let mut sum = 0.0;
                for mu in 0..n {
                    indices[position] = mu;
                    let [w, x, y, z] = indices;
                    sum += coefficients[(mu, orbital)] * current[(w, x, y, z)];
                }
                let offset = next.offset(a, b, c, d);
                next.data[offset] = sum;
            }
            current = next;
        }

        current
    }
}

impl Index<(usize, usize, usize, usize)> for MolecularTwoBody {
    type Output = f64;

    fn index(&self, (p, q, r, s): (usize, usize, usize, usize)) -> &Self::Output {
        &self.data[self.offset(p, q, r, s)]
    }
}

/// The electronic structure of a molecule, expressed in its hartree fock orbitals
#[derive(Clone, Debug)]
pub struct ElectronicStructureProblem {
    one_body: DMatrix<f64>,
    two_body: MolecularTwoBody,
    n_electrons: usize,
    nuclear_repulsion: f64,
    hartree_fock_energy: f64,
}

impl ElectronicStructureProblem {
    pub fn from_molecule(
        molecule: &Molecule,
        basis_set: &BasisSet,
        config: &HartreeFockConfig,
    ) -> Result<Self, EstimatorError> {
        let basis = basis_set.basis_for(molecule.atoms())?;
        let integrals =
            AtomicIntegrals::compute(&basis, molecule.atoms(), &DefaultIntegrator::default());
        let nuclear_repulsion = molecule.nuclear_repulsion();
        let n_electrons = molecule.n_electrons();

        let hartree_fock =
            restricted_hartree_fock(&integrals, n_electrons, nuclear_repulsion, config)?;
        log::debug!(
            "hartree fock converged after {} iterations, energy {:.10}",
            hartree_fock.iterations,
            hartree_fock.total_energy()
        );

        let coefficients = &hartree_fock.coefficients;
        let one_body = coefficients.transpose() * integrals.core_hamiltonian() * coefficients;
        let two_body = MolecularTwoBody::transform(&integrals.electron, coefficients);

        Ok(Self {
            one_body,
            two_body,
            n_electrons,
            nuclear_repulsion,
            hartree_fock_energy: hartree_fock.total_energy(),
        })
    }

    pub fn n_spatial_orbitals(&self) -> usize {
        self.one_body.nrows()
    }

    pub fn num_spin_orbitals(&self) -> usize {
        2 * self.n_spatial_orbitals()
    }

    pub fn n_electrons(&self) -> usize {
        self.n_electrons
    }

    pub fn nuclear_repulsion(&self) -> f64 {
        self.nuclear_repulsion
    }

    /// total hartree fock energy, including nuclear repulsion
    pub fn hartree_fock_energy(&self) -> f64 {
        self.hartree_fock_energy
    }

    pub fn one_body(&self) -> &DMatrix<f64> {
        &self.one_body
    }

    pub fn two_body(&self) -> &MolecularTwoBody {
        &self.two_body
    }

    /// Spin orbital index: all alpha orbitals first, then all beta orbitals
    fn spin_orbital(&self, spatial: usize, spin: usize) -> usize {
        spatial + spin * self.n_spatial_orbitals()
    }

    /// Occupation bit mask of the hartree fock determinant
    pub fn hartree_fock_state(&self) -> usize {
        let occupied = self.n_electrons / 2;
        (0..occupied)
            .flat_map(|spatial| [self.spin_orbital(spatial, 0), self.spin_orbital(spatial, 1)])
            .fold(0, |mask, mode| mask | 1 << mode)
    }

    /// The electronic hamiltonian
    /// `Σ h_pq a†_pσ a_qσ + ½ Σ (pq|rs) a†_pσ a†_rτ a_sτ a_qσ`
    /// without the nuclear repulsion.
    pub fn second_q_op(&self) -> FermionicOp {
        let n = self.n_spatial_orbitals();
        let mut op = FermionicOp::new(self.num_spin_orbitals());

        for (spin, p, q) in iproduct!(0..2, 0..n, 0..n) {
            let h = self.one_body[(p, q)];
            if h.abs() > INTEGRAL_THRESHOLD {
                op.push(
                    [
                        Ladder::Create(self.spin_orbital(p, spin)),
                        Ladder::Annihilate(self.spin_orbital(q, spin)),
                    ],
                    h,
                );
            }
        }

        for (p, q, r, s) in iproduct!(0..n, 0..n, 0..n, 0..n) {
            let g = self.two_body[(p, q, r, s)];
            if g.abs() <= INTEGRAL_THRESHOLD {
                continue;
            }
            for (sigma, tau) in iproduct!(0..2, 0..2) {
                // a†a† on the same spin orbital vanishes
                if sigma == tau && (p == r || q == s) {
                    continue;
                }
                op.push(
                    [
                        Ladder::Create(self.spin_orbital(p, sigma)),
                        Ladder::Create(self.spin_orbital(r, tau)),
                        Ladder::Annihilate(self.spin_orbital(s, tau)),
                        Ladder::Annihilate(self.spin_orbital(q, sigma)),
                    ],
                    0.5 * g,
                );
            }
        }

        op
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use crate::{
        atom::Atom, basis::BasisSet, hf::HartreeFockConfig, mapping::MapperKind,
        molecule::Molecule, periodic_table::ElementType,
    };

    use super::ElectronicStructureProblem;

    fn hydrogen(distance: f64) -> ElectronicStructureProblem {
        let molecule = Molecule::new(vec![
            Atom::new(ElementType::Hydrogen, Vector3::zeros()),
            Atom::new(ElementType::Hydrogen, Vector3::new(0.0, 0.0, distance)),
        ]);
        ElectronicStructureProblem::from_molecule(
            &molecule,
            &BasisSet::sto3g(),
            &HartreeFockConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn molecular_integrals_of_hydrogen() {
        let problem = hydrogen(1.4);
        let h = problem.one_body();
        let g = problem.two_body();

        assert_relative_eq!(h[(0, 0)], -1.2528, epsilon = 1e-3);
        assert_relative_eq!(h[(1, 1)], -0.4756, epsilon = 1e-3);
        assert_relative_eq!(h[(0, 1)], 0.0, epsilon = 1e-8);
        assert_relative_eq!(g[(0, 0, 0, 0)], 0.6746, epsilon = 1e-3);
        assert_relative_eq!(g[(0, 0, 1, 1)], 0.6636, epsilon = 1e-3);
        assert_relative_eq!(g[(1, 1, 1, 1)], 0.6975, epsilon = 1e-3);
        assert_relative_eq!(g[(0, 1, 1, 0)], 0.1813, epsilon = 1e-3);
        // permutational symmetry survives the transformation
        assert_relative_eq!(g[(0, 1, 1, 0)], g[(1, 0, 0, 1)], epsilon = 1e-10);
        assert_relative_eq!(g[(0, 0, 1, 1)], g[(1, 1, 0, 0)], epsilon = 1e-10);
    }

    #[test]
    fn hartree_fock_determinant_reproduces_hartree_fock_energy() {
        let problem = hydrogen(1.4);
        assert_eq!(problem.num_spin_orbitals(), 4);
        assert_eq!(problem.hartree_fock_state(), 0b0101);

        for mapper in [MapperKind::JordanWigner, MapperKind::Parity] {
            let hamiltonian = mapper.map(&problem.second_q_op()).to_matrix();
            let state = match mapper {
                MapperKind::JordanWigner => problem.hartree_fock_state(),
                // parity qubit j holds the occupation parity of modes 0..=j
                MapperKind::Parity => 0b0011,
            };
            let diagonal = hamiltonian[(state, state)];
            assert_relative_eq!(
                diagonal.re + problem.nuclear_repulsion(),
                problem.hartree_fock_energy(),
                epsilon = 1e-8
            );
        }
    }

    #[test]
    fn jordan_wigner_hamiltonian_has_fifteen_terms() {
        let problem = hydrogen(1.388_948_7);
        let hamiltonian = MapperKind::JordanWigner.map(&problem.second_q_op());
        assert_eq!(hamiltonian.num_qubits(), 4);
        assert_eq!(hamiltonian.len(), 15);
        assert!(hamiltonian.is_hermitian(1e-12));
    }
}
