use nalgebra::DMatrix;

use crate::{diis::Diis, error::ComputationError, integrals::AtomicIntegrals};

use super::{utils, HartreeFockConfig};

/// Below this eigenvalue the overlap matrix is considered singular, for example because two
/// nuclei sit on top of each other.
const OVERLAP_SINGULARITY_THRESHOLD: f64 = 1e-10;
/// DIIS extrapolation only starts once the largest element of the commutator `FDS - SDF` is
/// below this. Until then the density is damped.
const DIIS_START: f64 = 0.1;
/// share of the previous density kept in damped iterations
const DAMPING: f64 = 0.5;

/// The output of a restricted hartree fock calculation
#[derive(Debug)]
#[non_exhaustive]
pub struct RestrictedHartreeFockOutput {
    /// molecular orbital coefficients, one orbital per column, sorted by ascending energy
    pub coefficients: DMatrix<f64>,
    /// the orbital energies that were found in this hartree fock calculation, sorted in
    /// ascending order
    pub orbital_energies: Vec<f64>,
    /// The electronic energy of the system
    pub electronic_energy: f64,
    /// The nuclear repulsion energy
    pub nuclear_repulsion: f64,
    /// After how many iterations did the system converge
    pub iterations: usize,
}

impl RestrictedHartreeFockOutput {
    pub fn total_energy(&self) -> f64 {
        self.electronic_energy + self.nuclear_repulsion
    }
}

/// Runs a closed shell self consistent field calculation on precomputed atomic integrals.
pub fn restricted_hartree_fock(
    integrals: &AtomicIntegrals,
    n_electrons: usize,
    nuclear_repulsion: f64,
    config: &HartreeFockConfig,
) -> Result<RestrictedHartreeFockOutput, ComputationError> {
    let n_basis = integrals.n_basis();
    let overlap = &integrals.overlap;
    let core_hamiltonian = integrals.core_hamiltonian();
    let electron = &integrals.electron;

    let transform = compute_transformation_matrix(overlap)?;
    let mut density = compute_hückel_density(
        &core_hamiltonian,
        overlap,
        &transform,
        n_basis,
        n_electrons,
    );

    let mut electron_terms = vec![0.0; n_basis.pow(4)];
    for (j, i, x, y) in itertools::iproduct!(0..n_basis, 0..n_basis, 0..n_basis, 0..n_basis) {
        electron_terms[j * n_basis.pow(3) + i * n_basis.pow(2) + y * n_basis + x] =
            electron[(i, j, x, y)] - 0.5 * electron[(i, x, j, y)];
    }

    // start of scf iteration
    let mut diis = Diis::new();
    for iteration in 0..=config.max_iterations {
        let electronic_hamiltonian =
            compute_electronic_hamiltonian(&density, &electron_terms, n_basis);

        let fock = &core_hamiltonian + &electronic_hamiltonian;
        let error = &fock * &density * overlap - overlap * &density * &fock;

        let error_max = error.amax();
        let damped = error_max >= DIIS_START;
        let fock = if damped {
            fock
        } else {
            match diis.fock(error, fock.clone()) {
                Some(extrapolated) => extrapolated,
                None => {
                    log::warn!("DIIS extrapolation failed in iteration {iteration}, using plain fock matrix");
                    fock
                }
            }
        };
        let transformed_fock = &transform.transpose() * (&fock * &transform);
        let (transformed_coefficients, orbital_energies) = utils::sorted_eigs(transformed_fock);
        let coefficients = &transform * &transformed_coefficients;

        let new_density = compute_updated_density(&coefficients, n_basis, n_electrons);

        let density_change = new_density - &density;
        if damped {
            density += (1.0 - DAMPING) * &density_change;
        } else {
            density += &density_change;
        }

        let electronic_energy =
            0.5 * (&density * (2.0 * &core_hamiltonian + &electronic_hamiltonian)).trace();

        let density_rms = (density_change.norm_squared() / n_basis.pow(2) as f64).sqrt();

        log::info!(
            "iteration {iteration:<4} - electronic energy {electronic_energy:1.6}. density rms {density_rms:1.4e}, error {error_max:1.2e}",
        );

        if !electronic_energy.is_finite() {
            return Err(ComputationError::NonFiniteEnergy);
        }

        if density_rms < config.epsilon {
            let electronic_hamiltonian =
                compute_electronic_hamiltonian(&density, &electron_terms, n_basis);
            let electronic_energy =
                0.5 * (&density * (2.0 * &core_hamiltonian + &electronic_hamiltonian)).trace();

            return Ok(RestrictedHartreeFockOutput {
                coefficients,
                orbital_energies: orbital_energies.as_slice().to_vec(),
                electronic_energy,
                nuclear_repulsion,
                iterations: iteration,
            });
        }
    }

    Err(ComputationError::ScfNotConverged(config.max_iterations))
}

/// Symmetric orthogonalization X = S^(-1/2)
fn compute_transformation_matrix(overlap: &DMatrix<f64>) -> Result<DMatrix<f64>, ComputationError> {
    let (u, eigenvalues) = utils::eigs(overlap.clone());

    let smallest = eigenvalues.min();
    if smallest < OVERLAP_SINGULARITY_THRESHOLD {
        return Err(ComputationError::SingularOverlap(smallest));
    }

    let diagonal_inv_sqrt = DMatrix::from_diagonal(&eigenvalues.map(|f| f.sqrt().recip()));
    Ok(&u * (diagonal_inv_sqrt * &u.transpose()))
}

fn compute_hückel_density(
    hamiltonian: &DMatrix<f64>,
    overlap: &DMatrix<f64>,
    transform: &DMatrix<f64>,
    n_basis: usize,
    n_electrons: usize,
) -> DMatrix<f64> {
    const WOLFSBERG_HELMHOLTZ: f64 = 1.75;
    // the diagonal stays unscaled, otherwise the guess is a multiple of the overlap matrix for
    // homonuclear diatomics and every orbital is degenerate
    let hamiltonian_eht = utils::symmetric_matrix(n_basis, |i, j| {
        if i == j {
            hamiltonian[(i, i)]
        } else {
            WOLFSBERG_HELMHOLTZ * overlap[(i, j)] * (hamiltonian[(i, i)] + hamiltonian[(j, j)]) / 2.0
        }
    });

    let transformed = &transform.transpose() * (hamiltonian_eht * transform);
    let (coeffs_prime, _orbital_energies) = utils::sorted_eigs(transformed);
    let coeffs = transform * coeffs_prime;

    compute_updated_density(&coeffs, n_basis, n_electrons)
}

fn compute_electronic_hamiltonian(
    density: &DMatrix<f64>,
    electron_terms: &[f64],
    n_basis: usize,
) -> DMatrix<f64> {
    utils::symmetric_matrix(n_basis, |i, j| {
        let mut sum = 0.0;
        for y in 0..n_basis {
            for x in 0..n_basis {
                sum += density[(x, y)]
                    * electron_terms[j * n_basis.pow(3) + i * n_basis.pow(2) + y * n_basis + x];
            }
        }
        sum
    })
}

fn compute_updated_density(
    coefficients: &DMatrix<f64>,
    n_basis: usize,
    n_electrons: usize,
) -> DMatrix<f64> {
    utils::symmetric_matrix(n_basis, |i, j| {
        let mut sum = 0.0;
        for k in 0..n_electrons / 2 {
            sum += coefficients[(i, k)] * coefficients[(j, k)]
        }
        2.0 * sum
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use crate::{
        atom::Atom,
        basis::BasisSet,
        error::ComputationError,
        hf::HartreeFockConfig,
        integrals::{AtomicIntegrals, McMurchieDavidson},
        molecule::Molecule,
        periodic_table::ElementType,
    };

    use super::restricted_hartree_fock;

    fn run(molecule: &Molecule) -> Result<super::RestrictedHartreeFockOutput, ComputationError> {
        let basis = BasisSet::sto3g().basis_for(molecule.atoms()).unwrap();
        let integrals = AtomicIntegrals::compute(&basis, molecule.atoms(), &McMurchieDavidson);
        restricted_hartree_fock(
            &integrals,
            molecule.n_electrons(),
            molecule.nuclear_repulsion(),
            &HartreeFockConfig::default(),
        )
    }

    #[test]
    fn hydrogen_at_textbook_geometry() {
        let output = run(&hydrogen_pair(1.4)).unwrap();

        // Szabo & Ostlund, section 3.5.2
        assert_relative_eq!(output.electronic_energy, -1.8310, epsilon = 1e-4);
        assert_relative_eq!(output.total_energy(), -1.1167, epsilon = 1e-4);
        assert_relative_eq!(output.orbital_energies[0], -0.578, epsilon = 1e-3);
        assert_relative_eq!(output.orbital_energies[1], 0.670, epsilon = 1e-3);
    }

    fn hydrogen_pair(separation: f64) -> Molecule {
        Molecule::new(vec![
            Atom::new(ElementType::Hydrogen, Vector3::zeros()),
            Atom::new(ElementType::Hydrogen, Vector3::new(0.0, 0.0, separation)),
        ])
    }

    #[test]
    fn stretched_hydrogen_converges() {
        const BOHR_PER_ANGSTROM: f64 = 1.0 / 0.529_177_21;

        // total energies of the symmetric determinant, in hartree
        for (angstrom, expected) in [(2.3, -0.730_353), (2.5, -0.702_943)] {
            let output = run(&hydrogen_pair(angstrom * BOHR_PER_ANGSTROM)).unwrap();
            assert_relative_eq!(output.total_energy(), expected, epsilon = 1e-4);
            assert!(output.orbital_energies[0] < output.orbital_energies[1]);
        }

        for step in 0..=14 {
            let separation = (0.3 + 0.2 * step as f64) * BOHR_PER_ANGSTROM;
            assert!(run(&hydrogen_pair(separation)).is_ok(), "{separation} bohr");
        }
    }

    #[test]
    fn hückel_guess_occupies_the_bonding_orbital() {
        let molecule = hydrogen_pair(4.5);
        let basis = BasisSet::sto3g().basis_for(molecule.atoms()).unwrap();
        let integrals = AtomicIntegrals::compute(&basis, molecule.atoms(), &McMurchieDavidson);
        let transform = super::compute_transformation_matrix(&integrals.overlap).unwrap();

        let density = super::compute_hückel_density(
            &integrals.core_hamiltonian(),
            &integrals.overlap,
            &transform,
            2,
            2,
        );
        assert_relative_eq!(density[(0, 0)], density[(1, 1)], epsilon = 1e-10);
        assert_relative_eq!(density[(0, 1)], density[(0, 0)], epsilon = 1e-10);
        assert!(density[(0, 1)] > 0.0);
    }

    #[test]
    fn helium_hydride_cation() {
        let molecule = Molecule::new(vec![
            Atom::new(ElementType::Helium, Vector3::zeros()),
            Atom::new(ElementType::Hydrogen, Vector3::new(0.0, 0.0, 1.4632)),
        ])
        .with_charge(1);
        let output = run(&molecule).unwrap();

        assert_relative_eq!(output.total_energy(), -2.8418, epsilon = 2e-3);
    }

    #[test]
    fn coinciding_nuclei_are_singular() {
        let molecule = Molecule::new(vec![
            Atom::new(ElementType::Hydrogen, Vector3::zeros()),
            Atom::new(ElementType::Hydrogen, Vector3::new(0.0, 0.0, 1e-9)),
        ]);

        assert!(matches!(
            run(&molecule),
            Err(ComputationError::SingularOverlap(_))
        ));
    }
}
