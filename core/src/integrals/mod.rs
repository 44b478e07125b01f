pub mod electron_tensor;
pub mod mmd;
mod utils;

pub use electron_tensor::ElectronTensor;
pub use mmd::McMurchieDavidson;

use nalgebra::DMatrix;

use crate::{atom::Atom, basis::BasisFunction, hf::utils::symmetric_matrix};

pub type DefaultIntegrator = McMurchieDavidson;

pub trait Integrator {
    type Function;

    /// Calculate the overlap integral between two basis functions.
    fn overlap(&self, functions: (&Self::Function, &Self::Function)) -> f64;

    /// Calculate the kinetic energy integral between two basis functions.
    fn kinetic(&self, functions: (&Self::Function, &Self::Function)) -> f64;

    /// Calculate the nuclear attraction integral between two basis functions and the nuclei of a quantum system.
    fn nuclear(&self, functions: (&Self::Function, &Self::Function), nuclei: &[Atom]) -> f64;

    /// Calculate the electron-electron repulsion integral between four basis functions.
    fn electron_repulsion(
        &self,
        functions: (
            &Self::Function,
            &Self::Function,
            &Self::Function,
            &Self::Function,
        ),
    ) -> f64;
}

/// All one- and two-electron integrals over an atomic orbital basis
pub struct AtomicIntegrals {
    pub overlap: DMatrix<f64>,
    pub kinetic: DMatrix<f64>,
    pub nuclear: DMatrix<f64>,
    pub electron: ElectronTensor,
}

impl AtomicIntegrals {
    pub fn compute(
        basis: &[BasisFunction],
        nuclei: &[Atom],
        integrator: &(impl Integrator<Function = BasisFunction> + Sync),
    ) -> Self {
        let overlap = compute_overlap_matrix(basis, integrator);
        log::debug!("overlap matrix: {overlap:0.4}");
        let kinetic = compute_kinetic_matrix(basis, integrator);
        log::debug!("kinetic matrix: {kinetic:0.4}");
        let nuclear = compute_nuclear_matrix(basis, nuclei, integrator);
        log::debug!("nuclear matrix: {nuclear:0.4}");
        let electron = ElectronTensor::from_basis(basis, integrator);

        Self {
            overlap,
            kinetic,
            nuclear,
            electron,
        }
    }

    pub fn n_basis(&self) -> usize {
        self.overlap.nrows()
    }

    pub fn core_hamiltonian(&self) -> DMatrix<f64> {
        &self.kinetic + &self.nuclear
    }
}

pub fn compute_overlap_matrix(
    basis: &[BasisFunction],
    integrator: &impl Integrator<Function = BasisFunction>,
) -> DMatrix<f64> {
    symmetric_matrix(basis.len(), |i, j| {
        let overlap_ij = integrator.overlap((&basis[i], &basis[j]));
        log::trace!("overlap ({i}{j}) = {overlap_ij}");
        overlap_ij
    })
}

pub fn compute_kinetic_matrix(
    basis: &[BasisFunction],
    integrator: &impl Integrator<Function = BasisFunction>,
) -> DMatrix<f64> {
    symmetric_matrix(basis.len(), |i, j| {
        let kinetic_ij = integrator.kinetic((&basis[i], &basis[j]));
        log::trace!("kinetic ({i}{j}) = {kinetic_ij}");
        kinetic_ij
    })
}

pub fn compute_nuclear_matrix(
    basis: &[BasisFunction],
    nuclei: &[Atom],
    integrator: &impl Integrator<Function = BasisFunction>,
) -> DMatrix<f64> {
    symmetric_matrix(basis.len(), |i, j| {
        let nuclear_ij = integrator.nuclear((&basis[i], &basis[j]), nuclei);
        log::trace!("nuclear ({i}{j}) = {nuclear_ij}");
        nuclear_ij
    })
}
