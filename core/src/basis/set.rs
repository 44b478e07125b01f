use std::collections::HashMap;

use crate::{atom::Atom, error::ConfigurationError, periodic_table::ElementType};

use super::{BasisFunction, ContractedGaussian};

#[derive(Debug, Clone)]
pub struct BasisSet {
    name: String,
    atomic_mapping: HashMap<ElementType, AtomicBasis>,
}

impl BasisSet {
    /// Returns the basis of a given atom, if it exists.
    pub fn for_atom(&self, atom: &Atom) -> Option<&AtomicBasis> {
        self.atomic_mapping.get(&atom.element_type)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Places the basis functions of every atom at its nucleus.
    pub fn basis_for(&self, atoms: &[Atom]) -> Result<Vec<BasisFunction>, ConfigurationError> {
        let mut basis = Vec::new();
        for atom in atoms {
            let atomic_basis = self
                .for_atom(atom)
                .ok_or(ConfigurationError::MissingBasis(atom.element_type))?;

            basis.extend(
                atomic_basis
                    .basis_functions()
                    .map(|contracted_gaussian| BasisFunction {
                        contracted_gaussian: contracted_gaussian.clone(),
                        position: atom.position,
                    }),
            );
        }
        Ok(basis)
    }

    /// Create a new basis set given mappings from element type to the basis of that element
    pub(crate) fn new(
        name: impl Into<String>,
        atomic_mapping: HashMap<ElementType, AtomicBasis>,
    ) -> Self {
        Self {
            name: name.into(),
            atomic_mapping,
        }
    }
}

/// Represents the basis functions for a single atom.
#[derive(Debug, Clone)]
pub struct AtomicBasis {
    pub(crate) shells: Vec<ElectronShell>,
}

impl AtomicBasis {
    pub(crate) fn empty() -> Self {
        Self { shells: Vec::new() }
    }

    pub fn basis_functions(&self) -> impl Iterator<Item = &ContractedGaussian> {
        self.shells.iter().flat_map(|shell| &shell.basis_functions)
    }
}

#[derive(Debug, Clone)]
#[allow(unused)]
pub(crate) struct ElectronShell {
    pub(crate) angular_magnitude: i32,
    pub(crate) basis_functions: Vec<ContractedGaussian>,
}

impl ElectronShell {
    pub(crate) fn new(angular_magnitude: i32) -> Self {
        Self {
            angular_magnitude,
            basis_functions: Vec::new(),
        }
    }
}
