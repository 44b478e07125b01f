use std::path::PathBuf;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    atom::Atom, error::ConfigurationError, molecule::Molecule, periodic_table::ElementType,
};

/// One bohr, in angstrom
pub const BOHR_IN_ANGSTROM: f64 = 0.52917721092;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    #[default]
    Angstrom,
    Bohr,
}

impl DistanceUnit {
    pub fn to_bohr(self, distance: f64) -> f64 {
        match self {
            DistanceUnit::Angstrom => distance / BOHR_IN_ANGSTROM,
            DistanceUnit::Bohr => distance,
        }
    }
}

/// Identifies the basis set the atoms are expanded in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasisSetName {
    /// the built-in minimal basis
    #[default]
    #[serde(rename = "sto-3g")]
    Sto3g,
    /// a basis set exchange json file
    File(PathBuf),
}

/// Two hydrogen atoms on the z axis, the first at the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct MolecularGeometry {
    atoms: [Atom; 2],
    separation: f64,
    unit: DistanceUnit,
    basis: BasisSetName,
}

impl MolecularGeometry {
    pub fn hydrogen_pair(
        separation: f64,
        unit: DistanceUnit,
        basis: BasisSetName,
    ) -> Result<Self, ConfigurationError> {
        if !separation.is_finite() || separation <= 0.0 {
            return Err(ConfigurationError::InvalidSeparation(separation));
        }

        let separation_bohr = unit.to_bohr(separation);
        let atoms = [
            Atom::new(ElementType::Hydrogen, Vector3::zeros()),
            Atom::new(ElementType::Hydrogen, Vector3::new(0.0, 0.0, separation_bohr)),
        ];

        Ok(Self {
            atoms,
            separation,
            unit,
            basis,
        })
    }

    /// The separation in the unit it was given in
    pub fn separation(&self) -> f64 {
        self.separation
    }

    pub fn separation_bohr(&self) -> f64 {
        self.unit.to_bohr(self.separation)
    }

    pub fn unit(&self) -> DistanceUnit {
        self.unit
    }

    pub fn basis(&self) -> &BasisSetName {
        &self.basis
    }

    pub fn atoms(&self) -> &[Atom; 2] {
        &self.atoms
    }

    pub fn molecule(&self) -> Molecule {
        Molecule::new(self.atoms.to_vec())
    }
}
