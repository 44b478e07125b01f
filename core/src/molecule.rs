use crate::atom::Atom;

/// Represents a molecule
#[derive(Debug, Clone)]
pub struct Molecule {
    pub(crate) atoms: Vec<Atom>,
    pub(crate) charge: i32,
}

impl Molecule {
    pub fn new(atoms: Vec<Atom>) -> Self {
        Self { atoms, charge: 0 }
    }

    pub fn with_charge(self, charge: i32) -> Self {
        Self { charge, ..self }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Returns the number of electrons of the (possibly charged) molecule
    pub fn n_electrons(&self) -> usize {
        let base_electron_count = self
            .atoms
            .iter()
            .map(|atom| atom.nuclear_charge() as usize)
            .sum::<usize>();

        base_electron_count.saturating_add_signed(-self.charge as isize)
    }

    /// Classical electrostatic repulsion between all pairs of nuclei, in hartree.
    pub fn nuclear_repulsion(&self) -> f64 {
        let n_atoms = self.atoms.len();

        let mut potential = 0.0;
        for atom_a in 0..n_atoms {
            for atom_b in atom_a + 1..n_atoms {
                potential += (self.atoms[atom_a].nuclear_charge()
                    * self.atoms[atom_b].nuclear_charge()) as f64
                    / (self.atoms[atom_b].position - self.atoms[atom_a].position).norm()
            }
        }
        potential
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use crate::{atom::Atom, periodic_table::ElementType};

    use super::Molecule;

    #[test]
    fn nuclear_repulsion_of_hydrogen_pair() {
        let molecule = Molecule::new(vec![
            Atom::new(ElementType::Hydrogen, Vector3::zeros()),
            Atom::new(ElementType::Hydrogen, Vector3::new(0.0, 0.0, 1.4)),
        ]);

        assert_relative_eq!(molecule.nuclear_repulsion(), 1.0 / 1.4);
        assert_eq!(molecule.n_electrons(), 2);
    }

    #[test]
    fn charge_removes_electrons() {
        let molecule = Molecule::new(vec![
            Atom::new(ElementType::Helium, Vector3::zeros()),
            Atom::new(ElementType::Hydrogen, Vector3::new(0.0, 0.0, 1.46)),
        ])
        .with_charge(1);

        assert_eq!(molecule.n_electrons(), 2);
        assert_relative_eq!(molecule.nuclear_repulsion(), 2.0 / 1.46);
    }
}
