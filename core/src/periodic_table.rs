/// The elements that basis sets can be loaded for. The discriminant is the atomic number.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum ElementType {
    Hydrogen = 1,
    Helium,
    Lithium,
    Beryllium,
    Boron,
    Carbon,
    Nitrogen,
    Oxygen,
    Fluorine,
    Neon,
}

impl ElementType {
    const ALL: [ElementType; 10] = [
        ElementType::Hydrogen,
        ElementType::Helium,
        ElementType::Lithium,
        ElementType::Beryllium,
        ElementType::Boron,
        ElementType::Carbon,
        ElementType::Nitrogen,
        ElementType::Oxygen,
        ElementType::Fluorine,
        ElementType::Neon,
    ];

    pub fn atomic_number(self) -> u32 {
        self as u32
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ElementType::Hydrogen => "H",
            ElementType::Helium => "He",
            ElementType::Lithium => "Li",
            ElementType::Beryllium => "Be",
            ElementType::Boron => "B",
            ElementType::Carbon => "C",
            ElementType::Nitrogen => "N",
            ElementType::Oxygen => "O",
            ElementType::Fluorine => "F",
            ElementType::Neon => "Ne",
        }
    }
}

impl TryFrom<u32> for ElementType {
    type Error = u32;

    fn try_from(atomic_number: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|element| element.atomic_number() == atomic_number)
            .ok_or(atomic_number)
    }
}
