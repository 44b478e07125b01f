use std::{collections::HashMap, fs::File, io::BufReader, path::Path};

use serde::Deserialize;
use smallvec::SmallVec;

use crate::{
    basis::{AtomicBasis, BasisSet, ContractedGaussian, ElectronShell, Gaussian},
    error::ConfigurationError,
    periodic_table::ElementType,
};

/// A basis set in the json format of the Basis Set Exchange.
#[derive(Deserialize)]
struct ConfigBasisSet {
    #[serde(default)]
    name: Option<String>,
    /// keyed by atomic number
    elements: HashMap<String, ConfigElectronicConfiguration>,
}

#[derive(Deserialize)]
struct ConfigElectronicConfiguration {
    electron_shells: Vec<ConfigElectronShell>,
}

#[derive(Deserialize)]
#[allow(unused)]
struct ConfigElectronShell {
    function_type: String,
    angular_momentum: Vec<i32>,
    exponents: Vec<String>,
    coefficients: Vec<Vec<String>>,
}

impl BasisSet {
    /// Loads a basis set exchange json file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let reader = BufReader::new(File::open(path)?);
        let config: ConfigBasisSet = serde_json::from_reader(reader)?;
        config.try_into()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let config: ConfigBasisSet = serde_json::from_str(json)?;
        config.try_into()
    }
}

impl TryFrom<ConfigBasisSet> for BasisSet {
    type Error = ConfigurationError;

    fn try_from(value: ConfigBasisSet) -> Result<Self, Self::Error> {
        let mut atomic_mapping = HashMap::with_capacity(value.elements.len());

        for (atomic_number, configuration) in value.elements {
            let element = parse_element(&atomic_number)?;
            let mut element_atomic_basis = AtomicBasis::empty();

            for electron_shell in &configuration.electron_shells {
                let exponents = electron_shell
                    .exponents
                    .iter()
                    .map(|exponent| parse_number(exponent))
                    .collect::<Result<Vec<_>, _>>()?;

                if electron_shell.coefficients.len() != electron_shell.angular_momentum.len() {
                    return Err(ConfigurationError::BasisSet(format!(
                        "shell of element {atomic_number} has {} angular momenta but {} coefficient sets",
                        electron_shell.angular_momentum.len(),
                        electron_shell.coefficients.len()
                    )));
                }

                for (&angular_magnitude, coefficients) in electron_shell
                    .angular_momentum
                    .iter()
                    .zip(&electron_shell.coefficients)
                {
                    if coefficients.len() != exponents.len() {
                        return Err(ConfigurationError::BasisSet(format!(
                            "shell of element {atomic_number} has {} exponents but {} coefficients",
                            exponents.len(),
                            coefficients.len()
                        )));
                    }

                    let mut shell = ElectronShell::new(angular_magnitude);

                    for angular in generate_angular_vectors(angular_magnitude) {
                        let mut primitives = SmallVec::with_capacity(exponents.len());

                        for (&exponent, coefficient) in exponents.iter().zip(coefficients) {
                            let coefficient = parse_number(coefficient)?;
                            primitives.push(Gaussian::normalized(exponent, coefficient, angular));
                        }

                        shell.basis_functions.push(ContractedGaussian(primitives));
                    }

                    element_atomic_basis.shells.push(shell);
                }
            }

            atomic_mapping.insert(element, element_atomic_basis);
        }

        Ok(Self::new(
            value.name.unwrap_or_else(|| "custom".to_owned()),
            atomic_mapping,
        ))
    }
}

fn parse_element(atomic_number: &str) -> Result<ElementType, ConfigurationError> {
    atomic_number
        .parse::<u32>()
        .ok()
        .and_then(|number| ElementType::try_from(number).ok())
        .ok_or_else(|| ConfigurationError::BasisSet(format!("unknown element '{atomic_number}'")))
}

fn parse_number(number: &str) -> Result<f64, ConfigurationError> {
    // some exchange formats write fortran style exponents
    number
        .replace(['D', 'd'], "E")
        .parse::<f64>()
        .map_err(|err| ConfigurationError::BasisSet(format!("'{number}': {err}")))
}

// generate all (i, j, k) such that i + j + k = angular
fn generate_angular_vectors(angular_magnitude: i32) -> Vec<(i32, i32, i32)> {
    let mut angular_vectors = Vec::with_capacity(8);

    for (i, j, k) in itertools::iproduct!(
        0..=angular_magnitude,
        0..=angular_magnitude,
        0..=angular_magnitude
    ) {
        if i + j + k == angular_magnitude {
            angular_vectors.push((i, j, k));
        }
    }

    angular_vectors
}
