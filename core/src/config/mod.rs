mod basis_set;
pub mod geometry;

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

pub use geometry::{BasisSetName, DistanceUnit, MolecularGeometry};

use crate::{
    circuit::AnsatzConfig, error::ConfigurationError, hf::HartreeFockConfig, mapping::MapperKind,
    optimize::OptimizerConfig, vqe::InitialPoint,
};

/// Everything that determines how a ground state energy is estimated, apart from the
/// separation and the scaling factor themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimatorConfig {
    /// which basis set the two atoms are expanded in
    pub basis: BasisSetName,
    /// the unit separations are given in
    pub unit: DistanceUnit,
    /// the fermion-to-qubit transformation
    pub mapper: MapperKind,
    pub ansatz: AnsatzConfig,
    pub optimizer: OptimizerConfig,
    /// where the minimizer starts
    pub initial_point: InitialPoint,
    /// how many uniform starting points are minimized, the lowest result wins. Stretched
    /// bonds have local minima that a single start gets caught in.
    pub starting_points: usize,
    pub hartree_fock: HartreeFockConfig,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            basis: BasisSetName::default(),
            unit: DistanceUnit::default(),
            mapper: MapperKind::default(),
            ansatz: AnsatzConfig::default(),
            optimizer: OptimizerConfig::default(),
            initial_point: InitialPoint::default(),
            starting_points: 4,
            hartree_fock: HartreeFockConfig::default(),
        }
    }
}

impl EstimatorConfig {
    /// Reads a configuration from a json file. Missing fields take their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.optimizer.max_iterations() == 0 {
            return Err(ConfigurationError::ZeroIterationBudget("minimizer"));
        }
        if self.hartree_fock.max_iterations == 0 {
            return Err(ConfigurationError::ZeroIterationBudget("hartree fock solver"));
        }
        if self.starting_points == 0 {
            return Err(ConfigurationError::NoStartingPoints);
        }
        Ok(())
    }
}
