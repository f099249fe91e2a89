//! Run configuration for a simulation.
//!
//! [`SimulationConfig`] carries the reference parameters by default. It can be
//! layered from a config file (format picked by extension) and `RANKFID_*`
//! environment variables, then checked with [`SimulationConfig::validate`].

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ATTRIBUTE_COUNT, DEFAULT_ATTRIBUTE_MEAN, DEFAULT_ATTRIBUTE_SD, DEFAULT_MIXED_WEIGHT,
    DEFAULT_POPULATION_SIZE, DEFAULT_SEED, DEFAULT_SLICES, ENV_PREFIX,
};
use crate::error::ConfigError;
use crate::types::{NoiseRegime, NoiseRule, SliceSpec};

/// Parameters of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of entities, fixed for the whole run.
    pub population_size: usize,
    /// Latent attributes per entity.
    pub attribute_count: usize,
    /// Target linear-scale mean of every attribute.
    pub attribute_mean: f64,
    /// Target linear-scale standard deviation of every attribute.
    pub attribute_sd: f64,
    /// Weight on the second sub-product of the `mixed` true rating.
    pub mixed_weight: f64,
    /// Seed of the run's random source.
    pub seed: u64,
    /// Noise regimes, each applied independently to the true matrix.
    pub regimes: Vec<NoiseRegime>,
    /// Population slices evaluated for every estimate.
    pub slices: Vec<SliceSpec>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE,
            attribute_count: DEFAULT_ATTRIBUTE_COUNT,
            attribute_mean: DEFAULT_ATTRIBUTE_MEAN,
            attribute_sd: DEFAULT_ATTRIBUTE_SD,
            mixed_weight: DEFAULT_MIXED_WEIGHT,
            seed: DEFAULT_SEED,
            regimes: NoiseRegime::reference_set(),
            slices: DEFAULT_SLICES
                .iter()
                .map(|&(name, fraction)| SliceSpec::new(name, fraction))
                .collect(),
        }
    }
}

fn positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl SimulationConfig {
    /// Load defaults, then `path` (if any), then `RANKFID_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::layered(path, true)
    }

    /// Load defaults overlaid with a single config file. The environment is ignored.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::layered(Some(path), false)
    }

    fn layered(path: Option<&Path>, with_env: bool) -> Result<Self, ConfigError> {
        let defaults = config::Config::try_from(&Self::default())
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        if with_env {
            builder = builder.add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let cfg: Self = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ConfigError::Load(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations the pipeline cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::Invalid(format!(
                "population_size must be at least 2, got {}",
                self.population_size
            )));
        }
        if self.attribute_count < 2 {
            return Err(ConfigError::Invalid(format!(
                "attribute_count must be at least 2, got {}",
                self.attribute_count
            )));
        }
        for (field, value) in [
            ("attribute_mean", self.attribute_mean),
            ("attribute_sd", self.attribute_sd),
            ("mixed_weight", self.mixed_weight),
        ] {
            if !positive_finite(value) {
                return Err(ConfigError::Invalid(format!(
                    "{field} must be positive and finite, got {value}"
                )));
            }
        }

        if self.regimes.is_empty() {
            return Err(ConfigError::Invalid("at least one noise regime is required".into()));
        }
        let mut names = HashSet::new();
        for regime in &self.regimes {
            if !names.insert(regime.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate noise regime name: {}",
                    regime.name
                )));
            }
            if let NoiseRule::Constant { sd } = regime.rule {
                if !positive_finite(sd) {
                    return Err(ConfigError::Invalid(format!(
                        "regime {} has non-positive sd {sd}",
                        regime.name
                    )));
                }
            }
        }

        if self.slices.is_empty() {
            return Err(ConfigError::Invalid("at least one population slice is required".into()));
        }
        let mut names = HashSet::new();
        for slice in &self.slices {
            if !names.insert(slice.name.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate slice name: {}", slice.name)));
            }
            if !(slice.fraction > 0.0 && slice.fraction <= 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "slice {} fraction must be in (0, 1], got {}",
                    slice.name, slice.fraction
                )));
            }
        }
        Ok(())
    }

    /// Regime names in configured order.
    pub fn regime_names(&self) -> Vec<&str> {
        self.regimes.iter().map(|r| r.name.as_str()).collect()
    }
}
