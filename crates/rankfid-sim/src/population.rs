//! Synthetic population of latent attributes.
//!
//! Every cell of the `N x K` matrix is an independent draw from one
//! log-normal distribution, moment-matched once to the target mean and sd.
//! Cells are drawn in row-major order, so a seed fixes the whole matrix.

use rand::Rng;
use rand_distr::Distribution;
use rankfid_core::config::SimulationConfig;
use rankfid_core::error::{PhaseError, SimError};
use rankfid_core::types::AttributeMatrix;
use tracing::info;

use crate::lognormal::LogNormalParams;

#[derive(Debug, Clone)]
pub struct PopulationGenerator {
    entities: usize,
    attributes: usize,
    params: LogNormalParams,
}

impl PopulationGenerator {
    pub fn new(entities: usize, attributes: usize, mean: f64, sd: f64) -> Result<Self, SimError> {
        if entities == 0 || attributes == 0 {
            return Err(PhaseError::Empty {
                phase: "population",
            }
            .into());
        }
        let params = LogNormalParams::from_moments(mean, sd)?;
        Ok(Self {
            entities,
            attributes,
            params,
        })
    }

    pub fn from_config(cfg: &SimulationConfig) -> Result<Self, SimError> {
        Self::new(
            cfg.population_size,
            cfg.attribute_count,
            cfg.attribute_mean,
            cfg.attribute_sd,
        )
    }

    pub fn params(&self) -> LogNormalParams {
        self.params
    }

    /// Draw the full attribute matrix.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<AttributeMatrix, SimError> {
        let dist = self.params.distribution()?;
        let cells = self.entities * self.attributes;
        let values: Vec<f64> = (0..cells).map(|_| dist.sample(&mut *rng)).collect();

        let matrix = AttributeMatrix::from_row_major(self.entities, self.attributes, values)?;
        matrix.ensure_positive("population")?;
        info!(
            entities = self.entities,
            attributes = self.attributes,
            location = self.params.location,
            scale = self.params.scale,
            "population: generated"
        );
        Ok(matrix)
    }
}
