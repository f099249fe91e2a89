//! Ground-truth ratings composed from the latent attributes.
//!
//! - `product`: product of all `K` attributes.
//! - `mixed`: product of the first `ceil(K/2)` attributes plus `weight` times
//!   the product of the remaining ones.
//!
//! All definitions read the same matrix so their results compare on one population.

use rankfid_core::error::SimError;
use rankfid_core::traits::RowScorer;
use rankfid_core::types::{AttributeMatrix, TrueRating, TruthDefinition, ensure_positive_series};
use tracing::{debug, info};

use crate::ranking::rank_descending;

/// Index where the `mixed` definition splits a row of `attributes` values.
pub fn mixed_split(attributes: usize) -> usize {
    attributes.div_ceil(2)
}

/// A [`TruthDefinition`] bound to the weight the `mixed` rating needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruthScorer {
    pub definition: TruthDefinition,
    pub mixed_weight: f64,
}

impl TruthScorer {
    pub fn new(definition: TruthDefinition, mixed_weight: f64) -> Self {
        Self {
            definition,
            mixed_weight,
        }
    }
}

impl RowScorer for TruthScorer {
    fn label(&self) -> &'static str {
        self.definition.name()
    }

    fn score(&self, row: &[f64]) -> f64 {
        match self.definition {
            TruthDefinition::Product => row.iter().product(),
            TruthDefinition::Mixed => {
                let (head, tail) = row.split_at(mixed_split(row.len()));
                head.iter().product::<f64>() + self.mixed_weight * tail.iter().product::<f64>()
            }
        }
    }
}

/// True rating and ranking of every entity under one definition.
pub fn compose(
    matrix: &AttributeMatrix,
    definition: TruthDefinition,
    mixed_weight: f64,
) -> Result<TrueRating, SimError> {
    matrix.ensure_positive("truth")?;
    let scorer = TruthScorer::new(definition, mixed_weight);
    let values = scorer.score_rows(matrix);
    ensure_positive_series("truth", &values)?;
    let ranking = rank_descending(&values)?;
    debug!(definition = scorer.label(), entities = values.len(), "truth: composed");
    Ok(TrueRating {
        definition,
        values,
        ranking,
    })
}

/// Compose every registered definition from the same matrix.
pub fn compose_all(
    matrix: &AttributeMatrix,
    definitions: &[TruthDefinition],
    mixed_weight: f64,
) -> Result<Vec<TrueRating>, SimError> {
    let ratings = definitions
        .iter()
        .map(|&definition| compose(matrix, definition, mixed_weight))
        .collect::<Result<Vec<_>, _>>()?;
    info!(definitions = ratings.len(), "truth: all definitions composed");
    Ok(ratings)
}
