//! Addressable table of accuracy results.
//!
//! One cell per (definition, regime, rule, slice). Missing statistics are
//! `None`: the slice was too small or had no spread.

use serde::{Deserialize, Serialize};

use crate::types::{CombinationRule, TruthDefinition};

/// Accuracy statistics over one population slice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliceMetrics {
    /// Number of entities in the slice.
    pub members: usize,
    /// Sample standard deviation of `true_rank - estimated_rank`.
    pub rank_error_sd: Option<f64>,
    /// Pearson correlation of `ln(estimate)` with `ln(true_rating)`.
    pub log_correlation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationCell {
    pub definition: TruthDefinition,
    pub regime: String,
    pub rule: CombinationRule,
    pub slice: String,
    #[serde(flatten)]
    pub metrics: SliceMetrics,
}

impl EvaluationCell {
    fn matches(&self, definition: TruthDefinition, regime: &str, rule: CombinationRule, slice: &str) -> bool {
        self.definition == definition && self.rule == rule && self.regime == regime && self.slice == slice
    }
}

/// Every evaluation cell of a run, in the order (definition, regime, rule, slice)
/// the evaluator produced them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationTable {
    cells: Vec<EvaluationCell>,
}

impl EvaluationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cell: EvaluationCell) {
        self.cells.push(cell);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[EvaluationCell] {
        &self.cells
    }

    /// Look up one cell by its full key.
    pub fn get(
        &self,
        definition: TruthDefinition,
        regime: &str,
        rule: CombinationRule,
        slice: &str,
    ) -> Option<&EvaluationCell> {
        self.cells
            .iter()
            .find(|c| c.matches(definition, regime, rule, slice))
    }

    /// Shorthand for the metrics of a cell.
    pub fn metrics(
        &self,
        definition: TruthDefinition,
        regime: &str,
        rule: CombinationRule,
        slice: &str,
    ) -> Option<SliceMetrics> {
        self.get(definition, regime, rule, slice).map(|c| c.metrics)
    }

    /// All slices of one (definition, regime, rule) row, in slice order.
    pub fn row<'a>(
        &'a self,
        definition: TruthDefinition,
        regime: &'a str,
        rule: CombinationRule,
    ) -> impl Iterator<Item = &'a EvaluationCell> + 'a {
        self.cells
            .iter()
            .filter(move |c| c.definition == definition && c.rule == rule && c.regime == regime)
    }
}
