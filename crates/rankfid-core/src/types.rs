//! Core data types: attribute matrices, rankings, noise regimes, rating rules.
//!
//! Every type here is produced once by a pipeline phase and then only read.
//! Later phases allocate new values instead of mutating earlier ones.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::CONSTANT_NOISE_SDS;
use crate::error::PhaseError;

// ------------------------------------------------------------------
// AttributeMatrix
// ------------------------------------------------------------------

/// Row-major `entities x attributes` matrix of linear-scale values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl AttributeMatrix {
    /// Wrap a row-major buffer. Fails if the buffer does not hold `rows * cols` cells
    /// or either dimension is zero.
    pub fn from_row_major(rows: usize, cols: usize, values: Vec<f64>) -> Result<Self, PhaseError> {
        if rows == 0 || cols == 0 {
            return Err(PhaseError::Empty { phase: "matrix" });
        }
        let expected = rows * cols;
        if values.len() != expected {
            return Err(PhaseError::ShapeMismatch {
                phase: "matrix",
                expected,
                got: values.len(),
            });
        }
        Ok(Self { rows, cols, values })
    }

    /// Number of entities.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of attributes per entity.
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, entity: usize, attribute: usize) -> f64 {
        self.values[entity * self.cols + attribute]
    }

    /// All attribute values of one entity.
    pub fn row(&self, entity: usize) -> &[f64] {
        let start = entity * self.cols;
        &self.values[start..start + self.cols]
    }

    pub fn iter_rows(&self) -> std::slice::ChunksExact<'_, f64> {
        self.values.chunks_exact(self.cols)
    }

    /// One attribute across all entities.
    pub fn column(&self, attribute: usize) -> Vec<f64> {
        self.iter_rows().map(|row| row[attribute]).collect()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Check that every cell is finite and strictly positive.
    pub fn ensure_positive(&self, phase: &'static str) -> Result<(), PhaseError> {
        for (idx, &value) in self.values.iter().enumerate() {
            if !(value.is_finite() && value > 0.0) {
                return Err(PhaseError::NonPositiveCell {
                    phase,
                    entity: idx / self.cols,
                    attribute: idx % self.cols,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Check that every element of a per-entity series is finite and strictly positive.
pub fn ensure_positive_series(phase: &'static str, values: &[f64]) -> Result<(), PhaseError> {
    if values.is_empty() {
        return Err(PhaseError::Empty { phase });
    }
    match values
        .iter()
        .position(|v| !(v.is_finite() && *v > 0.0))
    {
        Some(entity) => Err(PhaseError::InvalidScalar {
            phase,
            entity,
            value: values[entity],
        }),
        None => Ok(()),
    }
}

// ------------------------------------------------------------------
// Ranking
// ------------------------------------------------------------------

/// Descending ranking of a scalar series.
///
/// `order[0]` is the entity with the largest value. `ranks[e]` is the 1-based
/// rank of entity `e`; tied values share the average of the positions they span.
/// Within a tie, `order` lists entities by ascending index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    order: Vec<usize>,
    ranks: Vec<f64>,
}

impl Ranking {
    /// Assemble a ranking from its permutation and per-entity ranks.
    pub fn new(order: Vec<usize>, ranks: Vec<f64>) -> Result<Self, PhaseError> {
        if order.len() != ranks.len() {
            return Err(PhaseError::ShapeMismatch {
                phase: "ranking",
                expected: order.len(),
                got: ranks.len(),
            });
        }
        Ok(Self { order, ranks })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entities from best to worst.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Rank of every entity, indexed by entity.
    pub fn ranks(&self) -> &[f64] {
        &self.ranks
    }

    pub fn rank_of(&self, entity: usize) -> f64 {
        self.ranks[entity]
    }

    /// The `count` best entities (clamped to the population size).
    pub fn top(&self, count: usize) -> &[usize] {
        &self.order[..count.min(self.order.len())]
    }
}

// ------------------------------------------------------------------
// Noise regimes
// ------------------------------------------------------------------

/// How the linear-scale noise standard deviation depends on the true value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum NoiseRule {
    /// `sd = 1 / v`
    InverseProportional,
    /// `sd = sqrt(v)`
    SqrtProportional,
    /// `sd = v`. Matches the historical worked formula for the square-root
    /// regime, where `(v^0.5)^2` collapses back to `v`.
    Proportional,
    /// `sd` fixed regardless of `v`.
    Constant { sd: f64 },
}

impl NoiseRule {
    /// Linear-scale noise standard deviation for an attribute with true value `true_value`.
    pub fn sd_for(&self, true_value: f64) -> f64 {
        match *self {
            NoiseRule::InverseProportional => 1.0 / true_value,
            NoiseRule::SqrtProportional => true_value.sqrt(),
            NoiseRule::Proportional => true_value,
            NoiseRule::Constant { sd } => sd,
        }
    }
}

/// A named noise rule. Names address regimes in the evaluation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseRegime {
    pub name: String,
    #[serde(flatten)]
    pub rule: NoiseRule,
}

impl NoiseRegime {
    pub fn new(name: impl Into<String>, rule: NoiseRule) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }

    pub fn inverse_proportional() -> Self {
        Self::new("inverse-proportional", NoiseRule::InverseProportional)
    }

    pub fn sqrt_proportional() -> Self {
        Self::new("sqrt-proportional", NoiseRule::SqrtProportional)
    }

    /// Constant regime named after its sd, e.g. `constant-0.25`.
    pub fn constant(sd: f64) -> Self {
        Self::new(format!("constant-{sd}"), NoiseRule::Constant { sd })
    }

    /// The five regimes of the reference study.
    ///
    /// ```
    /// use rankfid_core::types::NoiseRegime;
    /// let names: Vec<String> = NoiseRegime::reference_set().into_iter().map(|r| r.name).collect();
    /// assert_eq!(
    ///     names,
    ///     ["inverse-proportional", "sqrt-proportional", "constant-0.125", "constant-0.25", "constant-1"]
    /// );
    /// ```
    pub fn reference_set() -> Vec<Self> {
        let mut regimes = vec![Self::inverse_proportional(), Self::sqrt_proportional()];
        regimes.extend(CONSTANT_NOISE_SDS.iter().map(|&sd| Self::constant(sd)));
        regimes
    }

    pub fn sd_for(&self, true_value: f64) -> f64 {
        self.rule.sd_for(true_value)
    }
}

// ------------------------------------------------------------------
// Rating rules
// ------------------------------------------------------------------

/// How the latent attributes combine into the ground-truth rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TruthDefinition {
    /// Product of all attributes.
    Product,
    /// Product of the first half plus a weighted product of the second half.
    Mixed,
}

impl TruthDefinition {
    pub const ALL: [TruthDefinition; 2] = [TruthDefinition::Product, TruthDefinition::Mixed];

    pub fn name(&self) -> &'static str {
        match self {
            TruthDefinition::Product => "product",
            TruthDefinition::Mixed => "mixed",
        }
    }
}

impl fmt::Display for TruthDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How noisy attribute observations combine into an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CombinationRule {
    Sum,
    Product,
}

impl CombinationRule {
    pub const ALL: [CombinationRule; 2] = [CombinationRule::Sum, CombinationRule::Product];

    pub fn name(&self) -> &'static str {
        match self {
            CombinationRule::Sum => "sum",
            CombinationRule::Product => "product",
        }
    }
}

impl fmt::Display for CombinationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ------------------------------------------------------------------
// Population slices
// ------------------------------------------------------------------

/// The top `fraction` of entities by true rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceSpec {
    pub name: String,
    pub fraction: f64,
}

impl SliceSpec {
    pub fn new(name: impl Into<String>, fraction: f64) -> Self {
        Self {
            name: name.into(),
            fraction,
        }
    }

    /// Number of members in a population of `population` entities: `ceil(fraction * population)`.
    ///
    /// ```
    /// use rankfid_core::types::SliceSpec;
    /// assert_eq!(SliceSpec::new("top-1pct", 0.01).member_count(10_000), 100);
    /// assert_eq!(SliceSpec::new("top-10pct", 0.10).member_count(15), 2);
    /// ```
    pub fn member_count(&self, population: usize) -> usize {
        // Absorb representation error so that 0.1 * 1000 does not round up to 101.
        let raw = self.fraction * population as f64 - 1e-9;
        (raw.ceil().max(0.0) as usize).min(population)
    }
}

// ------------------------------------------------------------------
// Phase outputs
// ------------------------------------------------------------------

/// Ground-truth rating of every entity under one definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrueRating {
    pub definition: TruthDefinition,
    pub values: Vec<f64>,
    pub ranking: Ranking,
}

/// Noisy observation of the full attribute matrix under one regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoisyMatrix {
    pub regime: NoiseRegime,
    pub matrix: AttributeMatrix,
}

/// Aggregated estimate for one (regime, rule) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub regime: String,
    pub rule: CombinationRule,
    pub values: Vec<f64>,
    pub ranking: Ranking,
}
