//! Combination of noisy observations into estimates.
//!
//! Every (regime, rule) pair yields its own estimate series and ranking.

use rankfid_core::error::SimError;
use rankfid_core::traits::RowScorer;
use rankfid_core::types::{CombinationRule, Estimate, NoisyMatrix, ensure_positive_series};
use tracing::{debug, info};

use crate::ranking::rank_descending;

/// Estimate every entity's rating from one noisy matrix.
pub fn aggregate(noisy: &NoisyMatrix, rule: CombinationRule) -> Result<Estimate, SimError> {
    noisy.matrix.ensure_positive("aggregate")?;
    let values = rule.score_rows(&noisy.matrix);
    ensure_positive_series("aggregate", &values)?;
    let ranking = rank_descending(&values)?;
    debug!(regime = %noisy.regime.name, rule = rule.label(), "aggregate: estimate ranked");
    Ok(Estimate {
        regime: noisy.regime.name.clone(),
        rule,
        values,
        ranking,
    })
}

/// Every (regime, rule) combination, regime-major.
pub fn aggregate_all(
    noisy: &[NoisyMatrix],
    rules: &[CombinationRule],
) -> Result<Vec<Estimate>, SimError> {
    let mut estimates = Vec::with_capacity(noisy.len() * rules.len());
    for matrix in noisy {
        for &rule in rules {
            estimates.push(aggregate(matrix, rule)?);
        }
    }
    info!(estimates = estimates.len(), "aggregate: all estimates ranked");
    Ok(estimates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankfid_core::error::PhaseError;
    use rankfid_core::types::{AttributeMatrix, NoiseRegime};

    fn noisy(values: Vec<f64>, rows: usize, cols: usize) -> NoisyMatrix {
        NoisyMatrix {
            regime: NoiseRegime::constant(0.25),
            matrix: AttributeMatrix::from_row_major(rows, cols, values).unwrap(),
        }
    }

    #[test]
    fn sum_and_product_can_disagree() {
        // Row 0: sum 5.5, product 2.5; row 1: sum 4, product 4.
        let n = noisy(vec![5.0, 0.5, 2.0, 2.0], 2, 2);
        let sum = aggregate(&n, CombinationRule::Sum).unwrap();
        let product = aggregate(&n, CombinationRule::Product).unwrap();
        assert_eq!(sum.values, vec![5.5, 4.0]);
        assert_eq!(product.values, vec![2.5, 4.0]);
        assert_eq!(sum.ranking.order(), &[0, 1]);
        assert_eq!(product.ranking.order(), &[1, 0]);
        assert_eq!(sum.regime, "constant-0.25");
    }

    #[test]
    fn aggregate_all_covers_every_pair() {
        let a = noisy(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let b = NoisyMatrix {
            regime: NoiseRegime::constant(1.0),
            ..a.clone()
        };
        let all = aggregate_all(&[a, b], &CombinationRule::ALL).unwrap();
        let keys: Vec<(&str, CombinationRule)> =
            all.iter().map(|e| (e.regime.as_str(), e.rule)).collect();
        assert_eq!(
            keys,
            vec![
                ("constant-0.25", CombinationRule::Sum),
                ("constant-0.25", CombinationRule::Product),
                ("constant-1", CombinationRule::Sum),
                ("constant-1", CombinationRule::Product),
            ]
        );
    }

    #[test]
    fn overflowing_product_is_fatal() {
        let n = noisy(vec![1e200, 1e200], 1, 2);
        let err = aggregate(&n, CombinationRule::Product).unwrap_err();
        assert!(matches!(err, SimError::Phase(PhaseError::InvalidScalar { .. })));
    }
}
