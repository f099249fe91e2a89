//! Accuracy evaluation of estimates against ground truth.
//!
//! For each (definition, regime, rule, slice) the evaluator reports the sample
//! sd of `true_rank - estimated_rank` and the Pearson correlation of
//! `ln(estimate)` with `ln(true_rating)`. Slice members are the top entities of
//! the true ranking, so every estimator is judged on the same group.
//!
//! A slice too small (or too flat) for a statistic yields `None` for that
//! statistic only. Any other failure aborts the evaluation.

use rankfid_core::error::{PhaseError, SimError, SliceError};
use rankfid_core::table::{EvaluationCell, EvaluationTable, SliceMetrics};
use rankfid_core::types::{Estimate, SliceSpec, TrueRating};
use tracing::{info, warn};

use crate::stats::{pearson, sample_sd};

/// Entities of `slice`, taken from the top of the true ranking.
pub fn slice_members<'a>(truth: &'a TrueRating, slice: &SliceSpec) -> &'a [usize] {
    truth
        .ranking
        .top(slice.member_count(truth.ranking.len()))
}

/// Map a locally recoverable slice failure to a missing value.
fn recover(
    result: Result<f64, SliceError>,
    stat: &'static str,
    slice: &SliceSpec,
) -> Result<Option<f64>, SimError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e @ (SliceError::Degenerate { .. } | SliceError::ZeroVariance { .. })) => {
            warn!(slice = %slice.name, stat, error = %e, "evaluate: statistic missing");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Metrics of one estimate over one slice.
pub fn evaluate_slice(
    truth: &TrueRating,
    estimate: &Estimate,
    slice: &SliceSpec,
) -> Result<SliceMetrics, SimError> {
    let population = truth.values.len();
    if estimate.values.len() != population {
        return Err(PhaseError::ShapeMismatch {
            phase: "evaluate",
            expected: population,
            got: estimate.values.len(),
        }
        .into());
    }

    let members = slice_members(truth, slice);
    let rank_errors: Vec<f64> = members
        .iter()
        .map(|&e| truth.ranking.rank_of(e) - estimate.ranking.rank_of(e))
        .collect();
    let log_truth: Vec<f64> = members.iter().map(|&e| truth.values[e].ln()).collect();
    let log_estimate: Vec<f64> = members.iter().map(|&e| estimate.values[e].ln()).collect();

    let rank_error_sd = recover(sample_sd(&rank_errors), "rank_error_sd", slice)?;
    let log_correlation = recover(pearson(&log_estimate, &log_truth), "log_correlation", slice)?;

    for value in [rank_error_sd, log_correlation].into_iter().flatten() {
        if !value.is_finite() {
            return Err(PhaseError::InvalidScalar {
                phase: "evaluate",
                entity: members.first().copied().unwrap_or(0),
                value,
            }
            .into());
        }
    }

    Ok(SliceMetrics {
        members: members.len(),
        rank_error_sd,
        log_correlation,
    })
}

/// Evaluate every (definition, estimate, slice) combination.
///
/// Cells are ordered by definition, then estimate (regime-major), then slice.
pub fn evaluate(
    truths: &[TrueRating],
    estimates: &[Estimate],
    slices: &[SliceSpec],
) -> Result<EvaluationTable, SimError> {
    let mut table = EvaluationTable::new();
    for truth in truths {
        for estimate in estimates {
            for slice in slices {
                let metrics = evaluate_slice(truth, estimate, slice)?;
                table.push(EvaluationCell {
                    definition: truth.definition,
                    regime: estimate.regime.clone(),
                    rule: estimate.rule,
                    slice: slice.name.clone(),
                    metrics,
                });
            }
        }
    }
    info!(cells = table.len(), "evaluate: table complete");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::rank_descending;
    use rankfid_core::types::{CombinationRule, TruthDefinition};

    fn truth(values: Vec<f64>) -> TrueRating {
        let ranking = rank_descending(&values).unwrap();
        TrueRating {
            definition: TruthDefinition::Product,
            values,
            ranking,
        }
    }

    fn estimate(values: Vec<f64>) -> Estimate {
        let ranking = rank_descending(&values).unwrap();
        Estimate {
            regime: "r".into(),
            rule: CombinationRule::Sum,
            values,
            ranking,
        }
    }

    #[test]
    fn perfect_estimate() {
        let t = truth(vec![1.0, 4.0, 2.0, 8.0]);
        let e = estimate(vec![2.0, 8.0, 4.0, 16.0]);
        let m = evaluate_slice(&t, &e, &SliceSpec::new("all", 1.0)).unwrap();
        assert_eq!(m.members, 4);
        assert_eq!(m.rank_error_sd, Some(0.0));
        assert!((m.log_correlation.unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn swapped_pair_rank_errors() {
        // True order 3,1,2,0; the estimate swaps the top two.
        let t = truth(vec![1.0, 4.0, 2.0, 8.0]);
        let e = estimate(vec![1.0, 9.0, 2.0, 8.0]);
        let m = evaluate_slice(&t, &e, &SliceSpec::new("all", 1.0)).unwrap();
        // Errors: [0, +1, 0, -1] -> sample variance 2/3.
        assert!((m.rank_error_sd.unwrap() - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn slice_membership_comes_from_truth() {
        let t = truth(vec![1.0, 4.0, 2.0, 8.0]);
        assert_eq!(slice_members(&t, &SliceSpec::new("top", 0.5)), &[3, 1]);
        // The estimate's own top two would be [0, 2]; members still follow truth.
        let e = estimate(vec![9.0, 1.0, 8.0, 0.5]);
        let m = evaluate_slice(&t, &e, &SliceSpec::new("top", 0.5)).unwrap();
        assert_eq!(m.members, 2);
    }

    #[test]
    fn single_member_slice_is_missing_not_fatal() {
        let t = truth(vec![1.0, 4.0, 2.0, 8.0]);
        let e = estimate(vec![1.0, 4.0, 2.0, 8.0]);
        let m = evaluate_slice(&t, &e, &SliceSpec::new("top", 0.25)).unwrap();
        assert_eq!(m.members, 1);
        assert_eq!(m.rank_error_sd, None);
        assert_eq!(m.log_correlation, None);
    }

    #[test]
    fn flat_estimate_has_no_correlation() {
        let t = truth(vec![1.0, 4.0, 2.0, 8.0]);
        let e = estimate(vec![3.0; 4]);
        let m = evaluate_slice(&t, &e, &SliceSpec::new("all", 1.0)).unwrap();
        assert_eq!(m.log_correlation, None);
        assert!(m.rank_error_sd.is_some());
    }

    #[test]
    fn length_mismatch_is_fatal() {
        let t = truth(vec![1.0, 4.0, 2.0]);
        let e = estimate(vec![1.0, 4.0]);
        assert!(evaluate_slice(&t, &e, &SliceSpec::new("all", 1.0)).is_err());
    }

    #[test]
    fn table_has_every_combination() {
        let truths = vec![truth(vec![1.0, 4.0, 2.0, 8.0]), TrueRating {
            definition: TruthDefinition::Mixed,
            ..truth(vec![2.0, 3.0, 1.0, 5.0])
        }];
        let estimates = vec![estimate(vec![1.0, 3.0, 2.0, 4.0]), Estimate {
            rule: CombinationRule::Product,
            ..estimate(vec![4.0, 3.0, 2.0, 1.0])
        }];
        let slices = vec![SliceSpec::new("all", 1.0), SliceSpec::new("top", 0.5)];
        let table = evaluate(&truths, &estimates, &slices).unwrap();
        assert_eq!(table.len(), 2 * 2 * 2);
        assert!(table
            .get(TruthDefinition::Mixed, "r", CombinationRule::Product, "top")
            .is_some());
    }
}
