//! Trait interfaces shared between pipeline phases.
//!
//! - [`RowScorer`]: collapses one entity's attribute row into a scalar. Both
//!   the ground-truth definitions and the estimate combination rules implement it.

use crate::types::{AttributeMatrix, CombinationRule};

/// A pure function from an entity's attribute row to one rating.
pub trait RowScorer {
    /// Short name used in logs and reports.
    fn label(&self) -> &'static str;

    /// Rating of a single row. Rows are never empty.
    fn score(&self, row: &[f64]) -> f64;

    /// Score every row of a matrix, in entity order.
    fn score_rows(&self, matrix: &AttributeMatrix) -> Vec<f64> {
        matrix.iter_rows().map(|row| self.score(row)).collect()
    }
}

impl RowScorer for CombinationRule {
    fn label(&self) -> &'static str {
        self.name()
    }

    fn score(&self, row: &[f64]) -> f64 {
        match self {
            CombinationRule::Sum => row.iter().sum(),
            CombinationRule::Product => row.iter().product(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_and_product_rules() {
        let row = [1.5, 2.0, 4.0];
        assert_eq!(CombinationRule::Sum.score(&row), 7.5);
        assert_eq!(CombinationRule::Product.score(&row), 12.0);
    }

    #[test]
    fn score_rows_follows_entity_order() {
        let m = AttributeMatrix::from_row_major(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(CombinationRule::Sum.score_rows(&m), vec![3.0, 7.0]);
        assert_eq!(CombinationRule::Product.score_rows(&m), vec![2.0, 12.0]);
    }

    #[test]
    fn labels_match_names() {
        assert_eq!(CombinationRule::Sum.label(), "sum");
        assert_eq!(CombinationRule::Product.label(), "product");
    }
}
