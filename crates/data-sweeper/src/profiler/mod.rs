//! Table profiling: the statistics behind each summary section.
//!
//! This module provides:
//! - Numeric summaries (mean, median, sample std, quartiles)
//! - Most frequent value per categorical column
//! - Missing-value breakdown
//! - IQR outlier counts
//! - Strongest pairwise Pearson correlations
//!
//! Every function reads a [`Table`] snapshot and is infallible; all nulls
//! are excluded before computing.

mod correlation;
mod statistics;

pub use correlation::{CorrelationPair, pearson, top_correlations};
pub use statistics::{
    NumericSummary, count_iqr_outliers, distinct_count, iqr_bounds, mean, most_frequent,
    quantile_sorted, sample_std,
};

use crate::table::{ColumnKind, Table};
use crate::utils::percentage;
use serde::Serialize;

/// Missing-value count and share for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingEntry {
    pub column: String,
    pub count: usize,
    pub percent: f64,
}

/// Profiler over a table snapshot.
pub struct DataProfiler;

impl DataProfiler {
    /// Numeric summary of every numeric column, in table order.
    pub fn numeric_summaries(table: &Table) -> Vec<(&str, NumericSummary)> {
        table
            .columns_of_kind(ColumnKind::Numeric)
            .filter_map(|c| {
                c.as_numeric()
                    .map(|values| (c.name(), NumericSummary::from_values(values)))
            })
            .collect()
    }

    /// Most frequent value of every categorical column, in table order.
    pub fn modes(table: &Table) -> Vec<(&str, Option<&str>)> {
        table
            .columns_of_kind(ColumnKind::Categorical)
            .filter_map(|c| c.as_categorical().map(|values| (c.name(), most_frequent(values))))
            .collect()
    }

    /// Columns with at least one missing value.
    ///
    /// The percentage is 0 for a table without rows.
    pub fn missing_breakdown(table: &Table) -> Vec<MissingEntry> {
        let rows = table.row_count();
        table
            .missing_counts()
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(column, count)| MissingEntry {
                column: column.to_string(),
                count,
                percent: percentage(count, rows),
            })
            .collect()
    }

    /// Numeric columns with at least one IQR outlier, in table order.
    pub fn outlier_counts(table: &Table, multiplier: f64) -> Vec<(&str, usize)> {
        table
            .columns_of_kind(ColumnKind::Numeric)
            .filter_map(|c| {
                c.as_numeric()
                    .map(|values| (c.name(), count_iqr_outliers(values, multiplier)))
            })
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    /// Strongest correlation pairs among numeric columns.
    pub fn top_correlations(table: &Table, limit: usize) -> Vec<CorrelationPair> {
        let columns: Vec<(&str, &[Option<f64>])> = table
            .columns_of_kind(ColumnKind::Numeric)
            .filter_map(|c| c.as_numeric().map(|values| (c.name(), values)))
            .collect();
        top_correlations(&columns, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;
    use pretty_assertions::assert_eq;

    fn mixed_table() -> Table {
        Table::new(vec![
            Column::numeric("x", vec![Some(1.0), Some(2.0), None, Some(4.0)]),
            Column::categorical("c", vec![Some("a"), None, Some("b"), Some("b")]),
            Column::numeric(
                "y",
                vec![Some(10.0), Some(11.0), Some(12.0), Some(1000.0)],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_numeric_summaries_in_order() {
        let table = mixed_table();
        let summaries = DataProfiler::numeric_summaries(&table);
        let names: Vec<&str> = summaries.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert!((summaries[0].1.mean - 7.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_modes() {
        let table = mixed_table();
        assert_eq!(DataProfiler::modes(&table), vec![("c", Some("b"))]);
    }

    #[test]
    fn test_missing_breakdown() {
        let table = mixed_table();
        let breakdown = DataProfiler::missing_breakdown(&table);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].column, "x");
        assert_eq!(breakdown[0].count, 1);
        assert_eq!(breakdown[0].percent, 25.0);
        assert_eq!(breakdown[1].column, "c");
    }

    #[test]
    fn test_outlier_counts_only_nonzero() {
        let table = mixed_table();
        // y: Q1=10.75, Q3=259, the 1000 sits above the upper fence
        assert_eq!(DataProfiler::outlier_counts(&table, 1.5), vec![("y", 1)]);
    }

    #[test]
    fn test_top_correlations_needs_two_numeric() {
        let table = Table::new(vec![Column::numeric("x", vec![Some(1.0), Some(2.0)])]).unwrap();
        assert!(DataProfiler::top_correlations(&table, 3).is_empty());
    }
}
