//! Descriptive statistics over the non-null values of a column.
//!
//! Undefined results (empty input, spread of a single value) are `NaN`,
//! never zero, so they render as `nan` rather than as a misleading number.

use std::cmp::Ordering;
use std::collections::HashMap;

/// Count, centre, spread and five-number summary of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl NumericSummary {
    /// Summarise the non-null values of a column.
    pub fn from_values(values: &[Option<f64>]) -> Self {
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        let sorted = sorted_copy(&present);

        Self {
            count: present.len(),
            mean: mean(&present),
            std: sample_std(&present),
            min: sorted.first().copied().unwrap_or(f64::NAN),
            q1: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q3: quantile_sorted(&sorted, 0.75),
            max: sorted.last().copied().unwrap_or(f64::NAN),
        }
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n as f64 - 1.0);
    variance.sqrt()
}

/// Quantile of sorted values with linear interpolation between ranks.
pub fn quantile_sorted(sorted: &[f64], quantile: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = quantile.clamp(0.0, 1.0) * (sorted.len() as f64 - 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Lower and upper Tukey fences: `[Q1 - k*IQR, Q3 + k*IQR]`.
pub fn iqr_bounds(values: &[Option<f64>], multiplier: f64) -> (f64, f64) {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let sorted = sorted_copy(&present);
    let q1 = quantile_sorted(&sorted, 0.25);
    let q3 = quantile_sorted(&sorted, 0.75);
    let iqr = q3 - q1;
    (q1 - multiplier * iqr, q3 + multiplier * iqr)
}

/// Count non-null values strictly outside the IQR fences.
pub fn count_iqr_outliers(values: &[Option<f64>], multiplier: f64) -> usize {
    let (lower, upper) = iqr_bounds(values, multiplier);
    values
        .iter()
        .flatten()
        .filter(|v| **v < lower || **v > upper)
        .count()
}

/// Most frequent non-null value.
///
/// Ties go to the value that appears first in row order. Returns `None`
/// when the column has no non-null values.
pub fn most_frequent(values: &[Option<String>]) -> Option<&str> {
    // value -> (count, first row)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (row, value) in values.iter().enumerate() {
        if let Some(v) = value {
            counts.entry(v.as_str()).or_insert((0, row)).0 += 1;
        }
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value)
}

/// Number of distinct non-null values.
pub fn distinct_count(values: &[Option<String>]) -> usize {
    values
        .iter()
        .flatten()
        .map(String::as_str)
        .collect::<std::collections::HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    fn text(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    // ==================== NumericSummary tests ====================

    #[test]
    fn test_summary_basic() {
        let summary = NumericSummary::from_values(&some(&[1.0, 2.0, 3.0, 4.0, 5.0]));
        assert_eq!(summary.count, 5);
        assert_eq!(summary.mean, 3.0);
        assert_eq!(summary.median, 3.0);
        assert!((summary.std - 1.5811).abs() < 1e-4);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.q1, 2.0);
        assert_eq!(summary.q3, 4.0);
        assert_eq!(summary.max, 5.0);
    }

    #[test]
    fn test_summary_ignores_nulls() {
        let summary = NumericSummary::from_values(&[Some(1.0), None, Some(2.0)]);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.mean, 1.5);
        assert_eq!(summary.median, 1.5);
        assert!((summary.std - 0.7071).abs() < 1e-4);
    }

    #[test]
    fn test_summary_empty_is_nan() {
        let summary = NumericSummary::from_values(&[None, None]);
        assert_eq!(summary.count, 0);
        assert!(summary.mean.is_nan());
        assert!(summary.median.is_nan());
        assert!(summary.min.is_nan());
    }

    #[test]
    fn test_std_single_value_is_nan() {
        assert!(sample_std(&[5.0]).is_nan());
        assert_eq!(sample_std(&[5.0, 5.0, 5.0]), 0.0);
    }

    // ==================== quantile tests ====================

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&sorted, 0.25), 1.75);
        assert_eq!(quantile_sorted(&sorted, 0.5), 2.5);
        assert_eq!(quantile_sorted(&sorted, 0.75), 3.25);
        assert_eq!(quantile_sorted(&sorted, 0.0), 1.0);
        assert_eq!(quantile_sorted(&sorted, 1.0), 4.0);
    }

    #[test]
    fn test_quantile_empty() {
        assert!(quantile_sorted(&[], 0.5).is_nan());
    }

    // ==================== outlier tests ====================

    #[test]
    fn test_outliers_detected() {
        // Q1=3.25, Q3=7.75, IQR=4.5, fences [-3.5, 14.5]
        let values = some(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0]);
        assert_eq!(count_iqr_outliers(&values, 1.5), 1);
    }

    #[test]
    fn test_no_outliers() {
        let values = some(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(count_iqr_outliers(&values, 1.5), 0);
    }

    #[test]
    fn test_outliers_identical_values() {
        let values = some(&[5.0, 5.0, 5.0, 5.0]);
        assert_eq!(count_iqr_outliers(&values, 1.5), 0);
    }

    #[test]
    fn test_outliers_on_boundary_not_counted() {
        // Q1=1, Q3=2, IQR=1, upper fence 3.5
        let values = some(&[1.0, 1.0, 2.0, 2.0, 3.5]);
        let (_, upper) = iqr_bounds(&values, 1.5);
        assert_eq!(upper, 3.5);
        assert_eq!(count_iqr_outliers(&values, 1.5), 0);
    }

    #[test]
    fn test_outliers_all_null() {
        assert_eq!(count_iqr_outliers(&[None, None], 1.5), 0);
    }

    // ==================== most_frequent tests ====================

    #[test]
    fn test_most_frequent() {
        let values = text(&["red", "red", "blue"]);
        assert_eq!(most_frequent(&values), Some("red"));
    }

    #[test]
    fn test_most_frequent_tie_prefers_first_seen() {
        let values = text(&["b", "a", "a", "b", "c"]);
        assert_eq!(most_frequent(&values), Some("b"));
    }

    #[test]
    fn test_most_frequent_skips_nulls() {
        let values = vec![None, None, Some("x".to_string())];
        assert_eq!(most_frequent(&values), Some("x"));
        assert_eq!(most_frequent(&[None, None]), None);
    }

    #[test]
    fn test_distinct_count() {
        let values = vec![Some("a".to_string()), None, Some("a".to_string()), Some("b".to_string())];
        assert_eq!(distinct_count(&values), 2);
    }
}
