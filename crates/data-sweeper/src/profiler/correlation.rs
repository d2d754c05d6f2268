//! Pairwise Pearson correlation and strongest-pair ranking.

use polars::prelude::Float64Chunked;
use polars::prelude::cov::pearson_corr;
use serde::Serialize;
use std::cmp::Ordering;

/// One unordered column pair with its absolute correlation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationPair {
    pub column_x: String,
    pub column_y: String,
    pub abs_correlation: f64,
}

/// Pearson correlation over rows where both values are present.
///
/// Returns `NaN` with fewer than two complete pairs or when either side
/// has zero variance.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y.iter())
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .unzip();

    if xs.len() < 2 {
        return f64::NAN;
    }

    let xs = Float64Chunked::from_vec("x".into(), xs);
    let ys = Float64Chunked::from_vec("y".into(), ys);
    pearson_corr(&xs, &ys).map_or(f64::NAN, |r| r.clamp(-1.0, 1.0))
}

/// Strongest `limit` column pairs by absolute Pearson correlation.
///
/// Each unordered pair appears once, named in column order. Pairs with
/// an undefined correlation or an absolute value of 1 are skipped. Equal
/// values keep matrix order (first column, then second).
pub fn top_correlations(columns: &[(&str, &[Option<f64>])], limit: usize) -> Vec<CorrelationPair> {
    let mut pairs = Vec::new();

    for (i, (name_x, x)) in columns.iter().enumerate() {
        for (name_y, y) in columns.iter().skip(i + 1) {
            let r = pearson(x, y).abs();
            if r.is_nan() || r >= 1.0 {
                continue;
            }
            pairs.push(CorrelationPair {
                column_x: name_x.to_string(),
                column_y: name_y.to_string(),
                abs_correlation: r,
            });
        }
    }

    // stable: ties keep matrix order
    pairs.sort_by(|a, b| {
        b.abs_correlation
            .partial_cmp(&a.abs_correlation)
            .unwrap_or(Ordering::Equal)
    });
    pairs.truncate(limit);
    pairs
}
