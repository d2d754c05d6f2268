//! Row removal by IQR bounds on one column.

use crate::error::{Result, SweeperError};
use crate::profiler::iqr_bounds;
use crate::utils::is_numeric_dtype;
use polars::prelude::*;
use tracing::debug;

/// Keep rows whose value in `column` lies within
/// `[Q1 - k*IQR, Q3 + k*IQR]`, bounds inclusive.
///
/// Rows with a null (or NaN) in the column are dropped along with the
/// outliers. Returns the filtered frame and the number of rows removed.
pub(crate) fn remove_iqr_outliers(
    df: &DataFrame,
    column: &str,
    multiplier: f64,
) -> Result<(DataFrame, usize)> {
    let series = df
        .column(column)
        .map_err(|_| SweeperError::ColumnNotFound(column.to_string()))?
        .as_materialized_series();

    if !is_numeric_dtype(series.dtype()) {
        return Err(SweeperError::NonNumericColumn(column.to_string()));
    }

    let floats = series.cast(&DataType::Float64)?;
    let values: Vec<Option<f64>> = floats
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();

    let (lower, upper) = iqr_bounds(&values, multiplier);
    debug!(
        "IQR bounds for '{}': [{:.4}, {:.4}]",
        column, lower, upper
    );

    let keep: Vec<bool> = values
        .iter()
        .map(|v| v.is_some_and(|x| x >= lower && x <= upper))
        .collect();
    let mask = BooleanChunked::from_slice("keep".into(), &keep);

    let filtered = df.filter(&mask)?;
    let removed = df.height() - filtered.height();
    Ok((filtered, removed))
}
