//! Data cleaning operations applied before summarizing.
//!
//! This module provides functionality for:
//! - Removing duplicate rows
//! - Filling numeric nulls with the column mean
//! - Dropping columns with a high missing rate
//! - Removing IQR outlier rows for one column
//! - Converting column types
//! - Selecting a subset of columns
//!
//! Each operation takes an owned `DataFrame` and returns the cleaned frame
//! with a human-readable description of what changed.

mod converters;
mod outliers;

use crate::config::{CleaningConfig, TargetType};
use crate::error::{Result, ResultExt, SweeperError};
use crate::utils::{is_numeric_dtype, percentage};
use polars::prelude::*;
use tracing::{debug, info};

/// Result of a cleaning pass.
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    pub data: DataFrame,
    pub actions: Vec<String>,
}

/// Data cleaner for user-selected cleaning operations.
pub struct DataCleaner;

impl DataCleaner {
    /// Run every operation enabled in `config`.
    ///
    /// Order: duplicates, mean fill, sparse columns, outliers, type
    /// conversions, column selection.
    pub fn apply(df: DataFrame, config: &CleaningConfig) -> Result<CleaningOutcome> {
        config.validate().map_err(SweeperError::from)?;

        let mut df = df;
        let mut actions = Vec::new();

        if config.is_noop() {
            debug!("No cleaning operations selected");
            return Ok(CleaningOutcome { data: df, actions });
        }

        info!("Cleaning dataset ({} rows x {} columns)", df.height(), df.width());

        if config.remove_duplicates {
            let (cleaned, action) = Self::remove_duplicates(df)?;
            df = cleaned;
            actions.push(action);
        }

        if config.fill_missing_with_mean {
            let (cleaned, action) = Self::fill_missing_with_mean(df)?;
            df = cleaned;
            actions.push(action);
        }

        if let Some(threshold) = config.drop_missing_above_pct {
            let (cleaned, action) = Self::drop_sparse_columns(df, threshold)?;
            df = cleaned;
            actions.push(action);
        }

        if let Some(ref column) = config.outlier_column {
            let (cleaned, action) = Self::remove_outliers(df, column, config.outlier_multiplier)?;
            df = cleaned;
            actions.push(action);
        }

        for conversion in &config.conversions {
            let (cleaned, action) = Self::convert_column(df, &conversion.column, conversion.target)?;
            df = cleaned;
            actions.push(action);
        }

        if let Some(ref keep) = config.keep_columns {
            let (cleaned, action) = Self::select_columns(df, keep)?;
            df = cleaned;
            actions.push(action);
        }

        info!(
            "Cleaning complete: {} rows x {} columns, {} actions",
            df.height(),
            df.width(),
            actions.len()
        );

        Ok(CleaningOutcome { data: df, actions })
    }

    /// Remove rows equal to an earlier row, keeping the first occurrence.
    pub fn remove_duplicates(df: DataFrame) -> Result<(DataFrame, String)> {
        let before = df.height();
        let df = df
            .unique_stable(None, UniqueKeepStrategy::First, None)
            .context("Removing duplicate rows")?;
        let removed = before - df.height();

        let action = if removed > 0 {
            format!(
                "Removed {} duplicate rows ({:.1}%)",
                removed,
                percentage(removed, before)
            )
        } else {
            "No duplicate rows found".to_string()
        };
        debug!("{}", action);
        Ok((df, action))
    }

    /// Fill missing values in numeric columns with the column mean.
    ///
    /// Both nulls and NaN count as missing and are left out of the mean.
    /// Filled columns become Float64. Columns without any value are left
    /// as they are.
    pub fn fill_missing_with_mean(mut df: DataFrame) -> Result<(DataFrame, String)> {
        let mut filled = Vec::new();

        let targets: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|c| is_numeric_dtype(c.dtype()))
            .map(|c| c.name().to_string())
            .collect();

        for name in targets {
            let floats = df
                .column(&name)?
                .as_materialized_series()
                .cast(&DataType::Float64)?;
            let present: Float64Chunked = floats
                .f64()?
                .into_iter()
                .map(|v| v.filter(|x| !x.is_nan()))
                .collect();

            if present.null_count() == 0 {
                continue;
            }
            let Some(mean_val) = present.mean() else {
                debug!("Column '{}' has no values to average", name);
                continue;
            };

            let values: Vec<f64> = present
                .into_iter()
                .map(|v| v.unwrap_or(mean_val))
                .collect();

            df.replace(&name, Series::new(name.as_str().into(), values))
                .context(format!("Filling '{}' with mean", name))?;
            debug!("Filled '{}' with mean: {:.2}", name, mean_val);
            filled.push(name);
        }

        let action = if filled.is_empty() {
            "No numeric missing values to fill".to_string()
        } else {
            format!(
                "Filled missing values with the column mean in {} columns: {:?}",
                filled.len(),
                filled
            )
        };
        Ok((df, action))
    }

    /// Drop columns whose missing percentage is strictly above `threshold_pct`.
    pub fn drop_sparse_columns(df: DataFrame, threshold_pct: f64) -> Result<(DataFrame, String)> {
        let rows = df.height();
        let sparse: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|c| percentage(c.null_count(), rows) > threshold_pct)
            .map(|c| c.name().to_string())
            .collect();

        if sparse.is_empty() {
            return Ok((
                df,
                format!("No columns with more than {}% missing values", threshold_pct),
            ));
        }

        let names: Vec<PlSmallStr> = sparse.iter().map(|s| s.as_str().into()).collect();
        let df = df.drop_many(names);

        let action = format!(
            "Removed {} columns with more than {}% missing values: {:?}",
            sparse.len(),
            threshold_pct,
            sparse
        );
        debug!("{}", action);
        Ok((df, action))
    }

    /// Remove rows whose value in `column` falls outside the IQR bounds.
    pub fn remove_outliers(
        df: DataFrame,
        column: &str,
        multiplier: f64,
    ) -> Result<(DataFrame, String)> {
        let (df, removed) = outliers::remove_iqr_outliers(&df, column, multiplier)?;
        let action = format!("Removed {} outlier rows using '{}'", removed, column);
        debug!("{}", action);
        Ok((df, action))
    }

    /// Convert one column to the target type.
    pub fn convert_column(
        mut df: DataFrame,
        column: &str,
        target: TargetType,
    ) -> Result<(DataFrame, String)> {
        let series = df
            .column(column)
            .map_err(|_| SweeperError::ColumnNotFound(column.to_string()))?
            .as_materialized_series();

        let converted = converters::convert_series(series, target)?;
        let nulls_before = series.null_count();
        let coerced = converted.null_count().saturating_sub(nulls_before);

        df.replace(column, converted)?;

        let action = if coerced > 0 {
            format!(
                "Converted '{}' to {} ({} values could not be parsed)",
                column,
                target.display_name(),
                coerced
            )
        } else {
            format!("Converted '{}' to {}", column, target.display_name())
        };
        debug!("{}", action);
        Ok((df, action))
    }

    /// Keep only the named columns, in the given order.
    pub fn select_columns(df: DataFrame, columns: &[String]) -> Result<(DataFrame, String)> {
        let existing: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        if let Some(missing) = columns.iter().find(|c| !existing.contains(c)) {
            return Err(SweeperError::ColumnNotFound(missing.clone()));
        }

        let df = df.select(columns.iter().map(String::as_str))?;
        let action = format!("Selected {} columns: {:?}", columns.len(), columns);
        debug!("{}", action);
        Ok((df, action))
    }
}
