//! Read-only, column-major snapshot of a tabular dataset.
//!
//! The summary engine never touches polars directly: a [`Table`] is built
//! once from a `DataFrame` (the only fallible step) and every statistic is
//! then computed from plain vectors. Nulls are `None`; float NaN counts as
//! missing, the same as an empty cell.

use crate::error::{Result, ResultExt, SweeperError};
use crate::utils::{DtypeCategory, get_dtype_category};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Kind of a column as seen by the summary engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or float values.
    Numeric,
    /// Text values.
    Categorical,
    /// Anything else (boolean, temporal, nested), kept as rendered text.
    Other,
}

/// Cell values of a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
    Other(Vec<Option<String>>),
}

impl ColumnValues {
    fn len(&self) -> usize {
        match self {
            Self::Numeric(v) => v.len(),
            Self::Categorical(v) | Self::Other(v) => v.len(),
        }
    }
}

/// A named column with a declared kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: ColumnValues,
}

impl Column {
    /// Numeric column; NaN entries are stored as missing.
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Self {
            name: name.into(),
            values: ColumnValues::Numeric(values),
        }
    }

    pub fn categorical<S: Into<String>>(name: impl Into<String>, values: Vec<Option<S>>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Categorical(
                values.into_iter().map(|v| v.map(Into::into)).collect(),
            ),
        }
    }

    pub fn other<S: Into<String>>(name: impl Into<String>, values: Vec<Option<S>>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Other(values.into_iter().map(|v| v.map(Into::into)).collect()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    pub fn kind(&self) -> ColumnKind {
        match self.values {
            ColumnValues::Numeric(_) => ColumnKind::Numeric,
            ColumnValues::Categorical(_) => ColumnKind::Categorical,
            ColumnValues::Other(_) => ColumnKind::Other,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of missing cells.
    pub fn null_count(&self) -> usize {
        match &self.values {
            ColumnValues::Numeric(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnValues::Categorical(v) | ColumnValues::Other(v) => {
                v.iter().filter(|x| x.is_none()).count()
            }
        }
    }

    /// Numeric values, if this is a numeric column.
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.values {
            ColumnValues::Numeric(v) => Some(v),
            _ => None,
        }
    }

    /// Text values, if this is a categorical column.
    pub fn as_categorical(&self) -> Option<&[Option<String>]> {
        match &self.values {
            ColumnValues::Categorical(v) => Some(v),
            _ => None,
        }
    }

    fn cell_key(&self, row: usize) -> CellKey<'_> {
        match &self.values {
            ColumnValues::Numeric(v) => match v[row] {
                // -0.0 and 0.0 compare equal
                Some(x) if x == 0.0 => CellKey::Number(0.0f64.to_bits()),
                Some(x) => CellKey::Number(x.to_bits()),
                None => CellKey::Null,
            },
            ColumnValues::Categorical(v) | ColumnValues::Other(v) => match &v[row] {
                Some(s) => CellKey::Text(s),
                None => CellKey::Null,
            },
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Null,
    Number(u64),
    Text(&'a str),
}

/// An immutable tabular snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    rows: usize,
    columns: Vec<Column>,
}

impl Table {
    /// Build a table from columns of equal length.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map(Column::len).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
            return Err(SweeperError::LengthMismatch {
                column: bad.name.clone(),
                expected: rows,
                actual: bad.len(),
            });
        }
        Ok(Self { rows, columns })
    }

    /// Snapshot a polars `DataFrame`.
    ///
    /// Integer and float dtypes become numeric columns, string and
    /// categorical dtypes become categorical columns, and every other
    /// dtype is rendered to text as an `Other` column.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let mut columns = Vec::with_capacity(df.width());

        for column in df.get_columns() {
            let series = column.as_materialized_series();
            let name = series.name().to_string();

            let snapshot = match get_dtype_category(series.dtype()) {
                DtypeCategory::Numeric => {
                    let floats = series
                        .cast(&DataType::Float64)
                        .context(format!("Casting '{}' to Float64", name))?;
                    let values: Vec<Option<f64>> = floats.f64()?.into_iter().collect();
                    Column::numeric(name, values)
                }
                DtypeCategory::String => {
                    let text = series
                        .cast(&DataType::String)
                        .context(format!("Casting '{}' to String", name))?;
                    let values: Vec<Option<String>> = text
                        .str()?
                        .into_iter()
                        .map(|v| v.map(str::to_string))
                        .collect();
                    Column::categorical(name, values)
                }
                _ => {
                    let mut values = Vec::with_capacity(series.len());
                    for i in 0..series.len() {
                        let value = series.get(i)?;
                        values.push(if value.is_null() {
                            None
                        } else {
                            Some(value.to_string())
                        });
                    }
                    Column::other(name, values)
                }
            };

            columns.push(snapshot);
        }

        debug!(
            "Snapshot built: {} rows x {} columns",
            df.height(),
            columns.len()
        );

        Ok(Self {
            rows: df.height(),
            columns,
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns of the given kind, in table order.
    pub fn columns_of_kind(&self, kind: ColumnKind) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(move |c| c.kind() == kind)
    }

    pub fn count_of_kind(&self, kind: ColumnKind) -> usize {
        self.columns_of_kind(kind).count()
    }

    /// Missing count per column, in table order.
    pub fn missing_counts(&self) -> Vec<(&str, usize)> {
        self.columns
            .iter()
            .map(|c| (c.name(), c.null_count()))
            .collect()
    }

    /// Total missing cells across the table.
    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(Column::null_count).sum()
    }

    /// Number of columns with at least one missing cell.
    pub fn columns_with_missing(&self) -> usize {
        self.columns.iter().filter(|c| c.null_count() > 0).count()
    }

    /// Rows equal in every column to some earlier row.
    ///
    /// Missing cells compare equal to each other.
    pub fn duplicate_row_count(&self) -> usize {
        self.first_occurrence_mask()
            .into_iter()
            .filter(|first| !first)
            .count()
    }

    /// `true` for each row not equal to an earlier row.
    fn first_occurrence_mask(&self) -> Vec<bool> {
        let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(self.rows);
        (0..self.rows)
            .map(|row| {
                let key: Vec<CellKey<'_>> = self.columns.iter().map(|c| c.cell_key(row)).collect();
                seen.insert(key)
            })
            .collect()
    }
}

static_assertions::assert_impl_all!(Table: Send, Sync);
