//! Descriptive-statistics table shown at the end of a summary.

use crate::profiler::{NumericSummary, distinct_count, most_frequent};
use crate::table::{ColumnKind, Table};
use serde::Serialize;
use std::fmt;

/// A single cell of a [`DescribeTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DescribeCell {
    Number(f64),
    Count(usize),
    Text(String),
    Missing,
}

impl fmt::Display for DescribeCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) if v.is_nan() => write!(f, "NaN"),
            Self::Number(v) => write!(f, "{:.6}", v),
            Self::Count(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
            Self::Missing => write!(f, "NaN"),
        }
    }
}

/// Per-column descriptive statistics laid out as a grid.
///
/// Built from numeric columns when the table has any (count, mean, std,
/// min, quartiles, max), otherwise from categorical columns (count,
/// unique, top, freq). A table with neither yields an empty grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescribeTable {
    pub columns: Vec<String>,
    pub row_labels: Vec<String>,
    /// Row-major: `cells[row][column]`.
    pub cells: Vec<Vec<DescribeCell>>,
}

const NUMERIC_ROWS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
const CATEGORICAL_ROWS: [&str; 4] = ["count", "unique", "top", "freq"];

impl DescribeTable {
    pub fn from_table(table: &Table) -> Self {
        if table.count_of_kind(ColumnKind::Numeric) > 0 {
            Self::numeric(table)
        } else if table.count_of_kind(ColumnKind::Categorical) > 0 {
            Self::categorical(table)
        } else {
            Self {
                columns: Vec::new(),
                row_labels: Vec::new(),
                cells: Vec::new(),
            }
        }
    }

    fn numeric(table: &Table) -> Self {
        let mut columns = Vec::new();
        let mut per_column = Vec::new();

        for column in table.columns_of_kind(ColumnKind::Numeric) {
            if let Some(values) = column.as_numeric() {
                let s = NumericSummary::from_values(values);
                columns.push(column.name().to_string());
                per_column.push([
                    s.count as f64,
                    s.mean,
                    s.std,
                    s.min,
                    s.q1,
                    s.median,
                    s.q3,
                    s.max,
                ]);
            }
        }

        let cells = (0..NUMERIC_ROWS.len())
            .map(|row| {
                per_column
                    .iter()
                    .map(|stats| DescribeCell::Number(stats[row]))
                    .collect()
            })
            .collect();

        Self {
            columns,
            row_labels: NUMERIC_ROWS.iter().map(|s| s.to_string()).collect(),
            cells,
        }
    }

    fn categorical(table: &Table) -> Self {
        let mut columns = Vec::new();
        let mut per_column: Vec<[DescribeCell; 4]> = Vec::new();

        for column in table.columns_of_kind(ColumnKind::Categorical) {
            if let Some(values) = column.as_categorical() {
                let count = values.iter().flatten().count();
                let (top, freq) = match most_frequent(values) {
                    Some(top) => {
                        let freq = values.iter().flatten().filter(|v| *v == top).count();
                        (DescribeCell::Text(top.to_string()), DescribeCell::Count(freq))
                    }
                    None => (DescribeCell::Missing, DescribeCell::Missing),
                };
                columns.push(column.name().to_string());
                per_column.push([
                    DescribeCell::Count(count),
                    DescribeCell::Count(distinct_count(values)),
                    top,
                    freq,
                ]);
            }
        }

        let cells = (0..CATEGORICAL_ROWS.len())
            .map(|row| per_column.iter().map(|cells| cells[row].clone()).collect())
            .collect();

        Self {
            columns,
            row_labels: CATEGORICAL_ROWS.iter().map(|s| s.to_string()).collect(),
            cells,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Cell for a row label and column name.
    pub fn get(&self, row_label: &str, column: &str) -> Option<&DescribeCell> {
        let row = self.row_labels.iter().position(|l| l == row_label)?;
        let col = self.columns.iter().position(|c| c == column)?;
        self.cells.get(row)?.get(col)
    }
}

impl fmt::Display for DescribeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "Empty DataFrame");
        }

        let rendered: Vec<Vec<String>> = self
            .cells
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect();

        let label_width = self.row_labels.iter().map(|l| l.len()).max().unwrap_or(0);
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                rendered
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:label_width$}", "")?;
        for (name, width) in self.columns.iter().zip(&widths) {
            write!(f, "  {:>width$}", name)?;
        }
        writeln!(f)?;

        for (label, row) in self.row_labels.iter().zip(&rendered) {
            write!(f, "{:<label_width$}", label)?;
            for (cell, width) in row.iter().zip(&widths) {
                write!(f, "  {:>width$}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
