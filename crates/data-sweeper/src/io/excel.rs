//! Excel workbook reading and writing.
//!
//! Only the first worksheet is read. The first row holds the column names.

use crate::error::{Result, SweeperError};
use crate::utils::{DtypeCategory, get_dtype_category};
use calamine::{Data, DataType as _, Reader, open_workbook_auto};
use chrono::NaiveTime;
use polars::prelude::{Column, DataFrame, DataType, Series};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::Path;
use tracing::debug;

const SHEET_NAME: &str = "Sheet1";

static EMPTY_CELL: Data = Data::Empty;

pub(crate) fn read_excel(path: &Path) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SweeperError::Excel(format!("{} has no worksheets", path.display())))??;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        debug!("{} has an empty first worksheet", path.display());
        return Ok(DataFrame::empty());
    };
    let body: Vec<&[Data]> = rows.collect();

    let columns: Vec<Column> = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let name = cell_text(cell).unwrap_or_else(|| format!("column_{}", idx + 1));
            let cells: Vec<&Data> = body
                .iter()
                .map(|row| row.get(idx).unwrap_or(&EMPTY_CELL))
                .collect();
            column_from_cells(&name, &cells)
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

fn is_blank(cell: &Data) -> bool {
    matches!(cell, Data::Empty | Data::Error(_))
}

/// All numbers become Float64, all booleans Boolean, anything else text.
fn column_from_cells(name: &str, cells: &[&Data]) -> Column {
    let mut present = cells.iter().filter(|c| !is_blank(c));

    if present.clone().all(|c| matches!(c, Data::Float(_) | Data::Int(_))) {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|c| match c {
                Data::Float(v) => Some(*v),
                Data::Int(v) => Some(*v as f64),
                _ => None,
            })
            .collect();
        return Column::new(name.into(), values);
    }

    if present.all(|c| matches!(c, Data::Bool(_))) {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|c| match c {
                Data::Bool(v) => Some(*v),
                _ => None,
            })
            .collect();
        return Column::new(name.into(), values);
    }

    let values: Vec<Option<String>> = cells.iter().map(|c| cell_text(c)).collect();
    Column::new(name.into(), values)
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::DateTime(_) => cell.as_datetime().map(|dt| {
            if dt.time() == NaiveTime::MIN {
                dt.date().to_string()
            } else {
                dt.to_string()
            }
        }),
        other => Some(other.to_string()),
    }
}

pub(crate) fn write_excel(df: &DataFrame, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (idx, column) in df.get_columns().iter().enumerate() {
        let col = u16::try_from(idx)
            .map_err(|_| SweeperError::Excel(format!("too many columns ({})", df.width())))?;
        sheet.write_string(0, col, column.name().as_str())?;
        write_column(sheet, col, column.as_materialized_series())?;
    }

    workbook.save(path)?;
    Ok(())
}

/// Row of data row `row` (0-based), below the header.
fn sheet_row(row: usize) -> Result<u32> {
    u32::try_from(row + 1).map_err(|_| SweeperError::Excel(format!("row {} out of range", row)))
}

fn write_column(sheet: &mut Worksheet, col: u16, series: &Series) -> Result<()> {
    match get_dtype_category(series.dtype()) {
        DtypeCategory::Numeric => {
            let floats = series.cast(&DataType::Float64)?;
            for (row, value) in floats.f64()?.into_iter().enumerate() {
                // NaN and infinities stay blank
                if let Some(v) = value.filter(|v| v.is_finite()) {
                    sheet.write_number(sheet_row(row)?, col, v)?;
                }
            }
        }
        DtypeCategory::Boolean => {
            for (row, value) in series.bool()?.into_iter().enumerate() {
                if let Some(v) = value {
                    sheet.write_boolean(sheet_row(row)?, col, v)?;
                }
            }
        }
        _ => {
            let text = series.cast(&DataType::String)?;
            for (row, value) in text.str()?.into_iter().enumerate() {
                if let Some(v) = value {
                    sheet.write_string(sheet_row(row)?, col, v)?;
                }
            }
        }
    }
    Ok(())
}
