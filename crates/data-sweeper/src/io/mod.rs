//! Loading and exporting tabular files.

mod excel;

use crate::error::{Result, ResultExt, SweeperError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Rows sampled for CSV schema inference.
const INFER_SCHEMA_ROWS: usize = 100;

/// Output format for [`export_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Excel,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Excel => "xlsx",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = SweeperError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "excel" | "xlsx" => Ok(Self::Excel),
            "json" => Ok(Self::Json),
            other => Err(SweeperError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Load a CSV, Excel or JSON file, chosen by extension.
///
/// CSV files and the first worksheet of a workbook must have a header row.
/// JSON files hold an array of records.
pub fn load_table(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let df = match extension.as_str() {
        "csv" => read_csv(path)?,
        "xlsx" | "xlsm" | "xls" => excel::read_excel(path)?,
        "json" => read_json(path)?,
        _ => return Err(SweeperError::UnsupportedFormat(extension)),
    };

    info!(
        "Loaded {}: {} rows x {} columns",
        path.display(),
        df.height(),
        df.width()
    );
    Ok(df)
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .try_into_reader_with_file_path(Some(path.into()))
        .context(format!("Opening {}", path.display()))?
        .finish()
        .context(format!("Parsing {}", path.display()))
}

fn read_json(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).context(format!("Opening {}", path.display()))?;
    JsonReader::new(file)
        .finish()
        .context(format!("Parsing {}", path.display()))
}

/// Write `df` as `<stem>.<ext>` under `dir`, creating the directory.
pub fn export_table(
    df: &DataFrame,
    format: ExportFormat,
    dir: impl AsRef<Path>,
    stem: &str,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let output_path = dir.join(format!("{}.{}", stem, format.extension()));

    match format {
        ExportFormat::Csv => {
            let mut file = File::create(&output_path)?;
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(&mut df.clone())
                .context("Writing CSV")?
        }
        ExportFormat::Excel => excel::write_excel(df, &output_path).context("Writing Excel")?,
        ExportFormat::Json => {
            let mut file = File::create(&output_path)?;
            JsonWriter::new(&mut file)
                .with_json_format(JsonFormat::Json)
                .finish(&mut df.clone())
                .context("Writing JSON")?
        }
    }

    info!("Exported {} rows to {}", df.height(), output_path.display());
    Ok(output_path)
}

/// First `n` rows for display.
pub fn preview(df: &DataFrame, n: usize) -> DataFrame {
    debug!("Preview of {} rows", n.min(df.height()));
    df.head(Some(n))
}

/// Size of a file in KiB.
pub fn file_size_kib(path: impl AsRef<Path>) -> Result<f64> {
    let bytes = fs::metadata(path.as_ref())?.len();
    Ok(bytes as f64 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_csv() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "data.csv", "x,y\n1,red\n2,red\n,blue\n");
        let df = load_table(&path).unwrap();
        assert_eq!(df.shape(), (3, 2));
        assert_eq!(df.column("x").unwrap().null_count(), 1);
    }

    #[test]
    fn test_load_json_records() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "data.json",
            r#"[{"x": 1.5, "y": "a"}, {"x": 2.5, "y": "b"}]"#,
        );
        let df = load_table(&path).unwrap();
        assert_eq!(df.shape(), (2, 2));
    }

    #[test]
    fn test_extension_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "DATA.CSV", "a\n1\n");
        assert_eq!(load_table(&path).unwrap().height(), 1);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "data.tsv", "");
        let err = load_table(&path).unwrap_err();
        assert!(matches!(err, SweeperError::UnsupportedFormat(ref e) if e == "tsv"));
    }

    #[test]
    fn test_missing_json_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");
        let err = load_table(&path).unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn test_export_csv_round_trip_shape() {
        let dir = TempDir::new().unwrap();
        let df = df!["a" => [1i64, 2, 3], "b" => ["x", "y", "z"]].unwrap();

        let path = export_table(&df, ExportFormat::Csv, dir.path().join("out"), "cleaned").unwrap();
        assert!(path.ends_with("cleaned.csv"));
        assert_eq!(load_table(&path).unwrap().shape(), (3, 2));
    }

    #[test]
    fn test_export_json_round_trip_shape() {
        let dir = TempDir::new().unwrap();
        let df = df!["a" => [1.5f64, 2.5], "b" => ["x", "y"]].unwrap();

        let path = export_table(&df, ExportFormat::Json, dir.path(), "cleaned").unwrap();
        assert!(path.ends_with("cleaned.json"));
        assert_eq!(load_table(&path).unwrap().shape(), (2, 2));
    }

    #[test]
    fn test_export_excel_round_trip_shape() {
        let dir = TempDir::new().unwrap();
        let df = df!["a" => [1.5f64, 2.5, 4.0], "b" => ["x", "y", "z"]].unwrap();

        let path = export_table(&df, ExportFormat::Excel, dir.path(), "cleaned").unwrap();
        assert!(path.ends_with("cleaned.xlsx"));
        let back = load_table(&path).unwrap();
        assert_eq!(back.shape(), (3, 2));
        assert_eq!(back.get_column_names(), df.get_column_names());
    }

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert_eq!("Excel".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_preview() {
        let df = df!["a" => [1i32, 2, 3, 4, 5, 6]].unwrap();
        assert_eq!(preview(&df, 5).height(), 5);
        assert_eq!(preview(&df, 10).height(), 6);
    }
}
