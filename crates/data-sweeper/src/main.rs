//! CLI entry point for cleaning a dataset and streaming its summary.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use data_sweeper::{
    CleaningConfig, DataCleaner, DescribeTable, ExportFormat, Fragment, SummaryConfig,
    SummaryGenerator, Table, TargetType, export_table, file_size_kib, load_table, preview,
};
use polars::prelude::DataFrame;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// CLI-compatible export format enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliExportFormat {
    /// Comma-separated values with a header row
    Csv,
    /// Excel workbook with a single worksheet
    Excel,
    /// Array of JSON records
    Json,
}

impl From<CliExportFormat> for ExportFormat {
    fn from(cli: CliExportFormat) -> Self {
        match cli {
            CliExportFormat::Csv => ExportFormat::Csv,
            CliExportFormat::Excel => ExportFormat::Excel,
            CliExportFormat::Json => ExportFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Clean a tabular dataset and stream a statistical summary",
    long_about = "Load a CSV, Excel or JSON file, optionally clean it, and print a \
                  paced statistical summary.\n\n\
                  EXAMPLES:\n  \
                  # Summary only\n  \
                  data-sweeper -i data.csv --summary\n\n  \
                  # Clean, summarize without delays, export\n  \
                  data-sweeper -i data.csv --remove-duplicates --fill-mean \\\n    \
                  --summary --delay-ms 0 --section-pause-ms 0 --export csv -o out/"
)]
struct Args {
    /// Path to the CSV, Excel or JSON file to load
    #[arg(short, long)]
    input: String,

    /// Output directory for exported data
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Rows shown in the preview
    #[arg(long, default_value = "5")]
    preview_rows: usize,

    /// Remove duplicate rows (first occurrence kept)
    #[arg(long)]
    remove_duplicates: bool,

    /// Fill missing numeric values with the column mean
    #[arg(long)]
    fill_mean: bool,

    /// Drop columns with more than this percentage of missing values (10-90)
    #[arg(long)]
    drop_missing_above: Option<f64>,

    /// Remove rows that are IQR outliers in this column
    #[arg(long)]
    outlier_column: Option<String>,

    /// IQR multiplier for outlier bounds
    #[arg(long, default_value = "1.5")]
    iqr_multiplier: f64,

    /// Convert a column: COLUMN=TYPE where TYPE is integer, float, string or date
    ///
    /// May be given more than once; conversions run in order.
    #[arg(long = "convert", value_name = "COLUMN=TYPE")]
    conversions: Vec<String>,

    /// Keep only these columns (comma separated), in this order
    #[arg(long, value_delimiter = ',')]
    keep: Option<Vec<String>>,

    /// Stream the statistical summary
    #[arg(long)]
    summary: bool,

    /// Export the (cleaned) data in this format
    #[arg(long, value_enum)]
    export: Option<CliExportFormat>,

    /// File name of the export, without extension
    #[arg(long, default_value = "cleaned_data")]
    export_name: String,

    /// Delay between summary words, in milliseconds
    #[arg(long, default_value = "20")]
    delay_ms: u64,

    /// Pause between summary sections, in milliseconds
    #[arg(long, default_value = "500")]
    section_pause_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr so stdout only carries the preview and the summary.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse `COLUMN=TYPE`.
fn parse_conversion(arg: &str) -> Result<(String, TargetType)> {
    let (column, target) = arg
        .rsplit_once('=')
        .ok_or_else(|| anyhow!("Invalid conversion '{}', expected COLUMN=TYPE", arg))?;
    if column.is_empty() {
        return Err(anyhow!("Invalid conversion '{}', column name is empty", arg));
    }
    Ok((column.to_string(), target.parse()?))
}

fn build_cleaning_config(args: &Args) -> Result<CleaningConfig> {
    let mut builder = CleaningConfig::builder()
        .remove_duplicates(args.remove_duplicates)
        .fill_missing_with_mean(args.fill_mean)
        .outlier_multiplier(args.iqr_multiplier);

    if let Some(pct) = args.drop_missing_above {
        builder = builder.drop_missing_above_pct(pct);
    }

    if let Some(ref column) = args.outlier_column {
        builder = builder.outlier_column(column);
    }

    for arg in &args.conversions {
        let (column, target) = parse_conversion(arg)?;
        builder = builder.convert(column, target);
    }

    if let Some(ref keep) = args.keep {
        builder = builder.keep_columns(keep.iter().map(String::as_str));
    }

    Ok(builder.build()?)
}

/// Describe-style statistics shown under the preview.
fn overview(df: &DataFrame) -> Result<DescribeTable> {
    Ok(DescribeTable::from_table(&Table::from_dataframe(df)?))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet);

    let input = Path::new(&args.input);
    if !input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    // Validate everything before doing any work
    let cleaning = build_cleaning_config(&args)?;
    let summary_config = SummaryConfig::builder()
        .token_delay_ms(args.delay_ms)
        .section_pause_ms(args.section_pause_ms)
        .iqr_multiplier(args.iqr_multiplier)
        .build()?;

    info!("Loading dataset from: {}", args.input);
    let df = load_table(input)?;

    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.input.clone());
    println!("Uploaded: {} ({:.2} KiB)", name, file_size_kib(input)?);
    println!("{}", preview(&df, args.preview_rows));
    println!("\nOverview of Data:");
    println!("{}", overview(&df)?);

    let outcome = DataCleaner::apply(df, &cleaning)?;
    if !outcome.actions.is_empty() {
        println!("\nCleaning steps:");
        for action in &outcome.actions {
            println!("  - {}", action);
        }
        println!("{}", preview(&outcome.data, args.preview_rows));
    }

    if args.summary {
        println!();
        let stream = SummaryGenerator::new(summary_config).summarize_dataframe(&outcome.data)?;
        let mut stdout = std::io::stdout().lock();
        for fragment in stream {
            match fragment {
                Fragment::Token(token) => write!(stdout, "{}", token)?,
                Fragment::Table(table) => writeln!(stdout, "{}", table)?,
            }
            stdout.flush()?;
        }
    }

    if let Some(format) = args.export {
        let path = export_table(&outcome.data, format.into(), &args.output, &args.export_name)?;
        println!("\nExported to {}", path.display());
    }

    debug!("Done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_conversion() {
        let (column, target) = parse_conversion("age=integer").unwrap();
        assert_eq!(column, "age");
        assert_eq!(target, TargetType::Integer);

        // the last '=' separates the type
        let (column, target) = parse_conversion("a=b=date").unwrap();
        assert_eq!(column, "a=b");
        assert_eq!(target, TargetType::Date);
    }

    #[test]
    fn test_parse_conversion_rejects_bad_input() {
        assert!(parse_conversion("age").is_err());
        assert!(parse_conversion("=float").is_err());
        assert!(parse_conversion("age=decimal").is_err());
    }

    #[test]
    fn test_overview_describes_numeric_columns() {
        let df = polars::df![
            "price" => [2.5f64, 3.0, 2.75],
            "region" => ["North", "South", "North"],
        ]
        .unwrap();

        let table = overview(&df).unwrap();
        assert_eq!(table.columns, vec!["price"]);
        assert_eq!(table.row_labels[0], "count");
        assert!(table.to_string().contains("price"));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
