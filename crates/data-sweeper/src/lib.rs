//! Data Sweeper Library
//!
//! Tabular data cleaning and a paced, streamed statistical summary, built
//! on Polars.
//!
//! # Overview
//!
//! - **Loading**: CSV (header row, inferred schema), Excel (first worksheet)
//!   and JSON (array of records)
//! - **Cleaning**: duplicate removal, mean imputation, sparse-column removal,
//!   IQR outlier removal, type conversion, column selection
//! - **Summary**: overview, column types, numeric statistics, modes, missing
//!   values, outliers, correlations and a describe table, delivered word by
//!   word with pauses between sections
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use data_sweeper::{CleaningConfig, DataCleaner, SummaryConfig, SummaryGenerator, load_table};
//!
//! let df = load_table("data.csv")?;
//!
//! let config = CleaningConfig::builder()
//!     .remove_duplicates(true)
//!     .fill_missing_with_mean(true)
//!     .build()?;
//! let outcome = DataCleaner::apply(df, &config)?;
//!
//! let stream = SummaryGenerator::new(SummaryConfig::default())
//!     .summarize_dataframe(&outcome.data)?;
//! for fragment in stream {
//!     print!("{}", fragment);
//! }
//! ```
//!
//! # Pacing
//!
//! All delays go through the [`summary::Pacer`] trait. Use
//! [`SummaryConfig::instant`] or a [`summary::NoopPacer`] to produce the
//! full text without waiting.

pub mod cleaner;
pub mod config;
pub mod error;
pub mod io;
pub mod profiler;
pub mod summary;
pub mod table;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{CleaningOutcome, DataCleaner};
pub use config::{
    CleaningConfig, CleaningConfigBuilder, ColumnConversion, ConfigValidationError,
    SummaryConfig, SummaryConfigBuilder, TargetType,
};
pub use error::{Result as SweeperResult, ResultExt, SweeperError};
pub use io::{ExportFormat, export_table, file_size_kib, load_table, preview};
pub use profiler::{CorrelationPair, DataProfiler, MissingEntry, NumericSummary};
pub use summary::{
    DescribeTable, Fragment, Pacer, Section, SummaryGenerator, SummaryPlan, SummaryStream,
    Typewriter, emit, summarize,
};
pub use table::{Column, ColumnKind, Table};
pub use utils::{DtypeCategory, format_2dp, get_dtype_category, is_numeric_dtype};
