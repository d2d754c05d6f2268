//! Streamed statistical summary of a dataset.
//!
//! The summary is an ordered series of sections (overview, column types,
//! numeric statistics, modes, missing values, outliers, correlations, a
//! describe table and a completion line). Text is delivered word by word
//! through a [`Typewriter`], with a longer pause after most sections.
//!
//! # Example
//!
//! ```rust,ignore
//! use data_sweeper::summary::SummaryGenerator;
//! use data_sweeper::SummaryConfig;
//!
//! let stream = SummaryGenerator::new(SummaryConfig::default()).summarize_dataframe(&df)?;
//! for fragment in stream {
//!     print!("{}", fragment);
//! }
//! ```

mod describe;
mod pacer;
mod sections;
mod stream;
mod typewriter;

pub use describe::{DescribeCell, DescribeTable};
pub use pacer::{NoopPacer, Pacer, SleepPacer};
pub use sections::{Section, SummaryPlan};
pub use stream::SummaryStream;
pub use typewriter::{DEFAULT_TOKEN_DELAY, Tokens, Typewriter, emit};

use crate::config::SummaryConfig;
use crate::error::{Result, SweeperError};
use crate::table::Table;
use polars::prelude::DataFrame;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// One item of a summary stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// A word followed by a space, or a newline.
    Token(String),
    /// A describe table, delivered in one piece.
    Table(DescribeTable),
}

impl Fragment {
    pub fn as_token(&self) -> Option<&str> {
        match self {
            Self::Token(token) => Some(token),
            Self::Table(_) => None,
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table(_))
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(token) => f.write_str(token),
            Self::Table(table) => write!(f, "{}", table),
        }
    }
}

/// Builds summary streams with a fixed configuration and pacer.
#[derive(Debug, Clone)]
pub struct SummaryGenerator {
    config: SummaryConfig,
    pacer: Arc<dyn Pacer>,
}

impl SummaryGenerator {
    /// Generator that sleeps the current thread for pauses.
    pub fn new(config: SummaryConfig) -> Self {
        Self {
            config,
            pacer: Arc::new(SleepPacer),
        }
    }

    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    /// Start a summary over a table snapshot.
    pub fn summarize(&self, table: Table) -> Result<SummaryStream> {
        self.config.validate().map_err(SweeperError::from)?;
        info!(
            "Summarizing {} rows x {} columns",
            table.row_count(),
            table.column_count()
        );
        Ok(SummaryStream::new(
            table,
            self.config.clone(),
            Arc::clone(&self.pacer),
        ))
    }

    /// Snapshot a `DataFrame` and start a summary over it.
    pub fn summarize_dataframe(&self, df: &DataFrame) -> Result<SummaryStream> {
        let table = Table::from_dataframe(df)?;
        self.summarize(table)
    }
}

impl Default for SummaryGenerator {
    fn default() -> Self {
        Self::new(SummaryConfig::default())
    }
}

/// Summarize a `DataFrame` with the default configuration.
pub fn summarize(df: &DataFrame) -> Result<SummaryStream> {
    SummaryGenerator::default().summarize_dataframe(df)
}
