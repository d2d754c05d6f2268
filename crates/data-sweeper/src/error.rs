//! Custom error types for data sweeping and summary generation.
//!
//! Errors are serializable so a display surface can show them as
//! `{ "code": ..., "message": ... }` without parsing the message text.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

use crate::config::ConfigValidationError;

/// The main error type for the crate.
#[derive(Error, Debug)]
pub enum SweeperError {
    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A numeric operation was requested on a non-numeric column.
    #[error("Column '{0}' is not numeric")]
    NonNumericColumn(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The file extension or export target is not supported.
    #[error("Unsupported file format: .{0}")]
    UnsupportedFormat(String),

    /// Type conversion failed.
    #[error("Failed to convert column '{column}' to {target_type}: {reason}")]
    TypeConversionFailed {
        column: String,
        target_type: String,
        reason: String,
    },

    /// Columns of a hand-built table disagree on row count.
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Excel workbook could not be read or written.
    #[error("Excel error: {0}")]
    Excel(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<SweeperError>,
    },
}

impl SweeperError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        SweeperError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for display surfaces.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::NonNumericColumn(_) => "NON_NUMERIC_COLUMN",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::TypeConversionFailed { .. } => "TYPE_CONVERSION_FAILED",
            Self::LengthMismatch { .. } => "LENGTH_MISMATCH",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Excel(_) => "EXCEL_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Errors the user can fix by changing input or flags.
    pub fn is_user_error(&self) -> bool {
        match self {
            Self::ColumnNotFound(_)
            | Self::NonNumericColumn(_)
            | Self::InvalidConfig(_)
            | Self::UnsupportedFormat(_)
            | Self::TypeConversionFailed { .. } => true,
            Self::WithContext { source, .. } => source.is_user_error(),
            _ => false,
        }
    }
}

impl From<ConfigValidationError> for SweeperError {
    fn from(e: ConfigValidationError) -> Self {
        SweeperError::InvalidConfig(e.to_string())
    }
}

impl From<calamine::Error> for SweeperError {
    fn from(e: calamine::Error) -> Self {
        SweeperError::Excel(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for SweeperError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        SweeperError::Excel(e.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for SweeperError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("SweeperError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for sweeper operations.
pub type Result<T> = std::result::Result<T, SweeperError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| SweeperError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::io::Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| SweeperError::Io(e).with_context(context))
    }
}

static_assertions::assert_impl_all!(SweeperError: Send, Sync);
