//! Configuration types for summary generation and data cleaning.
//!
//! Both configurations use the builder pattern and validate on `build()`.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Default pause between typewriter tokens.
pub const DEFAULT_TOKEN_DELAY_MS: u64 = 20;
/// Default pause between report sections.
pub const DEFAULT_SECTION_PAUSE_MS: u64 = 500;
/// Default number of correlation pairs reported.
pub const DEFAULT_TOP_CORRELATIONS: usize = 3;
/// Tukey fence multiplier used for IQR outlier bounds.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;
/// Default missing-value threshold (percent) for dropping sparse columns.
pub const DEFAULT_MISSING_THRESHOLD_PCT: f64 = 50.0;

/// Target type for column conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetType {
    /// 64-bit signed integer
    Integer,
    /// 64-bit float
    Float,
    /// UTF-8 text
    String,
    /// Calendar date; unparseable values become null
    Date,
}

impl TargetType {
    /// Human-readable name, as shown in cleaning actions.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::String => "String",
            Self::Date => "Date",
        }
    }
}

impl FromStr for TargetType {
    type Err = ConfigValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" => Ok(Self::Integer),
            "float" => Ok(Self::Float),
            "string" | "str" => Ok(Self::String),
            "date" => Ok(Self::Date),
            other => Err(ConfigValidationError::UnknownTargetType(other.to_string())),
        }
    }
}

/// A single requested column conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConversion {
    pub column: String,
    pub target: TargetType,
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid top correlation count: {0} (must be at least 1)")]
    InvalidTopCorrelations(usize),

    #[error("Invalid IQR multiplier: {0} (must be a positive finite number)")]
    InvalidIqrMultiplier(f64),

    #[error("Invalid missing value threshold: {0}% (must be between 10 and 90)")]
    InvalidMissingThreshold(f64),

    #[error("Unknown conversion target '{0}' (expected integer, float, string or date)")]
    UnknownTargetType(String),

    #[error("Column selection must name at least one column")]
    EmptyColumnSelection,
}

// ============================================================================
// Summary configuration
// ============================================================================

/// Configuration for the streamed statistical summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Pause between typewriter tokens, in milliseconds.
    /// Default: 20
    pub token_delay_ms: u64,

    /// Pause between report sections, in milliseconds.
    /// Default: 500
    pub section_pause_ms: u64,

    /// Number of strongest correlation pairs to report.
    /// Default: 3
    pub top_correlations: usize,

    /// Multiplier applied to the IQR when computing outlier bounds.
    /// Default: 1.5
    pub iqr_multiplier: f64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            token_delay_ms: DEFAULT_TOKEN_DELAY_MS,
            section_pause_ms: DEFAULT_SECTION_PAUSE_MS,
            top_correlations: DEFAULT_TOP_CORRELATIONS,
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
        }
    }
}

impl SummaryConfig {
    /// Create a new configuration builder.
    pub fn builder() -> SummaryConfigBuilder {
        SummaryConfigBuilder::default()
    }

    /// Configuration with every pause disabled.
    pub fn instant() -> Self {
        Self {
            token_delay_ms: 0,
            section_pause_ms: 0,
            ..Self::default()
        }
    }

    pub fn token_delay(&self) -> Duration {
        Duration::from_millis(self.token_delay_ms)
    }

    pub fn section_pause(&self) -> Duration {
        Duration::from_millis(self.section_pause_ms)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.top_correlations == 0 {
            return Err(ConfigValidationError::InvalidTopCorrelations(
                self.top_correlations,
            ));
        }

        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier <= 0.0 {
            return Err(ConfigValidationError::InvalidIqrMultiplier(
                self.iqr_multiplier,
            ));
        }

        Ok(())
    }
}

/// Builder for [`SummaryConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct SummaryConfigBuilder {
    token_delay_ms: Option<u64>,
    section_pause_ms: Option<u64>,
    top_correlations: Option<usize>,
    iqr_multiplier: Option<f64>,
}

impl SummaryConfigBuilder {
    /// Set the pause between typewriter tokens.
    pub fn token_delay_ms(mut self, ms: u64) -> Self {
        self.token_delay_ms = Some(ms);
        self
    }

    /// Set the pause between report sections.
    pub fn section_pause_ms(mut self, ms: u64) -> Self {
        self.section_pause_ms = Some(ms);
        self
    }

    /// Set how many correlation pairs are reported.
    pub fn top_correlations(mut self, n: usize) -> Self {
        self.top_correlations = Some(n);
        self
    }

    /// Set the IQR multiplier for outlier bounds.
    pub fn iqr_multiplier(mut self, k: f64) -> Self {
        self.iqr_multiplier = Some(k);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<SummaryConfig, ConfigValidationError> {
        let config = SummaryConfig {
            token_delay_ms: self.token_delay_ms.unwrap_or(DEFAULT_TOKEN_DELAY_MS),
            section_pause_ms: self.section_pause_ms.unwrap_or(DEFAULT_SECTION_PAUSE_MS),
            top_correlations: self.top_correlations.unwrap_or(DEFAULT_TOP_CORRELATIONS),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(DEFAULT_IQR_MULTIPLIER),
        };

        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Cleaning configuration
// ============================================================================

/// Configuration for the cleaning pass.
///
/// Every operation is off by default; an all-default config leaves the
/// data untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Remove rows that duplicate an earlier row.
    pub remove_duplicates: bool,

    /// Fill nulls in numeric columns with the column mean.
    pub fill_missing_with_mean: bool,

    /// Drop columns whose missing percentage is above this value.
    pub drop_missing_above_pct: Option<f64>,

    /// Remove rows whose value in this column is an IQR outlier.
    pub outlier_column: Option<String>,

    /// Multiplier for the outlier bounds.
    /// Default: 1.5
    pub outlier_multiplier: f64,

    /// Column conversions, applied in order.
    pub conversions: Vec<ColumnConversion>,

    /// Keep only these columns, in this order.
    pub keep_columns: Option<Vec<String>>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            remove_duplicates: false,
            fill_missing_with_mean: false,
            drop_missing_above_pct: None,
            outlier_column: None,
            outlier_multiplier: DEFAULT_IQR_MULTIPLIER,
            conversions: Vec::new(),
            keep_columns: None,
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// True when no cleaning operation is enabled.
    pub fn is_noop(&self) -> bool {
        !self.remove_duplicates
            && !self.fill_missing_with_mean
            && self.drop_missing_above_pct.is_none()
            && self.outlier_column.is_none()
            && self.conversions.is_empty()
            && self.keep_columns.is_none()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if let Some(pct) = self.drop_missing_above_pct
            && !(10.0..=90.0).contains(&pct)
        {
            return Err(ConfigValidationError::InvalidMissingThreshold(pct));
        }

        if !self.outlier_multiplier.is_finite() || self.outlier_multiplier <= 0.0 {
            return Err(ConfigValidationError::InvalidIqrMultiplier(
                self.outlier_multiplier,
            ));
        }

        if let Some(ref keep) = self.keep_columns
            && keep.is_empty()
        {
            return Err(ConfigValidationError::EmptyColumnSelection);
        }

        Ok(())
    }
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    remove_duplicates: Option<bool>,
    fill_missing_with_mean: Option<bool>,
    drop_missing_above_pct: Option<f64>,
    outlier_column: Option<String>,
    outlier_multiplier: Option<f64>,
    conversions: Vec<ColumnConversion>,
    keep_columns: Option<Vec<String>>,
}

impl CleaningConfigBuilder {
    /// Enable or disable duplicate row removal.
    pub fn remove_duplicates(mut self, remove: bool) -> Self {
        self.remove_duplicates = Some(remove);
        self
    }

    /// Enable or disable mean imputation of numeric columns.
    pub fn fill_missing_with_mean(mut self, fill: bool) -> Self {
        self.fill_missing_with_mean = Some(fill);
        self
    }

    /// Drop columns with more than `pct` percent missing values.
    ///
    /// # Arguments
    /// * `pct` - Value between 10 and 90 (e.g., 50 = 50%)
    pub fn drop_missing_above_pct(mut self, pct: f64) -> Self {
        self.drop_missing_above_pct = Some(pct);
        self
    }

    /// Remove IQR outlier rows for the given numeric column.
    pub fn outlier_column(mut self, column: impl Into<String>) -> Self {
        self.outlier_column = Some(column.into());
        self
    }

    /// Set the multiplier for the outlier bounds.
    pub fn outlier_multiplier(mut self, k: f64) -> Self {
        self.outlier_multiplier = Some(k);
        self
    }

    /// Queue a column conversion.
    pub fn convert(mut self, column: impl Into<String>, target: TargetType) -> Self {
        self.conversions.push(ColumnConversion {
            column: column.into(),
            target,
        });
        self
    }

    /// Keep only the given columns.
    pub fn keep_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keep_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let config = CleaningConfig {
            remove_duplicates: self.remove_duplicates.unwrap_or(false),
            fill_missing_with_mean: self.fill_missing_with_mean.unwrap_or(false),
            drop_missing_above_pct: self.drop_missing_above_pct,
            outlier_column: self.outlier_column,
            outlier_multiplier: self.outlier_multiplier.unwrap_or(DEFAULT_IQR_MULTIPLIER),
            conversions: self.conversions,
            keep_columns: self.keep_columns,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_summary_config() {
        let config = SummaryConfig::default();
        assert_eq!(config.token_delay(), Duration::from_millis(20));
        assert_eq!(config.section_pause(), Duration::from_millis(500));
        assert_eq!(config.top_correlations, 3);
        assert_eq!(config.iqr_multiplier, 1.5);
    }

    #[test]
    fn test_instant_config_has_no_pauses() {
        let config = SummaryConfig::instant();
        assert_eq!(config.token_delay(), Duration::ZERO);
        assert_eq!(config.section_pause(), Duration::ZERO);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_summary_builder_rejects_zero_pairs() {
        let result = SummaryConfig::builder().top_correlations(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidTopCorrelations(0)
        ));
    }

    #[test]
    fn test_summary_builder_rejects_bad_multiplier() {
        assert!(SummaryConfig::builder().iqr_multiplier(0.0).build().is_err());
        assert!(SummaryConfig::builder().iqr_multiplier(f64::NAN).build().is_err());
    }

    #[test]
    fn test_cleaning_default_is_noop() {
        let config = CleaningConfig::builder().build().unwrap();
        assert!(config.is_noop());
    }

    #[test]
    fn test_cleaning_builder_custom_values() {
        let config = CleaningConfig::builder()
            .remove_duplicates(true)
            .drop_missing_above_pct(40.0)
            .outlier_column("price")
            .convert("age", TargetType::Integer)
            .keep_columns(["age", "price"])
            .build()
            .unwrap();

        assert!(config.remove_duplicates);
        assert_eq!(config.drop_missing_above_pct, Some(40.0));
        assert_eq!(config.outlier_column.as_deref(), Some("price"));
        assert_eq!(config.conversions.len(), 1);
        assert_eq!(config.conversions[0].target, TargetType::Integer);
        assert_eq!(
            config.keep_columns,
            Some(vec!["age".to_string(), "price".to_string()])
        );
        assert!(!config.is_noop());
    }

    #[test]
    fn test_cleaning_threshold_out_of_range() {
        let result = CleaningConfig::builder().drop_missing_above_pct(95.0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidMissingThreshold(_)
        ));
    }

    #[test]
    fn test_cleaning_empty_selection_rejected() {
        let result = CleaningConfig::builder()
            .keep_columns(Vec::<String>::new())
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyColumnSelection
        ));
    }

    #[test]
    fn test_target_type_from_str() {
        assert_eq!("Integer".parse::<TargetType>().unwrap(), TargetType::Integer);
        assert_eq!("float".parse::<TargetType>().unwrap(), TargetType::Float);
        assert_eq!(" DATE ".parse::<TargetType>().unwrap(), TargetType::Date);
        assert!("complex".parse::<TargetType>().is_err());
    }

    #[test]
    fn test_summary_config_from_json() {
        let json = r#"{
            "token_delay_ms": 0,
            "section_pause_ms": 100,
            "top_correlations": 5,
            "iqr_multiplier": 3.0
        }"#;

        let config: SummaryConfig = serde_json::from_str(json).expect("Should deserialize");
        assert_eq!(config.section_pause(), Duration::from_millis(100));
        assert_eq!(config.top_correlations, 5);
        assert_eq!(config.iqr_multiplier, 3.0);
    }
}
