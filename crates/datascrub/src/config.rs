//! Configuration types for the quality engine.
//!
//! This module provides configuration options using the builder pattern.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default Tukey fence multiplier.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Default missing percentage above which dropping a column is recommended.
pub const DEFAULT_MISSING_DROP_THRESHOLD: f64 = 50.0;

/// How categorical inconsistencies are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InconsistencyMode {
    /// Record every distinct raw value of a flagged column
    #[default]
    AllDistinct,
    /// Record only raw values whose canonical form collides with another value
    CollidingOnly,
}

/// Configuration for profiling and cleaning.
///
/// Use [`ScrubConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use datascrub::config::{InconsistencyMode, ScrubConfig};
///
/// let config = ScrubConfig::builder()
///     .missing_drop_threshold(40.0)
///     .inconsistency_mode(InconsistencyMode::CollidingOnly)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrubConfig {
    /// Missing percentage (0 - 100) above which dropping a column is
    /// recommended instead of filling it.
    /// Default: 50.0
    pub missing_drop_threshold: f64,

    /// Multiplier applied to the IQR when building the Tukey fence.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Which raw values are recorded for an inconsistent text column.
    /// Default: AllDistinct
    pub inconsistency_mode: InconsistencyMode,

    /// Number of rows used by the CSV reader to infer column types.
    /// `None` scans the whole file.
    /// Default: Some(100)
    pub infer_schema_length: Option<usize>,

    /// Output directory for exported tables, logs and reports.
    /// Default: "./outputs"
    pub output_dir: PathBuf,
}

impl Default for ScrubConfig {
    fn default() -> Self {
        Self {
            missing_drop_threshold: DEFAULT_MISSING_DROP_THRESHOLD,
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            inconsistency_mode: InconsistencyMode::default(),
            infer_schema_length: Some(100),
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

impl ScrubConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ScrubConfigBuilder {
        ScrubConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=100.0).contains(&self.missing_drop_threshold) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "missing_drop_threshold".to_string(),
                value: self.missing_drop_threshold,
            });
        }

        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier < 0.0 {
            return Err(ConfigValidationError::InvalidIqrMultiplier(
                self.iqr_multiplier,
            ));
        }

        if self.infer_schema_length == Some(0) {
            return Err(ConfigValidationError::InvalidSchemaLength);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0 and 100)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid IQR multiplier: {0} (must be a finite, non-negative number)")]
    InvalidIqrMultiplier(f64),

    #[error("Invalid schema inference length: 0 (use None to scan the whole file)")]
    InvalidSchemaLength,
}

impl From<ConfigValidationError> for crate::error::ScrubError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::ScrubError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`ScrubConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ScrubConfigBuilder {
    missing_drop_threshold: Option<f64>,
    iqr_multiplier: Option<f64>,
    inconsistency_mode: Option<InconsistencyMode>,
    infer_schema_length: Option<Option<usize>>,
    output_dir: Option<PathBuf>,
}

impl ScrubConfigBuilder {
    /// Set the missing percentage above which a column drop is recommended.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0 and 100 (e.g., 50.0 = 50%)
    pub fn missing_drop_threshold(mut self, threshold: f64) -> Self {
        self.missing_drop_threshold = Some(threshold);
        self
    }

    /// Set the Tukey fence multiplier.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Set how categorical inconsistencies are reported.
    pub fn inconsistency_mode(mut self, mode: InconsistencyMode) -> Self {
        self.inconsistency_mode = Some(mode);
        self
    }

    /// Set the number of rows scanned for CSV type inference.
    pub fn infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Set the output directory for exports.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ScrubConfig` or an error if validation fails.
    pub fn build(self) -> Result<ScrubConfig, ConfigValidationError> {
        let config = ScrubConfig {
            missing_drop_threshold: self
                .missing_drop_threshold
                .unwrap_or(DEFAULT_MISSING_DROP_THRESHOLD),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(DEFAULT_IQR_MULTIPLIER),
            inconsistency_mode: self.inconsistency_mode.unwrap_or_default(),
            infer_schema_length: self.infer_schema_length.unwrap_or(Some(100)),
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from("./outputs")),
        };

        config.validate()?;
        Ok(config)
    }
}
