//! Custom error types for the quality engine.
//!
//! This module provides the error hierarchy using `thiserror`. Errors are
//! serializable as `{code, message}` so a presentation layer can display them
//! without knowing the variant layout.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for loading, profiling and cleaning.
#[derive(Error, Debug)]
pub enum ScrubError {
    /// Input source could not be read as a table.
    #[error("Failed to load '{source_name}': {reason}")]
    Load { source_name: String, reason: String },

    /// Input file extension is not a supported table format.
    #[error("Unsupported input format '{0}' (expected .csv or .parquet)")]
    UnsupportedFormat(String),

    /// Column was not found in the table.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Operation is incompatible with the column's kind.
    #[error("Cannot apply {action} to column '{column}': {reason}")]
    PreconditionFailed {
        column: String,
        action: String,
        reason: String,
    },

    /// An aggregate (mean, median, mode) has no non-null values to work with.
    #[error("Cannot apply {action} to column '{column}': column has no non-null values")]
    EmptyAggregate { column: String, action: String },

    /// Session action issued before any table was loaded.
    #[error("No data loaded")]
    NoDataLoaded,

    /// Session action needs a quality report that has not been produced.
    #[error("No quality report available; run an analysis first")]
    NoReport,

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Operation text could not be parsed.
    #[error("Invalid operation '{0}' (expected <action>:<column>)")]
    InvalidOperation(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ScrubError>,
    },
}

impl ScrubError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ScrubError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Build a load error for the given source.
    pub fn load(source_name: impl Into<String>, reason: impl ToString) -> Self {
        ScrubError::Load {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// Get a stable error code.
    ///
    /// Codes are stable across releases so a frontend can branch on them
    /// (e.g. show a skipped operation differently from a failed load).
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Load { .. } => "LOAD_ERROR",
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::PreconditionFailed { .. } => "OPERATION_PRECONDITION",
            Self::EmptyAggregate { .. } => "EMPTY_AGGREGATE",
            Self::NoDataLoaded => "NO_DATA_LOADED",
            Self::NoReport => "NO_REPORT",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::InvalidOperation(_) => "INVALID_OPERATION",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error only affects a single operation or action, leaving
    /// the rest of the session usable.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::ColumnNotFound(_)
            | Self::PreconditionFailed { .. }
            | Self::EmptyAggregate { .. }
            | Self::NoDataLoaded
            | Self::NoReport
            | Self::InvalidConfig(_)
            | Self::InvalidOperation(_)
            | Self::Load { .. }
            | Self::UnsupportedFormat(_) => true,
            Self::Io(_) | Self::Polars(_) | Self::Json(_) => false,
            Self::WithContext { source, .. } => source.is_recoverable(),
        }
    }
}

impl Serialize for ScrubError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ScrubError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, ScrubError>;

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
        self.map_err(|e| ScrubError::Polars(e).with_context(context))
    }
}
