//! Session state for one load → analyze → apply → export workflow.
//!
//! A [`Session`] owns every piece of state a presentation layer needs between
//! user actions:
//!
//! ```text
//! ┌──────────────────────────────┬──────────────────────────────┐
//! │ original: LoadedTable        │ current: DataFrame           │
//! │ (fixed after load)           │ (replaced by every apply)    │
//! ├──────────────────────────────┼──────────────────────────────┤
//! │ report: QualityReport        │ log: CleaningLog             │
//! │ (replaced by every analyze)  │ (replaced by every apply)    │
//! └──────────────────────────────┴──────────────────────────────┘
//! ```
//!
//! Each action builds its new value completely before assigning the slot, so
//! a failed action leaves the previous state untouched. `version` increases on
//! every replacement.

use crate::cleaner::{CleaningLog, Transformer};
use crate::config::ScrubConfig;
use crate::decisions::{RecommendationEngine, RuleBasedRecommendationEngine};
use crate::error::{Result, ScrubError};
use crate::io;
use crate::profiler::DataProfiler;
use crate::types::{Operation, OperationChoice, QualityReport, Recommendation};
use polars::prelude::*;
use std::path::Path;
use tracing::info;

/// A table as it was loaded, with the name of its source.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub df: DataFrame,
    pub source_name: String,
}

/// Owned, versioned workflow state.
pub struct Session {
    config: ScrubConfig,
    profiler: DataProfiler,
    transformer: Transformer,
    engine: Box<dyn RecommendationEngine>,

    original: Option<LoadedTable>,
    current: Option<DataFrame>,
    report: Option<QualityReport>,
    log: Option<CleaningLog>,
    version: u64,
}

static_assertions::assert_impl_all!(Session: Send);
static_assertions::assert_impl_all!(LoadedTable: Send, Sync);

impl Default for Session {
    fn default() -> Self {
        Self::build(ScrubConfig::default())
    }
}

impl Session {
    /// Create a session after validating the configuration.
    pub fn new(config: ScrubConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ScrubConfig) -> Self {
        Self {
            profiler: DataProfiler::new(&config),
            transformer: Transformer::new(&config),
            engine: Box::new(RuleBasedRecommendationEngine::new(&config)),
            config,
            original: None,
            current: None,
            report: None,
            log: None,
            version: 0,
        }
    }

    /// Replace the recommendation engine.
    pub fn with_engine(mut self, engine: Box<dyn RecommendationEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn config(&self) -> &ScrubConfig {
        &self.config
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn original(&self) -> Option<&LoadedTable> {
        self.original.as_ref()
    }

    pub fn current(&self) -> Option<&DataFrame> {
        self.current.as_ref()
    }

    pub fn report(&self) -> Option<&QualityReport> {
        self.report.as_ref()
    }

    pub fn log(&self) -> Option<&CleaningLog> {
        self.log.as_ref()
    }

    // ========================================================================
    // Load
    // ========================================================================

    /// Load a CSV or Parquet file. On failure the previous state is kept.
    pub fn load_path(&mut self, path: &Path) -> Result<()> {
        let df = io::load_table(path, &self.config)?;
        self.install(df, path.display().to_string());
        Ok(())
    }

    /// Load CSV content received from an upload.
    pub fn load_csv_bytes(&mut self, bytes: &[u8], source_name: &str) -> Result<()> {
        let df = io::read_csv_bytes(bytes, source_name, &self.config)?;
        self.install(df, source_name.to_string());
        Ok(())
    }

    /// Load an in-memory table.
    pub fn load_table(&mut self, df: DataFrame, source_name: impl Into<String>) {
        self.install(df, source_name.into());
    }

    fn install(&mut self, df: DataFrame, source_name: String) {
        info!(
            "Session loaded '{}' ({} rows x {} columns)",
            source_name,
            df.height(),
            df.width()
        );
        self.current = Some(df.clone());
        self.original = Some(LoadedTable { df, source_name });
        self.report = None;
        self.log = None;
        self.version += 1;
    }

    // ========================================================================
    // Analyze
    // ========================================================================

    /// Profile the current table and store the report.
    pub fn analyze(&mut self) -> Result<&QualityReport> {
        let current = self.current.as_ref().ok_or(ScrubError::NoDataLoaded)?;
        let report = self.profiler.analyze(current)?;
        self.version += 1;
        Ok(self.report.insert(report))
    }

    /// Recommendations for the last report.
    pub fn recommendations(&self) -> Result<Vec<Recommendation>> {
        let report = self.report.as_ref().ok_or(ScrubError::NoReport)?;
        Ok(self.engine.recommend(report))
    }

    /// Action menus for the last report.
    pub fn operation_choices(&self) -> Result<Vec<OperationChoice>> {
        let report = self.report.as_ref().ok_or(ScrubError::NoReport)?;
        Ok(self.engine.operation_choices(report))
    }

    // ========================================================================
    // Apply
    // ========================================================================

    /// Apply operations to the current table.
    ///
    /// Individual operation failures end up in the log; only a missing table
    /// fails the call. The log's baseline is the originally loaded shape.
    pub fn apply(&mut self, operations: &[Operation]) -> Result<&CleaningLog> {
        let current = self.current.as_ref().ok_or(ScrubError::NoDataLoaded)?;
        let original_shape = self
            .original
            .as_ref()
            .map(|t| t.df.shape())
            .unwrap_or_else(|| current.shape());

        let outcome = self.transformer.apply(current, operations);
        self.current = Some(outcome.table);
        self.version += 1;
        Ok(self.log.insert(outcome.log.with_baseline(original_shape)))
    }

    /// Restore the current table to the originally loaded one.
    pub fn reset(&mut self) -> Result<()> {
        let original = self.original.as_ref().ok_or(ScrubError::NoDataLoaded)?;
        self.current = Some(original.df.clone());
        self.report = None;
        self.log = None;
        self.version += 1;
        Ok(())
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Current table as CSV bytes.
    pub fn export_csv(&self) -> Result<Vec<u8>> {
        let current = self.current.as_ref().ok_or(ScrubError::NoDataLoaded)?;
        io::to_csv_bytes(current)
    }

    /// Last cleaning log as text, if an apply has run.
    pub fn export_log(&self) -> Option<String> {
        self.log.as_ref().map(CleaningLog::render)
    }
}
