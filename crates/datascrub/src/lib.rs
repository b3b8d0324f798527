//! Dataset Quality Assessment Library
//!
//! A dataset quality-assessment and cleaning engine built on Polars.
//!
//! # Overview
//!
//! - **Profiling**: missing values, duplicate rows, Tukey-fence outliers and
//!   categorical inconsistencies, collected into a [`QualityReport`]
//! - **Recommendations**: deterministic remediation suggestions derived from a
//!   report
//! - **Cleaning**: an ordered list of column-level [`Operation`]s applied to a
//!   working copy, with a [`CleaningLog`] of what ran and what was skipped
//! - **Session**: owned state for a load → analyze → apply → export workflow
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use datascrub::{Action, Operation, ScrubConfig, Session};
//! use std::path::Path;
//!
//! let mut session = Session::new(ScrubConfig::default())?;
//! session.load_path(Path::new("data.csv"))?;
//!
//! let report = session.analyze()?;
//! println!("{} duplicate rows", report.duplicates);
//! for rec in session.recommendations()? {
//!     println!("- {}", rec);
//! }
//!
//! let log = session.apply(&[
//!     Operation::new(Action::FillMedian, "age"),
//!     Operation::new(Action::StandardizeText, "city"),
//! ])?;
//! println!("{}", log.render());
//!
//! let csv = session.export_csv()?;
//! ```
//!
//! # Engine Without a Session
//!
//! ```rust,ignore
//! use datascrub::{DataProfiler, Transformer};
//!
//! let report = DataProfiler::default().analyze(&df)?;
//! let outcome = Transformer::default().apply(&df, &operations);
//! // `df` is untouched; the cleaned table is `outcome.table`
//! ```

pub mod cleaner;
pub mod config;
pub mod decisions;
pub mod error;
pub mod imputers;
pub mod io;
pub mod profiler;
pub mod reporting;
pub mod session;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{CleaningLog, CleaningOutcome, Transformer};
pub use config::{ConfigValidationError, InconsistencyMode, ScrubConfig, ScrubConfigBuilder};
pub use decisions::{RecommendationEngine, RuleBasedRecommendationEngine};
pub use error::{Result as ScrubResult, ResultExt, ScrubError};
pub use imputers::StatisticalImputer;
pub use profiler::{DataProfiler, TukeyFence};
pub use reporting::{AnalysisDocument, ReportGenerator, render_preview, render_quality_report};
pub use session::{LoadedTable, Session};
pub use types::{
    Action, ChoiceReason, ColumnKind, ColumnQuality, Operation, OperationChoice, QualityReport,
    Recommendation, RecommendationKind,
};

static_assertions::assert_impl_all!(QualityReport: Send, Sync);
static_assertions::assert_impl_all!(CleaningOutcome: Send, Sync);
static_assertions::assert_impl_all!(ScrubError: Send, Sync);
