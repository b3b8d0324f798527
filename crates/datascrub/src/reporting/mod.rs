//! Report generation module.
//!
//! This module renders quality reports and writes the export artifacts:
//! - JSON analysis documents (`--json` output and `--emit-report` files)
//! - Cleaned tables as CSV
//! - Plain-text cleaning logs
//!
//! # Example
//!
//! ```rust,ignore
//! use datascrub::reporting::{AnalysisDocument, ReportGenerator};
//!
//! let document = AnalysisDocument::new("data/survey.csv", report, recommendations, choices);
//! println!("{}", serde_json::to_string_pretty(&document)?);
//!
//! let generator = ReportGenerator::new(PathBuf::from("outputs"), None);
//! generator.write_analysis(&document, "survey")?;
//! ```

mod generator;

pub use generator::{
    AnalysisDocument, DEFAULT_LOG_NAME, DEFAULT_TABLE_NAME, ReportGenerator,
    render_preview, render_quality_report,
};
