//! Data cleaning module applying column-level operations.
//!
//! This module provides:
//! - Column and row removal
//! - Missing value fills (via [`crate::imputers`])
//! - Outlier capping and removal
//! - Text standardization
//!
//! Operations run in order on a working copy; the caller's table is never
//! touched. A failing operation is logged as skipped and the batch continues.

mod log;
mod outliers;
mod text;

pub use log::{AppliedEntry, CleaningLog, SkippedEntry};
pub use outliers::OutlierHandler;

use crate::config::ScrubConfig;
use crate::error::{Result, ScrubError};
use crate::imputers::StatisticalImputer;
use crate::types::{Action, Operation};
use crate::utils::series_kind;
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Result of an apply batch.
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    pub table: DataFrame,
    pub log: CleaningLog,
}

/// Applies cleaning operations to tables.
#[derive(Debug, Clone)]
pub struct Transformer {
    iqr_multiplier: f64,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new(&ScrubConfig::default())
    }
}

impl Transformer {
    pub fn new(config: &ScrubConfig) -> Self {
        Self {
            iqr_multiplier: config.iqr_multiplier,
        }
    }

    /// Apply `operations` in order to a copy of `df`.
    ///
    /// Never fails as a whole: each operation either replaces the working
    /// copy or is recorded as skipped.
    pub fn apply(&self, df: &DataFrame, operations: &[Operation]) -> CleaningOutcome {
        let mut working = df.clone();
        let mut log = CleaningLog::new(df.shape(), operations.len());

        info!("Applying {} cleaning operations...", operations.len());

        for operation in operations {
            // Each step runs on its own copy so a failure leaves `working` as it was
            let mut candidate = working.clone();
            match self.apply_one(&mut candidate, operation) {
                Ok(detail) => {
                    debug!("Applied {}: {}", operation, detail);
                    working = candidate;
                    log.record_applied(operation.clone(), detail);
                }
                Err(e) => {
                    warn!("Skipped {}: {}", operation, e);
                    log.record_skipped(operation.clone(), &e);
                }
            }
        }

        log.result_shape = working.shape();
        info!(
            "Cleaning completed: {} applied, {} skipped, shape {:?} -> {:?}",
            log.applied.len(),
            log.skipped.len(),
            log.baseline_shape,
            log.result_shape
        );

        CleaningOutcome {
            table: working,
            log,
        }
    }

    fn apply_one(&self, df: &mut DataFrame, operation: &Operation) -> Result<String> {
        let col_name = operation.column.as_str();
        let kind = match df.column(col_name) {
            Ok(col) => series_kind(col.as_materialized_series()),
            Err(_) => return Err(ScrubError::ColumnNotFound(col_name.to_string())),
        };

        if !operation.action.accepts(kind) {
            return Err(ScrubError::PreconditionFailed {
                column: col_name.to_string(),
                action: operation.action.to_string(),
                reason: format!("column is {}, not numeric", kind),
            });
        }

        match operation.action {
            Action::DropColumn => {
                *df = df.drop(col_name)?;
                Ok("column removed".to_string())
            }
            Action::FillMean => StatisticalImputer::fill_mean(df, col_name),
            Action::FillMedian => StatisticalImputer::fill_median(df, col_name),
            Action::FillMode => StatisticalImputer::fill_mode(df, col_name),
            Action::DropRows => Self::drop_null_rows(df, col_name),
            Action::OutlierCap => OutlierHandler::cap(df, col_name, self.iqr_multiplier),
            Action::OutlierRemove => OutlierHandler::remove(df, col_name, self.iqr_multiplier),
            Action::StandardizeText => text::standardize_text(df, col_name),
        }
    }

    fn drop_null_rows(df: &mut DataFrame, col_name: &str) -> Result<String> {
        let mask = df.column(col_name)?.as_materialized_series().is_not_null();
        let original_rows = df.height();
        let filtered = df.filter(&mask)?;
        let removed = original_rows - filtered.height();
        *df = filtered;
        Ok(format!("removed {} rows with missing values", removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> DataFrame {
        df! {
            "age" => &[Some(10i64), Some(12), None, Some(11), Some(13), Some(90)],
            "city" => &[Some("NY"), Some("ny "), Some(" Ny"), None, Some("NY"), Some("LA")],
        }
        .unwrap()
    }

    fn ops(specs: &[&str]) -> Vec<Operation> {
        specs.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn test_apply_without_operations_is_identity() {
        let df = sample();
        let outcome = Transformer::default().apply(&df, &[]);

        assert!(outcome.table.equals_missing(&df));
        assert_eq!(outcome.log.requested, 0);
        assert!(outcome.log.applied.is_empty());
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let df = sample();
        let snapshot = df.clone();
        let _ = Transformer::default().apply(&df, &ops(&["drop_column:age", "drop_rows:city"]));
        assert!(df.equals_missing(&snapshot));
    }

    #[test]
    fn test_operations_run_in_order() {
        let df = sample();
        let outcome = Transformer::default()
            .apply(&df, &ops(&["drop_rows:age", "outlier_remove:age"]));

        assert_eq!(outcome.log.applied.len(), 2);
        assert_eq!(outcome.table.height(), 4);
        assert_eq!(outcome.log.result_shape, (4, 2));
        assert_eq!(outcome.log.baseline_shape, (6, 2));
    }

    #[test]
    fn test_drop_then_fill_is_skipped() {
        let df = sample();
        let outcome = Transformer::default()
            .apply(&df, &ops(&["drop_column:age", "fill_mean:age"]));

        assert_eq!(outcome.log.applied.len(), 1);
        assert_eq!(outcome.log.skipped.len(), 1);
        assert_eq!(outcome.log.skipped[0].code, "COLUMN_NOT_FOUND");
        assert_eq!(outcome.table.width(), 1);
    }

    #[test]
    fn test_numeric_action_on_text_is_skipped() {
        let df = sample();
        let outcome = Transformer::default().apply(&df, &ops(&["fill_mean:city"]));

        assert_eq!(outcome.log.skipped[0].code, "OPERATION_PRECONDITION");
        assert!(outcome.table.equals_missing(&df));
    }

    #[test]
    fn test_failed_step_keeps_previous_result() {
        let df = df! {
            "x" => &[None::<f64>, None],
            "y" => &[Some(1i64), None],
        }
        .unwrap();
        let outcome = Transformer::default()
            .apply(&df, &ops(&["fill_mean:y", "fill_median:x", "drop_rows:x"]));

        assert_eq!(outcome.log.applied.len(), 2);
        assert_eq!(outcome.log.skipped[0].code, "EMPTY_AGGREGATE");
        assert_eq!(outcome.table.height(), 0);
    }

    #[test]
    fn test_standardize_and_mode() {
        let df = sample();
        let outcome = Transformer::default()
            .apply(&df, &ops(&["standardize_text:city", "fill_mode:city"]));

        let city: Vec<Option<&str>> = outcome
            .table
            .column("city")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(
            city,
            vec![
                Some("ny"),
                Some("ny"),
                Some("ny"),
                Some("ny"),
                Some("ny"),
                Some("la")
            ]
        );
    }

    #[test]
    fn test_shape_matches_log() {
        let df = sample();
        let outcome = Transformer::default().apply(
            &df,
            &ops(&["outlier_cap:age", "fill_median:age", "drop_column:city"]),
        );
        assert_eq!(outcome.table.shape(), outcome.log.result_shape);
        assert_eq!(outcome.table.shape(), (6, 1));
    }
}
