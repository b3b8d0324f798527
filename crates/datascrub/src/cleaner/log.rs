//! Cleaning log produced by an apply batch.

use crate::error::ScrubError;
use crate::types::Operation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An operation that changed (or deliberately left) the working table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedEntry {
    pub operation: Operation,
    pub detail: String,
}

/// An operation that was not applied, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedEntry {
    pub operation: Operation,
    pub code: String,
    pub message: String,
}

impl SkippedEntry {
    pub fn new(operation: Operation, error: &ScrubError) -> Self {
        Self {
            operation,
            code: error.error_code().to_string(),
            message: error.to_string(),
        }
    }
}

/// Record of one apply batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningLog {
    /// Shape the batch is reported against.
    pub baseline_shape: (usize, usize),
    pub result_shape: (usize, usize),
    pub requested: usize,
    pub applied: Vec<AppliedEntry>,
    pub skipped: Vec<SkippedEntry>,
}

impl CleaningLog {
    pub fn new(baseline_shape: (usize, usize), requested: usize) -> Self {
        Self {
            baseline_shape,
            result_shape: baseline_shape,
            requested,
            applied: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Replace the baseline, e.g. with the shape of the originally loaded
    /// table when the batch ran on an already cleaned one.
    pub fn with_baseline(mut self, baseline_shape: (usize, usize)) -> Self {
        self.baseline_shape = baseline_shape;
        self
    }

    pub fn record_applied(&mut self, operation: Operation, detail: impl Into<String>) {
        self.applied.push(AppliedEntry {
            operation,
            detail: detail.into(),
        });
    }

    pub fn record_skipped(&mut self, operation: Operation, error: &ScrubError) {
        self.skipped.push(SkippedEntry::new(operation, error));
    }

    pub fn has_skipped(&self) -> bool {
        !self.skipped.is_empty()
    }

    /// Plain-text rendering written to the log export.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CleaningLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Data Cleaning Report")?;
        writeln!(f)?;
        writeln!(f, "## Summary")?;
        writeln!(
            f,
            "- Original shape: ({}, {})",
            self.baseline_shape.0, self.baseline_shape.1
        )?;
        writeln!(
            f,
            "- Cleaned shape: ({}, {})",
            self.result_shape.0, self.result_shape.1
        )?;
        writeln!(f, "- Operations requested: {}", self.requested)?;
        writeln!(f, "- Operations applied: {}", self.applied.len())?;
        writeln!(f)?;

        writeln!(f, "## Applied Operations")?;
        if self.applied.is_empty() {
            writeln!(f, "- None")?;
        }
        for entry in &self.applied {
            writeln!(f, "- {} ({})", entry.operation, entry.detail)?;
        }

        if !self.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "## Skipped Operations")?;
            for entry in &self.skipped {
                writeln!(
                    f,
                    "- {} [{}]: {}",
                    entry.operation, entry.code, entry.message
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Action;

    #[test]
    fn test_render_log() {
        let mut log = CleaningLog::new((5, 2), 2);
        log.record_applied(Operation::new(Action::FillMean, "age"), "filled 1 missing");
        log.record_skipped(
            Operation::new(Action::FillMean, "gone"),
            &ScrubError::ColumnNotFound("gone".to_string()),
        );
        log.result_shape = (5, 2);

        let text = log.render();
        assert!(text.starts_with("# Data Cleaning Report"));
        assert!(text.contains("- Original shape: (5, 2)"));
        assert!(text.contains("- Operations requested: 2"));
        assert!(text.contains("- Operations applied: 1"));
        assert!(text.contains("- fill_mean on column 'age' (filled 1 missing)"));
        assert!(text.contains("- fill_mean on column 'gone' [COLUMN_NOT_FOUND]"));
    }

    #[test]
    fn test_render_without_operations() {
        let log = CleaningLog::new((3, 1), 0);
        let text = log.render();
        assert!(text.contains("- Operations applied: 0"));
        assert!(!text.contains("## Skipped Operations"));
        assert!(!log.has_skipped());
    }
}
