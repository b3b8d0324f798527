//! Data profiling module for dataset quality assessment.
//!
//! This module turns a table into a [`QualityReport`]:
//! - Missing value counts and percentages
//! - Duplicate row detection
//! - Tukey-fence outlier counts for numeric columns
//! - Categorical inconsistency detection for text columns

mod consistency;
mod statistics;

use crate::config::{InconsistencyMode, ScrubConfig};
use crate::error::{Result, ResultExt};
use crate::types::{ColumnKind, ColumnQuality, QualityReport};
use crate::utils::{numeric_values, percentage, series_kind};
use polars::prelude::*;
use tracing::{debug, info};

pub use statistics::TukeyFence;
pub(crate) use consistency::inconsistent_values;
pub(crate) use statistics::count_outliers;

/// Data profiler producing quality reports.
#[derive(Debug, Clone)]
pub struct DataProfiler {
    iqr_multiplier: f64,
    inconsistency_mode: InconsistencyMode,
}

impl Default for DataProfiler {
    fn default() -> Self {
        Self::new(&ScrubConfig::default())
    }
}

impl DataProfiler {
    pub fn new(config: &ScrubConfig) -> Self {
        Self {
            iqr_multiplier: config.iqr_multiplier,
            inconsistency_mode: config.inconsistency_mode,
        }
    }

    /// Profile an entire dataset.
    ///
    /// The table is only read. Column entries follow the table's column order.
    pub fn analyze(&self, df: &DataFrame) -> Result<QualityReport> {
        let mut columns = Vec::with_capacity(df.width());
        for col_name in df.get_column_names() {
            let quality = self
                .profile_column(df, col_name.as_str())
                .context(format!("Profiling column '{}'", col_name))?;
            columns.push(quality);
        }

        let duplicates = Self::count_duplicates(df)?;

        let report = QualityReport {
            shape: (df.height(), df.width()),
            columns,
            duplicates,
            inconsistency_mode: self.inconsistency_mode,
        };

        info!(
            "Analyzed {} rows x {} columns: {} missing cells, {} outliers, {} duplicate rows",
            report.row_count(),
            report.column_count(),
            report.total_missing(),
            report.total_outliers(),
            report.duplicates
        );

        Ok(report)
    }

    /// Rows equal to an earlier row across all columns.
    pub fn count_duplicates(df: &DataFrame) -> Result<usize> {
        if df.width() == 0 || df.height() == 0 {
            return Ok(0);
        }
        let distinct = df
            .unique::<&str, &str>(None, UniqueKeepStrategy::First, None)?
            .height();
        Ok(df.height().saturating_sub(distinct))
    }

    fn profile_column(&self, df: &DataFrame, col_name: &str) -> Result<ColumnQuality> {
        let series = df.column(col_name)?.as_materialized_series();
        let kind = series_kind(series);
        let missing_count = series.null_count();

        let outliers = match kind {
            ColumnKind::Numeric => {
                let values = numeric_values(series)?;
                Some(count_outliers(&values, self.iqr_multiplier))
            }
            _ => None,
        };

        let inconsistent_values = match kind {
            ColumnKind::Text => inconsistent_values(series, self.inconsistency_mode)?,
            _ => None,
        };

        debug!(
            "Column '{}' ({}): {} missing, outliers {:?}, inconsistent {}",
            col_name,
            kind,
            missing_count,
            outliers,
            inconsistent_values.is_some()
        );

        Ok(ColumnQuality {
            name: col_name.to_string(),
            kind,
            dtype: format!("{:?}", series.dtype()),
            missing_count,
            missing_percentage: percentage(missing_count, df.height()),
            outliers,
            inconsistent_values,
        })
    }
}
