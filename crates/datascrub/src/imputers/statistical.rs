//! Statistical imputation methods.
//!
//! Provides mean, median and mode fills. Each method mutates the working table
//! only after the replacement column is fully built, and returns a short detail
//! line for the cleaning log.

use crate::error::{Result, ScrubError};
use crate::types::Action;
use polars::prelude::*;
use tracing::debug;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill nulls of a numeric column with the mean of its non-null values.
    pub fn fill_mean(df: &mut DataFrame, col_name: &str) -> Result<String> {
        let series = df.column(col_name)?.as_materialized_series().clone();
        if series.null_count() == 0 {
            return Ok("no missing values; unchanged".to_string());
        }
        let mean_val = series.mean().ok_or_else(|| ScrubError::EmptyAggregate {
            column: col_name.to_string(),
            action: Action::FillMean.to_string(),
        })?;
        Self::fill_with_value(df, col_name, mean_val, &series, "mean")
    }

    /// Fill nulls of a numeric column with the median of its non-null values.
    pub fn fill_median(df: &mut DataFrame, col_name: &str) -> Result<String> {
        let series = df.column(col_name)?.as_materialized_series().clone();
        if series.null_count() == 0 {
            return Ok("no missing values; unchanged".to_string());
        }
        let median_val = series.median().ok_or_else(|| ScrubError::EmptyAggregate {
            column: col_name.to_string(),
            action: Action::FillMedian.to_string(),
        })?;
        Self::fill_with_value(df, col_name, median_val, &series, "median")
    }

    /// Fill nulls with the most frequent non-null value, any column kind.
    ///
    /// Ties resolve to the smallest value, so the result does not depend on
    /// hash ordering.
    pub fn fill_mode(df: &mut DataFrame, col_name: &str) -> Result<String> {
        let series = df.column(col_name)?.as_materialized_series();
        let null_count = series.null_count();
        if null_count == 0 {
            return Ok("no missing values; unchanged".to_string());
        }
        if null_count == series.len() {
            return Err(ScrubError::EmptyAggregate {
                column: col_name.to_string(),
                action: Action::FillMode.to_string(),
            });
        }

        let mode_expr = col(col_name)
            .drop_nulls()
            .mode()
            .sort(SortOptions::default())
            .first();

        let mode_df = df
            .clone()
            .lazy()
            .select([mode_expr.clone().alias("mode")])
            .collect()?;
        let mode_val = mode_df.column("mode")?.get(0)?.str_value().to_string();

        let filled = df
            .clone()
            .lazy()
            .with_column(col(col_name).fill_null(mode_expr))
            .collect()?;
        *df = filled;

        debug!("Filled {} nulls in '{}' with mode {}", null_count, col_name, mode_val);
        Ok(format!("filled {} missing with mode: {}", null_count, mode_val))
    }

    /// Fill numeric column with a specific value; the column becomes Float64.
    fn fill_with_value(
        df: &mut DataFrame,
        col_name: &str,
        fill_value: f64,
        series: &Series,
        method: &str,
    ) -> Result<String> {
        let null_count = series.null_count();
        let casted = series.cast(&DataType::Float64)?;
        let result_vec: Vec<Option<f64>> = casted
            .f64()?
            .into_iter()
            .map(|v| Some(v.unwrap_or(fill_value)))
            .collect();

        let result = Series::new(col_name.into(), result_vec);
        df.replace(col_name, result)?;

        debug!(
            "Filled {} nulls in '{}' with {} {}",
            null_count, col_name, method, fill_value
        );
        Ok(format!(
            "filled {} missing with {}: {:.2}",
            null_count, method, fill_value
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_f64(df: &DataFrame, name: &str, idx: usize) -> Option<f64> {
        df.column(name).unwrap().as_materialized_series().f64().unwrap().get(idx)
    }

    #[test]
    fn test_fill_mean() {
        let mut df = df! { "x" => &[Some(1i64), None, Some(5)] }.unwrap();
        let detail = StatisticalImputer::fill_mean(&mut df, "x").unwrap();

        assert_eq!(df.column("x").unwrap().dtype(), &DataType::Float64);
        assert_eq!(get_f64(&df, "x", 1), Some(3.0));
        assert_eq!(df.column("x").unwrap().null_count(), 0);
        assert!(detail.contains("mean: 3.00"));
    }

    #[test]
    fn test_fill_median() {
        let mut df = df! { "x" => &[Some(1.0), None, Some(2.0), Some(10.0)] }.unwrap();
        StatisticalImputer::fill_median(&mut df, "x").unwrap();
        assert_eq!(get_f64(&df, "x", 1), Some(2.0));
    }

    #[test]
    fn test_fill_mean_without_nulls_is_noop() {
        let mut df = df! { "x" => &[1i64, 2, 3] }.unwrap();
        let before = df.clone();
        StatisticalImputer::fill_mean(&mut df, "x").unwrap();
        assert!(df.equals_missing(&before));
    }

    #[test]
    fn test_fill_mean_all_null_is_empty_aggregate() {
        let mut df = df! { "x" => &[None::<f64>, None] }.unwrap();
        let err = StatisticalImputer::fill_mean(&mut df, "x").unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_AGGREGATE");
    }

    #[test]
    fn test_fill_mode_text() {
        let mut df = df! {
            "city" => &[Some("NY"), None, Some("LA"), Some("NY")],
        }
        .unwrap();
        let detail = StatisticalImputer::fill_mode(&mut df, "city").unwrap();

        let city = df.column("city").unwrap().as_materialized_series();
        assert_eq!(city.str().unwrap().get(1), Some("NY"));
        assert_eq!(city.null_count(), 0);
        assert!(detail.contains("NY"));
    }

    #[test]
    fn test_fill_mode_tie_takes_smallest() {
        let mut df = df! { "x" => &[Some(7i64), Some(3), None, Some(7), Some(3)] }.unwrap();
        StatisticalImputer::fill_mode(&mut df, "x").unwrap();

        let x = df.column("x").unwrap().as_materialized_series();
        assert_eq!(x.dtype(), &DataType::Int64);
        assert_eq!(x.i64().unwrap().get(2), Some(3));
    }

    #[test]
    fn test_fill_mode_all_null() {
        let mut df = df! { "x" => &[None::<&str>, None] }.unwrap();
        let err = StatisticalImputer::fill_mode(&mut df, "x").unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_AGGREGATE");
    }
}
