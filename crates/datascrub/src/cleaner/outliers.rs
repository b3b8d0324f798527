//! Outlier handling for numeric columns.
//!
//! Both strategies recompute the Tukey fence on the column's current values,
//! so earlier operations in the same batch are taken into account.

use crate::error::Result;
use crate::profiler::TukeyFence;
use crate::utils::numeric_values;
use polars::prelude::*;
use tracing::debug;

/// Handles outlier treatment.
pub struct OutlierHandler;

impl OutlierHandler {
    /// Clamp every value into the fence; the column becomes Float64.
    pub fn cap(df: &mut DataFrame, col_name: &str, multiplier: f64) -> Result<String> {
        let series = df.column(col_name)?.as_materialized_series();
        let values = numeric_values(series)?;
        let Some(fence) = TukeyFence::from_values(&values, multiplier) else {
            return Ok("no finite fence; unchanged".to_string());
        };
        let total_outliers = fence.count_outside(&values);

        let float_series = series.cast(&DataType::Float64)?;
        let capped = float_series
            .f64()?
            .apply(|v| v.map(|val| if val.is_nan() { val } else { fence.clamp(val) }));

        df.replace(col_name, capped.into_series())?;

        debug!(
            "Capped {} outliers in '{}' to [{}, {}]",
            total_outliers, col_name, fence.lower, fence.upper
        );
        Ok(format!(
            "capped {} values to [{:.2}, {:.2}]",
            total_outliers, fence.lower, fence.upper
        ))
    }

    /// Remove rows whose value lies outside the fence. Null rows are kept.
    pub fn remove(df: &mut DataFrame, col_name: &str, multiplier: f64) -> Result<String> {
        let series = df.column(col_name)?.as_materialized_series();
        let values = numeric_values(series)?;
        let Some(fence) = TukeyFence::from_values(&values, multiplier) else {
            return Ok("no finite fence; unchanged".to_string());
        };

        let float_series = series.cast(&DataType::Float64)?;
        let keep: Vec<bool> = float_series
            .f64()?
            .into_iter()
            .map(|v| match v {
                Some(val) if !val.is_nan() => fence.contains(val),
                _ => true,
            })
            .collect();
        let mask = BooleanChunked::from_slice("mask".into(), &keep);

        let original_rows = df.height();
        let filtered = df.filter(&mask)?;
        let removed = original_rows - filtered.height();
        *df = filtered;

        debug!(
            "Removed {} outlier rows from '{}' outside [{}, {}]",
            removed, col_name, fence.lower, fence.upper
        );
        Ok(format!(
            "removed {} rows outside [{:.2}, {:.2}]",
            removed, fence.lower, fence.upper
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn age_df() -> DataFrame {
        df! { "age" => &[10i64, 12, 11, 13, 90] }.unwrap()
    }

    #[test]
    fn test_cap_outliers() {
        let mut df = age_df();
        let detail = OutlierHandler::cap(&mut df, "age", 1.5).unwrap();

        let age = df.column("age").unwrap().as_materialized_series();
        assert_eq!(age.dtype(), &DataType::Float64);
        let values: Vec<Option<f64>> = age.f64().unwrap().into_iter().collect();
        assert_eq!(
            values,
            vec![Some(10.0), Some(12.0), Some(11.0), Some(13.0), Some(16.0)]
        );
        assert!(detail.starts_with("capped 1 values"));
    }

    #[test]
    fn test_remove_outliers() {
        let mut df = age_df();
        OutlierHandler::remove(&mut df, "age", 1.5).unwrap();
        assert_eq!(df.height(), 4);
    }

    #[test]
    fn test_remove_keeps_null_rows() {
        let mut df = df! {
            "age" => &[Some(10i64), None, Some(12), Some(11), Some(13), Some(90)],
            "id" => &[1, 2, 3, 4, 5, 6],
        }
        .unwrap();
        OutlierHandler::remove(&mut df, "age", 1.5).unwrap();

        assert_eq!(df.height(), 5);
        assert_eq!(df.column("age").unwrap().null_count(), 1);
    }

    #[test]
    fn test_cap_all_null_is_noop() {
        let mut df = df! { "x" => &[None::<f64>, None] }.unwrap();
        let before = df.clone();
        OutlierHandler::cap(&mut df, "x", 1.5).unwrap();
        assert!(df.equals_missing(&before));
    }

    #[test]
    fn test_infinite_quartiles_leave_column_unchanged() {
        let source = df! { "x" => &[1.0, 2.0, f64::INFINITY, f64::INFINITY] }.unwrap();

        let mut capped = source.clone();
        let detail = OutlierHandler::cap(&mut capped, "x", 1.5).unwrap();
        assert_eq!(detail, "no finite fence; unchanged");
        assert!(capped.equals_missing(&source));

        let mut removed = source.clone();
        OutlierHandler::remove(&mut removed, "x", 1.5).unwrap();
        assert_eq!(removed.height(), 4);
    }
}
