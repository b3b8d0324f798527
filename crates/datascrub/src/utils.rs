//! Shared helpers for profiling and cleaning.
//!
//! Dtype classification, numeric extraction and quartile math live here so the
//! profiler and the transformer compute fences the same way.

use crate::types::ColumnKind;
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType holds text.
#[inline]
pub fn is_text_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::String | DataType::Categorical(_, _))
}

/// Get the kind of a DataType.
pub fn column_kind(dtype: &DataType) -> ColumnKind {
    if is_numeric_dtype(dtype) {
        ColumnKind::Numeric
    } else if is_text_dtype(dtype) {
        ColumnKind::Text
    } else {
        ColumnKind::Other
    }
}

/// Get the kind of a Series.
pub fn series_kind(series: &Series) -> ColumnKind {
    column_kind(series.dtype())
}

// =============================================================================
// Series Extraction Utilities
// =============================================================================

/// Non-null, non-NaN values of a numeric Series as f64, in row order.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<f64>> {
    let casted = series.cast(&DataType::Float64)?;
    Ok(casted
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect())
}

/// Values of a Series as text cells, preserving nulls and row order.
pub fn text_cells(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let casted = series.cast(&DataType::String)?;
    Ok(casted
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

// =============================================================================
// Statistics Utilities
// =============================================================================

/// Linear-interpolated quantile of an ascending slice.
///
/// Uses `pos = q * (n - 1)`; returns `None` for an empty slice.
pub fn quantile_sorted(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (values.len() as f64 - 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let low = *values.get(lower)?;
    if lower == upper {
        return Some(low);
    }
    let high = *values.get(upper)?;
    Some(low + (high - low) * (pos - lower as f64))
}

/// Percentage of `count` over `total`; 0 when `total` is 0.
#[inline]
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

// =============================================================================
// Text Utilities
// =============================================================================

/// Canonical form of a text cell: surrounding whitespace removed, lowercased.
pub fn normalize_text(value: &str) -> String {
    value.trim().to_lowercase()
}
