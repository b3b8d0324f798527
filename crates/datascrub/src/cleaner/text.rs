//! Text standardization.

use crate::error::Result;
use crate::types::ColumnKind;
use crate::utils::{normalize_text, series_kind, text_cells};
use polars::prelude::*;
use tracing::debug;

/// Trim and lowercase every non-null cell of a text column.
///
/// Non-text columns are left unchanged. Applying it twice equals applying it
/// once.
pub(crate) fn standardize_text(df: &mut DataFrame, col_name: &str) -> Result<String> {
    let series = df.column(col_name)?.as_materialized_series();
    if series_kind(series) != ColumnKind::Text {
        return Ok("not a text column; unchanged".to_string());
    }

    let mut changed = 0usize;
    let cleaned_values: Vec<Option<String>> = text_cells(series)?
        .into_iter()
        .map(|cell| {
            cell.map(|val| {
                let cleaned = normalize_text(&val);
                if cleaned != val {
                    changed += 1;
                }
                cleaned
            })
        })
        .collect();

    let cleaned_series = Series::new(col_name.into(), cleaned_values);
    df.replace(col_name, cleaned_series)?;

    debug!("Standardized {} text values in '{}'", changed, col_name);
    Ok(format!("standardized {} values", changed))
}
