//! Categorical inconsistency detection for text columns.

use crate::config::InconsistencyMode;
use crate::utils::{normalize_text, text_cells};
use polars::prelude::*;
use std::collections::{HashMap, HashSet};

/// Raw values of a text column whose canonical forms collapse, or `None`
/// when raw and canonical distinct counts agree.
///
/// Values are ordered by descending frequency, then first appearance.
pub(crate) fn inconsistent_values(
    series: &Series,
    mode: InconsistencyMode,
) -> PolarsResult<Option<Vec<String>>> {
    let cells = text_cells(series)?;

    // Distinct raw values in first-appearance order with their counts
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for value in cells.into_iter().flatten() {
        match index.get(&value).and_then(|&i| counts.get_mut(i)) {
            Some(entry) => entry.1 += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }

    let mut raw_per_canonical: HashMap<String, usize> = HashMap::new();
    for (value, _) in &counts {
        *raw_per_canonical.entry(normalize_text(value)).or_insert(0) += 1;
    }

    if raw_per_canonical.len() == counts.len() {
        return Ok(None);
    }

    // Stable sort keeps first appearance among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let values = match mode {
        InconsistencyMode::AllDistinct => counts.into_iter().map(|(v, _)| v).collect(),
        InconsistencyMode::CollidingOnly => {
            let colliding: HashSet<&String> = raw_per_canonical
                .iter()
                .filter(|(_, n)| **n > 1)
                .map(|(canonical, _)| canonical)
                .collect();
            counts
                .iter()
                .filter(|(v, _)| colliding.contains(&normalize_text(v)))
                .map(|(v, _)| v.clone())
                .collect()
        }
    };

    Ok(Some(values))
}
