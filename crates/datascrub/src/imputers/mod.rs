//! Imputation module for handling missing values.
//!
//! Statistical imputation (mean, median, mode) backing the fill actions.

mod statistical;

pub use statistical::StatisticalImputer;
