//! Recommendation module deriving remediation suggestions from reports.

mod rule_engine;

pub use rule_engine::RuleBasedRecommendationEngine;

use crate::types::{OperationChoice, QualityReport, Recommendation};

/// Trait for recommendation engines.
///
/// Implementations must be pure: the same report yields the same output.
pub trait RecommendationEngine: Send + Sync {
    /// Human-readable remediation suggestions, in a deterministic order.
    fn recommend(&self, report: &QualityReport) -> Vec<Recommendation>;

    /// Per-column menu of actions a caller can offer for selection.
    fn operation_choices(&self, report: &QualityReport) -> Vec<OperationChoice>;
}
