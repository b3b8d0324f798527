//! Rule-based recommendation engine.

use super::RecommendationEngine;
use crate::config::{DEFAULT_MISSING_DROP_THRESHOLD, ScrubConfig};
use crate::types::{
    Action, ChoiceReason, ColumnKind, OperationChoice, QualityReport, Recommendation,
    RecommendationKind,
};
use tracing::debug;

/// Fill actions offered for a numeric column with missing values.
const NUMERIC_FILL_ACTIONS: [Action; 4] = [
    Action::FillMean,
    Action::FillMedian,
    Action::FillMode,
    Action::DropRows,
];

/// Fill actions offered for any other column with missing values.
const GENERIC_FILL_ACTIONS: [Action; 2] = [Action::FillMode, Action::DropRows];

/// Recommendation engine driven by fixed thresholds.
///
/// Rules are evaluated in a fixed order (missing values, outliers, duplicates,
/// text inconsistencies) and columns in table order, so the same report always
/// yields the same list.
#[derive(Debug, Clone)]
pub struct RuleBasedRecommendationEngine {
    missing_drop_threshold: f64,
}

impl Default for RuleBasedRecommendationEngine {
    fn default() -> Self {
        Self {
            missing_drop_threshold: DEFAULT_MISSING_DROP_THRESHOLD,
        }
    }
}

impl RuleBasedRecommendationEngine {
    pub fn new(config: &ScrubConfig) -> Self {
        Self {
            missing_drop_threshold: config.missing_drop_threshold,
        }
    }

    fn missing_value_rules(&self, report: &QualityReport, out: &mut Vec<Recommendation>) {
        for col in report.columns.iter().filter(|c| c.missing_count > 0) {
            if col.missing_percentage > self.missing_drop_threshold {
                out.push(Recommendation {
                    kind: RecommendationKind::DropColumn,
                    column: Some(col.name.clone()),
                    message: format!(
                        "Drop column '{}' (more than {}% missing)",
                        col.name, self.missing_drop_threshold
                    ),
                    suggested_actions: vec![Action::DropColumn],
                });
            } else {
                out.push(Recommendation {
                    kind: RecommendationKind::FillMissing,
                    column: Some(col.name.clone()),
                    message: format!("Fill missing values in '{}' (use mean/median/mode)", col.name),
                    suggested_actions: fill_actions(col.kind).to_vec(),
                });
            }
        }
    }

    fn outlier_rules(report: &QualityReport, out: &mut Vec<Recommendation>) {
        for (name, _) in report.outliers().filter(|(_, count)| *count > 0) {
            out.push(Recommendation {
                kind: RecommendationKind::HandleOutliers,
                column: Some(name.to_string()),
                message: format!("Handle outliers in '{}' (cap/remove)", name),
                suggested_actions: vec![Action::OutlierCap, Action::OutlierRemove],
            });
        }
    }

    fn duplicate_rules(report: &QualityReport, out: &mut Vec<Recommendation>) {
        if report.duplicates > 0 {
            out.push(Recommendation {
                kind: RecommendationKind::RemoveDuplicates,
                column: None,
                message: "Remove duplicate rows".to_string(),
                suggested_actions: Vec::new(),
            });
        }
    }

    fn text_rules(report: &QualityReport, out: &mut Vec<Recommendation>) {
        for (name, _) in report.categorical_inconsistencies() {
            out.push(Recommendation {
                kind: RecommendationKind::StandardizeText,
                column: Some(name.to_string()),
                message: format!("Standardize text values in '{}' (trim/case)", name),
                suggested_actions: vec![Action::StandardizeText],
            });
        }
    }
}

impl RecommendationEngine for RuleBasedRecommendationEngine {
    fn recommend(&self, report: &QualityReport) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        self.missing_value_rules(report, &mut recommendations);
        Self::outlier_rules(report, &mut recommendations);
        Self::duplicate_rules(report, &mut recommendations);
        Self::text_rules(report, &mut recommendations);

        debug!("Derived {} recommendations", recommendations.len());
        recommendations
    }

    fn operation_choices(&self, report: &QualityReport) -> Vec<OperationChoice> {
        let mut choices = Vec::new();

        for (name, missing) in report.missing_values() {
            if missing == 0 {
                continue;
            }
            let kind = report
                .column(name)
                .map(|c| c.kind)
                .unwrap_or(ColumnKind::Other);
            choices.push(OperationChoice {
                column: name.to_string(),
                reason: ChoiceReason::MissingValues,
                actions: fill_actions(kind).to_vec(),
            });
        }

        for (name, count) in report.outliers() {
            if count > 0 {
                choices.push(OperationChoice {
                    column: name.to_string(),
                    reason: ChoiceReason::Outliers,
                    actions: vec![Action::OutlierCap, Action::OutlierRemove],
                });
            }
        }

        for (name, _) in report.categorical_inconsistencies() {
            choices.push(OperationChoice {
                column: name.to_string(),
                reason: ChoiceReason::TextInconsistency,
                actions: vec![Action::StandardizeText],
            });
        }

        for (name, _) in report.data_types() {
            choices.push(OperationChoice {
                column: name.to_string(),
                reason: ChoiceReason::ColumnRemoval,
                actions: vec![Action::DropColumn],
            });
        }

        choices
    }
}

fn fill_actions(kind: ColumnKind) -> &'static [Action] {
    match kind {
        ColumnKind::Numeric => &NUMERIC_FILL_ACTIONS,
        ColumnKind::Text | ColumnKind::Other => &GENERIC_FILL_ACTIONS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InconsistencyMode;
    use crate::types::ColumnQuality;
    use pretty_assertions::assert_eq;

    fn create_column(name: &str, kind: ColumnKind, missing: usize, rows: usize) -> ColumnQuality {
        ColumnQuality {
            name: name.to_string(),
            kind,
            dtype: match kind {
                ColumnKind::Numeric => "Int64".to_string(),
                ColumnKind::Text => "String".to_string(),
                ColumnKind::Other => "Boolean".to_string(),
            },
            missing_count: missing,
            missing_percentage: missing as f64 / rows as f64 * 100.0,
            outliers: (kind == ColumnKind::Numeric).then_some(0),
            inconsistent_values: None,
        }
    }

    fn create_report(columns: Vec<ColumnQuality>, duplicates: usize) -> QualityReport {
        QualityReport {
            shape: (10, columns.len()),
            columns,
            duplicates,
            inconsistency_mode: InconsistencyMode::AllDistinct,
        }
    }

    fn messages(recs: &[Recommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.message.as_str()).collect()
    }

    #[test]
    fn test_clean_report_has_no_recommendations() {
        let report = create_report(vec![create_column("a", ColumnKind::Numeric, 0, 10)], 0);
        assert!(RuleBasedRecommendationEngine::default().recommend(&report).is_empty());
    }

    #[test]
    fn test_missing_value_threshold() {
        let report = create_report(
            vec![
                create_column("notes", ColumnKind::Text, 6, 10),
                create_column("age", ColumnKind::Numeric, 1, 10),
                create_column("half", ColumnKind::Numeric, 5, 10),
            ],
            0,
        );
        let recs = RuleBasedRecommendationEngine::default().recommend(&report);
        assert_eq!(
            messages(&recs),
            vec![
                "Drop column 'notes' (more than 50% missing)",
                "Fill missing values in 'age' (use mean/median/mode)",
                "Fill missing values in 'half' (use mean/median/mode)",
            ]
        );
    }

    #[test]
    fn test_custom_threshold() {
        let config = ScrubConfig::builder().missing_drop_threshold(5.0).build().unwrap();
        let report = create_report(vec![create_column("age", ColumnKind::Numeric, 1, 10)], 0);
        let recs = RuleBasedRecommendationEngine::new(&config).recommend(&report);
        assert_eq!(
            messages(&recs),
            vec!["Drop column 'age' (more than 5% missing)"]
        );
    }

    #[test]
    fn test_rule_order() {
        let mut age = create_column("age", ColumnKind::Numeric, 0, 10);
        age.outliers = Some(2);
        let mut city = create_column("city", ColumnKind::Text, 1, 10);
        city.inconsistent_values = Some(vec!["NY".to_string(), "ny".to_string()]);

        let report = create_report(vec![age, city], 3);
        let recs = RuleBasedRecommendationEngine::default().recommend(&report);
        assert_eq!(
            messages(&recs),
            vec![
                "Fill missing values in 'city' (use mean/median/mode)",
                "Handle outliers in 'age' (cap/remove)",
                "Remove duplicate rows",
                "Standardize text values in 'city' (trim/case)",
            ]
        );
        assert_eq!(recs[0].suggested_actions, vec![Action::FillMode, Action::DropRows]);
        assert_eq!(recs[2].column, None);
    }

    #[test]
    fn test_operation_choices() {
        let mut age = create_column("age", ColumnKind::Numeric, 2, 10);
        age.outliers = Some(1);
        let report = create_report(vec![age, create_column("flag", ColumnKind::Other, 0, 10)], 0);

        let choices = RuleBasedRecommendationEngine::default().operation_choices(&report);
        let summary: Vec<(&str, ChoiceReason)> = choices
            .iter()
            .map(|c| (c.column.as_str(), c.reason))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("age", ChoiceReason::MissingValues),
                ("age", ChoiceReason::Outliers),
                ("age", ChoiceReason::ColumnRemoval),
                ("flag", ChoiceReason::ColumnRemoval),
            ]
        );
        assert_eq!(choices[0].actions, NUMERIC_FILL_ACTIONS.to_vec());
    }
}
