use crate::config::InconsistencyMode;
use crate::error::ScrubError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Column kinds
// ============================================================================

/// Primitive kind of a column, fixed by the column's typed storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Text,
    Other,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Text => "text",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// ============================================================================
// Operations
// ============================================================================

/// Cleaning action applied to a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    DropColumn,
    FillMean,
    FillMedian,
    FillMode,
    DropRows,
    OutlierCap,
    OutlierRemove,
    StandardizeText,
}

impl Action {
    /// Every action, in the order a form would list them.
    pub const ALL: [Action; 8] = [
        Action::DropColumn,
        Action::FillMean,
        Action::FillMedian,
        Action::FillMode,
        Action::DropRows,
        Action::OutlierCap,
        Action::OutlierRemove,
        Action::StandardizeText,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DropColumn => "drop_column",
            Self::FillMean => "fill_mean",
            Self::FillMedian => "fill_median",
            Self::FillMode => "fill_mode",
            Self::DropRows => "drop_rows",
            Self::OutlierCap => "outlier_cap",
            Self::OutlierRemove => "outlier_remove",
            Self::StandardizeText => "standardize_text",
        }
    }

    /// Whether the action only makes sense on a numeric column.
    pub fn requires_numeric(&self) -> bool {
        match self {
            Self::FillMean | Self::FillMedian | Self::OutlierCap | Self::OutlierRemove => true,
            Self::DropColumn | Self::FillMode | Self::DropRows | Self::StandardizeText => false,
        }
    }

    /// Check the action against a column kind.
    pub fn accepts(&self, kind: ColumnKind) -> bool {
        !self.requires_numeric() || kind == ColumnKind::Numeric
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ScrubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s.trim())
            .ok_or_else(|| ScrubError::InvalidOperation(s.to_string()))
    }
}

/// A request to apply one action to one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub column: String,
    pub action: Action,
}

impl Operation {
    pub fn new(action: Action, column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            action,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on column '{}'", self.action, self.column)
    }
}

/// Parses the `<action>:<column>` form, e.g. `fill_mean:age`.
impl FromStr for Operation {
    type Err = ScrubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (action, column) = s
            .split_once(':')
            .ok_or_else(|| ScrubError::InvalidOperation(s.to_string()))?;
        if column.is_empty() {
            return Err(ScrubError::InvalidOperation(s.to_string()));
        }
        let action = action
            .parse::<Action>()
            .map_err(|_| ScrubError::InvalidOperation(s.to_string()))?;
        Ok(Operation::new(action, column))
    }
}

// ============================================================================
// Quality report
// ============================================================================

/// Quality metrics for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnQuality {
    pub name: String,
    pub kind: ColumnKind,
    /// Polars dtype, e.g. "Int64", "String".
    pub dtype: String,
    pub missing_count: usize,
    pub missing_percentage: f64,
    /// Tukey-fence outlier count; present for numeric columns only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outliers: Option<usize>,
    /// Raw values recorded when trimming/lowercasing collapses distinct values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inconsistent_values: Option<Vec<String>>,
}

/// Snapshot of a table's quality at one point in time.
///
/// Column entries keep the table's column order, which also fixes the order
/// of recommendations derived from the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub shape: (usize, usize),
    pub columns: Vec<ColumnQuality>,
    pub duplicates: usize,
    pub inconsistency_mode: InconsistencyMode,
}

impl QualityReport {
    pub fn row_count(&self) -> usize {
        self.shape.0
    }

    pub fn column_count(&self) -> usize {
        self.shape.1
    }

    pub fn column(&self, name: &str) -> Option<&ColumnQuality> {
        self.columns.iter().find(|col| col.name == name)
    }

    /// Column → null count, for every column.
    pub fn missing_values(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.columns
            .iter()
            .map(|col| (col.name.as_str(), col.missing_count))
    }

    /// Column → null percentage, for every column.
    pub fn missing_percentage(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.columns
            .iter()
            .map(|col| (col.name.as_str(), col.missing_percentage))
    }

    /// Numeric column → outlier count.
    pub fn outliers(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.columns
            .iter()
            .filter_map(|col| col.outliers.map(|count| (col.name.as_str(), count)))
    }

    /// Flagged text column → recorded raw values.
    pub fn categorical_inconsistencies(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.columns.iter().filter_map(|col| {
            col.inconsistent_values
                .as_deref()
                .map(|values| (col.name.as_str(), values))
        })
    }

    /// Column → kind, for every column.
    pub fn data_types(&self) -> impl Iterator<Item = (&str, ColumnKind)> + '_ {
        self.columns.iter().map(|col| (col.name.as_str(), col.kind))
    }

    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|col| col.missing_count).sum()
    }

    pub fn total_outliers(&self) -> usize {
        self.outliers().map(|(_, count)| count).sum()
    }

    /// True when no check found anything to fix.
    pub fn is_clean(&self) -> bool {
        self.total_missing() == 0
            && self.total_outliers() == 0
            && self.duplicates == 0
            && self.categorical_inconsistencies().next().is_none()
    }
}

// ============================================================================
// Recommendations
// ============================================================================

/// Category of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    DropColumn,
    FillMissing,
    HandleOutliers,
    RemoveDuplicates,
    StandardizeText,
}

/// A human-readable remediation suggestion derived from a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub message: String,
    /// Actions that would address the finding.
    pub suggested_actions: Vec<Action>,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Menu of actions offered for one column after an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationChoice {
    pub column: String,
    pub reason: ChoiceReason,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceReason {
    MissingValues,
    Outliers,
    TextInconsistency,
    ColumnRemoval,
}
