use crate::cleaner::CleaningLog;
use crate::error::Result;
use crate::io;
use crate::types::{OperationChoice, QualityReport, Recommendation};
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Default file stem for the exported table.
pub const DEFAULT_TABLE_NAME: &str = "cleaned_dataset";

/// Default file name for the exported cleaning log.
pub const DEFAULT_LOG_NAME: &str = "cleaning_report.txt";

// ============================================================================
// Analysis Document
// ============================================================================

/// Analysis result bundled for JSON output (`--json`) and file writing
/// (`--emit-report`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisDocument {
    /// Timestamp when the document was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    pub report: QualityReport,
    pub recommendations: Vec<Recommendation>,
    pub operation_choices: Vec<OperationChoice>,
}

impl AnalysisDocument {
    pub fn new(
        input_file: &str,
        report: QualityReport,
        recommendations: Vec<Recommendation>,
        operation_choices: Vec<OperationChoice>,
    ) -> Self {
        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            report,
            recommendations,
            operation_choices,
        }
    }
}

// ============================================================================
// Report Generator
// ============================================================================

/// Writes analysis documents, cleaned tables and cleaning logs.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    output_dir: PathBuf,
    output_name: Option<String>,
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf, output_name: Option<String>) -> Self {
        Self {
            output_dir,
            output_name,
        }
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    /// Write an analysis document as `<base>_quality_report.json`.
    pub fn write_analysis(&self, document: &AnalysisDocument, base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_quality_report.json", base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(document)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }

    /// Write the cleaned table as CSV.
    pub fn write_table(&self, df: &DataFrame) -> Result<PathBuf> {
        let file_name = self.output_name.as_deref().unwrap_or(DEFAULT_TABLE_NAME);
        let output_path = self.output_dir.join(format!("{}.csv", file_name));
        io::save_csv(df, &output_path)?;
        Ok(output_path)
    }

    /// Write the plain-text cleaning log.
    pub fn write_log(&self, log: &CleaningLog) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let file_name = match &self.output_name {
            Some(name) => format!("{}_{}", name, DEFAULT_LOG_NAME),
            None => DEFAULT_LOG_NAME.to_string(),
        };
        let log_path = self.output_dir.join(file_name);
        fs::write(&log_path, log.render())?;

        info!("Cleaning log saved: {}", log_path.display());
        Ok(log_path)
    }
}

// ============================================================================
// Text Rendering
// ============================================================================

/// Render a quality report and its recommendations for terminal output.
pub fn render_quality_report(report: &QualityReport, recommendations: &[Recommendation]) -> String {
    QualityReportText {
        report,
        recommendations,
    }
    .to_string()
}

/// Render the first `rows` rows of the original and cleaned tables.
pub fn render_preview(original: &DataFrame, cleaned: &DataFrame, rows: usize) -> String {
    format!(
        "Original data (first {rows} rows):\n{}\n\nCleaned data (first {rows} rows):\n{}",
        original.head(Some(rows)),
        cleaned.head(Some(rows)),
    )
}

struct QualityReportText<'a> {
    report: &'a QualityReport,
    recommendations: &'a [Recommendation],
}

impl fmt::Display for QualityReportText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let rule = "=".repeat(60);

        writeln!(f, "{}", rule)?;
        writeln!(f, "DATA QUALITY REPORT")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Total Rows:      {}", report.row_count())?;
        writeln!(f, "Total Columns:   {}", report.column_count())?;
        writeln!(f, "Duplicate Rows:  {}", report.duplicates)?;

        writeln!(f, "\nMissing Values")?;
        writeln!(f, "{:<24} {:<8} {:>8} {:>10}", "Column", "Kind", "Count", "Percent")?;
        for col in &report.columns {
            writeln!(
                f,
                "{:<24} {:<8} {:>8} {:>9.2}%",
                col.name, col.kind, col.missing_count, col.missing_percentage
            )?;
        }

        let mut outliers = report.outliers().peekable();
        if outliers.peek().is_some() {
            writeln!(f, "\nOutliers (Tukey fence)")?;
            for (name, count) in outliers {
                writeln!(f, "{:<24} {:>8}", name, count)?;
            }
        }

        let mut inconsistencies = report.categorical_inconsistencies().peekable();
        if inconsistencies.peek().is_some() {
            writeln!(f, "\nCategorical Inconsistencies")?;
            for (name, values) in inconsistencies {
                writeln!(f, "{}: {:?}", name, values)?;
            }
        }

        writeln!(f, "\nRecommendations")?;
        if self.recommendations.is_empty() {
            writeln!(f, "- No issues found")?;
        }
        for rec in self.recommendations {
            writeln!(f, "- {}", rec)?;
        }
        write!(f, "{}", rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InconsistencyMode;
    use crate::types::{ColumnKind, ColumnQuality, RecommendationKind};

    fn sample_report() -> QualityReport {
        QualityReport {
            shape: (5, 1),
            columns: vec![ColumnQuality {
                name: "age".to_string(),
                kind: ColumnKind::Numeric,
                dtype: "Int64".to_string(),
                missing_count: 1,
                missing_percentage: 20.0,
                outliers: Some(1),
                inconsistent_values: None,
            }],
            duplicates: 0,
            inconsistency_mode: InconsistencyMode::AllDistinct,
        }
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("datascrub_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_render_quality_report() {
        let recs = vec![Recommendation {
            kind: RecommendationKind::HandleOutliers,
            column: Some("age".to_string()),
            message: "Handle outliers in 'age' (cap/remove)".to_string(),
            suggested_actions: vec![],
        }];
        let text = render_quality_report(&sample_report(), &recs);

        assert!(text.contains("Total Rows:      5"));
        assert!(text.contains("    20.00%"));
        assert!(text.contains("Outliers (Tukey fence)"));
        assert!(text.contains("- Handle outliers in 'age' (cap/remove)"));
        assert!(!text.contains("Categorical Inconsistencies"));
    }

    #[test]
    fn test_render_preview_limits_rows() {
        let original = df! { "age" => &[10i64, 12, 11, 13, 90] }.unwrap();
        let cleaned = df! { "age" => &[10.0, 12.0, 11.0, 13.0, 16.0] }.unwrap();
        let text = render_preview(&original, &cleaned, 2);

        assert!(text.starts_with("Original data (first 2 rows):"));
        assert!(text.contains("Cleaned data (first 2 rows):"));
        assert_eq!(text.matches("shape: (2, 1)").count(), 2);
        assert!(!text.contains("90"));
    }

    #[test]
    fn test_write_analysis_document() {
        let dir = temp_dir("analysis");
        let generator = ReportGenerator::new(dir.clone(), None);
        let doc = AnalysisDocument::new("data/sample.csv", sample_report(), vec![], vec![]);

        let path = generator.write_analysis(&doc, "sample").unwrap();
        assert!(path.ends_with("sample_quality_report.json"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["input_file"], "data/sample.csv");
        assert_eq!(json["report"]["columns"][0]["outliers"], 1);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_write_table_and_log_names() {
        let dir = temp_dir("exports");
        let df = df! { "age" => &[1i64, 2] }.unwrap();
        let log = CleaningLog::new((2, 1), 0);

        let generator = ReportGenerator::new(dir.clone(), None);
        assert!(generator.write_table(&df).unwrap().ends_with("cleaned_dataset.csv"));
        assert!(generator.write_log(&log).unwrap().ends_with("cleaning_report.txt"));

        let named = ReportGenerator::new(dir.clone(), Some("survey".to_string()));
        assert!(named.write_table(&df).unwrap().ends_with("survey.csv"));
        let log_path = named.write_log(&log).unwrap();
        assert!(log_path.ends_with("survey_cleaning_report.txt"));
        assert!(fs::read_to_string(log_path).unwrap().starts_with("# Data Cleaning Report"));

        let _ = fs::remove_dir_all(dir);
    }
}
