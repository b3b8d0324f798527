//! CLI entry point for the dataset quality tool.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use datascrub::{
    AnalysisDocument, InconsistencyMode, Operation, ReportGenerator, ScrubConfig, Session,
    render_preview, render_quality_report,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Dataset quality assessment and cleaning",
    long_about = "Profiles a tabular dataset (missing values, duplicates, outliers, \
                  inconsistent text) and applies column-level cleaning operations.\n\n\
                  EXAMPLES:\n  \
                  # Quality report with recommendations\n  \
                  datascrub analyze -i data.csv\n\n  \
                  # Machine-readable report\n  \
                  datascrub analyze -i data.csv --json\n\n  \
                  # Apply operations and export the cleaned table and log\n  \
                  datascrub clean -i data.csv --op fill_mean:age --op standardize_text:city -o outputs/"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Profile a dataset and print recommendations
    Analyze {
        /// Path to the CSV or Parquet file
        #[arg(short, long)]
        input: PathBuf,

        /// Output the analysis as JSON on stdout
        ///
        /// Disables all logging so stdout only contains the document.
        #[arg(long)]
        json: bool,

        /// Record only colliding raw values for inconsistent text columns
        #[arg(long)]
        colliding_only: bool,

        /// Missing percentage (0 - 100) above which dropping a column is recommended
        #[arg(long, default_value = "50")]
        missing_threshold: f64,

        /// Tukey fence multiplier for outlier detection
        #[arg(long, default_value = "1.5")]
        iqr_multiplier: f64,

        /// Write the analysis document to the output directory
        ///
        /// Saved as <input_name>_quality_report.json
        #[arg(short = 'r', long)]
        emit_report: bool,

        /// Output directory for the emitted report
        #[arg(short, long, default_value = "./outputs")]
        output: PathBuf,
    },

    /// Apply cleaning operations and export the result
    Clean {
        /// Path to the CSV or Parquet file
        #[arg(short, long)]
        input: PathBuf,

        /// Operation as <action>:<column>, e.g. fill_mean:age (repeatable)
        #[arg(long = "op", value_name = "ACTION:COLUMN")]
        ops: Vec<String>,

        /// JSON file with a list of {"column", "action"} operations
        ///
        /// Runs before any --op operations.
        #[arg(long)]
        ops_file: Option<PathBuf>,

        /// Tukey fence multiplier used by outlier operations
        #[arg(long, default_value = "1.5")]
        iqr_multiplier: f64,

        /// Output directory for the cleaned table and log
        #[arg(short, long, default_value = "./outputs")]
        output: PathBuf,

        /// Custom output file name (without extension)
        ///
        /// If not specified, uses "cleaned_dataset"
        #[arg(long)]
        output_name: Option<String>,
    },
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    let json_output = matches!(args.command, Command::Analyze { json: true, .. });
    init_logging(&args.log_level, args.quiet, json_output);

    match args.command {
        Command::Analyze {
            input,
            json,
            colliding_only,
            missing_threshold,
            iqr_multiplier,
            emit_report,
            output,
        } => {
            let mode = if colliding_only {
                InconsistencyMode::CollidingOnly
            } else {
                InconsistencyMode::AllDistinct
            };
            let config = ScrubConfig::builder()
                .missing_drop_threshold(missing_threshold)
                .iqr_multiplier(iqr_multiplier)
                .inconsistency_mode(mode)
                .output_dir(&output)
                .build()?;
            run_analyze(config, &input, json, emit_report)
        }
        Command::Clean {
            input,
            ops,
            ops_file,
            iqr_multiplier,
            output,
            output_name,
        } => {
            let config = ScrubConfig::builder()
                .iqr_multiplier(iqr_multiplier)
                .output_dir(&output)
                .build()?;
            let operations = collect_operations(&ops, ops_file.as_deref())?;
            run_clean(config, &input, &operations, output_name, args.quiet)
        }
    }
}

/// Profile the input and print (or emit) the analysis.
///
/// Note: This function uses `println!` intentionally for user-facing CLI output.
fn run_analyze(config: ScrubConfig, input: &Path, json: bool, emit_report: bool) -> Result<()> {
    let output_dir = config.output_dir.clone();
    let mut session = Session::new(config)?;
    session.load_path(input)?;

    let report = session.analyze()?.clone();
    let recommendations = session.recommendations()?;
    let choices = session.operation_choices()?;

    if json {
        let document = AnalysisDocument::new(
            &input.display().to_string(),
            report.clone(),
            recommendations.clone(),
            choices.clone(),
        );
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        println!("{}", render_quality_report(&report, &recommendations));
        if !choices.is_empty() {
            println!("\nAvailable operations (use --op <action>:<column>):");
            for choice in &choices {
                let actions: Vec<&str> = choice.actions.iter().map(|a| a.as_str()).collect();
                println!("  {:<24} {}", choice.column, actions.join(", "));
            }
        }
    }

    if emit_report {
        let document =
            AnalysisDocument::new(&input.display().to_string(), report, recommendations, choices);
        let generator = ReportGenerator::new(output_dir, None);
        let path = generator.write_analysis(&document, &extract_file_stem(input))?;
        if !json {
            println!("\nReport saved to: {}", path.display());
        }
    }

    Ok(())
}

/// Number of rows shown in the before/after preview.
const PREVIEW_ROWS: usize = 5;

/// Apply operations to the input and write the cleaned table and log.
///
/// Unless `quiet`, prints the first rows of the original and cleaned tables.
fn run_clean(
    config: ScrubConfig,
    input: &Path,
    operations: &[Operation],
    output_name: Option<String>,
    quiet: bool,
) -> Result<()> {
    if operations.is_empty() {
        warn!("No operations given; the exported table will equal the input");
    }

    let generator = ReportGenerator::new(config.output_dir.clone(), output_name);
    let mut session = Session::new(config)?;
    session.load_path(input)?;

    let log = session.apply(operations)?.clone();
    for skipped in &log.skipped {
        warn!("Skipped {}: {}", skipped.operation, skipped.message);
    }

    let current = session
        .current()
        .ok_or_else(|| anyhow!("no table after apply"))?;
    let table_path = generator.write_table(current)?;
    let log_path = generator.write_log(&log)?;
    info!("Cleaned table written to {}", table_path.display());

    if !quiet && let Some(original) = session.original() {
        println!("{}\n", render_preview(&original.df, current, PREVIEW_ROWS));
    }

    println!("{}", log.render());
    println!("Cleaned dataset: {}", table_path.display());
    println!("Cleaning report: {}", log_path.display());

    Ok(())
}

/// Gather operations from the ops file (first) and repeated --op flags.
fn collect_operations(ops: &[String], ops_file: Option<&Path>) -> Result<Vec<Operation>> {
    let mut operations = Vec::new();

    if let Some(path) = ops_file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read operations file {}", path.display()))?;
        let from_file: Vec<Operation> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid operations file {}", path.display()))?;
        operations.extend(from_file);
    }

    for op in ops {
        operations.push(op.parse::<Operation>()?);
    }

    Ok(operations)
}

fn extract_file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset")
        .to_string()
}
