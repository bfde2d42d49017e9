//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::config::SummaryRowSet;
use clap::Parser;
use std::path::PathBuf;

/// trialstats - descriptive report for clinical-trial CSV exports
///
/// Counts trials by study type, intervention category, sponsor and
/// condition, renders a dashboard and a breakdown chart, and writes a
/// summary table.
///
/// Examples:
///   trialstats
///   trialstats 2025_Cell_Therapy_Trials.csv --output-dir reports
///   trialstats trials.csv --summary-rows diversity --json aggregates.json
///   trialstats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// CSV export of trial records
    #[arg(value_name = "INPUT", default_value = "2025_Cell_Therapy_Trials.csv")]
    pub input: PathBuf,

    /// Directory the charts and summary table are written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Path to configuration file
    ///
    /// If not specified, looks for .trialstats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Closing rows of the summary table
    ///
    /// Overrides the config file setting.
    #[arg(long, value_name = "SET")]
    pub summary_rows: Option<SummaryRowSet>,

    /// Also export every aggregate as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Skip chart rendering
    #[arg(long)]
    pub no_charts: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .trialstats.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(format!(
                "Output path is not a directory: {}",
                self.output_dir.display()
            ));
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
