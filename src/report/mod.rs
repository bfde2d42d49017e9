//! Report output.
//!
//! Charts, the summary table, the console digest and the JSON export.

pub mod charts;
pub mod generator;
pub mod summary;

pub use charts::{render_dashboard, render_intervention_breakdown, RenderContext};
pub use generator::{
    generate_banner, generate_footer, generate_insights_section, generate_overview_section,
    write_json_report, JsonReport, ReportMetadata,
};
pub use summary::{summary_rows, write_summary};

use crate::config::OutputConfig;
use std::path::{Path, PathBuf};

/// Resolved locations of every output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub dashboard: PathBuf,
    pub breakdown: PathBuf,
    pub summary: PathBuf,
}

impl OutputPaths {
    /// Join the configured file names onto the output directory.
    pub fn new(output_dir: &Path, config: &OutputConfig) -> Self {
        Self {
            dashboard: output_dir.join(&config.dashboard),
            breakdown: output_dir.join(&config.breakdown),
            summary: output_dir.join(&config.summary),
        }
    }
}
