//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.trialstats.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".trialstats.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Aggregation settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Output file settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Chart rendering settings.
    #[serde(default)]
    pub charts: ChartConfig,
}

/// Which pair of rows closes the summary table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryRowSet {
    /// Industry Sponsors, Academic Sponsors
    #[default]
    SponsorCategories,
    /// Unique Sponsors, Unique Conditions
    Diversity,
}

/// Top-N cut sizes and summary layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Intervention types shown on the dashboard.
    #[serde(default = "default_top_interventions")]
    pub top_n_interventions: usize,

    /// Intervention types shown on the standalone breakdown chart.
    #[serde(default = "default_top_interventions_detail")]
    pub top_n_interventions_detail: usize,

    /// Sponsors shown on the dashboard.
    #[serde(default = "default_top_sponsors")]
    pub top_n_sponsors: usize,

    /// Conditions shown on the dashboard.
    #[serde(default = "default_top_conditions")]
    pub top_n_conditions: usize,

    /// Entries listed per ranking in the console digest.
    #[serde(default = "default_digest_top")]
    pub digest_top_n: usize,

    /// Closing rows of the summary table.
    #[serde(default)]
    pub summary_rows: SummaryRowSet,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_n_interventions: default_top_interventions(),
            top_n_interventions_detail: default_top_interventions_detail(),
            top_n_sponsors: default_top_sponsors(),
            top_n_conditions: default_top_conditions(),
            digest_top_n: default_digest_top(),
            summary_rows: SummaryRowSet::default(),
        }
    }
}

fn default_top_interventions() -> usize {
    10
}

fn default_top_interventions_detail() -> usize {
    15
}

fn default_top_sponsors() -> usize {
    12
}

fn default_top_conditions() -> usize {
    15
}

fn default_digest_top() -> usize {
    5
}

/// Output file names, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Multi-panel dashboard image.
    #[serde(default = "default_dashboard")]
    pub dashboard: String,

    /// Standalone intervention breakdown image.
    #[serde(default = "default_breakdown")]
    pub breakdown: String,

    /// Summary table.
    #[serde(default = "default_summary")]
    pub summary: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dashboard: default_dashboard(),
            breakdown: default_breakdown(),
            summary: default_summary(),
        }
    }
}

fn default_dashboard() -> String {
    "cell_therapy_analysis_2025.svg".to_string()
}

fn default_breakdown() -> String {
    "intervention_types_2025.svg".to_string()
}

fn default_summary() -> String {
    "trial_summary_2025.csv".to_string()
}

/// Chart rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Dashboard size in pixels (width, height).
    #[serde(default = "default_dashboard_size")]
    pub dashboard_size: (u32, u32),

    /// Breakdown chart size in pixels (width, height).
    #[serde(default = "default_breakdown_size")]
    pub breakdown_size: (u32, u32),

    /// Font family for all text.
    #[serde(default = "default_font")]
    pub font: String,

    /// Dashboard title.
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            dashboard_size: default_dashboard_size(),
            breakdown_size: default_breakdown_size(),
            font: default_font(),
            title: default_title(),
        }
    }
}

fn default_dashboard_size() -> (u32, u32) {
    (1800, 1400)
}

fn default_breakdown_size() -> (u32, u32) {
    (1400, 800)
}

fn default_font() -> String {
    "sans-serif".to_string()
}

fn default_title() -> String {
    "2025 Cell Therapy Clinical Trials: Comprehensive Analysis".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load `.trialstats.toml` from `dir`.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default_in(dir: &Path) -> Result<Option<Self>> {
        let default_path = dir.join(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(&default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only explicitly provided CLI values override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(rows) = args.summary_rows {
            self.pipeline.summary_rows = rows;
        }
    }

    /// Reject settings that would produce empty views.
    pub fn validate(&self) -> Result<()> {
        let p = &self.pipeline;
        let cuts = [
            ("top_n_interventions", p.top_n_interventions),
            ("top_n_interventions_detail", p.top_n_interventions_detail),
            ("top_n_sponsors", p.top_n_sponsors),
            ("top_n_conditions", p.top_n_conditions),
            ("digest_top_n", p.digest_top_n),
        ];
        for (name, value) in cuts {
            if value == 0 {
                anyhow::bail!("pipeline.{} must be at least 1", name);
            }
        }

        let sizes = [
            ("dashboard_size", self.charts.dashboard_size),
            ("breakdown_size", self.charts.breakdown_size),
        ];
        for (name, (w, h)) in sizes {
            if w < 200 || h < 200 {
                anyhow::bail!("charts.{} must be at least 200x200 pixels", name);
            }
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
