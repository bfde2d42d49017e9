//! Console digest and JSON report generation.
//!
//! Builds the fixed-format text report printed after a run, and the
//! optional JSON export of every aggregate.

use crate::analysis::{percent, Aggregates, RankedEntry};
use crate::config::PipelineConfig;
use crate::models::{StudyType, TrialDataset};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

const RULE_WIDTH: usize = 70;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Generate the banner printed before loading.
pub fn generate_banner() -> String {
    format!(
        "{}\n2025 CELL THERAPY CLINICAL TRIALS ANALYSIS\n{}\n",
        rule(),
        rule()
    )
}

/// Generate the load confirmation and data overview.
pub fn generate_overview_section(dataset: &TrialDataset, aggregates: &Aggregates) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "\n✓ Loaded {} completed trials from 2025\n",
        dataset.len()
    ));

    let columns: Vec<String> = dataset.columns.iter().map(|c| format!("'{}'", c)).collect();
    section.push_str(&format!("\nColumns: [{}]\n", columns.join(", ")));

    let study_types: Vec<String> = aggregates
        .study_types
        .iter()
        .map(|e| format!("'{}': {}", e.label, e.count))
        .collect();
    section.push_str(&format!("\nStudy Types: {{{}}}\n", study_types.join(", ")));

    section
}

/// Generate the KEY INSIGHTS digest.
pub fn generate_insights_section(aggregates: &Aggregates, config: &PipelineConfig) -> String {
    let mut section = String::new();
    let total = aggregates.total_trials;

    section.push_str(&format!("\n{}\nKEY INSIGHTS\n{}\n", rule(), rule()));

    section.push_str("\n1. TRIAL OVERVIEW\n");
    section.push_str(&format!("   • Total completed trials: {}\n", total));
    section.push_str(&format!(
        "   • Interventional trials: {}\n",
        aggregates.study_type_count(&StudyType::Interventional)
    ));
    section.push_str(&format!(
        "   • Observational trials: {}\n",
        aggregates.study_type_count(&StudyType::Observational)
    ));

    let primary = &aggregates.primary;
    section.push_str("\n2. INTERVENTION LANDSCAPE\n");
    section.push_str(&format!(
        "   • Drug-based trials: {} ({:.1}%)\n",
        primary.drug,
        percent(primary.drug, total)
    ));
    section.push_str(&format!(
        "   • Device-based trials: {} ({:.1}%)\n",
        primary.device,
        percent(primary.device, total)
    ));
    section.push_str(&format!(
        "   • Biological interventions: {} ({:.1}%)\n",
        primary.biological,
        percent(primary.biological, total)
    ));

    section.push_str("\n3. TOP CONDITIONS\n");
    section.push_str(&generate_ranked_list(
        &aggregates.top_conditions,
        config.digest_top_n,
    ));

    section.push_str("\n4. LEADING SPONSORS\n");
    section.push_str(&generate_ranked_list(
        &aggregates.top_sponsors,
        config.digest_top_n,
    ));

    section.push_str("\n5. SPONSOR DIVERSITY\n");
    for share in &aggregates.sponsor_categories {
        section.push_str(&format!(
            "   • {}: {} trials ({:.1}%)\n",
            share.category, share.count, share.percent
        ));
    }

    section
}

/// Numbered list of the first `n` entries.
fn generate_ranked_list(entries: &[RankedEntry], n: usize) -> String {
    entries
        .iter()
        .take(n)
        .enumerate()
        .map(|(i, e)| format!("   {}. {}: {} trials\n", i + 1, e.label, e.count))
        .collect()
}

/// Generate the closing banner and the list of files written.
pub fn generate_footer(written: &[(&Path, &str)]) -> String {
    let mut footer = String::new();

    footer.push_str(&format!("\n{}\nANALYSIS COMPLETE\n{}\n", rule(), rule()));

    if !written.is_empty() {
        footer.push_str("\nGenerated files:\n");
        for (path, description) in written {
            footer.push_str(&format!("  • {} ({})\n", path.display(), description));
        }
    }

    footer
}

/// Metadata about a run, included in the JSON export.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Input file the records were read from.
    pub input: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of records loaded.
    pub total_records: usize,
    /// Column names found in the input header.
    pub columns: Vec<String>,
}

/// The complete JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport<'a> {
    pub metadata: ReportMetadata,
    pub pipeline: &'a PipelineConfig,
    pub aggregates: &'a Aggregates,
}

/// Generate a JSON report.
pub fn generate_json_report(report: &JsonReport<'_>) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write a JSON report to a file.
pub fn write_json_report(report: &JsonReport<'_>, path: &Path) -> Result<()> {
    let content = generate_json_report(report)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write JSON report to {}", path.display()))
}
