//! Summary table export.
//!
//! Writes the eight-row `Metric,Count` table.

use crate::analysis::Aggregates;
use crate::config::SummaryRowSet;
use crate::models::{SponsorCategory, StudyType};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// One row of the summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "Metric")]
    pub metric: &'static str,
    #[serde(rename = "Count")]
    pub count: usize,
}

impl SummaryRow {
    fn new(metric: &'static str, count: usize) -> Self {
        Self { metric, count }
    }
}

/// Build the summary rows in their fixed order.
///
/// `Unique Conditions` counts condition mentions across all trials, not
/// distinct names.
pub fn summary_rows(aggregates: &Aggregates, row_set: SummaryRowSet) -> Vec<SummaryRow> {
    let mut rows = vec![
        SummaryRow::new("Total Trials", aggregates.total_trials),
        SummaryRow::new(
            "Interventional",
            aggregates.study_type_count(&StudyType::Interventional),
        ),
        SummaryRow::new(
            "Observational",
            aggregates.study_type_count(&StudyType::Observational),
        ),
        SummaryRow::new("Drug-based", aggregates.primary.drug),
        SummaryRow::new("Device-based", aggregates.primary.device),
        SummaryRow::new("Biological", aggregates.primary.biological),
    ];

    match row_set {
        SummaryRowSet::SponsorCategories => {
            rows.push(SummaryRow::new(
                "Industry Sponsors",
                aggregates.sponsor_category_count(SponsorCategory::Industry),
            ));
            rows.push(SummaryRow::new(
                "Academic Sponsors",
                aggregates.sponsor_category_count(SponsorCategory::Academic),
            ));
        }
        SummaryRowSet::Diversity => {
            rows.push(SummaryRow::new("Unique Sponsors", aggregates.unique_sponsors));
            rows.push(SummaryRow::new(
                "Unique Conditions",
                aggregates.condition_instances,
            ));
        }
    }

    rows
}

/// Serialize rows as CSV into any writer.
pub fn write_summary_to<W: Write>(writer: W, rows: &[SummaryRow]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the summary table to a file.
pub fn write_summary(path: &Path, rows: &[SummaryRow]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create summary file {}", path.display()))?;
    write_summary_to(file, rows)
        .with_context(|| format!("Failed to write summary to {}", path.display()))
}
