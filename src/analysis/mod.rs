//! Analysis modules.
//!
//! Feature extraction turns raw records into tagged records; aggregation
//! counts them into the ranked views the reporter renders.

pub mod aggregator;
pub mod extractor;

pub use aggregator::*;
pub use extractor::enrich_all;

use crate::config::PipelineConfig;
use crate::models::TrialDataset;
use tracing::debug;

/// Run extraction and aggregation over a loaded dataset.
pub fn analyze(dataset: &TrialDataset, config: &PipelineConfig) -> Aggregates {
    let enriched = enrich_all(&dataset.records);
    debug!("Enriched {} records", enriched.len());

    let aggregates = aggregate(&enriched, config);
    debug!(
        "{} intervention labels, {} sponsors, {} conditions",
        aggregates.interventions.len(),
        aggregates.unique_sponsors,
        aggregates.unique_conditions
    );
    aggregates
}
