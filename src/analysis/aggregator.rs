//! Aggregation and ranking statistics.
//!
//! This module counts enriched records by category and produces the
//! ranked top-N views used by the reporter.

use crate::analysis::extractor::is_countable;
use crate::config::PipelineConfig;
use crate::models::{EnrichedRecord, InterventionCategory, SponsorCategory, StudyType};
use serde::Serialize;
use std::collections::HashMap;

/// A label with its count, as produced by ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub label: String,
    pub count: usize,
}

/// Frequency counter that remembers first-seen order.
///
/// Ranking is a stable sort on count, so equal counts keep the order in
/// which their labels were first added.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    entries: Vec<RankedEntry>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the count for `label`.
    pub fn add(&mut self, label: &str) {
        match self.index.get(label) {
            Some(&pos) => self.entries[pos].count += 1,
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push(RankedEntry {
                    label: label.to_string(),
                    count: 1,
                });
            }
        }
    }

    /// Count for `label`, zero if never seen.
    #[cfg(test)]
    pub fn get(&self, label: &str) -> usize {
        self.index
            .get(label)
            .map(|&pos| self.entries[pos].count)
            .unwrap_or(0)
    }

    /// Number of distinct labels.
    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// All entries, highest count first.
    pub fn ranked(&self) -> Vec<RankedEntry> {
        let mut ranked = self.entries.clone();
        ranked.sort_by_key(|e| std::cmp::Reverse(e.count));
        ranked
    }

    /// The `n` highest-count entries.
    pub fn top(&self, n: usize) -> Vec<RankedEntry> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }
}

impl<'a> FromIterator<&'a str> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for label in iter {
            table.add(label);
        }
        table
    }
}

/// Counts of records whose interventions mention each primary token.
///
/// The three tests are independent, so `other` is a signed residual that
/// goes negative when overlaps exceed the record count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrimaryCategorySummary {
    pub drug: usize,
    pub device: usize,
    pub biological: usize,
    pub other: i64,
}

impl PrimaryCategorySummary {
    /// Labels and values in chart order.
    pub fn bars(&self) -> [(&'static str, i64); 4] {
        [
            (InterventionCategory::Drug.token(), self.drug as i64),
            (InterventionCategory::Device.token(), self.device as i64),
            (InterventionCategory::Biological.token(), self.biological as i64),
            (InterventionCategory::Other.token(), self.other),
        ]
    }
}

/// One sponsor category's share of all trials.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SponsorCategoryShare {
    pub category: SponsorCategory,
    pub count: usize,
    pub percent: f64,
}

/// Every aggregate the reporter consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregates {
    pub total_trials: usize,
    pub study_types: Vec<RankedEntry>,
    pub interventions: Vec<RankedEntry>,
    pub top_interventions: Vec<RankedEntry>,
    pub top_interventions_detail: Vec<RankedEntry>,
    pub top_sponsors: Vec<RankedEntry>,
    pub top_conditions: Vec<RankedEntry>,
    pub primary: PrimaryCategorySummary,
    pub sponsor_categories: Vec<SponsorCategoryShare>,
    pub unique_sponsors: usize,
    pub unique_conditions: usize,
    pub condition_instances: usize,
}

impl Aggregates {
    /// Count for one study type, zero if absent.
    pub fn study_type_count(&self, study_type: &StudyType) -> usize {
        self.study_types
            .iter()
            .find(|e| e.label == study_type.as_str())
            .map(|e| e.count)
            .unwrap_or(0)
    }

    /// Count for one sponsor category, zero if absent.
    pub fn sponsor_category_count(&self, category: SponsorCategory) -> usize {
        self.sponsor_categories
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.count)
            .unwrap_or(0)
    }
}

/// Percentage of `part` in `total`, 0.0 for an empty total.
pub fn percent(part: usize, total: usize) -> f64 {
    percent_signed(part as i64, total)
}

/// Signed variant for residual counts.
pub fn percent_signed(part: i64, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Study type counts, missing values skipped.
pub fn study_type_distribution(records: &[EnrichedRecord<'_>]) -> FrequencyTable {
    records
        .iter()
        .filter_map(|r| r.record.study_type.as_ref())
        .map(StudyType::as_str)
        .collect()
}

/// Multi-count over every extracted intervention tag.
pub fn intervention_distribution(records: &[EnrichedRecord<'_>]) -> FrequencyTable {
    records
        .iter()
        .flat_map(|r| r.intervention_tags.iter())
        .filter(|tag| is_countable(tag))
        .map(|tag| tag.label())
        .collect()
}

/// Verbatim sponsor name counts, missing values skipped.
pub fn sponsor_distribution(records: &[EnrichedRecord<'_>]) -> FrequencyTable {
    records
        .iter()
        .filter_map(|r| r.record.sponsor.as_deref())
        .collect()
}

/// Counts over all split condition names.
pub fn condition_distribution(records: &[EnrichedRecord<'_>]) -> FrequencyTable {
    records
        .iter()
        .flat_map(|r| r.conditions.iter())
        .map(String::as_str)
        .collect()
}

/// Independent DRUG / DEVICE / BIOLOGICAL substring counts plus residual.
pub fn primary_category_summary(records: &[EnrichedRecord<'_>]) -> PrimaryCategorySummary {
    let mentions = |category: InterventionCategory| {
        records
            .iter()
            .filter_map(|r| r.record.interventions.as_deref())
            .filter(|text| text.contains(category.token()))
            .count()
    };

    let drug = mentions(InterventionCategory::Drug);
    let device = mentions(InterventionCategory::Device);
    let biological = mentions(InterventionCategory::Biological);
    let other = records.len() as i64 - (drug + device + biological) as i64;

    PrimaryCategorySummary {
        drug,
        device,
        biological,
        other,
    }
}

/// Count and share per derived sponsor category, highest count first.
pub fn sponsor_category_summary(records: &[EnrichedRecord<'_>]) -> Vec<SponsorCategoryShare> {
    let table: FrequencyTable = records.iter().map(|r| r.sponsor_category.label()).collect();
    let total = records.len();

    table
        .ranked()
        .into_iter()
        .filter_map(|entry| {
            let category = SponsorCategory::ALL
                .into_iter()
                .find(|c| c.label() == entry.label)?;
            Some(SponsorCategoryShare {
                category,
                count: entry.count,
                percent: percent(entry.count, total),
            })
        })
        .collect()
}

/// Run every aggregation over the enriched records.
pub fn aggregate(records: &[EnrichedRecord<'_>], config: &PipelineConfig) -> Aggregates {
    let interventions = intervention_distribution(records);
    let sponsors = sponsor_distribution(records);
    let conditions = condition_distribution(records);

    Aggregates {
        total_trials: records.len(),
        study_types: study_type_distribution(records).ranked(),
        interventions: interventions.ranked(),
        top_interventions: interventions.top(config.top_n_interventions),
        top_interventions_detail: interventions.top(config.top_n_interventions_detail),
        top_sponsors: sponsors.top(config.top_n_sponsors),
        top_conditions: conditions.top(config.top_n_conditions),
        primary: primary_category_summary(records),
        sponsor_categories: sponsor_category_summary(records),
        unique_sponsors: sponsors.distinct(),
        unique_conditions: conditions.distinct(),
        condition_instances: conditions.total(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::extractor::enrich_all;
    use crate::models::{InterventionTag, TrialRecord};

    fn record(
        study_type: Option<&str>,
        interventions: Option<&str>,
        sponsor: Option<&str>,
        conditions: Option<&str>,
    ) -> TrialRecord {
        TrialRecord {
            study_type: study_type.map(StudyType::from),
            interventions: interventions.map(String::from),
            conditions: conditions.map(String::from),
            sponsor: sponsor.map(String::from),
        }
    }

    fn sample_records() -> Vec<TrialRecord> {
        vec![
            record(
                Some("INTERVENTIONAL"),
                Some("DRUG: Fludarabine|BIOLOGICAL: CAR-T"),
                Some("Kite Pharma"),
                Some("Leukemia | Lymphoma|Leukemia"),
            ),
            record(
                Some("INTERVENTIONAL"),
                Some("DRUG: Cyclophosphamide|DEVICE: Apheresis"),
                Some("Stanford University"),
                Some("Lymphoma"),
            ),
            record(
                Some("OBSERVATIONAL"),
                None,
                Some("Mayo Clinic"),
                None,
            ),
            record(
                Some("INTERVENTIONAL"),
                Some("BIOLOGICAL: MSC"),
                Some("Kite Pharma"),
                Some("Crohn Disease"),
            ),
            record(None, Some("OTHER: standard care"), None, Some("Leukemia")),
        ]
    }

    #[test]
    fn test_frequency_table_ties_keep_first_seen() {
        let table: FrequencyTable = ["b", "a", "c", "a", "c"].into_iter().collect();
        let ranked = table.ranked();
        let labels: Vec<&str> = ranked.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "c", "b"]);
        assert_eq!(table.get("a"), 2);
        assert_eq!(table.get("z"), 0);
        assert_eq!(table.total(), 5);
        assert_eq!(table.distinct(), 3);
    }

    #[test]
    fn test_frequency_table_not_alphabetical() {
        let table: FrequencyTable = ["zeta", "alpha"].into_iter().collect();
        let top = table.top(1);
        assert_eq!(top[0].label, "zeta");
    }

    #[test]
    fn test_condition_ranking() {
        let records = sample_records();
        let enriched = enrich_all(&records);
        let conditions = condition_distribution(&enriched);
        let ranked = conditions.ranked();
        assert_eq!(ranked[0], RankedEntry { label: "Leukemia".into(), count: 3 });
        assert_eq!(ranked[1], RankedEntry { label: "Lymphoma".into(), count: 2 });
        assert_eq!(conditions.total(), 6);
    }

    #[test]
    fn test_single_record_condition_counts() {
        let records = vec![record(None, None, None, Some("Leukemia | Lymphoma|Leukemia"))];
        let enriched = enrich_all(&records);
        let ranked = condition_distribution(&enriched).ranked();
        assert_eq!(ranked[0], RankedEntry { label: "Leukemia".into(), count: 2 });
        assert_eq!(ranked[1], RankedEntry { label: "Lymphoma".into(), count: 1 });
    }

    #[test]
    fn test_intervention_counts_are_not_exclusive() {
        let records = sample_records();
        let enriched = enrich_all(&records);
        let table = intervention_distribution(&enriched);

        let matched = enriched
            .iter()
            .filter(|r| !r.intervention_tags.contains(&InterventionTag::NotSpecified))
            .count();
        let category_sum = table.total() - table.get("Not Specified");

        assert_eq!(matched, 4);
        assert_eq!(category_sum, 6);
        assert!(category_sum >= matched);
        assert_eq!(table.get("DRUG"), 2);
        assert_eq!(table.get("BIOLOGICAL"), 2);
        assert_eq!(table.get("Not Specified"), 1);
    }

    #[test]
    fn test_primary_summary_residual() {
        let records = sample_records();
        let enriched = enrich_all(&records);
        let primary = primary_category_summary(&enriched);
        assert_eq!(primary.drug, 2);
        assert_eq!(primary.device, 1);
        assert_eq!(primary.biological, 2);
        assert_eq!(primary.other, 0);
    }

    #[test]
    fn test_primary_summary_residual_can_go_negative() {
        let records = vec![record(
            None,
            Some("DRUG: A|DEVICE: B|BIOLOGICAL: C"),
            None,
            None,
        )];
        let enriched = enrich_all(&records);
        let primary = primary_category_summary(&enriched);
        assert_eq!(primary.other, -2);
        assert_eq!(primary.bars()[3], ("OTHER", -2));
    }

    #[test]
    fn test_sponsor_categories_are_exhaustive() {
        let records = sample_records();
        let enriched = enrich_all(&records);
        let shares = sponsor_category_summary(&enriched);

        let sum: usize = SponsorCategory::ALL
            .iter()
            .map(|c| shares.iter().find(|s| s.category == *c).map(|s| s.count).unwrap_or(0))
            .sum();
        assert_eq!(sum, records.len());

        assert_eq!(shares[0].category, SponsorCategory::Industry);
        assert_eq!(shares[0].count, 2);
        assert!((shares[0].percent - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate() {
        let records = sample_records();
        let enriched = enrich_all(&records);
        let config = PipelineConfig::default();
        let agg = aggregate(&enriched, &config);

        assert_eq!(agg.total_trials, 5);
        assert_eq!(agg.study_type_count(&StudyType::Interventional), 3);
        assert_eq!(agg.study_type_count(&StudyType::Observational), 1);
        assert_eq!(agg.study_types.iter().map(|e| e.count).sum::<usize>(), 4);
        assert_eq!(agg.top_sponsors[0], RankedEntry { label: "Kite Pharma".into(), count: 2 });
        assert_eq!(agg.unique_sponsors, 3);
        assert_eq!(agg.unique_conditions, 3);
        assert_eq!(agg.condition_instances, 6);
        assert_eq!(agg.sponsor_category_count(SponsorCategory::Other), 1);
        assert_eq!(agg.sponsor_category_count(SponsorCategory::Academic), 1);
        assert_eq!(agg.sponsor_category_count(SponsorCategory::HospitalClinical), 1);
    }

    #[test]
    fn test_top_n_views_are_distinct() {
        let tokens = [
            "DRUG: a|DEVICE: b|BIOLOGICAL: c|BEHAVIORAL: d|PROCEDURE: e",
            "DIETARY_SUPPLEMENT: f|RADIATION: g|GENETIC: h|OTHER: i|DIAGNOSTIC_TEST: j",
        ];
        let mut records: Vec<TrialRecord> = tokens
            .iter()
            .map(|t| record(None, Some(t), None, None))
            .collect();
        records.push(record(None, None, None, None));

        let enriched = enrich_all(&records);
        let config = PipelineConfig {
            top_n_interventions: 4,
            top_n_interventions_detail: 15,
            ..PipelineConfig::default()
        };
        let agg = aggregate(&enriched, &config);
        assert_eq!(agg.top_interventions.len(), 4);
        assert_eq!(agg.top_interventions_detail.len(), 11);
        assert_eq!(agg.top_interventions[0].label, "DRUG");
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let records = sample_records();
        let config = PipelineConfig::default();
        let first = aggregate(&enrich_all(&records), &config);
        let second = aggregate(&enrich_all(&records), &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1, 4), 25.0);
        assert_eq!(percent(3, 0), 0.0);
        assert_eq!(percent_signed(-1, 4), -25.0);
    }
}
