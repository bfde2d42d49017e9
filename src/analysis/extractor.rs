//! Feature extraction from raw trial fields.
//!
//! Derives intervention tags, the sponsor category and the condition list
//! for each record.

use crate::models::{
    EnrichedRecord, InterventionCategory, InterventionTag, SponsorCategory, TrialRecord,
};

const INDUSTRY_KEYWORDS: &[&str] = &[
    "inc",
    "ltd",
    "llc",
    "corp",
    "pharma",
    "bio",
    "therapeutics",
    "pharmaceuticals",
];

const ACADEMIC_KEYWORDS: &[&str] = &["university", "college", "school", "research center"];

const HOSPITAL_KEYWORDS: &[&str] = &["hospital", "medical center", "clinic", "healthcare"];

/// Tag the Interventions text with every category token it contains.
///
/// Matching is a case-sensitive substring test, so one record can carry
/// several categories. Missing text, or text with no known token, yields
/// `[NotSpecified]`.
pub fn extract_intervention_tags(interventions: Option<&str>) -> Vec<InterventionTag> {
    let Some(text) = interventions else {
        return vec![InterventionTag::NotSpecified];
    };

    let tags: Vec<InterventionTag> = InterventionCategory::ALL
        .iter()
        .filter(|category| text.contains(category.token()))
        .map(|category| InterventionTag::Category(*category))
        .collect();

    if tags.is_empty() {
        vec![InterventionTag::NotSpecified]
    } else {
        tags
    }
}

/// Whether a tag survives the single-character artifact filter.
///
/// Every tag label is longer than one character, so no tag is rejected
/// today. Kept for parity with counting raw split tokens.
pub fn is_countable(tag: &InterventionTag) -> bool {
    tag.label().chars().count() > 1
}

/// Split a pipe-delimited Conditions field into trimmed names.
pub fn split_conditions(conditions: Option<&str>) -> Vec<String> {
    match conditions {
        Some(text) => text.split('|').map(|c| c.trim().to_string()).collect(),
        None => Vec::new(),
    }
}

/// Categorize a sponsor name by keyword, first match wins.
pub fn categorize_sponsor(sponsor: Option<&str>) -> SponsorCategory {
    let lower = sponsor.unwrap_or_default().to_lowercase();
    let matches = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    if matches(INDUSTRY_KEYWORDS) {
        SponsorCategory::Industry
    } else if matches(ACADEMIC_KEYWORDS) {
        SponsorCategory::Academic
    } else if matches(HOSPITAL_KEYWORDS) {
        SponsorCategory::HospitalClinical
    } else {
        SponsorCategory::Other
    }
}

/// Attach all derived fields to a record.
pub fn enrich(record: &TrialRecord) -> EnrichedRecord<'_> {
    EnrichedRecord {
        record,
        intervention_tags: extract_intervention_tags(record.interventions.as_deref()),
        sponsor_category: categorize_sponsor(record.sponsor.as_deref()),
        conditions: split_conditions(record.conditions.as_deref()),
    }
}

/// Enrich every record, preserving input order.
pub fn enrich_all(records: &[TrialRecord]) -> Vec<EnrichedRecord<'_>> {
    records.iter().map(enrich).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use InterventionCategory::*;

    #[test]
    fn test_drug_and_biological() {
        let tags = extract_intervention_tags(Some("DRUG|BIOLOGICAL"));
        assert_eq!(
            tags,
            vec![InterventionTag::Category(Drug), InterventionTag::Category(Biological)]
        );
    }

    #[test]
    fn test_not_specified() {
        assert_eq!(extract_intervention_tags(None), vec![InterventionTag::NotSpecified]);
        assert_eq!(
            extract_intervention_tags(Some("cell infusion")),
            vec![InterventionTag::NotSpecified]
        );
    }

    #[test]
    fn test_case_sensitive_match() {
        assert_eq!(
            extract_intervention_tags(Some("drug: aspirin")),
            vec![InterventionTag::NotSpecified]
        );
    }

    #[test]
    fn test_tags_are_known_or_not_specified() {
        let inputs = [
            Some("DRUG: A|DEVICE: B|GENETIC: C"),
            Some("DIETARY_SUPPLEMENT: vitamin D|OTHER: placebo"),
            Some("RADIATION: TBI|PROCEDURE: HSCT|BEHAVIORAL: diet"),
            Some("DIAGNOSTIC_TEST: PET"),
            Some("nothing to see"),
            None,
        ];

        for input in inputs {
            let tags = extract_intervention_tags(input);
            if tags.contains(&InterventionTag::NotSpecified) {
                assert_eq!(tags, vec![InterventionTag::NotSpecified]);
            } else {
                assert!(!tags.is_empty());
                for tag in &tags {
                    match tag {
                        InterventionTag::Category(c) => assert!(InterventionCategory::ALL.contains(c)),
                        InterventionTag::NotSpecified => unreachable!(),
                    }
                }
            }
        }
    }

    #[test]
    fn test_all_tags_countable() {
        for category in InterventionCategory::ALL {
            assert!(is_countable(&InterventionTag::Category(category)));
        }
        assert!(is_countable(&InterventionTag::NotSpecified));
    }

    #[test]
    fn test_split_conditions() {
        assert_eq!(
            split_conditions(Some("Leukemia | Lymphoma|Leukemia")),
            vec!["Leukemia", "Lymphoma", "Leukemia"]
        );
        assert!(split_conditions(None).is_empty());
    }

    #[test]
    fn test_academic_before_hospital() {
        assert_eq!(
            categorize_sponsor(Some("Example University Hospital")),
            SponsorCategory::Academic
        );
    }

    #[test]
    fn test_sponsor_priority_order() {
        // "bio" is an industry keyword and is checked before "university"
        assert_eq!(
            categorize_sponsor(Some("University Biomedical Institute")),
            SponsorCategory::Industry
        );
        assert_eq!(
            categorize_sponsor(Some("St. Jude Medical Center")),
            SponsorCategory::HospitalClinical
        );
        assert_eq!(categorize_sponsor(Some("Kite Pharma")), SponsorCategory::Industry);
        assert_eq!(
            categorize_sponsor(Some("NOVARTIS PHARMACEUTICALS")),
            SponsorCategory::Industry
        );
        assert_eq!(categorize_sponsor(Some("Ministry of Health")), SponsorCategory::Other);
        assert_eq!(categorize_sponsor(None), SponsorCategory::Other);
    }

    #[test]
    fn test_enrich() {
        let record = TrialRecord {
            study_type: None,
            interventions: Some("DEVICE: pump".to_string()),
            conditions: Some("Flu|Cold".to_string()),
            sponsor: Some("Mayo Clinic".to_string()),
        };
        let enriched = enrich(&record);
        assert_eq!(enriched.intervention_tags, vec![InterventionTag::Category(Device)]);
        assert_eq!(enriched.sponsor_category, SponsorCategory::HospitalClinical);
        assert_eq!(enriched.conditions, vec!["Flu", "Cold"]);
    }
}
