//! Data models for the trial report.
//!
//! This module contains the record types read from the input table and
//! the derived tags the extractor attaches to them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Study type of a trial.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StudyType {
    Interventional,
    Observational,
    /// Any other value found in the export, kept verbatim.
    Other(String),
}

impl StudyType {
    /// The label as it appears in the export.
    pub fn as_str(&self) -> &str {
        match self {
            StudyType::Interventional => "INTERVENTIONAL",
            StudyType::Observational => "OBSERVATIONAL",
            StudyType::Other(s) => s,
        }
    }
}

impl fmt::Display for StudyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for StudyType {
    fn from(s: &str) -> Self {
        match s {
            "INTERVENTIONAL" => StudyType::Interventional,
            "OBSERVATIONAL" => StudyType::Observational,
            other => StudyType::Other(other.to_string()),
        }
    }
}

/// Coarse intervention category tokens, in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterventionCategory {
    Drug,
    Device,
    Biological,
    Behavioral,
    Procedure,
    DietarySupplement,
    Radiation,
    Genetic,
    Other,
    DiagnosticTest,
}

impl InterventionCategory {
    /// All categories in the order they are tested.
    pub const ALL: [InterventionCategory; 10] = [
        InterventionCategory::Drug,
        InterventionCategory::Device,
        InterventionCategory::Biological,
        InterventionCategory::Behavioral,
        InterventionCategory::Procedure,
        InterventionCategory::DietarySupplement,
        InterventionCategory::Radiation,
        InterventionCategory::Genetic,
        InterventionCategory::Other,
        InterventionCategory::DiagnosticTest,
    ];

    /// The literal token searched for in the Interventions text.
    pub fn token(&self) -> &'static str {
        match self {
            InterventionCategory::Drug => "DRUG",
            InterventionCategory::Device => "DEVICE",
            InterventionCategory::Biological => "BIOLOGICAL",
            InterventionCategory::Behavioral => "BEHAVIORAL",
            InterventionCategory::Procedure => "PROCEDURE",
            InterventionCategory::DietarySupplement => "DIETARY_SUPPLEMENT",
            InterventionCategory::Radiation => "RADIATION",
            InterventionCategory::Genetic => "GENETIC",
            InterventionCategory::Other => "OTHER",
            InterventionCategory::DiagnosticTest => "DIAGNOSTIC_TEST",
        }
    }
}

impl fmt::Display for InterventionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Tag produced for a record's interventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterventionTag {
    Category(InterventionCategory),
    NotSpecified,
}

impl InterventionTag {
    pub fn label(&self) -> &'static str {
        match self {
            InterventionTag::Category(c) => c.token(),
            InterventionTag::NotSpecified => "Not Specified",
        }
    }
}

impl fmt::Display for InterventionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Sponsor category derived from sponsor-name keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SponsorCategory {
    Industry,
    Academic,
    #[serde(rename = "Hospital/Clinical")]
    HospitalClinical,
    Other,
}

impl SponsorCategory {
    /// Categories in priority order.
    pub const ALL: [SponsorCategory; 4] = [
        SponsorCategory::Industry,
        SponsorCategory::Academic,
        SponsorCategory::HospitalClinical,
        SponsorCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SponsorCategory::Industry => "Industry",
            SponsorCategory::Academic => "Academic",
            SponsorCategory::HospitalClinical => "Hospital/Clinical",
            SponsorCategory::Other => "Other",
        }
    }
}

impl fmt::Display for SponsorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One row of the input dataset. Missing values are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub study_type: Option<StudyType>,
    pub interventions: Option<String>,
    pub conditions: Option<String>,
    pub sponsor: Option<String>,
}

/// A trial record together with its derived columns.
#[derive(Debug, Clone)]
pub struct EnrichedRecord<'a> {
    pub record: &'a TrialRecord,
    pub intervention_tags: Vec<InterventionTag>,
    pub sponsor_category: SponsorCategory,
    pub conditions: Vec<String>,
}

/// The loaded table: column names in file order plus the records.
#[derive(Debug, Clone, Default)]
pub struct TrialDataset {
    pub columns: Vec<String>,
    pub records: Vec<TrialRecord>,
}

impl TrialDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
