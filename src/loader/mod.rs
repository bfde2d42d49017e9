//! Trial dataset loader.
//!
//! Reads the CSV export into a [`TrialDataset`], keeping only the columns
//! the pipeline uses and mapping NA markers to `None`.

use crate::error::DataLoadError;
use crate::models::{StudyType, TrialDataset, TrialRecord};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

pub const COL_STUDY_TYPE: &str = "Study Type";
pub const COL_INTERVENTIONS: &str = "Interventions";
pub const COL_SPONSOR: &str = "Sponsor";
pub const COL_CONDITIONS: &str = "Conditions";

/// Field values read as missing, matching the usual dataframe NA markers.
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    study_type: usize,
    interventions: usize,
    sponsor: usize,
    conditions: usize,
}

impl ColumnIndex {
    fn resolve(headers: &[String], path: &Path) -> Result<Self, DataLoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DataLoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name.to_string(),
                })
        };

        Ok(Self {
            study_type: find(COL_STUDY_TYPE)?,
            interventions: find(COL_INTERVENTIONS)?,
            sponsor: find(COL_SPONSOR)?,
            conditions: find(COL_CONDITIONS)?,
        })
    }
}

/// Load the trial dataset from a CSV file.
pub fn load_trials(path: &Path) -> Result<TrialDataset, DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let dataset = read_trials(file, path)?;
    info!("Loaded {} records from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Read the dataset from any reader. `origin` is only used in error messages.
pub fn read_trials<R: std::io::Read>(reader: R, origin: &Path) -> Result<TrialDataset, DataLoadError> {
    let csv_err = |source: csv::Error| DataLoadError::Csv {
        path: origin.to_path_buf(),
        source,
    };

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            // Spreadsheet exports often carry a BOM on the first header
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();
    debug!("Columns: {:?}", columns);

    let index = ColumnIndex::resolve(&columns, origin)?;

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result.map_err(csv_err)?;
        // Short rows are padded with missing values, long rows are malformed
        if row.len() > columns.len() {
            return Err(DataLoadError::RaggedRow {
                path: origin.to_path_buf(),
                line: row.position().map_or(0, |p| p.line()),
                expected: columns.len(),
                found: row.len(),
            });
        }
        records.push(parse_record(&row, index));
    }

    Ok(TrialDataset { columns, records })
}

fn parse_record(row: &StringRecord, index: ColumnIndex) -> TrialRecord {
    TrialRecord {
        study_type: field(row, index.study_type).map(StudyType::from),
        interventions: field(row, index.interventions).map(String::from),
        conditions: field(row, index.conditions).map(String::from),
        sponsor: field(row, index.sponsor).map(String::from),
    }
}

/// Fetch a field, treating short rows and NA markers as missing.
fn field(row: &StringRecord, idx: usize) -> Option<&str> {
    row.get(idx).filter(|v| !is_na(v))
}

/// Whether a raw field value denotes a missing value.
pub fn is_na(value: &str) -> bool {
    NA_VALUES.contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
NCT Number,Study Type,Interventions,Sponsor,Conditions
NCT001,INTERVENTIONAL,DRUG: Cyclophosphamide|BIOLOGICAL: CAR-T,Kite Pharma Inc,Leukemia|Lymphoma
NCT002,OBSERVATIONAL,,Stanford University,
NCT003,INTERVENTIONAL,NA,Mayo Clinic,Myeloma
";

    fn read(text: &str) -> Result<TrialDataset, DataLoadError> {
        read_trials(text.as_bytes(), Path::new("test.csv"))
    }

    #[test]
    fn test_read_sample() {
        let dataset = read(SAMPLE).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.columns[0], "NCT Number");
        assert_eq!(dataset.columns.len(), 5);

        let first = &dataset.records[0];
        assert_eq!(first.study_type, Some(StudyType::Interventional));
        assert_eq!(
            first.interventions.as_deref(),
            Some("DRUG: Cyclophosphamide|BIOLOGICAL: CAR-T")
        );
        assert_eq!(first.sponsor.as_deref(), Some("Kite Pharma Inc"));
        assert_eq!(first.conditions.as_deref(), Some("Leukemia|Lymphoma"));
    }

    #[test]
    fn test_missing_values() {
        let dataset = read(SAMPLE).unwrap();
        assert_eq!(dataset.records[1].interventions, None);
        assert_eq!(dataset.records[1].conditions, None);
        assert_eq!(dataset.records[2].interventions, None);
        assert_eq!(dataset.records[2].study_type, Some(StudyType::Interventional));
    }

    #[test]
    fn test_short_row_is_missing() {
        let text = "Study Type,Interventions,Sponsor,Conditions\nINTERVENTIONAL,DRUG: X\n";
        let dataset = read(text).unwrap();
        assert_eq!(dataset.records[0].interventions.as_deref(), Some("DRUG: X"));
        assert_eq!(dataset.records[0].sponsor, None);
        assert_eq!(dataset.records[0].conditions, None);
    }

    #[test]
    fn test_long_row_rejected() {
        let text = "Study Type,Interventions,Sponsor,Conditions\n\
                    OBSERVATIONAL,,Acme,Flu\n\
                    INTERVENTIONAL,DRUG: X,Acme,Flu,EXTRA,MORE\n";
        match read(text) {
            Err(DataLoadError::RaggedRow {
                line,
                expected,
                found,
                ..
            }) => {
                assert_eq!(line, 3);
                assert_eq!(expected, 4);
                assert_eq!(found, 6);
            }
            other => panic!("expected RaggedRow, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_column() {
        let text = "Study Type,Interventions,Sponsor\nINTERVENTIONAL,DRUG: X,Acme\n";
        match read(text) {
            Err(DataLoadError::MissingColumn { column, .. }) => assert_eq!(column, "Conditions"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_bom_header() {
        let text = "\u{feff}Study Type,Interventions,Sponsor,Conditions\nOBSERVATIONAL,,Acme,Flu\n";
        let dataset = read(text).unwrap();
        assert_eq!(dataset.columns[0], "Study Type");
        assert_eq!(dataset.records[0].study_type, Some(StudyType::Observational));
    }

    #[test]
    fn test_load_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        assert!(matches!(
            load_trials(&path),
            Err(DataLoadError::NotFound { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let dataset = load_trials(file.path()).unwrap();
        assert_eq!(dataset.len(), 3);
    }

    #[test]
    fn test_is_na() {
        assert!(is_na(""));
        assert!(is_na("NaN"));
        assert!(is_na("N/A"));
        assert!(!is_na("Not Applicable"));
        assert!(!is_na("0"));
    }
}
