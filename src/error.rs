//! Error types for loading the trial dataset.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while reading the input table.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// The input file does not exist.
    #[error("Input file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// The input file exists but could not be opened or read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file could not be parsed as a delimited table.
    #[error("Failed to parse {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A data row has more fields than the header declares.
    #[error(
        "Malformed row in {} at line {line}: expected {expected} fields, saw {found}",
        .path.display()
    )]
    RaggedRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A column the pipeline depends on is absent from the header.
    #[error("Required column '{column}' is missing from {}", .path.display())]
    MissingColumn { path: PathBuf, column: String },
}
