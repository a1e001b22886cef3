use std::{io, path::PathBuf};

use concord_core::EdgeSourceError;
use thiserror::Error;

/// Errors raised while streaming edges from a delimited file.
#[derive(Debug, Error)]
pub enum CsvEdgeSourceError {
    /// The input file could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// A record did not contain exactly two fields.
    #[error("record {record} has {fields} field(s); expected exactly 2")]
    MalformedRecord {
        /// One-based record number.
        record: u64,
        /// Number of fields the record contained.
        fields: usize,
    },
    /// The CSV reader failed to decode a record.
    #[error("failed to read record {record}: {source}")]
    Csv {
        /// One-based number of the record being read.
        record: u64,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },
}

impl From<CsvEdgeSourceError> for EdgeSourceError {
    fn from(error: CsvEdgeSourceError) -> Self {
        match error {
            CsvEdgeSourceError::MalformedRecord { record, fields } => {
                Self::MalformedRecord { record, fields }
            }
            other => Self::Read {
                message: other.to_string(),
            },
        }
    }
}
