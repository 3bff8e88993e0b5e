//! Error types for tag audit operations.
//!
//! Fatal conditions (unreadable sources, schema violations, malformed
//! cells) surface as errors before any computation runs. Degenerate but
//! well-formed input (zero records, empty groups) is never an error:
//! the engines return empty or zero results instead.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::Field;

/// Errors that can occur while loading or querying a snapshot.
#[derive(Debug, Error)]
pub enum Error {
    /// The ingestion source could not be read at all
    #[error("cannot read dataset {path}: {source}")]
    SourceUnavailable {
        /// Path that was attempted
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// A required column is absent from the ingested header
    #[error("required column missing from header: {column}")]
    SchemaViolation {
        /// Name of the missing column
        column: String,
    },

    /// A data row does not match the header shape
    #[error("line {line}: expected {expected} columns, found {found}")]
    RowShape {
        /// 1-indexed line number in the source
        line: usize,
        /// Column count declared by the header
        expected: usize,
        /// Column count actually found
        found: usize,
    },

    /// A data row has no resource id
    #[error("line {line}: row has no ResourceID")]
    MissingResourceId {
        /// 1-indexed line number in the source
        line: usize,
    },

    /// Two rows share the same resource id
    #[error("duplicate resource id: {id}")]
    DuplicateResource {
        /// The offending id
        id: String,
    },

    /// A cost cell is not a non-negative number
    #[error("line {line}: invalid cost {value:?}")]
    InvalidCost {
        /// 1-indexed line number in the source
        line: usize,
        /// The raw cell value
        value: String,
    },

    /// A tagged cell is neither Yes nor No
    #[error("line {line}: invalid tagged flag {value:?} (expected Yes or No)")]
    InvalidTagFlag {
        /// 1-indexed line number in the source
        line: usize,
        /// The raw cell value
        value: String,
    },

    /// A field name does not match any known column
    #[error("unknown field: {name}")]
    UnknownField {
        /// The rejected name
        name: String,
    },

    /// A numeric measure was used as a group or filter key
    #[error("field {field} cannot be used as a group key")]
    NotGroupable {
        /// The rejected field
        field: Field,
    },

    /// A remediation edit named a field outside the five tag fields
    #[error("field {field} is not a tag field and cannot be edited")]
    NotATagField {
        /// The rejected field
        field: Field,
    },

    /// Edit plan deserialization failed
    #[error("invalid edit plan: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tag audit operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::SchemaViolation {
            column: "Tagged".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "required column missing from header: Tagged"
        );

        let err = Error::NotGroupable {
            field: Field::MonthlyCostUsd,
        };
        assert_eq!(
            err.to_string(),
            "field MonthlyCostUSD cannot be used as a group key"
        );
    }
}
