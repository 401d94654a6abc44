//! Error types for table operations

use thiserror::Error;

use crate::convert::ConversionFailure;

/// Errors raised by [`Table`](crate::Table) operations.
///
/// Nothing here is retried or recovered internally; the caller decides.
#[derive(Error, Debug)]
pub enum TableError {
    /// A column name that is not part of the current header
    #[error("unknown column `{name}`")]
    UnknownColumn { name: String },

    /// A row was supplied with fewer fields than there are columns
    #[error("missing fields: expected {expected}, got {got}")]
    TooFewFields { expected: usize, got: usize },

    /// A row was supplied with more fields than there are columns
    #[error("too many fields: expected {expected}, got {got}")]
    TooManyFields { expected: usize, got: usize },

    /// At least one row disagrees with the header's field count
    #[error("malformed table: row {row} has {got} fields, header has {expected}")]
    MalformedTable {
        row: usize,
        got: usize,
        expected: usize,
    },

    /// A column order named the same column more than once
    #[error("column `{name}` appears more than once")]
    DuplicateColumn { name: String },

    #[error("separator must be non-empty and must not contain a newline")]
    InvalidSeparator,

    /// A field could not be converted to its declared type
    #[error(transparent)]
    Conversion(#[from] ConversionFailure),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for table operations
pub type TableResult<T> = Result<T, TableError>;

impl TableError {
    pub(crate) fn unknown_column(name: &str) -> Self {
        TableError::UnknownColumn {
            name: name.to_string(),
        }
    }

    /// Pick the count-mismatch variant for `got` fields against `expected` columns.
    pub(crate) fn field_count(expected: usize, got: usize) -> Option<Self> {
        match got.cmp(&expected) {
            std::cmp::Ordering::Less => Some(TableError::TooFewFields { expected, got }),
            std::cmp::Ordering::Greater => Some(TableError::TooManyFields { expected, got }),
            std::cmp::Ordering::Equal => None,
        }
    }
}
