use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while building bands, reading expression files and
/// comparing them.
#[derive(Debug, Error)]
pub enum DeltaError {
    #[error("cannot open {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{file}: failed to read line {line}")]
    Read {
        file: String,
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("{file}, line {line}, column {column}: '{text}' is not a number")]
    ParseValue {
        file: String,
        line: u64,
        column: usize,
        text: String,
    },

    #[error("no data columns or non-tab separated input file ({file})")]
    NoDataColumns { file: String },

    #[error("column dimensions do not match ({expected} data columns in {first}, {found} in {second})")]
    ColumnMismatch {
        first: String,
        second: String,
        expected: usize,
        found: usize,
    },

    #[error("{file}, line {line}: expected {expected} data columns, found {found}")]
    RaggedRow {
        file: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("row pair has {found_a} and {found_b} values, expected {expected}")]
    RowWidth {
        expected: usize,
        found_a: usize,
        found_b: usize,
    },

    #[error("row dimensions do not match ({longer} has more rows than {shorter})")]
    RowMismatch { longer: String, shorter: String },

    #[error("no expression values to compare")]
    NoExpressionValues,

    #[error("no delta thresholds given")]
    EmptyThresholds,

    #[error("delta #{position} ('{text}') is not a number")]
    ThresholdSyntax { position: usize, text: String },

    #[error("delta #{position} ({value}) must be a positive finite number")]
    ThresholdNotPositive { position: usize, value: f64 },

    #[error("delta #{position} ({value}) must be greater than the previous delta ({previous})")]
    ThresholdNotAscending {
        position: usize,
        value: f64,
        previous: f64,
    },
}

pub type Result<T> = std::result::Result<T, DeltaError>;
