use std::path::PathBuf;
use thiserror::Error;

use crate::types::Dataset;

/// All errors produced while building or running the report pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// An input file could not be opened or read.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line did not split into the number of fields its dataset requires.
    #[error("{dataset} line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        dataset: Dataset,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A numeric field carried digits but did not parse as a float.
    #[error("{dataset} line {line}: field `{field}` is not a number: {value:?}")]
    InvalidNumber {
        dataset: Dataset,
        line: usize,
        field: &'static str,
        value: String,
    },

    /// A composite key whose period has no year/month part.
    #[error("Malformed composite key: {0}")]
    MalformedKey(String),

    /// A joined key carried more than one aggregate on one side.
    #[error("Key {key} has {count} {side} aggregates, expected one")]
    DuplicateKey {
        key: String,
        side: Dataset,
        count: usize,
    },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
