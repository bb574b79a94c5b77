//! Driver errors.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Driver errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("incompatible entries in metadata for variable '{standard_name}':\n    {first}\nvs. {second}")]
    IncompatibleTables {
        standard_name: String,
        first: String,
        second: String,
    },

    #[error("suite definition file {0} not found")]
    SuiteNotFound(PathBuf),

    #[error("no suite definition files found in {0}")]
    NoSuites(PathBuf),

    #[error("resolution failed with {0} error(s)")]
    Resolve(usize),
}
