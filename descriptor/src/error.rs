//! Error types for describe operations.

use thiserror::Error;

/// Errors that can occur while describing a subject.
#[derive(Debug, Error)]
pub enum DescribeError {
    /// An option resolver was described without naming the option.
    #[error("no option name given to describe")]
    MissingOptionName,

    /// The named option is not defined by the described schema.
    #[error("the option \"{0}\" is not defined")]
    UndefinedOption(String),

    /// An output format name that no descriptor handles.
    #[error("unknown output format: {0}")]
    UnknownFormat(String),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results with [`DescribeError`].
pub type Result<T> = std::result::Result<T, DescribeError>;
