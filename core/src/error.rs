//! Error types for option schema resolution and type hierarchy construction.
//!
//! Every failure is raised synchronously at the point of violation and
//! carries the offending option name. None of them are retried: they describe
//! mistakes in the schema or in the values supplied by the caller.

use std::fmt;

use thiserror::Error;

/// Errors that can occur while resolving options or building a type hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    /// One or more required options have neither a supplied value nor a default.
    #[error("the required option(s) {} are missing", quoted(.options))]
    MissingRequiredOption {
        /// Missing option names, in declaration order.
        options: Vec<String>,
    },

    /// Values were supplied for options the schema does not define.
    #[error("the option(s) {} do not exist; defined options are: {}", quoted(.options), quoted(.defined))]
    UnknownOption {
        /// Unknown option names, in the order they were supplied.
        options: Vec<String>,
        /// Options the schema does define.
        defined: Vec<String>,
    },

    /// A value's runtime type is not one of the allowed types.
    #[error(
        "the option \"{option}\" with value {value} is expected to be of type {}, but is of type \"{actual}\"",
        quoted_or(.expected)
    )]
    InvalidOptionType {
        option: String,
        expected: Vec<String>,
        actual: String,
        value: String,
    },

    /// A value matched none of the allowed values.
    #[error("the option \"{option}\" with value {value} is invalid; accepted values are: {expected}")]
    InvalidOptionValue {
        option: String,
        expected: String,
        value: String,
    },

    /// An option could not be read while another option was being resolved.
    #[error("the option \"{option}\" cannot be read: {cause}")]
    CircularOrMissingDependency {
        option: String,
        cause: DependencyCause,
    },

    /// A type appears twice along its own parent chain.
    #[error("type hierarchy cycle detected at path: {path}")]
    StructuralCycle { path: String },

    /// A normalizer rejected the value it was given.
    #[error("the option \"{option}\" could not be normalized: {message}")]
    Normalization { option: String, message: String },
}

/// Why an option could not be read from inside a deferred computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyCause {
    /// The option is being resolved further up the current access chain.
    Cycle(String),
    /// The option is defined but has neither a supplied value nor a default.
    Missing,
    /// The option is not defined by the schema.
    Undefined,
}

impl fmt::Display for DependencyCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cycle(chain) => write!(f, "circular reference {chain}"),
            Self::Missing => write!(f, "no value is set"),
            Self::Undefined => write!(f, "the option is not defined"),
        }
    }
}

/// Convenience alias for results with [`OptionsError`].
pub type Result<T> = std::result::Result<T, OptionsError>;

fn quoted(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

fn quoted_or(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(" or ")
}
