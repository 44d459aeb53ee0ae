//! Registry of known form types, used by the defaults description.
//!
//! The registry is plain data and can be kept in a YAML file next to the
//! application.
//!
//! # Example YAML
//!
//! ```yaml
//! core_types:
//!   - core::FormType
//!   - core::ChoiceType
//! service_types:
//!   - doctrine::EntityType
//! extensions:
//!   - csrf::FormTypeCsrfExtension
//! guessers:
//!   - validator::ValidatorTypeGuesser
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Names of the types, extensions and guessers known to an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Registry {
    /// Built-in types, listed by short name in text output.
    pub core_types: Vec<String>,
    pub service_types: Vec<String>,
    pub extensions: Vec<String>,
    pub guessers: Vec<String>,
}

impl Registry {
    /// Loads a registry from a YAML file.
    ///
    /// Missing keys default to empty lists.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::DescribeError::Io) if the file cannot be read,
    /// or [`Yaml`](crate::DescribeError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let registry = serde_yaml::from_reader(reader)?;
        Ok(registry)
    }

    /// Saves the registry as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::DescribeError::Io) if the file cannot be
    /// written, or [`Yaml`](crate::DescribeError::Yaml) if serialization
    /// fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.core_types.is_empty()
            && self.service_types.is_empty()
            && self.extensions.is_empty()
            && self.guessers.is_empty()
    }
}

/// Last `::` segment of a type name.
pub(crate) fn short_name(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}
