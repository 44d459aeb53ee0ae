//! Descriptions of form types, option schemas and resolved options.
//!
//! A [`Descriptor`] renders one of four subjects, selected by
//! [`DescribeTarget`], into an [`OutputSink`]:
//!
//! - the registry defaults (known types, extensions and guessers),
//! - a resolved type and where each of its options comes from,
//! - a single option of a resolver,
//! - a resolved option set.
//!
//! Two descriptors are provided, [`TextDescriptor`] and [`JsonDescriptor`],
//! selectable through [`OutputFormat`].
//!
//! # Examples
//!
//! ```
//! use form_options_core::{OptionResolver, OptionSchema};
//! use form_options_descriptor::{
//!     BufferedOutput, DescribeTarget, Descriptor, DescriptorOptions, OutputFormat,
//! };
//!
//! let mut schema = OptionSchema::new();
//! schema.set_default("required", true).set_info("required", "Marks the field as mandatory");
//! let resolver = OptionResolver::new(schema);
//!
//! let options = DescriptorOptions {
//!     option: Some("required".to_string()),
//!     ..DescriptorOptions::default()
//! };
//! let mut output = BufferedOutput::new(false);
//! OutputFormat::Json
//!     .descriptor()
//!     .describe(&mut output, DescribeTarget::Option(&resolver), &options)
//!     .unwrap();
//!
//! let json: serde_json::Value = serde_json::from_str(&output.fetch()).unwrap();
//! assert_eq!(json["default"], true);
//! ```

mod collect;
mod definition;
mod dump;
mod error;
mod json;
mod registry;
mod sink;
mod style;
mod text;

use std::fmt;
use std::str::FromStr;

use form_options_core::{OptionResolver, ResolvedOptions, ResolvedType};
use tracing::debug;

pub use collect::TypeOptions;
pub use definition::{AllowedEntry, OptionDescription};
pub use error::{DescribeError, Result};
pub use json::JsonDescriptor;
pub use registry::Registry;
pub use sink::{BufferedOutput, OutputSink};
pub use text::TextDescriptor;

/// Subject of a describe call.
#[derive(Debug, Clone, Copy)]
pub enum DescribeTarget<'a> {
    /// The registry carried by [`DescriptorOptions::registry`].
    Defaults,
    ResolvedType(&'a ResolvedType),
    /// The option named by [`DescriptorOptions::option`].
    Option(&'a OptionResolver),
    Resolved(&'a ResolvedOptions),
}

impl DescribeTarget<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Self::Defaults => "defaults",
            Self::ResolvedType(_) => "resolved_type",
            Self::Option(_) => "option",
            Self::Resolved(_) => "resolved_options",
        }
    }
}

/// Settings shared by all describe calls.
#[derive(Debug, Clone, Default)]
pub struct DescriptorOptions {
    /// Request ANSI decoration; honored only by decorated sinks.
    pub decorated: bool,
    /// Type owning the described option, used in titles.
    pub type_name: Option<String>,
    pub option: Option<String>,
    pub registry: Registry,
}

/// Renders describe targets in one output format.
pub trait Descriptor {
    /// Dispatches `target` to the matching describe method.
    ///
    /// # Errors
    ///
    /// Returns [`DescribeError::MissingOptionName`] when an option resolver
    /// is described without [`DescriptorOptions::option`], and
    /// [`DescribeError::UndefinedOption`] when that option is not defined.
    fn describe(
        &self,
        sink: &mut dyn OutputSink,
        target: DescribeTarget<'_>,
        options: &DescriptorOptions,
    ) -> Result<()> {
        debug!(
            target_kind = target.kind(),
            type_name = ?options.type_name,
            option = ?options.option,
            "describing"
        );

        match target {
            DescribeTarget::Defaults => self.describe_defaults(sink, options),
            DescribeTarget::ResolvedType(resolved) => {
                self.describe_resolved_type(sink, resolved, options)
            }
            DescribeTarget::Option(resolver) => {
                let name = options
                    .option
                    .as_deref()
                    .ok_or(DescribeError::MissingOptionName)?;
                let definition = resolver
                    .schema()
                    .definition(name)
                    .ok_or_else(|| DescribeError::UndefinedOption(name.to_string()))?;
                let description = OptionDescription::from_definition(definition);
                self.describe_option(sink, &description, options)
            }
            DescribeTarget::Resolved(resolved) => {
                self.describe_resolved_options(sink, resolved, options)
            }
        }
    }

    fn describe_defaults(
        &self,
        sink: &mut dyn OutputSink,
        options: &DescriptorOptions,
    ) -> Result<()>;

    fn describe_resolved_type(
        &self,
        sink: &mut dyn OutputSink,
        resolved: &ResolvedType,
        options: &DescriptorOptions,
    ) -> Result<()>;

    fn describe_option(
        &self,
        sink: &mut dyn OutputSink,
        description: &OptionDescription,
        options: &DescriptorOptions,
    ) -> Result<()>;

    fn describe_resolved_options(
        &self,
        sink: &mut dyn OutputSink,
        resolved: &ResolvedOptions,
        options: &DescriptorOptions,
    ) -> Result<()>;
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn descriptor(self) -> Box<dyn Descriptor> {
        match self {
            Self::Text => Box::new(TextDescriptor),
            Self::Json => Box::new(JsonDescriptor),
        }
    }

    /// File extension conventionally used for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = DescribeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(DescribeError::UnknownFormat(other.to_string())),
        }
    }
}
