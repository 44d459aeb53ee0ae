//! Option schemas, lazy option resolution and form type hierarchies.
//!
//! This crate is the resolution engine behind form type configuration:
//!
//! - [`OptionSchema`]: ordered option definitions with defaults, required
//!   markers, allowed types/values and normalizers.
//! - [`OptionResolver`]: resolves supplied values against a schema,
//!   evaluating deferred defaults lazily and detecting dependency cycles.
//! - [`ResolvedType`]: a [`FormType`] merged with its parent chain and
//!   [`FormTypeExtension`]s into one effective schema.
//! - [`OptionValue`] / [`TypeTag`]: the dynamic value model.
//!
//! All failures are reported through [`OptionsError`].
//!
//! # Example
//!
//! ```
//! use form_options_core::*;
//!
//! let mut schema = OptionSchema::new();
//! schema
//!     .set_required("foo")
//!     .set_allowed_types("foo", &[TypeTag::String])
//!     .set_allowed_values("foo", ["bar", "baz"]);
//!
//! let resolver = OptionResolver::new(schema);
//! let resolved = resolver.resolve([("foo", "bar")]).unwrap();
//! assert_eq!(resolved.get("foo"), Some(&OptionValue::from("bar")));
//!
//! let err = resolver.resolve([("foo", "qux")]).unwrap_err();
//! assert!(matches!(err, OptionsError::InvalidOptionValue { .. }));
//! ```

mod error;
mod resolver;
mod schema;
mod types;
mod value;

pub use error::{DependencyCause, OptionsError, Result};
pub use resolver::{LazyOptions, OptionResolver, ResolvedOptions};
pub use schema::{AllowedValue, DefaultValue, LazyDefault, Normalizer, OptionDefinition, OptionSchema};
pub use types::{FormType, FormTypeExtension, ResolvedType, default_block_prefix};
pub use value::{DataProducer, FormContext, OptionValue, ParseTypeTagError, TypeTag};
