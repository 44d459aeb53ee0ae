//! Form types and resolved type hierarchies.
//!
//! A [`FormType`] contributes options to a schema through
//! [`FormType::configure_options`]; that is the only hook the resolution
//! engine needs from a type. A [`ResolvedType`] binds a type to its parent
//! and its [`FormTypeExtension`]s and computes the effective schema:
//!
//! 1. the parent's effective schema (if any),
//! 2. overlaid by the inner type's own options,
//! 3. overlaid by each extension, in registration order.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use form_options_core::{FormType, OptionSchema, OptionValue, ResolvedType};
//!
//! struct BaseType;
//!
//! impl FormType for BaseType {
//!     fn name(&self) -> &str { "BaseType" }
//!     fn configure_options(&self, schema: &mut OptionSchema) {
//!         schema.set_default("required", true);
//!     }
//! }
//!
//! struct TextType;
//!
//! impl FormType for TextType {
//!     fn name(&self) -> &str { "TextType" }
//!     fn configure_options(&self, schema: &mut OptionSchema) {
//!         schema.set_default("trim", true).set_default("required", false);
//!     }
//! }
//!
//! let base = Arc::new(ResolvedType::new(Arc::new(BaseType), vec![], None).unwrap());
//! let text = ResolvedType::new(Arc::new(TextType), vec![], Some(base)).unwrap();
//!
//! assert_eq!(text.block_prefix(), "text");
//! assert_eq!(text.effective_schema().defined_options(), vec!["required", "trim"]);
//! let resolved = text.resolve_defaults().unwrap();
//! assert_eq!(resolved.get("required"), Some(&OptionValue::from(false)));
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{OptionsError, Result};
use crate::resolver::{OptionResolver, ResolvedOptions};
use crate::schema::OptionSchema;
use crate::value::OptionValue;

/// A type definition that contributes options to a schema.
pub trait FormType: Send + Sync {
    /// Identity of the type, unique within a hierarchy.
    fn name(&self) -> &str;

    /// Prefix used for block names when rendering the type.
    ///
    /// Defaults to the snake-cased name without its `Type` suffix.
    fn block_prefix(&self) -> String {
        default_block_prefix(self.name())
    }

    fn configure_options(&self, schema: &mut OptionSchema);
}

/// Adds options to an existing type without subclassing it.
pub trait FormTypeExtension: Send + Sync {
    fn name(&self) -> &str;

    fn configure_options(&self, schema: &mut OptionSchema);
}

/// Derives a block prefix from a type name.
///
/// # Examples
///
/// ```
/// use form_options_core::default_block_prefix;
///
/// assert_eq!(default_block_prefix("ChoiceType"), "choice");
/// assert_eq!(default_block_prefix("forms::DateTimeType"), "date_time");
/// assert_eq!(default_block_prefix("Type"), "type");
/// ```
pub fn default_block_prefix(name: &str) -> String {
    let short = name.rsplit("::").next().unwrap_or(name);
    let stem = match short.strip_suffix("Type") {
        Some(stem) if !stem.is_empty() => stem,
        _ => short,
    };

    let chars: Vec<char> = stem.chars().collect();
    let mut out = String::with_capacity(stem.len() + 4);
    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            // A run of capitals is one word; it ends before a capitalized word.
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                out.push('_');
            }
        }
        out.extend(ch.to_lowercase());
    }
    out
}

/// A type merged with its parent chain and extensions.
pub struct ResolvedType {
    inner: Arc<dyn FormType>,
    extensions: Vec<Arc<dyn FormTypeExtension>>,
    parent: Option<Arc<ResolvedType>>,
    schema: OptionSchema,
}

impl ResolvedType {
    /// Builds a resolved type and its effective schema.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::StructuralCycle`] if a type with the same name
    /// as `inner` (or any ancestor) appears twice in the parent chain.
    pub fn new(
        inner: Arc<dyn FormType>,
        extensions: Vec<Arc<dyn FormTypeExtension>>,
        parent: Option<Arc<ResolvedType>>,
    ) -> Result<Self> {
        check_chain(inner.name(), parent.as_deref())?;

        let mut schema = parent
            .as_ref()
            .map(|p| p.schema.clone())
            .unwrap_or_default();
        inner.configure_options(&mut schema);
        for extension in &extensions {
            extension.configure_options(&mut schema);
        }

        debug!(
            form_type = inner.name(),
            parent = ?parent.as_ref().map(|p| p.name()),
            extensions = extensions.len(),
            options = schema.len(),
            "resolved form type"
        );

        Ok(Self {
            inner,
            extensions,
            parent,
            schema,
        })
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn block_prefix(&self) -> String {
        self.inner.block_prefix()
    }

    pub fn inner(&self) -> &dyn FormType {
        self.inner.as_ref()
    }

    pub fn extensions(&self) -> &[Arc<dyn FormTypeExtension>] {
        &self.extensions
    }

    pub fn parent(&self) -> Option<&ResolvedType> {
        self.parent.as_deref()
    }

    /// Ancestors, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &ResolvedType> {
        std::iter::successors(self.parent(), |t| t.parent())
    }

    pub fn effective_schema(&self) -> &OptionSchema {
        &self.schema
    }

    /// Returns a resolver bound to the effective schema.
    pub fn options_resolver(&self) -> OptionResolver {
        OptionResolver::new(self.schema.clone())
    }

    /// Resolves supplied values against the effective schema.
    pub fn resolve<I, K, V>(&self, provided: I) -> Result<ResolvedOptions>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<OptionValue>,
    {
        self.options_resolver().resolve(provided)
    }

    pub fn resolve_defaults(&self) -> Result<ResolvedOptions> {
        self.options_resolver().resolve_defaults()
    }
}

impl fmt::Debug for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedType")
            .field("name", &self.name())
            .field(
                "extensions",
                &self.extensions.iter().map(|e| e.name()).collect::<Vec<_>>(),
            )
            .field("parent", &self.parent().map(ResolvedType::name))
            .field("options", &self.schema.defined_options())
            .finish()
    }
}

fn check_chain(name: &str, parent: Option<&ResolvedType>) -> Result<()> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut path = vec![name];
    visited.insert(name);

    let mut cursor = parent;
    while let Some(ancestor) = cursor {
        path.push(ancestor.name());
        if !visited.insert(ancestor.name()) {
            return Err(OptionsError::StructuralCycle {
                path: path.join(" -> "),
            });
        }
        cursor = ancestor.parent();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str, &'static [&'static str]);

    impl FormType for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn configure_options(&self, schema: &mut OptionSchema) {
            for option in self.1 {
                schema.set_default(option, self.0);
            }
        }
    }

    struct Ext;

    impl FormTypeExtension for Ext {
        fn name(&self) -> &str {
            "Ext"
        }

        fn configure_options(&self, schema: &mut OptionSchema) {
            schema.set_default("b", "Ext").set_default("x", "Ext");
        }
    }

    fn resolved(
        name: &'static str,
        options: &'static [&'static str],
        extensions: Vec<Arc<dyn FormTypeExtension>>,
        parent: Option<Arc<ResolvedType>>,
    ) -> Result<ResolvedType> {
        ResolvedType::new(Arc::new(Named(name, options)), extensions, parent)
    }

    #[test]
    fn test_block_prefix_defaults() {
        assert_eq!(default_block_prefix("FormType"), "form");
        assert_eq!(default_block_prefix("CheckboxType"), "checkbox");
        assert_eq!(default_block_prefix("URLType"), "url");
        assert_eq!(default_block_prefix("HTMLTextareaType"), "html_textarea");
        assert_eq!(default_block_prefix("Sha256HashType"), "sha256_hash");
        assert_eq!(default_block_prefix("money"), "money");
    }

    #[test]
    fn test_effective_schema_precedence() {
        let root = Arc::new(resolved("Root", &["a", "b"], vec![], None).unwrap());
        let child = resolved("Child", &["b", "c"], vec![Arc::new(Ext)], Some(root)).unwrap();

        let schema = child.effective_schema();
        assert_eq!(schema.defined_options(), vec!["a", "b", "c", "x"]);

        let values = child.resolve_defaults().unwrap();
        assert_eq!(values.get("a"), Some(&OptionValue::from("Root")));
        assert_eq!(values.get("b"), Some(&OptionValue::from("Ext")));
        assert_eq!(values.get("c"), Some(&OptionValue::from("Child")));
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let root = Arc::new(resolved("Root", &[], vec![], None).unwrap());
        let mid = Arc::new(resolved("Mid", &[], vec![], Some(root)).unwrap());
        let leaf = resolved("Leaf", &[], vec![], Some(mid)).unwrap();

        let names: Vec<_> = leaf.ancestors().map(ResolvedType::name).collect();
        assert_eq!(names, vec!["Mid", "Root"]);
    }

    #[test]
    fn test_structural_cycle_detected() {
        let root = Arc::new(resolved("Form", &[], vec![], None).unwrap());
        let choice = Arc::new(resolved("Choice", &[], vec![], Some(root)).unwrap());

        let err = resolved("Form", &[], vec![], Some(choice)).unwrap_err();
        assert_eq!(
            err,
            OptionsError::StructuralCycle {
                path: "Form -> Choice -> Form".to_string(),
            }
        );
    }

    #[test]
    fn test_debug_lists_names() {
        let root = resolved("Root", &["a"], vec![Arc::new(Ext)], None).unwrap();
        let debug = format!("{root:?}");
        assert!(debug.contains("\"Root\""));
        assert!(debug.contains("\"Ext\""));
    }
}
