//! Option schema definitions.
//!
//! An [`OptionSchema`] is an insertion-ordered set of [`OptionDefinition`]s
//! built by form types through `configure_options`. Registering the same
//! option again mutates the existing definition in place, so the position of
//! an option is fixed by its first registration. Declaration order drives
//! both normalizer application and description output.
//!
//! # Examples
//!
//! ```
//! use form_options_core::{OptionSchema, OptionValue, TypeTag};
//!
//! let mut schema = OptionSchema::new();
//! schema
//!     .set_required("foo")
//!     .set_allowed_types("foo", &[TypeTag::String])
//!     .set_allowed_values("foo", ["bar", "baz"])
//!     .set_default("label", OptionValue::Null);
//!
//! assert_eq!(schema.defined_options(), vec!["foo", "label"]);
//! assert_eq!(schema.missing_options(), vec!["foo"]);
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;

use crate::error::Result;
use crate::resolver::LazyOptions;
use crate::value::{OptionValue, TypeTag};

type ComputedFn = dyn Fn(&mut LazyOptions<'_>) -> Result<OptionValue> + Send + Sync;
type TransformFn = dyn Fn(&mut LazyOptions<'_>, OptionValue) -> Result<OptionValue> + Send + Sync;
type PredicateFn = dyn Fn(&OptionValue) -> bool + Send + Sync;

/// One step of a deferred default.
#[derive(Clone)]
pub enum LazyDefault {
    /// Computes the default from other options, ignoring earlier defaults.
    Computed(Arc<ComputedFn>),
    /// Receives the default computed so far and refines it.
    Chained(Arc<TransformFn>),
}

impl fmt::Debug for LazyDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Computed(_) => f.write_str("Closure(options)"),
            Self::Chained(_) => f.write_str("Closure(options, previous)"),
        }
    }
}

/// Default value of an option.
#[derive(Debug, Clone)]
pub enum DefaultValue {
    Literal(OptionValue),
    /// Evaluated at resolution time by folding `chain` over `base`.
    Deferred {
        base: OptionValue,
        chain: Vec<LazyDefault>,
    },
}

impl DefaultValue {
    /// The literal part of the default (the base of a deferred default).
    pub fn literal(&self) -> &OptionValue {
        match self {
            Self::Literal(value) => value,
            Self::Deferred { base, .. } => base,
        }
    }

    /// Deferred steps, empty for literal defaults.
    pub fn chain(&self) -> &[LazyDefault] {
        match self {
            Self::Literal(_) => &[],
            Self::Deferred { chain, .. } => chain,
        }
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, Self::Deferred { .. })
    }
}

/// Post-validation transform applied to an option's value.
#[derive(Clone)]
pub struct Normalizer(Arc<TransformFn>);

impl Normalizer {
    pub fn new(
        f: impl Fn(&mut LazyOptions<'_>, OptionValue) -> Result<OptionValue> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    pub(crate) fn apply(&self, options: &mut LazyOptions<'_>, value: OptionValue) -> Result<OptionValue> {
        (self.0)(options, value)
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Closure(options, value)")
    }
}

/// A matcher in an allowed-values constraint.
///
/// # Examples
///
/// ```
/// use form_options_core::{AllowedValue, OptionValue};
///
/// let exact = AllowedValue::from("bar");
/// assert!(exact.matches(&OptionValue::from("bar")));
///
/// let positive = AllowedValue::predicate(|v| matches!(v, OptionValue::Int(i) if *i > 0));
/// assert!(positive.matches(&OptionValue::from(3)));
///
/// let slug = AllowedValue::pattern("^[a-z-]+$").unwrap();
/// assert!(slug.matches(&OptionValue::from("my-form")));
/// assert!(!slug.matches(&OptionValue::from(1)));
/// ```
#[derive(Clone)]
pub enum AllowedValue {
    Exact(OptionValue),
    Predicate(Arc<PredicateFn>),
    /// Matches string values against a regular expression.
    Pattern(Regex),
}

impl AllowedValue {
    pub fn predicate(f: impl Fn(&OptionValue) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(f))
    }

    pub fn pattern(pattern: &str) -> std::result::Result<Self, regex::Error> {
        Regex::new(pattern).map(Self::Pattern)
    }

    pub fn matches(&self, value: &OptionValue) -> bool {
        match self {
            Self::Exact(expected) => expected == value,
            Self::Predicate(f) => f(value),
            Self::Pattern(re) => value.as_str().is_some_and(|s| re.is_match(s)),
        }
    }

    /// Single-line rendering used in error messages.
    pub fn render(&self) -> String {
        match self {
            Self::Exact(value) => value.render(),
            Self::Predicate(_) => "Closure(value)".to_string(),
            Self::Pattern(re) => format!("/{}/", re.as_str()),
        }
    }
}

impl fmt::Debug for AllowedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<OptionValue> for AllowedValue {
    fn from(value: OptionValue) -> Self {
        Self::Exact(value)
    }
}

impl From<&str> for AllowedValue {
    fn from(value: &str) -> Self {
        Self::Exact(value.into())
    }
}

impl From<String> for AllowedValue {
    fn from(value: String) -> Self {
        Self::Exact(value.into())
    }
}

impl From<bool> for AllowedValue {
    fn from(value: bool) -> Self {
        Self::Exact(value.into())
    }
}

impl From<i64> for AllowedValue {
    fn from(value: i64) -> Self {
        Self::Exact(value.into())
    }
}

/// Definition of a single option.
#[derive(Debug, Clone)]
pub struct OptionDefinition {
    /// Unique option name.
    pub name: String,
    /// Whether the option belongs to the schema's option set. Entries created
    /// only by constraint setters stay undefined.
    pub defined: bool,
    pub default: Option<DefaultValue>,
    pub required: bool,
    pub allowed_types: Option<Vec<TypeTag>>,
    pub allowed_values: Option<Vec<AllowedValue>>,
    /// Applied in order after validation.
    pub normalizers: Vec<Normalizer>,
    /// Free-form help text.
    pub info: Option<String>,
}

impl OptionDefinition {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            defined: false,
            default: None,
            required: false,
            allowed_types: None,
            allowed_values: None,
            normalizers: Vec::new(),
            info: None,
        }
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn is_lazy(&self) -> bool {
        self.default.as_ref().is_some_and(DefaultValue::is_lazy)
    }

    pub fn has_normalizer(&self) -> bool {
        !self.normalizers.is_empty()
    }

    /// Required and without a default: the caller has to supply a value.
    pub fn is_missing(&self) -> bool {
        self.required && self.default.is_none()
    }
}

/// Ordered, mutable collection of option definitions.
#[derive(Debug, Clone, Default)]
pub struct OptionSchema {
    options: IndexMap<String, OptionDefinition>,
}

impl OptionSchema {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, name: &str) -> &mut OptionDefinition {
        self.options
            .entry(name.to_string())
            .or_insert_with(|| OptionDefinition::new(name))
    }

    /// Sets a literal default, discarding any deferred default steps.
    pub fn set_default(&mut self, name: &str, value: impl Into<OptionValue>) -> &mut Self {
        let def = self.entry(name);
        def.defined = true;
        def.default = Some(DefaultValue::Literal(value.into()));
        self
    }

    /// Sets a default computed from other options at resolution time.
    ///
    /// Replaces earlier deferred steps; a literal default set before is kept
    /// as the base value.
    pub fn set_default_lazy(
        &mut self,
        name: &str,
        f: impl Fn(&mut LazyOptions<'_>) -> Result<OptionValue> + Send + Sync + 'static,
    ) -> &mut Self {
        self.push_lazy(name, LazyDefault::Computed(Arc::new(f)), true)
    }

    /// Adds a deferred step that receives the default computed so far.
    ///
    /// Earlier deferred steps are kept and run first; without any, the step
    /// receives the literal default (or `null`).
    pub fn set_default_chained(
        &mut self,
        name: &str,
        f: impl Fn(&mut LazyOptions<'_>, OptionValue) -> Result<OptionValue> + Send + Sync + 'static,
    ) -> &mut Self {
        self.push_lazy(name, LazyDefault::Chained(Arc::new(f)), false)
    }

    fn push_lazy(&mut self, name: &str, lazy: LazyDefault, replace: bool) -> &mut Self {
        let def = self.entry(name);
        def.defined = true;
        def.default = Some(match def.default.take() {
            Some(DefaultValue::Deferred { base, mut chain }) => {
                if replace {
                    chain.clear();
                }
                chain.push(lazy);
                DefaultValue::Deferred { base, chain }
            }
            Some(DefaultValue::Literal(base)) => DefaultValue::Deferred {
                base,
                chain: vec![lazy],
            },
            None => DefaultValue::Deferred {
                base: OptionValue::Null,
                chain: vec![lazy],
            },
        });
        self
    }

    /// Marks an option as mandatory (and defined).
    pub fn set_required(&mut self, name: &str) -> &mut Self {
        let def = self.entry(name);
        def.defined = true;
        def.required = true;
        self
    }

    /// Defines an option without a default. Such an option only appears in
    /// resolved sets when the caller supplies it.
    pub fn set_defined(&mut self, name: &str) -> &mut Self {
        self.entry(name).defined = true;
        self
    }

    pub fn set_info(&mut self, name: &str, info: impl Into<String>) -> &mut Self {
        self.entry(name).info = Some(info.into());
        self
    }

    pub fn set_allowed_types(&mut self, name: &str, types: &[TypeTag]) -> &mut Self {
        self.entry(name).allowed_types = Some(types.to_vec());
        self
    }

    pub fn add_allowed_types(&mut self, name: &str, types: &[TypeTag]) -> &mut Self {
        self.entry(name)
            .allowed_types
            .get_or_insert_with(Vec::new)
            .extend_from_slice(types);
        self
    }

    pub fn set_allowed_values<I, V>(&mut self, name: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AllowedValue>,
    {
        self.entry(name).allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn add_allowed_values<I, V>(&mut self, name: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AllowedValue>,
    {
        self.entry(name)
            .allowed_values
            .get_or_insert_with(Vec::new)
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Replaces all normalizers of an option with `f`.
    pub fn set_normalizer(
        &mut self,
        name: &str,
        f: impl Fn(&mut LazyOptions<'_>, OptionValue) -> Result<OptionValue> + Send + Sync + 'static,
    ) -> &mut Self {
        self.entry(name).normalizers = vec![Normalizer::new(f)];
        self
    }

    /// Appends a normalizer that runs after the existing ones.
    pub fn add_normalizer(
        &mut self,
        name: &str,
        f: impl Fn(&mut LazyOptions<'_>, OptionValue) -> Result<OptionValue> + Send + Sync + 'static,
    ) -> &mut Self {
        self.entry(name).normalizers.push(Normalizer::new(f));
        self
    }

    pub fn get(&self, name: &str) -> Option<&OptionDefinition> {
        self.options.get(name)
    }

    /// Returns the definition of `name` only if it is defined.
    pub fn definition(&self, name: &str) -> Option<&OptionDefinition> {
        self.options.get(name).filter(|def| def.defined)
    }

    /// Iterates over all entries (defined or not) in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &OptionDefinition> {
        self.options.values()
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.definition(name).is_some()
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.definition(name).is_some_and(|def| def.required)
    }

    pub fn has_default(&self, name: &str) -> bool {
        self.definition(name).is_some_and(OptionDefinition::has_default)
    }

    pub fn defined_options(&self) -> Vec<&str> {
        self.names_where(|def| def.defined)
    }

    /// Names touched by constraint setters but never defined.
    pub fn undefined_options(&self) -> Vec<&str> {
        self.names_where(|def| !def.defined)
    }

    pub fn required_options(&self) -> Vec<&str> {
        self.names_where(|def| def.defined && def.required)
    }

    /// Required options without a default.
    pub fn missing_options(&self) -> Vec<&str> {
        self.names_where(|def| def.defined && def.is_missing())
    }

    fn names_where(&self, pred: impl Fn(&OptionDefinition) -> bool) -> Vec<&str> {
        self.options
            .values()
            .filter(|def| pred(def))
            .map(|def| def.name.as_str())
            .collect()
    }

    /// Number of defined options.
    pub fn len(&self) -> usize {
        self.options.values().filter(|def| def.defined).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redefinition_keeps_original_position() {
        let mut schema = OptionSchema::new();
        schema
            .set_default("a", 1)
            .set_default("b", 2)
            .set_default("a", 3);

        assert_eq!(schema.defined_options(), vec!["a", "b"]);
        let a = schema.get("a").unwrap();
        assert!(matches!(
            a.default,
            Some(DefaultValue::Literal(OptionValue::Int(3)))
        ));
    }

    #[test]
    fn test_constraints_alone_do_not_define() {
        let mut schema = OptionSchema::new();
        schema.set_allowed_types("label", &[TypeTag::String]);

        assert!(!schema.is_defined("label"));
        assert_eq!(schema.undefined_options(), vec!["label"]);
        assert!(schema.is_empty());

        schema.set_defined("label");
        assert!(schema.is_defined("label"));
        assert!(!schema.has_default("label"));
        assert_eq!(schema.get("label").unwrap().allowed_types, Some(vec![TypeTag::String]));
    }

    #[test]
    fn test_chained_defaults_accumulate() {
        let mut schema = OptionSchema::new();
        schema
            .set_default("empty_data", "")
            .set_default_chained("empty_data", |_, prev| Ok(prev))
            .set_default_chained("empty_data", |_, prev| Ok(prev));

        let default = schema.get("empty_data").unwrap().default.clone().unwrap();
        assert_eq!(default.literal(), &OptionValue::from(""));
        assert_eq!(default.chain().len(), 2);
    }

    #[test]
    fn test_computed_default_replaces_chain() {
        let mut schema = OptionSchema::new();
        schema
            .set_default_chained("x", |_, prev| Ok(prev))
            .set_default_lazy("x", |_| Ok(OptionValue::from(1)));

        let default = schema.get("x").unwrap().default.clone().unwrap();
        assert_eq!(default.chain().len(), 1);
        assert!(matches!(default.chain()[0], LazyDefault::Computed(_)));
    }

    #[test]
    fn test_literal_default_clears_lazy_steps() {
        let mut schema = OptionSchema::new();
        schema
            .set_default_lazy("x", |_| Ok(OptionValue::from(1)))
            .set_default("x", 2);

        assert!(!schema.get("x").unwrap().is_lazy());
    }

    #[test]
    fn test_required_with_default_is_not_missing() {
        let mut schema = OptionSchema::new();
        schema
            .set_required("a")
            .set_required("b")
            .set_default("b", true);

        assert_eq!(schema.required_options(), vec!["a", "b"]);
        assert_eq!(schema.missing_options(), vec!["a"]);
    }

    #[test]
    fn test_add_allowed_values_extends() {
        let mut schema = OptionSchema::new();
        schema
            .set_allowed_values("foo", ["bar"])
            .add_allowed_values("foo", ["baz"]);

        let values = schema.get("foo").unwrap().allowed_values.as_ref().unwrap();
        assert_eq!(values.len(), 2);
        assert!(values[1].matches(&OptionValue::from("baz")));
    }

    #[test]
    fn test_set_normalizer_replaces_add_appends() {
        let mut schema = OptionSchema::new();
        schema
            .set_normalizer("a", |_, v| Ok(v))
            .add_normalizer("a", |_, v| Ok(v))
            .set_normalizer("b", |_, v| Ok(v))
            .set_normalizer("b", |_, v| Ok(v));

        assert_eq!(schema.get("a").unwrap().normalizers.len(), 2);
        assert_eq!(schema.get("b").unwrap().normalizers.len(), 1);
    }
}
