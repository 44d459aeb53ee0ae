//! Option resolution against a schema.
//!
//! [`OptionResolver::resolve`] turns caller-supplied values into a
//! [`ResolvedOptions`] set. Options are resolved lazily through
//! [`LazyOptions`]: a deferred default or normalizer that reads another
//! option triggers that option's full resolution (default, validation,
//! normalization) on demand, memoized for the rest of the call.
//!
//! # Examples
//!
//! ```
//! use form_options_core::{OptionResolver, OptionSchema, OptionValue};
//!
//! let mut schema = OptionSchema::new();
//! schema
//!     .set_default("multiple", false)
//!     .set_default_lazy("empty_data", |options| {
//!         Ok(if options.get("multiple")? == OptionValue::from(true) {
//!             OptionValue::List(vec![])
//!         } else {
//!             OptionValue::from("")
//!         })
//!     });
//!
//! let resolver = OptionResolver::new(schema);
//! let resolved = resolver.resolve([("multiple", true)]).unwrap();
//! assert_eq!(resolved.get("empty_data"), Some(&OptionValue::List(vec![])));
//! ```

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{DependencyCause, OptionsError, Result};
use crate::schema::{DefaultValue, LazyDefault, OptionDefinition, OptionSchema};
use crate::value::OptionValue;

/// Resolves supplied values against an [`OptionSchema`].
#[derive(Debug, Clone, Default)]
pub struct OptionResolver {
    schema: OptionSchema,
    ignore_unknown: bool,
}

impl OptionResolver {
    pub fn new(schema: OptionSchema) -> Self {
        Self {
            schema,
            ignore_unknown: false,
        }
    }

    /// When enabled, values for undefined options are dropped instead of
    /// failing with [`OptionsError::UnknownOption`].
    pub fn ignore_unknown(mut self, ignore: bool) -> Self {
        self.ignore_unknown = ignore;
        self
    }

    pub fn schema(&self) -> &OptionSchema {
        &self.schema
    }

    /// Resolves the schema defaults without any supplied values.
    pub fn resolve_defaults(&self) -> Result<ResolvedOptions> {
        self.resolve(std::iter::empty::<(String, OptionValue)>())
    }

    /// Resolves supplied values into a final option set.
    ///
    /// # Errors
    ///
    /// - [`OptionsError::UnknownOption`] for supplied names the schema does not define.
    /// - [`OptionsError::MissingRequiredOption`] for required options without a value.
    /// - [`OptionsError::InvalidOptionType`] / [`OptionsError::InvalidOptionValue`]
    ///   when a value violates its constraints.
    /// - [`OptionsError::CircularOrMissingDependency`] when a deferred
    ///   computation reads an option that is being resolved or has no value.
    pub fn resolve<I, K, V>(&self, provided: I) -> Result<ResolvedOptions>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<OptionValue>,
    {
        let mut supplied: IndexMap<String, OptionValue> = provided
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let unknown: Vec<String> = supplied
            .keys()
            .filter(|name| !self.schema.is_defined(name))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            if !self.ignore_unknown {
                return Err(OptionsError::UnknownOption {
                    options: unknown,
                    defined: self
                        .schema
                        .defined_options()
                        .into_iter()
                        .map(String::from)
                        .collect(),
                });
            }
            debug!(options = ?unknown, "dropping unknown options");
            supplied.retain(|name, _| !unknown.contains(name));
        }

        let missing: Vec<String> = self
            .schema
            .missing_options()
            .into_iter()
            .filter(|name| !supplied.contains_key(*name))
            .map(String::from)
            .collect();
        if !missing.is_empty() {
            return Err(OptionsError::MissingRequiredOption { options: missing });
        }

        debug!(
            defined = self.schema.len(),
            supplied = supplied.len(),
            "resolving options"
        );

        let mut lazy = LazyOptions::new(&self.schema, &supplied);
        let mut values = IndexMap::new();
        for def in self.schema.iter().filter(|def| def.defined) {
            if def.default.is_none() && !supplied.contains_key(&def.name) {
                continue;
            }
            values.insert(def.name.clone(), lazy.get(&def.name)?);
        }

        Ok(ResolvedOptions { values })
    }
}

/// Access to options from inside deferred defaults and normalizers.
///
/// Reading an option resolves it completely, so a default computed from
/// `foo` sees the normalized value of `foo`.
pub struct LazyOptions<'a> {
    schema: &'a OptionSchema,
    supplied: &'a IndexMap<String, OptionValue>,
    resolved: HashMap<String, OptionValue>,
    calling: Vec<String>,
}

impl<'a> LazyOptions<'a> {
    fn new(schema: &'a OptionSchema, supplied: &'a IndexMap<String, OptionValue>) -> Self {
        Self {
            schema,
            supplied,
            resolved: HashMap::new(),
            calling: Vec::new(),
        }
    }

    /// Returns the resolved value of `name`, resolving it if necessary.
    pub fn get(&mut self, name: &str) -> Result<OptionValue> {
        if let Some(value) = self.resolved.get(name) {
            return Ok(value.clone());
        }

        let schema = self.schema;
        let Some(def) = schema.definition(name) else {
            return Err(dependency_error(name, DependencyCause::Undefined));
        };

        if self.calling.iter().any(|pending| pending == name) {
            let chain = self
                .calling
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(name))
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(dependency_error(name, DependencyCause::Cycle(chain)));
        }

        self.calling.push(name.to_string());
        let result = self.compute(def);
        self.calling.pop();

        let value = result?;
        trace!(option = name, value = %value.render(), "resolved option");
        self.resolved.insert(name.to_string(), value.clone());
        Ok(value)
    }

    /// Returns `true` if `name` is defined and has a supplied or default value.
    pub fn contains(&self, name: &str) -> bool {
        self.schema
            .definition(name)
            .is_some_and(|def| def.has_default() || self.supplied.contains_key(name))
    }

    /// Returns `true` if the caller supplied a value for `name`.
    pub fn is_supplied(&self, name: &str) -> bool {
        self.supplied.contains_key(name)
    }

    fn compute(&mut self, def: &'a OptionDefinition) -> Result<OptionValue> {
        let supplied = self.supplied;
        let raw = match (supplied.get(&def.name), &def.default) {
            (Some(value), _) => value.clone(),
            (None, Some(DefaultValue::Literal(value))) => value.clone(),
            (None, Some(DefaultValue::Deferred { base, chain })) => {
                trace!(option = %def.name, steps = chain.len(), "evaluating deferred default");
                let mut value = base.clone();
                for step in chain {
                    value = match step {
                        LazyDefault::Computed(f) => f(&mut *self)?,
                        LazyDefault::Chained(f) => f(&mut *self, value)?,
                    };
                }
                value
            }
            (None, None) => return Err(dependency_error(&def.name, DependencyCause::Missing)),
        };

        check_type(def, &raw)?;
        check_value(def, &raw)?;

        let mut value = raw;
        for normalizer in &def.normalizers {
            value = normalizer.apply(self, value)?;
        }
        Ok(value)
    }
}

fn dependency_error(option: &str, cause: DependencyCause) -> OptionsError {
    OptionsError::CircularOrMissingDependency {
        option: option.to_string(),
        cause,
    }
}

fn check_type(def: &OptionDefinition, value: &OptionValue) -> Result<()> {
    let Some(types) = &def.allowed_types else {
        return Ok(());
    };
    if types.iter().any(|tag| tag.matches(value)) {
        return Ok(());
    }
    Err(OptionsError::InvalidOptionType {
        option: def.name.clone(),
        expected: types.iter().map(ToString::to_string).collect(),
        actual: value.type_name().to_string(),
        value: value.render(),
    })
}

fn check_value(def: &OptionDefinition, value: &OptionValue) -> Result<()> {
    let Some(allowed) = &def.allowed_values else {
        return Ok(());
    };
    if allowed.iter().any(|matcher| matcher.matches(value)) {
        return Ok(());
    }
    Err(OptionsError::InvalidOptionValue {
        option: def.name.clone(),
        expected: allowed
            .iter()
            .map(|matcher| matcher.render())
            .collect::<Vec<_>>()
            .join(", "),
        value: value.render(),
    })
}

/// Final option values produced by one resolution, in declaration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ResolvedOptions {
    values: IndexMap<String, OptionValue>,
}

impl ResolvedOptions {
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Option names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, OptionValue> {
        self.values
    }
}
