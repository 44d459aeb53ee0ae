//! Describable snapshot of a single option definition.

use form_options_core::{AllowedValue, LazyDefault, OptionDefinition, OptionValue};
use serde::{Serialize, Serializer};

/// Entry of an allowed-values constraint as shown to users.
#[derive(Debug, Clone, PartialEq)]
pub enum AllowedEntry {
    Value(OptionValue),
    /// Predicates and patterns, which have no value to show.
    Marker(String),
}

impl AllowedEntry {
    fn from_allowed(allowed: &AllowedValue) -> Self {
        match allowed {
            AllowedValue::Exact(value) => Self::Value(value.clone()),
            other => Self::Marker(other.render()),
        }
    }

    pub(crate) fn dump(&self) -> String {
        match self {
            Self::Value(value) => crate::dump::dump(value),
            Self::Marker(marker) => marker.clone(),
        }
    }
}

impl Serialize for AllowedEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(value) => value.serialize(serializer),
            Self::Marker(marker) => serializer.serialize_str(marker),
        }
    }
}

/// What a descriptor knows about one option.
///
/// Closures are reduced to their markers so the description can be
/// compared and serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionDescription {
    pub name: String,
    pub info: Option<String>,
    pub required: bool,
    pub has_default: bool,
    /// Literal default, or the base value of a lazy default.
    pub default: OptionValue,
    /// One marker per deferred step, empty for literal defaults.
    pub lazy: Vec<String>,
    pub allowed_types: Option<Vec<String>>,
    pub allowed_values: Option<Vec<AllowedEntry>>,
    pub normalizers: Vec<String>,
}

impl OptionDescription {
    pub fn from_definition(definition: &OptionDefinition) -> Self {
        let (default, lazy) = match &definition.default {
            Some(default) => (
                default.literal().clone(),
                default.chain().iter().map(lazy_marker).collect(),
            ),
            None => (OptionValue::Null, Vec::new()),
        };

        Self {
            name: definition.name.clone(),
            info: definition.info.clone(),
            required: definition.required,
            has_default: definition.has_default(),
            default,
            lazy,
            allowed_types: definition
                .allowed_types
                .as_ref()
                .map(|types| types.iter().map(ToString::to_string).collect()),
            allowed_values: definition
                .allowed_values
                .as_ref()
                .map(|values| values.iter().map(AllowedEntry::from_allowed).collect()),
            normalizers: definition
                .normalizers
                .iter()
                .map(|n| format!("{n:?}"))
                .collect(),
        }
    }

    pub fn is_lazy(&self) -> bool {
        !self.lazy.is_empty()
    }

    pub fn has_normalizer(&self) -> bool {
        !self.normalizers.is_empty()
    }
}

fn lazy_marker(step: &LazyDefault) -> String {
    format!("{step:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_options_core::{OptionSchema, TypeTag};

    #[test]
    fn test_literal_default() {
        let mut schema = OptionSchema::new();
        schema
            .set_default("choice_translation_domain", true)
            .set_allowed_types("choice_translation_domain", &[TypeTag::Null, TypeTag::Bool, TypeTag::String])
            .set_normalizer("choice_translation_domain", |_, v| Ok(v));

        let description =
            OptionDescription::from_definition(schema.get("choice_translation_domain").unwrap());
        assert!(description.has_default);
        assert!(!description.is_lazy());
        assert_eq!(description.default, OptionValue::from(true));
        assert_eq!(
            description.allowed_types,
            Some(vec!["null".to_string(), "bool".to_string(), "string".to_string()])
        );
        assert_eq!(description.normalizers, vec!["Closure(options, value)"]);
    }

    #[test]
    fn test_lazy_chain_markers() {
        let mut schema = OptionSchema::new();
        schema
            .set_default_lazy("empty_data", |_| Ok(OptionValue::Null))
            .set_default_chained("empty_data", |_, previous| Ok(previous));

        let description = OptionDescription::from_definition(schema.get("empty_data").unwrap());
        assert!(description.is_lazy());
        assert_eq!(description.default, OptionValue::Null);
        assert_eq!(
            description.lazy,
            vec!["Closure(options)", "Closure(options, previous)"]
        );
    }

    #[test]
    fn test_allowed_entries() {
        let mut schema = OptionSchema::new();
        schema.set_required("foo").set_allowed_values(
            "foo",
            [
                AllowedValue::from("bar"),
                AllowedValue::predicate(|_| true),
                AllowedValue::pattern("^b").unwrap(),
            ],
        );

        let description = OptionDescription::from_definition(schema.get("foo").unwrap());
        assert!(description.required);
        assert!(!description.has_default);
        let entries: Vec<String> = description
            .allowed_values
            .unwrap()
            .iter()
            .map(AllowedEntry::dump)
            .collect();
        assert_eq!(entries, vec!["\"bar\"", "Closure(value)", "/^b/"]);
    }
}
