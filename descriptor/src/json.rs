//! Machine-readable descriptions.

use form_options_core::{ResolvedOptions, ResolvedType};
use indexmap::IndexMap;
use serde_json::{Map, Value, json};

use crate::collect::TypeOptions;
use crate::definition::OptionDescription;
use crate::error::Result;
use crate::sink::OutputSink;
use crate::{Descriptor, DescriptorOptions};

/// Renders descriptions as pretty-printed JSON documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDescriptor;

impl JsonDescriptor {
    fn write(&self, sink: &mut dyn OutputSink, value: &Value) -> Result<()> {
        let mut rendered = serde_json::to_string_pretty(value)?;
        rendered.push('\n');
        sink.write(&rendered);
        Ok(())
    }
}

impl Descriptor for JsonDescriptor {
    fn describe_defaults(
        &self,
        sink: &mut dyn OutputSink,
        options: &DescriptorOptions,
    ) -> Result<()> {
        let registry = &options.registry;
        let value = json!({
            "builtin_form_types": registry.core_types,
            "service_form_types": registry.service_types,
            "type_extensions": registry.extensions,
            "type_guessers": registry.guessers,
        });
        self.write(sink, &value)
    }

    fn describe_resolved_type(
        &self,
        sink: &mut dyn OutputSink,
        resolved: &ResolvedType,
        _options: &DescriptorOptions,
    ) -> Result<()> {
        let collected = TypeOptions::collect(resolved);
        let value = json!({
            "class": resolved.name(),
            "block_prefix": resolved.block_prefix(),
            "options": {
                "own": collected.own,
                "overridden": groups(&collected.overridden),
                "parent": groups(&collected.parent),
                "extension": groups(&collected.extension),
                "required": collected.required,
            },
            "parent_types": collected.parent_types,
            "type_extensions": collected.type_extensions,
        });
        self.write(sink, &value)
    }

    fn describe_option(
        &self,
        sink: &mut dyn OutputSink,
        description: &OptionDescription,
        _options: &DescriptorOptions,
    ) -> Result<()> {
        let mut map = Map::new();
        if let Some(info) = &description.info {
            map.insert("info".into(), json!(info));
        }
        map.insert("required".into(), json!(description.required));
        if description.has_default {
            map.insert("default".into(), serde_json::to_value(&description.default)?);
            map.insert("is_lazy".into(), json!(description.is_lazy()));
        }
        if let Some(types) = &description.allowed_types {
            map.insert("allowed_types".into(), json!(types));
        }
        if let Some(values) = &description.allowed_values {
            map.insert("allowed_values".into(), serde_json::to_value(values)?);
        }
        map.insert("has_normalizer".into(), json!(description.has_normalizer()));
        self.write(sink, &Value::Object(map))
    }

    fn describe_resolved_options(
        &self,
        sink: &mut dyn OutputSink,
        resolved: &ResolvedOptions,
        _options: &DescriptorOptions,
    ) -> Result<()> {
        let value = serde_json::to_value(resolved)?;
        self.write(sink, &value)
    }
}

/// Non-empty groups as a JSON object, in collection order.
fn groups(groups: &IndexMap<String, Vec<String>>) -> Value {
    Value::Object(
        groups
            .iter()
            .filter(|(_, names)| !names.is_empty())
            .map(|(class, names)| (class.clone(), json!(names)))
            .collect(),
    )
}
