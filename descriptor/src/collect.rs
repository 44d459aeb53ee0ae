//! Attribution of a resolved type's options to the types that declare them.
//!
//! Parents are re-configured one level at a time so every option can be
//! traced back to the ancestor or extension that introduced it.

use form_options_core::{OptionSchema, ResolvedType};
use indexmap::IndexMap;

/// Options of a resolved type grouped by origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeOptions {
    /// Options introduced by the type itself.
    pub own: Vec<String>,
    /// Inherited options the type redeclares, by ancestor.
    pub overridden: IndexMap<String, Vec<String>>,
    /// Inherited options left untouched, by ancestor.
    pub parent: IndexMap<String, Vec<String>>,
    /// Options added by extensions, by extension.
    pub extension: IndexMap<String, Vec<String>>,
    pub required: Vec<String>,
    pub parent_types: Vec<String>,
    pub type_extensions: Vec<String>,
}

impl TypeOptions {
    pub fn collect(resolved: &ResolvedType) -> Self {
        let mut collector = Collector::default();

        let mut schema = match resolved.parent() {
            Some(parent) => collector.parent_schema(parent),
            None => OptionSchema::new(),
        };
        let inherited = defined(&schema);

        let mut declared = OptionSchema::new();
        resolved.inner().configure_options(&mut declared);

        let own: Vec<String> = defined(&declared)
            .into_iter()
            .filter(|name| !inherited.contains(name))
            .collect();
        let overridden_all: Vec<String> = declared
            .iter()
            .map(|definition| definition.name.clone())
            .filter(|name| inherited.contains(name))
            .collect();

        let mut overridden = IndexMap::new();
        let mut parent = IndexMap::new();
        for (class, options) in &collector.parents {
            overridden.insert(
                class.clone(),
                overridden_all
                    .iter()
                    .filter(|name| options.contains(name))
                    .cloned()
                    .collect(),
            );
            parent.insert(class.clone(), subtract(options, &overridden_all));
        }

        resolved.inner().configure_options(&mut schema);
        collector.extensions_of(resolved, &mut schema);

        let extension = collector
            .extensions
            .iter()
            .map(|(class, options)| {
                let remaining = subtract(&subtract(options, &own), &overridden_all);
                (class.clone(), remaining)
            })
            .collect();

        Self {
            required: schema
                .required_options()
                .into_iter()
                .map(str::to_string)
                .collect(),
            own,
            overridden,
            parent,
            extension,
            parent_types: resolved
                .ancestors()
                .map(|ancestor| ancestor.name().to_string())
                .collect(),
            type_extensions: resolved
                .extensions()
                .iter()
                .map(|extension| extension.name().to_string())
                .collect(),
        }
    }
}

#[derive(Default)]
struct Collector {
    parents: IndexMap<String, Vec<String>>,
    extensions: IndexMap<String, Vec<String>>,
}

impl Collector {
    fn parent_schema(&mut self, resolved: &ResolvedType) -> OptionSchema {
        let class = resolved.name().to_string();
        self.parents.insert(class.clone(), Vec::new());

        let mut schema = match resolved.parent() {
            Some(parent) => self.parent_schema(parent),
            None => OptionSchema::new(),
        };
        let inherited = defined(&schema);
        resolved.inner().configure_options(&mut schema);
        self.parents.insert(class, subtract(&defined(&schema), &inherited));

        self.extensions_of(resolved, &mut schema);
        schema
    }

    fn extensions_of(&mut self, resolved: &ResolvedType, schema: &mut OptionSchema) {
        for extension in resolved.extensions() {
            let inherited = defined(schema);
            extension.configure_options(schema);
            self.extensions
                .insert(extension.name().to_string(), subtract(&defined(schema), &inherited));
        }
    }
}

fn defined(schema: &OptionSchema) -> Vec<String> {
    schema
        .defined_options()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn subtract(options: &[String], removed: &[String]) -> Vec<String> {
    options
        .iter()
        .filter(|name| !removed.contains(name))
        .cloned()
        .collect()
}
