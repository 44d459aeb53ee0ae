//! Human-readable descriptions rendered as titled blocks and tables.

use form_options_core::{ResolvedOptions, ResolvedType};
use indexmap::IndexMap;

use crate::collect::TypeOptions;
use crate::definition::{AllowedEntry, OptionDescription};
use crate::dump::{dump, dump_items};
use crate::error::Result;
use crate::registry::short_name;
use crate::sink::OutputSink;
use crate::style::{BlockWriter, Cell, Table};
use crate::{Descriptor, DescriptorOptions};

/// Built-in type names per line in the defaults description.
const NAMES_PER_LINE: usize = 5;

/// Renders descriptions as plain text, optionally decorated with ANSI styles.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextDescriptor;

fn is_decorated(sink: &dyn OutputSink, options: &DescriptorOptions) -> bool {
    options.decorated && sink.is_decorated()
}

impl Descriptor for TextDescriptor {
    fn describe_defaults(
        &self,
        sink: &mut dyn OutputSink,
        options: &DescriptorOptions,
    ) -> Result<()> {
        let decorated = is_decorated(sink, options);
        let registry = &options.registry;
        let mut out = BlockWriter::new(sink, decorated);

        if !registry.core_types.is_empty() {
            out.section("Built-in form types");
            let names: Vec<&str> = registry.core_types.iter().map(|n| short_name(n)).collect();
            out.text(
                names
                    .chunks(NAMES_PER_LINE)
                    .map(|chunk| format!(" {}", chunk.join(", ")))
                    .collect(),
            );
        }
        for (title, names) in [
            ("Service form types", &registry.service_types),
            ("Type extensions", &registry.extensions),
            ("Type guessers", &registry.guessers),
        ] {
            if !names.is_empty() {
                out.section(title);
                out.listing(names);
            }
        }
        Ok(())
    }

    fn describe_resolved_type(
        &self,
        sink: &mut dyn OutputSink,
        resolved: &ResolvedType,
        options: &DescriptorOptions,
    ) -> Result<()> {
        let decorated = is_decorated(sink, options);
        let collected = TypeOptions::collect(resolved);
        let mut out = BlockWriter::new(sink, decorated);

        out.title(&format!(
            "{} (Block prefix: \"{}\")",
            short_name(resolved.name()),
            resolved.block_prefix()
        ));

        let columns = option_columns(&collected);
        if !columns.is_empty() {
            let height = columns.iter().map(|(_, cells)| cells.len()).max().unwrap_or(0);
            let mut table = Table::with_headers(columns.iter().map(|(header, _)| *header));
            for i in 0..height {
                table.row(
                    columns
                        .iter()
                        .map(|(_, cells)| cells.get(i).cloned().unwrap_or(Cell::Empty))
                        .collect(),
                );
            }
            out.table(&table);
        }

        if !collected.parent_types.is_empty() {
            out.section("Parent types");
            out.listing(&collected.parent_types);
        }
        if !collected.type_extensions.is_empty() {
            out.section("Type extensions");
            out.listing(&collected.type_extensions);
        }
        Ok(())
    }

    fn describe_option(
        &self,
        sink: &mut dyn OutputSink,
        description: &OptionDescription,
        options: &DescriptorOptions,
    ) -> Result<()> {
        let decorated = is_decorated(sink, options);
        let mut out = BlockWriter::new(sink, decorated);

        let title = match &options.type_name {
            Some(type_name) => format!("{} ({})", short_name(type_name), description.name),
            None => description.name.clone(),
        };
        out.title(&title);

        let rows = [
            ("Info", description.info.clone()),
            ("Required", Some(description.required.to_string())),
            ("Default", default_cell(description)),
            (
                "Allowed types",
                description
                    .allowed_types
                    .as_ref()
                    .map(|types| dump_items(&quoted(types))),
            ),
            (
                "Allowed values",
                description.allowed_values.as_ref().map(|values| {
                    dump_items(&values.iter().map(AllowedEntry::dump).collect::<Vec<_>>())
                }),
            ),
            (
                "Normalizers",
                description
                    .has_normalizer()
                    .then(|| dump_items(&description.normalizers)),
            ),
        ];

        let mut table = Table::new();
        for (i, (label, value)) in rows.into_iter().enumerate() {
            if i > 0 {
                table.separator();
            }
            table.row(vec![
                Cell::Label(label.to_string()),
                Cell::text(value.unwrap_or_else(|| "-".to_string())),
            ]);
        }
        out.table(&table);
        Ok(())
    }

    fn describe_resolved_options(
        &self,
        sink: &mut dyn OutputSink,
        resolved: &ResolvedOptions,
        options: &DescriptorOptions,
    ) -> Result<()> {
        let decorated = is_decorated(sink, options);
        let mut out = BlockWriter::new(sink, decorated);

        if let Some(type_name) = &options.type_name {
            out.title(&format!("{} (resolved options)", short_name(type_name)));
        }

        let mut table = Table::with_headers(["Option", "Value"]);
        for (name, value) in resolved.iter() {
            table.row(vec![Cell::text(name), Cell::text(dump(value))]);
        }
        out.table(&table);
        Ok(())
    }
}

fn default_cell(description: &OptionDescription) -> Option<String> {
    if !description.has_default {
        return None;
    }
    if description.is_lazy() {
        return Some(format!(
            "Value: {}\n\nClosure(s): {}",
            dump(&description.default),
            dump_items(&description.lazy)
        ));
    }
    Some(dump(&description.default))
}

fn quoted(names: &[String]) -> Vec<String> {
    names.iter().map(|name| format!("\"{name}\"")).collect()
}

/// Builds the option columns of a resolved type table, dropping empty ones.
fn option_columns(collected: &TypeOptions) -> Vec<(&'static str, Vec<Cell>)> {
    let mut columns = Vec::new();

    if !collected.own.is_empty() {
        let cells = collected
            .own
            .iter()
            .map(|name| {
                if collected.required.contains(name) {
                    Cell::Label(name.clone())
                } else {
                    Cell::text(name.as_str())
                }
            })
            .collect();
        columns.push(("Options", cells));
    }

    for (header, groups) in [
        ("Overridden options", &collected.overridden),
        ("Parent options", &collected.parent),
        ("Extension options", &collected.extension),
    ] {
        let cells = grouped_cells(groups);
        if !cells.is_empty() {
            columns.push((header, cells));
        }
    }
    columns
}

fn grouped_cells(groups: &IndexMap<String, Vec<String>>) -> Vec<Cell> {
    let mut cells = Vec::new();
    for (class, names) in groups {
        if names.is_empty() {
            continue;
        }
        if !cells.is_empty() {
            cells.push(Cell::Empty);
        }
        cells.push(Cell::Label(short_name(class).to_string()));
        cells.push(Cell::Rule);
        cells.extend(names.iter().map(|name| Cell::text(name.as_str())));
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::sink::BufferedOutput;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_types_wrap_after_five_names() {
        let options = DescriptorOptions {
            registry: Registry {
                core_types: ["A", "B", "C", "D", "E", "F", "core::G"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                ..Registry::default()
            },
            ..DescriptorOptions::default()
        };
        let mut output = BufferedOutput::new(false);
        TextDescriptor.describe_defaults(&mut output, &options).unwrap();

        assert_eq!(
            output.fetch(),
            "Built-in form types\n-------------------\n\n A, B, C, D, E\n F, G\n"
        );
    }

    #[test]
    fn test_empty_registry_writes_nothing() {
        let mut output = BufferedOutput::new(false);
        TextDescriptor
            .describe_defaults(&mut output, &DescriptorOptions::default())
            .unwrap();
        assert_eq!(output.fetch(), "");
    }

    #[test]
    fn test_grouped_cells_skip_empty_groups() {
        let mut groups = IndexMap::new();
        groups.insert("core::FormType".to_string(), vec!["label".to_string()]);
        groups.insert("Empty".to_string(), vec![]);
        groups.insert("Other".to_string(), vec!["attr".to_string()]);

        assert_eq!(
            grouped_cells(&groups),
            vec![
                Cell::Label("FormType".to_string()),
                Cell::Rule,
                Cell::text("label"),
                Cell::Empty,
                Cell::Label("Other".to_string()),
                Cell::Rule,
                Cell::text("attr"),
            ]
        );
    }

    #[test]
    fn test_decorated_only_when_sink_supports_it() {
        let options = DescriptorOptions {
            decorated: true,
            registry: Registry {
                guessers: vec!["Guesser".to_string()],
                ..Registry::default()
            },
            ..DescriptorOptions::default()
        };

        let mut plain = BufferedOutput::new(false);
        TextDescriptor.describe_defaults(&mut plain, &options).unwrap();
        assert!(!plain.fetch().contains('\u{1b}'));

        let mut styled = BufferedOutput::new(true);
        TextDescriptor.describe_defaults(&mut styled, &options).unwrap();
        assert!(styled.fetch().contains('\u{1b}'));
    }
}
