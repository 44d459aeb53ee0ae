//! Multi-line value dumps for text tables.

use form_options_core::OptionValue;

/// Dumps a value, spreading non-empty lists and maps over several lines.
pub(crate) fn dump(value: &OptionValue) -> String {
    dump_at(value, 0)
}

/// Dumps pre-rendered items with the same bracket layout as a list.
pub(crate) fn dump_items<S: AsRef<str>>(items: &[S]) -> String {
    bracketed('[', ']', items.iter().map(|item| item.as_ref().to_string()), 0)
}

fn dump_at(value: &OptionValue, indent: usize) -> String {
    match value {
        OptionValue::List(items) => bracketed(
            '[',
            ']',
            items.iter().map(|item| dump_at(item, indent + 2)),
            indent,
        ),
        OptionValue::Map(entries) => bracketed(
            '{',
            '}',
            entries
                .iter()
                .map(|(key, item)| format!("{key:?}: {}", dump_at(item, indent + 2))),
            indent,
        ),
        scalar => scalar.render(),
    }
}

fn bracketed(open: char, close: char, items: impl Iterator<Item = String>, indent: usize) -> String {
    let pad = " ".repeat(indent + 2);
    let body: Vec<String> = items.map(|item| format!("{pad}{item}")).collect();
    if body.is_empty() {
        return format!("{open}{close}");
    }
    format!("{open}\n{}\n{}{close}", body.join(",\n"), " ".repeat(indent))
}
