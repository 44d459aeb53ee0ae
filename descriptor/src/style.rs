//! Block-oriented text layout: titles, sections, listings and tables.
//!
//! Blocks are separated by a single blank line. Decoration is applied only
//! when the writer is decorated and never changes column widths.

use anstyle::{AnsiColor, Style};

use crate::sink::OutputSink;

const TITLE: Style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Yellow))).bold();
const SECTION: Style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Yellow)));
const LABEL: Style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Green)));

/// A table cell.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Text(String),
    /// Group heading inside a column.
    Label(String),
    /// Dashes spanning the column width.
    Rule,
    Empty,
}

impl Cell {
    pub(crate) fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    fn width(&self) -> usize {
        match self {
            Self::Text(text) | Self::Label(text) => {
                text.lines().map(|line| line.chars().count()).max().unwrap_or(0)
            }
            Self::Rule | Self::Empty => 0,
        }
    }

    fn height(&self) -> usize {
        match self {
            Self::Text(text) | Self::Label(text) => text.lines().count().max(1),
            Self::Rule | Self::Empty => 1,
        }
    }

    fn line(&self, index: usize, width: usize, decorated: bool) -> String {
        match self {
            Self::Text(text) => pad(text.lines().nth(index).unwrap_or(""), width),
            Self::Label(text) => {
                let line = text.lines().nth(index).unwrap_or("");
                let padding = " ".repeat(width.saturating_sub(line.chars().count()));
                format!("{}{padding}", paint(LABEL, line, decorated))
            }
            Self::Rule if index == 0 => "-".repeat(width),
            Self::Rule | Self::Empty => " ".repeat(width),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Row {
    Cells(Vec<Cell>),
    Separator,
}

/// A bordered table with optional headers.
#[derive(Debug, Clone, Default)]
pub(crate) struct Table {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_headers<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub(crate) fn row(&mut self, cells: Vec<Cell>) -> &mut Self {
        self.rows.push(Row::Cells(cells));
        self
    }

    pub(crate) fn separator(&mut self) -> &mut Self {
        self.rows.push(Row::Separator);
        self
    }

    fn widths(&self) -> Vec<usize> {
        let columns = self
            .rows
            .iter()
            .filter_map(|row| match row {
                Row::Cells(cells) => Some(cells.len()),
                Row::Separator => None,
            })
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);

        let mut widths = vec![0; columns];
        for (i, header) in self.headers.iter().enumerate() {
            widths[i] = widths[i].max(header.chars().count());
        }
        for row in &self.rows {
            if let Row::Cells(cells) = row {
                for (i, cell) in cells.iter().enumerate() {
                    widths[i] = widths[i].max(cell.width());
                }
            }
        }
        widths
    }

    pub(crate) fn render(&self, decorated: bool) -> Vec<String> {
        let widths = self.widths();
        let border = format!(
            " {}",
            widths
                .iter()
                .map(|w| "-".repeat(w + 2))
                .collect::<Vec<_>>()
                .join(" ")
        );

        let mut lines = vec![border.clone()];
        if !self.headers.is_empty() {
            let headers: Vec<Cell> = self.headers.iter().map(|h| Cell::Label(h.clone())).collect();
            lines.extend(render_row(&headers, &widths, decorated));
            lines.push(border.clone());
        }
        for row in &self.rows {
            match row {
                Row::Cells(cells) => lines.extend(render_row(cells, &widths, decorated)),
                Row::Separator => lines.push(border.clone()),
            }
        }
        lines.push(border);
        lines
    }
}

fn render_row(cells: &[Cell], widths: &[usize], decorated: bool) -> Vec<String> {
    let height = cells.iter().map(Cell::height).max().unwrap_or(1);
    (0..height)
        .map(|index| {
            let segments: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, &width)| {
                    let line = cells
                        .get(i)
                        .map(|cell| cell.line(index, width, decorated))
                        .unwrap_or_else(|| " ".repeat(width));
                    format!(" {line} ")
                })
                .collect();
            format!(" {}", segments.join(" ")).trim_end().to_string()
        })
        .collect()
}

fn pad(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}

fn paint(style: Style, text: &str, decorated: bool) -> String {
    if decorated {
        format!("{style}{text}{style:#}")
    } else {
        text.to_string()
    }
}

/// Writes blocks to a sink, inserting blank lines between them.
pub(crate) struct BlockWriter<'a> {
    sink: &'a mut dyn OutputSink,
    decorated: bool,
    started: bool,
}

impl<'a> BlockWriter<'a> {
    pub(crate) fn new(sink: &'a mut dyn OutputSink, decorated: bool) -> Self {
        Self {
            sink,
            decorated,
            started: false,
        }
    }

    fn block(&mut self, lines: Vec<String>) {
        if self.started {
            self.sink.write("\n");
        }
        for line in lines {
            self.sink.write(&line);
            self.sink.write("\n");
        }
        self.started = true;
    }

    pub(crate) fn title(&mut self, text: &str) {
        let underline = "=".repeat(text.chars().count());
        self.block(vec![paint(TITLE, text, self.decorated), underline]);
    }

    pub(crate) fn section(&mut self, text: &str) {
        let underline = "-".repeat(text.chars().count());
        self.block(vec![paint(SECTION, text, self.decorated), underline]);
    }

    pub(crate) fn listing<S: AsRef<str>>(&mut self, items: &[S]) {
        self.block(items.iter().map(|item| format!(" * {}", item.as_ref())).collect());
    }

    pub(crate) fn text(&mut self, lines: Vec<String>) {
        self.block(lines);
    }

    pub(crate) fn table(&mut self, table: &Table) {
        let lines = table.render(self.decorated);
        self.block(lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::BufferedOutput;

    #[test]
    fn test_headed_table_layout() {
        let mut table = Table::with_headers(["Option", "Value"]);
        table
            .row(vec![Cell::text("compound"), Cell::text("true")])
            .row(vec![Cell::text("label"), Cell::text("null")]);

        assert_eq!(
            table.render(false),
            vec![
                " ---------- -------",
                "  Option     Value",
                " ---------- -------",
                "  compound   true",
                "  label      null",
                " ---------- -------",
            ]
        );
    }

    #[test]
    fn test_multiline_cells_and_separators() {
        let mut table = Table::new();
        table
            .row(vec![Cell::text("Default"), Cell::text("[\n  1\n]")])
            .separator()
            .row(vec![Cell::text("Info"), Cell::text("-")]);

        assert_eq!(
            table.render(false),
            vec![
                " --------- -----",
                "  Default   [",
                "              1",
                "            ]",
                " --------- -----",
                "  Info      -",
                " --------- -----",
            ]
        );
    }

    #[test]
    fn test_label_and_rule_cells() {
        let mut table = Table::with_headers(["Parent options"]);
        table
            .row(vec![Cell::Label("FormType".to_string())])
            .row(vec![Cell::Rule])
            .row(vec![Cell::text("label")])
            .row(vec![Cell::Empty]);

        assert_eq!(
            table.render(false),
            vec![
                " ----------------",
                "  Parent options",
                " ----------------",
                "  FormType",
                "  --------------",
                "  label",
                "",
                " ----------------",
            ]
        );
    }

    #[test]
    fn test_decoration_keeps_widths() {
        let mut table = Table::with_headers(["Option"]);
        table.row(vec![Cell::text("required")]);

        let plain = table.render(false);
        let decorated = table.render(true);
        assert_eq!(plain[0], decorated[0]);
        assert!(decorated[1].contains("\u{1b}["));
        assert_eq!(plain[3], decorated[3]);
    }

    #[test]
    fn test_blocks_are_separated_by_blank_lines() {
        let mut output = BufferedOutput::new(false);
        {
            let mut writer = BlockWriter::new(&mut output, false);
            writer.title("FooType (foo)");
            writer.listing(&["a", "b"]);
        }
        assert_eq!(
            output.fetch(),
            "FooType (foo)\n=============\n\n * a\n * b\n"
        );
    }
}
