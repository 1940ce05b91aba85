//! Pipe tables with per-column alignment.
//!
//! A table starts at a pipe-delimited row followed by an alignment row
//! (`|:---|---:|`). It continues while lines are table rows with the same
//! number of cells as the first row, or further alignment rows. An alignment
//! row applies to the rows below it, up to the next alignment row.

use std::fmt::Write;

use crate::code::is_fence;
use crate::util::escape_html;

/// Column alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Alignment encoded by one separator cell.
    ///
    /// `:---:` is center, `---:` is right, anything else (including an empty
    /// cell) is left.
    fn from_cell(cell: &str) -> Self {
        let cell = cell.trim();
        match (cell.starts_with(':'), cell.len() > 1 && cell.ends_with(':')) {
            (true, true) => Self::Center,
            (false, true) => Self::Right,
            _ => Self::Left,
        }
    }

    /// Value for the HTML `align` attribute.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// One row of table cells.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableRow {
    /// Trimmed cell contents, unescaped.
    pub cells: Vec<String>,
    /// Column alignments in effect for this row.
    pub alignments: Vec<Alignment>,
}

impl TableRow {
    fn parse(line: &str, alignments: &[Alignment]) -> Self {
        Self {
            cells: split_row(line),
            alignments: alignments.to_vec(),
        }
    }
}

/// A parsed table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    /// First data row, rendered in `<thead>`.
    pub header: TableRow,
    /// Remaining data rows in document order.
    pub body: Vec<TableRow>,
}

impl Table {
    /// Render as `<table>` into `out`.
    pub fn render(&self, out: &mut String) {
        out.push_str("<table>\n<thead>\n");
        render_row(&self.header, "th", out);
        out.push_str("\n</thead>\n<tbody>\n");
        for row in &self.body {
            render_row(row, "td", out);
            out.push('\n');
        }
        out.push_str("</tbody>\n</table>");
    }

    /// Render as a standalone HTML fragment.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.render(&mut out);
        out
    }
}

fn render_row(row: &TableRow, tag: &str, out: &mut String) {
    out.push_str("<tr>");
    for (index, cell) in row.cells.iter().enumerate() {
        match row.alignments.get(index) {
            Some(align) => {
                let _ = write!(
                    out,
                    r#"<{tag} align="{}">{}</{tag}>"#,
                    align.as_str(),
                    escape_html(cell)
                );
            }
            None => {
                let _ = write!(out, "<{tag}>{}</{tag}>", escape_html(cell));
            }
        }
    }
    out.push_str("</tr>");
}

/// Split a pipe-delimited line into trimmed cells.
///
/// One leading and one trailing pipe are optional and dropped before splitting.
pub(crate) fn split_row(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = line.strip_suffix('|').unwrap_or(line);
    line.split('|').map(|cell| cell.trim().to_owned()).collect()
}

/// Check whether a line is a table row: it contains a pipe and at least one
/// non-empty cell.
pub(crate) fn is_table_row(line: &str) -> bool {
    line.contains('|') && split_row(line).iter().any(|cell| !cell.is_empty())
}

/// Check whether a line is an alignment row: it contains a pipe and a dash,
/// and every non-empty cell is dashes with optional surrounding colons.
pub(crate) fn is_alignment_row(line: &str) -> bool {
    line.contains('|')
        && line.contains('-')
        && split_row(line)
            .iter()
            .filter(|cell| !cell.is_empty())
            .all(|cell| is_alignment_cell(cell))
}

fn is_alignment_cell(cell: &str) -> bool {
    let dashes = cell.trim_matches(':').trim();
    !dashes.is_empty() && dashes.chars().all(|c| c == '-')
}

fn parse_alignments(line: &str) -> Vec<Alignment> {
    split_row(line)
        .iter()
        .map(|cell| Alignment::from_cell(cell))
        .collect()
}

/// Check whether a table starts at `index`: the line is a table or alignment
/// row and the next line is an alignment row.
pub(crate) fn starts_table(lines: &[&str], index: usize) -> bool {
    let line = lines[index];
    (is_table_row(line) || is_alignment_row(line))
        && lines.get(index + 1).is_some_and(|next| is_alignment_row(next))
}

/// Consume a table starting at `start`.
///
/// The first line fixes the expected column count. Data rows with a different
/// count, fences, and non-table lines end the table without being consumed.
/// Each alignment row replaces the alignments of the rows after it. A header
/// read before any alignment row takes the first one.
///
/// Returns `None` for the table when no data row was found, along with the
/// index of the first unconsumed line.
pub(crate) fn parse_table(lines: &[&str], start: usize) -> (Option<Table>, usize) {
    let expected = split_row(lines[start]).len();
    let mut alignments: Vec<Alignment> = Vec::new();
    let mut seen_alignment = false;
    let mut rows: Vec<TableRow> = Vec::new();
    let mut i = start;

    while i < lines.len() {
        let line = lines[i];
        if is_fence(line) {
            break;
        }
        if is_alignment_row(line) {
            alignments = parse_alignments(line);
            if !seen_alignment {
                for row in &mut rows {
                    row.alignments.clone_from(&alignments);
                }
                seen_alignment = true;
            }
            i += 1;
            continue;
        }
        if !is_table_row(line) {
            break;
        }
        let row = TableRow::parse(line, &alignments);
        if row.cells.len() != expected {
            tracing::debug!(
                line = i + 1,
                expected,
                found = row.cells.len(),
                "Column count mismatch, closing table"
            );
            break;
        }
        rows.push(row);
        i += 1;
    }

    let mut rows = rows.into_iter();
    let table = rows.next().map(|header| Table {
        header,
        body: rows.collect(),
    });
    (table, i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_row() {
        assert_eq!(split_row("| a | b |"), vec!["a", "b"]);
        assert_eq!(split_row("a | b"), vec!["a", "b"]);
        assert_eq!(split_row("  | a |  b  "), vec!["a", "b"]);
        assert_eq!(split_row("| a || c |"), vec!["a", "", "c"]);
    }

    #[test]
    fn test_is_table_row() {
        assert!(is_table_row("| a | b |"));
        assert!(is_table_row("a | b"));
        assert!(!is_table_row("no pipes here"));
        assert!(!is_table_row("| |"));
        assert!(!is_table_row("|"));
    }

    #[test]
    fn test_is_alignment_row() {
        assert!(is_alignment_row("|---|---|"));
        assert!(is_alignment_row("| :--- | :---: | ---: |"));
        assert!(is_alignment_row("--- | ---"));
        assert!(is_alignment_row("| --- | |"));
        assert!(!is_alignment_row("| a | --- |"));
        assert!(!is_alignment_row("---"));
        assert!(!is_alignment_row("| : |"));
        assert!(!is_alignment_row("| a | b |"));
    }

    #[test]
    fn test_alignment_mapping() {
        assert_eq!(Alignment::from_cell(":---"), Alignment::Left);
        assert_eq!(Alignment::from_cell(":---:"), Alignment::Center);
        assert_eq!(Alignment::from_cell("---:"), Alignment::Right);
        assert_eq!(Alignment::from_cell("---"), Alignment::Left);
        assert_eq!(Alignment::from_cell(""), Alignment::Left);
        assert_eq!(Alignment::from_cell(" :-: "), Alignment::Center);
    }

    #[test]
    fn test_starts_table_requires_alignment_row() {
        let lines = ["| a | b |", "|---|---|"];
        assert!(starts_table(&lines, 0));

        let lines = ["| a | b |", "| 1 | 2 |"];
        assert!(!starts_table(&lines, 0));

        let lines = ["| a | b |"];
        assert!(!starts_table(&lines, 0));
    }

    #[test]
    fn test_parse_table() {
        let lines = ["| a | b |", "|:---|---:|", "| 1 | 2 |", "| 3 | 4 |", "", "after"];
        let (table, next) = parse_table(&lines, 0);
        let table = table.unwrap();

        assert_eq!(table.header.cells, vec!["a", "b"]);
        assert_eq!(
            table.header.alignments,
            vec![Alignment::Left, Alignment::Right]
        );
        assert_eq!(table.body[0].alignments, table.header.alignments);
        assert_eq!(table.body.len(), 2);
        assert_eq!(table.body[1].cells, vec!["3", "4"]);
        assert_eq!(next, 4);
    }

    #[test]
    fn test_parse_table_stops_at_mismatched_row() {
        let lines = ["| a | b |", "|---|---|", "| 1 | 2 |", "| 1 | 2 | 3 |"];
        let (table, next) = parse_table(&lines, 0);

        assert_eq!(table.unwrap().body.len(), 1);
        assert_eq!(next, 3);
    }

    #[test]
    fn test_parse_table_stops_at_fence() {
        let lines = ["| a | b |", "|---|---|", "```x|y", "code"];
        let (table, next) = parse_table(&lines, 0);

        assert!(table.unwrap().body.is_empty());
        assert_eq!(next, 2);
    }

    #[test]
    fn test_parse_table_later_alignment_row_applies_below() {
        let lines = ["| a | b |", "|---|--:|", "| 1 | 2 |", "|:-:|:-:|", "| 3 | 4 |"];
        let (table, next) = parse_table(&lines, 0);
        let table = table.unwrap();

        assert_eq!(
            table.header.alignments,
            vec![Alignment::Left, Alignment::Right]
        );
        assert_eq!(
            table.body[0].alignments,
            vec![Alignment::Left, Alignment::Right]
        );
        assert_eq!(
            table.body[1].alignments,
            vec![Alignment::Center, Alignment::Center]
        );
        assert_eq!(next, 5);
    }

    #[test]
    fn test_render_later_alignment_row_changes_following_rows() {
        let lines = ["| a | b |", "|---|---|", "| 1 | 2 |", "|--:|--:|", "| 3 | 4 |"];
        let (table, _) = parse_table(&lines, 0);

        assert_eq!(
            table.unwrap().to_html(),
            "<table>\n<thead>\n\
             <tr><th align=\"left\">a</th><th align=\"left\">b</th></tr>\n\
             </thead>\n<tbody>\n\
             <tr><td align=\"left\">1</td><td align=\"left\">2</td></tr>\n\
             <tr><td align=\"right\">3</td><td align=\"right\">4</td></tr>\n\
             </tbody>\n</table>"
        );
    }

    #[test]
    fn test_parse_table_only_alignment_rows() {
        let lines = ["|---|---|", "|---|---|", "text"];
        let (table, next) = parse_table(&lines, 0);

        assert!(table.is_none());
        assert_eq!(next, 2);
    }

    #[test]
    fn test_render_table() {
        let lines = ["| a | b |", "|:---|---:|", "| 1 | 2 |"];
        let (table, _) = parse_table(&lines, 0);

        assert_eq!(
            table.unwrap().to_html(),
            "<table>\n<thead>\n\
             <tr><th align=\"left\">a</th><th align=\"right\">b</th></tr>\n\
             </thead>\n<tbody>\n\
             <tr><td align=\"left\">1</td><td align=\"right\">2</td></tr>\n\
             </tbody>\n</table>"
        );
    }

    #[test]
    fn test_render_header_only() {
        let lines = ["| a |", "|:-:|"];
        let (table, _) = parse_table(&lines, 0);

        assert_eq!(
            table.unwrap().to_html(),
            "<table>\n<thead>\n<tr><th align=\"center\">a</th></tr>\n</thead>\n<tbody>\n</tbody>\n</table>"
        );
    }

    #[test]
    fn test_render_cells_beyond_alignments() {
        let lines = ["| a | b | c |", "|---:|"];
        let (table, _) = parse_table(&lines, 0);

        assert_eq!(
            table.unwrap().to_html(),
            "<table>\n<thead>\n<tr><th align=\"right\">a</th><th>b</th><th>c</th></tr>\n</thead>\n<tbody>\n</tbody>\n</table>"
        );
    }

    #[test]
    fn test_render_escapes_cells() {
        let lines = ["| <b> | a & b |", "|---|---|"];
        let (table, _) = parse_table(&lines, 0);

        assert!(
            table
                .unwrap()
                .to_html()
                .contains(r#"<th align="left">&lt;b&gt;</th><th align="left">a &amp; b</th>"#)
        );
    }
}
