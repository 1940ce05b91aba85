//! Line-based block dispatcher.
//!
//! Walks the document one line at a time and decides which handler owns the
//! upcoming lines. Each handler is a pure function from `(lines, index)` to a
//! block and the index of the first line it did not consume.

use crate::code::{CodeBlock, is_fence, parse_code_block};
use crate::engine::MarkdownEngine;
use crate::quote::{QuoteBlock, is_quote_line, parse_quote};
use crate::table::{Table, is_alignment_row, parse_table, starts_table};
use crate::util::is_blank;

/// HTML emitted for an empty line.
///
/// The markdown engine collapses blank lines, so they are kept explicitly to
/// preserve vertical spacing.
pub(crate) const EMPTY_PARAGRAPH: &str = "<p></p>";

/// A block recognized by the dispatcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// Fenced code block.
    Code(CodeBlock),
    /// Pipe table with alignments.
    Table(Table),
    /// Run of quote lines.
    Quote(QuoteBlock),
    /// Empty line.
    Empty,
    /// Single line forwarded to the markdown engine.
    Markdown(String),
}

impl Block {
    /// Render this block into `out`.
    pub fn render<E: MarkdownEngine + ?Sized>(&self, engine: &E, out: &mut String) {
        match self {
            Self::Code(code) => code.render(out),
            Self::Table(table) => table.render(out),
            Self::Quote(quote) => quote.render(engine, out),
            Self::Empty => out.push_str(EMPTY_PARAGRAPH),
            Self::Markdown(line) => out.push_str(&engine.render(line)),
        }
    }
}

/// Split a document on `\n` and classify its lines into blocks.
///
/// # Examples
///
/// ```
/// use md2html_renderer::{Block, parse_blocks};
///
/// let blocks = parse_blocks("Hello\n\n```\ncode\n```");
/// assert_eq!(blocks.len(), 3);
/// assert_eq!(blocks[1], Block::Empty);
/// assert!(matches!(blocks[2], Block::Code(_)));
/// ```
#[must_use]
pub fn parse_blocks(text: &str) -> Vec<Block> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let (block, next) = next_block(&lines, i);
        blocks.extend(block);
        i = next;
    }

    blocks
}

/// Classify the line at `index` and consume everything its handler owns.
///
/// Always consumes at least one line.
fn next_block(lines: &[&str], index: usize) -> (Option<Block>, usize) {
    let line = lines[index];

    if is_fence(line) {
        let (code, next) = parse_code_block(lines, index);
        return (Some(Block::Code(code)), next);
    }

    if starts_table(lines, index) {
        let (table, next) = parse_table(lines, index);
        return (table.map(Block::Table), next);
    }

    if is_alignment_row(line) {
        tracing::debug!(line = index + 1, "Skipping alignment row without a table header");
        return (None, index + 1);
    }

    if is_quote_line(line) {
        let (quote, next) = parse_quote(lines, index);
        return (Some(Block::Quote(quote)), next);
    }

    if is_blank(line) {
        return (Some(Block::Empty), index + 1);
    }

    (Some(Block::Markdown(line.to_owned())), index + 1)
}
