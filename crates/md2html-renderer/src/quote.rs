//! Blockquotes with nested code blocks.
//!
//! Quote interiors are handed to the markdown engine as a whole, so nested
//! tables, lists, and quotes render with the engine's own rules. Fenced code
//! inside a quote is captured here instead and spliced into the interior as
//! literal HTML, keeping its indentation intact.

use crate::code::{CodeBlock, is_fence};
use crate::engine::MarkdownEngine;

/// One dequoted line of a blockquote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuoteLine {
    /// Markdown text with the quote marker removed.
    Text(String),
    /// A fenced code block captured from consecutive quote lines.
    Code(CodeBlock),
}

/// A run of consecutive quote lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuoteBlock {
    pub lines: Vec<QuoteLine>,
}

impl QuoteBlock {
    /// Interior markdown with captured code blocks substituted as HTML lines.
    #[must_use]
    pub fn interior(&self) -> String {
        self.lines
            .iter()
            .map(|line| match line {
                QuoteLine::Text(text) => text.clone(),
                QuoteLine::Code(code) => code.to_html(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render the interior through `engine` and wrap it in `<blockquote>`.
    pub fn render<E: MarkdownEngine + ?Sized>(&self, engine: &E, out: &mut String) {
        out.push_str("<blockquote>\n");
        out.push_str(&engine.render(&self.interior()));
        out.push_str("\n</blockquote>");
    }
}

/// Check whether a line belongs to a blockquote.
pub(crate) fn is_quote_line(line: &str) -> bool {
    line.trim_start().starts_with('>')
}

/// Strip the quote marker and at most one following space.
///
/// Further leading spaces are content (e.g., indented code inside a quote).
fn dequote(line: &str) -> &str {
    let rest = line.trim_start();
    let rest = rest.strip_prefix('>').unwrap_or(rest);
    rest.strip_prefix(' ').unwrap_or(rest)
}

/// Consume the run of quote lines starting at `start`.
///
/// Returns the block and the index of the first line after the run.
pub(crate) fn parse_quote(lines: &[&str], start: usize) -> (QuoteBlock, usize) {
    let mut block = QuoteBlock::default();
    let mut i = start;

    while i < lines.len() && is_quote_line(lines[i]) {
        let inner = dequote(lines[i]);
        i += 1;

        if !is_fence(inner) {
            block.lines.push(QuoteLine::Text(inner.to_owned()));
            continue;
        }

        let mut code = CodeBlock::opened_by(inner);
        let mut closed = false;
        while i < lines.len() && is_quote_line(lines[i]) {
            let inner = dequote(lines[i]);
            i += 1;
            if is_fence(inner) {
                closed = true;
                break;
            }
            code.lines.push(inner.to_owned());
        }
        if !closed {
            tracing::debug!(line = i, "Unterminated code fence inside blockquote");
        }
        block.lines.push(QuoteLine::Code(code));
    }

    (block, i)
}
