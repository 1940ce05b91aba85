//! Fenced code blocks.
//!
//! A fence is a line whose trimmed form starts with three or more backticks.
//! Interior lines are kept byte-for-byte; only HTML escaping is applied when
//! rendering, so indentation and blank lines survive unchanged.

use std::fmt::Write;

use crate::util::escape_html;

/// Minimum number of backticks forming a fence token.
const MIN_FENCE_LEN: usize = 3;

/// A fenced code block with its raw interior lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeBlock {
    /// Language tag after the opening fence (e.g., "rust").
    pub language: Option<String>,
    /// Interior lines, unmodified.
    pub lines: Vec<String>,
}

impl CodeBlock {
    /// Start an empty block from its opening fence line.
    pub(crate) fn opened_by(fence_line: &str) -> Self {
        Self {
            language: fence_language(fence_line),
            lines: Vec::new(),
        }
    }

    /// Interior text with lines joined by `\n`.
    #[must_use]
    pub fn body(&self) -> String {
        self.lines.join("\n")
    }

    /// Render as `<pre><code>` into `out`.
    pub fn render(&self, out: &mut String) {
        let body = escape_html(&self.body());
        match &self.language {
            Some(lang) => {
                let _ = write!(
                    out,
                    r#"<pre><code class="language-{}">{body}</code></pre>"#,
                    escape_html(lang)
                );
            }
            None => {
                let _ = write!(out, "<pre><code>{body}</code></pre>");
            }
        }
    }

    /// Render as a standalone HTML fragment.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.render(&mut out);
        out
    }
}

/// Length of the backtick run opening `trimmed`, if long enough to be a fence.
fn fence_len(trimmed: &str) -> Option<usize> {
    let count = trimmed.chars().take_while(|&c| c == '`').count();
    (count >= MIN_FENCE_LEN).then_some(count)
}

/// Check whether a line opens or closes a fenced code block.
pub(crate) fn is_fence(line: &str) -> bool {
    fence_len(line.trim()).is_some()
}

/// Extract the language tag following the fence token.
fn fence_language(line: &str) -> Option<String> {
    let trimmed = line.trim();
    let len = fence_len(trimmed)?;
    // Backticks are single-byte, so the char count is a valid byte offset.
    let lang = trimmed[len..].trim();
    (!lang.is_empty()).then(|| lang.to_owned())
}

/// Consume a fenced code block whose opening fence is at `start`.
///
/// Returns the block and the index of the first line after the closing fence.
/// An unterminated block extends to the end of the document.
pub(crate) fn parse_code_block(lines: &[&str], start: usize) -> (CodeBlock, usize) {
    let mut block = CodeBlock::opened_by(lines[start]);
    let mut i = start + 1;

    while i < lines.len() {
        if is_fence(lines[i]) {
            return (block, i + 1);
        }
        block.lines.push(lines[i].to_owned());
        i += 1;
    }

    tracing::debug!(line = start + 1, "Unterminated code fence, closing at end of document");
    (block, i)
}
