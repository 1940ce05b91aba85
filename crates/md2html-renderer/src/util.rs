//! Shared text helpers for block parsing.

/// Escape HTML special characters.
///
/// # Examples
///
/// ```
/// use md2html_renderer::escape_html;
///
/// assert_eq!(escape_html("<a href='x'>"), "&lt;a href=&#x27;x&#x27;&gt;");
/// ```
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Whether a line is blank (empty or whitespace only).
pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
