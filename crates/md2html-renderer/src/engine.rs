//! Markdown engine for everything the block parser does not handle itself.

use pulldown_cmark::{Options, Parser, html};

/// Renders a fragment of `CommonMark` text to HTML.
///
/// The block parser calls this for plain lines and for blockquote interiors.
/// Any closure `Fn(&str) -> String` is an engine too, which keeps tests free
/// of a real markdown implementation.
pub trait MarkdownEngine {
    /// Render `markdown` to an HTML string.
    fn render(&self, markdown: &str) -> String;
}

impl<F> MarkdownEngine for F
where
    F: Fn(&str) -> String,
{
    fn render(&self, markdown: &str) -> String {
        self(markdown)
    }
}

/// Parser flags for the `CommonMark` engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// GitHub Flavored Markdown: tables, strikethrough, task lists, alerts.
    ///
    /// Tables must stay enabled for tables nested in blockquotes to render.
    pub gfm: bool,
    /// Typographic quotes and dashes.
    pub smart_punctuation: bool,
    /// `{#id .class}` attributes on headings.
    pub heading_attributes: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            smart_punctuation: false,
            heading_attributes: true,
        }
    }
}

impl RenderOptions {
    /// Translate into pulldown-cmark parser options.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.gfm {
            options |= Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM;
        }
        if self.smart_punctuation {
            options |= Options::ENABLE_SMART_PUNCTUATION;
        }
        if self.heading_attributes {
            options |= Options::ENABLE_HEADING_ATTRIBUTES;
        }
        options
    }
}

/// pulldown-cmark backed engine.
#[derive(Clone, Debug, Default)]
pub struct CommonMarkEngine {
    options: RenderOptions,
}

impl CommonMarkEngine {
    /// Create an engine with the given parser flags.
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl MarkdownEngine for CommonMarkEngine {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options.parser_options());
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        let len = out.trim_end_matches('\n').len();
        out.truncate(len);
        out
    }
}
