//! Document assembly: blocks to HTML body to full page.

use crate::engine::{CommonMarkEngine, MarkdownEngine, RenderOptions};
use crate::page::{PageOptions, render_page};
use crate::parser::parse_blocks;

/// Markdown to HTML converter.
///
/// Holds only configuration, so one converter can serve many documents,
/// including from several threads at once.
///
/// # Example
///
/// ```
/// use md2html_renderer::Converter;
///
/// let converter = Converter::default();
/// let body = converter.render_body("| a | b |\n|:---|---:|\n| 1 | 2 |");
/// assert!(body.contains(r#"<th align="right">b</th>"#));
/// ```
#[derive(Clone, Debug)]
pub struct Converter<E = CommonMarkEngine> {
    engine: E,
    page: PageOptions,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl Converter {
    /// Create a converter backed by pulldown-cmark with the given flags.
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self::with_engine(CommonMarkEngine::new(options))
    }
}

impl<E: MarkdownEngine> Converter<E> {
    /// Create a converter with a custom markdown engine.
    #[must_use]
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine,
            page: PageOptions::default(),
        }
    }

    /// Set page shell options used by [`render_document`](Self::render_document).
    #[must_use]
    pub fn with_page_options(mut self, page: PageOptions) -> Self {
        self.page = page;
        self
    }

    /// Render the HTML body: one fragment per block, joined by newlines.
    pub fn render_body(&self, markdown: &str) -> String {
        let blocks = parse_blocks(markdown);
        let mut out = String::with_capacity(markdown.len() * 2);
        for (index, block) in blocks.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            block.render(&self.engine, &mut out);
        }
        tracing::debug!(blocks = blocks.len(), "Rendered markdown body");
        out
    }

    /// Render a complete HTML document with the page shell.
    pub fn render_document(&self, markdown: &str, title: &str) -> String {
        render_page(title, &self.render_body(markdown), &self.page)
    }
}
