//! Standalone HTML page shell around a rendered body.

use std::fmt::Write;

use crate::util::escape_html;

/// Stylesheet embedded in every page.
const PAGE_CSS: &str = r#"body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
    line-height: 1.6;
    padding: 20px;
    max-width: 800px;
    margin: 0 auto;
}
table {
    border-collapse: separate;
    border-spacing: 0;
    width: 100%;
    margin: 1em 0;
    border: 1px solid #ddd;
}
th, td {
    margin: 0;
    border: 1px solid #ddd;
    padding: 8px;
    white-space: normal;
    overflow-wrap: break-word;
}
th {
    background-color: #f8f9fa;
    font-weight: bold;
    border-bottom: 2px solid #ddd;
}
tr:nth-child(even) {
    background-color: #f8f9fa;
}
td + td, th + th {
    border-left: 1px solid #ddd;
}
tr + tr td {
    border-top: 1px solid #ddd;
}
[align="left"] {
    text-align: left;
}
[align="center"] {
    text-align: center;
}
[align="right"] {
    text-align: right;
}
blockquote {
    margin: 1em 0;
    padding: 0.5em 1em;
    border-left: 4px solid #ddd;
    background-color: #f9f9f9;
}
blockquote > :first-child {
    margin-top: 0;
}
blockquote > :last-child {
    margin-bottom: 0;
}
blockquote pre {
    background-color: #f0f0f0;
    margin: 0.5em 0;
}
blockquote table {
    margin: 0.5em 0;
    background-color: #fff;
}
pre {
    background-color: #f5f5f5;
    border: 1px solid #ddd;
    border-radius: 4px;
    padding: 1em;
    margin: 1em 0;
    overflow-x: auto;
    white-space: pre;
    word-wrap: normal;
}
pre code {
    background: none;
    border: none;
    padding: 0;
    margin: 0;
    font-family: "SFMono-Regular", Consolas, "Liberation Mono", Menlo, Courier, monospace;
    font-size: 0.9em;
    line-height: 1.4;
    tab-size: 4;
    -moz-tab-size: 4;
}
img {
    max-width: 100%;
    height: auto;
    display: block;
    margin: 1em auto;
    border-radius: 4px;
    box-shadow: 0 2px 4px rgba(0,0,0,0.1);
}
.image-container {
    text-align: center;
    margin: 1em 0;
}
.image-container img {
    margin: 0 auto;
}
.image-caption {
    color: #666;
    font-size: 0.9em;
    margin-top: 0.5em;
    text-align: center;
}
"#;

/// highlight.js CDN base.
const HIGHLIGHT_CDN: &str = "https://cdnjs.cloudflare.com/ajax/libs/highlight.js";

/// Page shell settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageOptions {
    /// highlight.js release served from the CDN.
    pub highlight_version: String,
    /// highlight.js stylesheet name (e.g., "default", "github").
    pub highlight_theme: String,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            highlight_version: "11.9.0".to_owned(),
            highlight_theme: "default".to_owned(),
        }
    }
}

/// Render a complete HTML document around `body`.
///
/// `title` is escaped; `body` is inserted as-is.
pub fn render_page(title: &str, body: &str, options: &PageOptions) -> String {
    let mut html = String::with_capacity(body.len() + PAGE_CSS.len() + 1024);
    let base = format!("{HIGHLIGHT_CDN}/{}", options.highlight_version);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
    );
    let _ = writeln!(html, "<title>{}</title>", escape_html(title));
    let _ = writeln!(
        html,
        "<link rel=\"stylesheet\" href=\"{base}/styles/{}.min.css\">",
        escape_html(&options.highlight_theme)
    );
    let _ = writeln!(html, "<script src=\"{base}/highlight.min.js\"></script>");
    html.push_str("<script>hljs.highlightAll();</script>\n");
    html.push_str("<style>\n");
    html.push_str(PAGE_CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");
    html.push_str(body);
    html.push_str("\n</body>\n</html>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_page_structure() {
        let html = render_page("Notes", "<p>hi</p>", &PageOptions::default());

        assert!(html.starts_with("<!DOCTYPE html>\n<html>\n<head>\n"));
        assert!(html.contains("<title>Notes</title>"));
        assert!(html.contains("<body>\n<p>hi</p>\n</body>"));
        assert!(html.ends_with("</html>"));
    }

    #[test]
    fn test_render_page_highlight_assets() {
        let options = PageOptions {
            highlight_version: "11.10.0".to_owned(),
            highlight_theme: "github".to_owned(),
        };
        let html = render_page("t", "", &options);

        assert!(html.contains(
            r#"href="https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.10.0/styles/github.min.css""#
        ));
        assert!(html.contains(
            r#"src="https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.10.0/highlight.min.js""#
        ));
        assert!(html.contains("hljs.highlightAll();"));
    }

    #[test]
    fn test_render_page_escapes_title() {
        let html = render_page("<a & b>", "", &PageOptions::default());
        assert!(html.contains("<title>&lt;a &amp; b&gt;</title>"));
    }

    #[test]
    fn test_render_page_styles_alignment() {
        let html = render_page("t", "", &PageOptions::default());
        assert!(html.contains("[align=\"right\"]"));
        assert!(html.contains("blockquote pre"));
    }

    #[test]
    fn test_render_page_styles_cell_borders_and_images() {
        let html = render_page("t", "", &PageOptions::default());
        assert!(html.contains("td + td, th + th {"));
        assert!(html.contains("tr + tr td {"));
        assert!(html.contains("-moz-tab-size: 4;"));
        assert!(html.contains(".image-container img {"));
        assert!(html.contains(".image-caption {"));
    }
}
