//! Line-based markdown to HTML conversion.
//!
//! This crate converts a markdown document into HTML with a single forward
//! pass over its lines. Three constructs are recognized and rendered here:
//!
//! - Fenced code blocks, kept byte-for-byte apart from HTML escaping
//! - Pipe tables with per-column `align` attributes
//! - Blockquotes, with fenced code inside them extracted literally
//!
//! Everything else is handed line by line to a [`MarkdownEngine`], by default
//! the pulldown-cmark backed [`CommonMarkEngine`].
//!
//! # Example
//!
//! ```
//! use md2html_renderer::{Converter, RenderOptions};
//!
//! let converter = Converter::new(RenderOptions::default());
//! let html = converter.render_document("# Hello\n\n> quoted", "Hello");
//! assert!(html.contains("<h1>Hello</h1>"));
//! assert!(html.contains("<blockquote>"));
//! ```

mod code;
mod converter;
mod engine;
mod page;
mod parser;
mod quote;
mod table;
mod util;

pub use code::CodeBlock;
pub use converter::Converter;
pub use engine::{CommonMarkEngine, MarkdownEngine, RenderOptions};
pub use page::{PageOptions, render_page};
pub use parser::{Block, parse_blocks};
pub use quote::{QuoteBlock, QuoteLine};
pub use table::{Alignment, Table, TableRow};
pub use util::escape_html;
