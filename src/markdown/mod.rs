//! Markdown to HTML conversion.
//!
//! The body is parsed into a `pulldown-cmark` event stream, passed through
//! the transformers below, then serialized to an HTML fragment.

pub mod attributes;
pub mod links;
pub mod toc;

use pulldown_cmark::{html, Event, Options, Parser};

pub use attributes::AttributeListTransformer;
pub use links::{strip_md_extension, LinkRewriter};
pub use toc::{slugify, TocTransformer};

/// Markdown processor with tables, TOC, attribute lists and `.md` link rewriting
pub struct MarkdownProcessor {
    options: Options,
}

impl MarkdownProcessor {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self { options }
    }

    /// Convert a Markdown body to an HTML fragment
    pub fn convert(&self, markdown: &str) -> String {
        let events: Vec<Event<'_>> = Parser::new_ext(markdown, self.options).collect();

        // Links before attribute lists, which may turn a link into raw HTML.
        // Attribute lists before the TOC so explicit ids win.
        let events = LinkRewriter::new().transform(events);
        let events = AttributeListTransformer::new().transform(events);
        let events = TocTransformer::new().transform(events);

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }
}

impl Default for MarkdownProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape HTML special characters
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
