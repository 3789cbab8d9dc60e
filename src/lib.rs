//! mdsite - Convert a tree of Markdown and templates into a static HTML site
//!
//! Markdown files become pages wrapped in Tera templates, `.jinja2` files
//! are rendered with their suffix dropped, and every other file is copied.

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod frontmatter;
pub mod markdown;
pub mod output;
pub mod paths;

// Re-export main types
pub use config::Config;
pub use context::PageContext;
pub use error::{Error, Result};
pub use frontmatter::{parse_front_matter, FrontMatter};
pub use markdown::MarkdownProcessor;
pub use output::{
    absolute_url, build, ConversionResult, PageRenderer, SourceFile, TemplateEngine, TreeWalker,
};
pub use paths::{map_output_path, OutputAction, PathMapping};
