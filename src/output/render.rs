// Page renderer
//
// Turns a source file into a finished HTML document: front matter is split
// off, the body converted from Markdown, and the result wrapped in a template.

use crate::config::Config;
use crate::context::PageContext;
use crate::error::{Error, Result};
use crate::frontmatter::{parse_front_matter, FrontMatter};
use crate::markdown::MarkdownProcessor;
use crate::output::templates::TemplateEngine;
use std::fs;
use std::path::Path;

/// Template used when the front matter names none
pub const DEFAULT_TEMPLATE: &str = "base.html";

/// Renders pages through Markdown and a template
pub struct PageRenderer {
    templates: TemplateEngine,
    markdown: MarkdownProcessor,
}

impl PageRenderer {
    pub fn new(templates: TemplateEngine) -> Self {
        Self {
            templates,
            markdown: MarkdownProcessor::new(),
        }
    }

    /// Load templates from the configured directory
    pub fn from_config(config: &Config) -> Result<Self> {
        let templates = TemplateEngine::from_dir(&config.template_dir, config.base_url()?)?;
        Ok(Self::new(templates))
    }

    /// Render a page body to a full HTML document.
    ///
    /// `source` names the page in errors and provides the fallback title.
    /// `context` is copied, never modified.
    pub fn render_page(
        &self,
        source: &Path,
        front_matter: &FrontMatter,
        body: &str,
        context: &PageContext,
    ) -> Result<String> {
        let template = front_matter.template(source)?.unwrap_or(DEFAULT_TEMPLATE);
        if !self.templates.has_template(template) {
            return Err(Error::TemplateNotFound {
                name: template.to_string(),
                page: source.to_path_buf(),
            });
        }

        let content = self.markdown.convert(body);

        let mut tera_context = context.to_tera();
        tera_context.insert("content", &content);
        match front_matter.title() {
            Some(title) => tera_context.insert("title", title),
            None => {
                let file_name = source
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                tera_context.insert("title", &title_from_filename(&file_name));
            }
        }

        self.templates
            .render(template, &tera_context)
            .map_err(|source_err| Error::Template {
                page: source.to_path_buf(),
                source: source_err,
            })
    }

    /// Read `input`, render it and write the document to `output`
    pub fn render_file(&self, input: &Path, output: &Path, context: &PageContext) -> Result<()> {
        let text = fs::read_to_string(input).map_err(|e| Error::read(input, e))?;
        let (front_matter, body) = parse_front_matter(&text, input)?;
        let html = self.render_page(input, &front_matter, body, context)?;

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::write(parent, e))?;
        }
        fs::write(output, html).map_err(|e| Error::write(output, e))?;

        Ok(())
    }
}

/// Page title derived from a file name: a trailing `.md` is dropped
pub fn title_from_filename(file_name: &str) -> String {
    file_name
        .strip_suffix(".md")
        .unwrap_or(file_name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BASE: &str = "<title>{{ title }}</title><main>{{ content }}</main>";

    fn renderer() -> PageRenderer {
        let templates = TemplateEngine::from_raw_templates(
            &[
                ("base.html", BASE),
                ("post.html", "<article data-site=\"{{ site }}\">{{ title }}|{{ content }}</article>"),
            ],
            "http://localhost:8000",
        )
        .unwrap();
        PageRenderer::new(templates)
    }

    fn render(path: &str, text: &str, context: &PageContext) -> Result<String> {
        let (fm, body) = parse_front_matter(text, Path::new(path))?;
        renderer().render_page(Path::new(path), &fm, body, context)
    }

    #[test]
    fn test_title_from_filename() {
        assert_eq!(title_from_filename("about.md"), "about");
        assert_eq!(title_from_filename("index.md"), "index");
        assert_eq!(title_from_filename("feed.xml.jinja2"), "feed.xml.jinja2");
        assert_eq!(title_from_filename("notes.md.bak"), "notes.md.bak");
    }

    #[test]
    fn test_front_matter_title() {
        let html = render("hello.md", "---\ntitle: Hello\n---\nBody", &PageContext::default()).unwrap();
        assert_eq!(html, "<title>Hello</title><main><p>Body</p>\n</main>");
    }

    #[test]
    fn test_title_falls_back_to_file_name() {
        let html = render("content/about.md", "Just text", &PageContext::default()).unwrap();
        assert!(html.starts_with("<title>about</title>"));
    }

    #[test]
    fn test_template_from_front_matter_and_context() {
        let mut context = PageContext::default();
        context.insert("site", "Docs");
        let html = render(
            "post.md",
            "---\ntemplate: post.html\ntitle: Post\n---\n[next](next.md)",
            &context,
        )
        .unwrap();
        assert_eq!(
            html,
            "<article data-site=\"Docs\">Post|<p><a href=\"next\">next</a></p>\n</article>"
        );
    }

    #[test]
    fn test_caller_context_not_mutated() {
        let context = PageContext::default();
        let before = context.clone();
        render("a.md", "---\ntitle: A\n---\nBody", &context).unwrap();
        assert_eq!(context, before);
        assert!(!context.contains_key("content"));
        assert!(!context.contains_key("title"));
    }

    #[test]
    fn test_unknown_template() {
        let err = render("a.md", "---\ntemplate: missing.html\n---\nBody", &PageContext::default())
            .unwrap_err();
        match err {
            Error::TemplateNotFound { name, page } => {
                assert_eq!(name, "missing.html");
                assert_eq!(page, Path::new("a.md"));
            }
            other => panic!("Expected TemplateNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_undefined_variable_is_template_error() {
        let templates = TemplateEngine::from_raw_templates(
            &[("base.html", "{{ nope }}")],
            "http://localhost:8000",
        )
        .unwrap();
        let renderer = PageRenderer::new(templates);
        let err = renderer
            .render_page(Path::new("a.md"), &FrontMatter::default(), "", &PageContext::default())
            .unwrap_err();
        assert!(matches!(err, Error::Template { .. }));
    }

    #[test]
    fn test_render_file_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("guide.md");
        std::fs::write(&input, "# Guide\n").unwrap();
        let output = dir.path().join("out/guide/index.html");

        renderer()
            .render_file(&input, &output, &PageContext::default())
            .unwrap();

        let html = std::fs::read_to_string(&output).unwrap();
        assert!(html.contains("<title>guide</title>"));
        assert!(html.contains("<h1 id=\"guide\">Guide</h1>"));
    }

    #[test]
    fn test_render_file_missing_input() {
        let dir = TempDir::new().unwrap();
        let err = renderer()
            .render_file(
                &dir.path().join("missing.md"),
                &dir.path().join("out.html"),
                &PageContext::default(),
            )
            .unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}
