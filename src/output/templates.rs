// Template engine for rendering pages

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use tera::{Context, Tera, Value};
use url::Url;
use walkdir::WalkDir;

/// Template engine wrapping Tera with the `absolute_url` helper
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Load every file under `template_dir`, named by its `/`-separated path
    /// relative to that directory. A missing directory yields no templates.
    /// Files that are not UTF-8 text are skipped.
    pub fn from_dir(template_dir: &Path, base_url: &str) -> Result<Self> {
        let mut templates = Vec::new();

        if template_dir.is_dir() {
            for entry in WalkDir::new(template_dir)
                .follow_links(true)
                .sort_by_file_name()
            {
                let entry = entry?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let name = template_name(template_dir, entry.path());
                match fs::read_to_string(entry.path()) {
                    Ok(text) => templates.push((name, text)),
                    Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                        tracing::warn!(
                            "Skipping non-text file {} in templates",
                            entry.path().display()
                        );
                    }
                    Err(e) => return Err(Error::read(entry.path(), e)),
                }
            }
        } else {
            tracing::warn!(
                "Template directory {} does not exist",
                template_dir.display()
            );
        }

        let mut tera = Tera::default();
        tera.add_raw_templates(templates)?;
        tracing::debug!(
            "Loaded {} templates from {}",
            tera.get_template_names().count(),
            template_dir.display()
        );

        Self::with_tera(tera, base_url)
    }

    /// Create a template engine from in-memory templates
    pub fn from_raw_templates(templates: &[(&str, &str)], base_url: &str) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(templates.to_vec())?;
        Self::with_tera(tera, base_url)
    }

    fn with_tera(mut tera: Tera, base_url: &str) -> Result<Self> {
        // `content` is already HTML
        tera.autoescape_on(vec![]);

        let helper = AbsoluteUrl::new(base_url)?;
        tera.register_filter("absolute_url", helper.clone());
        tera.register_function("absolute_url", helper);

        Ok(Self { tera })
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Render a template with context
    pub fn render(&self, template_name: &str, context: &Context) -> tera::Result<String> {
        self.tera.render(template_name, context)
    }
}

fn template_name(template_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(template_dir).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// `absolute_url` as both a Tera filter and a Tera function
#[derive(Debug, Clone)]
pub struct AbsoluteUrl {
    base: Url,
}

impl AbsoluteUrl {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base: parse_base_url(base_url)?,
        })
    }

    pub fn resolve(&self, path: &str) -> String {
        resolve_against(&self.base, path)
    }
}

impl tera::Filter for AbsoluteUrl {
    fn filter(&self, value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
        let path = value
            .as_str()
            .ok_or_else(|| tera::Error::msg("absolute_url filter expects a string"))?;
        Ok(Value::String(self.resolve(path)))
    }
}

impl tera::Function for AbsoluteUrl {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        let path = args
            .get("path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| tera::Error::msg("absolute_url expects a string `path` argument"))?;
        Ok(Value::String(self.resolve(path)))
    }
}

/// Parse a base URL, assuming `http` when it carries no scheme
pub fn parse_base_url(base_url: &str) -> Result<Url> {
    let invalid = |source: url::ParseError| Error::InvalidBaseUrl {
        url: base_url.to_string(),
        source,
    };
    match Url::parse(base_url) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("http://{}", base_url)).map_err(invalid)
        }
        Err(source) => Err(invalid(source)),
    }
}

/// Join `path` onto the path of `base_url`, keeping scheme, host, query and
/// fragment of the base.
///
/// A leading `/` in `path` is relative to the base path, not the host root.
/// A query or fragment carried by `path` replaces the one of the base.
pub fn absolute_url(base_url: &str, path: &str) -> Result<String> {
    Ok(resolve_against(&parse_base_url(base_url)?, path))
}

fn resolve_against(base: &Url, path: &str) -> String {
    let split = path.find(|c| c == '?' || c == '#').unwrap_or(path.len());
    let (path, suffix) = path.split_at(split);
    let (query, fragment) = match suffix.split_once('#') {
        Some((query, fragment)) => (query, Some(fragment)),
        None => (suffix, None),
    };

    let mut url = base.clone();
    url.set_path(&join_url_path(base.path(), path));
    if let Some(query) = query.strip_prefix('?') {
        url.set_query(Some(query));
    }
    if let Some(fragment) = fragment {
        url.set_fragment(Some(fragment));
    }
    url.to_string()
}

/// Join two URL paths. Empty and `.` segments are dropped, the result is
/// always rooted.
pub fn join_url_path(base: &str, path: &str) -> String {
    let segments: Vec<&str> = base
        .split('/')
        .chain(path.split('/'))
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    format!("/{}", segments.join("/"))
}
