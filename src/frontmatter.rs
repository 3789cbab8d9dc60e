//! Front matter parsing from source files.

use crate::error::{Error, Result};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

/// Metadata from a leading `---` YAML block. Empty when the block is absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter(BTreeMap<String, Value>);

impl FrontMatter {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The `template` key, if present. Must be a string.
    pub fn template(&self, path: &Path) -> Result<Option<&str>> {
        match self.0.get("template") {
            None => Ok(None),
            Some(Value::String(name)) => Ok(Some(name.as_str())),
            Some(other) => Err(Error::invalid_front_matter(
                path,
                format!("template must be a string, got {other}"),
            )),
        }
    }

    pub fn title(&self) -> Option<&Value> {
        self.0.get("title")
    }
}

static FRONT_MATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn front_matter_regex() -> &'static Regex {
    FRONT_MATTER_REGEX.get_or_init(|| {
        Regex::new(r"(?s)\A---\n(.*?)\n---\n(.*)\z").expect("front matter regex is valid")
    })
}

/// Split `content` into front matter and body.
///
/// The header must start at the very first byte. Without a header the whole
/// input is the body. `path` is only used for error messages.
pub fn parse_front_matter<'a>(content: &'a str, path: &Path) -> Result<(FrontMatter, &'a str)> {
    let Some(captures) = front_matter_regex().captures(content) else {
        return Ok((FrontMatter::default(), content));
    };

    let yaml = captures.get(1).map_or("", |m| m.as_str());
    let body = captures.get(2).map_or("", |m| m.as_str());

    if yaml.trim().is_empty() {
        return Ok((FrontMatter::default(), body));
    }

    let map: Option<BTreeMap<String, Value>> =
        serde_yaml::from_str(yaml).map_err(|source| Error::FrontMatter {
            path: path.to_path_buf(),
            source,
        })?;

    Ok((FrontMatter(map.unwrap_or_default()), body))
}
