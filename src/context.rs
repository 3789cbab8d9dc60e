//! Template context shared by every page

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Key holding the site's base URL
pub const BASE_URL_KEY: &str = "base_url";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Variables from the `context` section of the config.
///
/// Rendering never mutates this value; each page gets its own copy
/// extended with `content` and `title`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageContext(BTreeMap<String, Value>);

impl PageContext {
    /// A context with no keys at all
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn base_url(&self) -> Option<&Value> {
        self.0.get(BASE_URL_KEY)
    }

    /// Copy into a tera context
    pub fn to_tera(&self) -> tera::Context {
        let mut context = tera::Context::new();
        for (key, value) in &self.0 {
            context.insert(key.as_str(), value);
        }
        context
    }
}

impl Default for PageContext {
    fn default() -> Self {
        let mut context = Self::empty();
        context.insert(BASE_URL_KEY, DEFAULT_BASE_URL);
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_base_url() {
        let context = PageContext::default();
        assert_eq!(
            context.base_url(),
            Some(&Value::String(DEFAULT_BASE_URL.to_string()))
        );
    }

    #[test]
    fn test_to_tera_copies_all_keys() {
        let mut context = PageContext::empty();
        context.insert("site_name", "Docs");
        context.insert("year", 2024);

        let tera_context = context.to_tera();
        assert_eq!(tera_context.get("site_name"), Some(&Value::from("Docs")));
        assert_eq!(tera_context.get("year"), Some(&Value::from(2024)));
    }

    #[test]
    fn test_tera_copy_is_independent() {
        let context = PageContext::default();
        let mut tera_context = context.to_tera();
        tera_context.insert("title", "Page");
        assert!(!context.contains_key("title"));
    }

    #[test]
    fn test_deserialize_from_yaml() {
        let context: PageContext =
            serde_yaml::from_str("base_url: https://example.com\nnav:\n  - home\n").unwrap();
        assert_eq!(
            context.base_url(),
            Some(&Value::from("https://example.com"))
        );
        assert_eq!(context.get("nav"), Some(&serde_json::json!(["home"])));
    }
}
