use crate::context::{PageContext, BASE_URL_KEY, DEFAULT_BASE_URL};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Default config file name
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory walked for sources
    pub input_dir: PathBuf,
    /// Directory holding the templates
    pub template_dir: PathBuf,
    /// Directory the site is written to
    pub output_dir: PathBuf,
    /// Variables passed to every template
    pub context: PageContext,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("content"),
            template_dir: PathBuf::from("templates"),
            output_dir: PathBuf::from("output_html"),
            context: PageContext::default(),
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        tracing::info!("Loading configuration from {}", path.display());

        if !path.is_file() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
        let mut config = Self::from_yaml(&contents).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        if !config.context.contains_key(BASE_URL_KEY) {
            config.context.insert(BASE_URL_KEY, DEFAULT_BASE_URL);
        }
        Ok(config)
    }

    /// Parse config text. An empty document yields the defaults.
    fn from_yaml(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Option<Config> = serde_yaml::from_str(contents)?;
        Ok(config.unwrap_or_default())
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(
        &mut self,
        input_dir: Option<PathBuf>,
        output_dir: Option<PathBuf>,
        template_dir: Option<PathBuf>,
        context: Vec<(String, String)>,
    ) {
        if let Some(dir) = input_dir {
            self.input_dir = dir;
        }

        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }

        if let Some(dir) = template_dir {
            self.template_dir = dir;
        }

        for (key, value) in context {
            self.context.insert(key, value);
        }
    }

    /// The configured base URL
    pub fn base_url(&self) -> Result<&str> {
        match self.context.base_url() {
            Some(Value::String(url)) => Ok(url.as_str()),
            Some(_) => Err(Error::config_validation(
                "context.base_url must be a string",
            )),
            None => Err(Error::config_validation("context.base_url is missing")),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.input_dir.as_os_str().is_empty() {
            return Err(Error::config_validation("input_dir must not be empty"));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::config_validation("output_dir must not be empty"));
        }

        crate::output::parse_base_url(self.base_url()?)?;

        Ok(())
    }
}
