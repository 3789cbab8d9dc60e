use std::path::PathBuf;
use thiserror::Error;

/// mdsite error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Invalid base_url '{url}': {source}")]
    InvalidBaseUrl { url: String, source: url::ParseError },

    #[error("Invalid front matter in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid front matter in {path}: {message}")]
    InvalidFrontMatter { path: PathBuf, message: String },

    #[error("Template not found: {name} (requested by {page})")]
    TemplateNotFound { name: String, page: PathBuf },

    #[error("Template error while rendering {page}: {source}")]
    Template { page: PathBuf, source: tera::Error },

    #[error("Failed to load templates: {0}")]
    TemplateLoad(#[from] tera::Error),

    #[error("Input directory not found: {0}")]
    InputDirNotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

/// Result type alias for mdsite operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create an invalid front matter error
    pub fn invalid_front_matter(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::InvalidFrontMatter {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_display() {
        let err = Error::ConfigNotFound(PathBuf::from("config.yaml"));
        assert_eq!(err.to_string(), "Config file not found: config.yaml");
    }

    #[test]
    fn test_config_validation_display() {
        let err = Error::config_validation("context.base_url must be a string");
        assert_eq!(
            err.to_string(),
            "Config validation error: context.base_url must be a string"
        );
    }

    #[test]
    fn test_template_not_found_names_page() {
        let err = Error::TemplateNotFound {
            name: "post.html".to_string(),
            page: PathBuf::from("content/blog.md"),
        };
        let msg = err.to_string();
        assert!(msg.contains("post.html"));
        assert!(msg.contains("content/blog.md"));
    }

    #[test]
    fn test_invalid_front_matter_display() {
        let err = Error::invalid_front_matter("about.md", "template must be a string");
        assert_eq!(
            err.to_string(),
            "Invalid front matter in about.md: template must be a string"
        );
    }

    #[test]
    fn test_copy_error_names_both_paths() {
        let err = Error::Copy {
            from: PathBuf::from("content/style.css"),
            to: PathBuf::from("out/style.css"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to copy content/style.css to out/style.css: gone"
        );
    }

    #[test]
    fn test_read_error_names_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::read("content/secret.md", io_err);
        assert!(err.to_string().contains("content/secret.md"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
