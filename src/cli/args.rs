//! CLI argument parsing

use crate::config::DEFAULT_CONFIG_PATH;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Convert a tree of Markdown and templates into a static HTML site
#[derive(Parser, Debug)]
#[command(name = "mdsite")]
#[command(about = "Convert a tree of Markdown and templates into a static HTML site")]
pub struct Args {
    /// Path to the config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Path to the input directory
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Path to the output directory
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Path to the directory containing templates
    #[arg(long)]
    pub template_dir: Option<PathBuf>,

    /// Override a context value, e.g. --context base_url https://example.com (can be repeated)
    #[arg(long, num_args = 2, value_names = ["KEY", "VALUE"], action = ArgAction::Append)]
    pub context: Vec<String>,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// `--context` values as (key, value) pairs, in command-line order
    pub fn context_overrides(&self) -> Vec<(String, String)> {
        self.context
            .chunks_exact(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["mdsite"]).unwrap();
        assert_eq!(args.config, PathBuf::from("config.yaml"));
        assert_eq!(args.input_dir, None);
        assert_eq!(args.output_dir, None);
        assert_eq!(args.template_dir, None);
        assert!(args.context_overrides().is_empty());
    }

    #[test]
    fn test_with_options() {
        let args = Args::try_parse_from([
            "mdsite",
            "--config", "site.yaml",
            "--input-dir", "pages",
            "--output-dir", "public",
            "--template-dir", "layouts",
        ])
        .unwrap();

        assert_eq!(args.config, PathBuf::from("site.yaml"));
        assert_eq!(args.input_dir, Some(PathBuf::from("pages")));
        assert_eq!(args.output_dir, Some(PathBuf::from("public")));
        assert_eq!(args.template_dir, Some(PathBuf::from("layouts")));
    }

    #[test]
    fn test_repeated_context() {
        let args = Args::try_parse_from([
            "mdsite",
            "--context", "base_url", "https://example.com",
            "--context", "author", "Sam",
        ])
        .unwrap();

        assert_eq!(
            args.context_overrides(),
            vec![
                ("base_url".to_string(), "https://example.com".to_string()),
                ("author".to_string(), "Sam".to_string()),
            ]
        );
    }

    #[test]
    fn test_context_needs_key_and_value() {
        assert!(Args::try_parse_from(["mdsite", "--context", "base_url"]).is_err());
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Args::try_parse_from(["mdsite", "--watch"]).is_err());
    }
}
