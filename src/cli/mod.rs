//! CLI module for mdsite

mod args;

pub use args::Args;

use crate::config::Config;
use crate::error::Result;
use crate::output::{build, ConversionResult};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Run the CLI application
pub fn run() -> ExitCode {
    init_tracing();
    let args = Args::parse_args();

    match execute(args) {
        Ok(result) => {
            println!("{}", result.summary());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load the config, apply CLI overrides and build the site
pub fn execute(args: Args) -> Result<ConversionResult> {
    let mut config = Config::load(&args.config)?;

    let context = args.context_overrides();
    config.merge_cli(args.input_dir, args.output_dir, args.template_dir, context);
    config.validate()?;

    build(&config)
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
