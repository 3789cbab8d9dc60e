use std::process::ExitCode;

fn main() -> ExitCode {
    mdsite::cli::run()
}
