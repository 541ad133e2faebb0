//! rsub CLI - fetch remote text documents and rewrite them.
//!
//! Fetches every `-url` in order, replaces each occurrence of
//! `-convert-search-word` with `-convert-replace-word`, and prints the
//! result to stdout (one document per line) or to `-out-file`.

mod cli;
mod error;
mod output;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use cli::Cli;
use output::Output;

fn main() -> ExitCode {
    let cli = Cli::parse_args(std::env::args_os());
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to ERROR
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.execute(&output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.error(&format!("Error: {}", err.report()));
            err.exit_code()
        }
    }
}
