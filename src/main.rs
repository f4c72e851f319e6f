//! `repowatch-tui` binary entry point.
//!
//! Requires a TTY on stdin and stdout (exit code 2 otherwise) and a
//! readable `index.json` style configuration in the working directory
//! (exit code 1 otherwise). Report files and producers are resolved
//! relative to the working directory too.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use repowatch_tui::app;
use repowatch_tui::error::Error;
use repowatch_tui::style::StyleConfig;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let styles = match StyleConfig::load(Path::new("index.json")) {
        Ok(styles) => styles,
        Err(e) => {
            eprintln!("repowatch-tui: {e}");
            return ExitCode::FAILURE;
        }
    };

    match app::run(styles, PathBuf::from(".")) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::NotATty) => {
            eprintln!("repowatch-tui: {}", Error::NotATty);
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("repowatch-tui: {e}");
            ExitCode::FAILURE
        }
    }
}
