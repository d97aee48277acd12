//! # bz CLI Entry Point
//!
//! The main entry point for the bz command-line tool, a small front end for
//! reading and updating Bugzilla bugs and their pull request links.

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

mod cli;
mod clients;
mod output;

fn main() -> ExitCode {
  let cmd = cli::Cli::parse();

  // Set up tracing based on verbosity level
  let level = match cmd.verbose {
    0 => tracing::Level::WARN,  // Default: warnings and errors
    1 => tracing::Level::INFO,  // -v: info, warnings, and errors
    2 => tracing::Level::DEBUG, // -vv: debug, info, warnings, and errors
    _ => tracing::Level::TRACE, // -vvv or more: trace and everything else
  };

  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(EnvFilter::from_default_env().add_directive(level.into()))
    .init();

  debug!("Tracing initialized with level: {}", level);

  match cli::handle_cli(cmd) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      output::print_error(&format!("{e:#}"));
      ExitCode::FAILURE
    }
  }
}
