//! setconf
//!
//! Changes the value of a key in a configuration file of almost any
//! syntax, leaving the rest of the file untouched.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::Cli;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);
    tracing::debug!(file = %cli.file.display(), "starting");
    commands::execute(&cli)
}
