//! Command line driver for the Bezy editing engine.
//!
//! The enjoyment of one's tools is an essential ingredient of successful work.
//! — Donald Knuth

use bezy_core::core;
use clap::Parser;

fn main() {
    let cli_args = core::cli::CliArgs::parse();
    if let Err(error) = core::runner::run_app(cli_args) {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}
