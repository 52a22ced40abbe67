//! sitetree CLI Binary
//!
//! Command-line interface for the sitetree content store.

use clap::Parser;
use sitetree::logging::init_logging;
use sitetree::tooling::cli::{Cli, CliContext};
use std::io;
use std::process;

fn main() {
    let cli = Cli::parse();

    let context = match CliContext::new(cli.root.clone(), cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error loading configuration: {:#}", e);
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(Some(&context.logging_config(&cli))) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut output = stdout.lock();
    if let Err(e) = context.execute(&cli.command, &mut input, &mut output) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
