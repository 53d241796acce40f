//! Retrace - shell history retrieval with per-command output traces
//!
//! This is the main entry point for the Retrace command-line application.
//! It initializes the application and handles errors gracefully.

use retrace::cli;
use retrace::error::Result;
use std::process;
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    // Initialize tracing based on RUST_LOG environment variable
    // Default to "info" if not set
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Run the application and handle errors
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    cli::run()
}
