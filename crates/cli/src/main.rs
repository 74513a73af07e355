//! Shopfront command line
//!
//! Loads a fixture set, applies the shopper's actions to the seeded cart, prints the category
//! listings and the receipt, and optionally pays through a simulated gateway.

use std::{io, process};

use tracing::error;

use crate::config::Config;

mod config;
mod gateway;
mod listing;
mod observability;
mod shop;
mod theme;

/// Shopfront command line entry point
pub fn main() {
    // Load configuration from .env and CLI arguments
    let config = Config::load().unwrap_or_else(|e| e.exit());

    if let Err(e) = observability::init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("Logging error: {e}");
        }

        process::exit(1);
    }

    let stdout = io::stdout();

    if let Err(e) = shop::run(&config, &mut stdout.lock()) {
        error!("session failed: {e:#}");

        #[expect(
            clippy::print_stderr,
            reason = "the shopper needs to see why the session stopped regardless of log level"
        )]
        {
            eprintln!("Error: {e:#}");
        }

        process::exit(1);
    }
}
