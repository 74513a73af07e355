//! Command line configuration

use clap::Parser;

use crate::config::{
    fixtures::FixtureConfig, logging::LoggingConfig, payment::PaymentConfig,
    session::SessionArgs,
};

pub(crate) mod fixtures;
pub(crate) mod logging;
pub(crate) mod payment;
pub(crate) mod session;

/// Shopfront command line configuration
#[derive(Debug, Parser)]
#[command(
    name = "shopfront",
    about = "Browse the catalog, fill a cart and check out",
    long_about = None
)]
pub struct Config {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Fixture data settings.
    #[command(flatten)]
    pub fixtures: FixtureConfig,

    /// Shopper actions.
    #[command(flatten)]
    pub session: SessionArgs,

    /// Checkout settings.
    #[command(flatten)]
    pub payment: PaymentConfig,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
