//! Fixture Config

use std::path::PathBuf;

use clap::Args;

/// Where catalog, promotions, pricing policy and the seed cart are read from.
#[derive(Debug, Args)]
pub struct FixtureConfig {
    /// Fixture set name
    #[arg(short, long, env = "SHOPFRONT_SET", default_value = "default")]
    pub set: String,

    /// Directory holding the `catalog/`, `promotions/`, `policies/` and `carts/` folders.
    /// The default is relative to the workspace root; pass an absolute path when running
    /// from anywhere else.
    #[arg(
        long,
        env = "SHOPFRONT_FIXTURES_DIR",
        default_value = "crates/core/fixtures"
    )]
    pub fixtures_dir: PathBuf,
}
