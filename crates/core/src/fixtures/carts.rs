//! Cart Fixtures

use serde::Deserialize;

/// Wrapper for seed cart lines in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Lines in the order they are added
    pub lines: Vec<CartLineFixture>,
}

/// A seed cart line
#[derive(Debug, Deserialize)]
pub struct CartLineFixture {
    /// Product id reference
    pub product: String,

    /// Units to add
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}
