//! Promotion Fixtures

use rustc_hash::FxHashMap;
use rusty_money::Money;
use serde::Deserialize;

use crate::{
    discounts::Discount,
    fixtures::{
        FixtureError,
        products::{parse_percentage, parse_price},
    },
    promotions::PromoCode,
};

/// Wrapper for promo codes in YAML
#[derive(Debug, Deserialize)]
pub struct PromotionsFixture {
    /// Map of promo code -> promo fixture
    pub codes: FxHashMap<String, PromoFixture>,
}

/// Promo code fixture from YAML
#[derive(Debug, Deserialize)]
pub struct PromoFixture {
    /// Discount configuration
    pub discount: DiscountFixtureConfig,

    /// Minimum subtotal for the discount to apply (e.g., "999.00 INR")
    #[serde(default)]
    pub minimum_subtotal: Option<String>,
}

/// Discount configuration from YAML fixtures
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountFixtureConfig {
    /// Percentage off the subtotal (e.g., "10%" or "0.10")
    Percentage {
        /// Percentage string
        value: String,
    },

    /// Fixed amount off the subtotal (e.g., "200.00 INR")
    AmountOff {
        /// Amount string
        value: String,
    },
}

impl TryFrom<DiscountFixtureConfig> for Discount<'_> {
    type Error = FixtureError;

    fn try_from(config: DiscountFixtureConfig) -> Result<Self, Self::Error> {
        match config {
            DiscountFixtureConfig::Percentage { value } => {
                Ok(Discount::PercentageOff(parse_percentage(&value)?))
            }
            DiscountFixtureConfig::AmountOff { value } => {
                let (minor_units, currency) = parse_price(&value)?;

                Ok(Discount::AmountOff(Money::from_minor(minor_units, currency)))
            }
        }
    }
}

impl PromoFixture {
    /// Convert to a [`PromoCode`] for the given code.
    ///
    /// # Errors
    ///
    /// Returns an error if an amount or percentage cannot be parsed.
    pub fn try_into_promo(self, code: &str) -> Result<PromoCode<'static>, FixtureError> {
        let promo = PromoCode::new(code, Discount::try_from(self.discount)?);

        match self.minimum_subtotal {
            Some(minimum) => {
                let (minor_units, currency) = parse_price(&minimum)?;

                Ok(promo.with_minimum_subtotal(Money::from_minor(minor_units, currency)))
            }
            None => Ok(promo),
        }
    }
}
