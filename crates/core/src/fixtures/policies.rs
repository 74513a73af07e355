//! Pricing Policy Fixtures

use rusty_money::Money;
use serde::Deserialize;

use crate::{
    fixtures::{
        FixtureError,
        products::{parse_percentage, parse_price},
    },
    pricing::{DeliveryPolicy, PricingPolicy, TaxPolicy},
};

/// Pricing policy in YAML
#[derive(Debug, Deserialize)]
pub struct PolicyFixture {
    /// Tax configuration
    pub tax: TaxFixtureConfig,

    /// Delivery configuration
    pub delivery: DeliveryFixtureConfig,
}

/// Tax configuration from YAML fixtures
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaxFixtureConfig {
    /// No tax
    None,

    /// Fixed amount per cart (e.g., "25.00 INR")
    Flat {
        /// Amount string
        value: String,
    },

    /// Rate of the subtotal (e.g., "5%")
    Rate {
        /// Percentage string
        value: String,
    },
}

/// Delivery configuration from YAML fixtures
#[derive(Debug, Deserialize)]
pub struct DeliveryFixtureConfig {
    /// Delivery fee (e.g., "40.00 INR")
    pub fee: String,

    /// Subtotal at or above which delivery is free (e.g., "499.00 INR")
    #[serde(default)]
    pub free_over: Option<String>,
}

impl TryFrom<PolicyFixture> for PricingPolicy<'_> {
    type Error = FixtureError;

    fn try_from(fixture: PolicyFixture) -> Result<Self, Self::Error> {
        let tax = match fixture.tax {
            TaxFixtureConfig::None => TaxPolicy::None,
            TaxFixtureConfig::Flat { value } => {
                let (minor_units, currency) = parse_price(&value)?;

                TaxPolicy::Flat(Money::from_minor(minor_units, currency))
            }
            TaxFixtureConfig::Rate { value } => TaxPolicy::Rate(parse_percentage(&value)?),
        };

        let (fee_minor, fee_currency) = parse_price(&fixture.delivery.fee)?;

        let free_over = fixture
            .delivery
            .free_over
            .as_deref()
            .map(parse_price)
            .transpose()?
            .map(|(minor_units, currency)| Money::from_minor(minor_units, currency));

        Ok(PricingPolicy {
            tax,
            delivery: DeliveryPolicy {
                fee: Money::from_minor(fee_minor, fee_currency),
                free_over,
            },
        })
    }
}
