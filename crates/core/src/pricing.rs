//! Pricing
//!
//! Money arithmetic for cart lines, plus the tax and delivery policies that a cart is priced
//! under. All arithmetic happens on integer minor units and is checked.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    discounts::{DiscountError, percent_of_minor},
    items::LineItem,
};

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error)]
pub enum PricingError {
    /// An amount did not fit in the minor unit range.
    #[error("amount overflowed minor units")]
    Overflow,

    /// Percentage based amount could not be calculated.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Why a pricing policy cannot be used. Amounts are in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPolicy {
    /// Flat tax below zero
    #[error("flat tax {0} is negative")]
    NegativeTax(i64),

    /// Tax rate outside 0% to 100%
    #[error("tax rate must be between 0% and 100%")]
    RateOutOfRange,

    /// Delivery fee below zero
    #[error("delivery fee {0} is negative")]
    NegativeDeliveryFee(i64),

    /// Free delivery threshold below zero
    #[error("free delivery threshold {0} is negative")]
    NegativeFreeOver(i64),
}

/// Multiply a unit price by a quantity.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the result does not fit in minor units.
pub fn line_total<'a>(
    unit_price: &Money<'a, Currency>,
    quantity: u32,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor = unit_price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, unit_price.currency()))
}

/// Sum of every line's unit price multiplied by its quantity.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: a line total or the running sum overflowed.
/// - [`PricingError::Money`]: a line is priced in a currency other than `currency`.
pub fn subtotal<'a>(
    items: &[LineItem<'a>],
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor = items.iter().try_fold(0_i64, |acc, item| {
        let line = item.total()?;

        if line.currency() != currency {
            return Err(PricingError::Money(MoneyError::CurrencyMismatch {
                expected: currency.iso_alpha_code,
                actual: line.currency().iso_alpha_code,
            }));
        }

        acc.checked_add(line.to_minor_units())
            .ok_or(PricingError::Overflow)
    })?;

    Ok(Money::from_minor(minor, currency))
}

/// How tax is charged on a cart.
#[derive(Debug, Clone, Copy, Default)]
pub enum TaxPolicy<'a> {
    /// No tax line
    #[default]
    None,

    /// A fixed amount per non-empty cart
    Flat(Money<'a, Currency>),

    /// A rate applied to the subtotal, rounded half away from zero
    Rate(Percentage),
}

impl<'a> TaxPolicy<'a> {
    /// Tax owed on the given subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the rate cannot be applied to the subtotal.
    pub fn tax_for(
        &self,
        subtotal: &Money<'a, Currency>,
        empty: bool,
    ) -> Result<Money<'a, Currency>, PricingError> {
        let currency = subtotal.currency();

        if empty {
            return Ok(Money::from_minor(0, currency));
        }

        let minor = match self {
            TaxPolicy::None => 0,
            TaxPolicy::Flat(amount) => amount.to_minor_units(),
            TaxPolicy::Rate(rate) => percent_of_minor(rate, subtotal.to_minor_units())?,
        };

        Ok(Money::from_minor(minor, currency))
    }
}

/// How delivery is charged on a cart.
#[derive(Debug, Clone, Copy)]
pub struct DeliveryPolicy<'a> {
    /// Fee charged on a non-empty cart
    pub fee: Money<'a, Currency>,

    /// Subtotal at or above which delivery is free
    pub free_over: Option<Money<'a, Currency>>,
}

impl<'a> DeliveryPolicy<'a> {
    /// Free delivery in the given currency.
    pub fn free(currency: &'a Currency) -> Self {
        Self {
            fee: Money::from_minor(0, currency),
            free_over: None,
        }
    }

    /// A flat fee with no free-delivery threshold.
    pub fn flat(fee: Money<'a, Currency>) -> Self {
        Self {
            fee,
            free_over: None,
        }
    }

    /// Delivery fee owed for the given subtotal.
    pub fn fee_for(&self, subtotal: &Money<'a, Currency>, empty: bool) -> Money<'a, Currency> {
        let waived = empty
            || self
                .free_over
                .is_some_and(|threshold| subtotal.to_minor_units() >= threshold.to_minor_units());

        if waived {
            Money::from_minor(0, subtotal.currency())
        } else {
            Money::from_minor(self.fee.to_minor_units(), subtotal.currency())
        }
    }
}

/// Tax and delivery configuration a cart is priced under.
#[derive(Debug, Clone, Copy)]
pub struct PricingPolicy<'a> {
    /// Tax policy
    pub tax: TaxPolicy<'a>,

    /// Delivery policy
    pub delivery: DeliveryPolicy<'a>,
}

impl<'a> PricingPolicy<'a> {
    /// No tax and free delivery.
    pub fn untaxed(currency: &'a Currency) -> Self {
        Self {
            tax: TaxPolicy::None,
            delivery: DeliveryPolicy::free(currency),
        }
    }

    /// Amounts in the policy that are not in `currency`, as ISO codes.
    pub(crate) fn foreign_currency(&self, currency: &Currency) -> Option<&'static str> {
        let amounts = [
            match self.tax {
                TaxPolicy::Flat(amount) => Some(amount),
                TaxPolicy::None | TaxPolicy::Rate(_) => None,
            },
            Some(self.delivery.fee),
            self.delivery.free_over,
        ];

        amounts
            .into_iter()
            .flatten()
            .find(|amount| amount.currency() != currency)
            .map(|amount| amount.currency().iso_alpha_code)
    }

    /// Check that the policy can only ever add a non-negative tax and delivery fee.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidPolicy`] describing the first problem found.
    pub fn validate(&self) -> Result<(), InvalidPolicy> {
        match self.tax {
            TaxPolicy::None => {}
            TaxPolicy::Flat(amount) => {
                if amount.to_minor_units() < 0 {
                    return Err(InvalidPolicy::NegativeTax(amount.to_minor_units()));
                }
            }
            TaxPolicy::Rate(rate) => {
                let fraction = rate * Decimal::ONE;

                if fraction < Decimal::ZERO || fraction > Decimal::ONE {
                    return Err(InvalidPolicy::RateOutOfRange);
                }
            }
        }

        if self.delivery.fee.to_minor_units() < 0 {
            return Err(InvalidPolicy::NegativeDeliveryFee(
                self.delivery.fee.to_minor_units(),
            ));
        }

        if let Some(threshold) = self.delivery.free_over
            && threshold.to_minor_units() < 0
        {
            return Err(InvalidPolicy::NegativeFreeOver(threshold.to_minor_units()));
        }

        Ok(())
    }
}
