//! Discounts
//!
//! Discount rules carried by promo codes, and the percentage arithmetic shared with tax rates.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Why a discount rule cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidDiscount {
    /// A flat amount below zero
    #[error("discount amount {0} is negative")]
    NegativeAmount(i64),

    /// A percentage outside 0% to 100%
    #[error("discount percentage must be between 0% and 100%")]
    PercentageOutOfRange,

    /// A flat amount in another currency (discount currency, cart currency)
    #[error("discount is in {0}, but cart is in {1}")]
    CurrencyMismatch(&'static str, &'static str),
}

/// Discount rule applied to a cart subtotal.
#[derive(Debug, Copy, Clone)]
pub enum Discount<'a> {
    /// Take a percentage off the subtotal (e.g., "10% off")
    PercentageOff(Percentage),

    /// Take a fixed amount off the subtotal (e.g., "₹50 off")
    AmountOff(Money<'a, Currency>),
}

impl<'a> Discount<'a> {
    /// Check the rule can be applied to a cart priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidDiscount`] describing the first problem found.
    pub fn validate(&self, currency: &Currency) -> Result<(), InvalidDiscount> {
        match self {
            Discount::PercentageOff(percent) => {
                let fraction = (*percent) * Decimal::ONE;

                if fraction < Decimal::ZERO || fraction > Decimal::ONE {
                    return Err(InvalidDiscount::PercentageOutOfRange);
                }
            }
            Discount::AmountOff(amount) => {
                if amount.currency() != currency {
                    return Err(InvalidDiscount::CurrencyMismatch(
                        amount.currency().iso_alpha_code,
                        currency.iso_alpha_code,
                    ));
                }

                if amount.to_minor_units() < 0 {
                    return Err(InvalidDiscount::NegativeAmount(amount.to_minor_units()));
                }
            }
        }

        Ok(())
    }

    /// Amount taken off the given subtotal.
    ///
    /// Flat amounts are returned as-is, even when larger than the subtotal; clamping happens on
    /// the cart total.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::PercentConversion`] if the percentage cannot be applied.
    pub fn amount_for(
        &self,
        subtotal: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, DiscountError> {
        let minor = match self {
            Discount::PercentageOff(percent) => percent_of_minor(percent, subtotal.to_minor_units())?,
            Discount::AmountOff(amount) => amount.to_minor_units(),
        };

        Ok(Money::from_minor(minor, subtotal.currency()))
    }
}

/// Calculate the amount in minor units that a percentage represents of another minor unit amount.
///
/// Rounds half away from zero.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows or cannot be safely
/// represented.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage crate doesn't actually expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;

    use decimal_percentage::Percentage;
    use rusty_money::iso::{INR, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn percent_of_minor_overflow_returns_error() {
        let percent = Percentage::from(2.0);
        let result = percent_of_minor(&percent, i64::MAX);

        assert!(matches!(result, Err(DiscountError::PercentConversion)));
    }

    #[test]
    fn percent_of_minor_checked_mul_overflow_returns_error() -> TestResult {
        // 1e20 is representable as a Decimal, but multiplying by a very large minor value should
        // overflow the Decimal range.
        let percent = Percentage::try_from("100000000000000000000")?;
        let result = percent_of_minor(&percent, i64::MAX);

        assert!(matches!(result, Err(DiscountError::PercentConversion)));

        Ok(())
    }

    #[test]
    fn percent_of_minor_calculates_correctly() -> TestResult {
        let percent = Percentage::from(0.25);
        let result = percent_of_minor(&percent, 200)?;

        assert_eq!(result, 50);

        Ok(())
    }

    #[test]
    fn percentage_off_is_taken_from_subtotal() -> TestResult {
        let discount = Discount::PercentageOff(Percentage::from(0.10));

        assert_eq!(
            discount.amount_for(&Money::from_minor(1_000, INR))?,
            Money::from_minor(100, INR)
        );

        Ok(())
    }

    #[test]
    fn amount_off_is_not_capped_by_subtotal() -> TestResult {
        let discount = Discount::AmountOff(Money::from_minor(5_000, INR));

        assert_eq!(
            discount.amount_for(&Money::from_minor(1_000, INR))?,
            Money::from_minor(5_000, INR)
        );

        Ok(())
    }

    #[test]
    fn validate_rejects_out_of_range_percentages() {
        assert_eq!(
            Discount::PercentageOff(Percentage::from(1.5)).validate(INR),
            Err(InvalidDiscount::PercentageOutOfRange)
        );
        assert_eq!(
            Discount::PercentageOff(Percentage::from(-0.1)).validate(INR),
            Err(InvalidDiscount::PercentageOutOfRange)
        );
        assert_eq!(Discount::PercentageOff(Percentage::from(1.0)).validate(INR), Ok(()));
    }

    #[test]
    fn validate_rejects_negative_and_foreign_amounts() {
        assert_eq!(
            Discount::AmountOff(Money::from_minor(-1, INR)).validate(INR),
            Err(InvalidDiscount::NegativeAmount(-1))
        );
        assert_eq!(
            Discount::AmountOff(Money::from_minor(100, USD)).validate(INR),
            Err(InvalidDiscount::CurrencyMismatch("USD", "INR"))
        );
    }
}
