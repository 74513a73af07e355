//! Promotions
//!
//! Promo codes and the resolvers that turn a code typed at checkout into a discount rule.

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::discounts::{Discount, DiscountError, InvalidDiscount};

/// Reasons a promo code is turned down.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromoRejection {
    /// The resolver does not know the code.
    #[error("unknown code")]
    UnknownCode,

    /// The subtotal is below what the code requires (minimum in minor units).
    #[error("subtotal must be at least {0} minor units")]
    BelowMinimum(i64),

    /// The resolved discount cannot be applied.
    #[error(transparent)]
    InvalidDiscount(#[from] InvalidDiscount),
}

/// Normalise a promo code for case-insensitive comparison.
pub fn normalise_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// A promo code with its discount rule.
#[derive(Debug, Clone)]
pub struct PromoCode<'a> {
    code: String,
    discount: Discount<'a>,
    minimum_subtotal: Option<Money<'a, Currency>>,
}

impl<'a> PromoCode<'a> {
    /// Create a new promo code. The code is stored normalised.
    pub fn new(code: &str, discount: Discount<'a>) -> Self {
        Self {
            code: normalise_code(code),
            discount,
            minimum_subtotal: None,
        }
    }

    /// Only discount while the subtotal is at least `minimum`.
    #[must_use]
    pub fn with_minimum_subtotal(mut self, minimum: Money<'a, Currency>) -> Self {
        self.minimum_subtotal = Some(minimum);
        self
    }

    /// The normalised code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Whether `code` names this promo, ignoring case and surrounding whitespace.
    pub fn matches(&self, code: &str) -> bool {
        self.code == normalise_code(code)
    }

    /// The discount rule.
    pub fn discount(&self) -> &Discount<'a> {
        &self.discount
    }

    /// Minimum subtotal the discount applies from, if any.
    pub fn minimum_subtotal(&self) -> Option<&Money<'a, Currency>> {
        self.minimum_subtotal.as_ref()
    }

    /// Whether the given subtotal meets the minimum.
    pub fn is_active_for(&self, subtotal: &Money<'a, Currency>) -> bool {
        self.minimum_subtotal
            .is_none_or(|minimum| subtotal.to_minor_units() >= minimum.to_minor_units())
    }

    /// Discount for the given subtotal; zero while the minimum is not met.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if a percentage cannot be applied to the subtotal.
    pub fn discount_for(
        &self,
        subtotal: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, DiscountError> {
        if !self.is_active_for(subtotal) {
            return Ok(Money::from_minor(0, subtotal.currency()));
        }

        self.discount.amount_for(subtotal)
    }

    pub(crate) fn validate(&self, currency: &Currency) -> Result<(), PromoRejection> {
        self.discount.validate(currency)?;

        if let Some(minimum) = self.minimum_subtotal
            && minimum.currency() != currency
        {
            return Err(InvalidDiscount::CurrencyMismatch(
                minimum.currency().iso_alpha_code,
                currency.iso_alpha_code,
            )
            .into());
        }

        Ok(())
    }
}

/// Resolves a code typed by the shopper into a promo.
///
/// Implemented for any `Fn(&str, &Money) -> Result<PromoCode, PromoRejection>`, so a remote
/// lookup that has already completed can be passed in as a closure.
pub trait PromoResolver<'a> {
    /// Resolve `code` against the current subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`PromoRejection`] if the code is not accepted.
    fn resolve(
        &self,
        code: &str,
        subtotal: &Money<'a, Currency>,
    ) -> Result<PromoCode<'a>, PromoRejection>;
}

impl<'a, F> PromoResolver<'a> for F
where
    F: Fn(&str, &Money<'a, Currency>) -> Result<PromoCode<'a>, PromoRejection>,
{
    fn resolve(
        &self,
        code: &str,
        subtotal: &Money<'a, Currency>,
    ) -> Result<PromoCode<'a>, PromoRejection> {
        self(code, subtotal)
    }
}

/// A fixed table of promo codes.
#[derive(Debug, Clone, Default)]
pub struct PromoBook<'a> {
    codes: FxHashMap<String, PromoCode<'a>>,
}

impl<'a> PromoBook<'a> {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a promo, replacing any promo with the same code.
    pub fn insert(&mut self, promo: PromoCode<'a>) -> &mut Self {
        self.codes.insert(promo.code.clone(), promo);
        self
    }

    /// Look up a code, ignoring case.
    pub fn get(&self, code: &str) -> Option<&PromoCode<'a>> {
        self.codes.get(&normalise_code(code))
    }

    /// Number of codes in the book.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the book has no codes.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl<'a> PromoResolver<'a> for PromoBook<'a> {
    fn resolve(
        &self,
        code: &str,
        subtotal: &Money<'a, Currency>,
    ) -> Result<PromoCode<'a>, PromoRejection> {
        let promo = self.get(code).ok_or(PromoRejection::UnknownCode)?;

        if let Some(minimum) = promo.minimum_subtotal()
            && !promo.is_active_for(subtotal)
        {
            return Err(PromoRejection::BelowMinimum(minimum.to_minor_units()));
        }

        Ok(promo.clone())
    }
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use super::*;

    fn book<'a>() -> PromoBook<'a> {
        let mut book = PromoBook::new();

        book.insert(PromoCode::new(
            "save10",
            Discount::PercentageOff(Percentage::from(0.10)),
        ))
        .insert(
            PromoCode::new("FLAT200", Discount::AmountOff(Money::from_minor(20_000, INR)))
                .with_minimum_subtotal(Money::from_minor(100_000, INR)),
        );

        book
    }

    #[test]
    fn codes_are_normalised() {
        let promo = PromoCode::new("  save10 ", Discount::PercentageOff(Percentage::from(0.10)));

        assert_eq!(promo.code(), "SAVE10");
        assert!(promo.matches("Save10"));
    }

    #[test]
    fn book_lookup_ignores_case() -> TestResult {
        let book = book();
        let promo = book.resolve("Save10", &Money::from_minor(1_000, INR))?;

        assert_eq!(promo.code(), "SAVE10");
        assert_eq!(book.len(), 2);

        Ok(())
    }

    #[test]
    fn book_rejects_unknown_codes() {
        let result = book().resolve("NOPE", &Money::from_minor(1_000, INR));

        assert!(matches!(result, Err(PromoRejection::UnknownCode)));
    }

    #[test]
    fn book_rejects_codes_below_minimum() {
        let result = book().resolve("flat200", &Money::from_minor(99_999, INR));

        assert_eq!(result.err(), Some(PromoRejection::BelowMinimum(100_000)));
    }

    #[test]
    fn discount_is_zero_below_minimum() -> TestResult {
        let promo = PromoCode::new("FLAT200", Discount::AmountOff(Money::from_minor(20_000, INR)))
            .with_minimum_subtotal(Money::from_minor(100_000, INR));

        assert_eq!(
            promo.discount_for(&Money::from_minor(50_000, INR))?,
            Money::from_minor(0, INR)
        );
        assert_eq!(
            promo.discount_for(&Money::from_minor(100_000, INR))?,
            Money::from_minor(20_000, INR)
        );

        Ok(())
    }

    #[test]
    fn closures_are_resolvers() -> TestResult {
        let resolver = |code: &str, _subtotal: &Money<'_, Currency>| {
            if code.eq_ignore_ascii_case("welcome") {
                Ok(PromoCode::new(code, Discount::AmountOff(Money::from_minor(500, INR))))
            } else {
                Err(PromoRejection::UnknownCode)
            }
        };

        let promo = resolver.resolve("WELCOME", &Money::from_minor(1_000, INR))?;

        assert_eq!(promo.code(), "WELCOME");

        Ok(())
    }
}
