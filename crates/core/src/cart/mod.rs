//! Cart
//!
//! The cart holds product lines in insertion order, unique by product id, and prices itself on
//! demand. Nothing derived is stored: subtotal, tax, delivery, discount and total are computed
//! from the current lines every time [`Cart::compute_summary`] is called, so an applied promo
//! always tracks the live subtotal.

use std::num::NonZeroU32;

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    items::{LineItem, NewLineItem},
    pricing::{self, InvalidPolicy, PricingError, PricingPolicy},
    products::ProductId,
    promotions::{PromoCode, PromoRejection, PromoResolver, normalise_code},
};

mod summary;

pub use summary::{CartSnapshot, CartSummary};

/// Invalid input to a cart operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// Unit price below zero (minor units).
    #[error("unit price {0} is negative")]
    NegativePrice(i64),

    /// Zero units requested.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// Quantity of a line would exceed `u32::MAX`.
    #[error("quantity of {0} would overflow")]
    QuantityOverflow(ProductId),

    /// An amount's currency differs from the cart currency (amount currency, cart currency).
    #[error("amount has currency {0}, but cart has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// The pricing policy would charge a negative tax or delivery fee.
    #[error(transparent)]
    InvalidPolicy(#[from] InvalidPolicy),
}

/// Errors returned by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The operation was called with invalid input.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ArgumentError),

    /// No line for the product.
    #[error("product {0} is not in the cart")]
    NotFound(ProductId),

    /// The promo code was rejected; the cart is unchanged.
    #[error("promo code {code} rejected: {reason}")]
    InvalidPromo {
        /// Normalised code
        code: String,

        /// Why it was rejected
        reason: PromoRejection,
    },

    /// Pricing arithmetic failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Shopping cart
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    items: Vec<LineItem<'a>>,
    applied_promo: Option<PromoCode<'a>>,
    policy: PricingPolicy<'a>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create an empty cart with no tax and free delivery.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            applied_promo: None,
            policy: PricingPolicy::untaxed(currency),
            currency,
        }
    }

    /// Create an empty cart priced under the given policy.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::CurrencyMismatch`] if an amount in the policy is not in `currency`,
    /// or [`ArgumentError::InvalidPolicy`] if it has a negative amount or a rate outside 0% to
    /// 100%.
    pub fn with_policy(
        currency: &'static Currency,
        policy: PricingPolicy<'a>,
    ) -> Result<Self, CartError> {
        if let Some(foreign) = policy.foreign_currency(currency) {
            return Err(ArgumentError::CurrencyMismatch(foreign, currency.iso_alpha_code).into());
        }

        policy.validate().map_err(ArgumentError::from)?;

        Ok(Cart {
            items: Vec::new(),
            applied_promo: None,
            policy,
            currency,
        })
    }

    /// Create a cart pre-seeded with the given lines, merged as if added one by one.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the policy or any line is invalid.
    pub fn with_items(
        items: impl IntoIterator<Item = NewLineItem<'a>>,
        currency: &'static Currency,
        policy: PricingPolicy<'a>,
    ) -> Result<Self, CartError> {
        let mut cart = Self::with_policy(currency, policy)?;

        for item in items {
            cart.add_item(item)?;
        }

        Ok(cart)
    }

    /// Add units of a product.
    ///
    /// A product already in the cart has its quantity increased and keeps the name and price it
    /// was first added with. A new product is appended to the end of the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidArgument`] if the price is negative or in another currency,
    /// the quantity is zero, or the merged quantity overflows.
    pub fn add_item(&mut self, item: NewLineItem<'a>) -> Result<&mut Self, CartError> {
        let price_minor = item.unit_price.to_minor_units();

        if price_minor < 0 {
            return Err(ArgumentError::NegativePrice(price_minor).into());
        }

        if item.unit_price.currency() != self.currency {
            return Err(ArgumentError::CurrencyMismatch(
                item.unit_price.currency().iso_alpha_code,
                self.currency.iso_alpha_code,
            )
            .into());
        }

        let quantity = NonZeroU32::new(item.quantity).ok_or(ArgumentError::ZeroQuantity)?;

        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.product() == &item.product)
        {
            let merged = line
                .quantity()
                .checked_add(quantity.get())
                .and_then(NonZeroU32::new)
                .ok_or_else(|| ArgumentError::QuantityOverflow(item.product.clone()))?;

            line.set_quantity(merged);

            debug!(product = %item.product, quantity = merged.get(), "increased cart line");
        } else {
            debug!(product = %item.product, quantity = quantity.get(), "added cart line");

            self.items.push(LineItem::new(
                item.product,
                item.name,
                item.unit_price,
                quantity,
                item.sold_by,
            ));
        }

        Ok(self)
    }

    /// Remove the line for a product. Removing a product that is not in the cart does nothing.
    pub fn remove_item(&mut self, product: &str) -> &mut Self {
        let before = self.items.len();

        self.items.retain(|line| line.product().as_str() != product);

        if self.items.len() != before {
            debug!(product, "removed cart line");
        }

        self
    }

    /// Set the quantity of a line. Quantities below 1 are clamped to 1; use
    /// [`Cart::remove_item`] to drop a line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotFound`] if the product is not in the cart.
    pub fn set_quantity(&mut self, product: &str, quantity: u32) -> Result<&mut Self, CartError> {
        let quantity = NonZeroU32::new(quantity).unwrap_or(NonZeroU32::MIN);

        self.line_mut(product)?.set_quantity(quantity);

        debug!(product, quantity = quantity.get(), "set cart line quantity");

        Ok(self)
    }

    /// Add one unit to a line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotFound`] if the product is not in the cart, or
    /// [`ArgumentError::QuantityOverflow`] if the line is already at `u32::MAX`.
    pub fn increase_quantity(&mut self, product: &str) -> Result<&mut Self, CartError> {
        let line = self.line_mut(product)?;

        let quantity = line
            .quantity()
            .checked_add(1)
            .and_then(NonZeroU32::new)
            .ok_or_else(|| ArgumentError::QuantityOverflow(line.product().clone()))?;

        line.set_quantity(quantity);

        Ok(self)
    }

    /// Take one unit off a line, never going below 1.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotFound`] if the product is not in the cart.
    pub fn decrease_quantity(&mut self, product: &str) -> Result<&mut Self, CartError> {
        let line = self.line_mut(product)?;

        let quantity = NonZeroU32::new(line.quantity().saturating_sub(1)).unwrap_or(NonZeroU32::MIN);

        line.set_quantity(quantity);

        Ok(self)
    }

    /// Resolve and apply a promo code, replacing any promo already applied.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidPromo`] if the resolver rejects the code or the discount it
    /// resolves to cannot be applied to this cart. The cart is unchanged on error.
    pub fn apply_promo<R>(&mut self, code: &str, resolver: &R) -> Result<&mut Self, CartError>
    where
        R: PromoResolver<'a> + ?Sized,
    {
        let subtotal = self.subtotal()?;

        let promo = resolver
            .resolve(code, &subtotal)
            .and_then(|promo| promo.validate(self.currency).map(|()| promo))
            .map_err(|reason| CartError::InvalidPromo {
                code: normalise_code(code),
                reason,
            })?;

        debug!(code = promo.code(), "applied promo");

        self.applied_promo = Some(promo);

        Ok(self)
    }

    /// Remove the applied promo, if any.
    pub fn clear_promo(&mut self) -> &mut Self {
        if let Some(promo) = self.applied_promo.take() {
            debug!(code = promo.code(), "cleared promo");
        }

        self
    }

    /// Remove every line and the applied promo.
    pub fn clear(&mut self) -> &mut Self {
        self.items.clear();
        self.applied_promo = None;
        self
    }

    /// Sum of unit price × quantity over every line.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the sum overflows.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, PricingError> {
        pricing::subtotal(&self.items, self.currency)
    }

    /// Compute the price breakdown of the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Pricing`] if any amount overflows minor units.
    pub fn compute_summary(&self) -> Result<CartSummary<'a>, CartError> {
        let empty = self.is_empty();
        let subtotal = self.subtotal()?;
        let tax = self.policy.tax.tax_for(&subtotal, empty)?;
        let delivery_fee = self.policy.delivery.fee_for(&subtotal, empty);

        let discount = match &self.applied_promo {
            Some(promo) => promo
                .discount_for(&subtotal)
                .map_err(PricingError::from)?,
            None => Money::from_minor(0, self.currency),
        };

        let total = subtotal
            .to_minor_units()
            .checked_add(tax.to_minor_units())
            .and_then(|gross| gross.checked_add(delivery_fee.to_minor_units()))
            .and_then(|gross| gross.checked_sub(discount.to_minor_units()))
            .ok_or(PricingError::Overflow)?
            .max(0);

        Ok(CartSummary {
            subtotal,
            tax,
            delivery_fee,
            discount,
            total: Money::from_minor(total, self.currency),
            item_count: self.item_count(),
        })
    }

    /// Capture the lines and their summary for checkout.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Pricing`] if the summary cannot be computed.
    pub fn snapshot(&self) -> Result<CartSnapshot<'a>, CartError> {
        Ok(CartSnapshot {
            items: self.items.clone(),
            summary: self.compute_summary()?,
            promo_code: self
                .applied_promo
                .as_ref()
                .map(|promo| promo.code().to_string()),
        })
    }

    /// Get the line for a product.
    pub fn get(&self, product: &str) -> Option<&LineItem<'a>> {
        self.items
            .iter()
            .find(|line| line.product().as_str() == product)
    }

    /// Lines in display order.
    pub fn items(&self) -> &[LineItem<'a>] {
        &self.items
    }

    /// Sum of quantities over every line.
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|line| u64::from(line.quantity()))
            .sum()
    }

    /// Number of lines in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The applied promo, if any.
    pub fn applied_promo(&self) -> Option<&PromoCode<'a>> {
        self.applied_promo.as_ref()
    }

    /// The policy the cart is priced under.
    pub fn policy(&self) -> &PricingPolicy<'a> {
        &self.policy
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn line_mut(&mut self, product: &str) -> Result<&mut LineItem<'a>, CartError> {
        self.items
            .iter_mut()
            .find(|line| line.product().as_str() == product)
            .ok_or_else(|| CartError::NotFound(ProductId::from(product)))
    }
}
