//! Items

use std::num::NonZeroU32;

use rusty_money::{Money, iso::Currency};

use crate::{
    pricing::{PricingError, line_total},
    products::ProductId,
};

/// A product line held in a cart.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem<'a> {
    product: ProductId,
    name: String,
    unit_price: Money<'a, Currency>,
    quantity: NonZeroU32,
    sold_by: String,
}

impl<'a> LineItem<'a> {
    pub(crate) fn new(
        product: ProductId,
        name: String,
        unit_price: Money<'a, Currency>,
        quantity: NonZeroU32,
        sold_by: String,
    ) -> Self {
        Self {
            product,
            name,
            unit_price,
            quantity,
            sold_by,
        }
    }

    /// Returns the product id of the line.
    pub fn product(&self) -> &ProductId {
        &self.product
    }

    /// Returns the display name of the line.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the price of a single unit.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Returns the quantity, which is never below 1.
    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// Returns who sells the product.
    pub fn sold_by(&self) -> &str {
        &self.sold_by
    }

    /// Unit price multiplied by quantity.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError::Overflow`] if the line total does not fit in minor units.
    pub fn total(&self) -> Result<Money<'a, Currency>, PricingError> {
        line_total(&self.unit_price, self.quantity.get())
    }

    pub(crate) fn set_quantity(&mut self, quantity: NonZeroU32) {
        self.quantity = quantity;
    }
}

/// A request to add a product to a cart.
///
/// Quantity defaults to 1 and is validated by [`Cart::add_item`](crate::cart::Cart::add_item).
#[derive(Clone, Debug, PartialEq)]
pub struct NewLineItem<'a> {
    /// Product being added
    pub product: ProductId,

    /// Display name
    pub name: String,

    /// Price of a single unit
    pub unit_price: Money<'a, Currency>,

    /// Number of units to add
    pub quantity: u32,

    /// Seller shown next to the line
    pub sold_by: String,
}

impl<'a> NewLineItem<'a> {
    /// Create a request for a single unit of a product.
    pub fn new(
        product: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: Money<'a, Currency>,
    ) -> Self {
        Self {
            product: product.into(),
            name: name.into(),
            unit_price,
            quantity: 1,
            sold_by: String::new(),
        }
    }

    /// Set the number of units to add.
    #[must_use]
    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Set the seller.
    #[must_use]
    pub fn sold_by(mut self, sold_by: impl Into<String>) -> Self {
        self.sold_by = sold_by.into();
        self
    }
}
