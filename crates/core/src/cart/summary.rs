//! Cart summary

use rusty_money::{Money, iso::Currency};

use crate::items::LineItem;

/// Price breakdown of a cart at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartSummary<'a> {
    /// Sum of unit price × quantity over every line
    pub subtotal: Money<'a, Currency>,

    /// Tax charged under the cart's policy
    pub tax: Money<'a, Currency>,

    /// Delivery fee charged under the cart's policy
    pub delivery_fee: Money<'a, Currency>,

    /// Discount from the applied promo, zero if none
    pub discount: Money<'a, Currency>,

    /// `subtotal + tax + delivery_fee - discount`, never below zero
    pub total: Money<'a, Currency>,

    /// Sum of quantities over every line
    pub item_count: u64,
}

/// Lines and summary handed to checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSnapshot<'a> {
    /// Lines in display order
    pub items: Vec<LineItem<'a>>,

    /// Price breakdown of those lines
    pub summary: CartSummary<'a>,

    /// Code of the applied promo, if any
    pub promo_code: Option<String>,
}
