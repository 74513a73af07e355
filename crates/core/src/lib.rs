//! Shopfront
//!
//! Shopfront is the domain core of a category-based shopping app: a product catalog with
//! favourites, a cart that prices itself in integer minor units, promo codes, and a checkout
//! that hands the cart total to an opaque payment gateway.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod discounts;
pub mod fixtures;
pub mod items;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod receipt;
