//! Shopfront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{ArgumentError, Cart, CartError, CartSnapshot, CartSummary},
    catalog::{Catalog, Category, Favourites, Product},
    checkout::{
        CheckoutError, CheckoutOutcome, PaymentAmount, PaymentGateway, PaymentMetadata,
        PaymentOutcome, checkout,
    },
    discounts::{Discount, InvalidDiscount},
    fixtures::{Fixture, FixtureError},
    items::{LineItem, NewLineItem},
    pricing::{DeliveryPolicy, InvalidPolicy, PricingError, PricingPolicy, TaxPolicy},
    products::{ProductId, ProductKey},
    promotions::{PromoBook, PromoCode, PromoRejection, PromoResolver},
    receipt::{Receipt, ReceiptError},
};
