//! Checkout
//!
//! Hands a cart's total to a payment gateway and clears the cart once payment is confirmed.
//! The gateway is opaque: it is given an amount and some metadata and reports back one of three
//! outcomes.

use std::fmt;

#[cfg(test)]
use mockall::automock;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{info, warn};

use crate::cart::{Cart, CartError, CartSnapshot};

/// Errors raised before a payment is attempted.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// Discounts brought the total to zero, so there is nothing to charge.
    #[error("cart total is zero; nothing to charge")]
    ZeroTotal,

    /// The cart could not be priced.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// An amount to charge, in minor units of an ISO currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentAmount {
    /// Amount in minor units (e.g. paise)
    pub minor: i64,

    /// ISO 4217 alpha code
    pub currency: &'static str,
}

impl fmt::Display for PaymentAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.minor, self.currency)
    }
}

/// Details shown to the shopper by the gateway and attached to the payment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentMetadata {
    /// What is being paid for
    pub description: String,

    /// Shopper name to prefill
    pub customer_name: Option<String>,

    /// Shopper email to prefill
    pub email: Option<String>,

    /// Shopper phone number to prefill
    pub contact: Option<String>,

    /// Free-form key/value notes
    pub notes: FxHashMap<String, String>,
}

impl PaymentMetadata {
    /// Metadata with just a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }
}

/// What the gateway reported back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Payment captured
    Success {
        /// Gateway payment id
        payment_id: String,
    },

    /// Shopper dismissed the payment sheet
    Cancelled,

    /// Gateway declined or errored
    Failed {
        /// Gateway supplied reason
        reason: String,
    },
}

impl PaymentOutcome {
    /// Whether the payment was captured.
    pub fn is_success(&self) -> bool {
        matches!(self, PaymentOutcome::Success { .. })
    }

    /// Message shown to the shopper for this outcome.
    pub fn narrate(&self) -> String {
        match self {
            PaymentOutcome::Success { payment_id } => {
                format!("Payment successful. Payment ID: {payment_id}")
            }
            PaymentOutcome::Cancelled => "Payment cancelled. Your cart has been kept.".to_string(),
            PaymentOutcome::Failed { reason } => {
                format!("Payment failed: {reason}. Your cart has been kept.")
            }
        }
    }
}

/// An external payment gateway.
#[cfg_attr(test, automock)]
pub trait PaymentGateway {
    /// Ask the gateway to charge `amount`, blocking until it reports an outcome.
    fn initiate(&self, amount: PaymentAmount, metadata: &PaymentMetadata) -> PaymentOutcome;
}

/// The cart as it was charged, and what the gateway said.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutOutcome<'a> {
    /// Lines and totals at the moment of payment
    pub snapshot: CartSnapshot<'a>,

    /// Gateway outcome
    pub payment: PaymentOutcome,
}

/// Charge the cart's total through `gateway`.
///
/// The cart is cleared only when the payment succeeds; a cancelled or failed payment leaves it
/// as it was so the shopper can try again.
///
/// # Errors
///
/// Returns a [`CheckoutError`] if the cart is empty, its total is zero, or it cannot be priced.
/// The gateway is not called in any of these cases.
#[tracing::instrument(
    name = "checkout",
    skip_all,
    fields(lines = cart.len(), total = tracing::field::Empty),
    err
)]
pub fn checkout<'a, G>(
    cart: &mut Cart<'a>,
    gateway: &G,
    metadata: &PaymentMetadata,
) -> Result<CheckoutOutcome<'a>, CheckoutError>
where
    G: PaymentGateway + ?Sized,
{
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let snapshot = cart.snapshot()?;
    let total = snapshot.summary.total;

    tracing::Span::current().record("total", tracing::field::display(total));

    if total.to_minor_units() == 0 {
        return Err(CheckoutError::ZeroTotal);
    }

    let amount = PaymentAmount {
        minor: total.to_minor_units(),
        currency: cart.currency().iso_alpha_code,
    };

    let payment = gateway.initiate(amount, metadata);

    match &payment {
        PaymentOutcome::Success { payment_id } => {
            info!(%payment_id, %amount, "payment captured");
            cart.clear();
        }
        PaymentOutcome::Cancelled => info!(%amount, "payment cancelled by shopper"),
        PaymentOutcome::Failed { reason } => warn!(%reason, %amount, "payment failed"),
    }

    Ok(CheckoutOutcome { snapshot, payment })
}
