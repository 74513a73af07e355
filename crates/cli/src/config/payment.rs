//! Payment Config

use clap::Args;
use shopfront::checkout::PaymentMetadata;

/// Outcome the simulated gateway reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum GatewayOutcome {
    /// Payment is captured
    Success,

    /// Shopper dismisses the payment sheet
    Cancelled,

    /// Gateway declines the payment
    Failed,
}

/// Checkout settings.
#[derive(Debug, Args)]
pub struct PaymentConfig {
    /// Check out once the cart is built
    #[arg(long)]
    pub pay: bool,

    /// What the simulated gateway answers
    #[arg(
        long,
        env = "SHOPFRONT_GATEWAY_OUTCOME",
        value_enum,
        default_value_t = GatewayOutcome::Success
    )]
    pub gateway_outcome: GatewayOutcome,

    /// Shopper name passed to the gateway
    #[arg(long, env = "SHOPFRONT_CUSTOMER_NAME")]
    pub customer_name: Option<String>,

    /// Shopper email passed to the gateway
    #[arg(long, env = "SHOPFRONT_CUSTOMER_EMAIL")]
    pub customer_email: Option<String>,

    /// Shopper phone number passed to the gateway
    #[arg(long, env = "SHOPFRONT_CUSTOMER_CONTACT")]
    pub customer_contact: Option<String>,
}

impl PaymentConfig {
    /// Gateway metadata for an order from fixture set `set`.
    pub fn metadata(&self, set: &str) -> PaymentMetadata {
        let mut metadata = PaymentMetadata::new(format!("Shopfront order ({set})"));

        metadata.customer_name.clone_from(&self.customer_name);
        metadata.email.clone_from(&self.customer_email);
        metadata.contact.clone_from(&self.customer_contact);
        metadata
            .notes
            .insert("fixture_set".to_string(), set.to_string());

        metadata
    }
}
