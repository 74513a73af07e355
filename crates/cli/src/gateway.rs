//! Simulated payment gateway

use shopfront::checkout::{PaymentAmount, PaymentGateway, PaymentMetadata, PaymentOutcome};
use tracing::info;
use uuid::Uuid;

use crate::config::payment::GatewayOutcome;

/// Gateway that answers with a preset outcome instead of talking to a payment provider.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SimulatedGateway {
    outcome: GatewayOutcome,
}

impl SimulatedGateway {
    pub(crate) fn new(outcome: GatewayOutcome) -> Self {
        Self { outcome }
    }
}

impl PaymentGateway for SimulatedGateway {
    fn initiate(&self, amount: PaymentAmount, metadata: &PaymentMetadata) -> PaymentOutcome {
        info!(
            %amount,
            description = %metadata.description,
            outcome = ?self.outcome,
            "opening simulated payment sheet"
        );

        match self.outcome {
            GatewayOutcome::Success => PaymentOutcome::Success {
                payment_id: format!("pay_{}", Uuid::now_v7().simple()),
            },
            GatewayOutcome::Cancelled => PaymentOutcome::Cancelled,
            GatewayOutcome::Failed => PaymentOutcome::Failed {
                reason: "card declined by issuer".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initiate(outcome: GatewayOutcome) -> PaymentOutcome {
        SimulatedGateway::new(outcome).initiate(
            PaymentAmount {
                minor: 82_000,
                currency: "INR",
            },
            &PaymentMetadata::new("Order"),
        )
    }

    #[test]
    fn success_carries_a_fresh_payment_id() {
        let first = initiate(GatewayOutcome::Success);
        let second = initiate(GatewayOutcome::Success);

        assert!(
            matches!(&first, PaymentOutcome::Success { payment_id } if payment_id.starts_with("pay_"))
        );
        assert_ne!(first, second);
    }

    #[test]
    fn cancelled_and_failed_are_passed_through() {
        assert_eq!(initiate(GatewayOutcome::Cancelled), PaymentOutcome::Cancelled);
        assert!(matches!(
            initiate(GatewayOutcome::Failed),
            PaymentOutcome::Failed { .. }
        ));
    }
}
