//! Hosted payment gateway.
//!
//! The widget itself runs outside this process; all the checkout sees is how
//! it finished.

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::api::PaymentIntent;

/// Gateway references returned by a completed payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayReceipt {
    /// Gateway payment reference.
    pub gateway_payment_ref: String,
    /// Gateway order reference.
    pub gateway_order_ref: String,
    /// Gateway signature over the two references.
    pub signature: String,
}

/// How a hosted payment widget finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOutcome {
    /// The buyer paid; the receipt still needs verifying.
    Completed(GatewayReceipt),

    /// The buyer closed the widget.
    Dismissed,

    /// The widget failed.
    Error(String),
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open the hosted widget for `intent` and wait for it to finish.
    async fn collect(&self, intent: &PaymentIntent) -> GatewayOutcome;
}

/// Gateway for surfaces that cannot host the payment widget, such as a
/// terminal. Every collection fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGateway;

#[async_trait]
impl PaymentGateway for NoGateway {
    async fn collect(&self, _intent: &PaymentIntent) -> GatewayOutcome {
        GatewayOutcome::Error("no payment gateway is available".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_gateway_always_errors() {
        let intent = PaymentIntent {
            gateway_key: "key".to_string(),
            amount: 100,
            currency: "INR".to_string(),
            gateway_order_ref: "ref".to_string(),
        };

        assert!(matches!(
            NoGateway.collect(&intent).await,
            GatewayOutcome::Error(_)
        ));
    }
}
