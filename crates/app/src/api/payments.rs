//! Payments API.
//!
//! Online payment is a three step exchange: the API opens a gateway order
//! for one of our orders ([`PaymentIntent`]), the hosted widget collects the
//! money, and the API verifies the gateway's signed receipt
//! ([`PaymentProof`]).

use async_trait::async_trait;
use haat::ids::OrderId;
use mockall::automock;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};
use crate::gateway::GatewayReceipt;

/// Gateway order opened for one of our orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    /// Public key the hosted widget is opened with.
    pub gateway_key: String,
    /// Amount to collect, in paise.
    pub amount: u64,
    /// ISO currency code.
    pub currency: String,
    /// Gateway-side order reference.
    pub gateway_order_ref: String,
}

/// Evidence of a completed gateway payment, sent for verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProof {
    /// Our order.
    pub order_id: OrderId,
    /// Gateway payment reference.
    pub gateway_payment_ref: String,
    /// Gateway order reference.
    pub gateway_order_ref: String,
    /// Gateway signature over the two references.
    pub signature: String,
}

impl PaymentProof {
    /// Pair a gateway receipt with the order it pays for.
    pub fn new(order_id: OrderId, receipt: GatewayReceipt) -> Self {
        Self {
            order_id,
            gateway_payment_ref: receipt.gateway_payment_ref,
            gateway_order_ref: receipt.gateway_order_ref,
            signature: receipt.signature,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IntentRequest<'a> {
    order_id: &'a OrderId,
}

#[async_trait]
impl PaymentsApi for ApiClient {
    async fn create_payment_intent(&self, order: &OrderId) -> Result<PaymentIntent, ApiError> {
        self.post("payments/create-order", &IntentRequest { order_id: order })
            .await
    }

    async fn verify_payment(&self, proof: &PaymentProof) -> Result<(), ApiError> {
        self.post_ack("payments/verify", proof).await
    }
}

#[automock]
#[async_trait]
pub trait PaymentsApi: Send + Sync {
    /// Open a gateway order for `order`.
    async fn create_payment_intent(&self, order: &OrderId) -> Result<PaymentIntent, ApiError>;

    /// Verify a completed gateway payment.
    async fn verify_payment(&self, proof: &PaymentProof) -> Result<(), ApiError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn intent_decodes_from_camel_case() -> TestResult {
        let intent: PaymentIntent = serde_json::from_value(json!({
            "gatewayKey": "rzp_test_key",
            "amount": 45_000,
            "currency": "INR",
            "gatewayOrderRef": "order_Nx1",
        }))?;

        assert_eq!(intent.amount, 45_000);
        assert_eq!(intent.gateway_order_ref, "order_Nx1");

        Ok(())
    }

    #[test]
    fn proof_carries_receipt_references() -> TestResult {
        let proof = PaymentProof::new(
            OrderId::new("o1"),
            GatewayReceipt {
                gateway_payment_ref: "pay_1".to_string(),
                gateway_order_ref: "order_Nx1".to_string(),
                signature: "sig".to_string(),
            },
        );

        assert_eq!(
            serde_json::to_value(&proof)?,
            json!({
                "orderId": "o1",
                "gatewayPaymentRef": "pay_1",
                "gatewayOrderRef": "order_Nx1",
                "signature": "sig",
            })
        );

        Ok(())
    }
}
