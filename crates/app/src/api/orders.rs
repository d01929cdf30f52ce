//! Orders API.

use async_trait::async_trait;
use haat::{checkout::OrderSubmission, ids::OrderId};
use mockall::automock;
use serde::Deserialize;

use super::{ApiClient, ApiError};

#[derive(Debug, Deserialize)]
struct CreatedOrder {
    #[serde(alias = "_id", alias = "orderId")]
    id: OrderId,
}

#[async_trait]
impl OrdersApi for ApiClient {
    async fn create_order(&self, submission: &OrderSubmission) -> Result<OrderId, ApiError> {
        let created: CreatedOrder = self.post("orders", submission).await?;

        Ok(created.id)
    }
}

#[automock]
#[async_trait]
pub trait OrdersApi: Send + Sync {
    /// Create one seller's order, returning its identifier.
    async fn create_order(&self, submission: &OrderSubmission) -> Result<OrderId, ApiError>;
}
