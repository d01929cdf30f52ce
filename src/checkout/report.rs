//! Checkout reports
//!
//! Per-seller results of a checkout and the business-level summary shown to
//! the buyer.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::ids::{OrderId, SellerId};

/// What happened to payment for a created order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Gateway payment completed and verified.
    Paid,

    /// Cash on delivery; nothing to collect yet.
    PendingCod,

    /// The buyer closed the payment window; the order exists but is unpaid.
    Unpaid,

    /// Gateway error or verification failure; the order is left unpaid.
    Failed(String),
}

impl PaymentOutcome {
    /// Whether the buyer must revisit this order to pay for it.
    pub fn needs_attention(&self) -> bool {
        matches!(self, Self::Unpaid | Self::Failed(_))
    }
}

/// Outcome for a single seller group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupOutcome {
    /// The order was created.
    Placed {
        /// Identifier returned by the order API.
        order_id: OrderId,
        /// Payment result for the order.
        payment: PaymentOutcome,
    },

    /// The order API rejected the order.
    Rejected {
        /// Human-readable reason from the API.
        message: String,
    },
}

/// Result for one seller group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupResult {
    /// Seller the group belongs to.
    pub seller_id: SellerId,
    /// Group subtotal in paise.
    pub subtotal: u64,
    /// What happened.
    pub outcome: GroupOutcome,
}

impl GroupResult {
    /// The created order, if any.
    pub fn order_id(&self) -> Option<&OrderId> {
        match &self.outcome {
            GroupOutcome::Placed { order_id, .. } => Some(order_id),
            GroupOutcome::Rejected { .. } => None,
        }
    }
}

/// Everything a checkout run attempted, in attempt order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutReport {
    results: Vec<GroupResult>,
}

impl CheckoutReport {
    /// Build a report from group results.
    pub fn new(results: Vec<GroupResult>) -> Self {
        Self { results }
    }

    /// Record another group result.
    pub fn push(&mut self, result: GroupResult) {
        self.results.push(result);
    }

    /// Per-group results.
    pub fn results(&self) -> &[GroupResult] {
        &self.results
    }

    /// Number of seller groups attempted.
    pub fn attempted(&self) -> usize {
        self.results.len()
    }

    /// Number of orders created.
    pub fn placed(&self) -> usize {
        self.results
            .iter()
            .filter(|result| result.order_id().is_some())
            .count()
    }

    /// Whether every group produced an order.
    pub fn all_placed(&self) -> bool {
        self.placed() == self.attempted()
    }

    /// Created orders whose payment still needs the buyer's attention.
    pub fn needs_attention(&self) -> impl Iterator<Item = &OrderId> {
        self.results.iter().filter_map(|result| match &result.outcome {
            GroupOutcome::Placed { order_id, payment } if payment.needs_attention() => {
                Some(order_id)
            }
            GroupOutcome::Placed { .. } | GroupOutcome::Rejected { .. } => None,
        })
    }

    /// Business summary, e.g. `1 of 2 orders placed`.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl Display for CheckoutReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let attempted = self.attempted();
        let noun = if attempted == 1 { "order" } else { "orders" };

        write!(f, "{} of {attempted} {noun} placed", self.placed())
    }
}
