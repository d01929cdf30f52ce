//! Checkout orchestration
//!
//! Drives one checkout from the cart to a [`CheckoutReport`]:
//!
//! ```text
//! Idle → ValidatingAddress → SplittingBySeller
//!      → SubmittingOrders(i) [→ AwaitingPaymentGateway(i)] … → Completed
//!                          ↘ Failed (validation only)
//! ```
//!
//! Seller groups are processed one at a time, and at most one payment widget
//! is open at once. A failure in one group never stops the groups after it.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    sync::Arc,
};

use haat::{
    address::DeliveryAddress,
    cart::{storage::Storage, store::CartStore},
    checkout::{
        CheckoutError, CheckoutReport, GroupOutcome, GroupResult, OrderSubmission, PaymentMode,
        PaymentOutcome, SellerOrderGroup, prepare_checkout,
    },
    ids::OrderId,
};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::{
    api::{OrdersApi, PaymentProof, PaymentsApi},
    gateway::{GatewayOutcome, PaymentGateway},
};

/// Where a checkout run is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    /// Not started.
    Idle,
    /// Checking the delivery address and cart.
    ValidatingAddress,
    /// Grouping cart lines by seller.
    SplittingBySeller,
    /// Creating the order for seller group `i`.
    SubmittingOrders(usize),
    /// Collecting online payment for seller group `i`.
    AwaitingPaymentGateway(usize),
    /// Every group was attempted.
    Completed,
    /// Validation failed; nothing was attempted.
    Failed,
}

impl Display for CheckoutState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::ValidatingAddress => f.write_str("validating address"),
            Self::SplittingBySeller => f.write_str("splitting by seller"),
            Self::SubmittingOrders(index) => write!(f, "submitting order {index}"),
            Self::AwaitingPaymentGateway(index) => write!(f, "awaiting payment {index}"),
            Self::Completed => f.write_str("completed"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// Sequences order creation and payment collection across seller groups.
pub struct Checkout {
    orders: Arc<dyn OrdersApi>,
    payments: Arc<dyn PaymentsApi>,
    gateway: Arc<dyn PaymentGateway>,
    transitions: Vec<CheckoutState>,
}

impl std::fmt::Debug for Checkout {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Checkout")
            .field("transitions", &self.transitions)
            .finish_non_exhaustive()
    }
}

impl Checkout {
    /// Create an idle checkout.
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrdersApi>,
        payments: Arc<dyn PaymentsApi>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            orders,
            payments,
            gateway,
            transitions: vec![CheckoutState::Idle],
        }
    }

    /// Current state.
    pub fn state(&self) -> CheckoutState {
        self.transitions
            .last()
            .copied()
            .unwrap_or(CheckoutState::Idle)
    }

    /// Every state entered during the latest run, starting with
    /// [`CheckoutState::Idle`].
    pub fn transitions(&self) -> &[CheckoutState] {
        &self.transitions
    }

    /// Check out the cart held by `store`.
    ///
    /// The cart is cleared once at least one order was created; if every
    /// group was rejected it is kept so the buyer can retry.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] before any network call when the address is
    /// incomplete or the cart is empty. Per-group failures are reported in the
    /// returned [`CheckoutReport`] instead.
    pub async fn run<S: Storage>(
        &mut self,
        store: &mut CartStore<S>,
        address: &DeliveryAddress,
        payment_mode: PaymentMode,
    ) -> Result<CheckoutReport, CheckoutError> {
        let checkout_id = Uuid::now_v7();
        let span = info_span!("checkout", %checkout_id, ?payment_mode);

        self.transitions = vec![CheckoutState::Idle];

        self.run_groups(store, address, payment_mode)
            .instrument(span)
            .await
    }

    async fn run_groups<S: Storage>(
        &mut self,
        store: &mut CartStore<S>,
        address: &DeliveryAddress,
        payment_mode: PaymentMode,
    ) -> Result<CheckoutReport, CheckoutError> {
        self.transition(CheckoutState::ValidatingAddress);

        let groups = match prepare_checkout(store.cart().lines(), address, payment_mode) {
            Ok(groups) => groups,
            Err(error) => {
                warn!(%error, "checkout refused");
                self.transition(CheckoutState::Failed);

                return Err(error);
            }
        };

        self.transition(CheckoutState::SplittingBySeller);
        debug!(groups = groups.len(), "split cart by seller");

        let mut report = CheckoutReport::default();

        for (index, (group, submission)) in groups.iter().enumerate() {
            let outcome = self
                .submit_group(index, group, submission, payment_mode)
                .await;

            report.push(GroupResult {
                seller_id: group.seller_id().clone(),
                subtotal: group.subtotal(),
                outcome,
            });
        }

        if report.placed() > 0 {
            store.clear();
        }

        self.transition(CheckoutState::Completed);
        info!(summary = %report, "checkout finished");

        Ok(report)
    }

    async fn submit_group(
        &mut self,
        index: usize,
        group: &SellerOrderGroup,
        submission: &OrderSubmission,
        payment_mode: PaymentMode,
    ) -> GroupOutcome {
        self.transition(CheckoutState::SubmittingOrders(index));

        let order_id = match self.orders.create_order(submission).await {
            Ok(order_id) => order_id,
            Err(error) => {
                warn!(seller = %group.seller_id(), %error, "order rejected");

                return GroupOutcome::Rejected {
                    message: error.to_string(),
                };
            }
        };

        info!(seller = %group.seller_id(), order = %order_id, "order created");

        let payment = match payment_mode {
            PaymentMode::CashOnDelivery => PaymentOutcome::PendingCod,
            PaymentMode::Online => {
                self.transition(CheckoutState::AwaitingPaymentGateway(index));
                self.collect_payment(&order_id).await
            }
        };

        if payment.needs_attention() {
            warn!(order = %order_id, ?payment, "order left unpaid");
        }

        GroupOutcome::Placed { order_id, payment }
    }

    async fn collect_payment(&self, order_id: &OrderId) -> PaymentOutcome {
        let intent = match self.payments.create_payment_intent(order_id).await {
            Ok(intent) => intent,
            Err(error) => return PaymentOutcome::Failed(error.to_string()),
        };

        match self.gateway.collect(&intent).await {
            GatewayOutcome::Completed(receipt) => {
                let proof = PaymentProof::new(order_id.clone(), receipt);

                match self.payments.verify_payment(&proof).await {
                    Ok(()) => PaymentOutcome::Paid,
                    Err(error) => PaymentOutcome::Failed(error.to_string()),
                }
            }
            GatewayOutcome::Dismissed => PaymentOutcome::Unpaid,
            GatewayOutcome::Error(message) => PaymentOutcome::Failed(message),
        }
    }

    fn transition(&mut self, state: CheckoutState) {
        debug!(from = %self.state(), to = %state, "checkout transition");

        self.transitions.push(state);
    }
}
