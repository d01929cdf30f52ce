//! Checkout
//!
//! Pre-flight validation and per-seller order construction. Network sequencing
//! lives with the callers of [`prepare_checkout`].

use thiserror::Error;

use crate::{
    address::{AddressError, DeliveryAddress},
    cart::CartLineItem,
};

pub mod report;
pub mod split;
pub mod submission;

pub use report::{CheckoutReport, GroupOutcome, GroupResult, PaymentOutcome};
pub use split::{SellerOrderGroup, split_by_seller};
pub use submission::{OrderLine, OrderSubmission, PaymentMode};

/// Reasons a checkout refuses to start. No order is attempted when one occurs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// There is nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// The delivery address is incomplete.
    #[error(transparent)]
    Address(#[from] AddressError),
}

/// Validate a checkout and build one submission per seller.
///
/// # Errors
///
/// - [`CheckoutError::EmptyCart`]: the cart has no lines.
/// - [`CheckoutError::Address`]: a required address field is empty.
pub fn prepare_checkout(
    lines: &[CartLineItem],
    address: &DeliveryAddress,
    payment_mode: PaymentMode,
) -> Result<Vec<(SellerOrderGroup, OrderSubmission)>, CheckoutError> {
    address.validate()?;

    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    Ok(split_by_seller(lines)
        .into_iter()
        .map(|group| {
            let submission = OrderSubmission::for_group(&group, address, payment_mode);

            (group, submission)
        })
        .collect())
}
