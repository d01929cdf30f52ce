//! Order submissions
//!
//! The payload sent to the order API for a single seller group.

use serde::{Deserialize, Serialize};

use crate::{
    address::DeliveryAddress,
    cart::CartLineItem,
    checkout::split::SellerOrderGroup,
    ids::{ProductId, SellerId},
};

/// How the buyer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMode {
    /// Collected up front through the hosted payment gateway.
    Online,

    /// Collected by the courier on delivery.
    CashOnDelivery,
}

/// One product line of an order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Product reference.
    pub product_id: ProductId,
    /// Display name at the time of ordering.
    pub name: String,
    /// Units ordered.
    pub quantity: u32,
    /// Unit label.
    pub unit: String,
    /// Price per unit in paise.
    pub unit_price: u64,
    /// `unit_price × quantity` in paise.
    pub line_total: u64,
}

impl From<&CartLineItem> for OrderLine {
    fn from(line: &CartLineItem) -> Self {
        Self {
            product_id: line.product_id().clone(),
            name: line.product().name.clone(),
            quantity: line.quantity(),
            unit: line.product().unit.clone(),
            unit_price: line.unit_price(),
            line_total: line.line_total(),
        }
    }
}

/// A single seller's order, ready to post to the order API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    /// Seller fulfilling the order.
    pub seller_id: SellerId,
    /// Ordered lines.
    pub items: Vec<OrderLine>,
    /// Order total in paise; the seller group's subtotal.
    pub total_amount: u64,
    /// Where to ship.
    pub shipping_address: DeliveryAddress,
    /// How the order is paid.
    pub payment_mode: PaymentMode,
}

impl OrderSubmission {
    /// Build the submission for one seller group.
    pub fn for_group(
        group: &SellerOrderGroup,
        address: &DeliveryAddress,
        payment_mode: PaymentMode,
    ) -> Self {
        Self {
            seller_id: group.seller_id().clone(),
            items: group.items().iter().map(OrderLine::from).collect(),
            total_amount: group.subtotal(),
            shipping_address: address.clone(),
            payment_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;
    use crate::{
        address::tests::complete_address,
        cart::{Cart, tests::snapshot},
        checkout::split::split_by_seller,
    };

    #[test]
    fn submission_carries_group_lines_and_subtotal() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(snapshot("tomato", "a", 30_00, 100), 4);
        cart.add_item(snapshot("chilli", "a", 80_00, 10), 1);

        let groups = split_by_seller(cart.lines());
        let group = groups.first().ok_or("expected a group")?;

        let submission =
            OrderSubmission::for_group(group, &complete_address(), PaymentMode::CashOnDelivery);

        assert_eq!(submission.total_amount, 200_00);
        assert_eq!(submission.items.len(), 2);
        assert_eq!(
            submission.items.iter().map(|l| l.line_total).sum::<u64>(),
            submission.total_amount
        );

        Ok(())
    }

    #[test]
    fn submission_serialises_for_the_order_api() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(snapshot("tomato", "a", 30_00, 100), 2);

        let groups = split_by_seller(cart.lines());
        let group = groups.first().ok_or("expected a group")?;

        let value = serde_json::to_value(OrderSubmission::for_group(
            group,
            &complete_address(),
            PaymentMode::Online,
        ))?;

        assert_eq!(value["sellerId"], json!("a"));
        assert_eq!(value["totalAmount"], json!(60_00));
        assert_eq!(value["paymentMode"], json!("online"));
        assert_eq!(value["items"][0]["lineTotal"], json!(60_00));
        assert_eq!(value["shippingAddress"]["postalCode"], json!("422001"));

        Ok(())
    }

    #[test]
    fn cash_on_delivery_uses_kebab_case() -> TestResult {
        assert_eq!(
            serde_json::to_string(&PaymentMode::CashOnDelivery)?,
            "\"cash-on-delivery\""
        );

        Ok(())
    }
}
