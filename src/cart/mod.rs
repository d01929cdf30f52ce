//! Cart

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    ids::{ProductId, SellerId},
    money::{self, MoneyConversionError},
};

pub mod stock;
pub mod storage;
pub mod store;

/// Everything the cart needs to know about a product at the moment it is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    /// Product identifier; one cart line per product.
    pub product_id: ProductId,

    /// Display name.
    pub name: String,

    /// Price per unit in paise.
    pub unit_price: u64,

    /// Prevailing market price per unit in paise, for savings display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_market_price: Option<u64>,

    /// Image reference (URL or asset key).
    #[serde(default)]
    pub image_ref: String,

    /// Seller display name.
    #[serde(default)]
    pub seller_name: String,

    /// Seller identifier, used to split checkout into per-seller orders.
    pub seller_id: SellerId,

    /// Unit label, e.g. `kg`.
    #[serde(default)]
    pub unit: String,

    /// Units currently available.
    pub stock_ceiling: u32,
}

/// One product entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(flatten)]
    product: ProductSnapshot,

    quantity: u32,
}

impl CartLineItem {
    /// Product details captured when the line was created.
    pub fn product(&self) -> &ProductSnapshot {
        &self.product
    }

    /// Product identifier.
    pub fn product_id(&self) -> &ProductId {
        &self.product.product_id
    }

    /// Seller identifier.
    pub fn seller_id(&self) -> &SellerId {
        &self.product.seller_id
    }

    /// Price per unit in paise.
    pub fn unit_price(&self) -> u64 {
        self.product.unit_price
    }

    /// Units currently available.
    pub fn stock_ceiling(&self) -> u32 {
        self.product.stock_ceiling
    }

    /// Units in the cart; always within `1..=stock_ceiling`.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `unit_price × quantity` in paise.
    pub fn line_total(&self) -> u64 {
        money::line_total(self.product.unit_price, self.quantity)
    }
}

/// The buyer's cart: one line per product, in the order products were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `requested` units of a product, merging into an existing line.
    ///
    /// Quantities are clamped to the stock ceiling. A product with nothing in
    /// stock is not added. Re-adding a product refreshes the line's snapshot,
    /// so the merge clamps against the latest stock and a ceiling of zero
    /// drops the line.
    pub fn add_item(&mut self, product: ProductSnapshot, requested: u32) {
        if let Some(line) = self.line_mut(&product.product_id) {
            let quantity = stock::merged_quantity(line.quantity, requested, product.stock_ceiling);
            let id = product.product_id.clone();

            line.product = product;
            line.quantity = quantity;

            if quantity == 0 {
                debug!(product = %id, "product sold out; dropping its line");
                self.remove_item(&id);
            }

            return;
        }

        if let Some(quantity) = stock::clamp_to_stock(requested, product.stock_ceiling) {
            self.lines.push(CartLineItem { product, quantity });
        } else {
            debug!(product = %product.product_id, "not adding out-of-stock product");
        }
    }

    /// Remove a product's line, if present.
    pub fn remove_item(&mut self, product: &ProductId) {
        self.lines.retain(|line| line.product_id() != product);
    }

    /// Add one unit, up to the stock ceiling.
    pub fn increment_qty(&mut self, product: &ProductId) {
        if let Some(line) = self.line_mut(product) {
            line.quantity = stock::incremented(line.quantity, line.stock_ceiling());
        }
    }

    /// Take one unit away; the last unit takes the line with it.
    pub fn decrement_qty(&mut self, product: &ProductId) {
        let Some(line) = self.line_mut(product) else {
            return;
        };

        if let Some(quantity) = stock::decremented(line.quantity) {
            line.quantity = quantity;
        } else {
            self.remove_item(product);
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `unit_price × quantity` over every line, in paise.
    pub fn total(&self) -> u64 {
        money::sum_minor(self.lines.iter().map(CartLineItem::line_total))
    }

    /// Cart total as [`Money`].
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyConversionError`] if the total is too large to represent.
    pub fn total_money(&self) -> Result<Money<'static, Currency>, MoneyConversionError> {
        money::to_money(self.total())
    }

    /// Sum of quantities over every line.
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum()
    }

    /// Units of a product in the cart, 0 when absent.
    pub fn quantity_of(&self, product: &ProductId) -> u32 {
        self.get(product).map_or(0, CartLineItem::quantity)
    }

    /// Look up a product's line.
    pub fn get(&self, product: &ProductId) -> Option<&CartLineItem> {
        self.lines.iter().find(|line| line.product_id() == product)
    }

    /// All lines, in insertion order.
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Re-admit a line read back from storage, repairing its quantity and
    /// folding duplicates into the first occurrence.
    pub(crate) fn restore_line(&mut self, line: CartLineItem) {
        let Some(quantity) = stock::reconcile(line.quantity, line.stock_ceiling()) else {
            debug!(product = %line.product_id(), "dropping stored line with no usable quantity");

            return;
        };

        if let Some(existing) = self.line_mut(line.product_id()) {
            existing.quantity =
                stock::merged_quantity(existing.quantity, quantity, existing.stock_ceiling());
        } else {
            self.lines.push(CartLineItem { quantity, ..line });
        }
    }

    fn line_mut(&mut self, product: &ProductId) -> Option<&mut CartLineItem> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id() == product)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use testresult::TestResult;

    use super::*;

    pub(crate) fn snapshot(id: &str, seller: &str, unit_price: u64, stock: u32) -> ProductSnapshot {
        ProductSnapshot {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            unit_price,
            reference_market_price: None,
            image_ref: String::new(),
            seller_name: format!("Seller {seller}"),
            seller_id: SellerId::new(seller),
            unit: "kg".to_string(),
            stock_ceiling: stock,
        }
    }

    #[test]
    fn add_item_creates_a_clamped_line() {
        let mut cart = Cart::new();

        cart.add_item(snapshot("p1", "s1", 10_00, 5), 9);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&ProductId::new("p1")), 5);
    }

    #[test]
    fn add_item_with_zero_requested_still_adds_one() {
        let mut cart = Cart::new();

        cart.add_item(snapshot("p1", "s1", 10_00, 5), 0);

        assert_eq!(cart.quantity_of(&ProductId::new("p1")), 1);
    }

    #[test]
    fn add_item_merges_repeated_products() {
        let mut cart = Cart::new();

        cart.add_item(snapshot("p1", "s1", 10_00, 5), 2);
        cart.add_item(snapshot("p1", "s1", 10_00, 5), 2);
        cart.add_item(snapshot("p1", "s1", 10_00, 5), 2);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&ProductId::new("p1")), 5);
    }

    #[test]
    fn re_adding_picks_up_the_latest_stock() -> TestResult {
        let mut cart = Cart::new();
        let id = ProductId::new("p1");

        cart.add_item(snapshot("p1", "s1", 10_00, 5), 5);
        cart.add_item(snapshot("p1", "s1", 12_00, 2), 1);

        let line = cart.get(&id).ok_or("line should survive")?;

        assert_eq!(line.quantity(), 2);
        assert_eq!(line.stock_ceiling(), 2);
        assert_eq!(line.unit_price(), 12_00);
        assert_eq!(cart.total(), 24_00);

        Ok(())
    }

    #[test]
    fn re_adding_a_sold_out_product_drops_its_line() {
        let mut cart = Cart::new();

        cart.add_item(snapshot("p1", "s1", 10_00, 5), 3);
        cart.add_item(snapshot("p2", "s1", 10_00, 5), 1);
        cart.add_item(snapshot("p1", "s1", 10_00, 0), 1);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&ProductId::new("p1")), 0);
    }

    #[test]
    fn out_of_stock_products_are_not_added() {
        let mut cart = Cart::new();

        cart.add_item(snapshot("p1", "s1", 10_00, 0), 1);

        assert!(cart.is_empty());
    }

    #[test]
    fn decrement_of_last_unit_removes_line() {
        let mut cart = Cart::new();
        let id = ProductId::new("p1");

        cart.add_item(snapshot("p1", "s1", 10_00, 5), 1);
        cart.decrement_qty(&id);

        assert!(cart.is_empty());
        assert!(cart.get(&id).is_none());
    }

    #[test]
    fn mutators_ignore_unknown_products() {
        let mut cart = Cart::new();
        let unknown = ProductId::new("nope");

        cart.add_item(snapshot("p1", "s1", 10_00, 5), 2);
        cart.increment_qty(&unknown);
        cart.decrement_qty(&unknown);
        cart.remove_item(&unknown);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&unknown), 0);
    }

    #[test]
    fn totals_track_every_line() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(snapshot("p1", "s1", 10_00, 5), 3);
        cart.add_item(snapshot("p2", "s2", 2_50, 10), 4);

        assert_eq!(cart.total(), 40_00);
        assert_eq!(cart.item_count(), 7);
        assert_eq!(cart.total_money()?, money::to_money(40_00)?);

        cart.remove_item(&ProductId::new("p1"));

        assert_eq!(cart.total(), 10_00);
        assert_eq!(cart.item_count(), 4);

        Ok(())
    }

    #[test]
    fn restore_line_repairs_and_deduplicates() {
        let mut cart = Cart::new();

        cart.restore_line(CartLineItem {
            product: snapshot("p1", "s1", 10_00, 5),
            quantity: 9,
        });
        cart.restore_line(CartLineItem {
            product: snapshot("p2", "s1", 10_00, 5),
            quantity: 0,
        });
        cart.restore_line(CartLineItem {
            product: snapshot("p1", "s1", 10_00, 5),
            quantity: 1,
        });

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&ProductId::new("p1")), 5);
    }
}
