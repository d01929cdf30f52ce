//! Multi-seller splitting
//!
//! Every seller's goods ship under an independent order, so a cart holding
//! produce from several farmers is partitioned by seller before submission.

use rustc_hash::FxHashMap;

use crate::{
    cart::CartLineItem,
    ids::SellerId,
    money,
};

/// The slice of a cart one seller will fulfil.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellerOrderGroup {
    seller_id: SellerId,
    seller_name: String,
    items: Vec<CartLineItem>,
}

impl SellerOrderGroup {
    /// Seller identifier.
    pub fn seller_id(&self) -> &SellerId {
        &self.seller_id
    }

    /// Seller display name, taken from the first line seen for the seller.
    pub fn seller_name(&self) -> &str {
        &self.seller_name
    }

    /// Lines belonging to this seller, in cart order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Sum of line totals for this seller, in paise.
    pub fn subtotal(&self) -> u64 {
        money::sum_minor(self.items.iter().map(CartLineItem::line_total))
    }
}

/// Partition cart lines into one group per distinct seller.
///
/// Lines keep their relative order inside a group. Groups come out in the order
/// their seller first appears, but callers should treat group order as
/// arbitrary.
pub fn split_by_seller(lines: &[CartLineItem]) -> Vec<SellerOrderGroup> {
    let mut index: FxHashMap<&SellerId, usize> = FxHashMap::default();
    let mut groups: Vec<SellerOrderGroup> = Vec::new();

    for line in lines {
        let position = *index.entry(line.seller_id()).or_insert_with(|| {
            groups.push(SellerOrderGroup {
                seller_id: line.seller_id().clone(),
                seller_name: line.product().seller_name.clone(),
                items: Vec::new(),
            });

            groups.len() - 1
        });

        if let Some(group) = groups.get_mut(position) {
            group.items.push(line.clone());
        }
    }

    groups
}
