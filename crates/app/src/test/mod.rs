//! Shared test fixtures.

use haat::prelude::*;

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

pub(crate) fn address() -> DeliveryAddress {
    DeliveryAddress {
        street: "4 Market Lane".to_string(),
        city: "Indore".to_string(),
        state: "Madhya Pradesh".to_string(),
        postal_code: "452001".to_string(),
        phone: "+91 90000 00000".to_string(),
    }
}
