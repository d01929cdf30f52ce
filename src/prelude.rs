//! Haat prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    address::{AddressError, AddressField, DeliveryAddress},
    cart::{
        Cart, CartLineItem, ProductSnapshot,
        storage::{MemoryStorage, Storage, StorageError},
        store::{CART_STORAGE_KEY, CartStore},
    },
    catalogue::{Catalogue, CatalogueError},
    checkout::{
        CheckoutError, CheckoutReport, GroupOutcome, GroupResult, OrderLine, OrderSubmission,
        PaymentMode, PaymentOutcome, SellerOrderGroup, prepare_checkout, split_by_seller,
    },
    ids::{OrderId, ProductId, SellerId},
    money::MoneyConversionError,
    tiers::{
        BulkProduct, OrderCost, PriceTier, TierError, TierSchedule, compute_order_cost,
        resolve_tier,
    },
};
