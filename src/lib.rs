//! Haat
//!
//! Haat is the buyer-side core of an agricultural marketplace: a persistent
//! cart with stock-aware quantities, per-seller order splitting for checkout,
//! and volume (bulk) price-tier resolution for wholesale buyers.

pub mod address;
pub mod cart;
pub mod catalogue;
pub mod checkout;
pub mod ids;
pub mod money;
pub mod prelude;
pub mod summary;
pub mod tiers;
