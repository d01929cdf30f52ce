//! Haat application layer: marketplace API clients, checkout orchestration,
//! local cart storage and cache invalidation.

pub mod api;
pub mod cache;
pub mod checkout;
pub mod config;
pub mod context;
pub mod events;
pub mod gateway;
pub mod observability;
pub mod session;
pub mod storage;

#[cfg(test)]
mod test;
