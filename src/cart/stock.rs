//! Quantity and stock reconciliation
//!
//! Every cart mutator funnels its quantity arithmetic through these rules so a
//! line always holds at least one unit and never more than its stock ceiling.
//! Over-asking is clamped, never rejected.

/// Quantity for a brand new line, or `None` when nothing is in stock.
pub fn clamp_to_stock(requested: u32, stock_ceiling: u32) -> Option<u32> {
    (stock_ceiling > 0).then(|| requested.clamp(1, stock_ceiling))
}

/// Quantity after adding `requested` more units to an existing line.
pub fn merged_quantity(existing: u32, requested: u32, stock_ceiling: u32) -> u32 {
    existing.saturating_add(requested).min(stock_ceiling)
}

/// Quantity after a single-unit increment.
pub fn incremented(quantity: u32, stock_ceiling: u32) -> u32 {
    merged_quantity(quantity, 1, stock_ceiling)
}

/// Quantity after a single-unit decrement; `None` means the line goes away.
pub fn decremented(quantity: u32) -> Option<u32> {
    quantity.checked_sub(1).filter(|remaining| *remaining > 0)
}

/// Repair a stored quantity that may no longer satisfy the stock invariant.
pub fn reconcile(stored: u32, stock_ceiling: u32) -> Option<u32> {
    (stored > 0 && stock_ceiling > 0).then(|| stored.min(stock_ceiling))
}
