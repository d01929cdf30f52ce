//! Terminal summaries
//!
//! Tabular renderings of carts, bulk quotes and checkout reports.

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    checkout::{CheckoutReport, GroupOutcome, PaymentOutcome},
    money::format_minor,
    tiers::{BulkProduct, OrderCost},
};

/// Errors writing a summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// IO error.
    #[error("failed to write summary")]
    Io(#[from] io::Error),
}

/// Print the cart as a table followed by its totals.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_cart(mut out: impl io::Write, cart: &Cart) -> Result<(), SummaryError> {
    if cart.is_empty() {
        writeln!(out, "Cart is empty")?;

        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["Product", "Seller", "Qty", "Unit price", "Line total"]);

    for line in cart.lines() {
        let product = line.product();

        builder.push_record([
            product.name.clone(),
            product.seller_name.clone(),
            format!("{} {}", line.quantity(), product.unit),
            format_minor(line.unit_price()),
            format_minor(line.line_total()),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..5), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(
        out,
        "{} items, total {}",
        cart.item_count(),
        format_minor(cart.total())
    )?;

    Ok(())
}

/// Print a bulk quote: the listing's tiers, the applied tier and savings.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_quote(
    mut out: impl io::Write,
    product: &BulkProduct,
    cost: &OrderCost,
) -> Result<(), SummaryError> {
    let mut builder = Builder::default();

    builder.push_record(["", "From", "To", "Unit price"]);

    for tier in product.tiers().tiers() {
        builder.push_record([
            if *tier == cost.tier { "▶" } else { "" }.to_string(),
            tier.min_quantity.to_string(),
            tier.max_quantity.map_or_else(|| "∞".to_string(), |max| max.to_string()),
            format_minor(tier.unit_price),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(1..4), Alignment::right());

    writeln!(out, "{} ({})", product.name, product.unit)?;
    writeln!(out, "{table}")?;
    writeln!(
        out,
        "{} {} at {} = {}",
        cost.quantity,
        product.unit,
        format_minor(cost.unit_price()),
        format_minor(cost.total)
    )?;

    if product.reference_market_price.is_some() {
        let points = percent_points(cost.savings_percent);
        let savings = format_minor(cost.savings.unsigned_abs());

        if cost.savings >= 0 {
            writeln!(out, "Saving {savings} ({points:.2}%) against market price")?;
        } else {
            writeln!(out, "Paying {savings} ({:.2}%) above market price", -points)?;
        }
    }

    Ok(())
}

/// Print one line per seller group and the overall summary.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_report(mut out: impl io::Write, report: &CheckoutReport) -> Result<(), SummaryError> {
    for result in report.results() {
        let status = match &result.outcome {
            GroupOutcome::Placed { order_id, payment } => {
                let payment = match payment {
                    PaymentOutcome::Paid => "paid".to_string(),
                    PaymentOutcome::PendingCod => "pay on delivery".to_string(),
                    PaymentOutcome::Unpaid => "awaiting payment".to_string(),
                    PaymentOutcome::Failed(reason) => format!("payment failed: {reason}"),
                };

                format!("order {order_id} ({payment})")
            }
            GroupOutcome::Rejected { message } => format!("not placed: {message}"),
        };

        writeln!(
            out,
            "{}  {}  {status}",
            result.seller_id,
            format_minor(result.subtotal)
        )?;
    }

    writeln!(out, "{report}")?;

    Ok(())
}

/// Converts a fractional percentage to percent points for display.
fn percent_points(percentage: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.25), so multiply by 100 to print percent points.
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
