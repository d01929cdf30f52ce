//! Money
//!
//! Marketplace prices are held as integer minor units (paise) and only lifted
//! into [`Money`] when they need to be displayed or compared as currency.

use std::num::TryFromIntError;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// Errors raised when converting or parsing monetary amounts.
#[derive(Debug, Error, PartialEq)]
pub enum MoneyConversionError {
    /// Minor unit amount does not fit in a signed money value.
    #[error("amount does not fit in a money value")]
    Overflow(#[from] TryFromIntError),

    /// A price string could not be parsed (e.g. `"27.50 INR"`).
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// A price string named a currency other than the marketplace currency.
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),
}

/// The currency every marketplace price is quoted in.
pub fn currency() -> &'static Currency {
    iso::INR
}

/// Lift a minor unit amount into [`Money`].
///
/// # Errors
///
/// Returns [`MoneyConversionError::Overflow`] if the amount exceeds `i64::MAX`.
pub fn to_money(minor: u64) -> Result<Money<'static, Currency>, MoneyConversionError> {
    Ok(Money::from_minor(i64::try_from(minor)?, currency()))
}

/// Price of `quantity` units at `unit_price`.
pub fn line_total(unit_price: u64, quantity: u32) -> u64 {
    unit_price.saturating_mul(u64::from(quantity))
}

/// Sum minor unit amounts without wrapping.
pub fn sum_minor(amounts: impl IntoIterator<Item = u64>) -> u64 {
    amounts
        .into_iter()
        .fold(0_u64, u64::saturating_add)
}

/// Signed difference `a - b` between two minor unit amounts.
pub fn signed_difference(a: u64, b: u64) -> i64 {
    let a = i128::from(a);
    let b = i128::from(b);

    i64::try_from(a - b).unwrap_or(if a > b { i64::MAX } else { i64::MIN })
}

/// Render a minor unit amount for people, e.g. `₹1,250.00`.
pub fn format_minor(minor: u64) -> String {
    to_money(minor).map_or_else(|_err| format!("{minor} paise"), |money| money.to_string())
}

/// Parse a price string (e.g. `"27.50 INR"` or `"27.50"`) into minor units.
///
/// # Errors
///
/// Returns an error if the amount is not a non-negative decimal with at most two
/// places, or if a currency other than INR is named.
pub fn parse_price(s: &str) -> Result<u64, MoneyConversionError> {
    let mut parts = s.split_whitespace();

    let amount = parts
        .next()
        .ok_or_else(|| MoneyConversionError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| MoneyConversionError::InvalidPrice(s.to_string()))?;

    if let Some(code) = parts.next()
        && code != currency().iso_alpha_code
    {
        return Err(MoneyConversionError::UnsupportedCurrency(code.to_string()));
    }

    if parts.next().is_some() {
        return Err(MoneyConversionError::InvalidPrice(s.to_string()));
    }

    let minor = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .filter(|value| value.fract().is_zero())
        .and_then(|value| value.to_u64())
        .ok_or_else(|| MoneyConversionError::InvalidPrice(s.to_string()))?;

    Ok(minor)
}
