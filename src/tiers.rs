//! Bulk price tiers
//!
//! Wholesale (B2B) listings price by volume: each [`PriceTier`] covers a
//! quantity band, and the band a requested quantity falls in sets the unit
//! price. Everything here is a pure computation over already-fetched listings.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    ids::{ProductId, SellerId},
    money::{self, MoneyConversionError},
};

/// Errors raised while building tier schedules or pricing orders.
#[derive(Debug, Error, PartialEq)]
pub enum TierError {
    /// A schedule needs at least one tier.
    #[error("a price tier schedule needs at least one tier")]
    NoTiers,

    /// A tier's upper bound sits below its lower bound.
    #[error("tier {index} ends at {max} before it starts at {min}")]
    InvertedTier {
        /// Position of the offending tier.
        index: usize,
        /// Its minimum quantity.
        min: u32,
        /// Its maximum quantity.
        max: u32,
    },

    /// A tier starts inside, or before, the tier preceding it.
    #[error("tier {index} overlaps or precedes the tier before it")]
    Overlap {
        /// Position of the offending tier.
        index: usize,
    },

    /// Only the last tier may be unbounded.
    #[error("tier {index} follows an unbounded tier")]
    AfterUnbounded {
        /// Position of the offending tier.
        index: usize,
    },

    /// The minimum order quantity falls below every tier.
    #[error("first tier starts at {first_min}, above the minimum order quantity {min_order}")]
    UncoveredMinimum {
        /// Lower bound of the first tier.
        first_min: u32,
        /// Minimum order quantity of the listing.
        min_order: u32,
    },

    /// Wrapped money conversion error.
    #[error(transparent)]
    Money(#[from] MoneyConversionError),
}

/// A quantity band and its unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTier {
    /// Smallest quantity in the band.
    pub min_quantity: u32,

    /// Largest quantity in the band; `None` is unbounded.
    pub max_quantity: Option<u32>,

    /// Price per unit in paise.
    pub unit_price: u64,
}

impl PriceTier {
    /// Whether `quantity` falls inside this band.
    pub fn contains(&self, quantity: u32) -> bool {
        quantity >= self.min_quantity && self.max_quantity.is_none_or(|max| quantity <= max)
    }
}

/// Non-empty, ascending, non-overlapping tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierSchedule {
    base: PriceTier,
    higher: Vec<PriceTier>,
}

impl TierSchedule {
    /// Validate and build a schedule.
    ///
    /// # Errors
    ///
    /// Returns a [`TierError`] if the tiers are empty, inverted, overlapping,
    /// out of order, or continue past an unbounded tier.
    pub fn new(tiers: impl Into<Vec<PriceTier>>) -> Result<Self, TierError> {
        let mut tiers = tiers.into().into_iter();
        let base = tiers.next().ok_or(TierError::NoTiers)?;
        let higher: Vec<PriceTier> = tiers.collect();

        let mut previous: Option<&PriceTier> = None;

        for (index, tier) in std::iter::once(&base).chain(&higher).enumerate() {
            if let Some(max) = tier.max_quantity
                && max < tier.min_quantity
            {
                return Err(TierError::InvertedTier {
                    index,
                    min: tier.min_quantity,
                    max,
                });
            }

            if let Some(previous) = previous {
                match previous.max_quantity {
                    None => return Err(TierError::AfterUnbounded { index }),
                    Some(max) if tier.min_quantity <= max => {
                        return Err(TierError::Overlap { index });
                    }
                    Some(_) => {}
                }
            }

            previous = Some(tier);
        }

        Ok(Self { base, higher })
    }

    /// The lowest band.
    pub fn base(&self) -> &PriceTier {
        &self.base
    }

    /// All tiers in ascending order.
    pub fn tiers(&self) -> impl Iterator<Item = &PriceTier> {
        std::iter::once(&self.base).chain(&self.higher)
    }

    /// The tier with the highest minimum not above `quantity`.
    ///
    /// Quantities below the first band price at the first band.
    pub fn resolve(&self, quantity: u32) -> &PriceTier {
        self.higher
            .iter()
            .rev()
            .find(|tier| tier.min_quantity <= quantity)
            .unwrap_or(&self.base)
    }
}

impl TryFrom<Vec<PriceTier>> for TierSchedule {
    type Error = TierError;

    fn try_from(tiers: Vec<PriceTier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

/// A wholesale listing with volume pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkProduct {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit label, e.g. `kg`.
    pub unit: String,
    /// Listing seller.
    pub seller_id: SellerId,
    /// Smallest quantity that may be ordered.
    pub min_order_quantity: u32,
    /// Units available.
    pub available_stock: u32,
    /// Prevailing market price per unit in paise, for savings.
    pub reference_market_price: Option<u64>,
    tiers: TierSchedule,
}

impl BulkProduct {
    /// Build a listing, checking its first tier covers the minimum order.
    ///
    /// # Errors
    ///
    /// Returns [`TierError::UncoveredMinimum`] if the first tier starts above
    /// `min_order_quantity`.
    #[expect(
        clippy::too_many_arguments,
        reason = "mirrors the listing fields one to one"
    )]
    pub fn new(
        id: ProductId,
        name: String,
        unit: String,
        seller_id: SellerId,
        min_order_quantity: u32,
        available_stock: u32,
        reference_market_price: Option<u64>,
        tiers: TierSchedule,
    ) -> Result<Self, TierError> {
        let first_min = tiers.base().min_quantity;

        if first_min > min_order_quantity {
            return Err(TierError::UncoveredMinimum {
                first_min,
                min_order: min_order_quantity,
            });
        }

        Ok(Self {
            id,
            name,
            unit,
            seller_id,
            min_order_quantity,
            available_stock,
            reference_market_price,
            tiers,
        })
    }

    /// The listing's tier schedule.
    pub fn tiers(&self) -> &TierSchedule {
        &self.tiers
    }

    /// Whether enough stock exists to meet the minimum order.
    pub fn is_orderable(&self) -> bool {
        self.available_stock >= self.min_order_quantity
    }
}

/// The applicable tier for `quantity` units of a listing.
pub fn resolve_tier(product: &BulkProduct, quantity: u32) -> &PriceTier {
    product.tiers.resolve(quantity)
}

/// Priced bulk order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderCost {
    /// Units priced.
    pub quantity: u32,
    /// Tier applied.
    pub tier: PriceTier,
    /// `tier.unit_price × quantity` in paise.
    pub total: u64,
    /// `(reference − unit price) × quantity` in paise; negative when buying
    /// above market, zero without a reference price.
    pub savings: i64,
    /// Savings per unit relative to the reference price.
    pub savings_percent: Percentage,
}

impl OrderCost {
    /// Unit price applied, in paise.
    pub fn unit_price(&self) -> u64 {
        self.tier.unit_price
    }

    /// Order total as [`Money`].
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyConversionError`] if the total is too large to represent.
    pub fn total_money(&self) -> Result<Money<'static, Currency>, MoneyConversionError> {
        money::to_money(self.total)
    }
}

/// Price `quantity` units of a listing at its resolved tier.
///
/// # Errors
///
/// Returns [`TierError::Money`] if the total cannot be represented as money.
pub fn compute_order_cost(product: &BulkProduct, quantity: u32) -> Result<OrderCost, TierError> {
    let tier = *resolve_tier(product, quantity);
    let total = money::line_total(tier.unit_price, quantity);

    let (savings, savings_percent) = match product.reference_market_price {
        Some(reference) if reference > 0 => {
            let per_unit = money::signed_difference(reference, tier.unit_price);
            let savings = per_unit.saturating_mul(i64::from(quantity));
            let percent = Decimal::from(per_unit) / Decimal::from(reference);

            (savings, Percentage::from(percent))
        }
        Some(_) | None => (0, Percentage::from(Decimal::ZERO)),
    };

    // Totals must stay displayable.
    money::to_money(total)?;

    Ok(OrderCost {
        quantity,
        tier,
        total,
        savings,
        savings_percent,
    })
}

/// Clamp a quantity to `[min_order_quantity, available_stock]`.
///
/// When stock is below the minimum order the minimum wins; such listings are
/// not orderable (see [`BulkProduct::is_orderable`]).
pub fn clamp_quantity(product: &BulkProduct, quantity: u32) -> u32 {
    quantity
        .min(product.available_stock)
        .max(product.min_order_quantity)
}

/// Increment control: one more unit, clamped.
pub fn step_up(product: &BulkProduct, quantity: u32) -> u32 {
    clamp_quantity(product, quantity.saturating_add(1))
}

/// Decrement control: one fewer unit, clamped.
pub fn step_down(product: &BulkProduct, quantity: u32) -> u32 {
    clamp_quantity(product, quantity.saturating_sub(1))
}

/// Direct numeric entry, clamped. Unparseable input falls back to the minimum.
pub fn parse_quantity(product: &BulkProduct, input: &str) -> u32 {
    let trimmed = input.trim();

    match trimmed.parse::<u32>() {
        Ok(quantity) => clamp_quantity(product, quantity),
        Err(_err) if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) => {
            // All digits but too large for u32.
            clamp_quantity(product, u32::MAX)
        }
        Err(_err) => product.min_order_quantity,
    }
}
