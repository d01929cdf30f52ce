//! Bulk catalogue fixtures
//!
//! Wholesale listings and their tiers described in YAML, e.g.
//!
//! ```yaml
//! products:
//!   onion:
//!     name: Nashik Red Onion
//!     unit: kg
//!     seller: farmer-1
//!     min_order_quantity: 50
//!     available_stock: 2000
//!     market_price: "32.00 INR"
//!     tiers:
//!       - { min: 1, max: 100, price: "30.00 INR" }
//!       - { min: 101, max: 500, price: "27.00 INR" }
//!       - { min: 501, price: "24.00 INR" }
//! ```

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    ids::{ProductId, SellerId},
    money::{MoneyConversionError, parse_price},
    tiers::{BulkProduct, PriceTier, TierError, TierSchedule},
};

/// Catalogue loading errors.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// IO error reading the catalogue file.
    #[error("failed to read catalogue: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("failed to parse catalogue YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// A price string was malformed.
    #[error("invalid price for product {product}: {source}")]
    Price {
        /// Offending product key.
        product: String,
        /// Underlying parse error.
        source: MoneyConversionError,
    },

    /// A product's tiers were invalid.
    #[error("invalid tiers for product {product}: {source}")]
    Tiers {
        /// Offending product key.
        product: String,
        /// Underlying tier error.
        source: TierError,
    },

    /// Product not found.
    #[error("product not found: {0}")]
    ProductNotFound(String),
}

#[derive(Debug, Deserialize)]
struct CatalogueFixture {
    products: FxHashMap<String, ProductFixture>,
}

#[derive(Debug, Deserialize)]
struct ProductFixture {
    name: String,
    unit: String,
    seller: String,
    min_order_quantity: u32,
    available_stock: u32,
    #[serde(default)]
    market_price: Option<String>,
    tiers: Vec<TierFixture>,
}

#[derive(Debug, Deserialize)]
struct TierFixture {
    min: u32,
    #[serde(default)]
    max: Option<u32>,
    price: String,
}

/// Wholesale listings keyed by product.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    products: FxHashMap<ProductId, BulkProduct>,
}

impl Catalogue {
    /// Parse a catalogue from YAML.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogueError`] if the YAML is malformed or a listing has
    /// invalid prices or tiers.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogueError> {
        let fixture: CatalogueFixture = serde_norway::from_str(yaml)?;
        let mut products = FxHashMap::default();

        for (key, product) in fixture.products {
            let listing = product.into_listing(&key)?;

            products.insert(listing.id.clone(), listing);
        }

        Ok(Self { products })
    }

    /// Read and parse a catalogue file.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogueError`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogueError> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    /// Look up a listing.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::ProductNotFound`] for unknown products.
    pub fn product(&self, id: &ProductId) -> Result<&BulkProduct, CatalogueError> {
        self.products
            .get(id)
            .ok_or_else(|| CatalogueError::ProductNotFound(id.to_string()))
    }

    /// All listings, ordered by product identifier.
    pub fn products(&self) -> Vec<&BulkProduct> {
        let mut products: Vec<&BulkProduct> = self.products.values().collect();

        products.sort_by(|a, b| a.id.cmp(&b.id));

        products
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalogue is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductFixture {
    fn into_listing(self, key: &str) -> Result<BulkProduct, CatalogueError> {
        let price = |raw: &str| {
            parse_price(raw).map_err(|source| CatalogueError::Price {
                product: key.to_string(),
                source,
            })
        };
        let tiers_error = |source| CatalogueError::Tiers {
            product: key.to_string(),
            source,
        };

        let tiers = self
            .tiers
            .iter()
            .map(|tier| {
                Ok(PriceTier {
                    min_quantity: tier.min,
                    max_quantity: tier.max,
                    unit_price: price(&tier.price)?,
                })
            })
            .collect::<Result<Vec<_>, CatalogueError>>()?;

        let market_price = self.market_price.as_deref().map(price).transpose()?;

        BulkProduct::new(
            ProductId::new(key),
            self.name,
            self.unit,
            SellerId::new(self.seller),
            self.min_order_quantity,
            self.available_stock,
            market_price,
            TierSchedule::new(tiers).map_err(tiers_error)?,
        )
        .map_err(tiers_error)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::tiers::resolve_tier;

    const YAML: &str = r#"
products:
  onion:
    name: Nashik Red Onion
    unit: kg
    seller: farmer-1
    min_order_quantity: 50
    available_stock: 2000
    market_price: "32.00 INR"
    tiers:
      - { min: 1, max: 100, price: "30.00 INR" }
      - { min: 101, max: 500, price: "27.00 INR" }
      - { min: 501, price: "24.00" }
  wheat:
    name: Sharbati Wheat
    unit: quintal
    seller: farmer-2
    min_order_quantity: 1
    available_stock: 40
    tiers:
      - { min: 1, price: "2800" }
"#;

    #[test]
    fn parses_listings_and_tiers() -> TestResult {
        let catalogue = Catalogue::from_yaml(YAML)?;
        let onion = catalogue.product(&ProductId::new("onion"))?;

        assert_eq!(catalogue.len(), 2);
        assert_eq!(onion.reference_market_price, Some(32_00));
        assert_eq!(onion.tiers().tiers().count(), 3);
        assert_eq!(resolve_tier(onion, 501).unit_price, 24_00);

        let ids: Vec<&str> = catalogue.products().iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, vec!["onion", "wheat"]);

        Ok(())
    }

    #[test]
    fn unknown_products_are_reported() -> TestResult {
        let catalogue = Catalogue::from_yaml(YAML)?;

        assert!(matches!(
            catalogue.product(&ProductId::new("garlic")),
            Err(CatalogueError::ProductNotFound(id)) if id == "garlic"
        ));

        Ok(())
    }

    #[test]
    fn bad_prices_name_the_product() {
        let yaml = r#"
products:
  onion:
    name: Onion
    unit: kg
    seller: f
    min_order_quantity: 1
    available_stock: 10
    tiers:
      - { min: 1, price: "30 GBP" }
"#;

        assert!(matches!(
            Catalogue::from_yaml(yaml),
            Err(CatalogueError::Price { product, .. }) if product == "onion"
        ));
    }

    #[test]
    fn overlapping_tiers_are_rejected() {
        let yaml = r#"
products:
  onion:
    name: Onion
    unit: kg
    seller: f
    min_order_quantity: 1
    available_stock: 10
    tiers:
      - { min: 1, max: 10, price: "30" }
      - { min: 5, price: "28" }
"#;

        assert!(matches!(
            Catalogue::from_yaml(yaml),
            Err(CatalogueError::Tiers {
                source: TierError::Overlap { index: 1 },
                ..
            })
        ));
    }
}
