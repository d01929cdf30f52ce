//! Integration tests for bulk price-tier resolution over a YAML catalogue.

use testresult::TestResult;

use haat::{
    prelude::*,
    tiers::{clamp_quantity, parse_quantity, step_down, step_up},
};

const CATALOGUE: &str = r#"
products:
  onion:
    name: Nashik Red Onion
    unit: kg
    seller: farmer-1
    min_order_quantity: 1
    available_stock: 1000
    market_price: "32.00 INR"
    tiers:
      - { min: 1, max: 100, price: "30.00 INR" }
      - { min: 101, max: 500, price: "27.00 INR" }
      - { min: 501, price: "24.00 INR" }
"#;

#[test]
fn tier_boundaries_resolve_to_the_right_band() -> TestResult {
    let catalogue = Catalogue::from_yaml(CATALOGUE)?;
    let onion = catalogue.product(&ProductId::new("onion"))?;

    assert_eq!(resolve_tier(onion, 100).unit_price, 30_00);
    assert_eq!(resolve_tier(onion, 101).unit_price, 27_00);
    assert_eq!(resolve_tier(onion, 500).unit_price, 27_00);
    assert_eq!(resolve_tier(onion, 501).unit_price, 24_00);

    Ok(())
}

#[test]
fn every_quantity_resolves_to_a_band_containing_it() -> TestResult {
    let catalogue = Catalogue::from_yaml(CATALOGUE)?;
    let onion = catalogue.product(&ProductId::new("onion"))?;

    for quantity in 1..=1_000 {
        let tier = resolve_tier(onion, quantity);

        assert!(tier.contains(quantity), "{quantity} resolved to {tier:?}");
    }

    Ok(())
}

#[test]
fn costs_follow_the_resolved_tier() -> TestResult {
    let catalogue = Catalogue::from_yaml(CATALOGUE)?;
    let onion = catalogue.product(&ProductId::new("onion"))?;

    let cost = compute_order_cost(onion, 600)?;

    assert_eq!(cost.total, 14_400_00);
    assert_eq!(cost.savings, 4_800_00);

    Ok(())
}

#[test]
fn quantity_controls_clamp_to_stock() -> TestResult {
    let catalogue = Catalogue::from_yaml(CATALOGUE)?;
    let onion = catalogue.product(&ProductId::new("onion"))?;

    let mut quantity = clamp_quantity(onion, 0);

    assert_eq!(quantity, 1);

    quantity = step_down(onion, quantity);

    assert_eq!(quantity, 1);

    quantity = parse_quantity(onion, "999");
    quantity = step_up(onion, quantity);
    quantity = step_up(onion, quantity);

    assert_eq!(quantity, 1_000);

    Ok(())
}
