use std::{io, path::PathBuf};

use clap::Args;
use haat::{
    catalogue::Catalogue,
    ids::ProductId,
    summary::write_quote,
    tiers::{compute_order_cost, parse_quantity},
};

#[derive(Debug, Args)]
pub(crate) struct QuoteArgs {
    /// Catalogue YAML file
    #[arg(long)]
    catalogue: PathBuf,

    /// Product identifier
    #[arg(long)]
    product: String,

    /// Requested quantity; clamped to the listing's minimum order and stock
    #[arg(long)]
    quantity: String,
}

pub(crate) fn run(args: &QuoteArgs) -> Result<(), String> {
    let catalogue = Catalogue::load(&args.catalogue)
        .map_err(|error| format!("failed to load catalogue: {error}"))?;
    let product = catalogue
        .product(&ProductId::new(args.product.as_str()))
        .map_err(|error| error.to_string())?;

    if !product.is_orderable() {
        return Err(format!(
            "{} has {} {} in stock, below the minimum order of {}",
            product.name, product.available_stock, product.unit, product.min_order_quantity
        ));
    }

    let quantity = parse_quantity(product, &args.quantity);
    let cost = compute_order_cost(product, quantity).map_err(|error| error.to_string())?;

    write_quote(io::stdout().lock(), product, &cost).map_err(|error| error.to_string())
}
