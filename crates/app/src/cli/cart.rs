use std::io;

use clap::{Args, Subcommand};
use haat::{
    cart::ProductSnapshot,
    ids::{ProductId, SellerId},
    money::parse_price,
    summary::write_cart,
};
use haat_app::config::AppConfig;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Print the cart
    Show,
    /// Add a product, merging with any existing line
    Add(AddArgs),
    /// Remove a product's line
    Remove(ProductArgs),
    /// One more unit of a product
    Inc(ProductArgs),
    /// One fewer unit of a product; removes the line at zero
    Dec(ProductArgs),
    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct ProductArgs {
    /// Product identifier
    product: String,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Product identifier
    #[arg(long)]
    product: String,

    /// Display name
    #[arg(long)]
    name: String,

    /// Unit price, e.g. "30.00" or "30.00 INR"
    #[arg(long)]
    price: String,

    /// Prevailing market price per unit
    #[arg(long)]
    market_price: Option<String>,

    /// Seller identifier
    #[arg(long)]
    seller: String,

    /// Seller display name; defaults to the identifier
    #[arg(long)]
    seller_name: Option<String>,

    /// Unit label
    #[arg(long, default_value = "kg")]
    unit: String,

    /// Units in stock
    #[arg(long)]
    stock: u32,

    /// Units to add
    #[arg(long, default_value_t = 1)]
    quantity: u32,

    /// Product image reference
    #[arg(long, default_value = "")]
    image: String,
}

impl AddArgs {
    fn into_snapshot(self) -> Result<ProductSnapshot, String> {
        let price = |raw: &str| parse_price(raw).map_err(|error| format!("invalid price: {error}"));

        Ok(ProductSnapshot {
            product_id: ProductId::new(self.product),
            name: self.name,
            unit_price: price(&self.price)?,
            reference_market_price: self.market_price.as_deref().map(price).transpose()?,
            image_ref: self.image,
            seller_name: self.seller_name.unwrap_or_else(|| self.seller.clone()),
            seller_id: SellerId::new(self.seller),
            unit: self.unit,
            stock_ceiling: self.stock,
        })
    }
}

pub(crate) fn run(command: CartCommand, config: &AppConfig) -> Result<(), String> {
    let mut store = super::open_cart(config);

    match command.command {
        CartSubcommand::Show => {}
        CartSubcommand::Add(args) => {
            let quantity = args.quantity;

            store.add_item(args.into_snapshot()?, quantity);
        }
        CartSubcommand::Remove(args) => store.remove_item(&ProductId::new(args.product)),
        CartSubcommand::Inc(args) => store.increment_qty(&ProductId::new(args.product)),
        CartSubcommand::Dec(args) => store.decrement_qty(&ProductId::new(args.product)),
        CartSubcommand::Clear => store.clear(),
    }

    write_cart(io::stdout().lock(), store.cart()).map_err(|error| error.to_string())
}
