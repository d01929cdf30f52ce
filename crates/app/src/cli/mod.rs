use clap::{Parser, Subcommand};
use haat::cart::store::CartStore;
use haat_app::{config::AppConfig, storage::FileStorage};

mod cart;
mod checkout;
mod quote;

#[derive(Debug, Parser)]
#[command(name = "haat-app", about = "Haat marketplace client", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inspect and edit the local cart
    Cart(cart::CartCommand),
    /// Price a bulk order against a catalogue
    Quote(quote::QuoteArgs),
    /// Place orders for everything in the cart
    Checkout(checkout::CheckoutArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Cart(command) => cart::run(command, &self.config),
            Commands::Quote(args) => quote::run(&args),
            Commands::Checkout(args) => checkout::run(args, &self.config).await,
        }
    }
}

fn open_cart(config: &AppConfig) -> CartStore<FileStorage> {
    CartStore::load(FileStorage::new(&config.storage_dir))
}
