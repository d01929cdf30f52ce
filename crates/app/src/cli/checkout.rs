use std::{
    fs, io,
    path::{Path, PathBuf},
};

use clap::{Args, ValueEnum};
use haat::{address::DeliveryAddress, checkout::PaymentMode, summary::write_report};
use haat_app::{
    config::AppConfig,
    context::AppContext,
    session::{Session, UserProfile},
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PaymentArg {
    /// Cash on delivery
    Cod,
    /// Hosted online payment
    Online,
}

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Profile JSON whose saved address pre-fills the delivery address
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Street line
    #[arg(long)]
    street: Option<String>,

    /// City
    #[arg(long)]
    city: Option<String>,

    /// State
    #[arg(long)]
    state: Option<String>,

    /// Postal code
    #[arg(long)]
    postal_code: Option<String>,

    /// Contact phone
    #[arg(long)]
    phone: Option<String>,

    /// Payment mode
    #[arg(long, value_enum, default_value_t = PaymentArg::Cod)]
    payment: PaymentArg,
}

impl CheckoutArgs {
    /// Flags override whatever the profile pre-filled.
    fn address(&self, prefilled: DeliveryAddress) -> DeliveryAddress {
        let pick = |flag: &Option<String>, fallback: String| flag.clone().unwrap_or(fallback);

        DeliveryAddress {
            street: pick(&self.street, prefilled.street),
            city: pick(&self.city, prefilled.city),
            state: pick(&self.state, prefilled.state),
            postal_code: pick(&self.postal_code, prefilled.postal_code),
            phone: pick(&self.phone, prefilled.phone),
        }
    }
}

fn load_profile(path: &Path) -> Result<UserProfile, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("failed to read profile {}: {error}", path.display()))?;

    serde_json::from_str(&raw).map_err(|error| format!("invalid profile: {error}"))
}

pub(crate) async fn run(args: CheckoutArgs, config: &AppConfig) -> Result<(), String> {
    if matches!(args.payment, PaymentArg::Online) {
        return Err(
            "online payment needs the hosted payment widget; use --payment cod".to_string(),
        );
    }

    let profile = args.profile.as_deref().map(load_profile).transpose()?;
    let prefilled = profile
        .as_ref()
        .map(UserProfile::prefill_address)
        .unwrap_or_default();

    let context = match (profile, &config.api.api_token) {
        (Some(profile), Some(token)) => {
            AppContext::for_session(&config.api, &Session::new(token.as_str(), profile))
        }
        _ => AppContext::from_config(&config.api),
    }
    .map_err(|error| format!("failed to create API client: {error}"))?;

    let address = args.address(prefilled);
    let mut store = super::open_cart(config);
    let mut checkout = context.checkout();

    let report = checkout
        .run(&mut store, &address, PaymentMode::CashOnDelivery)
        .await
        .map_err(|error| format!("checkout refused: {error}"))?;

    write_report(io::stdout().lock(), &report).map_err(|error| error.to_string())?;

    if report.placed() == 0 {
        println!("nothing was placed; the cart was kept");
    }

    for order in report.needs_attention() {
        println!("order {order} still needs payment");
    }

    Ok(())
}
