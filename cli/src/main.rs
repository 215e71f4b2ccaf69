use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pitchai_web::checkout::{CaptureOutcome, HttpOrderApi, OrderId, ResultMessage, ResultSink};
use pitchai_web::config::{ConfigError, normalize_base_url, parse_cart};
use pitchai_web::theme::{
    Announcement, FileStore, OsPreference, PreferenceStore, StorageError, ThemeMarker, ThemeParseError, ThemeSurface,
    ToggleLabel, Transition,
};
use pitchai_web::{CheckoutConfig, CheckoutError, CheckoutFlow, ThemeChange, ThemeController, ThemeOptions};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("checkout failed: {0}")]
    Checkout(#[from] CheckoutError),
    #[error("payment instrument declined; create a new order and approve it with another instrument")]
    Declined,
    #[error("preference store error: {0}")]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Theme(#[from] ThemeParseError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "pitchai", about = "PitchAI order API and theme preference CLI")]
struct Cli {
    #[arg(long, env = "PITCHAI_API_BASE_URL", default_value = pitchai_web::config::DEFAULT_API_BASE_URL)]
    base_url: String,

    #[arg(long, env = "PITCHAI_CART", help = "Cart as id:quantity[,id:quantity...]")]
    cart: Option<String>,

    #[arg(long, env = "PITCHAI_PREFERENCES", default_value = ".pitchai/preferences.json")]
    preferences: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Order(OrderCommand),
    Theme(ThemeCommand),
}

#[derive(Args, Debug)]
struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Subcommand, Debug)]
enum OrderSubcommand {
    /// Create an order for the cart and print its id.
    Create,
    /// Capture an order the payer has approved.
    Capture { order_id: String },
}

#[derive(Args, Debug)]
struct ThemeCommand {
    #[command(subcommand)]
    command: ThemeSubcommand,
}

#[derive(Subcommand, Debug)]
enum ThemeSubcommand {
    /// Print the resolved theme as JSON.
    Show,
    Toggle,
    Set { theme: String },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    pitchai_web::logging::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Order(order) => run_order(&checkout_config(&cli.base_url, cli.cart.as_deref())?, order).await,
        Command::Theme(theme) => run_theme(cli.preferences, theme),
    }
}

fn checkout_config(base_url: &str, cart: Option<&str>) -> Result<CheckoutConfig, CliError> {
    let mut config = CheckoutConfig::default().with_base_url(&normalize_base_url(base_url)?);
    if let Some(raw) = cart {
        config = config.with_cart(parse_cart(raw)?);
    }
    Ok(config)
}

// =============================================================================
// ORDER
// =============================================================================

/// Prints results to stdout in place of the page's result region.
struct ConsoleSink;

impl ResultSink for ConsoleSink {
    fn replace(&self, message: &ResultMessage) {
        println!("{}", message.text());
    }

    fn hide_button(&self) {
        tracing::debug!("purchase complete");
    }
}

async fn run_order(config: &CheckoutConfig, order: OrderCommand) -> Result<(), CliError> {
    let api = HttpOrderApi::from_config(config)?;
    let flow = CheckoutFlow::new(api, ConsoleSink, config.clone());

    match order.command {
        OrderSubcommand::Create => {
            let id = flow.create_order().await?;
            println!("{id}");
            Ok(())
        }
        OrderSubcommand::Capture { order_id } => match flow.capture_order(&OrderId::new(order_id)).await {
            CaptureOutcome::Succeeded(_) => Ok(()),
            CaptureOutcome::Restart => Err(CliError::Declined),
            CaptureOutcome::Failed(e) => Err(e.into()),
        },
    }
}

// =============================================================================
// THEME
// =============================================================================

/// Reports theme changes on stderr.
struct TerminalSurface;

impl ThemeSurface for TerminalSurface {
    fn apply(&self, marker: &ThemeMarker) {
        tracing::debug!(theme = %marker.theme, "theme applied");
    }

    fn begin_transition(&self, _transition: &Transition) {}

    fn announce(&self, announcement: &Announcement) {
        eprintln!("{}", announcement.text);
    }

    fn update_toggle(&self, _label: &ToggleLabel) {}
}

fn run_theme(preferences: PathBuf, theme: ThemeCommand) -> Result<(), CliError> {
    let store = FileStore::new(preferences);
    let options = ThemeOptions::default().with_animations(false);
    let key = options.storage_key.clone();

    // Surface read errors here; the controller would fall back silently.
    store.load(&key)?;

    let controller = ThemeController::new(options, store, OsPreference, TerminalSurface);
    controller.init();

    match theme.command {
        ThemeSubcommand::Show => {}
        ThemeSubcommand::Toggle => {
            controller.toggle_theme();
        }
        ThemeSubcommand::Set { theme } => controller.set_theme_named(&theme)?,
    }

    println!("{}", serde_json::to_string(&ThemeChange::new(controller.theme()))?);
    Ok(())
}
