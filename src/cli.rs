//! CLI module - Command-line interface definitions and handlers

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

use cartledger::config::{Config, Verbosity};
use cartledger::core::model::CatalogItem;
use cartledger::core::render::{CartView, Renderer};
use cartledger::persist::FileStore;
use cartledger::session::CartSession;
use cartledger::settings::{load_settings, save_settings};

/// cartledger - keep a cart of line items with an exact running total.
#[derive(Parser, Debug)]
#[command(name = "cartledger")]
#[command(
    author,
    version,
    about,
    long_about = r#"cartledger keeps a cart under ROOT/.cartledger and prints it after every command.

Output formats:
- jsonl: one JSON object per line item, then a summary line
- json: a single JSON object
- md: human-friendly Markdown table
- raw: tab-separated lines (unstable; intended for debugging)

Examples:
    cartledger add pho --price 10 --attr name=Pho
    cartledger set pho 3
    cartledger remove pho
    cartledger show --format md
"#
)]
pub struct Cli {
    /// Root directory holding the .cartledger state directory.
    #[arg(long, global = true, default_value = ".", env = "CARTLEDGER_ROOT", value_name = "ROOT")]
    pub root: PathBuf,

    /// Output format (jsonl/json/md/raw).
    #[arg(long, global = true, default_value = "jsonl", env = "CARTLEDGER_FORMAT", value_name = "FORMAT")]
    pub format: String,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log debug diagnostics to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add one unit of an item; an existing line is incremented.
    Add {
        /// Item identifier.
        #[arg(value_name = "ID")]
        id: String,

        /// Unit price (decimal, must not be negative).
        #[arg(long, allow_negative_numbers = true, value_name = "PRICE")]
        price: Decimal,

        /// Display field copied onto the line (repeatable). Values that parse
        /// as JSON are stored as JSON, anything else as a string.
        #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = parse_attr)]
        attrs: Vec<(String, serde_json::Value)>,
    },

    /// Remove a line; absent ids are ignored.
    Remove {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Set the quantity of a line; 0 removes it.
    Set {
        #[arg(value_name = "ID")]
        id: String,

        #[arg(allow_negative_numbers = true, value_name = "QTY")]
        quantity: i64,
    },

    /// Remove every line.
    Clear,

    /// Print the cart.
    Show,

    /// Print the number of units in the cart.
    Count,

    /// Clear the cart and delete its stored snapshot.
    Reset,

    /// Show or change app settings.
    Settings {
        #[command(subcommand)]
        action: SettingsCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Print the current settings as JSON.
    Show,

    /// Change one or more settings.
    Set {
        #[arg(long, value_name = "LANG")]
        language: Option<String>,

        #[arg(long, value_name = "CODE")]
        currency: Option<String>,

        #[arg(long, value_name = "ID", conflicts_with = "clear_restaurant")]
        restaurant: Option<String>,

        #[arg(long)]
        clear_restaurant: bool,
    },
}

/// Parse `key=value`, keeping JSON-looking values as JSON
fn parse_attr(s: &str) -> Result<(String, serde_json::Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty attribute key in '{}'", s));
    }
    if matches!(key, "id" | "price" | "quantity") {
        return Err(format!("'{}' is managed by the ledger", key));
    }
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

pub fn config_from(cli: &Cli) -> Config {
    Config::new(
        &cli.root,
        &cli.format,
        cli.pretty,
        Verbosity::from_flags(cli.quiet, cli.verbose),
    )
}

pub fn run(cli: Cli, config: &Config) -> Result<()> {
    debug!(root = ?config.root, state_dir = ?config.state_dir, "resolved configuration");

    match cli.command {
        Commands::Settings { action } => run_settings(action, config),
        Commands::Count => {
            let session = open_session(config)?;
            println!("{}", session.item_count());
            Ok(())
        }
        command => run_cart(command, config),
    }
}

fn open_session(config: &Config) -> Result<CartSession<FileStore>> {
    CartSession::open(config.store())
        .with_context(|| format!("Failed to open cart in {:?}", config.state_dir))
}

fn run_cart(command: Commands, config: &Config) -> Result<()> {
    let mut session = open_session(config)?;

    match command {
        Commands::Add { id, price, attrs } => {
            let item = attrs
                .into_iter()
                .fold(CatalogItem::new(id, price), |item, (k, v)| {
                    item.with_attribute(k, v)
                });
            session.add_item(item).context("Failed to add item")?;
        }
        Commands::Remove { id } => {
            session.remove_item(&id).context("Failed to remove item")?;
        }
        Commands::Set { id, quantity } => {
            session
                .update_quantity(&id, quantity)
                .context("Failed to update quantity")?;
        }
        Commands::Clear => {
            session.clear_cart().context("Failed to clear cart")?;
        }
        Commands::Reset => {
            session.discard().context("Failed to reset cart")?;
        }
        Commands::Show => {}
        Commands::Count | Commands::Settings { .. } => bail!("not a cart command"),
    }

    let settings = load_settings(session.store()).context("Failed to load settings")?;
    let renderer = Renderer::with_config(config.render);
    let view = CartView::new(session.ledger(), &settings.currency);
    renderer
        .render_to(&view, std::io::stdout().lock())
        .context("Failed to write output")?;
    Ok(())
}

fn run_settings(action: SettingsCommands, config: &Config) -> Result<()> {
    let mut store = config.store();
    let mut settings = load_settings(&store).context("Failed to load settings")?;

    if let SettingsCommands::Set {
        language,
        currency,
        restaurant,
        clear_restaurant,
    } = action
    {
        if let Some(language) = language {
            settings.set_language(&language)?;
        }
        if let Some(currency) = currency {
            settings.set_currency(&currency)?;
        }
        if clear_restaurant {
            settings.set_restaurant_id(None);
        } else if restaurant.is_some() {
            settings.set_restaurant_id(restaurant);
        }
        save_settings(&mut store, &settings).context("Failed to save settings")?;
    }

    let json = if config.render.pretty {
        serde_json::to_string_pretty(&settings)?
    } else {
        serde_json::to_string(&settings)?
    };
    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", json)?;
    Ok(())
}
