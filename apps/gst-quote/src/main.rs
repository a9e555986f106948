//! # gst-quote
//!
//! Command-line GST quotes for the Tripund storefront.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  args ──► QuoteConfig::load ──► SettingsService ──► tripund-core       │
//! │                (toml + env)        (cached)          │                  │
//! │                                                      ▼                  │
//! │                                           text table or --json          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```text
//! gst-quote amount 118 --state KA
//! gst-quote cart 590:2 300 --state MH
//! gst-quote invoice 590:2 300 --state TN --json
//! gst-quote settings --subtotal 4200
//! gst-quote states
//! ```

mod config;
mod error;
mod input;
mod output;

use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tripund_core::invoice::{build_tax_rows, InvoiceLine, InvoiceTaxRow, TaxSummary};
use tripund_core::jurisdiction;
use tripund_core::{
    quote, quote_cart, LineItem, Money, PublicSettings, SettingsService, ShippingSpeed, TaxRate,
};

use crate::config::{ConfigSettingsSource, QuoteConfig};
use crate::input::{parse_line_item, parse_rate, resolve_buyer, resolve_state};
use crate::output::CheckoutCharges;

// =============================================================================
// Arguments
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "gst-quote", version, about = "Split GST-inclusive prices into taxable value and GST")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file (default: quote.toml in the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seller's home state code, overriding the config
    #[arg(long, global = true)]
    home: Option<String>,

    /// GST rate in percent, overriding the settings
    #[arg(long, global = true, value_parser = parse_rate)]
    rate: Option<TaxRate>,

    /// Output as JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split one GST-inclusive amount (rupees)
    Amount {
        #[arg(value_parser = Money::parse_rupees, allow_negative_numbers = true)]
        amount: Money,

        /// Buyer's state code; omit if not chosen yet
        #[arg(short, long)]
        state: Option<String>,
    },

    /// Split the total of a cart given as PRICE:QTY items
    Cart {
        #[arg(value_parser = parse_line_item, required = true)]
        items: Vec<LineItem>,

        /// Buyer's state code; omit if not chosen yet
        #[arg(short, long)]
        state: Option<String>,
    },

    /// Per-line invoice tax rows for PRICE:QTY items
    Invoice {
        #[arg(value_parser = parse_line_item, required = true)]
        items: Vec<LineItem>,

        /// Buyer's state code
        #[arg(short, long)]
        state: String,
    },

    /// Show the effective pricing settings
    Settings {
        /// Order subtotal (rupees) to price shipping, discount and COD for
        #[arg(long, value_parser = Money::parse_rupees)]
        subtotal: Option<Money>,

        #[arg(long, value_enum, default_value_t = SpeedArg::Standard)]
        speed: SpeedArg,
    },

    /// List state and union territory codes
    States,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum SpeedArg {
    #[default]
    Standard,
    Express,
}

impl From<SpeedArg> for ShippingSpeed {
    fn from(arg: SpeedArg) -> Self {
        match arg {
            SpeedArg::Standard => ShippingSpeed::Standard,
            SpeedArg::Express => ShippingSpeed::Express,
        }
    }
}

// =============================================================================
// Entry Point
// =============================================================================

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = QuoteConfig::load(cli.config.clone()).context("loading configuration")?;
    if let Some(ref home) = cli.home {
        config.seller.home_state = home.clone();
        config.validate()?;
    }

    let mut settings_service = SettingsService::new(ConfigSettingsSource::new(cli.config.clone()));
    let settings = settings_service.current(Utc::now());
    let rate = cli.rate.unwrap_or(settings.payment.tax_rate);

    info!(home = config.home_state(), %rate, "Configuration loaded");

    let ctx = Context {
        config,
        settings,
        rate,
        json: cli.json,
    };
    let rendered = run(&cli.command, &ctx)?;
    print!("{}", rendered);
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so `--json` output stays clean. `RUST_LOG=debug` shows
/// each breakdown the calculator computes.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// =============================================================================
// Commands
// =============================================================================

struct Context {
    config: QuoteConfig,
    settings: PublicSettings,
    rate: TaxRate,
    json: bool,
}

#[derive(Serialize)]
struct InvoiceOutput<'a> {
    seller_state: &'a str,
    seller_gstin: Option<&'a str>,
    buyer_state: &'a str,
    buyer_gst_code: &'static str,
    rows: &'a [InvoiceTaxRow],
    summary: TaxSummary,
}

#[derive(Serialize)]
struct SettingsOutput<'a> {
    settings: &'a PublicSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    checkout: Option<CheckoutCharges>,
}

fn run(command: &Command, ctx: &Context) -> anyhow::Result<String> {
    let home = ctx.config.home_state();

    match command {
        Command::Amount { amount, state } => {
            let buyer = resolve_buyer(state.as_deref())?;
            let q = quote(*amount, &buyer, home, ctx.rate)?;
            emit(ctx, &q, || output::render_quote(&q))
        }
        Command::Cart { items, state } => {
            let buyer = resolve_buyer(state.as_deref())?;
            let q = quote_cart(items, &buyer, home, ctx.rate)?;
            emit(ctx, &q, || output::render_quote(&q))
        }
        Command::Invoice { items, state } => {
            let buyer_state = resolve_state(state)?;
            let lines: Vec<InvoiceLine> = items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    InvoiceLine::new(
                        format!("line-{}", i + 1),
                        format!("Item {}", i + 1),
                        item.quantity,
                        item.price,
                    )
                })
                .collect();

            let rows = build_tax_rows(&lines, buyer_state, home, ctx.rate)?;
            let summary = TaxSummary::from_rows(&rows)?;
            debug!(final_amount = summary.final_amount.paise(), "Invoice summary");

            let buyer_gst_code = jurisdiction::find(buyer_state)
                .map_or(jurisdiction::UNKNOWN_GST_CODE, |j| j.gst_code);
            let out = InvoiceOutput {
                seller_state: home,
                seller_gstin: ctx.config.seller.gstin.as_deref(),
                buyer_state,
                buyer_gst_code,
                rows: &rows,
                summary,
            };
            emit(ctx, &out, || output::render_invoice(&rows, &summary))
        }
        Command::Settings { subtotal, speed } => {
            let checkout = subtotal.map(|subtotal| CheckoutCharges {
                subtotal,
                shipping_fee: ctx.settings.shipping_fee(subtotal, (*speed).into()),
                prepaid_discount: ctx.settings.prepaid_discount(subtotal),
                cod_available: ctx.settings.cod_available(subtotal),
            });
            let text = output::render_settings(&ctx.settings, checkout.as_ref());
            let out = SettingsOutput {
                settings: &ctx.settings,
                checkout,
            };
            emit(ctx, &out, || text)
        }
        Command::States => emit(ctx, &jurisdiction::ALL, output::render_states),
    }
}

/// JSON when `--json` is set, otherwise the text rendering.
fn emit<T: Serialize + ?Sized>(
    ctx: &Context,
    value: &T,
    text: impl FnOnce() -> String,
) -> anyhow::Result<String> {
    if ctx.json {
        let mut json = serde_json::to_string_pretty(value)?;
        json.push('\n');
        Ok(json)
    } else {
        Ok(text())
    }
}
