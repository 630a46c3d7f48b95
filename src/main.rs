//! tradeledger - apply ledger commands to an in-memory trading account
//!
//! # Usage
//! ```sh
//! LEDGER_INITIAL_DEPOSIT=1000 cargo run -- --price AAPL=150 buy:AAPL:2 sell:AAPL:1
//! ```
//!
//! # Environment Variables
//! - `LEDGER_OWNER` - Owner id of the account (default: default)
//! - `LEDGER_INITIAL_DEPOSIT` - Opening cash (default: 0)
//! - `LEDGER_PRICES_FILE` - TOML price table
//! - `LOG_LEVEL` - Default log directive (default: info)
//! - `LOG_PRETTY` - Multi-line log output (default: false)

use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tradeledger::application::commands::LedgerCommand;
use tradeledger::config::Config;
use tradeledger::domain::trading::account::Account;
use tradeledger::infrastructure::price_table::StaticPriceOracle;

#[derive(Parser, Debug)]
#[command(name = "tradeledger", version, about = "Single-user trading account ledger")]
struct Args {
    /// Account owner (overrides LEDGER_OWNER)
    #[arg(long)]
    owner: Option<String>,

    /// Opening cash (overrides LEDGER_INITIAL_DEPOSIT)
    #[arg(long)]
    initial_deposit: Option<Decimal>,

    /// TOML price table (overrides LEDGER_PRICES_FILE)
    #[arg(long)]
    prices: Option<PathBuf>,

    /// Extra or overriding price, e.g. --price AAPL=150.00
    #[arg(long = "price", value_parser = parse_price)]
    price_overrides: Vec<(String, Decimal)>,

    /// Stop at the first rejected command
    #[arg(long)]
    strict: bool,

    /// Commands: deposit:AMOUNT, withdraw:AMOUNT, buy:SYMBOL:QTY, sell:SYMBOL:QTY
    commands: Vec<LedgerCommand>,
}

fn parse_price(raw: &str) -> Result<(String, Decimal), String> {
    let (symbol, price) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected SYMBOL=PRICE, got '{}'", raw))?;
    let price = Decimal::from_str(price.trim())
        .map_err(|e| format!("invalid price '{}': {}", price, e))?;
    if price <= Decimal::ZERO {
        return Err(format!("price for {} must be positive", symbol));
    }
    Ok((symbol.trim().to_uppercase(), price))
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    // Logs go to stderr so stdout stays parseable JSON
    if config.log_pretty {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .pretty(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env()?;
    init_tracing(&config);

    info!("tradeledger {} starting...", env!("CARGO_PKG_VERSION"));

    let oracle = match args.prices.as_ref().or(config.prices_file.as_ref()) {
        Some(path) => StaticPriceOracle::from_file(path)?,
        None => StaticPriceOracle::new(),
    };
    for (symbol, price) in &args.price_overrides {
        oracle.set_price(symbol, *price);
    }

    let owner = args.owner.clone().unwrap_or(config.owner.clone());
    let initial_deposit = args.initial_deposit.unwrap_or(config.initial_deposit);
    let mut account = Account::new(owner, initial_deposit, Arc::new(oracle))
        .context("Failed to open account")?;

    let mut rejected = 0usize;
    for command in &args.commands {
        match command.apply(&mut account) {
            Ok(tx) => info!("Applied {}: {}", command, tx),
            Err(e) if args.strict => {
                return Err(e).with_context(|| format!("Command {} rejected", command));
            }
            Err(e) => {
                rejected += 1;
                warn!("Skipped {}: {}", command, e);
            }
        }
    }

    account.verify_ledger()?;
    let summary = account.summary().context("Failed to value account")?;
    let report = serde_json::json!({
        "summary": summary,
        "rejected_commands": rejected,
        "transactions": account.transactions(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
