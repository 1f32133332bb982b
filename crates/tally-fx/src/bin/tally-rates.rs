//! # Exchange Rate Tool
//!
//! Fetches today's ECB reference rates and prints them, or converts an
//! amount between two currencies.
//!
//! ## Usage
//! ```bash
//! # Print the rate table
//! cargo run -p tally-fx --bin tally-rates
//!
//! # Convert 36.30 EUR to USD
//! cargo run -p tally-fx --bin tally-rates -- --convert 36.30 EUR USD
//!
//! # Use a specific config file
//! cargo run -p tally-fx --bin tally-rates -- --config ./fx.toml
//! ```

use rust_decimal::Decimal;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tally_fx::{CachedRates, CurrencyCode, FxConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tally=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_help() {
    println!("Tally POS Exchange Rates");
    println!();
    println!("Usage: tally-rates [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>               Config file (default: platform config dir/fx.toml)");
    println!("  -x, --convert <AMOUNT> <FROM> <TO> Convert an amount, e.g. 10 EUR USD");
    println!("  -h, --help                        Show this help message");
}

struct Conversion {
    amount: Decimal,
    source: CurrencyCode,
    target: CurrencyCode,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut conversion: Option<Conversion> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--convert" | "-x" => {
                if i + 3 >= args.len() {
                    return Err("--convert needs AMOUNT FROM TO".into());
                }
                conversion = Some(Conversion {
                    amount: Decimal::from_str(&args[i + 1])?,
                    source: args[i + 2].parse()?,
                    target: args[i + 3].parse()?,
                });
                i += 3;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    let config = FxConfig::load(config_path)?;
    info!(url = %config.feed.url, "Using rate feed");

    let rates = CachedRates::from_config(&config)?;
    let table = rates.rates().await?;

    match conversion {
        Some(Conversion {
            amount,
            source,
            target,
        }) => {
            let converted = table.convert(amount, source, target)?;
            println!("{} {} = {} {}", amount, source, converted.round_dp(4), target);
        }
        None => {
            match table.date() {
                Some(date) => println!("ECB reference rates for {}", date),
                None => println!("ECB reference rates"),
            }
            println!("{}", "-".repeat(24));
            for currency in table.currencies() {
                println!("{:<8}{:>16}", currency.name(), currency.rate());
            }
        }
    }

    Ok(())
}
