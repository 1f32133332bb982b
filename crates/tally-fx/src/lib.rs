//! # tally-fx: Exchange Rates for Tally POS
//!
//! Converts amounts between currencies using the European Central Bank's
//! daily reference rates.
//!
//! ## Modules
//!
//! - [`currency`] - Currency codes, rate tables and conversion
//! - [`ecb`] - ECB XML document parsing
//! - [`client`] - HTTP fetch and the shared rate cache
//! - [`config`] - Feed and cache configuration (`fx.toml`)
//! - [`error`] - FX error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use tally_core::Money;
//! use tally_fx::{CachedRates, CurrencyCode, FxConfig};
//!
//! # async fn run() -> tally_fx::FxResult<()> {
//! let config = FxConfig::load(None)?;
//! let rates = CachedRates::from_config(&config)?;
//!
//! let table = rates.rates().await?;
//! let dollars = table.convert_money(Money::from_cents(3630), CurrencyCode::Eur, CurrencyCode::Usd)?;
//! println!("36.30 EUR = {} USD", dollars);
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod client;
pub mod config;
pub mod currency;
pub mod ecb;
pub mod error;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use client::{CachedRates, EcbClient};
pub use config::{CacheSettings, FeedSettings, FxConfig};
pub use currency::{Currency, CurrencyCode, RateTable};
pub use ecb::{parse_daily, ECB_DAILY_URL};
pub use error::{FxError, FxResult};
