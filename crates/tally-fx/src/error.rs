//! # FX Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        FX Error Categories                              │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │     Feed        │  │     Conversion          │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Http           │  │  UnknownCurrency        │ │
//! │  │  ConfigLoad..   │  │  Xml            │  │  DuplicateCurrency      │ │
//! │  │  ConfigSave..   │  │  InvalidRate    │  │  Overflow               │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use quick_xml::events::attributes::AttrError;
use thiserror::Error;

/// Result type alias for FX operations.
pub type FxResult<T> = Result<T, FxError>;

#[derive(Debug, Error)]
pub enum FxError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid FX configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Feed Errors
    // =========================================================================
    /// Request failed, timed out, or returned a non-success status.
    #[error("Rate feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed body is not the XML we expect.
    #[error("Malformed rate document: {0}")]
    Xml(String),

    /// A rate that is not a positive decimal.
    #[error("Invalid rate for {currency}: {rate}")]
    InvalidRate { currency: String, rate: String },

    // =========================================================================
    // Conversion Errors
    // =========================================================================
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Currency {0} is already in the rate table")]
    DuplicateCurrency(String),

    #[error("Conversion of {value} from {source_code} to {target_code} overflows")]
    Overflow {
        value: String,
        source_code: String,
        target_code: String,
    },
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<quick_xml::Error> for FxError {
    fn from(err: quick_xml::Error) -> Self {
        FxError::Xml(err.to_string())
    }
}

impl From<AttrError> for FxError {
    fn from(err: AttrError) -> Self {
        FxError::Xml(err.to_string())
    }
}

impl From<std::io::Error> for FxError {
    fn from(err: std::io::Error) -> Self {
        FxError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for FxError {
    fn from(err: toml::de::Error) -> Self {
        FxError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for FxError {
    fn from(err: toml::ser::Error) -> Self {
        FxError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl FxError {
    /// Returns true if fetching again later may succeed.
    ///
    /// Only network-level failures qualify; a malformed document or a bad
    /// configuration will fail the same way on every attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            FxError::Http(err) => {
                err.is_timeout()
                    || err.is_connect()
                    || err.status().map_or(false, |s| s.is_server_error())
            }
            _ => false,
        }
    }
}
