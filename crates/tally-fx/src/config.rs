//! # FX Configuration
//!
//! ## Load Order (later overrides earlier)
//! ```text
//! ┌──────────────┐   ┌──────────────────────┐   ┌─────────────────────┐
//! │   Defaults   │──►│ fx.toml (config dir  │──►│ TALLY_FX_* env vars │──► validate()
//! │ (ECB daily)  │   │  or explicit path)   │   │                     │
//! └──────────────┘   └──────────────────────┘   └─────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::ecb::ECB_DAILY_URL;
use crate::error::{FxError, FxResult};

// =============================================================================
// Feed Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSettings {
    /// Daily reference rate document.
    #[serde(default = "default_url")]
    pub url: String,

    /// Whole-request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_url() -> String {
    ECB_DAILY_URL.to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("tally-fx/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

// =============================================================================
// Cache Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// How long a fetched table is served before refetching. The ECB
    /// publishes once per working day.
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
}

fn default_ttl() -> u64 {
    3600
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
        }
    }
}

// =============================================================================
// FX Config
// =============================================================================

/// Exchange rate configuration.
///
/// ## Example TOML
/// ```toml
/// [feed]
/// url = "https://www.ecb.europa.eu/stats/eurofxref/eurofxref-daily.xml"
/// timeout_secs = 10
///
/// [cache]
/// ttl_secs = 3600
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FxConfig {
    #[serde(default)]
    pub feed: FeedSettings,

    #[serde(default)]
    pub cache: CacheSettings,
}

impl FxConfig {
    /// Loads configuration from file, environment, and defaults.
    pub fn load(config_path: Option<PathBuf>) -> FxResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading FX config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load FX config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> FxResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| FxError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| FxError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| FxError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "FX config saved");
        Ok(())
    }

    pub fn validate(&self) -> FxResult<()> {
        let url = &self.feed.url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(FxError::InvalidConfig(format!(
                "Feed URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.feed.timeout_secs == 0 {
            return Err(FxError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `TALLY_FX_*` overrides, reading each variable through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("TALLY_FX_URL") {
            debug!(url = %url, "Overriding feed URL from environment");
            self.feed.url = url;
        }

        if let Some(timeout) = lookup("TALLY_FX_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(t) => self.feed.timeout_secs = t,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric TALLY_FX_TIMEOUT_SECS"),
            }
        }

        if let Some(ttl) = lookup("TALLY_FX_CACHE_TTL_SECS") {
            match ttl.parse::<u64>() {
                Ok(t) => self.cache.ttl_secs = t,
                Err(_) => warn!(value = %ttl, "Ignoring non-numeric TALLY_FX_CACHE_TTL_SECS"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tally", "pos")
            .map(|dirs| dirs.config_dir().join("fx.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("tally-fx-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_default_config() {
        let config = FxConfig::default();
        assert_eq!(config.feed.url, ECB_DAILY_URL);
        assert_eq!(config.feed.timeout_secs, 10);
        assert!(config.feed.user_agent.starts_with("tally-fx/"));
        assert_eq!(config.cache.ttl_secs, 3600);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = FxConfig::default();

        config.feed.url = "ftp://rates.example".to_string();
        assert!(matches!(config.validate(), Err(FxError::InvalidConfig(_))));

        config.feed.url = "http://localhost:8080/rates.xml".to_string();
        config.feed.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: FxConfig = toml::from_str("[cache]\nttl_secs = 60\n").unwrap();
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.feed, FeedSettings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip.toml");
        let mut config = FxConfig::default();
        config.feed.url = "https://rates.example/daily.xml".to_string();
        config.cache.ttl_secs = 120;

        config.save(Some(path.clone())).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[feed]"));
        assert!(contents.contains("[cache]"));

        let loaded = FxConfig::load(Some(path.clone())).unwrap();
        assert_eq!(loaded.cache.ttl_secs, 120);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_file_falls_back_to_default() {
        let path = temp_path("broken.toml");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[feed\nurl = ").unwrap();

        assert!(matches!(
            FxConfig::load(Some(path.clone())),
            Err(FxError::ConfigLoadFailed(_))
        ));
        assert_eq!(FxConfig::load_or_default(Some(path.clone())), FxConfig::default());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = FxConfig::default();
        config.apply_overrides(vars(&[
            ("TALLY_FX_URL", "http://127.0.0.1:9000/daily.xml"),
            ("TALLY_FX_TIMEOUT_SECS", "3"),
            ("TALLY_FX_CACHE_TTL_SECS", "0"),
        ]));

        assert_eq!(config.feed.url, "http://127.0.0.1:9000/daily.xml");
        assert_eq!(config.feed.timeout_secs, 3);
        assert_eq!(config.cache.ttl_secs, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_numeric_overrides_are_ignored() {
        let mut config = FxConfig::default();
        config.apply_overrides(vars(&[
            ("TALLY_FX_TIMEOUT_SECS", "soon"),
            ("TALLY_FX_CACHE_TTL_SECS", "-5"),
        ]));

        assert_eq!(config.feed.timeout_secs, 10);
        assert_eq!(config.cache.ttl_secs, 3600);
        assert_eq!(config.feed.url, ECB_DAILY_URL);
    }

    #[test]
    fn test_override_can_make_config_invalid() {
        let mut config = FxConfig::default();
        config.apply_overrides(vars(&[("TALLY_FX_URL", "file:///tmp/rates.xml")]));
        assert!(matches!(config.validate(), Err(FxError::InvalidConfig(_))));

        let mut config = FxConfig::default();
        config.apply_overrides(vars(&[("TALLY_FX_TIMEOUT_SECS", "0")]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = FxConfig::default();
        config.apply_overrides(vars(&[]));
        assert_eq!(config, FxConfig::default());
    }
}
