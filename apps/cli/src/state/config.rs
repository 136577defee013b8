//! # Configuration State
//!
//! Settings resolved once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`STRIDE_*`)
//! 2. Defaults (this file)
//!
//! ## Environment Variables
//! | Variable                   | Default                    |
//! |----------------------------|----------------------------|
//! | `STRIDE_DB_PATH`           | platform data dir          |
//! | `STRIDE_BACKEND`           | `sqlite`                   |
//! | `STRIDE_API_URL`           | `http://localhost:3333`    |
//! | `STRIDE_CART_KEY`          | `@RocketShoes:cart`        |
//! | `STRIDE_HTTP_TIMEOUT_SECS` | `10`                       |
//! | `STRIDE_CURRENCY_SYMBOL`   | `R$`                       |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use stride_core::{Money, DEFAULT_CART_KEY};
use stride_db::DB_PATH_ENV;
use tracing::warn;

/// Where stock and catalog lookups go. The cart snapshot always lives in
/// SQLite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Local `products` and `stock` tables
    #[default]
    Sqlite,

    /// Storefront REST API at `api_url`
    Http,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "db" => Ok(Backend::Sqlite),
            "http" | "api" => Ok(Backend::Http),
            other => Err(format!("unknown backend '{}'", other)),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// SQLite file override. `None` means the platform data directory.
    pub database_path: Option<PathBuf>,

    pub backend: Backend,

    /// Storefront API base URL (HTTP backend only)
    pub api_url: String,

    /// Storage key of the cart snapshot
    pub cart_key: String,

    /// Per-request timeout for the storefront API
    pub http_timeout_secs: u64,

    /// Currency symbol (for display)
    pub currency_symbol: String,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            database_path: None,
            backend: Backend::Sqlite,
            api_url: "http://localhost:3333".to_string(),
            cart_key: DEFAULT_CART_KEY.to_string(),
            http_timeout_secs: 10,
            currency_symbol: "R$".to_string(),
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable
    /// source. Unparseable values are logged and the default is kept.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(path) = lookup(DB_PATH_ENV) {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(backend) = lookup("STRIDE_BACKEND") {
            match backend.parse() {
                Ok(backend) => config.backend = backend,
                Err(err) => warn!(%err, "Ignoring STRIDE_BACKEND"),
            }
        }

        if let Some(url) = lookup("STRIDE_API_URL") {
            config.api_url = url;
        }

        if let Some(key) = lookup("STRIDE_CART_KEY") {
            config.cart_key = key;
        }

        if let Some(secs) = lookup("STRIDE_HTTP_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) if secs > 0 => config.http_timeout_secs = secs,
                _ => warn!(value = %secs, "Ignoring STRIDE_HTTP_TIMEOUT_SECS"),
            }
        }

        if let Some(symbol) = lookup("STRIDE_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        config
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(17990), "R$179.90");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        Money::from_cents(cents).format(&self.currency_symbol)
    }
}
