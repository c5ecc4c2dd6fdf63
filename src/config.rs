//! Exchange configuration.
//!
//! Loaded from a JSON file; every field has a default so a partial file (or
//! no file at all) is valid. Command-line flags override file values.
//!
//! ```json
//! { "markets": ["ETH", "BTC"], "order_capacity": 50000, "log_level": "debug" }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings for building an [`Exchange`](crate::exchange::Exchange)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Markets to open at startup
    pub markets: Vec<String>,

    /// Pre-allocated resting-order slots per book
    pub order_capacity: usize,

    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            markets: vec!["ETH".to_string()],
            order_capacity: 10_000,
            log_level: "info".to_string(),
        }
    }
}

impl ExchangeConfig {
    /// Parse a config from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()
    }

    /// Read and parse a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.markets.is_empty() {
            return Err(ConfigError::NoMarkets);
        }
        Ok(self)
    }
}
