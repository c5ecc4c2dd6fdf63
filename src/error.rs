//! Error types.
//!
//! Every rejection is a value, never a panic. A call that returns an
//! [`EngineError`] has left the book exactly as it found it.

use thiserror::Error;

/// Errors returned by book, engine and exchange operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Zero size, zero price, or a malformed boundary value
    #[error("invalid order: {reason}")]
    InvalidOrder { reason: &'static str },

    /// No book is registered under this market key
    #[error("market not found: {0}")]
    MarketNotFound(String),

    /// Market order larger than the opposite side's resting volume
    #[error("insufficient liquidity: requested {requested}, available {available}")]
    InsufficientLiquidity { requested: u64, available: u64 },

    /// Unknown or already-removed order id
    #[error("order not found: {0}")]
    OrderNotFound(u64),

    /// Caller-assigned id that already rests in the book
    #[error("duplicate order id: {0}")]
    DuplicateOrderId(u64),
}

impl EngineError {
    pub(crate) fn invalid(reason: &'static str) -> Self {
        EngineError::InvalidOrder { reason }
    }

    /// Caller-visible status class for the request layer
    pub fn status_code(&self) -> u16 {
        match self {
            EngineError::InvalidOrder { .. } => 400,
            EngineError::MarketNotFound(_) | EngineError::OrderNotFound(_) => 404,
            EngineError::DuplicateOrderId(_) => 409,
            EngineError::InsufficientLiquidity { .. } => 422,
        }
    }
}

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config lists no markets")]
    NoMarkets,
}

pub type Result<T> = std::result::Result<T, EngineError>;
