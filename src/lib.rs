//! # Exchange Core
//!
//! Price-time priority order book and matching engine for a single-asset
//! venue, with a thin multi-market facade on top.
//!
//! ## Architecture
//!
//! - **Types**: Order, Side, Fill and fixed-point helpers
//! - **OrderBook**: slab-backed book with one FIFO queue per price level
//! - **Engine**: limit and market order matching
//! - **Exchange**: one locked book per market
//! - **Api**: JSON request/response shapes for the binary adapter
//!
//! ## Design Principles
//!
//! 1. **Determinism**: identical inputs produce identical fills and state roots
//! 2. **No Floating Point**: the engine works in fixed-point (10^8 scaling);
//!    floats exist only in [`api`]
//! 3. **Pre-allocated Memory**: slab allocation for O(1) order operations
//! 4. **All-or-nothing calls**: a rejected operation leaves the book untouched
//!
//! ## Example
//!
//! ```
//! use exchange_core::{Order, OrderBook, Side};
//!
//! let mut book = OrderBook::new();
//! book.place_limit_order(100, Order::limit(0, Side::Sell, 5)).unwrap();
//! book.place_limit_order(100, Order::limit(0, Side::Sell, 8)).unwrap();
//!
//! let result = book.place_market_order(Order::market(0, Side::Buy, 10)).unwrap();
//! assert_eq!(result.fills.len(), 2);
//! assert_eq!(book.total_ask_volume(), 3);
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, Side, Fill
pub mod types;

/// Error types
pub mod error;

/// Order book: price levels and slab-based storage
pub mod orderbook;

/// Matching engine: limit and market order placement
pub mod engine;

/// Multi-market facade
pub mod exchange;

/// Startup configuration
pub mod config;

/// JSON request/response boundary
pub mod api;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::ExchangeConfig;
pub use engine::MatchResult;
pub use error::{EngineError, Result};
pub use exchange::Exchange;
pub use orderbook::{BookSide, Depth, OrderBook, PriceLevel};
pub use types::{Fill, Order, OrderKind, Side};
