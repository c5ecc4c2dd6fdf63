//! Matching engine.
//!
//! ## Matching Rules
//!
//! - **Buy orders** match against asks (lowest price first)
//! - **Sell orders** match against bids (highest price first)
//! - Within a price level, the oldest order (lowest sequence) fills first
//! - Executions happen at the resting order's price
//! - **Limit orders** rest any unfilled remainder
//! - **Market orders** fill completely or are rejected untouched
//!
//! ## Example
//!
//! ```
//! use exchange_core::orderbook::OrderBook;
//! use exchange_core::types::{Order, Side};
//!
//! let mut book = OrderBook::new();
//! book.place_limit_order(10_000, Order::limit(0, Side::Sell, 20)).unwrap();
//!
//! let result = book.place_market_order(Order::market(0, Side::Buy, 10)).unwrap();
//! assert_eq!(result.fills.len(), 1);
//! assert_eq!(book.total_ask_volume(), 10);
//! ```

pub mod matcher;

pub use matcher::MatchResult;
