//! Multi-market facade.
//!
//! `Exchange` owns one [`OrderBook`] per market, each behind its own
//! `parking_lot::Mutex`. Every operation on a market, reads included, runs
//! while holding that market's lock, so a placement or cancel is never
//! observed half-applied and no two mutations of the same book interleave.
//! Different markets never contend.
//!
//! The set of markets is fixed at construction (plus [`Exchange::add_market`]
//! with `&mut self`), so the map itself needs no lock.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::config::ExchangeConfig;
use crate::engine::MatchResult;
use crate::error::{EngineError, Result};
use crate::orderbook::{Depth, OrderBook};
use crate::types::{Order, OrderKind, Side};

/// Order books keyed by market name
#[derive(Debug, Default)]
pub struct Exchange {
    books: HashMap<String, Mutex<OrderBook>>,
    order_capacity: usize,
}

impl Exchange {
    /// Create an exchange with the given markets
    ///
    /// ```
    /// use exchange_core::exchange::Exchange;
    /// use exchange_core::types::Side;
    ///
    /// let exchange = Exchange::new(["ETH"], 1_000);
    /// exchange.place_limit_order("ETH", Side::Sell, 10_000, 20).unwrap();
    ///
    /// let result = exchange.place_market_order("ETH", Side::Buy, 10).unwrap();
    /// assert_eq!(result.fills[0].price, 10_000);
    /// assert!(exchange.depth("BTC").is_err());
    /// ```
    pub fn new<I, S>(markets: I, order_capacity: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut exchange = Self {
            books: HashMap::new(),
            order_capacity,
        };
        for market in markets {
            exchange.add_market(market);
        }
        exchange
    }

    pub fn from_config(config: &ExchangeConfig) -> Self {
        Self::new(config.markets.iter().cloned(), config.order_capacity)
    }

    /// Register a market; returns false if it already exists
    pub fn add_market(&mut self, market: impl Into<String>) -> bool {
        let market = market.into();
        if self.books.contains_key(&market) {
            return false;
        }
        info!(market = %market, capacity = self.order_capacity, "market opened");
        self.books
            .insert(market, Mutex::new(OrderBook::with_capacity(self.order_capacity)));
        true
    }

    /// Market names, sorted
    pub fn markets(&self) -> Vec<&str> {
        let mut markets: Vec<&str> = self.books.keys().map(String::as_str).collect();
        markets.sort_unstable();
        markets
    }

    /// Run `f` with exclusive access to a market's book
    pub fn with_book<T>(&self, market: &str, f: impl FnOnce(&mut OrderBook) -> T) -> Result<T> {
        let book = self
            .books
            .get(market)
            .ok_or_else(|| EngineError::MarketNotFound(market.to_string()))?;
        let mut guard = book.lock();
        Ok(f(&mut *guard))
    }

    /// Place a limit order; any unfilled remainder rests at `price`
    pub fn place_limit_order(
        &self,
        market: &str,
        side: Side,
        price: u64,
        size: u64,
    ) -> Result<MatchResult> {
        let order = Order::new(0, side, OrderKind::Limit, size, now_nanos());
        let result = self.with_book(market, |book| book.place_limit_order(price, order))??;
        debug!(
            market,
            order_id = result.order_id,
            fills = result.fills.len(),
            "limit order handled"
        );
        Ok(result)
    }

    /// Place a market order; fills completely or fails without effect
    pub fn place_market_order(&self, market: &str, side: Side, size: u64) -> Result<MatchResult> {
        let order = Order::new(0, side, OrderKind::Market, size, now_nanos());
        let result = self.with_book(market, |book| book.place_market_order(order))??;
        debug!(
            market,
            order_id = result.order_id,
            fills = result.fills.len(),
            "market order handled"
        );
        Ok(result)
    }

    /// Cancel a resting order, returning it with its remaining size
    pub fn cancel_order(&self, market: &str, order_id: u64) -> Result<Order> {
        self.with_book(market, |book| book.cancel_order(order_id))?
    }

    /// Point-in-time full-depth snapshot
    pub fn depth(&self, market: &str) -> Result<Depth> {
        self.with_book(market, |book| book.depth())
    }

    pub fn best_bid(&self, market: &str) -> Result<Option<u64>> {
        self.with_book(market, |book| book.best_bid())
    }

    pub fn best_ask(&self, market: &str) -> Result<Option<u64>> {
        self.with_book(market, |book| book.best_ask())
    }
}

/// Wall-clock nanoseconds since the Unix epoch, 0 if the clock is before it
fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
