//! Price-time priority matching.
//!
//! One sweep routine serves both sides and both order kinds: the aggressor
//! walks the opposite side from the best price outward, draining each level
//! in FIFO order, until it is filled or (for limit orders) the next level no
//! longer crosses its limit price. Drained levels are evicted as the sweep
//! leaves them.
//!
//! Every check happens before the first mutation, so a rejected order
//! leaves the book untouched. Once a sweep starts it runs to completion.

use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::orderbook::OrderBook;
use crate::types::{Fill, Order, OrderKind, Side};

/// Outcome of one placement call.
///
/// Returned by value and never stored by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// ID of the aggressing order (assigned by the book if it was 0)
    pub order_id: u64,

    /// Executions in the order they happened
    pub fills: Vec<Fill>,

    /// Unfilled size of the aggressor after matching
    pub remaining: u64,

    /// Whether a resting remainder was added to the book
    pub rested: bool,
}

impl MatchResult {
    /// Total quantity executed
    pub fn filled(&self) -> u64 {
        self.fills.iter().map(|fill| fill.size).sum()
    }

    pub fn is_fully_filled(&self) -> bool {
        self.remaining == 0
    }
}

/// True if a taker on `side` with `limit` may execute at `level_price`
#[inline]
fn crosses(side: Side, limit: u64, level_price: u64) -> bool {
    match side {
        Side::Buy => level_price <= limit,
        Side::Sell => level_price >= limit,
    }
}

impl OrderBook {
    /// Match a limit order, resting any remainder at `price`
    ///
    /// Only opposite levels that cross `price` are touched: asks at or below
    /// it for a bid, bids at or above it for an ask.
    ///
    /// # Errors
    ///
    /// - `InvalidOrder` if the size or the price is zero
    /// - `DuplicateOrderId` if a caller-assigned id is already resting
    /// - `InvalidOrder` if resting the full size would overflow the side's
    ///   total volume
    ///
    /// ```
    /// use exchange_core::orderbook::OrderBook;
    /// use exchange_core::types::{Order, Side};
    ///
    /// let mut book = OrderBook::new();
    /// book.place_limit_order(10_000, Order::limit(0, Side::Sell, 20)).unwrap();
    ///
    /// let result = book.place_limit_order(10_500, Order::limit(0, Side::Buy, 30)).unwrap();
    /// assert_eq!(result.filled(), 20);
    /// assert_eq!(result.fills[0].price, 10_000);
    /// assert!(result.rested);
    /// assert_eq!(book.best_bid(), Some(10_500));
    /// ```
    pub fn place_limit_order(&mut self, price: u64, mut order: Order) -> Result<MatchResult> {
        if order.remaining == 0 {
            warn!(order_id = order.id, "limit order rejected: zero size");
            return Err(EngineError::invalid("size must be positive"));
        }
        if price == 0 {
            warn!(order_id = order.id, "limit order rejected: zero price");
            return Err(EngineError::invalid("price must be positive"));
        }
        self.check_unique(order.id)?;
        if !self.side(order.side()).has_room_for(order.remaining) {
            warn!(
                order_id = order.id,
                side = ?order.side(),
                size = order.remaining,
                "limit order rejected: resting volume would overflow"
            );
            return Err(EngineError::invalid("size would overflow resting volume"));
        }

        order.kind_raw = OrderKind::Limit.to_u8();
        self.admit(&mut order);

        let fills = self.sweep(&mut order, Some(price));
        let rested = order.remaining > 0;
        let result = MatchResult {
            order_id: order.id,
            fills,
            remaining: order.remaining,
            rested,
        };

        if rested {
            self.rest(price, order);
        }

        debug!(
            order_id = result.order_id,
            price,
            fills = result.fills.len(),
            filled = result.filled(),
            rested,
            "limit order placed"
        );
        Ok(result)
    }

    /// Match a market order against the opposite side
    ///
    /// The order either executes in full or is rejected before anything
    /// changes; a market order never rests.
    ///
    /// # Errors
    ///
    /// - `InvalidOrder` if the size is zero
    /// - `DuplicateOrderId` if a caller-assigned id is already resting
    /// - `InsufficientLiquidity` if the opposite side holds less volume
    ///   than the order size
    pub fn place_market_order(&mut self, mut order: Order) -> Result<MatchResult> {
        if order.remaining == 0 {
            warn!(order_id = order.id, "market order rejected: zero size");
            return Err(EngineError::invalid("size must be positive"));
        }
        self.check_unique(order.id)?;

        let available = self.side(order.side().opposite()).total_volume();
        if available < order.remaining {
            warn!(
                order_id = order.id,
                side = ?order.side(),
                requested = order.remaining,
                available,
                "market order rejected: insufficient liquidity"
            );
            return Err(EngineError::InsufficientLiquidity {
                requested: order.remaining,
                available,
            });
        }

        order.kind_raw = OrderKind::Market.to_u8();
        self.admit(&mut order);

        let fills = self.sweep(&mut order, None);
        debug_assert!(order.is_filled(), "market order left a remainder after the liquidity check");

        let result = MatchResult {
            order_id: order.id,
            fills,
            remaining: order.remaining,
            rested: false,
        };

        debug!(
            order_id = result.order_id,
            side = ?order.side(),
            fills = result.fills.len(),
            filled = result.filled(),
            "market order executed"
        );
        Ok(result)
    }

    /// Execute `taker` against the opposite side, best level first
    ///
    /// With `limit` set, stops at the first level that does not cross.
    fn sweep(&mut self, taker: &mut Order, limit: Option<u64>) -> Vec<Fill> {
        let mut fills = Vec::new();
        let side = taker.side();
        let (opposite, orders, index) = self.parts_mut(side.opposite());

        while taker.remaining > 0 {
            let Some(price) = opposite.best_price() else { break };
            if let Some(limit) = limit {
                if !crosses(side, limit, price) {
                    break;
                }
            }
            let Some(level) = opposite.level_mut(price) else { break };

            level.fill_against(taker, orders, index, &mut fills);
            if opposite.evict_if_empty(price) {
                debug!(?side, price, "price level drained");
            }
        }

        fills
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
