//! Order book for a single market.
//!
//! ## Architecture
//!
//! - **Slab**: owns every resting order, O(1) insert/remove/lookup
//! - **BookSide** (x2): price levels in a `BTreeMap`, best price first
//! - **HashMap**: order id to slab key, for O(1) cancel. The node behind the
//!   key carries the order's side and its level price.
//!
//! An order id is in the index if and only if it rests in exactly one
//! price level. No level is ever left empty once an operation returns.
//!
//! Placement (`place_limit_order`, `place_market_order`) lives in
//! [`engine`](crate::engine); this module holds storage, cancellation and
//! read-only queries.
//!
//! ## Example
//!
//! ```
//! use exchange_core::orderbook::OrderBook;
//! use exchange_core::types::{Order, Side};
//!
//! let mut book = OrderBook::with_capacity(1_000);
//! let placed = book.place_limit_order(10_000, Order::limit(0, Side::Buy, 5)).unwrap();
//!
//! assert!(placed.rested);
//! assert_eq!(book.best_bid(), Some(10_000));
//!
//! book.cancel_order(placed.order_id).unwrap();
//! assert!(book.best_bid().is_none());
//! ```

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use slab::Slab;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::orderbook::{BookSide, Depth, DepthLevel, OrderNode, PriceLevel};
use crate::types::{Order, Side};

/// Order book for one market
#[derive(Debug, Clone)]
pub struct OrderBook {
    /// Resting order storage, keyed by slab index
    pub(crate) orders: Slab<OrderNode>,

    /// Bid levels, best = highest price
    pub(crate) bids: BookSide,

    /// Ask levels, best = lowest price
    pub(crate) asks: BookSide,

    /// Order id to slab key
    pub(crate) order_index: HashMap<u64, usize>,

    /// Next engine-assigned order id
    next_order_id: u64,

    /// Next arrival sequence number
    next_sequence: u64,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a book with room for `order_capacity` resting orders
    pub fn with_capacity(order_capacity: usize) -> Self {
        Self {
            orders: Slab::with_capacity(order_capacity),
            bids: BookSide::new(Side::Buy),
            asks: BookSide::new(Side::Sell),
            order_index: HashMap::with_capacity(order_capacity),
            next_order_id: 1,
            next_sequence: 1,
        }
    }

    // ========================================================================
    // Capacity and Size
    // ========================================================================

    #[inline]
    pub fn capacity(&self) -> usize {
        self.orders.capacity()
    }

    /// Total number of resting orders
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    #[inline]
    pub fn bid_levels(&self) -> usize {
        self.bids.level_count()
    }

    #[inline]
    pub fn ask_levels(&self) -> usize {
        self.asks.level_count()
    }

    // ========================================================================
    // Sides
    // ========================================================================

    #[inline]
    pub fn bids(&self) -> &BookSide {
        &self.bids
    }

    #[inline]
    pub fn asks(&self) -> &BookSide {
        &self.asks
    }

    #[inline]
    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    /// Split borrow of one side together with the slab and the index
    pub(crate) fn parts_mut(
        &mut self,
        side: Side,
    ) -> (&mut BookSide, &mut Slab<OrderNode>, &mut HashMap<u64, usize>) {
        let book_side = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        (book_side, &mut self.orders, &mut self.order_index)
    }

    // ========================================================================
    // Order Management
    // ========================================================================

    /// Reject an id that is already resting
    pub(crate) fn check_unique(&self, order_id: u64) -> Result<()> {
        if order_id != 0 && self.order_index.contains_key(&order_id) {
            return Err(EngineError::DuplicateOrderId(order_id));
        }
        Ok(())
    }

    /// Give an accepted order its id (when 0) and its arrival sequence
    pub(crate) fn admit(&mut self, order: &mut Order) {
        if order.id == 0 {
            while self.order_index.contains_key(&self.next_order_id) {
                self.next_order_id += 1;
            }
            order.id = self.next_order_id;
            self.next_order_id += 1;
        }
        order.sequence = self.next_sequence;
        self.next_sequence += 1;
    }

    /// Insert an order as resting liquidity at `price`
    ///
    /// Creates the price level if absent and registers the id in the index.
    pub(crate) fn rest(&mut self, price: u64, mut order: Order) -> usize {
        let order_id = order.id;
        let side = order.side();
        order.price = price;

        let key = self.orders.insert(OrderNode::new(order));
        self.order_index.insert(order_id, key);

        let (book_side, orders, _) = self.parts_mut(side);
        book_side.upsert_level(price).add_order(key, orders);

        debug!(order_id, ?side, price, "order resting");
        key
    }

    /// Cancel a resting order by id
    ///
    /// Removes the order from its level, evicts the level if it became
    /// empty, and drops the index entry. Cancelling an id that is not
    /// resting (never placed, filled, or already cancelled) fails with
    /// `OrderNotFound` and changes nothing.
    ///
    /// # Returns
    ///
    /// The cancelled order with its remaining size at cancel time.
    pub fn cancel_order(&mut self, order_id: u64) -> Result<Order> {
        let key = *self
            .order_index
            .get(&order_id)
            .ok_or(EngineError::OrderNotFound(order_id))?;

        let node = self.orders.get(key).ok_or(EngineError::OrderNotFound(order_id))?;
        let side = node.order.side();
        let price = node.level.ok_or(EngineError::OrderNotFound(order_id))?;

        let (book_side, orders, index) = self.parts_mut(side);
        let level = book_side
            .level_mut(price)
            .ok_or(EngineError::OrderNotFound(order_id))?;
        level.remove_order(order_id, key, orders)?;
        book_side.evict_if_empty(price);
        index.remove(&order_id);

        let order = self.orders.remove(key).order;
        debug!(order_id, ?side, price, remaining = order.remaining, "order cancelled");
        Ok(order)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Look up a resting order by id
    pub fn get_order(&self, order_id: u64) -> Option<&Order> {
        let key = self.order_index.get(&order_id)?;
        self.orders.get(*key).map(|node| &node.order)
    }

    #[inline]
    pub fn contains_order(&self, order_id: u64) -> bool {
        self.order_index.contains_key(&order_id)
    }

    /// Highest bid price
    #[inline]
    pub fn best_bid(&self) -> Option<u64> {
        self.bids.best_price()
    }

    /// Lowest ask price
    #[inline]
    pub fn best_ask(&self) -> Option<u64> {
        self.asks.best_price()
    }

    /// best_ask - best_bid, when both sides are quoted and not crossed
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if ask >= bid => Some(ask - bid),
            _ => None,
        }
    }

    pub fn total_bid_volume(&self) -> u64 {
        self.bids.total_volume()
    }

    pub fn total_ask_volume(&self) -> u64 {
        self.asks.total_volume()
    }

    /// Full-depth snapshot, each side best to worst
    pub fn depth(&self) -> Depth {
        Depth {
            bids: self.side_depth(&self.bids),
            asks: self.side_depth(&self.asks),
        }
    }

    fn side_depth(&self, side: &BookSide) -> Vec<DepthLevel> {
        side.levels_by_priority()
            .map(|level| DepthLevel {
                price: level.price,
                total_volume: level.total_volume,
                orders: level.iter(&self.orders).cloned().collect(),
            })
            .collect()
    }

    /// Orders at one level, oldest first
    pub fn orders_at(&self, side: Side, price: u64) -> Vec<&Order> {
        self.side(side)
            .level(price)
            .map(|level| level.iter(&self.orders).collect())
            .unwrap_or_default()
    }

    // ========================================================================
    // Verification
    // ========================================================================

    /// Check every structural invariant of the book
    ///
    /// - each level's volume equals the sum of its orders' remaining sizes
    /// - no empty level exists on either side
    /// - every resting order is indexed, and every index entry rests
    /// - the best bid is strictly below the best ask
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        let mut resting = 0usize;

        for book_side in [&self.bids, &self.asks] {
            for level in book_side.levels_by_priority() {
                if level.is_empty() {
                    return Err(format!("{:?} level {} is empty", book_side.side(), level.price));
                }
                level.check_invariants(&self.orders)?;
                for order in level.iter(&self.orders) {
                    if order.side() != book_side.side() {
                        return Err(format!("order {} rests on the wrong side", order.id));
                    }
                    if order.price != level.price {
                        return Err(format!(
                            "order {} price {} != level {}",
                            order.id, order.price, level.price
                        ));
                    }
                    let indexed = self
                        .order_index
                        .get(&order.id)
                        .and_then(|key| self.orders.get(*key))
                        .map(|node| node.order_id());
                    if indexed != Some(order.id) {
                        return Err(format!("order {} missing from index", order.id));
                    }
                }
                resting += level.order_count;
            }
        }

        if let (Some(bid), Some(ask)) = (self.best_bid(), self.best_ask()) {
            if bid >= ask {
                return Err(format!("book is crossed: bid {} >= ask {}", bid, ask));
            }
        }

        if resting != self.order_index.len() || resting != self.orders.len() {
            return Err(format!(
                "resting {} / indexed {} / stored {} disagree",
                resting,
                self.order_index.len(),
                self.orders.len()
            ));
        }
        Ok(())
    }

    /// SHA-256 over the SSZ encoding of every resting order
    ///
    /// Bids then asks, each best to worst and oldest first within a level.
    /// Identical inputs always produce identical roots.
    pub fn state_root(&self) -> std::result::Result<[u8; 32], ssz_rs::SerializeError> {
        let mut hasher = Sha256::new();

        for book_side in [&self.bids, &self.asks] {
            for level in book_side.levels_by_priority() {
                for order in level.iter(&self.orders) {
                    hasher.update(ssz_rs::serialize(order)?);
                }
            }
        }

        let mut root = [0u8; 32];
        root.copy_from_slice(&hasher.finalize());
        Ok(root)
    }

    /// State root as a hex string
    pub fn state_root_hex(&self) -> std::result::Result<String, ssz_rs::SerializeError> {
        self.state_root().map(hex::encode)
    }

    /// Level lookup used by tests and the engine
    pub fn level(&self, side: Side, price: u64) -> Option<&PriceLevel> {
        self.side(side).level(price)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
