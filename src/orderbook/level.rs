//! Price level management for orders at the same price.
//!
//! ## Design
//!
//! A `PriceLevel` represents all resting orders at a single price point.
//! Orders are kept in a doubly-linked list threaded through the slab, which
//! gives strict FIFO (time priority) ordering:
//!
//! ```text
//! head (oldest) <-> order2 <-> order3 <-> tail (newest)
//! ```
//!
//! - New orders are appended at the tail
//! - Matching consumes orders from the head
//! - Any order can be unlinked in O(1) using its slab key
//!
//! `total_volume` is maintained on every mutation and always equals the sum
//! of `remaining` over the queue.

use std::collections::HashMap;

use slab::Slab;

use crate::error::{EngineError, Result};
use crate::orderbook::OrderNode;
use crate::types::{Fill, Order};

/// A price level containing orders at a single price.
///
/// The order data lives in the slab; this struct only holds the queue
/// metadata.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Price for this level (fixed-point), immutable once created
    pub price: u64,

    /// Sum of remaining quantity over every order in the queue
    pub total_volume: u64,

    /// Oldest order (slab key), first to be matched
    pub head: Option<usize>,

    /// Newest order (slab key)
    pub tail: Option<usize>,

    /// Number of orders at this price level
    pub order_count: usize,
}

impl PriceLevel {
    pub fn new(price: u64) -> Self {
        Self {
            price,
            total_volume: 0,
            head: None,
            tail: None,
            order_count: 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    /// Get the head order's slab key (oldest order)
    #[inline]
    pub fn peek_head(&self) -> Option<usize> {
        self.head
    }

    /// Append an order to the tail of the queue
    ///
    /// Sets the node's level back-reference and adds its remaining size to
    /// `total_volume`. The caller guarantees the node is unlinked and has a
    /// positive remaining size.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not occupied in the slab.
    pub fn add_order(&mut self, key: usize, slab: &mut Slab<OrderNode>) {
        let node = &mut slab[key];
        let quantity = node.remaining();

        node.prev = self.tail;
        node.next = None;
        node.level = Some(self.price);

        match self.tail {
            Some(tail_key) => slab[tail_key].next = Some(key),
            None => self.head = Some(key),
        }

        self.tail = Some(key);
        self.order_count += 1;
        self.total_volume += quantity;
    }

    /// Remove an order from the queue
    ///
    /// The relative order of the remaining entries is preserved. The node is
    /// unlinked but stays in the slab; the caller owns its disposal.
    ///
    /// # Returns
    ///
    /// The remaining quantity of the removed order, or `OrderNotFound` if
    /// the slab key does not hold `order_id` resting at this level.
    pub fn remove_order(
        &mut self,
        order_id: u64,
        key: usize,
        slab: &mut Slab<OrderNode>,
    ) -> Result<u64> {
        match slab.get(key) {
            Some(node) if node.order_id() == order_id && node.level == Some(self.price) => {}
            _ => return Err(EngineError::OrderNotFound(order_id)),
        }
        Ok(self.unlink(key, slab))
    }

    /// Consume resting orders from the head against an aggressor
    ///
    /// Emits one [`Fill`] per resting order touched, in the order touched,
    /// all at this level's price. Resting orders that reach zero are unlinked,
    /// dropped from the slab and from `index`. Stops as soon as the aggressor
    /// is filled or the level is drained; never looks at other levels.
    ///
    /// # Returns
    ///
    /// The cumulative quantity filled at this level.
    pub fn fill_against(
        &mut self,
        aggressor: &mut Order,
        slab: &mut Slab<OrderNode>,
        index: &mut HashMap<u64, usize>,
        fills: &mut Vec<Fill>,
    ) -> u64 {
        let mut filled_total = 0u64;

        while aggressor.remaining > 0 {
            let Some(key) = self.head else { break };

            let node = &mut slab[key];
            let filled = node.fill(aggressor.remaining);
            aggressor.fill(filled);

            let maker_id = node.order_id();
            let maker_done = node.is_filled();

            fills.push(Fill::new(maker_id, aggressor.id, aggressor.side(), self.price, filled));
            self.total_volume -= filled;
            filled_total += filled;

            if maker_done {
                self.unlink(key, slab);
                slab.remove(key);
                index.remove(&maker_id);
            }
        }

        filled_total
    }

    /// Iterate resting orders in time priority (oldest first)
    pub fn iter<'a>(&self, slab: &'a Slab<OrderNode>) -> LevelIter<'a> {
        LevelIter {
            slab,
            cursor: self.head,
        }
    }

    /// Verify queue links, back-references, count and volume
    pub fn check_invariants(&self, slab: &Slab<OrderNode>) -> std::result::Result<(), String> {
        let mut count = 0usize;
        let mut volume = 0u64;
        let mut prev: Option<usize> = None;
        let mut cursor = self.head;

        while let Some(key) = cursor {
            let node = slab
                .get(key)
                .ok_or_else(|| format!("level {}: dangling key {}", self.price, key))?;
            if node.prev != prev {
                return Err(format!(
                    "level {}: broken prev link at order {}",
                    self.price,
                    node.order_id()
                ));
            }
            if node.level != Some(self.price) {
                return Err(format!(
                    "level {}: order {} has wrong back-reference",
                    self.price,
                    node.order_id()
                ));
            }
            if node.remaining() == 0 {
                return Err(format!(
                    "level {}: filled order {} still resting",
                    self.price,
                    node.order_id()
                ));
            }
            count += 1;
            volume += node.remaining();
            prev = Some(key);
            cursor = node.next;
        }

        if self.tail != prev {
            return Err(format!("level {}: tail mismatch", self.price));
        }
        if count != self.order_count {
            return Err(format!("level {}: count {} != {}", self.price, self.order_count, count));
        }
        if volume != self.total_volume {
            return Err(format!("level {}: volume {} != {}", self.price, self.total_volume, volume));
        }
        Ok(())
    }

    /// Unlink a node and return its remaining quantity
    fn unlink(&mut self, key: usize, slab: &mut Slab<OrderNode>) -> u64 {
        let node = &mut slab[key];
        let quantity = node.remaining();
        let prev_key = node.prev.take();
        let next_key = node.next.take();
        node.level = None;

        match prev_key {
            Some(prev) => slab[prev].next = next_key,
            None => self.head = next_key,
        }
        match next_key {
            Some(next) => slab[next].prev = prev_key,
            None => self.tail = prev_key,
        }

        self.order_count -= 1;
        self.total_volume -= quantity;

        quantity
    }
}

/// Iterator over a level's orders from oldest to newest
pub struct LevelIter<'a> {
    slab: &'a Slab<OrderNode>,
    cursor: Option<usize>,
}

impl<'a> Iterator for LevelIter<'a> {
    type Item = &'a Order;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.slab.get(self.cursor?)?;
        self.cursor = node.next;
        Some(&node.order)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
