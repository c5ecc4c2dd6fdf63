//! Order node for slab-based storage.
//!
//! `OrderNode` wraps an `Order` with doubly-linked list pointers so an order
//! can be unlinked from its price level in O(1) given its slab key.
//!
//! The slab is the single owner of every resting order. Everything else
//! (the level queue, the identity index, `level`) refers to an order by
//! slab key or by price and never owns it.
//!
//! ## Linked List
//!
//! - `next`: the next (newer) order in the price level
//! - `prev`: the previous (older) order in the price level

use crate::types::Order;

/// Order node stored in the slab.
#[derive(Debug, Clone)]
pub struct OrderNode {
    /// The order data
    pub order: Order,

    /// Next order in the price level queue (slab key)
    /// None if this is the tail (newest order)
    pub next: Option<usize>,

    /// Previous order in the price level queue (slab key)
    /// None if this is the head (oldest order)
    pub prev: Option<usize>,

    /// Price of the level this order rests in, None while unlinked
    pub level: Option<u64>,
}

impl OrderNode {
    /// Create a new order node (not yet linked)
    ///
    /// ```
    /// use exchange_core::orderbook::OrderNode;
    /// use exchange_core::types::{Order, Side};
    ///
    /// let node = OrderNode::new(Order::limit(1, Side::Buy, 100));
    /// assert!(node.is_unlinked());
    /// ```
    #[inline]
    pub fn new(order: Order) -> Self {
        Self {
            order,
            next: None,
            prev: None,
            level: None,
        }
    }

    /// Check if this node is not part of any price level
    #[inline]
    pub fn is_unlinked(&self) -> bool {
        self.level.is_none()
    }

    #[inline]
    pub fn order_id(&self) -> u64 {
        self.order.id
    }

    #[inline]
    pub fn remaining(&self) -> u64 {
        self.order.remaining
    }

    /// Fill a portion of this order, returning the quantity actually filled
    #[inline]
    pub fn fill(&mut self, quantity: u64) -> u64 {
        self.order.fill(quantity)
    }

    #[inline]
    pub fn is_filled(&self) -> bool {
        self.order.is_filled()
    }
}
