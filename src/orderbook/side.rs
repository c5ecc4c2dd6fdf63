//! One side of the book: all price levels for bids or for asks.
//!
//! Levels live in a `BTreeMap` keyed by price, so price ordering is kept
//! up to date on every insert and removal. The side decides the direction:
//! best is the highest key for bids and the lowest key for asks. Nothing is
//! re-sorted on read.

use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::orderbook::PriceLevel;
use crate::types::Side;

/// Price levels for one side of the book.
///
/// Every key maps to a level with at least one order once the owning
/// [`OrderBook`](crate::orderbook::OrderBook) operation completes.
#[derive(Debug, Clone)]
pub struct BookSide {
    side: Side,
    levels: BTreeMap<u64, PriceLevel>,
}

impl BookSide {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of price levels
    #[inline]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Number of resting orders across all levels
    pub fn order_count(&self) -> usize {
        self.levels.values().map(|level| level.order_count).sum()
    }

    /// Sum of resting volume across all levels
    ///
    /// Placement refuses any order that would push this past `u64::MAX`,
    /// so the sum never overflows.
    pub fn total_volume(&self) -> u64 {
        self.levels.values().map(|level| level.total_volume).sum()
    }

    /// True if `quantity` more can rest on this side without overflow
    pub fn has_room_for(&self, quantity: u64) -> bool {
        self.total_volume().checked_add(quantity).is_some()
    }

    /// Best price: highest bid or lowest ask
    pub fn best_price(&self) -> Option<u64> {
        match self.side {
            Side::Buy => self.levels.keys().next_back().copied(),
            Side::Sell => self.levels.keys().next().copied(),
        }
    }

    /// Levels from best to worst price
    ///
    /// The iterator is lazy; call again to restart from the best level.
    pub fn levels_by_priority(&self) -> Levels<'_> {
        Levels {
            inner: self.levels.values(),
            side: self.side,
        }
    }

    #[inline]
    pub fn level(&self, price: u64) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    #[inline]
    pub fn level_mut(&mut self, price: u64) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    /// Get the level at `price`, creating an empty one if absent
    pub fn upsert_level(&mut self, price: u64) -> &mut PriceLevel {
        self.levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
    }

    /// Drop the level at `price` if it holds no orders
    ///
    /// Returns true if a level was removed.
    pub fn evict_if_empty(&mut self, price: u64) -> bool {
        match self.levels.get(&price) {
            Some(level) if level.is_empty() => {
                self.levels.remove(&price);
                true
            }
            _ => false,
        }
    }
}

/// Best-to-worst iterator over a side's levels
pub struct Levels<'a> {
    inner: btree_map::Values<'a, u64, PriceLevel>,
    side: Side,
}

impl<'a> Iterator for Levels<'a> {
    type Item = &'a PriceLevel;

    fn next(&mut self) -> Option<Self::Item> {
        match self.side {
            Side::Buy => self.inner.next_back(),
            Side::Sell => self.inner.next(),
        }
    }
}
