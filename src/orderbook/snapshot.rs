//! Point-in-time copies of book depth.
//!
//! A [`Depth`] owns clones of every resting order, so it stays valid after
//! the book mutates and can be handed out after the book's lock is released.

use crate::types::{Order, Side};

/// One price level in a depth snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthLevel {
    pub price: u64,
    pub total_volume: u64,
    /// Orders in time priority (oldest first)
    pub orders: Vec<Order>,
}

/// Full-depth snapshot of both sides, each ordered best to worst
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Depth {
    pub bids: Vec<DepthLevel>,
    pub asks: Vec<DepthLevel>,
}

impl Depth {
    pub fn total_bid_volume(&self) -> u64 {
        self.bids.iter().map(|level| level.total_volume).sum()
    }

    pub fn total_ask_volume(&self) -> u64 {
        self.asks.iter().map(|level| level.total_volume).sum()
    }

    /// Levels for one side
    pub fn side(&self, side: Side) -> &[DepthLevel] {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    pub fn best_bid(&self) -> Option<u64> {
        self.bids.first().map(|level| level.price)
    }

    pub fn best_ask(&self) -> Option<u64> {
        self.asks.first().map(|level| level.price)
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}
