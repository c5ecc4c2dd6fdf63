//! A fill: one execution between a resting order and an aggressor.

use crate::types::Side;

/// One execution between a maker and a taker.
///
/// ## Terminology
///
/// - **Maker**: the resting order that was already in the book
/// - **Taker**: the incoming order that triggered the match
///
/// The fill always executes at the maker's price level, so the taker can
/// only ever receive price improvement.
///
/// ## Example
///
/// ```
/// use exchange_core::types::{Fill, Side};
///
/// let fill = Fill::new(1, 2, Side::Buy, 10_000, 10);
/// assert_eq!(fill.bid_order_id(), 2);
/// assert_eq!(fill.ask_order_id(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    /// Resting (maker) order ID
    pub maker_order_id: u64,

    /// Incoming (taker) order ID
    pub taker_order_id: u64,

    /// Side of the aggressing order
    pub taker_side: Side,

    /// Execution price, always the maker's level price
    pub price: u64,

    /// Executed quantity
    pub size: u64,
}

impl Fill {
    pub fn new(
        maker_order_id: u64,
        taker_order_id: u64,
        taker_side: Side,
        price: u64,
        size: u64,
    ) -> Self {
        Self {
            maker_order_id,
            taker_order_id,
            taker_side,
            price,
            size,
        }
    }

    /// ID of the buying order in this execution
    pub fn bid_order_id(&self) -> u64 {
        match self.taker_side {
            Side::Buy => self.taker_order_id,
            Side::Sell => self.maker_order_id,
        }
    }

    /// ID of the selling order in this execution
    pub fn ask_order_id(&self) -> u64 {
        match self.taker_side {
            Side::Buy => self.maker_order_id,
            Side::Sell => self.taker_order_id,
        }
    }

    /// Notional value (price * size), scaled by 10^16
    pub fn notional_raw(&self) -> u128 {
        (self.price as u128) * (self.size as u128)
    }
}
