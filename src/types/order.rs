//! Order types for the matching engine.
//!
//! ## SSZ Serialization
//!
//! `Order` derives `SimpleSerialize` from ssz_rs so the resting book can be
//! encoded byte-for-byte identically on every run (see
//! [`OrderBook::state_root`](crate::orderbook::OrderBook::state_root)).
//! Enums are stored as raw `u8` fields to keep the layout SSZ-compatible.
//!
//! ## Fixed-Point Representation
//!
//! Prices and quantities are stored as u64 scaled by 10^8 (see
//! [`price::SCALE`](crate::types::price::SCALE)).

use ssz_rs::prelude::*;

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Buy (bid) or Sell (ask)
///
/// Represented as u8 for SSZ compatibility:
/// - Buy = 0
/// - Sell = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Buy order (bid)
    #[default]
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Buy),
            1 => Some(Side::Sell),
            _ => None,
        }
    }

    /// Map the boundary `Bid: bool` flag to a side
    pub fn from_bid(bid: bool) -> Self {
        if bid {
            Side::Buy
        } else {
            Side::Sell
        }
    }

    /// True for the bid side
    #[inline]
    pub fn is_bid(self) -> bool {
        self == Side::Buy
    }

    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

// ============================================================================
// OrderKind enum
// ============================================================================

/// How an incoming order interacts with the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderKind {
    /// Executes at the given price or better; any remainder rests
    #[default]
    Limit,
    /// Executes against available depth only; never rests
    Market,
}

impl OrderKind {
    pub fn to_u8(self) -> u8 {
        match self {
            OrderKind::Limit => 0,
            OrderKind::Market => 1,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(OrderKind::Limit),
            1 => Some(OrderKind::Market),
            _ => None,
        }
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A unit of trading interest.
///
/// `remaining` is the live size: it only ever decreases, and an order whose
/// `remaining` reaches zero is filled and leaves the book. `sequence` is the
/// arrival counter assigned by the [`OrderBook`](crate::orderbook::OrderBook)
/// and is the only time-priority tie-break; `timestamp` is informational.
///
/// ## SSZ Layout
///
/// 8 (id) + 1 (side) + 1 (kind) + 8 * 5 (price, quantity, remaining,
/// sequence, timestamp) = 50 bytes.
///
/// ## Example
///
/// ```
/// use exchange_core::types::{Order, OrderKind, Side};
///
/// let order = Order::limit(0, Side::Sell, 20 * 100_000_000);
/// assert_eq!(order.side(), Side::Sell);
/// assert_eq!(order.kind(), OrderKind::Limit);
/// assert_eq!(order.remaining, order.quantity);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Order {
    /// Order identifier; 0 asks the book to assign one
    pub id: u64,

    /// Order side as u8 (0=Buy, 1=Sell)
    pub side_raw: u8,

    /// Order kind as u8 (0=Limit, 1=Market)
    pub kind_raw: u8,

    /// Resting price (fixed-point). Zero until the order rests.
    pub price: u64,

    /// Original quantity (fixed-point)
    pub quantity: u64,

    /// Remaining quantity, decremented as the order is matched
    pub remaining: u64,

    /// Arrival sequence assigned by the book
    pub sequence: u64,

    /// Wall-clock creation time in nanoseconds
    pub timestamp: u64,
}

impl Order {
    /// Create a new order
    ///
    /// # Arguments
    ///
    /// * `id` - Order identifier (0 = assign on placement)
    /// * `side` - Buy or Sell
    /// * `kind` - Limit or Market
    /// * `quantity` - Size in fixed-point (scaled by 10^8)
    /// * `timestamp` - Creation time in nanoseconds
    pub fn new(id: u64, side: Side, kind: OrderKind, quantity: u64, timestamp: u64) -> Self {
        Self {
            id,
            side_raw: side.to_u8(),
            kind_raw: kind.to_u8(),
            price: 0,
            quantity,
            remaining: quantity,
            sequence: 0,
            timestamp,
        }
    }

    /// Shorthand for a limit order with no timestamp
    pub fn limit(id: u64, side: Side, quantity: u64) -> Self {
        Self::new(id, side, OrderKind::Limit, quantity, 0)
    }

    /// Shorthand for a market order with no timestamp
    pub fn market(id: u64, side: Side, quantity: u64) -> Self {
        Self::new(id, side, OrderKind::Market, quantity, 0)
    }

    /// Get the order side
    pub fn side(&self) -> Side {
        Side::from_u8(self.side_raw).unwrap_or(Side::Buy)
    }

    /// Get the order kind
    pub fn kind(&self) -> OrderKind {
        OrderKind::from_u8(self.kind_raw).unwrap_or(OrderKind::Limit)
    }

    /// Check if the order is fully filled
    pub fn is_filled(&self) -> bool {
        self.remaining == 0
    }

    /// Get the filled quantity
    pub fn filled_quantity(&self) -> u64 {
        self.quantity.saturating_sub(self.remaining)
    }

    /// Fill a portion of this order
    ///
    /// Returns the quantity actually filled, which is capped at `remaining`.
    pub fn fill(&mut self, fill_qty: u64) -> u64 {
        let actual_fill = fill_qty.min(self.remaining);
        self.remaining -= actual_fill;
        actual_fill
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_conversion() {
        assert_eq!(Side::Buy.to_u8(), 0);
        assert_eq!(Side::Sell.to_u8(), 1);
        assert_eq!(Side::from_u8(0), Some(Side::Buy));
        assert_eq!(Side::from_u8(1), Some(Side::Sell));
        assert_eq!(Side::from_u8(2), None);
    }

    #[test]
    fn test_side_from_bid() {
        assert_eq!(Side::from_bid(true), Side::Buy);
        assert_eq!(Side::from_bid(false), Side::Sell);
        assert!(Side::Buy.is_bid());
        assert!(!Side::Sell.is_bid());
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn test_order_kind_conversion() {
        assert_eq!(OrderKind::Limit.to_u8(), 0);
        assert_eq!(OrderKind::Market.to_u8(), 1);
        assert_eq!(OrderKind::from_u8(1), Some(OrderKind::Market));
        assert_eq!(OrderKind::from_u8(7), None);
    }

    #[test]
    fn test_order_new() {
        let order = Order::new(7, Side::Sell, OrderKind::Market, 500, 1_700_000_000_000_000_000);

        assert_eq!(order.id, 7);
        assert_eq!(order.side(), Side::Sell);
        assert_eq!(order.kind(), OrderKind::Market);
        assert_eq!(order.price, 0);
        assert_eq!(order.quantity, 500);
        assert_eq!(order.remaining, 500);
        assert_eq!(order.sequence, 0);
        assert!(!order.is_filled());
    }

    #[test]
    fn test_order_fill() {
        let mut order = Order::limit(1, Side::Buy, 100);

        assert_eq!(order.fill(30), 30);
        assert_eq!(order.remaining, 70);
        assert_eq!(order.filled_quantity(), 30);

        assert_eq!(order.fill(500), 70);
        assert_eq!(order.remaining, 0);
        assert!(order.is_filled());
    }

    #[test]
    fn test_order_ssz_size() {
        let order = Order::limit(1, Side::Buy, 100);
        let bytes = ssz_rs::serialize(&order).expect("Failed to serialize");

        assert_eq!(bytes.len(), 50, "Order should serialize to 50 bytes");
    }

    #[test]
    fn test_order_deterministic_serialization() {
        let order = Order::new(1, Side::Sell, OrderKind::Limit, 100, 42);

        let bytes1 = ssz_rs::serialize(&order).expect("Failed to serialize");
        let bytes2 = ssz_rs::serialize(&order).expect("Failed to serialize");

        assert_eq!(bytes1, bytes2);
    }
}
