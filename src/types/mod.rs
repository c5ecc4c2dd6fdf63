//! Core data types
//!
//! - [`Order`]: a unit of trading interest
//! - [`Side`]: Buy or Sell
//! - [`OrderKind`]: Limit or Market
//! - [`Fill`]: one execution between a maker and a taker
//!
//! ## Fixed-Point Arithmetic
//!
//! All prices and quantities are stored as `u64` scaled by 10^8.
//! Example: 10000.5 is stored as 1_000_050_000_000u64

mod fill;
mod order;
pub mod price;

pub use fill::Fill;
pub use order::{Order, OrderKind, Side};
