//! Order book storage.
//!
//! ## Components
//!
//! - [`OrderNode`]: `Order` plus linked-list pointers, stored in a slab
//! - [`PriceLevel`]: FIFO queue of orders at one price
//! - [`BookSide`]: price levels for one side, best price first
//! - [`OrderBook`]: both sides, the slab and the id index
//! - [`Depth`]: owned point-in-time snapshot of both sides
//!
//! ## Complexity
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Rest order | O(log n) |
//! | Cancel order by ID | O(log n) |
//! | Best bid/ask | O(log n) |
//! | Match order | O(k log n) |

pub mod book;
pub mod level;
pub mod node;
pub mod side;
pub mod snapshot;

pub use book::OrderBook;
pub use level::{LevelIter, PriceLevel};
pub use node::OrderNode;
pub use side::{BookSide, Levels};
pub use snapshot::{Depth, DepthLevel};
