//! Execution simulation module
//!
//! Walks an order book snapshot to estimate what a marketable order of a
//! given notional would actually pay. Nothing here places orders.

mod fill;
mod types;

pub use fill::{simulate_fill, FILL_EPSILON};
pub use types::{BookSide, FillEstimate};
