//! Checkout module.
//!
//! Turns a cart into stock decrements, a saved spreadsheet and a receipt.

mod counts;
mod engine;
mod receipt;

pub use counts::SaleCounts;
pub use engine::{CheckoutEngine, CheckoutStep};
pub use receipt::SaleReceipt;
