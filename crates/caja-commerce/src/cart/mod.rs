//! Shopping cart module.
//!
//! Contains the cart, its line items and the per-product pricing view.

mod cart;
mod pricing;

pub use cart::{Cart, LineItem};
pub use pricing::{CartPricing, PricingLine};
