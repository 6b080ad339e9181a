//! Product catalog module.
//!
//! Contains the product types and the spreadsheet-backed catalog store.

mod product;
mod store;

pub use product::{Price, Product};
pub use store::{Catalog, ColumnNames, StockChange};
