//! Point-of-sale domain types and logic for caja.
//!
//! This crate provides the whole register core, independent of any UI:
//!
//! - **Catalog**: Products loaded from a spreadsheet, stock decrements
//! - **Search**: Case-insensitive name filtering with a suggested highlight
//! - **Cart**: The sale in progress and its running total
//! - **Checkout**: All-or-nothing stock commit, save, receipt
//! - **Sheet**: The spreadsheet collaborator (CSV file or in memory)
//! - **Register**: Application state driven by presentation events
//!
//! # Example
//!
//! ```rust,no_run
//! use caja_commerce::prelude::*;
//!
//! let mut register = Register::open(CsvSheet::new("productos.csv"), RegisterSettings::default());
//! if let Some(e) = register.load_status().error() {
//!     eprintln!("{e}");
//! }
//!
//! let results = register.on_filter_changed("arr");
//! if let Some(name) = results.highlight().map(str::to_string) {
//!     register.on_product_selected(&name)?;
//! }
//! let receipt = register.on_checkout_requested()?;
//! println!("{receipt}");
//! # Ok::<(), CommerceError>(())
//! ```

pub mod error;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod register;
pub mod search;
pub mod sheet;

pub use error::CommerceError;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Catalog, ColumnNames, Price, Product, StockChange};

    // Cart
    pub use crate::cart::{Cart, CartPricing, LineItem, PricingLine};

    // Checkout
    pub use crate::checkout::{CheckoutEngine, CheckoutStep, SaleCounts, SaleReceipt};

    // Search
    pub use crate::search::{FilterResults, SearchIndex};

    // Spreadsheet
    pub use crate::sheet::{CsvSheet, MemorySheet, Sheet, SheetError, SheetStore};

    // Register
    pub use crate::register::{LoadStatus, Register, RegisterSettings, SaleEvents};
}
