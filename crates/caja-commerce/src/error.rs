//! Commerce error types.

use thiserror::Error;

use crate::sheet::SheetError;

/// Errors that can occur in register operations.
///
/// Every variant ends the operation that raised it; none of them is fatal
/// for the process.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// The spreadsheet could not be read at startup or on reload.
    #[error("Could not load the catalog: {0}")]
    Load(#[source] SheetError),

    /// A required column is missing from the header row.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A row could not be interpreted as a product.
    #[error("Malformed row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Not enough stock to cover the sale.
    #[error("Insufficient stock for {name}: requested {requested}, available {available}")]
    InsufficientStock {
        name: String,
        requested: i64,
        available: i64,
    },

    /// Checkout requested with nothing in the cart.
    #[error("The cart is empty")]
    EmptyCart,

    /// Cart index out of range.
    #[error("No line item at position {0}")]
    ItemNotInCart(usize),

    /// Persisting the catalog failed after stock was decremented.
    #[error("Could not save the catalog: {source}")]
    Save {
        #[source]
        source: SheetError,
        rolled_back: bool,
    },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CommerceError {
    /// Name of the product a checkout failed on, if any.
    pub fn failing_product(&self) -> Option<&str> {
        match self {
            CommerceError::InsufficientStock { name, .. } | CommerceError::ProductNotFound(name) => {
                Some(name)
            }
            _ => None,
        }
    }

    /// Whether a failed save left the in-memory catalog ahead of the file.
    pub fn is_desynchronized(&self) -> bool {
        matches!(self, CommerceError::Save { rolled_back: false, .. })
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
