//! Product and price types.

use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// The price cell of a product row.
///
/// Spreadsheets are free-form, so a price may not be a number at all. The
/// raw text is kept and the product still loads; it simply rings up as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    /// A numeric price.
    Amount(Money),
    /// A cell that is not a number, kept verbatim.
    Invalid(String),
}

impl Price {
    /// Interpret a price cell. Negative amounts are not prices.
    pub fn parse(raw: &str, currency: Currency) -> Self {
        match Money::parse(raw, currency) {
            Some(amount) if amount.amount_cents >= 0 => Price::Amount(amount),
            _ => Price::Invalid(raw.to_string()),
        }
    }

    /// The numeric amount, if the cell held one.
    pub fn amount(&self) -> Option<Money> {
        match self {
            Price::Amount(amount) => Some(*amount),
            Price::Invalid(_) => None,
        }
    }

    /// The amount to charge: non-numeric prices count as zero.
    pub fn amount_or_zero(&self, currency: Currency) -> Money {
        self.amount().unwrap_or_else(|| Money::zero(currency))
    }

    /// Check if an invalid cell still contains digits, which usually means
    /// a format the parser did not understand rather than a note.
    pub fn looks_numeric(&self) -> bool {
        match self {
            Price::Amount(_) => true,
            Price::Invalid(raw) => raw.chars().any(|c| c.is_ascii_digit()),
        }
    }

    /// Check if the cell held a number.
    pub fn is_valid(&self) -> bool {
        matches!(self, Price::Amount(_))
    }

    /// Format for display; invalid cells show their raw text.
    pub fn display(&self) -> String {
        match self {
            Price::Amount(amount) => amount.display(),
            Price::Invalid(raw) => raw.clone(),
        }
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product name, as written in the spreadsheet.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Units in stock.
    pub quantity: i64,
}

impl Product {
    /// Create a new product.
    pub fn new(name: impl Into<String>, price: Price, quantity: i64) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
        }
    }

    /// Check if at least `count` units are in stock.
    pub fn can_fulfill(&self, count: i64) -> bool {
        self.quantity >= count
    }

    /// Check if out of stock.
    pub fn is_out_of_stock(&self) -> bool {
        self.quantity <= 0
    }
}

/// Interpret a quantity cell.
///
/// Empty cells mean zero. Whole-number floats (`5.0`, as spreadsheet
/// exports often write them) are accepted; fractions and negatives are not.
pub(crate) fn parse_quantity(raw: &str) -> Result<i64, String> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(0);
    }

    let quantity = match text.parse::<i64>() {
        Ok(q) => q,
        Err(_) => {
            let value: f64 = text
                .parse()
                .map_err(|_| format!("quantity '{}' is not a number", text))?;
            if !value.is_finite() || value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
                return Err(format!("quantity '{}' is not a whole number", text));
            }
            value as i64
        }
    };

    if quantity < 0 {
        return Err(format!("quantity '{}' is negative", text));
    }
    Ok(quantity)
}
