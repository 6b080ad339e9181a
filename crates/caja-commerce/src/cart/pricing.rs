//! Cart pricing breakdown.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Pricing breakdown for a cart, one line per product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Per-product lines, in first-selection order.
    pub lines: Vec<PricingLine>,
    /// Total units (line items) in the cart.
    pub units: i64,
    /// Sum of all line subtotals.
    pub grand_total: Money,
}

impl CartPricing {
    /// Check if there is nothing priced.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Find the line for a product.
    pub fn line(&self, name: &str) -> Option<&PricingLine> {
        self.lines.iter().find(|l| l.name == name)
    }
}

/// Pricing for every unit of one product in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingLine {
    /// Product name.
    pub name: String,
    /// Price charged per unit.
    pub unit_price: Money,
    /// Units of this product.
    pub count: i64,
    /// unit_price * count.
    pub subtotal: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_line_lookup() {
        let pricing = CartPricing {
            lines: vec![PricingLine {
                name: "Arroz".to_string(),
                unit_price: Money::new(120, Currency::USD),
                count: 2,
                subtotal: Money::new(240, Currency::USD),
            }],
            units: 2,
            grand_total: Money::new(240, Currency::USD),
        };

        assert!(!pricing.is_empty());
        assert_eq!(pricing.line("Arroz").map(|l| l.count), Some(2));
        assert!(pricing.line("Leche").is_none());
    }
}
