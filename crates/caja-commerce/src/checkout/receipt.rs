//! Sale receipts.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{CartPricing, PricingLine};
use crate::error::CommerceError;
use crate::money::Money;

/// Record of a completed sale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleReceipt {
    /// When the sale was committed.
    pub sold_at: DateTime<Utc>,
    /// One line per product sold.
    pub lines: Vec<PricingLine>,
    /// Units sold.
    pub units: i64,
    /// Amount charged.
    pub total: Money,
}

impl SaleReceipt {
    /// Build a receipt from the cart's pricing.
    pub fn new(pricing: CartPricing, sold_at: DateTime<Utc>) -> Self {
        Self {
            sold_at,
            lines: pricing.lines,
            units: pricing.units,
            total: pricing.grand_total,
        }
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String, CommerceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for SaleReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sale {}", self.sold_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        for line in &self.lines {
            writeln!(
                f,
                "  {:>3} x {:<30} {:>10} {:>10}",
                line.count,
                line.name,
                line.unit_price.display(),
                line.subtotal.display()
            )?;
        }
        write!(f, "  {} units, total {}", self.units, self.total.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;
    use chrono::TimeZone;

    fn receipt() -> SaleReceipt {
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
        let sold_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        SaleReceipt::new(pricing, sold_at)
    }

    #[test]
    fn test_receipt_display() {
        let text = receipt().to_string();
        assert!(text.starts_with("Sale 2024-03-01 12:30:00 UTC"));
        assert!(text.contains("Arroz"));
        assert!(text.ends_with("2 units, total $2.40"));
    }

    #[test]
    fn test_receipt_json() {
        let json = receipt().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["units"], 2);
        assert_eq!(value["total"]["amount_cents"], 240);
        assert_eq!(value["lines"][0]["name"], "Arroz");
    }
}
