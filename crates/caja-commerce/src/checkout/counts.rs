//! Per-product sale counts.

use std::collections::BTreeMap;

use crate::cart::LineItem;

/// How many units of each product a cart sells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleCounts(BTreeMap<String, i64>);

impl SaleCounts {
    /// Count the line items per product name.
    pub fn from_items(items: &[LineItem]) -> Self {
        let mut counts = BTreeMap::new();
        for item in items {
            *counts.entry(item.name.clone()).or_insert(0) += 1;
        }
        Self(counts)
    }

    /// Units of `name` sold.
    pub fn get(&self, name: &str) -> i64 {
        self.0.get(name).copied().unwrap_or(0)
    }

    /// Total units across all products.
    pub fn units(&self) -> i64 {
        self.0.values().sum()
    }

    /// Check if nothing is sold.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The underlying name -> count map.
    pub fn as_map(&self) -> &BTreeMap<String, i64> {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Price;

    fn item(name: &str) -> LineItem {
        LineItem {
            name: name.to_string(),
            price: Price::Invalid(String::new()),
            quantity: 0,
        }
    }

    #[test]
    fn test_counts_per_name() {
        let counts = SaleCounts::from_items(&[item("A"), item("B"), item("A")]);
        assert_eq!(counts.get("A"), 2);
        assert_eq!(counts.get("B"), 1);
        assert_eq!(counts.get("C"), 0);
        assert_eq!(counts.units(), 3);
    }

    #[test]
    fn test_empty_items() {
        assert!(SaleCounts::from_items(&[]).is_empty());
    }
}
