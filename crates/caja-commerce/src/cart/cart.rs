//! Cart and line item types.

use crate::cart::{CartPricing, PricingLine};
use crate::catalog::{Price, Product};
use crate::error::CommerceError;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A line item in the cart.
///
/// A snapshot of the product at the moment it was selected. It does not
/// track later changes to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItem {
    /// Product name.
    pub name: String,
    /// Price cell of the product.
    pub price: Price,
    /// Stock on hand when the item was added. Informational only.
    pub quantity: i64,
}

impl LineItem {
    /// Snapshot a catalog product.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.clone(),
            quantity: product.quantity,
        }
    }

    /// The amount this item adds to the total.
    pub fn unit_price(&self, currency: Currency) -> Money {
        self.price.amount_or_zero(currency)
    }
}

/// The sale in progress.
///
/// Every add appends one line item worth one unit; selecting the same
/// product twice yields two line items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Items in selection order.
    items: Vec<LineItem>,
    /// Running total, kept equal to the sum of item prices.
    total: Money,
    /// Cart currency.
    currency: Currency,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            total: Money::zero(currency),
            currency,
        }
    }

    /// Add one unit of a product.
    ///
    /// Fails with [`CommerceError::Overflow`] and leaves the cart unchanged
    /// when the new total would not fit.
    pub fn add(&mut self, product: &Product) -> Result<(), CommerceError> {
        let item = LineItem::from_product(product);
        let price = item.unit_price(self.currency);
        self.total = self.total.try_add(&price).ok_or(CommerceError::Overflow)?;
        debug!(name = %item.name, price = %price, total = %self.total, "added to cart");
        self.items.push(item);
        Ok(())
    }

    /// The running total.
    pub fn total(&self) -> Money {
        self.total
    }

    /// Sum the line items from scratch; `None` if the sum does not fit.
    pub fn recompute_total(&self) -> Option<Money> {
        self.items
            .iter()
            .try_fold(Money::zero(self.currency), |total, item| {
                total.try_add(&item.unit_price(self.currency))
            })
    }

    /// Items in selection order.
    pub fn line_items(&self) -> &[LineItem] {
        &self.items
    }

    /// Remove the item at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<LineItem, CommerceError> {
        if index >= self.items.len() {
            return Err(CommerceError::ItemNotInCart(index));
        }
        let item = self.items.remove(index);
        self.subtract(&item);
        Ok(item)
    }

    /// Remove the most recently added item.
    pub fn remove_last(&mut self) -> Option<LineItem> {
        let item = self.items.pop()?;
        self.subtract(&item);
        Some(item)
    }

    fn subtract(&mut self, item: &LineItem) {
        // Prices are never negative and sum to the total, so this is exact.
        let price = item.unit_price(self.currency);
        self.total = Money::new(
            self.total.amount_cents.saturating_sub(price.amount_cents),
            self.currency,
        );
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total = Money::zero(self.currency);
    }

    /// Number of line items (units).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cart currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Group the items per product for display and receipts.
    ///
    /// Lines appear in the order each product was first selected.
    pub fn calculate_pricing(&self) -> Result<CartPricing, CommerceError> {
        let mut lines: Vec<PricingLine> = Vec::new();

        for item in &self.items {
            let unit_price = item.unit_price(self.currency);
            match lines.iter_mut().find(|l| l.name == item.name) {
                Some(line) => {
                    line.count += 1;
                    line.subtotal = line
                        .subtotal
                        .try_add(&unit_price)
                        .ok_or(CommerceError::Overflow)?;
                }
                None => lines.push(PricingLine {
                    name: item.name.clone(),
                    unit_price,
                    count: 1,
                    subtotal: unit_price,
                }),
            }
        }

        let grand_total = Money::try_sum(lines.iter().map(|l| &l.subtotal), self.currency)
            .ok_or(CommerceError::Overflow)?;

        Ok(CartPricing {
            lines,
            units: self.items.len() as i64,
            grand_total,
        })
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}
