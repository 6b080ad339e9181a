//! Checkout engine.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::checkout::{SaleCounts, SaleReceipt};
use crate::error::CommerceError;
use crate::sheet::SheetStore;

/// Stages of one checkout call.
///
/// A checkout runs synchronously from `Aggregate` to `Complete` or stops
/// at the stage that failed; there is no state between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckoutStep {
    /// Count line items per product.
    Aggregate,
    /// Check every count against stock.
    Validate,
    /// Decrement stock.
    Apply,
    /// Write the catalog back to the spreadsheet.
    Persist,
    /// Cart cleared, receipt issued.
    Complete,
}

impl CheckoutStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Aggregate => "aggregate",
            CheckoutStep::Validate => "validate",
            CheckoutStep::Apply => "apply",
            CheckoutStep::Persist => "persist",
            CheckoutStep::Complete => "complete",
        }
    }
}

/// Commits carts against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutEngine {
    rollback_on_save_failure: bool,
}

impl Default for CheckoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutEngine {
    /// An engine that restores stock when the save fails.
    pub fn new() -> Self {
        Self {
            rollback_on_save_failure: true,
        }
    }

    /// Choose whether a failed save undoes the decrements.
    ///
    /// Without rollback the catalog stays ahead of the file until the next
    /// successful save.
    pub fn with_rollback(mut self, rollback: bool) -> Self {
        self.rollback_on_save_failure = rollback;
        self
    }

    /// Whether a failed save undoes the decrements.
    pub fn rolls_back(&self) -> bool {
        self.rollback_on_save_failure
    }

    /// Sell everything in the cart.
    ///
    /// Either every product's stock is decremented, the spreadsheet is
    /// rewritten and the cart is cleared, or (on a stock shortage) nothing
    /// changes. When the save fails the cart is always kept.
    pub fn process(
        &self,
        catalog: &mut Catalog,
        cart: &mut Cart,
        store: &mut dyn SheetStore,
    ) -> Result<SaleReceipt, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        let counts = SaleCounts::from_items(cart.line_items());
        trace_step(CheckoutStep::Aggregate, &counts);

        if let Err(e) = catalog.check_stock(counts.as_map()) {
            warn!(step = CheckoutStep::Validate.as_str(), error = %e, "checkout rejected");
            return Err(e);
        }
        trace_step(CheckoutStep::Validate, &counts);

        let pricing = cart.calculate_pricing()?;
        let changes = catalog.apply_decrements(counts.as_map())?;
        trace_step(CheckoutStep::Apply, &counts);

        if let Err(e) = catalog.persist(store) {
            let source = match e {
                CommerceError::Save { source, .. } => source,
                other => return Err(other),
            };
            if self.rollback_on_save_failure {
                catalog.rollback(changes);
                warn!(
                    step = CheckoutStep::Persist.as_str(),
                    error = %source,
                    "save failed, sale rolled back"
                );
            } else {
                warn!(
                    step = CheckoutStep::Persist.as_str(),
                    error = %source,
                    "save failed, catalog is ahead of the spreadsheet"
                );
            }
            return Err(CommerceError::Save {
                source,
                rolled_back: self.rollback_on_save_failure,
            });
        }
        trace_step(CheckoutStep::Persist, &counts);

        cart.clear();
        let receipt = SaleReceipt::new(pricing, Utc::now());
        info!(
            step = CheckoutStep::Complete.as_str(),
            units = receipt.units,
            total = %receipt.total,
            "sale completed"
        );
        Ok(receipt)
    }
}

fn trace_step(step: CheckoutStep, counts: &SaleCounts) {
    debug!(
        step = step.as_str(),
        products = counts.as_map().len(),
        units = counts.units(),
        "checkout step done"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ColumnNames;
    use crate::money::Currency;
    use crate::sheet::{MemorySheet, Sheet};

    fn setup(rows: &[(&str, &str, &str)]) -> (Catalog, Cart, MemorySheet) {
        let mut sheet = Sheet::new(["Nombre", "Precio", "Cantidad"]);
        for (name, price, qty) in rows {
            sheet.push_row([*name, *price, *qty]);
        }
        let store = MemorySheet::new(sheet);
        let catalog = Catalog::load(&store, &ColumnNames::default(), Currency::USD).unwrap();
        (catalog, Cart::new(Currency::USD), store)
    }

    fn add(catalog: &Catalog, cart: &mut Cart, name: &str, times: usize) {
        let product = catalog.lookup(name).unwrap();
        for _ in 0..times {
            cart.add(product).unwrap();
        }
    }

    fn saved_quantity(store: &MemorySheet, row: usize) -> String {
        store.sheet().unwrap().rows[row][2].clone()
    }

    #[test]
    fn test_checkout_success() {
        let (mut catalog, mut cart, mut store) = setup(&[("A", "1.00", "5"), ("B", "2.50", "1")]);
        add(&catalog, &mut cart, "A", 2);
        add(&catalog, &mut cart, "B", 1);

        let receipt = CheckoutEngine::new()
            .process(&mut catalog, &mut cart, &mut store)
            .unwrap();

        assert_eq!(catalog.lookup("A").unwrap().quantity, 3);
        assert_eq!(catalog.lookup("B").unwrap().quantity, 0);
        assert!(cart.is_empty());
        assert!(cart.total().is_zero());
        assert_eq!(saved_quantity(&store, 0), "3");
        assert_eq!(saved_quantity(&store, 1), "0");
        assert_eq!(receipt.units, 3);
        assert_eq!(receipt.total.amount_cents, 450);
    }

    #[test]
    fn test_checkout_insufficient_stock_changes_nothing() {
        let (mut catalog, mut cart, mut store) = setup(&[("P", "1.00", "2")]);
        add(&catalog, &mut cart, "P", 3);

        let result = CheckoutEngine::new().process(&mut catalog, &mut cart, &mut store);

        assert!(matches!(
            result,
            Err(CommerceError::InsufficientStock { ref name, requested: 3, available: 2 }) if name == "P"
        ));
        assert_eq!(catalog.lookup("P").unwrap().quantity, 2);
        assert_eq!(cart.len(), 3);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_checkout_shortage_on_second_product_is_atomic() {
        let (mut catalog, mut cart, mut store) = setup(&[("A", "1", "5"), ("B", "1", "0")]);
        add(&catalog, &mut cart, "A", 1);
        add(&catalog, &mut cart, "B", 1);

        let result = CheckoutEngine::new().process(&mut catalog, &mut cart, &mut store);

        assert_eq!(result.unwrap_err().failing_product(), Some("B"));
        assert_eq!(catalog.lookup("A").unwrap().quantity, 5);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_checkout_empty_cart() {
        let (mut catalog, mut cart, mut store) = setup(&[("A", "1", "5")]);
        let result = CheckoutEngine::new().process(&mut catalog, &mut cart, &mut store);
        assert!(matches!(result, Err(CommerceError::EmptyCart)));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_save_failure_rolls_back() {
        let (mut catalog, mut cart, mut store) = setup(&[("A", "1", "5")]);
        add(&catalog, &mut cart, "A", 2);
        store.set_fail_writes(true);

        let result = CheckoutEngine::new().process(&mut catalog, &mut cart, &mut store);

        assert!(matches!(result, Err(CommerceError::Save { rolled_back: true, .. })));
        assert_eq!(catalog.lookup("A").unwrap().quantity, 5);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_save_failure_without_rollback_keeps_decrements() {
        let (mut catalog, mut cart, mut store) = setup(&[("A", "1", "5")]);
        add(&catalog, &mut cart, "A", 2);
        store.set_fail_writes(true);

        let engine = CheckoutEngine::new().with_rollback(false);
        let err = engine
            .process(&mut catalog, &mut cart, &mut store)
            .unwrap_err();

        assert!(err.is_desynchronized());
        assert_eq!(catalog.lookup("A").unwrap().quantity, 3);
        assert_eq!(cart.len(), 2);
        assert_eq!(saved_quantity(&store, 0), "5");
    }

    #[test]
    fn test_largest_cart_total_checks_out() {
        let (mut catalog, mut cart, mut store) = setup(&[("Oro", "60000000000000000", "5")]);
        add(&catalog, &mut cart, "Oro", 1);
        let oro = catalog.lookup("Oro").unwrap().clone();
        assert!(cart.add(&oro).is_err());

        let receipt = CheckoutEngine::new()
            .process(&mut catalog, &mut cart, &mut store)
            .unwrap();

        assert_eq!(receipt.total.amount_cents, 6_000_000_000_000_000_000);
        assert_eq!(catalog.lookup("Oro").unwrap().quantity, 4);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_non_numeric_price_sells_at_zero() {
        let (mut catalog, mut cart, mut store) = setup(&[("Pan", "consultar", "1")]);
        add(&catalog, &mut cart, "Pan", 1);

        let receipt = CheckoutEngine::new()
            .process(&mut catalog, &mut cart, &mut store)
            .unwrap();
        assert!(receipt.total.is_zero());
        assert_eq!(catalog.lookup("Pan").unwrap().quantity, 0);
    }
}
