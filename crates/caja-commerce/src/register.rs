//! Register state and the events a presentation layer drives it with.

use tracing::{error, info};

use crate::cart::Cart;
use crate::catalog::{Catalog, ColumnNames};
use crate::checkout::{CheckoutEngine, SaleReceipt};
use crate::error::CommerceError;
use crate::money::Currency;
use crate::search::{FilterResults, SearchIndex};
use crate::sheet::SheetStore;

/// Settings for a register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterSettings {
    /// Column titles in the spreadsheet.
    pub columns: ColumnNames,
    /// Currency prices are read in.
    pub currency: Currency,
    /// Undo stock decrements when saving fails.
    pub rollback_on_save_failure: bool,
}

impl Default for RegisterSettings {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            currency: Currency::default(),
            rollback_on_save_failure: true,
        }
    }
}

impl RegisterSettings {
    /// Set the currency.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Set the column titles.
    pub fn with_columns(mut self, columns: ColumnNames) -> Self {
        self.columns = columns;
        self
    }

    /// Enable or disable rollback on save failure.
    pub fn with_rollback(mut self, rollback: bool) -> Self {
        self.rollback_on_save_failure = rollback;
        self
    }
}

/// Outcome of the most recent catalog load.
#[derive(Debug)]
pub enum LoadStatus {
    /// The spreadsheet was read.
    Loaded { products: usize },
    /// The spreadsheet could not be read; the catalog is empty.
    Failed(CommerceError),
}

impl LoadStatus {
    /// Check if the load succeeded.
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadStatus::Loaded { .. })
    }

    /// The load error, if any.
    pub fn error(&self) -> Option<&CommerceError> {
        match self {
            LoadStatus::Loaded { .. } => None,
            LoadStatus::Failed(e) => Some(e),
        }
    }
}

/// User intents a presentation layer forwards to the register.
pub trait SaleEvents {
    /// The filter text changed; returns the names to offer.
    fn on_filter_changed(&mut self, text: &str) -> FilterResults;

    /// A product was chosen; adds one unit to the cart.
    fn on_product_selected(&mut self, name: &str) -> Result<&Cart, CommerceError>;

    /// The user asked to process the sale.
    fn on_checkout_requested(&mut self) -> Result<SaleReceipt, CommerceError>;
}

/// All state of a running register.
///
/// Owns the catalog, the search index, the cart and the spreadsheet store.
/// Built once at startup and handed to every event handler.
pub struct Register<S: SheetStore> {
    store: S,
    settings: RegisterSettings,
    catalog: Catalog,
    index: SearchIndex,
    cart: Cart,
    engine: CheckoutEngine,
    load_status: LoadStatus,
}

impl<S: SheetStore> Register<S> {
    /// Open a register on `store`.
    ///
    /// A spreadsheet that cannot be read leaves the register usable with an
    /// empty catalog; check [`Register::load_status`] to report it.
    pub fn open(store: S, settings: RegisterSettings) -> Self {
        let engine = CheckoutEngine::new().with_rollback(settings.rollback_on_save_failure);
        let mut register = Self {
            catalog: Catalog::empty(settings.currency),
            index: SearchIndex::default(),
            cart: Cart::new(settings.currency),
            load_status: LoadStatus::Loaded { products: 0 },
            store,
            settings,
            engine,
        };
        register.reload();
        register
    }

    /// Re-read the spreadsheet and rebuild the search index.
    ///
    /// The cart is kept. On failure the catalog becomes empty.
    pub fn reload(&mut self) -> &LoadStatus {
        match Catalog::load(&self.store, &self.settings.columns, self.settings.currency) {
            Ok(catalog) => {
                self.load_status = LoadStatus::Loaded {
                    products: catalog.len(),
                };
                self.catalog = catalog;
            }
            Err(e) => {
                error!(source = %self.store.describe(), error = %e, "catalog unavailable");
                self.catalog = Catalog::empty(self.settings.currency);
                self.load_status = LoadStatus::Failed(e);
            }
        }
        self.index = SearchIndex::from_catalog(&self.catalog);
        &self.load_status
    }

    /// Outcome of the most recent load.
    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    /// The catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The search index.
    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    /// The spreadsheet store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the spreadsheet store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Settings the register was opened with.
    pub fn settings(&self) -> &RegisterSettings {
        &self.settings
    }

    /// Drop the most recently added item.
    pub fn remove_last(&mut self) -> Option<String> {
        self.cart.remove_last().map(|item| item.name)
    }

    /// Drop the item at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<String, CommerceError> {
        self.cart.remove_at(index).map(|item| item.name)
    }

    /// Empty the cart without selling anything.
    pub fn cancel_sale(&mut self) {
        info!(items = self.cart.len(), "sale cancelled");
        self.cart.clear();
    }
}

impl<S: SheetStore> SaleEvents for Register<S> {
    fn on_filter_changed(&mut self, text: &str) -> FilterResults {
        self.index.filter(text)
    }

    fn on_product_selected(&mut self, name: &str) -> Result<&Cart, CommerceError> {
        let product = self.catalog.lookup(name)?;
        self.cart.add(product)?;
        Ok(&self.cart)
    }

    fn on_checkout_requested(&mut self) -> Result<SaleReceipt, CommerceError> {
        self.engine
            .process(&mut self.catalog, &mut self.cart, &mut self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::{MemorySheet, Sheet};

    fn store() -> MemorySheet {
        let mut sheet = Sheet::new(["Nombre", "Precio", "Cantidad"]);
        sheet.push_row(["Arroz", "1.20", "5"]);
        sheet.push_row(["Leche", "0.95", "1"]);
        MemorySheet::new(sheet)
    }

    #[test]
    fn test_open_loads_catalog_and_index() {
        let register = Register::open(store(), RegisterSettings::default());
        assert!(register.load_status().is_loaded());
        assert_eq!(register.catalog().len(), 2);
        assert_eq!(register.index().len(), 2);
    }

    #[test]
    fn test_open_with_unreadable_store_is_empty_but_usable() {
        let mut register = Register::open(MemorySheet::missing(), RegisterSettings::default());

        assert!(matches!(register.load_status(), LoadStatus::Failed(CommerceError::Load(_))));
        assert!(register.catalog().is_empty());
        assert!(register.on_filter_changed("").is_empty());
        assert!(matches!(
            register.on_product_selected("Arroz"),
            Err(CommerceError::ProductNotFound(_))
        ));
        assert!(matches!(
            register.on_checkout_requested(),
            Err(CommerceError::EmptyCart)
        ));
    }

    #[test]
    fn test_event_flow() {
        let mut register = Register::open(store(), RegisterSettings::default());

        let results = register.on_filter_changed("arr");
        assert_eq!(results.highlight(), Some("Arroz"));

        register.on_product_selected("Arroz").unwrap();
        let cart = register.on_product_selected("Leche").unwrap();
        assert_eq!(cart.total().amount_cents, 215);

        let receipt = register.on_checkout_requested().unwrap();
        assert_eq!(receipt.units, 2);
        assert!(register.cart().is_empty());
        assert_eq!(register.catalog().lookup("Arroz").unwrap().quantity, 4);
        assert_eq!(register.store().writes(), 1);
    }

    #[test]
    fn test_reload_keeps_cart() {
        let mut register = Register::open(store(), RegisterSettings::default());
        register.on_product_selected("Arroz").unwrap();

        assert!(register.reload().is_loaded());
        assert_eq!(register.cart().len(), 1);
    }

    #[test]
    fn test_remove_and_cancel() {
        let mut register = Register::open(store(), RegisterSettings::default());
        register.on_product_selected("Arroz").unwrap();
        register.on_product_selected("Leche").unwrap();

        assert_eq!(register.remove_last().as_deref(), Some("Leche"));
        assert_eq!(register.remove_at(0).unwrap(), "Arroz");
        assert!(register.remove_at(0).is_err());

        register.on_product_selected("Arroz").unwrap();
        register.cancel_sale();
        assert!(register.cart().is_empty());
    }
}
