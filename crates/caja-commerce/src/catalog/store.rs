//! In-memory catalog backed by the spreadsheet.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::product::parse_quantity;
use crate::catalog::{Price, Product};
use crate::error::CommerceError;
use crate::money::Currency;
use crate::sheet::{Sheet, SheetStore};

/// Titles of the columns the catalog reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    /// Product name column.
    #[serde(default = "default_name_column")]
    pub name: String,
    /// Unit price column.
    #[serde(default = "default_price_column")]
    pub price: String,
    /// Stock quantity column.
    #[serde(default = "default_quantity_column")]
    pub quantity: String,
}

fn default_name_column() -> String {
    "Nombre".to_string()
}

fn default_price_column() -> String {
    "Precio".to_string()
}

fn default_quantity_column() -> String {
    "Cantidad".to_string()
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            name: default_name_column(),
            price: default_price_column(),
            quantity: default_quantity_column(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    name: usize,
    price: usize,
    quantity: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct CatalogRow {
    product: Product,
    /// Every cell of the source row, extra columns included.
    cells: Vec<String>,
}

/// Undo record for one decremented row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockChange {
    row: usize,
    previous_quantity: i64,
    previous_cell: String,
}

/// The product table.
///
/// Rows keep every source cell so that a save rewrites the spreadsheet
/// with the same shape; only the quantity cell of sold products changes.
/// When a name appears on several rows, the first one is the product.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    headers: Vec<String>,
    columns: Option<Columns>,
    rows: Vec<CatalogRow>,
    index: HashMap<String, usize>,
    currency: Currency,
}

impl Catalog {
    /// A catalog with no products, used when loading fails.
    pub fn empty(currency: Currency) -> Self {
        Self {
            headers: Vec::new(),
            columns: None,
            rows: Vec::new(),
            index: HashMap::new(),
            currency,
        }
    }

    /// Read the catalog from a spreadsheet.
    pub fn load(
        source: &dyn SheetStore,
        column_names: &ColumnNames,
        currency: Currency,
    ) -> Result<Self, CommerceError> {
        let sheet = source.read().map_err(CommerceError::Load)?;
        let catalog = Self::from_sheet(sheet, column_names, currency)?;
        info!(
            source = %source.describe(),
            products = catalog.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Build a catalog from an already-read table.
    pub fn from_sheet(
        sheet: Sheet,
        column_names: &ColumnNames,
        currency: Currency,
    ) -> Result<Self, CommerceError> {
        let column = |title: &str| {
            sheet
                .column(title)
                .ok_or_else(|| CommerceError::MissingColumn(title.to_string()))
        };
        let columns = Columns {
            name: column(&column_names.name)?,
            price: column(&column_names.price)?,
            quantity: column(&column_names.quantity)?,
        };

        let mut rows = Vec::with_capacity(sheet.rows.len());
        let mut index = HashMap::new();

        for (i, cells) in sheet.rows.into_iter().enumerate() {
            // Row numbers are 1-based and count the header row.
            let row_number = i + 2;
            let cell = |idx: usize| cells.get(idx).map(String::as_str).unwrap_or("");

            let name = cell(columns.name).to_string();
            let price = Price::parse(cell(columns.price), currency);
            let quantity = parse_quantity(cell(columns.quantity)).map_err(|reason| {
                CommerceError::MalformedRow {
                    row: row_number,
                    reason,
                }
            })?;

            if price.looks_numeric() && !price.is_valid() {
                warn!(
                    row = row_number,
                    name = %name,
                    cell = %price.display(),
                    "unreadable price, sells at zero"
                );
            } else if !price.is_valid() {
                debug!(row = row_number, name = %name, "non-numeric price, sells at zero");
            }

            if index.contains_key(&name) {
                warn!(
                    row = row_number,
                    name = %name,
                    "duplicate product name, only the first row is sold from"
                );
            } else {
                index.insert(name.clone(), i);
            }

            rows.push(CatalogRow {
                product: Product::new(name, price, quantity),
                cells,
            });
        }

        Ok(Self {
            headers: sheet.headers,
            columns: Some(columns),
            rows,
            index,
            currency,
        })
    }

    /// Currency prices are read in.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Number of product rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Products in spreadsheet order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.rows.iter().map(|r| &r.product)
    }

    /// The distinct product names; a missing name is `""`.
    pub fn names(&self) -> BTreeSet<String> {
        self.products().map(|p| p.name.clone()).collect()
    }

    /// Find a product by exact, case-sensitive name.
    pub fn get(&self, name: &str) -> Option<&Product> {
        self.index.get(name).map(|&i| &self.rows[i].product)
    }

    /// Find a product by exact, case-sensitive name.
    pub fn lookup(&self, name: &str) -> Result<&Product, CommerceError> {
        self.get(name)
            .ok_or_else(|| CommerceError::ProductNotFound(name.to_string()))
    }

    /// Products with `threshold` units or fewer left.
    pub fn low_stock(&self, threshold: i64) -> Vec<&Product> {
        self.products().filter(|p| p.quantity <= threshold).collect()
    }

    /// Check that every count can be covered by current stock.
    pub fn check_stock(&self, counts: &BTreeMap<String, i64>) -> Result<(), CommerceError> {
        for (name, &requested) in counts {
            let product = self.lookup(name)?;
            if !product.can_fulfill(requested) {
                return Err(CommerceError::InsufficientStock {
                    name: name.clone(),
                    requested,
                    available: product.quantity,
                });
            }
        }
        Ok(())
    }

    /// Decrement stock by the given counts, all or nothing.
    ///
    /// Every entry is checked before any row is touched. On success the
    /// returned changes can be passed to [`Catalog::rollback`].
    pub fn apply_decrements(
        &mut self,
        counts: &BTreeMap<String, i64>,
    ) -> Result<Vec<StockChange>, CommerceError> {
        self.check_stock(counts)?;

        let quantity_column = self.columns.map(|c| c.quantity);
        let mut changes = Vec::with_capacity(counts.len());

        for (name, &count) in counts {
            // check_stock guarantees the name is indexed.
            let Some(&row) = self.index.get(name) else {
                continue;
            };
            let entry = &mut self.rows[row];
            let previous_quantity = entry.product.quantity;
            entry.product.quantity = previous_quantity - count;

            let previous_cell = match quantity_column.and_then(|c| entry.cells.get_mut(c)) {
                Some(cell) => std::mem::replace(cell, entry.product.quantity.to_string()),
                None => String::new(),
            };

            debug!(
                name = %name,
                from = previous_quantity,
                to = entry.product.quantity,
                "stock decremented"
            );
            changes.push(StockChange {
                row,
                previous_quantity,
                previous_cell,
            });
        }

        Ok(changes)
    }

    /// Undo a set of decrements, restoring quantities and cells exactly.
    pub fn rollback(&mut self, changes: Vec<StockChange>) {
        let quantity_column = self.columns.map(|c| c.quantity);
        for change in changes.into_iter().rev() {
            let entry = &mut self.rows[change.row];
            entry.product.quantity = change.previous_quantity;
            if let Some(cell) = quantity_column.and_then(|c| entry.cells.get_mut(c)) {
                *cell = change.previous_cell;
            }
        }
    }

    /// The catalog as a spreadsheet table.
    pub fn to_sheet(&self) -> Sheet {
        Sheet {
            headers: self.headers.clone(),
            rows: self.rows.iter().map(|r| r.cells.clone()).collect(),
        }
    }

    /// Overwrite `destination` with the whole catalog.
    pub fn persist(&self, destination: &mut dyn SheetStore) -> Result<(), CommerceError> {
        destination
            .write(&self.to_sheet())
            .map_err(|source| CommerceError::Save {
                source,
                rolled_back: false,
            })?;
        info!(destination = %destination.describe(), products = self.len(), "catalog saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::sheet::MemorySheet;

    fn sheet() -> Sheet {
        let mut sheet = Sheet::new(["Codigo", "Nombre", "Precio", "Cantidad"]);
        sheet.push_row(["A1", "Arroz", "1.20", "5"]);
        sheet.push_row(["B2", "Leche", "0.95", "1"]);
        sheet.push_row(["C3", "Pan", "gratis", ""]);
        sheet
    }

    fn catalog() -> Catalog {
        Catalog::from_sheet(sheet(), &ColumnNames::default(), Currency::USD).unwrap()
    }

    fn counts(entries: &[(&str, i64)]) -> BTreeMap<String, i64> {
        entries.iter().map(|(n, c)| (n.to_string(), *c)).collect()
    }

    #[test]
    fn test_load_reads_products() {
        let store = MemorySheet::new(sheet());
        let catalog = Catalog::load(&store, &ColumnNames::default(), Currency::USD).unwrap();

        assert_eq!(catalog.len(), 3);
        let arroz = catalog.lookup("Arroz").unwrap();
        assert_eq!(arroz.price.amount(), Some(Money::new(120, Currency::USD)));
        assert_eq!(arroz.quantity, 5);

        let pan = catalog.lookup("Pan").unwrap();
        assert!(!pan.price.is_valid());
        assert_eq!(pan.quantity, 0);
    }

    #[test]
    fn test_load_missing_store() {
        let store = MemorySheet::missing();
        let result = Catalog::load(&store, &ColumnNames::default(), Currency::USD);
        assert!(matches!(result, Err(CommerceError::Load(_))));
    }

    #[test]
    fn test_load_missing_column() {
        let mut sheet = Sheet::new(["Nombre", "Precio"]);
        sheet.push_row(["Arroz", "1"]);
        let result = Catalog::from_sheet(sheet, &ColumnNames::default(), Currency::USD);
        assert!(matches!(result, Err(CommerceError::MissingColumn(c)) if c == "Cantidad"));
    }

    #[test]
    fn test_load_malformed_quantity() {
        let mut sheet = Sheet::new(["Nombre", "Precio", "Cantidad"]);
        sheet.push_row(["Arroz", "1", "3"]);
        sheet.push_row(["Leche", "1", "tres"]);
        let result = Catalog::from_sheet(sheet, &ColumnNames::default(), Currency::USD);
        assert!(matches!(result, Err(CommerceError::MalformedRow { row: 3, .. })));
    }

    #[test]
    fn test_names_are_distinct_and_missing_is_empty() {
        let mut sheet = Sheet::new(["Nombre", "Precio", "Cantidad"]);
        sheet.push_row(["Arroz", "1", "1"]);
        sheet.push_row(["Arroz", "2", "1"]);
        sheet.push_row(["", "3", "1"]);
        let catalog = Catalog::from_sheet(sheet, &ColumnNames::default(), Currency::USD).unwrap();

        let names: Vec<String> = catalog.names().into_iter().collect();
        assert_eq!(names, vec!["".to_string(), "Arroz".to_string()]);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.to_sheet().rows.len(), 3);
    }

    #[test]
    fn test_lookup_is_exact() {
        let catalog = catalog();
        assert!(catalog.lookup("arroz").is_err());
        assert!(catalog.lookup("Arroz ").is_err());
        assert!(matches!(
            catalog.lookup("Café"),
            Err(CommerceError::ProductNotFound(n)) if n == "Café"
        ));
    }

    #[test]
    fn test_duplicate_name_first_row_wins() {
        let mut sheet = Sheet::new(["Nombre", "Precio", "Cantidad"]);
        sheet.push_row(["Arroz", "1", "4"]);
        sheet.push_row(["Arroz", "2", "9"]);
        let mut catalog =
            Catalog::from_sheet(sheet, &ColumnNames::default(), Currency::USD).unwrap();

        assert_eq!(catalog.lookup("Arroz").unwrap().quantity, 4);
        catalog.apply_decrements(&counts(&[("Arroz", 1)])).unwrap();

        let saved = catalog.to_sheet();
        assert_eq!(saved.rows[0][2], "3");
        assert_eq!(saved.rows[1][2], "9");
    }

    #[test]
    fn test_names_differing_in_whitespace_are_distinct() {
        let mut sheet = Sheet::new(["Nombre", "Precio", "Cantidad"]);
        sheet.push_row(["Arroz", "1", "4"]);
        sheet.push_row(["Arroz ", "2", "9"]);
        let catalog = Catalog::from_sheet(sheet, &ColumnNames::default(), Currency::USD).unwrap();

        assert_eq!(catalog.names().len(), 2);
        assert_eq!(catalog.lookup("Arroz").unwrap().quantity, 4);
        assert_eq!(catalog.lookup("Arroz ").unwrap().quantity, 9);
    }

    #[test]
    fn test_apply_decrements() {
        let mut catalog = catalog();
        catalog
            .apply_decrements(&counts(&[("Arroz", 2), ("Leche", 1)]))
            .unwrap();

        assert_eq!(catalog.lookup("Arroz").unwrap().quantity, 3);
        assert_eq!(catalog.lookup("Leche").unwrap().quantity, 0);
    }

    #[test]
    fn test_apply_decrements_is_all_or_nothing() {
        let mut catalog = catalog();
        let before = catalog.clone();

        let result = catalog.apply_decrements(&counts(&[("Arroz", 2), ("Leche", 2)]));
        assert!(matches!(
            result,
            Err(CommerceError::InsufficientStock { ref name, requested: 2, available: 1 }) if name == "Leche"
        ));
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_rollback_restores_cells() {
        let mut sheet = Sheet::new(["Nombre", "Precio", "Cantidad"]);
        sheet.push_row(["Arroz", "1", "5.0"]);
        let mut catalog =
            Catalog::from_sheet(sheet.clone(), &ColumnNames::default(), Currency::USD).unwrap();

        let changes = catalog.apply_decrements(&counts(&[("Arroz", 2)])).unwrap();
        assert_eq!(catalog.to_sheet().rows[0][2], "3");

        catalog.rollback(changes);
        assert_eq!(catalog.lookup("Arroz").unwrap().quantity, 5);
        assert_eq!(catalog.to_sheet(), sheet);
    }

    #[test]
    fn test_to_sheet_preserves_extra_columns() {
        let catalog = catalog();
        assert_eq!(catalog.to_sheet(), sheet());
    }

    #[test]
    fn test_persist_failure_is_save_error() {
        let catalog = catalog();
        let mut store = MemorySheet::new(sheet());
        store.set_fail_writes(true);

        let result = catalog.persist(&mut store);
        assert!(matches!(result, Err(CommerceError::Save { rolled_back: false, .. })));
    }

    #[test]
    fn test_low_stock() {
        let catalog = catalog();
        let low: Vec<&str> = catalog.low_stock(1).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(low, vec!["Leche", "Pan"]);
    }
}
