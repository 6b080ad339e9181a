//! In-memory spreadsheet store.

use super::{Sheet, SheetError, SheetStore};

/// A [`SheetStore`] that keeps the table in memory.
///
/// Used by tests and by callers that build a catalog programmatically.
/// Writes can be made to fail to exercise the save-failure path.
#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    sheet: Option<Sheet>,
    fail_writes: bool,
    writes: usize,
}

impl MemorySheet {
    /// A store holding `sheet`.
    pub fn new(sheet: Sheet) -> Self {
        Self {
            sheet: Some(sheet),
            fail_writes: false,
            writes: 0,
        }
    }

    /// A store with nothing in it; reads fail with `NotFound`.
    pub fn missing() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// The current table, if any.
    pub fn sheet(&self) -> Option<&Sheet> {
        self.sheet.as_ref()
    }

    /// Number of successful writes.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SheetStore for MemorySheet {
    fn read(&self) -> Result<Sheet, SheetError> {
        self.sheet
            .clone()
            .ok_or_else(|| SheetError::NotFound(self.describe()))
    }

    fn write(&mut self, sheet: &Sheet) -> Result<(), SheetError> {
        if self.fail_writes {
            return Err(SheetError::WriteRejected(self.describe()));
        }
        self.sheet = Some(sheet.clone());
        self.writes += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_store_reports_not_found() {
        let store = MemorySheet::missing();
        assert!(matches!(store.read(), Err(SheetError::NotFound(_))));
    }

    #[test]
    fn test_failed_write_keeps_previous_table() {
        let mut store = MemorySheet::new(Sheet::new(["Nombre"]));
        store.set_fail_writes(true);

        let replacement = Sheet::new(["Otro"]);
        assert!(store.write(&replacement).is_err());
        assert_eq!(store.sheet().unwrap().headers, vec!["Nombre"]);
        assert_eq!(store.writes(), 0);
    }
}
