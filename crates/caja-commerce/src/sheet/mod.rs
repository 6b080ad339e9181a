//! Spreadsheet collaborator.
//!
//! The register only ever sees a header row plus string cells. Codecs
//! implement [`SheetStore`] to read and rewrite that table wholesale.

mod delimited;
mod memory;

pub use delimited::CsvSheet;
pub use memory::MemorySheet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by spreadsheet codecs.
#[derive(Error, Debug)]
pub enum SheetError {
    /// The spreadsheet does not exist.
    #[error("Spreadsheet not found: {0}")]
    NotFound(String),

    /// The file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not a usable table.
    #[error("Malformed spreadsheet: {0}")]
    Malformed(String),

    /// Delimited-text codec error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The store refused the write.
    #[error("Write rejected: {0}")]
    WriteRejected(String),
}

/// A whole spreadsheet: one header row and the data rows beneath it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    /// Column titles, in file order.
    pub headers: Vec<String>,
    /// Data rows. Each row is padded to at least `headers.len()` cells.
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Create an empty sheet with the given header row.
    pub fn new<I, T>(headers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a data row, padding it with empty cells to the header width.
    pub fn push_row<I, T>(&mut self, cells: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        if row.len() < self.headers.len() {
            row.resize(self.headers.len(), String::new());
        }
        self.rows.push(row);
    }

    /// Index of the column whose title matches `name`.
    ///
    /// Titles are compared after trimming whitespace and a leading BOM.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the sheet has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Source and destination of the catalog table.
pub trait SheetStore {
    /// Read the whole table.
    fn read(&self) -> Result<Sheet, SheetError>;

    /// Overwrite the whole table.
    fn write(&mut self, sheet: &Sheet) -> Result<(), SheetError>;

    /// Human-readable location, used in logs and messages.
    fn describe(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_row_pads_short_rows() {
        let mut sheet = Sheet::new(["Nombre", "Precio", "Cantidad"]);
        sheet.push_row(["Pan"]);
        assert_eq!(sheet.rows[0], vec!["Pan", "", ""]);
        assert_eq!(sheet.len(), 1);
    }

    #[test]
    fn test_column_lookup_ignores_padding_and_bom() {
        let sheet = Sheet::new(["\u{feff}Nombre", " Precio ", "Cantidad"]);
        assert_eq!(sheet.column("Nombre"), Some(0));
        assert_eq!(sheet.column("Precio"), Some(1));
        assert_eq!(sheet.column("Cantidad"), Some(2));
        assert_eq!(sheet.column("nombre"), None);
    }
}
