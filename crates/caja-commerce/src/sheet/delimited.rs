//! Delimited-text spreadsheet codec.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Sheet, SheetError, SheetStore};

/// A spreadsheet stored as a delimited text file with a header row.
///
/// Writes go to a sibling temporary file that is renamed over the target,
/// so a failed save never leaves a half-written catalog behind.
#[derive(Debug, Clone)]
pub struct CsvSheet {
    path: PathBuf,
    delimiter: u8,
}

impl CsvSheet {
    /// Create a comma-separated sheet at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: b',',
        }
    }

    /// Use a different field delimiter (e.g. `;` for spreadsheets exported
    /// with a decimal comma).
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_to(&self, path: &Path, sheet: &Sheet) -> Result<(), SheetError> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .delimiter(self.delimiter)
            .from_path(path)?;
        writer.write_record(&sheet.headers)?;
        for row in &sheet.rows {
            writer.write_record(row)?;
        }
        writer.flush().map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> SheetError {
        SheetError::Io {
            path: self.describe(),
            source,
        }
    }
}

impl SheetStore for CsvSheet {
    fn read(&self) -> Result<Sheet, SheetError> {
        if !self.path.exists() {
            return Err(SheetError::NotFound(self.describe()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_path(&self.path)?;

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(SheetError::Malformed(format!(
                "{} has no header row",
                self.describe()
            )));
        }

        let mut sheet = Sheet::new(headers);
        for record in reader.records() {
            let record = record?;
            sheet.push_row(record.iter());
        }

        debug!(path = %self.path.display(), rows = sheet.len(), "read spreadsheet");
        Ok(sheet)
    }

    fn write(&mut self, sheet: &Sheet) -> Result<(), SheetError> {
        let temp = self.temp_path();
        let written = self
            .write_to(&temp, sheet)
            .and_then(|()| fs::rename(&temp, &self.path).map_err(|e| self.io_error(e)));

        if let Err(e) = written {
            let _ = fs::remove_file(&temp);
            return Err(e);
        }

        debug!(path = %self.path.display(), rows = sheet.len(), "wrote spreadsheet");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_path_is_sibling() {
        let sheet = CsvSheet::new("/data/productos.csv");
        assert_eq!(sheet.temp_path(), PathBuf::from("/data/productos.csv.tmp"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let sheet = CsvSheet::new("/definitely/not/here/productos.csv");
        assert!(matches!(sheet.read(), Err(SheetError::NotFound(_))));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvSheet::new(dir.path().join("productos.csv"));
        let mut sheet = Sheet::new(["Nombre", "Precio", "Cantidad"]);
        sheet.push_row(["Té, verde", "2", "7"]);

        store.write(&sheet).unwrap();

        assert_eq!(store.read().unwrap(), sheet);
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_failed_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvSheet::new(dir.path().join("missing").join("productos.csv"));

        assert!(store.write(&Sheet::new(["Nombre"])).is_err());
        assert!(!store.temp_path().exists());
    }
}
