//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use caja_commerce::prelude::*;

use crate::config::{CajaConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CajaConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Spreadsheet given on the command line.
    sheet_override: Option<PathBuf>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, sheet: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CajaConfig::load(path)?, Some(cwd.join(path)))
        } else {
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CajaConfig::default(), None),
            }
        };

        if let Some(ref path) = config_path {
            output.debug(&format!("Using config: {}", path.display()));
        }

        Ok(Self {
            config,
            config_path,
            output,
            sheet_override: sheet.map(|s| cwd.join(s)),
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(CajaConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CajaConfig::load(config_path.to_str()?) {
                        return Some((config, config_path));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Directory relative paths in the config resolve against.
    pub fn config_dir(&self) -> PathBuf {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cwd.clone())
    }

    /// The spreadsheet to read and write.
    pub fn sheet_path(&self) -> PathBuf {
        match self.sheet_override {
            Some(ref path) => path.clone(),
            None => self.config_dir().join(&self.config.sheet.path),
        }
    }

    /// Open a register on the configured spreadsheet.
    ///
    /// A sheet that cannot be read still yields a register with an empty
    /// catalog; the failure is reported as a warning.
    pub fn open_register(&self) -> Result<Register<CsvSheet>> {
        let register = self.open()?;
        match register.load_status() {
            LoadStatus::Loaded { products } => {
                self.output.debug(&format!("Loaded {} products", products));
            }
            LoadStatus::Failed(e) => {
                self.output.warn(&format!("Catalog unavailable: {}", e));
            }
        }
        Ok(register)
    }

    /// Open a register, failing if the catalog could not be loaded.
    pub fn open_loaded_register(&self) -> Result<Register<CsvSheet>> {
        let register = self.open()?;
        if let Some(e) = register.load_status().error() {
            bail!("Failed to load {}: {}", self.sheet_path().display(), e);
        }
        Ok(register)
    }

    fn open(&self) -> Result<Register<CsvSheet>> {
        let delimiter = self.config.sheet.delimiter_byte()?;
        let store = CsvSheet::new(self.sheet_path()).with_delimiter(delimiter);

        let spinner = self.output.spinner(&format!("Loading {}", store.describe()));
        let register = Register::open(store, self.config.register_settings());
        spinner.finish_and_clear();

        Ok(register)
    }
}
