//! CLI configuration.

use std::path::Path;

use anyhow::{bail, Context, Result};
use caja_commerce::catalog::ColumnNames;
use caja_commerce::register::RegisterSettings;
use caja_commerce::Currency;
use serde::{Deserialize, Serialize};

/// File names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["caja.toml", ".caja.toml", "caja.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CajaConfig {
    /// Product spreadsheet.
    #[serde(default)]
    pub sheet: SheetConfig,

    /// Sale settings.
    #[serde(default)]
    pub sale: SaleConfig,

    /// Checkout behavior.
    #[serde(default)]
    pub checkout: CheckoutConfig,
}

impl CajaConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }

    /// Settings for the register.
    pub fn register_settings(&self) -> RegisterSettings {
        RegisterSettings::default()
            .with_columns(self.sheet.columns.clone())
            .with_currency(self.sale.currency)
            .with_rollback(self.checkout.rollback_on_save_failure)
    }
}

/// Where the product table lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Spreadsheet path, relative to the config file.
    #[serde(default = "default_sheet_path")]
    pub path: String,

    /// Field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Column titles.
    #[serde(default)]
    pub columns: ColumnNames,
}

impl SheetConfig {
    /// The delimiter as a byte.
    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter {
            '"' | '\n' | '\r' => bail!("sheet.delimiter cannot be {:?}", self.delimiter),
            c if c.is_ascii() => Ok(c as u8),
            c => bail!("sheet.delimiter must be a single ASCII character, got {:?}", c),
        }
    }
}

fn default_sheet_path() -> String {
    "productos.csv".to_string()
}

fn default_delimiter() -> char {
    ','
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            path: default_sheet_path(),
            delimiter: default_delimiter(),
            columns: ColumnNames::default(),
        }
    }
}

/// Sale settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaleConfig {
    /// Currency prices are written in.
    #[serde(default)]
    pub currency: Currency,
}

/// Checkout behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Undo stock decrements when the spreadsheet cannot be saved.
    #[serde(default = "default_true")]
    pub rollback_on_save_failure: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            rollback_on_save_failure: true,
        }
    }
}

/// Problems found by [`validate`].
#[derive(Debug, Default)]
pub struct Findings {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Check a config for values the register cannot work with.
///
/// `base` is the directory relative sheet paths resolve against.
pub fn validate(config: &CajaConfig, base: &Path) -> Findings {
    let mut findings = Findings::default();

    if config.sheet.path.trim().is_empty() {
        findings.errors.push("sheet.path is required".to_string());
    } else {
        let path = base.join(&config.sheet.path);
        if !path.exists() {
            findings
                .warnings
                .push(format!("sheet.path '{}' does not exist", path.display()));
        }
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            findings.warnings.push(format!(
                "sheet.path '{}' is read as delimited text",
                config.sheet.path
            ));
        }
    }

    if let Err(e) = config.sheet.delimiter_byte() {
        findings.errors.push(e.to_string());
    }

    let columns = &config.sheet.columns;
    let titles = [
        ("name", &columns.name),
        ("price", &columns.price),
        ("quantity", &columns.quantity),
    ];
    for (key, title) in &titles {
        if title.trim().is_empty() {
            findings
                .errors
                .push(format!("sheet.columns.{} cannot be empty", key));
        }
    }
    if columns.name == columns.price
        || columns.name == columns.quantity
        || columns.price == columns.quantity
    {
        findings
            .errors
            .push("sheet.columns must name three different columns".to_string());
    }

    if !config.checkout.rollback_on_save_failure {
        findings.warnings.push(
            "checkout.rollback_on_save_failure is off; a failed save leaves stock decremented in memory"
                .to_string(),
        );
    }

    findings
}

/// Generate a default caja.toml config file.
pub fn generate_default_config(sheet: &str) -> String {
    format!(
        r#"# Caja register configuration

[sheet]
path = "{sheet}"
delimiter = ","

[sheet.columns]
name = "Nombre"
price = "Precio"
quantity = "Cantidad"

[sale]
# USD, EUR, MXN, ARS, CLP, COP or PEN
currency = "USD"

[checkout]
rollback_on_save_failure = true
"#,
        sheet = sheet
    )
}
