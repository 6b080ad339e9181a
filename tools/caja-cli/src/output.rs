//! Output formatting for the CLI.

use caja_commerce::prelude::*;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Print the cart, one row per product.
    pub fn cart(&self, cart: &Cart) {
        if self.json {
            return;
        }
        if cart.is_empty() {
            self.info("Cart is empty");
            return;
        }
        match cart.calculate_pricing() {
            Ok(pricing) => {
                let widths = [30, 5, 10, 10];
                self.table_row(&["Product", "Qty", "Price", "Subtotal"], &widths);
                for line in &pricing.lines {
                    self.table_row(
                        &[
                            &line.name,
                            &line.count.to_string(),
                            &line.unit_price.display(),
                            &line.subtotal.display(),
                        ],
                        &widths,
                    );
                }
                self.kv("Total", &style(cart.total().display()).bold().to_string());
            }
            Err(e) => self.warn(&format!("Cannot price the cart: {}", e)),
        }
    }

    /// Print a completed sale.
    pub fn receipt(&self, receipt: &SaleReceipt) {
        if self.json {
            self.json(receipt);
            return;
        }
        println!("{}", receipt);
        self.success(&format!("Sold {} units for {}", receipt.units, receipt.total));
    }

    /// Explain a failed checkout.
    pub fn checkout_error(&self, err: &CommerceError) {
        self.error(&err.to_string());
        match err {
            CommerceError::InsufficientStock { .. } => {
                self.info("Nothing was sold; remove items and try again");
            }
            CommerceError::Save { .. } if err.is_desynchronized() => {
                self.warn("Stock was decremented in memory but the spreadsheet was not updated");
            }
            CommerceError::Save { .. } => {
                self.info("Nothing was sold; the cart was kept");
            }
            _ => {}
        }
    }

    /// Create a spinner for indeterminate progress.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Stock figure colored by how close it is to running out.
pub fn stock_badge(quantity: i64, low_stock: i64) -> String {
    if quantity <= 0 {
        style(quantity).red().to_string()
    } else if quantity <= low_stock {
        style(quantity).yellow().to_string()
    } else {
        quantity.to_string()
    }
}
