//! CLI command implementations.

pub mod config;
pub mod products;
pub mod register;
pub mod search;
pub mod sell;

use clap::{Args, Subcommand, ValueEnum};

/// Arguments for the register command.
#[derive(Args)]
pub struct RegisterArgs {
    /// Most suggestions shown per search.
    #[arg(short, long, default_value = "10")]
    pub limit: usize,
}

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    /// Only list products with at most this many units.
    #[arg(long)]
    pub low_stock: Option<i64>,
}

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Text to look for in product names.
    #[arg(default_value = "")]
    pub query: String,

    /// Show only the first N matches.
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the sell command.
#[derive(Args)]
pub struct SellArgs {
    /// Product names, one unit per occurrence.
    #[arg(required = true)]
    pub products: Vec<String>,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,

    /// Check stock without selling.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Spreadsheet the register reads.
        #[arg(long, default_value = "productos.csv")]
        sheet: String,

        /// File format to write.
        #[arg(long, value_enum, default_value_t = ConfigFormat::Toml)]
        format: ConfigFormat,

        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

/// Config file formats.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// caja.toml, with comments.
    Toml,
    /// caja.json.
    Json,
}
