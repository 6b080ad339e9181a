//! Caja - a point-of-sale register over a product spreadsheet.
//!
//! Commands:
//! - `caja register` - Run an interactive sale session
//! - `caja products` - List the catalog
//! - `caja search` - Filter product names
//! - `caja sell` - Sell products in one step
//! - `caja config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConfigArgs, ProductsArgs, RegisterArgs, SearchArgs, SellArgs};

/// Caja - Sell from a product spreadsheet
#[derive(Parser)]
#[command(name = "caja")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Product spreadsheet (overrides sheet.path)
    #[arg(short, long, global = true)]
    sheet: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive sale session
    Register(RegisterArgs),

    /// List products and stock
    Products(ProductsArgs),

    /// Filter product names
    Search(SearchArgs),

    /// Sell the named products in one step
    Sell(SellArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = context::Context::load(cli.config.as_deref(), cli.sheet.as_deref(), output)?;

    let result = match cli.command {
        Commands::Register(args) => commands::register::run(args, &ctx),
        Commands::Products(args) => commands::products::run(args, &ctx),
        Commands::Search(args) => commands::search::run(args, &ctx),
        Commands::Sell(args) => commands::sell::run(args, &ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Send library events to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("caja=debug,caja_commerce=debug")
        } else {
            EnvFilter::new("error")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
