//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand, ConfigFormat};
use crate::config::{self, generate_default_config, CajaConfig};
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init {
            sheet,
            format,
            force,
        } => init_config(&sheet, format, force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let sheet = &ctx.config.sheet;
    ctx.output.info("");
    ctx.output.info("[sheet]");
    ctx.output.kv("path", &sheet.path);
    ctx.output.kv("resolved", &ctx.sheet_path().display().to_string());
    ctx.output.kv("delimiter", &format!("{:?}", sheet.delimiter));
    ctx.output.kv("columns.name", &sheet.columns.name);
    ctx.output.kv("columns.price", &sheet.columns.price);
    ctx.output.kv("columns.quantity", &sheet.columns.quantity);

    ctx.output.info("");
    ctx.output.info("[sale]");
    ctx.output.kv("currency", ctx.config.sale.currency.code());

    ctx.output.info("");
    ctx.output.info("[checkout]");
    ctx.output.kv(
        "rollback_on_save_failure",
        &ctx.config.checkout.rollback_on_save_failure.to_string(),
    );

    Ok(())
}

fn init_config(sheet: &str, format: ConfigFormat, force: bool, ctx: &Context) -> Result<()> {
    let config_path = match format {
        ConfigFormat::Toml => ctx.cwd.join("caja.toml"),
        ConfigFormat::Json => ctx.cwd.join("caja.json"),
    };

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    match format {
        ConfigFormat::Toml => fs::write(&config_path, generate_default_config(sheet))?,
        ConfigFormat::Json => {
            let mut config = CajaConfig::default();
            config.sheet.path = sheet.to_string();
            config.save(&config_path.to_string_lossy())?;
        }
    }

    ctx.output.success(&format!("Created: {}", config_path.display()));
    if !ctx.cwd.join(sheet).exists() {
        ctx.output.warn(&format!(
            "{} does not exist yet; it needs the columns Nombre, Precio and Cantidad",
            sheet
        ));
    }

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let findings = config::validate(&ctx.config, &ctx.config_dir());

    if findings.errors.is_empty() && findings.warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &findings.errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &findings.warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !findings.errors.is_empty() {
        bail!("Configuration has {} error(s)", findings.errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}
