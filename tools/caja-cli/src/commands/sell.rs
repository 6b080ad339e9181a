//! One-shot sale.

use anyhow::{bail, Result};
use caja_commerce::prelude::*;
use dialoguer::Confirm;

use super::SellArgs;
use crate::context::Context;

/// Run the sell command.
pub fn run(args: SellArgs, ctx: &Context) -> Result<()> {
    let mut register = ctx.open_loaded_register()?;

    for name in &args.products {
        let selected = register.on_product_selected(name).map(|_| ());
        match selected {
            Ok(()) => {}
            Err(e @ CommerceError::ProductNotFound(_)) => {
                let suggestion = register.on_filter_changed(name);
                match suggestion.highlight() {
                    Some(close) => bail!("{} (did you mean '{}'?)", e, close),
                    None => bail!(e),
                }
            }
            Err(e) => bail!(e),
        }
    }

    ctx.output.header("Sale");
    ctx.output.cart(register.cart());

    let counts = SaleCounts::from_items(register.cart().line_items());
    if args.dry_run {
        register.catalog().check_stock(counts.as_map())?;
        ctx.output.info("Dry run - no changes made");
        ctx.output.success("Stock covers the sale");
        return Ok(());
    }

    if !args.yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Charge {}?", register.cart().total()))
            .default(true)
            .interact()?;

        if !confirmed {
            register.cancel_sale();
            ctx.output.warn("Sale cancelled");
            return Ok(());
        }
    }

    match register.on_checkout_requested() {
        Ok(receipt) => {
            ctx.output.receipt(&receipt);
            Ok(())
        }
        Err(e) => {
            ctx.output.checkout_error(&e);
            bail!("Sale not completed");
        }
    }
}
