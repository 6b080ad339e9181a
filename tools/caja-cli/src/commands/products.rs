//! Catalog listing.

use anyhow::Result;
use caja_commerce::prelude::*;

use super::ProductsArgs;
use crate::context::Context;
use crate::output::stock_badge;

/// Stock at or below this is highlighted when no threshold is given.
const LOW_STOCK_HINT: i64 = 3;

/// Run the products command.
pub fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let register = ctx.open_loaded_register()?;
    let catalog = register.catalog();

    let products: Vec<&Product> = match args.low_stock {
        Some(threshold) => catalog.low_stock(threshold),
        None => catalog.products().collect(),
    };

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    match args.low_stock {
        Some(threshold) => ctx
            .output
            .header(&format!("Products with {} units or fewer", threshold)),
        None => ctx.output.header("Products"),
    }

    if products.is_empty() {
        ctx.output.info("No products");
        return Ok(());
    }

    let hint = args.low_stock.unwrap_or(LOW_STOCK_HINT);
    let widths = [30, 12, 8];
    ctx.output.table_row(&["Name", "Price", "Stock"], &widths);
    for product in &products {
        ctx.output.table_row(
            &[
                &product.name,
                &product.price.display(),
                &stock_badge(product.quantity, hint),
            ],
            &widths,
        );
    }

    let invalid = products.iter().filter(|p| !p.price.is_valid()).count();
    if invalid > 0 {
        ctx.output
            .warn(&format!("{} product(s) have no numeric price and sell at 0", invalid));
    }

    Ok(())
}
