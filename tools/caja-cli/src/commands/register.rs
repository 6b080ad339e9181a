//! Interactive sale session.

use anyhow::{bail, Result};
use caja_commerce::prelude::*;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

use super::RegisterArgs;
use crate::context::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Add,
    RemoveLast,
    Checkout,
    Cancel,
    Reload,
    Quit,
}

impl Action {
    const ALL: [Action; 6] = [
        Action::Add,
        Action::RemoveLast,
        Action::Checkout,
        Action::Cancel,
        Action::Reload,
        Action::Quit,
    ];

    fn label(&self) -> &'static str {
        match self {
            Action::Add => "Add product",
            Action::RemoveLast => "Remove last item",
            Action::Checkout => "Checkout",
            Action::Cancel => "Cancel sale",
            Action::Reload => "Reload catalog",
            Action::Quit => "Quit",
        }
    }
}

/// Run the register command.
pub fn run(args: RegisterArgs, ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        bail!("The register session is interactive; use `caja sell` for JSON output");
    }

    let mut register = ctx.open_register()?;
    let theme = ColorfulTheme::default();
    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    ctx.output.header(&format!(
        "Register: {} products in {}",
        register.catalog().len(),
        register.store().describe()
    ));

    loop {
        ctx.output.info(&format!(
            "{} items, total {}",
            register.cart().len(),
            register.cart().total()
        ));

        let choice = Select::with_theme(&theme)
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[choice] {
            Action::Add => add_product(&mut register, args.limit, &theme, ctx)?,
            Action::RemoveLast => match register.remove_last() {
                Some(name) => ctx.output.info(&format!("Removed {}", name)),
                None => ctx.output.info("Cart is empty"),
            },
            Action::Checkout => {
                ctx.output.cart(register.cart());
                match register.on_checkout_requested() {
                    Ok(receipt) => ctx.output.receipt(&receipt),
                    Err(e) => ctx.output.checkout_error(&e),
                }
            }
            Action::Cancel => register.cancel_sale(),
            Action::Reload => {
                if let Some(e) = register.reload().error() {
                    ctx.output.warn(&format!("Catalog unavailable: {}", e));
                } else {
                    ctx.output
                        .success(&format!("Loaded {} products", register.catalog().len()));
                }
            }
            Action::Quit => {
                if register.cart().is_empty() || confirm_discard(&theme)? {
                    return Ok(());
                }
            }
        }
    }
}

fn add_product(
    register: &mut Register<CsvSheet>,
    limit: usize,
    theme: &ColorfulTheme,
    ctx: &Context,
) -> Result<()> {
    let text: String = Input::with_theme(theme)
        .with_prompt("Filter")
        .allow_empty(true)
        .interact_text()?;

    let results = register.on_filter_changed(&text);
    if results.is_empty() {
        ctx.output.warn(&format!("No products match '{}'", text));
        return Ok(());
    }

    let catalog = register.catalog();
    let items: Vec<String> = results
        .matches
        .iter()
        .map(|name| match catalog.get(name) {
            Some(product) => format!(
                "{}  {}  ({} left)",
                name,
                product.price.display(),
                product.quantity
            ),
            None => name.clone(),
        })
        .collect();

    // The highlighted match is the first one.
    let picked = Select::with_theme(theme)
        .with_prompt("Product")
        .items(&items)
        .default(0)
        .max_length(limit.max(1))
        .interact_opt()?;

    if let Some(index) = picked {
        let name = &results.matches[index];
        match register.on_product_selected(name) {
            Ok(cart) => {
                ctx.output.debug(&format!("Cart has {} items", cart.len()));
                ctx.output.success(&format!("Added {}", name));
            }
            Err(e) => ctx.output.warn(&format!("Not added: {}", e)),
        }
    }

    Ok(())
}

fn confirm_discard(theme: &ColorfulTheme) -> Result<bool> {
    Ok(Confirm::with_theme(theme)
        .with_prompt("Discard the sale in progress?")
        .default(false)
        .interact()?)
}
