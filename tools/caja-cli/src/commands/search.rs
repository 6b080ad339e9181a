//! Product name search.

use anyhow::Result;
use caja_commerce::prelude::*;
use console::style;
use serde::Serialize;

use super::SearchArgs;
use crate::context::Context;

#[derive(Serialize)]
struct SearchReport<'a> {
    query: &'a str,
    matches: &'a [String],
    highlight: Option<&'a str>,
}

/// Run the search command.
pub fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let mut register = ctx.open_loaded_register()?;
    let results = register.on_filter_changed(&args.query);

    let shown = match args.limit {
        Some(limit) => &results.matches[..limit.min(results.len())],
        None => &results.matches[..],
    };

    if ctx.output.is_json() {
        ctx.output.json(&SearchReport {
            query: &results.query,
            matches: shown,
            highlight: results.highlight(),
        });
        return Ok(());
    }

    if results.is_empty() {
        ctx.output.info(&format!("No products match '{}'", args.query));
        return Ok(());
    }

    for name in shown {
        if Some(name.as_str()) == results.highlight() {
            println!("{} {}", style("›").green(), style(name).bold());
        } else {
            println!("  {}", name);
        }
    }
    if shown.len() < results.len() {
        ctx.output
            .info(&format!("{} more not shown", results.len() - shown.len()));
    }

    Ok(())
}
