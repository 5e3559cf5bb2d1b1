//! List the effective pricing table

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use evalboard_core::{EvalboardConfig, PricingTable};

use crate::console::CliConsole;

/// Build the table the aggregate command would use with the same inputs
pub fn effective_table(
    config: Option<&Path>,
    pricing_file: Option<PathBuf>,
    replace: bool,
) -> Result<PricingTable> {
    let mut config = match config {
        Some(path) => EvalboardConfig::from_file(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => EvalboardConfig::default(),
    };
    if let Some(path) = pricing_file {
        config = config.with_pricing_file(path);
    }
    if replace {
        config = config.replacing_default_pricing();
    }

    Ok(config.pricing_table()?)
}

/// Run the pricing command
pub fn run(config: Option<&Path>, pricing_file: Option<PathBuf>, replace: bool) -> Result<()> {
    let table = effective_table(config, pricing_file, replace)?;
    let console = CliConsole::new(false);

    if table.is_empty() {
        console.warn("Pricing table is empty; every per-run cost will be null");
        return Ok(());
    }

    console.print_header("Model pricing (USD per 1K tokens)");
    println!("{:<32} {:>12} {:>12}", "Model", "Input", "Output");
    println!("{:-<58}", "");
    for (model, pricing) in table.iter() {
        println!("{:<32} {:>12.6} {:>12.6}", model, pricing.input, pricing.output);
    }
    println!("\nTotal: {} models", table.len());

    Ok(())
}
