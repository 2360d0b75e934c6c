use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use paycalc_data::{BracketLoader, builtin_tables};

/// Overlay bracket data from a CSV file onto the built-in tables.
///
/// The CSV file should have the following columns:
/// - tax_year: The tax year (e.g., 2025)
/// - schedule: The IRS schedule code (X, Y-1, Y-2, Z)
/// - min_income: The minimum income for this bracket
/// - max_income: The maximum income (empty for unlimited)
/// - rate: The marginal tax rate as a decimal (e.g., 0.10)
#[derive(Parser, Debug)]
#[command(name = "paycalc-bracket-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing bracket data
    #[arg(short, long)]
    file: PathBuf,

    /// Write the merged table set as JSON to this path
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Loading brackets from: {}", args.file.display());

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = BracketLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    println!("Parsed {} records from CSV", records.len());

    let mut tables = builtin_tables();
    let applied = BracketLoader::apply(&mut tables, &records)
        .context("Failed to apply brackets to the built-in tables")?;

    println!(
        "Applied {} brackets over years {:?}.",
        applied,
        tables.years()
    );

    if let Some(out) = &args.out {
        let json = serde_json::to_string_pretty(&tables)
            .context("Failed to serialize the merged tables")?;
        std::fs::write(out, json)
            .with_context(|| format!("Failed to write: {}", out.display()))?;
        println!("Wrote merged tables to: {}", out.display());
    }

    Ok(())
}
