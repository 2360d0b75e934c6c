use anyhow::{Context, bail};
use clap::Args;
use rust_decimal::Decimal;

use paycalc_core::calculations::PaystubGenerator;
use paycalc_core::calculations::validate_paystub_inputs;
use paycalc_core::models::{FilingStatus, PaystubInputs};
use paycalc_data::builtin_tables;

use crate::output::money;

/// Generate a full year of biweekly paystubs.
#[derive(Debug, Args)]
pub struct PaystubArgs {
    /// Employee name as it should appear on the stub.
    #[arg(long)]
    employee: String,

    /// Employer name.
    #[arg(long)]
    employer: String,

    /// Hourly rate in dollars.
    #[arg(long)]
    rate: Decimal,

    /// Hours worked per biweekly period.
    #[arg(long, default_value = "80")]
    hours: Decimal,

    /// Filing status: S, MFJ, MFS, or HOH.
    #[arg(long, default_value = "S")]
    filing_status: String,

    /// Tax year for the withholding tables.
    #[arg(long, default_value_t = 2025)]
    year: i32,

    /// Flat state tax rate as a decimal (e.g. 0.05).
    #[arg(long, default_value = "0")]
    state_rate: Decimal,

    /// Fixed other deductions per period (insurance, 401k, ...).
    #[arg(long, default_value = "0")]
    deductions: Decimal,

    /// Emit the full paystub set as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

pub fn run(args: PaystubArgs) -> anyhow::Result<()> {
    let filing_status = FilingStatus::parse(&args.filing_status).with_context(|| {
        format!(
            "unknown filing status '{}'; expected S, MFJ, MFS, or HOH",
            args.filing_status
        )
    })?;

    let inputs = PaystubInputs {
        employee_name: args.employee,
        employer_name: args.employer,
        hourly_rate: args.rate,
        hours_per_period: args.hours,
        filing_status,
        tax_year: args.year,
        state_tax_rate: args.state_rate,
        other_deductions: args.deductions,
    };

    if let Err(errors) = validate_paystub_inputs(&inputs) {
        for (field, message) in errors.iter() {
            eprintln!("error: {field}: {message}");
        }
        bail!("{} invalid input(s)", errors.len());
    }

    let tables = builtin_tables();
    let data = PaystubGenerator::new(&tables)
        .generate(&inputs)
        .with_context(|| format!("failed to generate paystubs for {}", inputs.tax_year))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    println!(
        "{} at {} ({}, {})",
        data.employee_name, data.employer_name, data.filing_status, data.tax_year
    );
    println!();
    println!(
        "{:>4} {:>10}  {:>10} {:>10} {:>9} {:>9} {:>9} {:>9} {:>11}",
        "#", "date", "gross", "federal", "soc sec", "medicare", "state", "other", "net"
    );
    for period in &data.pay_periods {
        println!(
            "{:>4} {:>10}  {:>10} {:>10} {:>9} {:>9} {:>9} {:>9} {:>11}",
            period.period,
            period.pay_date,
            money(period.gross_pay),
            money(period.federal_tax),
            money(period.social_security),
            money(period.medicare),
            money(period.state_tax),
            money(period.other_deductions),
            money(period.net_pay)
        );
    }
    println!();
    println!(
        "{:>16}  {:>10} {:>10} {:>9} {:>9} {:>9} {:>9} {:>11}",
        "totals",
        money(data.totals.gross_pay),
        money(data.totals.federal_tax),
        money(data.totals.social_security),
        money(data.totals.medicare),
        money(data.totals.state_tax),
        money(data.totals.other_deductions),
        money(data.totals.net_pay)
    );

    Ok(())
}
