use anyhow::bail;
use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use tracing::info;

use paycalc_core::calculations::calculate_all;
use paycalc_core::models::{
    InputMode, NewSavedCalculation, PaymentFrequency, VehicleQuote,
};

use crate::commands::open_store;
use crate::output::print_vehicle_results;

/// Estimate TTL fees, loan payments, lease costs, and ownership cost.
///
/// Only `--price` is required; every other field falls back to a sensible
/// default unless `--strict` is given, in which case missing or invalid
/// fields are reported instead.
#[derive(Debug, Args)]
pub struct VehicleArgs {
    /// Purchase price in dollars.
    #[arg(long)]
    price: Decimal,

    /// Trade-in value credited against the taxable amount.
    #[arg(long)]
    trade_in: Option<Decimal>,

    /// Curb weight in pounds (registration is weight-tiered).
    #[arg(long)]
    weight: Option<u32>,

    /// The vehicle is electric.
    #[arg(long)]
    electric: bool,

    /// The vehicle is used.
    #[arg(long)]
    used: bool,

    /// County of registration.
    #[arg(long)]
    county: Option<String>,

    /// Five-digit ZIP code.
    #[arg(long)]
    zip: Option<String>,

    /// Loan term in months.
    #[arg(long)]
    term: Option<u32>,

    /// Annual interest rate as a percentage (e.g. 6.5).
    #[arg(long)]
    apr: Option<Decimal>,

    /// Down payment in dollars.
    #[arg(long)]
    down: Option<Decimal>,

    /// Payment frequency: monthly or biweekly.
    #[arg(long)]
    frequency: Option<String>,

    /// Loan start date (YYYY-MM-DD); enables dates on the schedule.
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Annual mileage allowance for the lease comparison.
    #[arg(long)]
    mileage: Option<u32>,

    /// End-of-lease buyout price.
    #[arg(long)]
    buyout: Option<Decimal>,

    /// Residual value at lease end.
    #[arg(long)]
    residual: Option<Decimal>,

    /// Lease money factor (e.g. 0.00125).
    #[arg(long)]
    money_factor: Option<Decimal>,

    /// Reject missing or invalid fields instead of backfilling defaults.
    #[arg(long)]
    strict: bool,

    /// Print the full amortization schedule.
    #[arg(long)]
    schedule: bool,

    /// Emit the results as JSON instead of tables.
    #[arg(long)]
    json: bool,

    /// Save the inputs and results under this label.
    #[arg(long)]
    save: Option<String>,
}

fn parse_frequency(s: &str) -> anyhow::Result<PaymentFrequency> {
    match s.to_ascii_lowercase().as_str() {
        "monthly" => Ok(PaymentFrequency::Monthly),
        "biweekly" => Ok(PaymentFrequency::Biweekly),
        other => bail!("unknown payment frequency '{other}'; expected monthly or biweekly"),
    }
}

pub async fn run(
    args: VehicleArgs,
    backend: &str,
    store_location: &str,
) -> anyhow::Result<()> {
    let frequency = args
        .frequency
        .as_deref()
        .map(parse_frequency)
        .transpose()?;

    let quote = VehicleQuote {
        purchase_price: Some(args.price),
        trade_in_value: args.trade_in,
        vehicle_weight_lbs: args.weight,
        electric: Some(args.electric),
        used: Some(args.used),
        county: args.county,
        zip_code: args.zip,
        loan_term_months: args.term,
        annual_rate_pct: args.apr,
        down_payment: args.down,
        payment_frequency: frequency,
        loan_start_date: args.start_date,
        lease_annual_mileage: args.mileage,
        lease_buyout: args.buyout,
        residual_value: args.residual,
        money_factor: args.money_factor,
    };

    let mode = if args.strict {
        InputMode::Strict
    } else {
        InputMode::Lenient
    };

    let inputs = match quote.into_inputs(mode) {
        Ok(inputs) => inputs,
        Err(errors) => {
            for (field, message) in errors.iter() {
                eprintln!("error: {field}: {message}");
            }
            bail!("{} invalid input(s)", errors.len());
        }
    };

    let results = calculate_all(&inputs);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_vehicle_results(&results, args.schedule);
    }

    if let Some(label) = args.save {
        let store = open_store(backend, store_location).await?;
        let record = store
            .save(NewSavedCalculation {
                label,
                inputs,
                results,
            })
            .await?;
        info!(id = record.id, "saved calculation '{}'", record.label);
    }

    Ok(())
}
