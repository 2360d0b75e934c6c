use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

/// Paycheck and vehicle cost calculators.
///
/// `paystub` generates a full year of biweekly paystubs with federal,
/// Social Security, and Medicare withholding. `vehicle` runs the title,
/// tax, and license, loan payment, lease comparison, and cost-of-ownership
/// calculators. `saved` manages stored vehicle calculations.
#[derive(Debug, Parser)]
#[command(name = "paycalc")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Storage backend for saved calculations.
    #[arg(long, global = true, default_value = "jsonfile")]
    backend: String,

    /// Storage location. For the JSON backend this is a file path or
    /// `:memory:`.
    #[arg(long, global = true, default_value = "saved-calcs.json")]
    store: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a full year of biweekly paystubs.
    Paystub(commands::paystub::PaystubArgs),
    /// Estimate TTL fees, loan payments, lease costs, and ownership cost.
    Vehicle(commands::vehicle::VehicleArgs),
    /// Manage saved vehicle calculations.
    Saved(commands::saved::SavedArgs),
}

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info` so normal runs are quiet.
/// * Strips timestamps and target names to keep CLI output clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Paystub(args) => commands::paystub::run(args),
        Command::Vehicle(args) => commands::vehicle::run(args, &cli.backend, &cli.store).await,
        Command::Saved(args) => commands::saved::run(args, &cli.backend, &cli.store).await,
    }
}
