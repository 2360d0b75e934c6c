use clap::{Args, Subcommand};

use crate::commands::open_store;
use crate::output::{print_saved_row, print_vehicle_results};

/// Manage saved vehicle calculations.
#[derive(Debug, Args)]
pub struct SavedArgs {
    #[command(subcommand)]
    command: SavedCommand,
}

#[derive(Debug, Subcommand)]
enum SavedCommand {
    /// List every saved calculation, oldest first.
    List,
    /// Show one saved calculation in full.
    Show {
        id: i64,
        /// Print the full amortization schedule.
        #[arg(long)]
        schedule: bool,
    },
    /// Delete one saved calculation.
    Delete { id: i64 },
    /// Delete every saved calculation.
    Clear,
}

pub async fn run(
    args: SavedArgs,
    backend: &str,
    store_location: &str,
) -> anyhow::Result<()> {
    let store = open_store(backend, store_location).await?;

    match args.command {
        SavedCommand::List => {
            let records = store.list().await?;
            if records.is_empty() {
                println!("No saved calculations.");
                return Ok(());
            }
            println!(
                "  {:>4}  {:16}  {:>12}  {:>19}  label",
                "id", "saved at", "price", "payment"
            );
            for record in &records {
                print_saved_row(record);
            }
        }
        SavedCommand::Show { id, schedule } => {
            let record = store.get(id).await?;
            println!(
                "#{} '{}' saved {}",
                record.id,
                record.label,
                record.created_at.format("%Y-%m-%d %H:%M")
            );
            println!();
            print_vehicle_results(&record.results, schedule);
        }
        SavedCommand::Delete { id } => {
            store.delete(id).await?;
            println!("Deleted calculation {id}.");
        }
        SavedCommand::Clear => {
            store.clear().await?;
            println!("Cleared all saved calculations.");
        }
    }

    Ok(())
}
