// ABOUTME: Entry point for the Parcel Tracker command line tool
// ABOUTME: Parses arguments, opens the parcel database and runs one command

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use parcel_tracker_lib::config::TrackerConfig;
use parcel_tracker_lib::{init_logging, ParcelService, ParcelStore};

#[derive(Parser, Debug)]
#[command(name = "parcel-tracker", version, about = "Track parcels from registration to delivery")]
struct Cli {
    /// Path to the SQLite database (defaults to the configured location)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a new parcel
    Register {
        #[arg(long)]
        client: i64,
        #[arg(long)]
        address: String,
    },
    /// Show one parcel
    Get { number: i64 },
    /// List all parcels of a client
    List {
        #[arg(long)]
        client: i64,
    },
    /// Move a parcel to its next status
    Advance { number: i64 },
    /// Change the address of a registered parcel
    SetAddress { number: i64, address: String },
    /// Delete a registered parcel
    Delete { number: i64 },
    /// Walk one client through the whole parcel lifecycle
    Demo {
        #[arg(long, default_value_t = 1)]
        client: i64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = TrackerConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: using default config: {}", e);
        TrackerConfig::default()
    });
    init_logging(&config.log_level);

    let db_path = cli.db.unwrap_or(config.database_path);
    let store = ParcelStore::open(&db_path)
        .with_context(|| format!("failed to open parcel database {}", db_path.display()))?;
    let service = ParcelService::new(store);

    match cli.command {
        Command::Register { client, address } => {
            let parcel = service.register(client, &address)?;
            println!("{}", parcel);
        }
        Command::Get { number } => {
            println!("{}", service.get(number)?);
        }
        Command::List { client } => print_client_parcels(&service, client)?,
        Command::Advance { number } => match service.next_status(number)? {
            Some(status) => println!("Parcel #{} is now {}", number, status),
            None => println!("Parcel #{} is already delivered", number),
        },
        Command::SetAddress { number, address } => {
            if service.change_address(number, &address)? {
                println!("Parcel #{} will go to '{}'", number, address);
            } else {
                println!("Parcel #{} address unchanged", number);
            }
        }
        Command::Delete { number } => {
            if service.delete(number)? {
                println!("Parcel #{} deleted", number);
            } else {
                println!("Parcel #{} kept", number);
            }
        }
        Command::Demo { client } => run_demo(&service, client)?,
    }

    Ok(())
}

fn print_client_parcels(service: &ParcelService, client: i64) -> Result<()> {
    let parcels = service.client_parcels(client)?;
    println!("Parcels of client {}:", client);
    for parcel in &parcels {
        println!("  {}", parcel);
    }
    println!();
    Ok(())
}

fn run_demo(service: &ParcelService, client: i64) -> Result<()> {
    let parcel = service.register(client, "Pskov, Sadovaya 5, apt 12")?;
    print_client_parcels(service, client)?;

    service.change_address(parcel.number, "Saratov, Vesennyaya 3, apt 4")?;
    service.next_status(parcel.number)?;
    print_client_parcels(service, client)?;

    // Already sent, so this leaves the parcel in place
    service.delete(parcel.number)?;
    print_client_parcels(service, client)?;

    let fresh = service.register(client, "Pskov, Sadovaya 5")?;
    service.delete(fresh.number)?;
    print_client_parcels(service, client)?;

    Ok(())
}
