// Script to create an empty parcel database with the tracker schema
// Run with: cargo run --bin create-tracker-db -- [path]

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;
use std::path::PathBuf;

use parcel_tracker_lib::db::SCHEMA;
use parcel_tracker_lib::init_logging;

#[derive(Parser, Debug)]
#[command(name = "create-tracker-db", about = "Create a fresh parcel database")]
struct Args {
    /// Database file to create; an existing file is replaced
    #[arg(default_value = "tracker.db")]
    path: PathBuf,
}

fn main() -> Result<()> {
    init_logging("info");
    let args = Args::parse();
    let db_path = args.path;

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    if db_path.exists() {
        log::warn!("Replacing existing database {}", db_path.display());
        std::fs::remove_file(&db_path)?;
    }

    let conn = Connection::open(&db_path)
        .with_context(|| format!("failed to create {}", db_path.display()))?;
    conn.execute_batch(SCHEMA)?;

    println!("Created parcel database at: {}", db_path.display());

    Ok(())
}
