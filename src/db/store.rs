// ABOUTME: SQLite parcel storage for Parcel Tracker
// ABOUTME: One parameterized statement per operation against the parcel table

use rusqlite::{named_params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

use crate::models::{Parcel, PARCEL_STATUS_REGISTERED};

/// Schema for the parcel table. Safe to run against an existing database.
pub const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS parcel (
        number INTEGER PRIMARY KEY AUTOINCREMENT,
        client INTEGER NOT NULL,
        status TEXT NOT NULL,
        address TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_parcel_client ON parcel(client);
"#;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Parcel not found: {0}")]
    NotFound(i64),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database connection lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

pub struct ParcelStore {
    conn: Mutex<Connection>,
}

impl ParcelStore {
    /// Wrap a connection owned by the caller. The schema is not touched.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open or create the database file and make sure the parcel table exists
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        log::debug!("Opening parcel database at {}", path.display());
        let store = Self::new(Connection::open(path)?);
        store.initialize()?;
        Ok(store)
    }

    /// Open a private in-memory database with the schema applied
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Self::new(Connection::open_in_memory()?);
        store.initialize()?;
        Ok(store)
    }

    /// Create the parcel table and its index if missing
    pub fn initialize(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Insert a new parcel and return the number storage assigned to it.
    /// `parcel.number` is ignored.
    pub fn add(&self, parcel: &Parcel) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO parcel (client, status, address, created_at) VALUES (:client, :status, :address, :created_at)",
            named_params! {
                ":client": parcel.client,
                ":status": parcel.status,
                ":address": parcel.address,
                ":created_at": parcel.created_at,
            },
        )?;

        let number = conn.last_insert_rowid();
        log::debug!("Added parcel {} for client {}", number, parcel.client);
        Ok(number)
    }

    /// Read one parcel by number
    pub fn get(&self, number: i64) -> Result<Parcel, StoreError> {
        let conn = self.conn()?;
        match conn.query_row(
            "SELECT number, client, status, address, created_at FROM parcel WHERE number = :number",
            named_params! { ":number": number },
            parcel_from_row,
        ) {
            Ok(parcel) => Ok(parcel),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StoreError::NotFound(number)),
            Err(e) => Err(e.into()),
        }
    }

    /// All parcels of one client, in whatever order SQLite returns them
    pub fn get_by_client(&self, client: i64) -> Result<Vec<Parcel>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT number, client, status, address, created_at FROM parcel WHERE client = :client",
        )?;

        let parcels = stmt
            .query_map(named_params! { ":client": client }, parcel_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(parcels)
    }

    /// Overwrite the status. A missing number is not an error.
    pub fn set_status(&self, number: i64, status: &str) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE parcel SET status = :status WHERE number = :number",
            named_params! { ":status": status, ":number": number },
        )?;
        Ok(())
    }

    /// Change the address of a parcel that is still registered.
    ///
    /// Returns `false` without error when the parcel is missing or has already
    /// left the `registered` state. The status check is part of the UPDATE itself.
    pub fn set_address(&self, number: i64, address: &str) -> Result<bool, StoreError> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE parcel SET address = :address WHERE number = :number AND status = :status",
            named_params! {
                ":address": address,
                ":number": number,
                ":status": PARCEL_STATUS_REGISTERED,
            },
        )?;
        Ok(changed > 0)
    }

    /// Delete a parcel that is still registered.
    ///
    /// Same contract as [`ParcelStore::set_address`]: `false` when nothing matched.
    pub fn delete(&self, number: i64) -> Result<bool, StoreError> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM parcel WHERE number = :number AND status = :status",
            named_params! {
                ":number": number,
                ":status": PARCEL_STATUS_REGISTERED,
            },
        )?;
        Ok(deleted > 0)
    }
}

fn parcel_from_row(row: &Row<'_>) -> rusqlite::Result<Parcel> {
    Ok(Parcel {
        number: row.get(0)?,
        client: row.get(1)?,
        status: row.get(2)?,
        address: row.get(3)?,
        created_at: row.get(4)?,
    })
}
