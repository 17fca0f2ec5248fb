// ABOUTME: Database module exports for Parcel Tracker
// ABOUTME: Contains the SQLite-backed parcel store

pub mod store;

pub use store::{ParcelStore, StoreError, SCHEMA};
