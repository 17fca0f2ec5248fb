// ABOUTME: Main library for Parcel Tracker
// ABOUTME: Module declarations and logger setup shared by the binaries

pub mod config;
pub mod db;
pub mod models;
pub mod service;

pub use db::{ParcelStore, StoreError};
pub use models::{Parcel, ParcelStatus};
pub use service::{ParcelService, ServiceError};

/// Initialize `env_logger`, using `default_level` when `RUST_LOG` is not set
pub fn init_logging(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    // A second init (e.g. from tests) is harmless
    let _ = env_logger::Builder::from_env(env).try_init();
}
