//! Relational store (SQLite).
//!
//! - schema migration (`schema`)
//! - batched loading of normalized rows (`loader`)
//! - read-only report queries (`queries`)
//!
//! Connections are opened per logical operation and dropped when it ends.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::error::AppError;

pub mod loader;
pub mod queries;
pub mod schema;

pub use loader::*;
pub use queries::*;
pub use schema::*;

/// Open (or create) the database file.
pub fn open(path: &Path) -> Result<Connection, AppError> {
    log::info!("Connecting to the database at {}", path.display());
    Connection::open(path)
        .map_err(|e| AppError::store(format!("Failed to open database '{}': {e}", path.display())))
}

/// Open an existing database file read-only. A missing file is an input error.
pub fn open_existing(path: &Path) -> Result<Connection, AppError> {
    if !path.is_file() {
        return Err(AppError::input(format!(
            "The database file does not exist: {}. Run an ingestion first.",
            path.display()
        )));
    }
    log::info!("Connecting to the database at {} (read-only)", path.display());
    Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI)
        .map_err(|e| AppError::store(format!("Failed to open database '{}': {e}", path.display())))
}
