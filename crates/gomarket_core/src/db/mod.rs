//! SQLite bootstrap for the cart key-value store.
//!
//! Errors surface as `StorageError`; callers above the storage layer never
//! see raw SQLite types.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
