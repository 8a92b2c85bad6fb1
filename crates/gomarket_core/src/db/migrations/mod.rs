//! Schema steps for the `kv_store` table.
//!
//! # Invariants
//! - Step versions are strictly increasing; the applied version is kept in
//!   `PRAGMA user_version`.
//! - After migration the `kv_store` table exists, or bootstrap fails with
//!   `StorageError::MissingTable`.

use crate::storage::{StorageError, StorageResult};
use rusqlite::Connection;

/// `(user_version, sql)` pairs applied in order.
const SCHEMA_STEPS: &[(u32, &str)] = &[(1, include_str!("0001_kv_store.sql"))];

const KV_TABLE: &str = "kv_store";

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |(version, _)| *version)
}

/// Reads the schema version recorded in the database.
pub fn schema_version(conn: &Connection) -> StorageResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Brings the schema up to `latest_version` and checks the cart table.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file comes from a newer build.
/// - `MissingTable` when the recorded version claims a table that is absent.
pub fn apply_migrations(conn: &mut Connection) -> StorageResult<()> {
    let found = schema_version(conn)?;
    let latest = latest_version();
    if found > latest {
        return Err(StorageError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: latest,
        });
    }

    if found < latest {
        let tx = conn.transaction()?;
        for (version, sql) in SCHEMA_STEPS.iter().skip_while(|(v, _)| *v <= found) {
            tx.execute_batch(sql)?;
            tx.pragma_update(None, "user_version", version)?;
        }
        tx.commit()?;
    }

    ensure_kv_table(conn)
}

/// Fails with `MissingTable` unless the `kv_store` table exists.
pub fn ensure_kv_table(conn: &Connection) -> StorageResult<()> {
    let present: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [KV_TABLE],
        |row| row.get(0),
    )?;
    if present {
        Ok(())
    } else {
        Err(StorageError::MissingTable)
    }
}
