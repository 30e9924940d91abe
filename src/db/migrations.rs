//! Database migrations
//!
//! Versioned schema migrations tracked in the schema_migrations table.

use crate::core::error::{Result, VaultError};
use rusqlite::Connection;
use tracing::info;

/// Migration version tracking table
const MIGRATION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at DATETIME DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Initial schema migration (version 1)
///
/// The UNIQUE constraint on accounts.email is load-bearing: registration
/// relies on it to serialize concurrent creates of the same address instead
/// of a read-then-write check.
const MIGRATION_V1: &str = r#"
-- Accounts table (authentication)
CREATE TABLE IF NOT EXISTS accounts (
    id TEXT PRIMARY KEY,
    email TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Journal entries, each owned by exactly one account
CREATE TABLE IF NOT EXISTS entries (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (owner_id) REFERENCES accounts(id) ON DELETE CASCADE
);

-- Indexes for performance
CREATE INDEX IF NOT EXISTS idx_entries_owner_id ON entries(owner_id);
CREATE INDEX IF NOT EXISTS idx_entries_owner_created ON entries(owner_id, created_at);
"#;

/// All migrations in order, indexed by version - 1
const MIGRATIONS: &[&str] = &[MIGRATION_V1];

/// Run all pending database migrations
///
/// This function applies database schema migrations in order. Applied versions
/// are tracked in the schema_migrations table, and each migration runs inside
/// a transaction so a failure leaves the schema at the previous version.
pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(MIGRATION_TABLE)
        .map_err(VaultError::DatabaseError)?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(VaultError::DatabaseError)?;

    for (idx, migration) in MIGRATIONS.iter().enumerate() {
        let version = (idx + 1) as i64;
        if version <= current_version {
            continue;
        }

        info!(version, "Applying database migration");

        let tx = conn.transaction().map_err(VaultError::DatabaseError)?;
        tx.execute_batch(migration)
            .map_err(VaultError::DatabaseError)?;
        tx.execute(
            "INSERT INTO schema_migrations (version) VALUES (?)",
            [version],
        )
        .map_err(VaultError::DatabaseError)?;
        tx.commit().map_err(VaultError::DatabaseError)?;
    }

    Ok(())
}
