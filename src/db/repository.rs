//! Repository pattern implementation for data access layer
//!
//! `AccountRepository` is the credential store: it owns email normalization
//! and maps the UNIQUE-constraint violation on insert to `DuplicateEmail`, so
//! registration uniqueness is serialized by SQLite rather than by a racy
//! read-then-write check.
//!
//! `EntryRepository` enforces ownership scoping: every read, update, and
//! delete is filtered by `owner_id`, and a miss is reported as the single
//! `NotFoundOrForbidden` kind whether the entry is absent or owned by another
//! account.

use crate::core::error::{Result, VaultError};
use crate::db::manager::DatabaseManager;
use crate::db::models::{Account, Entry};
use rusqlite::OptionalExtension;
use std::sync::Arc;

/// Normalize an email address for storage and lookup: trimmed, lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Map a rusqlite error to DuplicateEmail when it is a UNIQUE-constraint
/// violation, passing everything else through as a database error.
fn map_unique_violation(err: rusqlite::Error) -> VaultError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            VaultError::DuplicateEmail
        }
        _ => VaultError::DatabaseError(err),
    }
}

/// Map a point-lookup error: a row that is gone is the same miss kind as a
/// row that never existed.
fn map_row_miss(err: rusqlite::Error) -> VaultError {
    match err {
        rusqlite::Error::QueryReturnedNoRows => VaultError::NotFoundOrForbidden,
        other => VaultError::DatabaseError(other),
    }
}

/// Repository for Account entities (credential store)
pub struct AccountRepository {
    db: Arc<DatabaseManager>,
}

impl AccountRepository {
    /// Create a new AccountRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Find an account by email, normalizing before lookup
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let email = normalize_email(email);
        self.db
            .execute(move |conn| {
                conn.query_row(
                    "SELECT id, email, password_hash, created_at FROM accounts WHERE email = ?",
                    [&email],
                    |row| {
                        Ok(Account {
                            id: row.get(0)?,
                            email: row.get(1)?,
                            password_hash: row.get(2)?,
                            created_at: row.get(3)?,
                        })
                    },
                )
                .optional()
                .map_err(VaultError::DatabaseError)
            })
            .await
    }

    /// Find an account by its ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Account>> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                conn.query_row(
                    "SELECT id, email, password_hash, created_at FROM accounts WHERE id = ?",
                    [&id],
                    |row| {
                        Ok(Account {
                            id: row.get(0)?,
                            email: row.get(1)?,
                            password_hash: row.get(2)?,
                            created_at: row.get(3)?,
                        })
                    },
                )
                .optional()
                .map_err(VaultError::DatabaseError)
            })
            .await
    }

    /// Create a new account
    ///
    /// The email is normalized before insertion. Fails with `DuplicateEmail`
    /// if an account with the normalized email already exists; under
    /// concurrent registration of the same address, exactly one create
    /// succeeds.
    pub async fn create(&self, account: &Account) -> Result<()> {
        let account = Account {
            email: normalize_email(&account.email),
            ..account.clone()
        };
        self.db
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO accounts (id, email, password_hash, created_at) \
                     VALUES (?, ?, ?, ?)",
                    rusqlite::params![
                        &account.id,
                        &account.email,
                        &account.password_hash,
                        &account.created_at
                    ],
                )
                .map_err(map_unique_violation)?;
                Ok(())
            })
            .await
    }

    /// Count total accounts
    pub async fn count(&self) -> Result<i64> {
        self.db
            .execute(|conn| {
                conn.query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))
                    .map_err(VaultError::DatabaseError)
            })
            .await
    }
}

/// Repository for Entry entities (owner-scoped journal store)
pub struct EntryRepository {
    db: Arc<DatabaseManager>,
}

impl EntryRepository {
    /// Create a new EntryRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Persist a new entry
    ///
    /// The caller fixes `owner_id` to the authenticated identity; it is never
    /// taken from a request body.
    pub async fn create(&self, entry: &Entry) -> Result<()> {
        let entry = entry.clone();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO entries (id, owner_id, title, content, created_at, updated_at) \
                     VALUES (?, ?, ?, ?, ?, ?)",
                    rusqlite::params![
                        &entry.id,
                        &entry.owner_id,
                        &entry.title,
                        &entry.content,
                        &entry.created_at,
                        &entry.updated_at
                    ],
                )
                .map_err(VaultError::DatabaseError)?;
                Ok(())
            })
            .await
    }

    /// List all entries owned by the given account, newest first
    pub async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<Entry>> {
        let owner_id = owner_id.to_string();
        self.db
            .execute(move |conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT id, owner_id, title, content, created_at, updated_at \
                         FROM entries WHERE owner_id = ? ORDER BY created_at DESC",
                    )
                    .map_err(VaultError::DatabaseError)?;

                let entries = stmt
                    .query_map([&owner_id], |row| {
                        Ok(Entry {
                            id: row.get(0)?,
                            owner_id: row.get(1)?,
                            title: row.get(2)?,
                            content: row.get(3)?,
                            created_at: row.get(4)?,
                            updated_at: row.get(5)?,
                        })
                    })
                    .map_err(VaultError::DatabaseError)?
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(VaultError::DatabaseError)?;

                Ok(entries)
            })
            .await
    }

    /// Owner-scoped point lookup
    ///
    /// Returns None both when the entry does not exist and when it belongs to
    /// a different account; callers cannot tell the two apart.
    pub async fn find_scoped(&self, owner_id: &str, entry_id: &str) -> Result<Option<Entry>> {
        let owner_id = owner_id.to_string();
        let entry_id = entry_id.to_string();
        self.db
            .execute(move |conn| {
                conn.query_row(
                    "SELECT id, owner_id, title, content, created_at, updated_at \
                     FROM entries WHERE id = ? AND owner_id = ?",
                    [&entry_id, &owner_id],
                    |row| {
                        Ok(Entry {
                            id: row.get(0)?,
                            owner_id: row.get(1)?,
                            title: row.get(2)?,
                            content: row.get(3)?,
                            created_at: row.get(4)?,
                            updated_at: row.get(5)?,
                        })
                    },
                )
                .optional()
                .map_err(VaultError::DatabaseError)
            })
            .await
    }

    /// Update an entry's title and content, refreshing `updated_at`
    ///
    /// The UPDATE is conditioned on `id AND owner_id`; zero affected rows
    /// means the entry is missing or belongs to someone else, reported as the
    /// single `NotFoundOrForbidden` kind. The write and the read-back run in
    /// one transaction so a concurrent delete cannot land between them, and a
    /// row that vanishes anyway is still reported as a miss. Returns the
    /// updated entry.
    pub async fn update(
        &self,
        owner_id: &str,
        entry_id: &str,
        title: &str,
        content: &str,
    ) -> Result<Entry> {
        let owner_id = owner_id.to_string();
        let entry_id = entry_id.to_string();
        let title = title.to_string();
        let content = content.to_string();
        let updated_at = chrono::Utc::now().to_rfc3339();

        self.db
            .transaction(move |tx| {
                let affected = tx
                    .execute(
                        "UPDATE entries SET title = ?, content = ?, updated_at = ? \
                         WHERE id = ? AND owner_id = ?",
                        rusqlite::params![&title, &content, &updated_at, &entry_id, &owner_id],
                    )
                    .map_err(VaultError::DatabaseError)?;

                if affected == 0 {
                    return Err(VaultError::NotFoundOrForbidden);
                }

                tx.query_row(
                    "SELECT id, owner_id, title, content, created_at, updated_at \
                     FROM entries WHERE id = ? AND owner_id = ?",
                    [&entry_id, &owner_id],
                    |row| {
                        Ok(Entry {
                            id: row.get(0)?,
                            owner_id: row.get(1)?,
                            title: row.get(2)?,
                            content: row.get(3)?,
                            created_at: row.get(4)?,
                            updated_at: row.get(5)?,
                        })
                    },
                )
                .map_err(map_row_miss)
            })
            .await
    }

    /// Permanently delete an entry
    ///
    /// Same ownership conjunction and same `NotFoundOrForbidden` rule on a
    /// miss as `update`.
    pub async fn delete(&self, owner_id: &str, entry_id: &str) -> Result<()> {
        let owner_id = owner_id.to_string();
        let entry_id = entry_id.to_string();
        self.db
            .execute(move |conn| {
                let affected = conn
                    .execute(
                        "DELETE FROM entries WHERE id = ? AND owner_id = ?",
                        [&entry_id, &owner_id],
                    )
                    .map_err(VaultError::DatabaseError)?;

                if affected == 0 {
                    return Err(VaultError::NotFoundOrForbidden);
                }

                Ok(())
            })
            .await
    }
}
