//! Database models
//!
//! Data structures representing database tables

use serde::{Deserialize, Serialize};

/// Account record in the database
///
/// `password_hash` is intentionally never serialized; API responses use the
/// dedicated response types in `api::models` and `auth::models` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}

/// Journal entry record, owned by exactly one account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}
