use serde::{Deserialize, Serialize};

/// Request body for creating an entry
#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub title: String,
    pub content: String,
}

/// Request body for updating an entry (full replacement of both fields)
#[derive(Debug, Deserialize)]
pub struct UpdateEntryRequest {
    pub title: String,
    pub content: String,
}

/// Entry as returned to its owner
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<crate::db::models::Entry> for EntryResponse {
    fn from(entry: crate::db::models::Entry) -> Self {
        Self {
            id: entry.id,
            owner_id: entry.owner_id,
            title: entry.title,
            content: entry.content,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}
