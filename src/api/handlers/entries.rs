//! Entry CRUD handlers
//!
//! Every handler takes the authenticated identity as an explicit extractor
//! argument and passes it into the repository, so ownership scoping is
//! applied on every operation. The owner of a new entry is always the
//! caller; an owner field in a request body would be ignored because none is
//! deserialized.

use crate::api::models::{CreateEntryRequest, EntryResponse, UpdateEntryRequest};
use crate::auth::middleware::AuthAccount;
use crate::core::error::{Result, VaultError};
use crate::db::models::Entry;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use super::AppState;

/// Maximum title length in characters
const MAX_TITLE_LEN: usize = 100;

/// Validate entry fields shared by create and update
fn validate_entry_fields(title: &str, content: &str) -> Result<()> {
    let title_len = title.chars().count();
    if title_len == 0 || title_len > MAX_TITLE_LEN {
        return Err(VaultError::ValidationError(format!(
            "title must be between 1 and {} characters",
            MAX_TITLE_LEN
        )));
    }

    if content.is_empty() {
        return Err(VaultError::ValidationError(
            "content cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Handler for POST /api/entries - Create a new entry
pub async fn create_entry(
    State(state): State<AppState>,
    auth: AuthAccount,
    Json(req): Json<CreateEntryRequest>,
) -> Result<impl IntoResponse> {
    validate_entry_fields(&req.title, &req.content)?;

    let now = chrono::Utc::now().to_rfc3339();
    let entry = Entry {
        id: Uuid::new_v4().to_string(),
        owner_id: auth.account_id,
        title: req.title,
        content: req.content,
        created_at: now.clone(),
        updated_at: now,
    };

    state.entry_repo.create(&entry).await?;

    tracing::info!(entry_id = %entry.id, owner_id = %entry.owner_id, "Entry created");

    Ok((StatusCode::CREATED, Json(EntryResponse::from(entry))))
}

/// Handler for GET /api/entries - List the caller's entries, newest first
pub async fn list_entries(
    State(state): State<AppState>,
    auth: AuthAccount,
) -> Result<impl IntoResponse> {
    let entries = state.entry_repo.find_by_owner(&auth.account_id).await?;

    let responses: Vec<EntryResponse> = entries.into_iter().map(EntryResponse::from).collect();

    Ok(Json(responses))
}

/// Handler for GET /api/entries/:id - Fetch one of the caller's entries
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: AuthAccount,
) -> Result<impl IntoResponse> {
    let entry = state
        .entry_repo
        .find_scoped(&auth.account_id, &id)
        .await?
        .ok_or(VaultError::NotFoundOrForbidden)?;

    Ok(Json(EntryResponse::from(entry)))
}

/// Handler for PUT /api/entries/:id - Update one of the caller's entries
pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: AuthAccount,
    Json(req): Json<UpdateEntryRequest>,
) -> Result<impl IntoResponse> {
    // The ownership-scoped lookup comes first: a missing or foreign entry is
    // reported as a miss even when the body is also invalid.
    state
        .entry_repo
        .find_scoped(&auth.account_id, &id)
        .await?
        .ok_or(VaultError::NotFoundOrForbidden)?;

    validate_entry_fields(&req.title, &req.content)?;

    let entry = state
        .entry_repo
        .update(&auth.account_id, &id, &req.title, &req.content)
        .await?;

    tracing::info!(entry_id = %entry.id, owner_id = %entry.owner_id, "Entry updated");

    Ok(Json(EntryResponse::from(entry)))
}

/// Handler for DELETE /api/entries/:id - Permanently delete an entry
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: AuthAccount,
) -> Result<impl IntoResponse> {
    state.entry_repo.delete(&auth.account_id, &id).await?;

    tracing::info!(entry_id = %id, owner_id = %auth.account_id, "Entry deleted");

    Ok(StatusCode::NO_CONTENT)
}
