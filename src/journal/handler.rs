//! HTTP handlers for the Journal API
//!
//! Provides 5 REST endpoints:
//! - GET    /api/v1/journal-entries       — list own entries (`?timeBlock=` filter)
//! - POST   /api/v1/journal-entries       — create entry
//! - GET    /api/v1/journal-entries/:id   — entry detail
//! - PUT    /api/v1/journal-entries/:id   — replace entry
//! - DELETE /api/v1/journal-entries/:id   — delete entry

use crate::auth::{AuthState, AuthUser};
use crate::body::JsonBody;
use crate::error::Result;
use crate::journal::store::JournalStore;
use crate::journal::types::*;
use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Shared state for journal handlers
#[derive(Clone)]
pub struct JournalState {
    pub store: Arc<JournalStore>,
    pub auth: AuthState,
}

impl FromRef<JournalState> for AuthState {
    fn from_ref(state: &JournalState) -> Self {
        state.auth.clone()
    }
}

/// Create the journal router
pub fn journal_router(state: JournalState) -> Router {
    Router::new()
        .route(
            "/api/v1/journal-entries",
            get(list_entries).post(create_entry),
        )
        .route(
            "/api/v1/journal-entries/:id",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ListEntriesQuery {
    #[serde(rename = "timeBlock")]
    time_block: Option<String>,
}

/// GET /api/v1/journal-entries
async fn list_entries(
    State(state): State<JournalState>,
    AuthUser(user): AuthUser,
    Query(params): Query<ListEntriesQuery>,
) -> Result<Json<Vec<JournalEntry>>> {
    let time_block = params
        .time_block
        .as_deref()
        .map(str::parse::<TimeBlock>)
        .transpose()?;
    let entries = state.store.list(user.id, time_block).await?;
    Ok(Json(entries))
}

/// POST /api/v1/journal-entries
async fn create_entry(
    State(state): State<JournalState>,
    AuthUser(user): AuthUser,
    JsonBody(request): JsonBody<JournalEntryRequest>,
) -> Result<(StatusCode, Json<JournalEntry>)> {
    request.validate()?;
    let entry = state.store.create(user.id, &request).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/v1/journal-entries/:id
async fn get_entry(
    State(state): State<JournalState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<JournalEntry>> {
    Ok(Json(state.store.get_owned(id, user.id).await?))
}

/// PUT /api/v1/journal-entries/:id
async fn update_entry(
    State(state): State<JournalState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<JournalEntryRequest>,
) -> Result<Json<JournalEntry>> {
    state.store.get_owned(id, user.id).await?;
    request.validate()?;
    Ok(Json(state.store.update(id, &request).await?))
}

/// DELETE /api/v1/journal-entries/:id
async fn delete_entry(
    State(state): State<JournalState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.store.get_owned(id, user.id).await?;
    state.store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
