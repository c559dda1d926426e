//! HTTP handlers for the Insights API
//!
//! Provides 3 REST endpoints:
//! - GET    /api/v1/journal-entries/:id/insights   — reflection on one entry
//! - GET    /api/v1/insights/summary?timeRange=    — trend summary (default weekly)
//! - POST   /api/v1/questions                      — adaptive questions for a time-block

use crate::auth::{AuthState, AuthUser};
use crate::body::JsonBody;
use crate::error::Result;
use crate::insights::orchestrator::InsightOrchestrator;
use crate::insights::types::*;
use crate::journal::JournalStore;
use axum::{
    extract::{FromRef, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

/// Shared state for insight handlers
#[derive(Clone)]
pub struct InsightsState {
    pub orchestrator: InsightOrchestrator,
    pub journal: Arc<JournalStore>,
    pub auth: AuthState,
    /// How many recent entries feed question generation when the client sends none
    pub history_limit: usize,
}

impl FromRef<InsightsState> for AuthState {
    fn from_ref(state: &InsightsState) -> Self {
        state.auth.clone()
    }
}

/// Create the insights router
pub fn insights_router(state: InsightsState) -> Router {
    Router::new()
        .route("/api/v1/journal-entries/:id/insights", get(entry_insights))
        .route("/api/v1/insights/summary", get(summary_insights))
        .route("/api/v1/questions", post(adaptive_questions))
        .with_state(state)
}

// =============================================================================
// Insights
// =============================================================================

/// GET /api/v1/journal-entries/:id/insights
async fn entry_insights(
    State(state): State<InsightsState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<EntryInsightResponse>> {
    let entry = state.journal.get_owned(id, user.id).await?;
    let insights = state
        .orchestrator
        .entry_insight(&EntrySnapshot::from(&entry))
        .await?;
    Ok(Json(EntryInsightResponse { insights }))
}

#[derive(Debug, Deserialize)]
struct SummaryQuery {
    #[serde(rename = "timeRange")]
    time_range: Option<String>,
}

/// GET /api/v1/insights/summary
async fn summary_insights(
    State(state): State<InsightsState>,
    AuthUser(user): AuthUser,
    Query(params): Query<SummaryQuery>,
) -> Result<Json<SummaryResponse>> {
    let range = params.time_range.as_deref().unwrap_or("weekly");
    let summary_insights = state
        .orchestrator
        .summarize(&state.journal, user.id, range, Utc::now())
        .await?;
    Ok(Json(SummaryResponse { summary_insights }))
}

// =============================================================================
// Questions
// =============================================================================

/// POST /api/v1/questions
async fn adaptive_questions(
    State(state): State<InsightsState>,
    AuthUser(user): AuthUser,
    JsonBody(request): JsonBody<QuestionsRequest>,
) -> Result<Json<QuestionsResponse>> {
    let past = match request.past_entries {
        Some(past) => past,
        None => state
            .journal
            .recent_for_block(user.id, request.time_block, state.history_limit)
            .await?
            .iter()
            .map(EntrySnapshot::from)
            .collect(),
    };

    let questions = state
        .orchestrator
        .adaptive_questions(&past, request.time_block)
        .await;
    Ok(Json(QuestionsResponse { questions }))
}
