//! HTTP handlers for the Goals API
//!
//! Provides 5 REST endpoints:
//! - GET    /api/v1/goals       — list own goals
//! - POST   /api/v1/goals       — create goal
//! - GET    /api/v1/goals/:id   — goal detail
//! - PATCH  /api/v1/goals/:id   — partial update
//! - DELETE /api/v1/goals/:id   — delete goal

use crate::auth::{AuthState, AuthUser};
use crate::body::JsonBody;
use crate::error::Result;
use crate::goals::store::GoalStore;
use crate::goals::types::*;
use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

/// Shared state for goal handlers
#[derive(Clone)]
pub struct GoalsState {
    pub store: Arc<GoalStore>,
    pub auth: AuthState,
}

impl FromRef<GoalsState> for AuthState {
    fn from_ref(state: &GoalsState) -> Self {
        state.auth.clone()
    }
}

/// Create the goals router
pub fn goals_router(state: GoalsState) -> Router {
    Router::new()
        .route("/api/v1/goals", get(list_goals).post(create_goal))
        .route(
            "/api/v1/goals/:id",
            get(get_goal).patch(update_goal).delete(delete_goal),
        )
        .with_state(state)
}

/// GET /api/v1/goals
async fn list_goals(
    State(state): State<GoalsState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Goal>>> {
    Ok(Json(state.store.list(user.id).await?))
}

/// POST /api/v1/goals
async fn create_goal(
    State(state): State<GoalsState>,
    AuthUser(user): AuthUser,
    JsonBody(request): JsonBody<CreateGoalRequest>,
) -> Result<(StatusCode, Json<Goal>)> {
    request.validate()?;
    let goal = state.store.create(user.id, &request).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

/// GET /api/v1/goals/:id
async fn get_goal(
    State(state): State<GoalsState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Goal>> {
    Ok(Json(state.store.get(user.id, id).await?))
}

/// PATCH /api/v1/goals/:id
async fn update_goal(
    State(state): State<GoalsState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<UpdateGoalRequest>,
) -> Result<Json<Goal>> {
    request.validate()?;
    Ok(Json(state.store.update(user.id, id, &request).await?))
}

/// DELETE /api/v1/goals/:id
async fn delete_goal(
    State(state): State<GoalsState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.store.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
