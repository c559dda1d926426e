//! Unified API router for Daybook
//!
//! Merges all module routers into a single axum `Router` with CORS and
//! request tracing.
//!
//! ## Endpoint Map
//!
//! | Prefix                                 | Module   | Description                      |
//! |----------------------------------------|----------|----------------------------------|
//! | `/`, `/health`                         | api      | Liveness probes                  |
//! | `/api/v1/users`, `/api/v1/token`       | auth     | Registration, login, current user |
//! | `/api/v1/journal-entries/*`            | journal  | Entry CRUD                       |
//! | `/api/v1/journal-entries/:id/insights` | insights | Per-entry reflection             |
//! | `/api/v1/insights/summary`             | insights | Trend summary                    |
//! | `/api/v1/questions`                    | insights | Adaptive questions               |
//! | `/api/v1/goals/*`                      | goals    | Goal CRUD                        |

use crate::auth::{auth_router, AuthState, TokenIssuer, UserStore};
use crate::config::DaybookConfig;
use crate::goals::{goals_router, GoalStore, GoalsState};
use crate::insights::{insights_router, InsightOrchestrator, InsightProvider, InsightsState};
use crate::journal::{journal_router, JournalState, JournalStore};
use crate::storage::Database;
use axum::{
    http::{header, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the complete Daybook HTTP application
///
/// Merges all module routers, adds CORS and tracing middleware, and returns
/// a single `Router` ready to be served by `axum::serve`.
pub fn build_app(
    auth_state: AuthState,
    journal_state: JournalState,
    goals_state: GoalsState,
    insights_state: InsightsState,
    cors_origins: &[String],
) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(auth_router(auth_state))
        .merge(journal_router(journal_state))
        .merge(goals_router(goals_state))
        .merge(insights_router(insights_state))
        .layer(build_cors(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// Wire every store and state over one database and build the app
pub fn app_from_parts(
    db: Database,
    tokens: TokenIssuer,
    provider: Arc<dyn InsightProvider>,
    config: &DaybookConfig,
) -> Router {
    let auth = AuthState {
        users: Arc::new(UserStore::new(db.clone())),
        tokens: Arc::new(tokens),
    };
    let journal = Arc::new(JournalStore::new(db.clone()));

    let journal_state = JournalState {
        store: journal.clone(),
        auth: auth.clone(),
    };
    let goals_state = GoalsState {
        store: Arc::new(GoalStore::new(db)),
        auth: auth.clone(),
    };
    let insights_state = InsightsState {
        orchestrator: InsightOrchestrator::new(provider),
        journal,
        auth: auth.clone(),
        history_limit: config.questions.history_limit,
    };

    build_app(
        auth,
        journal_state,
        goals_state,
        insights_state,
        &config.server.cors_origins,
    )
}

// =============================================================================
// Root handlers
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({"message": "Backend is running"}))
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// CORS
// =============================================================================

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<_> = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(parsed)
    }
}
