//! Maintenance endpoints invoked by a trusted periodic scheduler.

use axum::{Json, Router, extract::State, middleware, routing::post};
use serde::{Deserialize, Serialize};
use tracing::info;

use pwyll_session::remove_expired_sessions;

use crate::auth::auth_middleware;
use crate::error::ServerError;
use crate::state::AppState;

/// Response for the expired-session sweep.
#[derive(Debug, Serialize, Deserialize)]
pub struct SweepResponse {
    /// Number of records removed by this run.
    pub removed: usize,
}

/// POST /internal/maintenance/expired-sessions - Delete expired durable
/// session records.
///
/// Overlapping invocations are safe; each run re-queries from scratch and
/// its deletions are idempotent.
pub async fn sweep_expired_handler(
    State(state): State<AppState>,
) -> Result<Json<SweepResponse>, ServerError> {
    let removed = remove_expired_sessions(state.records.as_ref(), &state.config.kind).await?;
    info!(removed, "session sweep finished");
    Ok(Json(SweepResponse { removed }))
}

/// Create the maintenance routes, gated by the auth middleware.
pub fn maintenance_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/maintenance/expired-sessions", post(sweep_expired_handler))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}
