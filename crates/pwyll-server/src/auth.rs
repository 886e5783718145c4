//! Authentication middleware for maintenance routes.
//!
//! The sweep endpoint is meant for a trusted internal caller (a periodic
//! scheduler), so the whole maintenance router sits behind a bearer token.
//! Token comparison uses constant-time comparison to prevent timing
//! attacks.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::error::ServerError;
use crate::state::AppState;

/// Require a valid bearer token when one is configured.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.config.auth_token.as_deref() else {
        // Localhost mode: no token configured.
        return next.run(request).await;
    };

    match bearer_token(request.headers()) {
        Some(token) if bool::from(token.as_bytes().ct_eq(expected.as_bytes())) => {
            next.run(request).await
        }
        Some(_) => ServerError::Unauthorized("invalid token".to_string()).into_response(),
        None => ServerError::Unauthorized("missing bearer token".to_string()).into_response(),
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
