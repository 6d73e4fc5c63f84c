//! Admin session gate.
//!
//! A fixed username/password pair unlocks the admin routes. A successful login
//! persists one session token in the local store; the admin routes accept that
//! token until logout clears it. Comparisons are constant-time.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;

use crate::config::Config;
use crate::errors::{codes, ErrorDetails, ErrorResponse};
use crate::AppState;

/// Header name for the session token.
pub const SESSION_HEADER: &str = "x-session-token";

/// Session gate for the admin routes.
pub async fn session_auth_layer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(provided) = session_token(request.headers()) else {
        return unauthorized_response(&state, "Login required").await;
    };

    if is_active_session(&state, &provided).await {
        next.run(request).await
    } else {
        unauthorized_response(&state, "Session expired or invalid").await
    }
}

/// Extract the session token from `x-session-token` or a bearer `Authorization` header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Whether `token` matches the persisted admin session.
pub async fn is_active_session(state: &AppState, token: &str) -> bool {
    match state.store.load_session().await {
        Some(session) => constant_time_compare(token, &session.token),
        None => false,
    }
}

/// Check a login attempt against the configured credentials.
pub fn credentials_match(config: &Config, username: &str, password: &str) -> bool {
    // Evaluate both sides so a wrong username takes as long as a wrong password.
    let user_ok = constant_time_compare(username, &config.admin_username);
    let password_ok = constant_time_compare(password, &config.admin_password);
    user_ok & password_ok
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Create an unauthorized response.
async fn unauthorized_response(state: &AppState, message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorDetails {
            code: codes::UNAUTHORIZED.to_string(),
            message: message.to_string(),
        },
        state: state.dashboard.state().await,
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
