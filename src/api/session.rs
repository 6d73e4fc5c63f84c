//! Admin login endpoints.

use axum::{extract::State, http::HeaderMap};
use uuid::Uuid;

use super::{respond, success, ApiJson, ApiResult};
use crate::auth;
use crate::errors::AppError;
use crate::models::{LoginRequest, LoginResponse, SessionInfo};
use crate::AppState;

/// POST /api/session/login - Exchange the admin credentials for a session token.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    if !auth::credentials_match(&state.config, &request.username, &request.password) {
        tracing::warn!("Rejected admin login for {:?}", request.username);
        let result = Err(AppError::Unauthorized("Invalid username or password".to_string()));
        return respond(&state.dashboard, result).await;
    }

    let token = Uuid::new_v4().to_string();
    let result = state
        .store
        .save_session(&token)
        .await
        .map(|()| LoginResponse { token });
    if result.is_ok() {
        tracing::info!("Admin logged in");
    }
    respond(&state.dashboard, result).await
}

/// POST /api/session/logout - End the admin session.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<()> {
    if state.store.load_session().await.is_none() {
        return success((), state.dashboard.state().await);
    }

    let presented = auth::session_token(&headers).unwrap_or_default();
    if !auth::is_active_session(&state, &presented).await {
        let result = Err(AppError::Unauthorized("Session expired or invalid".to_string()));
        return respond(&state.dashboard, result).await;
    }

    let result = state.store.clear_session().await;
    if result.is_ok() {
        tracing::info!("Admin logged out");
    }
    respond(&state.dashboard, result).await
}

/// GET /api/session - Whether the presented token is the active session.
pub async fn get_session(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<SessionInfo> {
    let authenticated = match auth::session_token(&headers) {
        Some(token) => auth::is_active_session(&state, &token).await,
        None => false,
    };
    success(SessionInfo { authenticated }, state.dashboard.state().await)
}
