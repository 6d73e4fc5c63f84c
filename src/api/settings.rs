//! Publish configuration endpoints.

use axum::{body::Bytes, extract::State};
use serde::Serialize;

use super::{respond, success, ApiJson, ApiResult};
use crate::errors::AppError;
use crate::models::{PublishConfig, PublishConfigView};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub connected: bool,
}

/// GET /api/admin/config - Stored configuration without the token.
pub async fn get_config(State(state): State<AppState>) -> ApiResult<Option<PublishConfigView>> {
    let view = state.dashboard.config_view().await;
    success(view, state.dashboard.state().await)
}

/// PUT /api/admin/config - Replace the configuration and reconnect.
pub async fn update_config(
    State(state): State<AppState>,
    ApiJson(config): ApiJson<PublishConfig>,
) -> ApiResult<PublishConfigView> {
    let result = state.dashboard.update_config(config).await;
    respond(&state.dashboard, result).await
}

/// DELETE /api/admin/config - Clear configuration and stored content.
pub async fn clear_config(State(state): State<AppState>) -> ApiResult<()> {
    let result = state.dashboard.clear_all().await;
    respond(&state.dashboard, result).await
}

/// POST /api/admin/config/test - Test a candidate configuration, or the active one.
pub async fn test_connection(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<ConnectionStatus> {
    let candidate = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        match serde_json::from_slice::<PublishConfig>(&body) {
            Ok(config) => Some(config),
            Err(e) => return respond(&state.dashboard, Err(AppError::from(e))).await,
        }
    };

    let result = state
        .dashboard
        .test_connection(candidate)
        .await
        .map(|connected| ConnectionStatus { connected });
    respond(&state.dashboard, result).await
}
