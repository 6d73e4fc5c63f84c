//! Save / publish workflow endpoints.

use axum::{
    body::Bytes,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use super::{respond, success, ApiResult};
use crate::dashboard::DashboardStatus;
use crate::errors::AppError;
use crate::models::{CommitSummary, ContentRecord, PublishRequest};
use crate::AppState;

/// Outcome of a save request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOutcome {
    /// False when there were no unsaved changes.
    pub saved: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishOutcome {
    pub history: Vec<CommitSummary>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

/// GET /api/admin/status - Editing state, publishing availability and recent commits.
pub async fn get_status(State(state): State<AppState>) -> ApiResult<DashboardStatus> {
    let status = state.dashboard.status().await;
    let editor_state = status.state;
    success(status, editor_state)
}

/// POST /api/admin/save - Persist the working copy locally.
pub async fn save_content(State(state): State<AppState>) -> ApiResult<SaveOutcome> {
    let result = state
        .dashboard
        .save()
        .await
        .map(|saved| SaveOutcome { saved });
    respond(&state.dashboard, result).await
}

/// POST /api/admin/publish - Save locally and commit to GitHub.
pub async fn publish_content(State(state): State<AppState>, body: Bytes) -> ApiResult<PublishOutcome> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        PublishRequest::default()
    } else {
        match serde_json::from_slice::<PublishRequest>(&body) {
            Ok(request) => request,
            Err(e) => return respond(&state.dashboard, Err(AppError::from(e))).await,
        }
    };

    let result = match state.dashboard.publish(request.message).await {
        Ok(()) => Ok(PublishOutcome {
            history: state.dashboard.status().await.history,
        }),
        Err(e) => Err(e),
    };
    respond(&state.dashboard, result).await
}

/// POST /api/admin/discard - Drop unsaved edits.
pub async fn discard_changes(State(state): State<AppState>) -> ApiResult<ContentRecord> {
    let result = state.dashboard.discard().await;
    respond(&state.dashboard, result).await
}

/// GET /api/admin/history - Recent commits touching the content file.
pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Vec<CommitSummary>> {
    let history = state.dashboard.refresh_history(query.limit).await;
    success(history, state.dashboard.state().await)
}

/// GET /api/admin/published - The content currently committed on the remote branch.
pub async fn get_published_content(
    State(state): State<AppState>,
) -> ApiResult<Option<ContentRecord>> {
    let result = state.dashboard.published_content().await;
    respond(&state.dashboard, result).await
}
