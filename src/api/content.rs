//! Content API endpoints.

use axum::{body::Bytes, extract::State};
use serde_json::Value;

use super::{respond, success, ApiJson, ApiPath, ApiResult};
use crate::errors::AppError;
use crate::models::{Collection, ContentRecord, Section};
use crate::AppState;

/// GET /api/site - Content as saved locally; what the public site renders.
pub async fn get_site_content(State(state): State<AppState>) -> ApiResult<ContentRecord> {
    let content = state.store.load().await;
    success(content, state.dashboard.state().await)
}

/// GET /api/admin/content - The dashboard's working copy.
pub async fn get_content(State(state): State<AppState>) -> ApiResult<ContentRecord> {
    let content = state.dashboard.content().await;
    success(content, state.dashboard.state().await)
}

/// PUT /api/admin/content/:section - Patch hero, about, contact or company.
pub async fn update_section(
    State(state): State<AppState>,
    ApiPath(section): ApiPath<Section>,
    ApiJson(patch): ApiJson<Value>,
) -> ApiResult<Value> {
    let result = state
        .dashboard
        .edit(|record| record.patch_section(section, patch))
        .await;
    respond(&state.dashboard, result).await
}

/// POST /api/admin/:collection - Add a service, project or partner.
///
/// The body is optional; given fields are laid over a blank item.
pub async fn add_item(
    State(state): State<AppState>,
    ApiPath(collection): ApiPath<Collection>,
    body: Bytes,
) -> ApiResult<Value> {
    let patch = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => Some(value),
            Err(e) => return respond(&state.dashboard, Err(AppError::from(e))).await,
        }
    };

    let result = state
        .dashboard
        .edit(|record| record.add_to(collection, patch))
        .await;
    respond(&state.dashboard, result).await
}

/// PUT /api/admin/:collection/:id - Patch an item; its id never changes.
pub async fn update_item(
    State(state): State<AppState>,
    ApiPath((collection, id)): ApiPath<(Collection, String)>,
    ApiJson(patch): ApiJson<Value>,
) -> ApiResult<Value> {
    let result = state
        .dashboard
        .edit(|record| record.update_in(collection, &id, patch))
        .await;
    respond(&state.dashboard, result).await
}

/// DELETE /api/admin/:collection/:id - Remove an item.
pub async fn delete_item(
    State(state): State<AppState>,
    ApiPath((collection, id)): ApiPath<(Collection, String)>,
) -> ApiResult<()> {
    let result = state
        .dashboard
        .edit(|record| record.remove_from(collection, &id))
        .await;
    respond(&state.dashboard, result).await
}
