//! REST API module.
//!
//! Maps operator actions in the admin panel onto dashboard operations.

mod content;
mod extract;
mod session;
mod settings;
mod workflow;

pub use content::*;
pub use extract::*;
pub use session::*;
pub use settings::*;
pub use workflow::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::dashboard::{Dashboard, EditorState};
use crate::errors::{AppError, AppErrorWithState};

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub state: EditorState,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, state: EditorState) -> Self {
        Self {
            success: true,
            data,
            state,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppErrorWithState>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T, state: EditorState) -> ApiResult<T> {
    Ok(ApiResponse::new(data, state))
}

/// Create an error API response.
pub fn error<T: Serialize>(err: AppError, state: EditorState) -> ApiResult<T> {
    Err(AppErrorWithState { error: err, state })
}

/// Wrap an operation result, stamping it with the dashboard state after the operation.
pub async fn respond<T: Serialize>(
    dashboard: &Dashboard,
    result: Result<T, AppError>,
) -> ApiResult<T> {
    let state = dashboard.state().await;
    match result {
        Ok(data) => success(data, state),
        Err(e) => error(e, state),
    }
}
