use axum::{extract::State, http::StatusCode, Json};

use crate::sync::{SyncStatus, ViewportSample};
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::auth::{AppState, AuthenticatedUser};

#[utoipa::path(
    get,
    path = "/api/sync/status",
    security(
        ("api_key" = [])
    ),
    responses(
        (status = 200, description = "Sync status", body = SyncStatus),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "sync"
)]
pub async fn status(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> ApiResult<Json<SyncStatus>> {
    let controller = state.controller.lock().await;
    Ok(Json(controller.status()))
}

#[utoipa::path(
    post,
    path = "/api/sync/activate",
    request_body(content = ViewportSample, description = "Current viewport; optional"),
    security(
        ("api_key" = [])
    ),
    responses(
        (status = 200, description = "Sync activated", body = SyncStatus),
        (status = 409, description = "Sync already active", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Descriptors could not be written", body = ErrorResponse)
    ),
    tag = "sync"
)]
pub async fn activate(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    sample: Option<Json<ViewportSample>>,
) -> ApiResult<Json<SyncStatus>> {
    log::info!(
        "Activation requested by {}",
        user.name.as_deref().unwrap_or("anonymous")
    );
    let mut controller = state.controller.lock().await;
    let status = controller.activate(sample.map(|Json(s)| s)).await?;
    Ok(Json(status))
}

#[utoipa::path(
    post,
    path = "/api/sync/deactivate",
    security(
        ("api_key" = [])
    ),
    responses(
        (status = 200, description = "Sync deactivated", body = SyncStatus),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Descriptors could not be removed", body = ErrorResponse)
    ),
    tag = "sync"
)]
pub async fn deactivate(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<SyncStatus>> {
    log::info!(
        "Deactivation requested by {}",
        user.name.as_deref().unwrap_or("anonymous")
    );
    let mut controller = state.controller.lock().await;
    let status = controller.deactivate().await?;
    Ok(Json(status))
}

#[utoipa::path(
    post,
    path = "/api/viewport",
    request_body = ViewportSample,
    security(
        ("api_key" = [])
    ),
    responses(
        (status = 202, description = "Viewport queued for the next sync cycle"),
        (status = 409, description = "Sync not active", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "sync"
)]
pub async fn viewport(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(sample): Json<ViewportSample>,
) -> ApiResult<StatusCode> {
    let controller = state.controller.lock().await;
    controller.notify(sample)?;
    Ok(StatusCode::ACCEPTED)
}
