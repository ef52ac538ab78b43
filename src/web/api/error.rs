use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::sync::SyncError;

pub enum ApiError {
    Conflict(&'static str),
    Internal {
        error: &'static str,
        message: String,
    },
}

impl From<SyncError> for ApiError {
    fn from(e: SyncError) -> Self {
        match e {
            SyncError::AlreadyActive => ApiError::Conflict("sync_active"),
            SyncError::Inactive => ApiError::Conflict("sync_inactive"),
            SyncError::Projection(e) => ApiError::Internal {
                error: "projection_failed",
                message: e.to_string(),
            },
            SyncError::Persistence(e) => ApiError::Internal {
                error: "persistence_failed",
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Conflict(reason) => {
                (StatusCode::CONFLICT, Json(ErrorResponse::new(reason))).into_response()
            }
            ApiError::Internal { error, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_message(error, &message)),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: None,
        }
    }

    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::ProjectionError;

    #[test]
    fn test_sync_errors_map_to_status_codes() {
        let cases = [
            (SyncError::AlreadyActive, StatusCode::CONFLICT),
            (SyncError::Inactive, StatusCode::CONFLICT),
            (
                SyncError::Projection(ProjectionError::UnsupportedSpatialReference(2154)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).into_response().status(), expected);
        }
    }
}
