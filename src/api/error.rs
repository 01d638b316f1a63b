//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to HTTP clients as `{"detail": ...}`
#[derive(Error, Debug)]
pub enum ApiError {
    /// Device id outside `[0, device_count)`
    #[error("GPU with ID {0} not found")]
    GpuNotFound(i64),

    /// Index was in range but its record could not be assembled
    #[error("Failed to get information for GPU with ID {0}")]
    InfoUnavailable(u32),

    /// Index was in range but the handle lookup failed
    #[error("Failed to get handle for GPU with ID {0}")]
    HandleUnavailable(u32),

    /// The utilization query itself failed
    #[error("Failed to get utilization information for GPU with ID {0}")]
    UtilizationUnavailable(u32),

    /// Blocking task failed to complete
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::GpuNotFound(_) | Self::InfoUnavailable(_) | Self::HandleUnavailable(_) => {
                StatusCode::NOT_FOUND
            }
            Self::UtilizationUnavailable(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::warn!("{}", self);
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
