//! Error responses for the HTTP service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

use crate::n8n::GatewayError;

/// A user-visible request failure. Every handler error funnels through
/// here; there is no crash path.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        let status = match &err {
            // A missing resource upstream is a missing resource here.
            GatewayError::Status { .. } if err.is_not_found() => StatusCode::NOT_FOUND,
            // Everything else the platform did wrong is a bad gateway from
            // the dashboard's point of view.
            GatewayError::Status { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::Transport { .. } | GatewayError::Decode { .. } => {
                StatusCode::BAD_GATEWAY
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(status = %self.status, message = %self.message, "request failed");
        let body = Json(json!({
            "error": { "message": self.message }
        }));
        (self.status, body).into_response()
    }
}
