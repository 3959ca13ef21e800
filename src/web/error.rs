// src/web/error.rs
// HTTP error responses and the mapping from engine errors

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

use crate::error::VizzyError;

/// Standard API error response format
#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
    pub error_code: Option<String>,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            error_code: Some("INTERNAL_ERROR".to_string()),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::BAD_REQUEST,
            error_code: Some("BAD_REQUEST".to_string()),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::NOT_FOUND,
            error_code: Some("NOT_FOUND".to_string()),
        }
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::BAD_GATEWAY,
            error_code: Some("UPSTREAM_ERROR".to_string()),
        }
    }

    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::GATEWAY_TIMEOUT,
            error_code: Some("UPSTREAM_TIMEOUT".to_string()),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response_json = json!({
            "error": true,
            "message": self.message,
            "status": self.status_code.as_u16()
        });

        if let Some(error_code) = self.error_code {
            response_json["error_code"] = json!(error_code);
        }

        (self.status_code, Json(response_json)).into_response()
    }
}

impl From<VizzyError> for ApiError {
    fn from(err: VizzyError) -> Self {
        match err {
            VizzyError::Validation(msg) => Self::bad_request(msg),
            VizzyError::SessionNotFound(id) => Self::not_found(format!("Session not found: {}", id)),
            VizzyError::UpstreamTimeout(detail) => {
                warn!(error = %detail, "Language model timed out");
                Self::gateway_timeout("The language model did not respond in time")
            }
            VizzyError::Upstream(detail) => {
                warn!(error = %detail, "Language model call failed");
                Self::bad_gateway("The language model request failed")
            }
            // Internal details are logged, never returned
            other => {
                error!(error = %other, "Request failed");
                Self::internal("Internal server error")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (VizzyError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (VizzyError::SessionNotFound("s".into()), StatusCode::NOT_FOUND),
            (VizzyError::UpstreamTimeout("t".into()), StatusCode::GATEWAY_TIMEOUT),
            (VizzyError::Upstream("u".into()), StatusCode::BAD_GATEWAY),
            (VizzyError::Config("c".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (VizzyError::Internal("i".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code, status);
        }
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let api = ApiError::from(VizzyError::Internal("lock poisoned at store.rs".into()));
        assert!(!api.message.contains("store.rs"));
        let api = ApiError::from(VizzyError::Upstream("API error 401: bad key sk-or-123".into()));
        assert!(!api.message.contains("sk-or"));
    }

    #[test]
    fn test_validation_message_is_kept() {
        let api = ApiError::from(VizzyError::Validation("message must not be empty".into()));
        assert_eq!(api.message, "message must not be empty");
        assert_eq!(api.error_code.as_deref(), Some("BAD_REQUEST"));
    }
}
