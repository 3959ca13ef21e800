// src/error.rs
// Error types for the Vizzy engine

use thiserror::Error;

/// Main error type for the Vizzy library
#[derive(Error, Debug)]
pub enum VizzyError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("upstream timed out: {0}")]
    UpstreamTimeout(String),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for Result using VizzyError
pub type Result<T> = std::result::Result<T, VizzyError>;

impl From<reqwest::Error> for VizzyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            VizzyError::UpstreamTimeout(err.to_string())
        } else {
            VizzyError::Upstream(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = VizzyError::Validation("message must not be empty".to_string());
        assert!(err.to_string().contains("invalid request"));
        assert!(err.to_string().contains("message must not be empty"));
    }

    #[test]
    fn test_session_not_found_error() {
        let err = VizzyError::SessionNotFound("abc".to_string());
        assert_eq!(err.to_string(), "session not found: abc");
    }

    #[test]
    fn test_upstream_errors_name_the_upstream() {
        let err = VizzyError::UpstreamTimeout("openrouter".into());
        assert_eq!(err.to_string(), "upstream timed out: openrouter");
        let err = VizzyError::Upstream("API error 502".into());
        assert_eq!(err.to_string(), "upstream error: API error 502");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<i32>("not json").unwrap_err();
        let err: VizzyError = json_err.into();
        assert!(matches!(err, VizzyError::Json(_)));
        assert!(err.to_string().contains("JSON"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let err: VizzyError = io_err.into();
        assert!(matches!(err, VizzyError::Io(_)));
    }
}
