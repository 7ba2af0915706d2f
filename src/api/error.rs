//! API error type and HTTP status mapping
//!
//! Component errors are converted here, at the boundary, into JSON error
//! responses. Every failure is local to the request that triggered it, and
//! every handler returns through this type so no connection is left hanging.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::capture::CaptureError;
use crate::record::RecordError;
use crate::services::ServiceError;
use crate::session::SessionError;

/// Error type returned by all request handlers
#[derive(Debug)]
pub enum ApiError {
    /// Missing or incorrect token
    Unauthorized,
    /// Request shape is invalid; rejected before any side effect
    Validation(String),
    /// Unknown session/recording id or missing program
    NotFound(String),
    /// Session past its TTL
    Expired(String),
    /// Platform-gated action not available here
    Unsupported(String),
    /// Capture device missing or busy
    SourceUnavailable(String),
    /// Anything else; surfaced as a generic internal error
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Expired(_) => StatusCode::GONE,
            ApiError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
            ApiError::SourceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Unauthorized => "Invalid or missing API token.".into(),
            ApiError::Validation(msg)
            | ApiError::NotFound(msg)
            | ApiError::Expired(msg)
            | ApiError::Unsupported(msg)
            | ApiError::SourceUnavailable(msg) => msg.clone(),
            // Internal details are logged, not leaked
            ApiError::Internal(_) => "Internal server error.".into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status(), self.detail())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(msg) = &self {
            tracing::error!(error = %msg, "Internal error");
        }
        (self.status(), Json(json!({ "detail": self.detail() }))).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound(_) => ApiError::NotFound("Session not found.".into()),
            SessionError::Expired(_) => ApiError::Expired("Session expired.".into()),
        }
    }
}

impl From<RecordError> for ApiError {
    fn from(e: RecordError) -> Self {
        match e {
            RecordError::NotFound(_) => ApiError::NotFound("Recording not found.".into()),
            RecordError::Io(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<CaptureError> for ApiError {
    fn from(e: CaptureError) -> Self {
        match e {
            CaptureError::SourceUnavailable(msg) => ApiError::SourceUnavailable(msg),
            CaptureError::Encode(msg) => ApiError::Internal(format!("encode failed: {}", msg)),
            CaptureError::Io(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Unsupported(msg) => ApiError::Unsupported(msg.into()),
            ServiceError::MissingBinary(cmd) => {
                ApiError::NotFound(format!("No such command: {}", cmd))
            }
            ServiceError::Unavailable(msg) => ApiError::SourceUnavailable(msg),
            ServiceError::Backend(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Validation("x".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Expired("x".into()).status(), StatusCode::GONE);
        assert_eq!(
            ApiError::Unsupported("x".into()).status(),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            ApiError::SourceUnavailable("x".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_is_generic() {
        let err = ApiError::Internal("lock poisoned at registry.rs:42".into());
        assert_eq!(err.detail(), "Internal server error.");
    }

    #[test]
    fn test_session_error_conversion() {
        use uuid::Uuid;
        let id = Uuid::new_v4();
        assert!(matches!(
            ApiError::from(SessionError::NotFound(id)),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(SessionError::Expired(id)),
            ApiError::Expired(_)
        ));
    }
}
