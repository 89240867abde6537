//! HTTP error mapping.
//!
//! Internal failures are logged with their cause and answered with a
//! generic body; client-facing errors carry a short reason.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use nippo_core::{RepoError, ReportServiceError};
use serde_json::json;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error returned by handlers and middleware.
#[derive(Debug)]
pub enum AppError {
    /// No usable principal on the request.
    Unauthorized(String),
    /// Principal may not act on the target report.
    Forbidden,
    NotFound(String),
    /// Request could not be extracted; keeps axum's status.
    Rejected(StatusCode, String),
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Rejected(status, _) => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized(reason) => write!(f, "unauthorized: {reason}"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::NotFound(what) => write!(f, "not found: {what}"),
            Self::Rejected(_, reason) => write!(f, "bad request: {reason}"),
            Self::Internal(details) => write!(f, "internal error: {details}"),
        }
    }
}

impl Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Internal(details) => {
                error!("event=http_error module=web status=error error={details}");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(format!("report {id}")),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<ReportServiceError> for AppError {
    fn from(value: ReportServiceError) -> Self {
        match value {
            ReportServiceError::ReportNotFound(id) => Self::NotFound(format!("report {id}")),
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;
    use axum::http::StatusCode;
    use nippo_core::ReportServiceError;
    use uuid::Uuid;

    #[test]
    fn missing_report_maps_to_not_found() {
        let err = AppError::from(ReportServiceError::ReportNotFound(Uuid::nil()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unexpected_service_failure_maps_to_internal() {
        let err = AppError::from(ReportServiceError::InconsistentState("read-back"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn rejection_keeps_extractor_status() {
        let err = AppError::Rejected(StatusCode::UNSUPPORTED_MEDIA_TYPE, "form".to_string());
        assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(err.to_string().starts_with("bad request"));
    }
}
