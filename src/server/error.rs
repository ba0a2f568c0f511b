//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`crate::error::Error`] so that route
//! handlers can return `Result<T, AppError>` directly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::Error;

/// Wrapper so route handlers can bubble the crate error straight out of `?`.
pub struct AppError {
    inner: Error,
}

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        Self { inner: e }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in API handler"
            );
        }

        // A PathEscape is presented exactly like a missing file so the
        // response cannot be used to probe paths outside the media root.
        // The attempt itself is still worth a log line.
        let (code, message) = match &self.inner {
            Error::NotFound { .. } => ("not_found", self.inner.to_string()),
            Error::PathEscape { identifier } => {
                tracing::warn!(identifier = %identifier, "Rejected path-escaping identifier");
                ("not_found", format!("media file not found: {identifier}"))
            }
            Error::Validation(_) => ("validation_error", self.inner.to_string()),
            Error::Catalog(_) => ("catalog_error", self.inner.to_string()),
            Error::Unavailable(_) => ("unavailable", self.inner.to_string()),
            Error::Io { .. } => ("io_error", self.inner.to_string()),
            Error::Internal(_) => ("internal_error", self.inner.to_string()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_produces_404() {
        let err = AppError::from(Error::not_found("media file", "a.mp4"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn path_escape_produces_404() {
        let err = AppError::from(Error::path_escape("../../etc/passwd"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unavailable_produces_503() {
        let err = AppError::from(Error::Unavailable("no catalog".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
