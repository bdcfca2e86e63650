//! API error envelope.
//!
//! DESIGN
//! ======
//! Every service owns a `thiserror` enum and implements [`ErrorCode`] so the
//! route layer can turn it into a JSON body with a grepable code and the
//! matching HTTP status. Handlers return `Result<_, ApiError>` and use `?`.
//!
//! ERROR HANDLING
//! ==============
//! Database failures are logged here and rendered with a generic message;
//! the driver error text never reaches the browser.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Grepable error code plus the HTTP status it maps to.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn status(&self) -> StatusCode;

    /// Internal failures are logged and masked in the response body.
    fn is_internal(&self) -> bool {
        self.status().is_server_error()
    }
}

/// Wire shape of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self { status, code, message: message.into() }
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "E_BAD_REQUEST", message)
    }
}

impl<E: ErrorCode> From<E> for ApiError {
    fn from(err: E) -> Self {
        let status = err.status();
        let code = err.error_code();
        if err.is_internal() {
            tracing::error!(code, error = %err, "request failed");
            return Self::new(status, code, "internal error");
        }
        Self::new(status, code, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message, code: self.code })).into_response()
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
