// ---------------------------------------------------------------------------
// handlers/ -- HTTP endpoints
// Sub-modules are pub(crate) so utoipa __path_* types are reachable from the
// OpenApi derive in lib.rs.
// ---------------------------------------------------------------------------

pub(crate) mod analyze;
pub(crate) mod system;
#[cfg(test)]
mod tests;

pub use analyze::{analyze_mood, run_analysis, MESSAGE_FALLBACK};
pub use system::home;

pub use analyze::__path_analyze_mood;
pub use system::__path_home;

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::models::ErrorResponse;
use crate::services::ServiceError;

pub const NO_TEXT_MESSAGE: &str = "No text provided";
pub const INTERNAL_ERROR_MESSAGE: &str = "An error occurred processing your request";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for all handlers.
/// Logs full details server-side; the client only sees `{"error": "<message>"}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to clients. Internal details never leave the process.
    fn sanitized_message(&self) -> String {
        match self {
            ApiError::BadRequest(m) => m.clone(),
            ApiError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::BadRequest(_) => {
                tracing::info!("API error ({}): {}", status.as_u16(), self)
            }
            ApiError::Internal(_) => {
                tracing::error!("API error ({}): {}", status.as_u16(), self)
            }
        }

        let body = ErrorResponse {
            error: self.sanitized_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Outermost boundary: a panic anywhere in a handler becomes the same generic
/// 500 an `ApiError::Internal` would produce.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}
