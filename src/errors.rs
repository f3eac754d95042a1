use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Every failure the relay can surface. All variants are recovered at the
/// handler boundary and rendered as a JSON `{"error": ...}` body; none are
/// fatal to the process.
///
/// Messages carried by `Upstream`, `Transport`, and `ResponseParse` have
/// already been scrubbed of the credential by the handler.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("server configuration error: API key missing")]
    MissingConfig,

    #[error("request body must be valid JSON")]
    InvalidBody,

    #[error("upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("upstream request failed: {0}")]
    Transport(String),

    #[error("upstream response unreadable: {0}")]
    ResponseParse(String),
}

impl AppError {
    /// Status surfaced to the caller. Upstream failures keep their original
    /// status where it is a valid code; everything that went wrong on this
    /// side of the wire is a 500.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::MissingConfig => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidBody => StatusCode::BAD_REQUEST,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            AppError::Transport(_) | AppError::ResponseParse(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let msg = match &self {
            AppError::MethodNotAllowed => "Method Not Allowed".to_string(),
            AppError::MissingConfig => {
                tracing::error!("rejecting request: GEMINI_API_KEY is not configured");
                "Server Config Error: API Key missing".to_string()
            }
            AppError::InvalidBody => "request body must be valid JSON".to_string(),
            AppError::Upstream { status, message } => {
                tracing::warn!(status, "upstream error: {}", message);
                message.clone()
            }
            AppError::Transport(e) => {
                tracing::error!("upstream transport failure: {}", e);
                e.clone()
            }
            AppError::ResponseParse(e) => {
                tracing::error!("unreadable upstream response: {}", e);
                e.clone()
            }
        };

        (self.status(), Json(json!({ "error": msg }))).into_response()
    }
}
