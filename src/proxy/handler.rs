use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::errors::AppError;
use crate::redact;
use crate::AppState;

/// The relay handler: validate, forward once, relay.
///
/// Preconditions are checked in order — method, credential, body — so a
/// misconfigured server still answers non-POST requests with a 405.
#[tracing::instrument(skip(state, body), fields(req_id = %uuid::Uuid::new_v4()))]
pub async fn relay_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Bytes,
) -> Result<Response, AppError> {
    // Bare OPTIONS the CORS layer did not already answer
    if method == Method::OPTIONS {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    if method != Method::POST {
        return Err(AppError::MethodNotAllowed);
    }

    let key = state
        .config
        .api_key
        .as_deref()
        .ok_or(AppError::MissingConfig)?;

    // The payload is opaque: parse only to reject garbage, then forward the
    // original bytes untouched.
    if body.is_empty() || serde_json::from_slice::<Value>(&body).is_err() {
        return Err(AppError::InvalidBody);
    }

    let url = format!(
        "{}?key={}",
        state.config.upstream_url(),
        urlencoding::encode(key)
    );

    let upstream_resp = state.upstream.generate(&url, key, body).await?;

    let status = upstream_resp.status();
    let resp_body = upstream_resp
        .bytes()
        .await
        .map_err(|e| AppError::ResponseParse(redact::scrub(&e.to_string(), key)))?;

    if !status.is_success() {
        return Err(AppError::Upstream {
            status: status.as_u16(),
            message: upstream_error_message(&resp_body, status, key),
        });
    }

    tracing::debug!(bytes = resp_body.len(), "relaying upstream response");
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        resp_body,
    )
        .into_response())
}

/// Pull a human-readable message out of an upstream error body.
///
/// Gemini errors look like `{"error":{"message":"...","status":"..."}}`; fall
/// back to the HTTP reason phrase when the body is not that shape. Whatever
/// comes out is scrubbed — upstream messages echo the request URL, credential
/// included.
fn upstream_error_message(body: &[u8], status: reqwest::StatusCode, key: &str) -> String {
    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("upstream request failed")
                .to_string()
        });
    redact::scrub(&message, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "AIzaSyTestKey123";

    #[test]
    fn extracts_gemini_error_message() {
        let body = br#"{"error":{"message":"rate limited","status":"RESOURCE_EXHAUSTED"}}"#;
        let msg = upstream_error_message(body, reqwest::StatusCode::TOO_MANY_REQUESTS, KEY);
        assert_eq!(msg, "rate limited");
    }

    #[test]
    fn falls_back_to_reason_phrase_for_non_json_body() {
        let msg = upstream_error_message(
            b"<html>nope</html>",
            reqwest::StatusCode::SERVICE_UNAVAILABLE,
            KEY,
        );
        assert_eq!(msg, "Service Unavailable");
    }

    #[test]
    fn falls_back_when_error_shape_is_unexpected() {
        let msg = upstream_error_message(
            br#"{"detail":"wrong shape"}"#,
            reqwest::StatusCode::BAD_REQUEST,
            KEY,
        );
        assert_eq!(msg, "Bad Request");
    }

    #[test]
    fn message_echoing_the_url_is_scrubbed() {
        let body = format!(
            r#"{{"error":{{"message":"API key not valid for https://host/m:generateContent?key={KEY}"}}}}"#
        );
        let msg =
            upstream_error_message(body.as_bytes(), reqwest::StatusCode::BAD_REQUEST, KEY);
        assert!(!msg.contains(KEY));
        assert!(msg.contains("key=[redacted]"));
    }
}
