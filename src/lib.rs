//! gemrelay — a secret-holding relay in front of the Gemini generateContent API.
//!
//! Browser clients POST a generateContent payload to `/api/generate`; the relay
//! attaches the server-held API key, forwards the body unmodified, and relays
//! the upstream response. The key never appears in any response, header, or
//! log line surfaced to the caller.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{any, get};
use axum::Router;
use tower_http::cors::CorsLayer;

pub mod cli;
pub mod config;
pub mod errors;
pub mod proxy;
pub mod redact;

/// Shared application state passed to handlers.
pub struct AppState {
    pub config: config::Config,
    pub upstream: proxy::upstream::UpstreamClient,
}

impl AppState {
    pub fn new(config: config::Config) -> Self {
        Self {
            upstream: proxy::upstream::UpstreamClient::new(),
            config,
        }
    }
}

/// Build the relay router with all middleware layers applied.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health endpoint (no auth, no CORS concerns)
        .route("/healthz", get(|| async { "ok" }))
        // `any` so non-POST methods reach the handler and get a JSON 405
        // instead of axum's bare one
        .route("/api/generate", any(proxy::handler::relay_handler))
        .with_state(state)
        // Prompts, not uploads: 1 MB covers any generateContent payload
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        // The relay exists so browser clients on any origin can call it
        // without holding the key; the permissive policy exposes nothing.
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn(security_headers_middleware))
}

/// Middleware: injects a unique X-Request-Id into every response.
/// This allows clients to correlate errors with relay logs.
async fn request_id_middleware(
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let req_id = uuid::Uuid::new_v4().to_string();
    let mut resp = next.run(req).await;
    if let Ok(val) = axum::http::HeaderValue::from_str(&req_id) {
        resp.headers_mut().insert("x-request-id", val);
    }
    resp
}

/// Middleware: injects security headers into every response.
async fn security_headers_middleware(
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let mut resp = next.run(req).await;
    let headers = resp.headers_mut();

    // Prevent MIME-type sniffing of relayed bodies
    headers.insert("X-Content-Type-Options", "nosniff".parse().unwrap());

    // Generated content is per-request; never cache it
    headers.insert("Cache-Control", "no-store".parse().unwrap());

    // Keep key-bearing URLs out of downstream referrer logs
    headers.insert("Referrer-Policy", "no-referrer".parse().unwrap());

    // Remove server identity header
    headers.remove("Server");

    resp
}
