/// HTTP client for the single outbound call to the generative API.
use std::time::Duration;

use axum::body::Bytes;

use crate::errors::AppError;
use crate::redact;

pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .expect("failed to build HTTP client");

        Self { client }
    }

    /// Issue the one outbound POST. No retries: the caller sees the first
    /// failure immediately.
    ///
    /// `key` is only used to scrub transport errors, which echo the full
    /// request URL — credential included.
    pub async fn generate(
        &self,
        url: &str,
        key: &str,
        body: Bytes,
    ) -> Result<reqwest::Response, AppError> {
        self.client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::Transport(redact::scrub(&e.to_string(), key)))
    }
}

impl Default for UpstreamClient {
    fn default() -> Self {
        Self::new()
    }
}
