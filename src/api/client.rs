//! Low-level HTTP client for the quote endpoint.
//!
//! This module wraps reqwest with the fixed per-request timeout and the
//! error classification the wizard depends on: timeout, non-2xx, and
//! no-response failures are distinct cases.

use super::error::ApiError;
use log::*;
use std::time::Duration;

/// Makes JSON POST requests against a fixed base URL with a bounded wait.
///
pub(crate) struct Client {
    base_url: String,
    timeout: Duration,
    http_client: reqwest::Client,
}

impl Client {
    /// Returns a new instance for the given base URL and timeout.
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be created. This should never happen
    /// in practice as reqwest::Client::builder().build() only fails on
    /// invalid configuration, which we don't use.
    pub(crate) fn new(base_url: &str, timeout: Duration) -> Self {
        Client {
            base_url: base_url.trim_end_matches('/').to_owned(),
            timeout,
            http_client: reqwest::Client::builder()
                .build()
                .expect("Failed to create HTTP client - this should never happen"),
        }
    }

    /// POST a JSON body and return the parsed JSON response, or a
    /// classified error.
    ///
    /// The timeout covers the whole exchange; when it elapses the in-flight
    /// request is cancelled and `ApiError::Timeout` is returned.
    pub(crate) async fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        let request_url = format!("{}/{}", self.base_url, path);
        debug!("POST {} (timeout {:?})", request_url, self.timeout);

        let response = self
            .http_client
            .post(&request_url)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let status_text = status
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_string();
            warn!("Request to {} failed with status {}", request_url, status);
            return Err(ApiError::Api {
                status: status.as_u16(),
                status_text,
            });
        }

        let bytes = response.bytes().await.map_err(classify_send_error)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn classify_send_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(e)
    }
}
