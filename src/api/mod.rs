//! Quote submission API.
//!
//! Responsible for translating a completed wizard record into a network
//! submission with bounded latency. Draft persistence is deliberately not
//! this module's concern; the state machine reacts to the submission result
//! and decides what happens to the draft.

mod client;
mod error;

pub use error::ApiError;

use client::Client;
use log::*;
use rand::Rng;
use serde::Serialize;
use std::time::Duration;

const SUBMIT_PATH: &str = "posts";

/// The merged record sent to the quote endpoint: exactly the six fields
/// collected across the three steps, in the wire's camelCase naming.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub company_name: String,
    pub contact_email: String,
    pub vessel_name: String,
    pub vessel_type: String,
    pub coverage_level: String,
    pub cargo_value: f64,
}

/// A successful submission acknowledgement.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub id: u64,
    pub status: String,
}

/// Responsible for asynchronous interaction with the quote endpoint.
///
pub struct QuoteApi {
    client: Client,
}

impl QuoteApi {
    /// Returns a new instance for the given base URL and request timeout.
    ///
    pub fn new(base_url: &str, timeout: Duration) -> QuoteApi {
        debug!("Initializing quote API client for {}...", base_url);
        QuoteApi {
            client: Client::new(base_url, timeout),
        }
    }

    /// Submit the quote request, returning the acknowledgement or a
    /// classified error.
    ///
    /// Mock endpoints echo the posted body without assigning an id; in that
    /// case a small random id stands in and the status is reported as
    /// "submitted".
    pub async fn submit(&self, request: &QuoteRequest) -> Result<ApiResponse, ApiError> {
        debug!(
            "Submitting quote request for company '{}'...",
            request.company_name
        );

        let body = serde_json::to_value(request)?;
        let data = self.client.post(SUBMIT_PATH, &body).await?;

        let id = match data.get("id").and_then(|v| v.as_u64()) {
            Some(id) => id,
            None => rand::thread_rng().gen_range(0..1000),
        };

        info!("Quote request accepted with id {}", id);
        Ok(ApiResponse {
            id,
            status: "submitted".to_string(),
        })
    }
}
