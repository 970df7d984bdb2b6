//! Submission API-specific error types.

/// Errors that can occur while submitting a quote request.
///
/// The display strings are exactly what screens surface as the submit
/// error, so they are worded for the user rather than the log.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request exceeded the bounded wait and was cancelled
    #[error("Request timed out. Please try again.")]
    Timeout,

    /// The server answered with a non-2xx status
    #[error("Failed to submit quote request: {status_text}")]
    Api { status: u16, status_text: String },

    /// No response at all (DNS, refused connection, dropped socket)
    #[error("Network error. Please check your connection and try again.")]
    Network(#[source] reqwest::Error),

    /// A 2xx response carried a body that was not valid JSON
    #[error("Failed to deserialize API response: {0}")]
    Deserialization(#[from] serde_json::Error),
}

impl ApiError {
    /// The numeric HTTP status behind this error; 0 when no response was
    /// received (timeout or network failure).
    ///
    #[allow(dead_code)]
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Api { status, .. } => *status,
            _ => 0,
        }
    }
}
