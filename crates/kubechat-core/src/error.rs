use reqwest::StatusCode;
use thiserror::Error;

/// Ways a round trip to the chat backend can fail.
///
/// Every variant ends up as the same fallback message for the user; the
/// distinction only matters for the diagnostic log.
#[derive(Error, Debug)]
pub enum ChatError {
    /// The request never completed (connect, DNS, timeout).
    #[error("chat request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// A response arrived but the status is outside 2xx.
    #[error("chat backend returned HTTP {status}")]
    Http { status: StatusCode },

    /// The body is not JSON or lacks the `response` field.
    #[error("malformed response from chat backend: {0}")]
    MalformedResponse(String),
}

impl ChatError {
    pub fn kind(&self) -> &'static str {
        match self {
            ChatError::Network(_) => "network",
            ChatError::Http { .. } => "http",
            ChatError::MalformedResponse(_) => "malformed_response",
        }
    }
}
