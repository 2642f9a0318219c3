//! Errors returned by the GitHub client.

use std::fmt;

/// Failure of an upstream GitHub request.
///
/// None of these are retried. Callers surface them as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamError {
    /// GitHub answered with a non-2xx status.
    Status {
        status: u16,
        /// GitHub's `message` field when the body carried one, else the
        /// canonical reason phrase.
        message: String,
    },

    /// The request never produced a response (DNS, connect, timeout...).
    Network(String),

    /// The response body was not the JSON shape we expected.
    Decode(String),
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { status, message } => {
                write!(f, "GitHub API returned {}: {}", status, message)
            }
            Self::Network(msg) => write!(f, "GitHub API request failed: {}", msg),
            Self::Decode(msg) => write!(f, "Failed to decode GitHub API response: {}", msg),
        }
    }
}

impl std::error::Error for UpstreamError {}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
