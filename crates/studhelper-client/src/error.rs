//! # API Errors
//!
//! Error types for API operations.

use thiserror::Error;

/// Errors that can occur during API operations.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server returned an error response.
    #[error("server error: {status} - {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// Failed to deserialize response.
    #[error("invalid response format: {0}")]
    InvalidResponse(String),

    /// Failed to read a local file for upload.
    #[error("file error: {0}")]
    File(#[from] std::io::Error),
}

impl ApiError {
    /// Builds a [`ApiError::Server`] from a status and raw body.
    ///
    /// The message is the body's `detail` field, then its `message` field.
    /// Bodies that are not JSON (proxy error pages, plain text) yield an
    /// empty message, so callers fall back to their own wording.
    pub fn from_body(status: u16, body: &str) -> Self {
        Self::Server {
            status,
            message: extract_message(body).unwrap_or_default(),
        }
    }

    /// HTTP status code, when the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The message the server reported, if it reported a usable one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }

    /// True for 401 responses.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Pulls a human-readable message out of an error body.
///
/// FastAPI validation errors carry `detail` as a list of objects with a
/// `msg` field; those are joined.
fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    match value.get("detail") {
        Some(serde_json::Value::String(s)) => return Some(s.clone()),
        Some(serde_json::Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|i| i.get("msg").and_then(|m| m.as_str()))
                .collect();
            if !msgs.is_empty() {
                return Some(msgs.join("; "));
            }
        }
        _ => {}
    }

    value
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
