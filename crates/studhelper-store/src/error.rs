//! Error types for the store crate.

use studhelper_client::ApiError;
use thiserror::Error;

/// Errors returned by store actions.
///
/// Every variant displays as the human-readable message that is also
/// recorded in the store's `error` field.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A remote call failed.
    #[error("{message}")]
    Api {
        /// Server-provided detail, or the action's generic message.
        message: String,
        /// The underlying API error.
        #[source]
        source: ApiError,
    },

    /// Client-side validation rejected the input before any request.
    #[error("{0}")]
    Validation(String),

    /// A referenced record is not loaded.
    #[error("{0}")]
    NotFound(String),

    /// A newer request for the same resource was issued, or the store was
    /// reset, before this one completed. Its result was not applied.
    #[error("Superseded by a newer request")]
    Superseded,
}

impl StoreError {
    /// Wraps an API error, preferring the server's message over `fallback`.
    pub fn api(source: ApiError, fallback: &str) -> Self {
        let message = source
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string());
        Self::Api { message, source }
    }

    /// The human-readable message.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// True if the result was discarded in favor of a newer request.
    #[must_use]
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }

    /// True if the server rejected the session token.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { source, .. } if source.is_unauthorized())
    }
}

/// Result type for store actions.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_detail_wins_over_fallback() {
        let err = StoreError::api(
            ApiError::from_body(400, r#"{"detail": "Class code invalid"}"#),
            "Failed to join class",
        );
        assert_eq!(err.message(), "Class code invalid");
    }

    #[test]
    fn test_fallback_used_without_detail() {
        let err = StoreError::api(ApiError::from_body(500, ""), "Failed to create class");
        assert_eq!(err.message(), "Failed to create class");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_unauthorized_detected() {
        let err = StoreError::api(ApiError::from_body(401, ""), "Login failed");
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_html_error_page_uses_fallback() {
        let body = "<html><body><h1>502 Bad Gateway</h1></body></html>";
        let err = StoreError::api(ApiError::from_body(502, body), "Failed to create class");
        assert_eq!(err.message(), "Failed to create class");
        assert!(!err.is_superseded());
    }
}
