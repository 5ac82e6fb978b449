//! Error types for Redmine API access.

use serde_json::Value;
use thiserror::Error;

/// Errors returned by the Redmine API layer.
#[derive(Debug, Error)]
pub enum Error {
    /// The tracker answered 404 for the requested resource.
    #[error("Resource not found: {path}")]
    NotFound {
        /// Request path that was not found.
        path: String,
        /// Response body, if the tracker sent one.
        body: Option<Value>,
    },

    /// The tracker answered with any other non-success status.
    #[error("Redmine API returned status {status} for {path}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Request path.
        path: String,
        /// Response body, verbatim JSON when parseable.
        body: Option<Value>,
    },

    /// The request never produced a response (connect, TLS, timeout).
    #[error("Failed to reach Redmine: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success response could not be decoded into the expected shape.
    #[error("Failed to decode response from {path}: {source}")]
    Decode {
        /// Request path.
        path: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// Startup configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The configured base URL does not parse.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Whether the tracker reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The raw diagnostic payload returned by the tracker, if any.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::NotFound { body, .. } | Self::Api { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

/// Result type for Redmine API operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_not_found_classification() {
        let err = Error::NotFound {
            path: "/projects/nope.json".to_string(),
            body: None,
        };
        assert!(err.is_not_found());
        assert!(err.body().is_none());
    }

    #[test]
    fn test_api_error_exposes_body() {
        let err = Error::Api {
            status: 422,
            path: "/time_entries.json".to_string(),
            body: Some(json!({"errors": ["Activity cannot be blank"]})),
        };
        assert!(!err.is_not_found());
        assert_eq!(
            err.body(),
            Some(&json!({"errors": ["Activity cannot be blank"]}))
        );
        assert_eq!(
            err.to_string(),
            "Redmine API returned status 422 for /time_entries.json"
        );
    }
}
