//! Error types for the redmine MCP server.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while handling a tool invocation.
#[derive(Debug, Error)]
pub enum Error {
    /// A project or task id was neither supplied nor stored in the context.
    #[error("{field} is required. Either provide it or set a default using {setter}.")]
    MissingContext {
        /// The argument that was missing.
        field: &'static str,
        /// The tool that stores a default for it.
        setter: &'static str,
    },

    /// An operation-specific mandatory field was omitted.
    #[error("{field} is required. {hint}")]
    MissingRequiredField {
        /// The argument that was missing.
        field: &'static str,
        /// What to do about it.
        hint: &'static str,
    },

    /// The tracker reported the referenced entity as missing.
    #[error("{what} not found. {hint}")]
    RemoteNotFound {
        /// Human-readable description of what was looked up.
        what: String,
        /// What to do about it.
        hint: &'static str,
        /// Underlying tracker error.
        #[source]
        source: redmine::Error,
    },

    /// Any other tracker failure.
    #[error("{0}")]
    Remote(#[from] redmine::Error),

    /// The invocation named a tool outside the catalog.
    #[error("Unknown tool: {0}")]
    UnknownOperation(String),

    /// The argument bag could not be decoded for the named tool.
    #[error("Invalid arguments for {operation}: {reason}")]
    InvalidArguments {
        /// Tool name.
        operation: String,
        /// Decoder message.
        reason: String,
    },
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`Error::MissingContext`].
    MissingContext,
    /// See [`Error::MissingRequiredField`].
    MissingRequiredField,
    /// The tracker answered "not found".
    RemoteNotFound,
    /// Any other tracker or transport failure.
    RemoteError,
    /// See [`Error::UnknownOperation`].
    UnknownOperation,
    /// See [`Error::InvalidArguments`].
    InvalidArguments,
}

impl Error {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingContext { .. } => ErrorKind::MissingContext,
            Self::MissingRequiredField { .. } => ErrorKind::MissingRequiredField,
            Self::RemoteNotFound { .. } => ErrorKind::RemoteNotFound,
            Self::Remote(e) if e.is_not_found() => ErrorKind::RemoteNotFound,
            Self::Remote(_) => ErrorKind::RemoteError,
            Self::UnknownOperation(_) => ErrorKind::UnknownOperation,
            Self::InvalidArguments { .. } => ErrorKind::InvalidArguments,
        }
    }

    /// The tracker's raw diagnostic payload, when the failure came from it.
    #[must_use]
    pub fn detail(&self) -> Option<&Value> {
        match self {
            Self::RemoteNotFound { source, .. } | Self::Remote(source) => source.body(),
            _ => None,
        }
    }

    /// Whether the failure was produced locally, before any remote call.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::MissingContext
                | ErrorKind::MissingRequiredField
                | ErrorKind::UnknownOperation
                | ErrorKind::InvalidArguments
        )
    }
}

/// Result type for redmine MCP operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_context_message() {
        let err = Error::MissingContext {
            field: "issue_id",
            setter: "set_current_task",
        };
        assert_eq!(
            err.to_string(),
            "issue_id is required. Either provide it or set a default using set_current_task."
        );
        assert_eq!(err.kind(), ErrorKind::MissingContext);
        assert!(err.is_local());
    }

    #[test]
    fn test_remote_not_found_classified_from_remote() {
        let err = Error::Remote(redmine::Error::NotFound {
            path: "/issues/9.json".to_string(),
            body: None,
        });
        assert_eq!(err.kind(), ErrorKind::RemoteNotFound);
        assert!(!err.is_local());
    }

    #[test]
    fn test_remote_detail_passthrough() {
        let err = Error::Remote(redmine::Error::Api {
            status: 422,
            path: "/issues.json".to_string(),
            body: Some(json!({"errors": ["Subject cannot be blank"]})),
        });
        assert_eq!(err.kind(), ErrorKind::RemoteError);
        assert_eq!(
            err.detail(),
            Some(&json!({"errors": ["Subject cannot be blank"]}))
        );
    }
}
