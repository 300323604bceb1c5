use crate::resource::ResourceKind;
use std::fmt;
use thiserror::Error;

/// Store operation an error was raised from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    Set,
    Update,
    List,
    Remove,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Operation::Get => "get",
            Operation::Set => "set",
            Operation::Update => "update",
            Operation::List => "list",
            Operation::Remove => "delete",
        };
        f.write_str(verb)
    }
}

/// Underlying reason a remote call failed
#[derive(Debug, Error)]
pub enum BackendCause {
    /// HTTP transport error
    #[error("HTTP client error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Remote answered with an error status
    #[error("HTTP error {status}: {body}")]
    Status { status: u16, body: String },

    /// Response parsed but lacked a required field
    #[error("missing field in response: {0}")]
    MissingField(&'static str),
}

/// Main error type for store operations.
///
/// Errors fall into three groups:
/// - `Configuration`: missing or contradictory construction arguments
/// - validation (`InvalidFields`, `KindMismatch`, `MissingIdentifier`,
///   `InvalidIdentifier`):
///   rejected before any request is sent
/// - `Backend`: the remote call failed; carries the operation and cause
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid fields for {kind}: {}", .fields.join(", "))]
    InvalidFields {
        kind: ResourceKind,
        fields: Vec<String>,
    },

    #[error("key addresses {actual} but this backend stores {expected}")]
    KindMismatch {
        expected: ResourceKind,
        actual: ResourceKind,
    },

    #[error("cannot {operation} without a resource id")]
    MissingIdentifier { operation: Operation },

    /// Id that cannot be the last segment of a resource URL (`.` or `..`)
    #[error("invalid resource id: {id:?}")]
    InvalidIdentifier { id: String },

    #[error("unable to {operation} object in cloud store backend: {source}")]
    Backend {
        operation: Operation,
        #[source]
        source: BackendCause,
    },
}

impl StoreError {
    /// Create a new configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        StoreError::Configuration(message.into())
    }

    /// Wrap a failure cause raised while running `operation`
    pub fn backend(operation: Operation, source: impl Into<BackendCause>) -> Self {
        StoreError::Backend {
            operation,
            source: source.into(),
        }
    }

    /// Check if this error was raised before any request was sent
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidFields { .. }
                | StoreError::KindMismatch { .. }
                | StoreError::MissingIdentifier { .. }
                | StoreError::InvalidIdentifier { .. }
        )
    }

    /// Check if this error came from the remote call
    pub fn is_backend(&self) -> bool {
        matches!(self, StoreError::Backend { .. })
    }

    /// Get the operation a backend error was raised from
    pub fn operation(&self) -> Option<Operation> {
        match self {
            StoreError::Backend { operation, .. } => Some(*operation),
            StoreError::MissingIdentifier { operation } => Some(*operation),
            _ => None,
        }
    }

    /// Get the HTTP status code if the remote answered with an error status
    pub fn status_code(&self) -> Option<u16> {
        match self {
            StoreError::Backend {
                source: BackendCause::Status { status, .. },
                ..
            } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_names_operation() {
        let error = StoreError::backend(
            Operation::Remove,
            BackendCause::Status {
                status: 500,
                body: "boom".to_string(),
            },
        );
        assert_eq!(
            error.to_string(),
            "unable to delete object in cloud store backend: HTTP error 500: boom"
        );
        assert_eq!(error.status_code(), Some(500));
        assert_eq!(error.operation(), Some(Operation::Remove));
        assert!(error.is_backend());
        assert!(!error.is_validation());
    }

    #[test]
    fn test_invalid_fields_lists_names() {
        let error = StoreError::InvalidFields {
            kind: ResourceKind::Checkpoint,
            fields: vec!["bar".to_string(), "foo".to_string()],
        };
        assert_eq!(error.to_string(), "invalid fields for checkpoint: bar, foo");
        assert!(error.is_validation());
    }

    #[test]
    fn test_invalid_identifier_is_validation() {
        let error = StoreError::InvalidIdentifier {
            id: "..".to_string(),
        };
        assert_eq!(error.to_string(), "invalid resource id: \"..\"");
        assert!(error.is_validation());
        assert!(!error.is_backend());
        assert_eq!(error.operation(), None);
    }

    #[test]
    fn test_json_cause_converts() {
        let json_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error = StoreError::backend(Operation::Get, json_error);
        assert!(matches!(
            error,
            StoreError::Backend {
                source: BackendCause::Json(_),
                ..
            }
        ));
        assert!(error.to_string().starts_with("unable to get object"));
    }
}
