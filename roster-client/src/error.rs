//! Client error types

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The endpoint answered with a GraphQL `errors` array
    #[error("GraphQL error: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Map a non-success HTTP status to a client error
pub(crate) fn status_error(status: http::StatusCode, text: String) -> ClientError {
    match status {
        http::StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        http::StatusCode::FORBIDDEN => ClientError::Forbidden(text),
        http::StatusCode::NOT_FOUND => ClientError::NotFound(text),
        http::StatusCode::BAD_REQUEST => ClientError::Validation(text),
        _ => ClientError::Internal(text),
    }
}

/// Kind of write issued against the remote store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    Upsert,
    Delete,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upsert => f.write_str("save"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

/// User-visible failure, kept on the list view until superseded
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListError {
    /// The list query failed; the last good records stay displayed
    #[error("Failed to load employees: {message}")]
    Fetch { message: String },

    /// An upsert or delete was rejected
    #[error("Failed to {op} employee: {message}")]
    Mutation { op: MutationKind, message: String },
}

impl ListError {
    pub fn fetch(err: &ClientError) -> Self {
        Self::Fetch {
            message: err.to_string(),
        }
    }

    pub fn mutation(op: MutationKind, err: &ClientError) -> Self {
        Self::Mutation {
            op,
            message: err.to_string(),
        }
    }
}

/// Rejected state-machine transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Draft edits, save and cancel need an open editor
    #[error("No edit session is open")]
    NotOpen,

    /// Confirm and decline need a pending delete
    #[error("No delete is pending confirmation")]
    NothingPending,

    /// The record lacks the identifying field of the configured key scheme
    #[error("Record has no `{0}` to identify it")]
    MissingKey(&'static str),

    /// No rejected save to reopen
    #[error("No rejected save to reopen")]
    NothingRejected,

    #[error("Unknown draft field: {0}")]
    UnknownField(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(http::StatusCode::UNAUTHORIZED, String::new()),
            ClientError::Unauthorized
        ));
        assert!(matches!(
            status_error(http::StatusCode::BAD_REQUEST, "bad".into()),
            ClientError::Validation(t) if t == "bad"
        ));
        assert!(matches!(
            status_error(http::StatusCode::BAD_GATEWAY, "down".into()),
            ClientError::Internal(_)
        ));
    }

    #[test]
    fn test_list_error_messages() {
        let err = ClientError::GraphQl(vec!["name must not be empty".into()]);
        let notice = ListError::mutation(MutationKind::Upsert, &err);
        assert_eq!(
            notice.to_string(),
            "Failed to save employee: GraphQL error: name must not be empty"
        );

        let json = serde_json::to_value(ListError::fetch(&ClientError::Unauthorized)).unwrap();
        assert_eq!(json["kind"], "fetch");
        assert_eq!(json["message"], "Authentication required");
    }
}
