//! Error types for the shared crate

use thiserror::Error;

/// Failure to parse a wire/config token into a typed value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown sort field: {0}")]
    SortField(String),

    #[error("unknown key scheme: {0} (expected `id` or `user_name`)")]
    KeyScheme(String),
}
