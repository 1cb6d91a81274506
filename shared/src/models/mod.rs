//! Data models
//!
//! Shared between roster-client and roster-mock (via the GraphQL endpoint).

pub mod employee;

// Re-exports
pub use employee::*;
