//! Shared types for the roster workspace
//!
//! Employee models, list query variables and the GraphQL envelope used
//! by both roster-client and roster-mock.

pub mod error;
pub mod graph;
pub mod models;
pub mod query;

// Re-exports
pub use error::ParseError;
pub use models::employee::{EmployeeKey, EmployeeRecord, EmployeeUpsert, KeyScheme};
pub use query::{EmployeeFilter, ListVariables, SortDirection, SortField};
