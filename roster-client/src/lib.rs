//! Roster Client - employee list controller for a GraphQL endpoint
//!
//! Keeps a paginated, sortable, filterable employee list in step with the
//! remote store and drives the create/edit and delete dialogs.

pub mod client;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod list;
pub mod mutation;
pub mod session;

pub use client::{EmployeeGateway, InProcessGateway};
pub use config::ClientConfig;
pub use controller::{EmployeeListController, ListView};
pub use dispatch::{Completion, MutationOutcome, MutationRequest};
pub use error::{ClientError, ClientResult, ListError, MutationKind, SessionError};
pub use http::GraphQlGateway;
pub use list::{CollectionSync, QueryParams};
pub use mutation::MutationOrchestrator;
pub use session::{DeleteConfirmation, DraftField, EditMode, EditSession, EmployeeDraft};

// Re-export shared types for convenience
pub use shared::{EmployeeKey, EmployeeRecord, KeyScheme, SortDirection, SortField};
