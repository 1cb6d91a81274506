//! roster-mock: in-memory employee GraphQL endpoint
//!
//! Serves the three operations the list client issues (`employeesPaginateQuery`,
//! `MergeEmployee`, `DeleteEmployee`) over a seeded in-memory store. Used for
//! local development and by the client's integration tests.

pub mod api;
pub mod config;
pub mod state;
pub mod store;
pub mod validation;

pub use api::router;
pub use config::Config;
pub use state::AppState;
pub use store::EmployeeStore;
