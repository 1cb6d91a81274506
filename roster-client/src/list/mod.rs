//! Employee list: query parameters and the remote collection they select

pub mod params;
pub mod sync;

pub use params::QueryParams;
pub use sync::{CollectionSync, FetchTicket};
