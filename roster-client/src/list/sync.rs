//! Remote collection synchronizer
//!
//! Tracks which fetches belong to the current parameter tuple and applies only
//! their results. Each fetch gets a monotonically increasing sequence number:
//!
//! - a fetch for a different tuple supersedes every outstanding one, whose
//!   results are then dropped on arrival;
//! - within one tuple, a result older than the last applied one is dropped.
//!
//! `records` is never cleared by a failure or by a new request; it keeps the
//! last good page until a newer successful result replaces it.

use crate::client::EmployeeGateway;
use crate::dispatch::Dispatcher;
use crate::error::ListError;
use serde::Serialize;
use shared::{EmployeeRecord, ListVariables};
use std::collections::BTreeSet;

/// Handle of an issued fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchTicket {
    pub seq: u64,
    pub variables: ListVariables,
}

#[derive(Debug, Default)]
pub struct CollectionSync {
    records: Vec<EmployeeRecord>,
    error: Option<ListError>,
    current: Option<ListVariables>,
    next_seq: u64,
    in_flight: BTreeSet<u64>,
    applied: Option<u64>,
}

impl CollectionSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a request for the current tuple is outstanding
    pub fn loading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Failure of the last applied request for the current tuple
    pub fn error(&self) -> Option<&ListError> {
        self.error.as_ref()
    }

    /// Last successfully fetched page
    pub fn records(&self) -> &[EmployeeRecord] {
        &self.records
    }

    /// Tuple the synchronizer is currently tracking
    pub fn current(&self) -> Option<&ListVariables> {
        self.current.as_ref()
    }

    /// Register a fetch for `variables`
    pub fn begin(&mut self, variables: ListVariables) -> FetchTicket {
        let seq = self.next_seq;
        self.next_seq += 1;

        if self.current.as_ref() != Some(&variables) {
            if !self.in_flight.is_empty() {
                tracing::debug!(
                    superseded = self.in_flight.len(),
                    "Parameters changed; outstanding fetches superseded"
                );
            }
            self.in_flight.clear();
            self.applied = None;
            self.error = None;
            self.current = Some(variables.clone());
        }

        self.in_flight.insert(seq);
        FetchTicket { seq, variables }
    }

    /// Begin a fetch and spawn it on the dispatcher
    pub fn refresh<G: EmployeeGateway>(
        &mut self,
        variables: ListVariables,
        dispatcher: &mut Dispatcher<G>,
    ) -> u64 {
        let ticket = self.begin(variables);
        tracing::info!(
            seq = ticket.seq,
            first = ticket.variables.first,
            offset = ticket.variables.offset,
            filter = ?ticket.variables.filter.name_contains,
            "Fetching employees"
        );
        dispatcher.fetch(ticket.seq, ticket.variables);
        ticket.seq
    }

    /// Apply a finished fetch; returns whether it changed the view
    pub fn complete(
        &mut self,
        seq: u64,
        result: Result<Vec<EmployeeRecord>, ListError>,
    ) -> bool {
        if !self.in_flight.remove(&seq) {
            tracing::warn!(seq, "Discarding stale fetch response");
            return false;
        }

        if self.applied.is_some_and(|applied| seq < applied) {
            tracing::debug!(seq, "Discarding fetch response older than the applied one");
            return false;
        }
        self.applied = Some(seq);

        match result {
            Ok(records) => {
                tracing::debug!(seq, count = records.len(), "Employees loaded");
                self.records = records;
                self.error = None;
            }
            Err(err) => {
                tracing::warn!(seq, error = %err, "Fetch failed; keeping last records");
                self.error = Some(err);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{SortDirection, SortField};

    fn vars(filter: &str) -> ListVariables {
        ListVariables::new(10, 0, SortField::Name, SortDirection::Ascending, filter)
    }

    fn record(name: &str) -> EmployeeRecord {
        EmployeeRecord {
            id: Some(name.to_lowercase()),
            name: name.to_string(),
            user_name: name.to_lowercase(),
            email: None,
            phone: None,
        }
    }

    #[test]
    fn test_loading_tracks_current_tuple() {
        let mut sync = CollectionSync::new();
        assert!(!sync.loading());

        let t = sync.begin(vars(""));
        assert!(sync.loading());

        assert!(sync.complete(t.seq, Ok(vec![record("Bob")])));
        assert!(!sync.loading());
        assert_eq!(sync.records().len(), 1);
    }

    #[test]
    fn test_stale_tuple_response_is_discarded() {
        let mut sync = CollectionSync::new();
        let p1 = sync.begin(vars(""));
        let p2 = sync.begin(vars("A"));

        assert!(sync.complete(p2.seq, Ok(vec![record("Ann")])));
        assert!(!sync.complete(p1.seq, Ok(vec![record("Bob"), record("Ann")])));

        assert_eq!(sync.records(), &[record("Ann")]);
        assert!(!sync.loading());
    }

    #[test]
    fn test_returning_to_earlier_tuple_still_drops_old_response() {
        let mut sync = CollectionSync::new();
        let first = sync.begin(vars(""));
        sync.begin(vars("A"));
        let again = sync.begin(vars(""));

        assert!(!sync.complete(first.seq, Ok(vec![record("Old")])));
        assert!(sync.loading());
        assert!(sync.complete(again.seq, Ok(vec![record("New")])));
        assert_eq!(sync.records(), &[record("New")]);
    }

    #[test]
    fn test_resync_same_tuple_newest_wins() {
        let mut sync = CollectionSync::new();
        let older = sync.begin(vars(""));
        let newer = sync.begin(vars(""));

        assert!(sync.complete(newer.seq, Ok(vec![record("Fresh")])));
        assert!(!sync.complete(older.seq, Ok(vec![record("Before")])));
        assert_eq!(sync.records(), &[record("Fresh")]);
    }

    #[test]
    fn test_failure_keeps_records_and_success_clears_error() {
        let mut sync = CollectionSync::new();
        let t = sync.begin(vars(""));
        sync.complete(t.seq, Ok(vec![record("Bob")]));

        let t = sync.begin(vars(""));
        sync.complete(
            t.seq,
            Err(ListError::Fetch {
                message: "offline".into(),
            }),
        );
        assert!(sync.error().is_some());
        assert_eq!(sync.records(), &[record("Bob")]);

        let t = sync.begin(vars(""));
        sync.complete(t.seq, Ok(vec![]));
        assert!(sync.error().is_none());
        assert!(sync.records().is_empty());
    }

    #[test]
    fn test_parameter_change_clears_previous_error() {
        let mut sync = CollectionSync::new();
        let t = sync.begin(vars(""));
        sync.complete(
            t.seq,
            Err(ListError::Fetch {
                message: "offline".into(),
            }),
        );
        sync.begin(vars("B"));
        assert!(sync.error().is_none());
    }
}
