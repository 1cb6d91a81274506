//! Mutation orchestrator
//!
//! Issues upserts and deletes through the dispatcher and decides, when each
//! one resolves, whether the list must be resynchronized. Nothing is retried:
//! a failure is kept as a notice for the view and the list is left alone.

use crate::client::EmployeeGateway;
use crate::dispatch::{Dispatcher, MutationOutcome, MutationRequest};
use crate::error::{ListError, MutationKind};
use crate::session::{EmployeeDraft, PendingSave};
use crate::ClientResult;
use shared::{EmployeeKey, EmployeeUpsert, KeyScheme};
use std::collections::HashMap;

#[derive(Debug)]
struct InFlight {
    kind: MutationKind,
    /// Dialog state the upsert came from, kept so a rejection can be reopened
    origin: Option<PendingSave>,
}

/// How a mutation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub ticket: u64,
    pub kind: MutationKind,
    pub succeeded: bool,
    /// The list must be refetched with the current parameters
    pub resync: bool,
}

#[derive(Debug)]
pub struct MutationOrchestrator {
    scheme: KeyScheme,
    next_ticket: u64,
    in_flight: HashMap<u64, InFlight>,
    last_error: Option<ListError>,
    rejected: Option<PendingSave>,
}

impl MutationOrchestrator {
    pub fn new(scheme: KeyScheme) -> Self {
        Self {
            scheme,
            next_ticket: 0,
            in_flight: HashMap::new(),
            last_error: None,
            rejected: None,
        }
    }

    pub fn scheme(&self) -> KeyScheme {
        self.scheme
    }

    /// Mutations issued but not yet resolved
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Failure notice of the last rejected mutation
    pub fn last_error(&self) -> Option<&ListError> {
        self.last_error.as_ref()
    }

    /// Draft of the last rejected save
    pub fn rejected(&self) -> Option<&PendingSave> {
        self.rejected.as_ref()
    }

    pub fn take_rejected(&mut self) -> Option<PendingSave> {
        self.rejected.take()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    /// Payload for a draft under the configured key scheme
    ///
    /// Id-keyed creates get a fresh UUID; the user_name-keyed scheme never
    /// sends an id.
    pub fn prepare_upsert(&self, draft: &EmployeeDraft) -> EmployeeUpsert {
        let mut fields = draft.to_upsert();
        fields.id = match self.scheme {
            KeyScheme::Id => Some(
                fields
                    .id
                    .take()
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            ),
            KeyScheme::UserName => None,
        };
        fields
    }

    /// Send an upsert
    pub fn upsert<G: EmployeeGateway>(
        &mut self,
        fields: EmployeeUpsert,
        dispatcher: &mut Dispatcher<G>,
    ) -> u64 {
        self.issue(MutationRequest::Upsert(fields), None, dispatcher)
    }

    /// Send the upsert for a save that just closed the editor
    pub fn save<G: EmployeeGateway>(
        &mut self,
        pending: PendingSave,
        dispatcher: &mut Dispatcher<G>,
    ) -> u64 {
        let fields = self.prepare_upsert(&pending.draft);
        self.issue(MutationRequest::Upsert(fields), Some(pending), dispatcher)
    }

    /// Send a delete
    pub fn remove<G: EmployeeGateway>(
        &mut self,
        key: EmployeeKey,
        dispatcher: &mut Dispatcher<G>,
    ) -> u64 {
        self.issue(MutationRequest::Delete(key), None, dispatcher)
    }

    fn issue<G: EmployeeGateway>(
        &mut self,
        request: MutationRequest,
        origin: Option<PendingSave>,
        dispatcher: &mut Dispatcher<G>,
    ) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;

        let kind = match &request {
            MutationRequest::Upsert(fields) => {
                tracing::info!(
                    ticket,
                    key = ?fields.key(self.scheme),
                    "Upserting employee"
                );
                MutationKind::Upsert
            }
            MutationRequest::Delete(key) => {
                tracing::info!(ticket, key = %key, "Deleting employee");
                MutationKind::Delete
            }
        };

        self.in_flight.insert(ticket, InFlight { kind, origin });
        dispatcher.mutate(ticket, request);
        ticket
    }

    /// Resolve a finished mutation; `None` for an unknown ticket
    pub fn complete(
        &mut self,
        ticket: u64,
        result: ClientResult<MutationOutcome>,
    ) -> Option<Resolution> {
        let Some(entry) = self.in_flight.remove(&ticket) else {
            tracing::warn!(ticket, "Completion for unknown mutation");
            return None;
        };

        match result {
            Ok(outcome) => {
                match &outcome {
                    MutationOutcome::Upserted(record) => {
                        tracing::info!(ticket, name = %record.name, "Employee saved");
                    }
                    MutationOutcome::Deleted { key, removed: true } => {
                        tracing::info!(ticket, key = %key, "Employee deleted");
                    }
                    MutationOutcome::Deleted { key, removed: false } => {
                        tracing::warn!(ticket, key = %key, "Delete matched no employee");
                    }
                }
                self.last_error = None;
                self.rejected = None;
                Some(Resolution {
                    ticket,
                    kind: entry.kind,
                    succeeded: true,
                    resync: true,
                })
            }
            Err(err) => {
                tracing::warn!(ticket, op = %entry.kind, error = %err, "Mutation failed");
                self.last_error = Some(ListError::mutation(entry.kind, &err));
                if entry.origin.is_some() {
                    self.rejected = entry.origin;
                }
                Some(Resolution {
                    ticket,
                    kind: entry.kind,
                    succeeded: false,
                    resync: false,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Completion;
    use crate::session::EditMode;
    use async_trait::async_trait;
    use shared::{EmployeeRecord, ListVariables};
    use std::sync::Arc;

    /// Accepts upserts whose name is non-empty
    struct NameCheck;

    #[async_trait]
    impl EmployeeGateway for NameCheck {
        async fn fetch_collection(
            &self,
            _variables: &ListVariables,
        ) -> ClientResult<Vec<EmployeeRecord>> {
            Ok(Vec::new())
        }

        async fn upsert_record(&self, fields: &EmployeeUpsert) -> ClientResult<EmployeeRecord> {
            if fields.name.is_empty() {
                return Err(crate::ClientError::GraphQl(vec!["name must not be empty".into()]));
            }
            Ok(fields.clone().into_record())
        }

        async fn delete_record(&self, _key: &EmployeeKey) -> ClientResult<bool> {
            Ok(false)
        }
    }

    async fn resolve(
        orchestrator: &mut MutationOrchestrator,
        rx: &mut tokio::sync::mpsc::UnboundedReceiver<Completion>,
    ) -> Resolution {
        match rx.recv().await.unwrap() {
            Completion::Mutation { ticket, result } => {
                orchestrator.complete(ticket, result).unwrap()
            }
            other => panic!("unexpected completion: {other:?}"),
        }
    }

    fn draft(id: Option<&str>) -> EmployeeDraft {
        EmployeeDraft {
            id: id.map(str::to_string),
            name: "Ann".into(),
            user_name: "ann1".into(),
            email: String::new(),
            phone: "555".into(),
        }
    }

    #[test]
    fn test_prepare_keeps_existing_id() {
        let orchestrator = MutationOrchestrator::new(KeyScheme::Id);
        let fields = orchestrator.prepare_upsert(&draft(Some("5")));
        assert_eq!(fields.id.as_deref(), Some("5"));
        assert!(fields.email.is_none());
    }

    #[test]
    fn test_prepare_assigns_id_for_create() {
        let orchestrator = MutationOrchestrator::new(KeyScheme::Id);
        let fields = orchestrator.prepare_upsert(&draft(None));
        let id = fields.id.unwrap();
        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_prepare_drops_id_for_user_name_scheme() {
        let orchestrator = MutationOrchestrator::new(KeyScheme::UserName);
        let fields = orchestrator.prepare_upsert(&draft(Some("5")));
        assert!(fields.id.is_none());
        assert_eq!(fields.user_name, "ann1");
    }

    #[test]
    fn test_unknown_ticket_is_ignored() {
        let mut orchestrator = MutationOrchestrator::new(KeyScheme::Id);
        let resolution = orchestrator.complete(
            42,
            Ok(MutationOutcome::Deleted {
                key: EmployeeKey::Id("1".into()),
                removed: true,
            }),
        );
        assert!(resolution.is_none());
    }

    #[test]
    fn test_failed_save_keeps_rejected_draft() {
        let mut orchestrator = MutationOrchestrator::new(KeyScheme::Id);
        orchestrator.in_flight.insert(
            0,
            InFlight {
                kind: MutationKind::Upsert,
                origin: Some(PendingSave {
                    mode: EditMode::Creating,
                    draft: draft(None),
                }),
            },
        );

        let resolution = orchestrator
            .complete(0, Err(crate::ClientError::Validation("name".into())))
            .unwrap();
        assert!(!resolution.succeeded);
        assert!(!resolution.resync);
        assert!(matches!(
            orchestrator.last_error(),
            Some(ListError::Mutation {
                op: MutationKind::Upsert,
                ..
            })
        ));
        assert_eq!(orchestrator.rejected().unwrap().mode, EditMode::Creating);

        orchestrator.dismiss_error();
        assert!(orchestrator.last_error().is_none());
        assert!(orchestrator.take_rejected().is_some());
    }

    #[tokio::test]
    async fn test_upsert_sends_fields_as_given() {
        let (mut dispatcher, mut rx) = Dispatcher::new(Arc::new(NameCheck));
        let mut orchestrator = MutationOrchestrator::new(KeyScheme::UserName);

        let fields = draft(None).to_upsert();
        let ticket = orchestrator.upsert(fields, &mut dispatcher);
        assert_eq!(orchestrator.in_flight(), 1);

        let resolution = resolve(&mut orchestrator, &mut rx).await;
        assert_eq!(resolution.ticket, ticket);
        assert_eq!(resolution.kind, MutationKind::Upsert);
        assert!(resolution.succeeded);
        assert!(resolution.resync);
        assert_eq!(orchestrator.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_rejected_upsert_has_no_draft_to_reopen() {
        let (mut dispatcher, mut rx) = Dispatcher::new(Arc::new(NameCheck));
        let mut orchestrator = MutationOrchestrator::new(KeyScheme::Id);

        let mut fields = draft(Some("5")).to_upsert();
        fields.name.clear();
        orchestrator.upsert(fields, &mut dispatcher);

        let resolution = resolve(&mut orchestrator, &mut rx).await;
        assert!(!resolution.succeeded);
        assert!(!resolution.resync);
        assert!(orchestrator.last_error().is_some());
        assert!(orchestrator.rejected().is_none());
    }

    #[tokio::test]
    async fn test_remove_without_match_still_resyncs() {
        let (mut dispatcher, mut rx) = Dispatcher::new(Arc::new(NameCheck));
        let mut orchestrator = MutationOrchestrator::new(KeyScheme::Id);

        orchestrator.remove(EmployeeKey::Id("404".into()), &mut dispatcher);
        let resolution = resolve(&mut orchestrator, &mut rx).await;
        assert_eq!(resolution.kind, MutationKind::Delete);
        assert!(resolution.succeeded);
        assert!(resolution.resync);
    }
}
