//! Spawns gateway calls and routes their results back to the controller
//!
//! Every call runs on its own tokio task. The task never touches list state;
//! it only sends a [`Completion`] over the channel so all state changes happen
//! on the controller's owner, one event at a time.

use crate::client::EmployeeGateway;
use crate::{ClientError, ClientResult};
use shared::{EmployeeKey, EmployeeRecord, EmployeeUpsert, ListVariables};
use std::sync::Arc;
use tokio::sync::mpsc;

/// A write to perform against the remote store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRequest {
    Upsert(EmployeeUpsert),
    Delete(EmployeeKey),
}

/// Successful result of a write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Upserted(EmployeeRecord),
    Deleted { key: EmployeeKey, removed: bool },
}

/// Result of a finished gateway call, tagged with what issued it
#[derive(Debug)]
pub enum Completion {
    Fetch {
        seq: u64,
        result: ClientResult<Vec<EmployeeRecord>>,
    },
    Mutation {
        ticket: u64,
        result: ClientResult<MutationOutcome>,
    },
}

/// Task spawner bound to one gateway and one completion channel
pub struct Dispatcher<G> {
    gateway: Arc<G>,
    tx: mpsc::UnboundedSender<Completion>,
    outstanding: usize,
}

impl<G: EmployeeGateway> Dispatcher<G> {
    /// Create a dispatcher and the receiving end of its completion channel
    pub fn new(gateway: Arc<G>) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                gateway,
                tx,
                outstanding: 0,
            },
            rx,
        )
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Calls spawned whose completion has not been applied yet
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Record that one completion was applied
    pub fn settled(&mut self) {
        self.outstanding = self.outstanding.saturating_sub(1);
    }

    /// Spawn a list fetch
    pub fn fetch(&mut self, seq: u64, variables: ListVariables) {
        let gateway = Arc::clone(&self.gateway);
        self.spawn_call(
            async move { gateway.fetch_collection(&variables).await },
            move |result| Completion::Fetch { seq, result },
        );
    }

    /// Spawn a mutation
    pub fn mutate(&mut self, ticket: u64, request: MutationRequest) {
        let gateway = Arc::clone(&self.gateway);
        self.spawn_call(
            async move {
                match request {
                    MutationRequest::Upsert(fields) => gateway
                        .upsert_record(&fields)
                        .await
                        .map(MutationOutcome::Upserted),
                    MutationRequest::Delete(key) => gateway
                        .delete_record(&key)
                        .await
                        .map(|removed| MutationOutcome::Deleted { key, removed }),
                }
            },
            move |result| Completion::Mutation { ticket, result },
        );
    }

    /// Run `call` on its own task and report its result
    ///
    /// A panicking call still produces a completion (as `Internal`), so the
    /// outstanding count always drains.
    fn spawn_call<T, F, C>(&mut self, call: F, complete: C)
    where
        T: Send + 'static,
        F: Future<Output = ClientResult<T>> + Send + 'static,
        C: FnOnce(ClientResult<T>) -> Completion + Send + 'static,
    {
        let tx = self.tx.clone();
        self.outstanding += 1;

        tokio::spawn(async move {
            let result = match tokio::spawn(call).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(error = %e, "Gateway call aborted");
                    Err(ClientError::Internal(format!("gateway call aborted: {e}")))
                }
            };
            if tx.send(complete(result)).is_err() {
                tracing::debug!("Controller dropped before the call completed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Fetches panic; writes echo back
    struct Flaky;

    #[async_trait]
    impl EmployeeGateway for Flaky {
        async fn fetch_collection(
            &self,
            _variables: &ListVariables,
        ) -> ClientResult<Vec<EmployeeRecord>> {
            panic!("backend exploded");
        }

        async fn upsert_record(&self, fields: &EmployeeUpsert) -> ClientResult<EmployeeRecord> {
            Ok(fields.clone().into_record())
        }

        async fn delete_record(&self, _key: &EmployeeKey) -> ClientResult<bool> {
            Ok(true)
        }
    }

    fn vars() -> ListVariables {
        ListVariables::new(10, 0, shared::SortField::Name, shared::SortDirection::Ascending, "")
    }

    #[tokio::test]
    async fn test_panicking_call_still_completes() {
        let (mut dispatcher, mut rx) = Dispatcher::new(Arc::new(Flaky));
        dispatcher.fetch(3, vars());
        assert_eq!(dispatcher.outstanding(), 1);

        match rx.recv().await.unwrap() {
            Completion::Fetch { seq, result } => {
                assert_eq!(seq, 3);
                assert!(matches!(result, Err(ClientError::Internal(_))));
            }
            other => panic!("unexpected completion: {other:?}"),
        }
        dispatcher.settled();
        assert_eq!(dispatcher.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_delete_completion_carries_key() {
        let (mut dispatcher, mut rx) = Dispatcher::new(Arc::new(Flaky));
        let key = EmployeeKey::UserName("ann1".into());
        dispatcher.mutate(7, MutationRequest::Delete(key.clone()));

        match rx.recv().await.unwrap() {
            Completion::Mutation { ticket, result } => {
                assert_eq!(ticket, 7);
                assert_eq!(
                    result.unwrap(),
                    MutationOutcome::Deleted { key, removed: true }
                );
            }
            other => panic!("unexpected completion: {other:?}"),
        }
    }
}
