//! Employee list controller
//!
//! Owns one instance of each list component and turns UI intents into
//! parameter changes, fetches and mutations. Intents are plain `&mut self`
//! calls; network results come back as [`Completion`]s and are applied by
//! [`EmployeeListController::apply`] on the same owner, one at a time.
//!
//! Must be driven from inside a tokio runtime (gateway calls are spawned).
//!
//! ```no_run
//! # async fn demo() -> roster_client::ClientResult<()> {
//! use roster_client::{ClientConfig, EmployeeListController};
//! use shared::SortField;
//!
//! let config = ClientConfig::from_env();
//! let mut list = EmployeeListController::new(config.build_gateway()?, &config);
//! list.start();
//! list.set_sort(SortField::Name);
//! while list.pump().await {}
//! println!("{:?}", list.records());
//! # Ok(())
//! # }
//! ```

use crate::client::EmployeeGateway;
use crate::dispatch::{Completion, Dispatcher};
use crate::error::{ListError, SessionError};
use crate::list::{CollectionSync, QueryParams};
use crate::mutation::{MutationOrchestrator, Resolution};
use crate::session::{DeleteConfirmation, DraftField, EditMode, EditSession, EmployeeDraft};
use crate::ClientConfig;
use serde::Serialize;
use shared::{EmployeeKey, EmployeeRecord, KeyScheme, SortDirection, SortField};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Everything the rendering side needs, in one serialisable value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListView {
    pub loading: bool,
    pub error: Option<ListError>,
    pub records: Vec<EmployeeRecord>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub filter_text: String,
    pub page_index: u32,
    pub page_size: u32,
    pub edit_mode: EditMode,
    pub draft: Option<EmployeeDraft>,
    pub pending_delete: Option<EmployeeKey>,
    pub mutating: bool,
    pub mutation_error: Option<ListError>,
    pub can_reopen_rejected: bool,
}

pub struct EmployeeListController<G> {
    params: QueryParams,
    sync: CollectionSync,
    edit: EditSession,
    delete: DeleteConfirmation,
    mutations: MutationOrchestrator,
    dispatcher: Dispatcher<G>,
    completions: mpsc::UnboundedReceiver<Completion>,
}

impl<G: EmployeeGateway> EmployeeListController<G> {
    /// Create a controller using the page size and key scheme of `config`
    pub fn new(gateway: G, config: &ClientConfig) -> Self {
        Self::with_shared(Arc::new(gateway), config.page_size, config.key_scheme)
    }

    /// Create a controller over a gateway shared with other owners
    pub fn with_shared(gateway: Arc<G>, page_size: u32, scheme: KeyScheme) -> Self {
        let (dispatcher, completions) = Dispatcher::new(gateway);
        Self {
            params: QueryParams::new(page_size),
            sync: CollectionSync::new(),
            edit: EditSession::new(),
            delete: DeleteConfirmation::new(),
            mutations: MutationOrchestrator::new(scheme),
            dispatcher,
            completions,
        }
    }

    pub fn gateway(&self) -> &Arc<G> {
        self.dispatcher.gateway()
    }

    pub fn key_scheme(&self) -> KeyScheme {
        self.mutations.scheme()
    }

    // ========== Lifecycle ==========

    /// Issue the initial fetch
    pub fn start(&mut self) -> u64 {
        self.refresh()
    }

    /// Refetch with the current parameters
    pub fn refresh(&mut self) -> u64 {
        self.sync.refresh(self.params.variables(), &mut self.dispatcher)
    }

    // ========== Query parameters ==========

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn sort_field(&self) -> SortField {
        self.params.sort_field()
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.params.sort_direction()
    }

    pub fn filter_text(&self) -> &str {
        self.params.filter_text()
    }

    /// Column header click; always refetches
    pub fn set_sort(&mut self, field: SortField) {
        if self.params.set_sort(field) {
            self.refresh();
        }
    }

    /// Filter keystroke; refetches when the text actually changed
    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        if self.params.set_filter_text(text) {
            self.refresh();
        }
    }

    pub fn set_page_index(&mut self, page_index: u32) {
        if self.params.set_page_index(page_index) {
            self.refresh();
        }
    }

    // ========== Collection facets ==========

    pub fn loading(&self) -> bool {
        self.sync.loading()
    }

    pub fn error(&self) -> Option<&ListError> {
        self.sync.error()
    }

    pub fn records(&self) -> &[EmployeeRecord] {
        self.sync.records()
    }

    // ========== Edit session ==========

    pub fn edit_mode(&self) -> EditMode {
        self.edit.mode()
    }

    pub fn draft(&self) -> Option<&EmployeeDraft> {
        self.edit.draft()
    }

    pub fn open_for_create(&mut self) {
        tracing::debug!("Opening editor for a new employee");
        self.edit.open_for_create();
    }

    pub fn open_for_edit(&mut self, record: &EmployeeRecord) {
        tracing::debug!(name = %record.name, "Opening editor");
        self.edit.open_for_edit(record);
    }

    pub fn update_draft_field(
        &mut self,
        field: DraftField,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.edit.update_draft_field(field, value)
    }

    /// Close the editor without saving
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        self.edit.cancel()
    }

    /// Close the editor and send exactly one upsert; returns its ticket
    pub fn save(&mut self) -> Result<u64, SessionError> {
        let pending = self.edit.save()?;
        Ok(self.mutations.save(pending, &mut self.dispatcher))
    }

    // ========== Delete confirmation ==========

    pub fn pending_target(&self) -> Option<&EmployeeKey> {
        self.delete.pending_target()
    }

    /// Ask for confirmation before deleting `record`
    pub fn request_delete(&mut self, record: &EmployeeRecord) -> Result<(), SessionError> {
        let scheme = self.key_scheme();
        let key = record
            .key(scheme)
            .ok_or(SessionError::MissingKey(scheme.field_name()))?;
        tracing::debug!(key = %key, "Delete requested");
        self.delete.request_delete(key);
        Ok(())
    }

    /// Send exactly one delete for the pending target; returns its ticket
    pub fn confirm(&mut self) -> Result<u64, SessionError> {
        let key = self.delete.confirm()?;
        Ok(self.mutations.remove(key, &mut self.dispatcher))
    }

    pub fn decline(&mut self) -> Result<(), SessionError> {
        self.delete.decline()?;
        tracing::debug!("Delete declined");
        Ok(())
    }

    // ========== Mutation notices ==========

    pub fn mutation_error(&self) -> Option<&ListError> {
        self.mutations.last_error()
    }

    pub fn is_mutating(&self) -> bool {
        self.mutations.in_flight() > 0
    }

    pub fn dismiss_error(&mut self) {
        self.mutations.dismiss_error();
    }

    /// Reopen the editor with the draft of the last rejected save
    pub fn reopen_rejected(&mut self) -> Result<(), SessionError> {
        let rejected = self
            .mutations
            .take_rejected()
            .ok_or(SessionError::NothingRejected)?;
        self.mutations.dismiss_error();
        self.edit.reopen(rejected.mode, rejected.draft);
        Ok(())
    }

    // ========== Event loop ==========

    /// Gateway calls whose completion has not been applied yet
    pub fn has_outstanding(&self) -> bool {
        self.dispatcher.outstanding() > 0
    }

    /// Apply one completion
    pub fn apply(&mut self, completion: Completion) {
        self.dispatcher.settled();
        match completion {
            Completion::Fetch { seq, result } => {
                self.sync
                    .complete(seq, result.map_err(|e| ListError::fetch(&e)));
            }
            Completion::Mutation { ticket, result } => {
                if let Some(Resolution { resync: true, .. }) =
                    self.mutations.complete(ticket, result)
                {
                    self.refresh();
                }
            }
        }
    }

    /// Wait for the next completion without applying it
    ///
    /// Returns `None` immediately when nothing is outstanding.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        if !self.has_outstanding() {
            return None;
        }
        self.completions.recv().await
    }

    /// Wait for one completion and apply it; `false` when nothing is outstanding
    pub async fn pump(&mut self) -> bool {
        match self.next_completion().await {
            Some(completion) => {
                self.apply(completion);
                true
            }
            None => false,
        }
    }

    /// Apply completions until nothing is outstanding, resyncs included
    pub async fn settle(&mut self) {
        while self.pump().await {}
    }

    /// Current state for rendering
    pub fn snapshot(&self) -> ListView {
        ListView {
            loading: self.loading(),
            error: self.error().cloned(),
            records: self.records().to_vec(),
            sort_field: self.params.sort_field(),
            sort_direction: self.params.sort_direction(),
            filter_text: self.params.filter_text().to_string(),
            page_index: self.params.page_index(),
            page_size: self.params.page_size(),
            edit_mode: self.edit.mode(),
            draft: self.edit.draft().cloned(),
            pending_delete: self.delete.pending_target().cloned(),
            mutating: self.is_mutating(),
            mutation_error: self.mutations.last_error().cloned(),
            can_reopen_rejected: self.mutations.rejected().is_some(),
        }
    }
}
