//! Delete confirmation gate
//!
//! IDLE while nothing is pending, PENDING while a key waits for the user's
//! answer. The dialog is visible exactly when a target is pending.

use crate::error::SessionError;
use shared::EmployeeKey;

#[derive(Debug, Clone, Default)]
pub struct DeleteConfirmation {
    pending: Option<EmployeeKey>,
}

impl DeleteConfirmation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_target(&self) -> Option<&EmployeeKey> {
        self.pending.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.pending.is_some()
    }

    /// Propose `key` for deletion; a second request replaces the first
    pub fn request_delete(&mut self, key: EmployeeKey) {
        if let Some(previous) = self.pending.replace(key) {
            tracing::debug!(previous = %previous, "Pending delete replaced");
        }
    }

    /// Accept; returns the key to delete
    pub fn confirm(&mut self) -> Result<EmployeeKey, SessionError> {
        self.pending.take().ok_or(SessionError::NothingPending)
    }

    /// Reject; nothing is deleted
    pub fn decline(&mut self) -> Result<(), SessionError> {
        self.pending
            .take()
            .map(|_| ())
            .ok_or(SessionError::NothingPending)
    }
}
