//! Create/edit dialog state machine
//!
//! ```text
//! CLOSED --open_for_create--> CREATING --save/cancel--> CLOSED
//! CLOSED --open_for_edit----> EDITING  --save/cancel--> CLOSED
//! ```
//!
//! Opening while already open restarts the session with a fresh draft.

use crate::error::SessionError;
use serde::Serialize;
use shared::{EmployeeRecord, EmployeeUpsert};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    #[default]
    Closed,
    Creating,
    Editing,
}

/// Editable draft fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    UserName,
    Email,
    Phone,
}

impl DraftField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::UserName => "user_name",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

impl FromStr for DraftField {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "user_name" => Ok(Self::UserName),
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            other => Err(SessionError::UnknownField(other.to_string())),
        }
    }
}

/// Field buffer behind the dialog
///
/// `id` is carried over from the edited record and is not user-editable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EmployeeDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub user_name: String,
    pub email: String,
    pub phone: String,
}

impl EmployeeDraft {
    pub fn from_record(record: &EmployeeRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            user_name: record.user_name.clone(),
            email: record.email.clone().unwrap_or_default(),
            phone: record.phone.clone().unwrap_or_default(),
        }
    }

    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Name => &self.name,
            DraftField::UserName => &self.user_name,
            DraftField::Email => &self.email,
            DraftField::Phone => &self.phone,
        }
    }

    fn set(&mut self, field: DraftField, value: String) {
        match field {
            DraftField::Name => self.name = value,
            DraftField::UserName => self.user_name = value,
            DraftField::Email => self.email = value,
            DraftField::Phone => self.phone = value,
        }
    }

    /// Upsert payload; blank optional fields are sent as null
    pub fn to_upsert(&self) -> EmployeeUpsert {
        let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());
        EmployeeUpsert {
            id: self.id.clone(),
            name: self.name.clone(),
            user_name: self.user_name.clone(),
            email: optional(self.email.as_str()),
            phone: optional(self.phone.as_str()),
        }
    }
}

/// What a closed-by-save session hands to the mutation orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingSave {
    pub mode: EditMode,
    pub draft: EmployeeDraft,
}

#[derive(Debug, Clone, Default)]
pub struct EditSession {
    mode: EditMode,
    draft: EmployeeDraft,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != EditMode::Closed
    }

    /// Draft, only while the dialog is open
    pub fn draft(&self) -> Option<&EmployeeDraft> {
        self.is_open().then_some(&self.draft)
    }

    pub fn open_for_create(&mut self) {
        self.reopen(EditMode::Creating, EmployeeDraft::default());
    }

    pub fn open_for_edit(&mut self, record: &EmployeeRecord) {
        self.reopen(EditMode::Editing, EmployeeDraft::from_record(record));
    }

    /// Open in `mode` with a given draft (used to retry a rejected save)
    pub fn reopen(&mut self, mode: EditMode, draft: EmployeeDraft) {
        if self.is_open() {
            tracing::debug!(from = ?self.mode, to = ?mode, "Restarting edit session");
        }
        self.mode = mode;
        self.draft = draft;
    }

    pub fn update_draft_field(
        &mut self,
        field: DraftField,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        if !self.is_open() {
            return Err(SessionError::NotOpen);
        }
        let value = value.into();
        tracing::debug!(field = field.as_str(), "Draft field updated");
        self.draft.set(field, value);
        Ok(())
    }

    /// Close without saving
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        if !self.is_open() {
            return Err(SessionError::NotOpen);
        }
        self.close();
        Ok(())
    }

    /// Close and hand back the draft to persist
    ///
    /// The session is already CLOSED when this returns, before any mutation
    /// is issued.
    pub fn save(&mut self) -> Result<PendingSave, SessionError> {
        if !self.is_open() {
            return Err(SessionError::NotOpen);
        }
        let mode = self.mode;
        let draft = std::mem::take(&mut self.draft);
        self.mode = EditMode::Closed;
        Ok(PendingSave { mode, draft })
    }

    fn close(&mut self) {
        self.mode = EditMode::Closed;
        self.draft = EmployeeDraft::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> EmployeeRecord {
        EmployeeRecord {
            id: Some("5".into()),
            name: "Ann".into(),
            user_name: "ann1".into(),
            email: Some("a@x.com".into()),
            phone: Some("555".into()),
        }
    }

    #[test]
    fn test_open_for_edit_copies_record() {
        let mut session = EditSession::new();
        session.open_for_edit(&ann());

        assert_eq!(session.mode(), EditMode::Editing);
        let draft = session.draft().unwrap();
        assert_eq!(draft.id.as_deref(), Some("5"));
        assert_eq!(draft.name, "Ann");
        assert_eq!(draft.user_name, "ann1");
        assert_eq!(draft.email, "a@x.com");
        assert_eq!(draft.phone, "555");
    }

    #[test]
    fn test_open_for_create_clears_previous_draft() {
        let mut session = EditSession::new();
        session.open_for_edit(&ann());
        session.update_draft_field(DraftField::Phone, "999").unwrap();

        session.open_for_create();
        assert_eq!(session.mode(), EditMode::Creating);
        assert_eq!(session.draft(), Some(&EmployeeDraft::default()));
    }

    #[test]
    fn test_update_requires_open_session() {
        let mut session = EditSession::new();
        assert_eq!(
            session.update_draft_field(DraftField::Name, "x"),
            Err(SessionError::NotOpen)
        );
        assert!(session.draft().is_none());
    }

    #[test]
    fn test_cancel_discards_draft() {
        let mut session = EditSession::new();
        session.open_for_create();
        session.update_draft_field(DraftField::Name, "Zed").unwrap();
        session.cancel().unwrap();

        assert_eq!(session.mode(), EditMode::Closed);
        assert!(session.draft().is_none());
        assert_eq!(session.cancel(), Err(SessionError::NotOpen));
    }

    #[test]
    fn test_save_closes_and_returns_draft() {
        let mut session = EditSession::new();
        session.open_for_edit(&ann());
        session.update_draft_field(DraftField::Phone, "999").unwrap();

        let pending = session.save().unwrap();
        assert_eq!(session.mode(), EditMode::Closed);
        assert_eq!(pending.mode, EditMode::Editing);
        assert_eq!(pending.draft.phone, "999");
        assert_eq!(session.save(), Err(SessionError::NotOpen));
    }

    #[test]
    fn test_to_upsert_nulls_blank_optionals() {
        let draft = EmployeeDraft {
            id: None,
            name: "Bob".into(),
            user_name: "bob".into(),
            email: String::new(),
            phone: "1".into(),
        };
        let upsert = draft.to_upsert();
        assert!(upsert.email.is_none());
        assert_eq!(upsert.phone.as_deref(), Some("1"));
    }

    #[test]
    fn test_draft_field_parse() {
        assert_eq!("phone".parse::<DraftField>(), Ok(DraftField::Phone));
        assert_eq!(
            "salary".parse::<DraftField>(),
            Err(SessionError::UnknownField("salary".into()))
        );
    }
}
