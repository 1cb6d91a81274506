//! Dialog state machines: the create/edit editor and the delete confirmation

pub mod delete;
pub mod edit;

pub use delete::DeleteConfirmation;
pub use edit::{DraftField, EditMode, EditSession, EmployeeDraft, PendingSave};
