//! Delete Workflow
//!
//! Two-phase guard around the destructive delete:
//!
//! ```text
//! Idle --request--> Pending --confirm--> Deleting --finish--> Idle
//!                      |
//!                      +----cancel-----> Idle
//! ```
//!
//! The target name is snapshotted at request time so the confirmation text
//! never depends on a document that a later reload may have removed.

use super::store::CollectionStore;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeleteState {
    #[default]
    Idle,
    /// Waiting for the user to confirm or cancel.
    Pending { target_id: String, target_name: String },
    /// Confirmed; the delete request is in flight.
    Deleting { target_id: String, target_name: String },
}

/// The document a confirmed delete applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTarget {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteWorkflow {
    state: DeleteState,
}

impl DeleteWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DeleteState {
        &self.state
    }

    /// Whether the confirmation surface should be shown.
    pub fn is_visible(&self) -> bool {
        matches!(self.state, DeleteState::Pending { .. })
    }

    pub fn is_deleting(&self) -> bool {
        matches!(self.state, DeleteState::Deleting { .. })
    }

    /// Open the confirmation for `id`. Refused (returns `false`) while another
    /// delete is in flight.
    pub fn request(&mut self, id: &str, store: &CollectionStore) -> bool {
        if self.is_deleting() {
            tracing::warn!(id, "delete requested while another delete is in flight");
            return false;
        }
        let target_name = store.find(id).map(|d| d.file_name.clone()).unwrap_or_default();
        self.state = DeleteState::Pending {
            target_id: id.to_string(),
            target_name,
        };
        true
    }

    /// Confirm the pending request. Returns the target to delete, or `None`
    /// (and resets to idle) when nothing was pending.
    pub fn confirm(&mut self) -> Option<DeleteTarget> {
        match std::mem::take(&mut self.state) {
            DeleteState::Pending { target_id, target_name } if !target_id.is_empty() => {
                self.state = DeleteState::Deleting {
                    target_id: target_id.clone(),
                    target_name: target_name.clone(),
                };
                Some(DeleteTarget {
                    id: target_id,
                    name: target_name,
                })
            }
            deleting @ DeleteState::Deleting { .. } => {
                self.state = deleting;
                None
            }
            _ => None,
        }
    }

    /// The in-flight delete completed (successfully or not).
    pub fn finish(&mut self) {
        if self.is_deleting() {
            self.state = DeleteState::Idle;
        }
    }

    /// Close the confirmation without deleting. Does not abort an in-flight
    /// delete.
    pub fn cancel(&mut self) {
        if !self.is_deleting() {
            self.state = DeleteState::Idle;
        }
    }

    /// Confirmation prompt for the current target.
    pub fn message(&self) -> String {
        let name = match &self.state {
            DeleteState::Pending { target_name, .. } | DeleteState::Deleting { target_name, .. } => {
                target_name.as_str()
            }
            DeleteState::Idle => "",
        };
        confirm_message(name)
    }
}

pub fn confirm_message(name: &str) -> String {
    if name.is_empty() {
        "Are you sure you want to delete this file?".to_string()
    } else {
        format!("Are you sure you want to permanently delete \"{name}\"?")
    }
}
