//! Status change dialog.

use crate::models::{User, UserStatus};
use crate::table::RecordId;

/// Target user and the status about to be applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusForm {
    target: Option<(RecordId, String)>,
    pub status: UserStatus,
}

impl StatusForm {
    /// Opens for `user`. Revoked users cannot be changed.
    pub fn open(&mut self, user: &User) -> bool {
        let current = user.status();
        if !current.can_change() {
            return false;
        }
        *self = Self {
            target: Some((user.id, user.username.clone())),
            status: current.initial_choice(),
        };
        true
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<RecordId> {
        self.target.as_ref().map(|(id, _)| *id)
    }

    pub fn target_name(&self) -> Option<&str> {
        self.target.as_ref().map(|(_, name)| name.as_str())
    }

    pub fn next(&mut self) {
        self.status = self.status.next_choice();
    }

    pub fn prev(&mut self) {
        self.status = self.status.prev_choice();
    }
}
