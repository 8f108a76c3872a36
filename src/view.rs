//! Client-side detail view with optimistic status updates.

use crate::types::{Bug, Status};

/// Local view over a single bug record.
///
/// A status change is applied to the local record immediately, before the
/// server answers. [`commit`](DetailView::commit) replaces the local record
/// with the server's authoritative copy; [`rollback`](DetailView::rollback)
/// restores the prior status when the request fails or the server answers
/// with a failure envelope.
#[derive(Debug, Clone)]
pub struct DetailView {
    bug: Bug,
    // Prior status while an edit is in flight.
    pending: Option<Status>,
}

impl DetailView {
    pub fn new(bug: Bug) -> Self {
        Self { bug, pending: None }
    }

    /// The record as currently shown, speculative status included.
    pub fn bug(&self) -> &Bug {
        &self.bug
    }

    /// True while a status change awaits server confirmation.
    pub fn has_pending_edit(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply a status change locally, remembering the prior value.
    ///
    /// Returns false when the record already has the status; no request
    /// needs to be sent in that case.
    pub fn begin_status_edit(&mut self, status: Status) -> bool {
        if self.bug.status == status {
            return false;
        }
        self.pending = Some(self.bug.status);
        self.bug.status = status;
        true
    }

    /// Adopt the server's record after a confirmed update.
    pub fn commit(&mut self, record: Bug) {
        self.bug = record;
        self.pending = None;
    }

    /// Restore the prior status after a failed update.
    pub fn rollback(&mut self) {
        if let Some(prior) = self.pending.take() {
            self.bug.status = prior;
        }
    }
}
