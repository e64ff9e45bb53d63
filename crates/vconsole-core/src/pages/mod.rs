//! Resource pages: a record table, its modals, and the backend requests that
//! feed them.
//!
//! Pages never perform I/O. Every operation that needs the backend returns
//! [`Outgoing`] requests; the host executes them (see
//! [`ApiRequest::dispatch`]) and hands each result back through the page's
//! `complete`. Collections are updated optimistically from mutation replies
//! instead of being re-fetched.

mod templates;
mod users;

pub use templates::{TemplateAction, TemplatesPage};
pub use users::{UserAction, UsersPage};

use std::fmt;

use tracing::{debug, warn};

use crate::api::{ApiError, ApiReply, ApiRequest};
use crate::notify::{Notice, Notifier};
use crate::table::{PageSize, Record, RecordTable};

/// Result of executing an [`ApiRequest`].
pub type Completion = Result<ApiReply, ApiError>;

/// Handle of one issued request, returned with its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket<A> {
    id: u64,
    pub action: A,
    /// Modal epoch at issue time, for requests tied to an open modal.
    epoch: Option<u64>,
}

/// A request a page wants executed.
#[derive(Debug, Clone, PartialEq)]
pub struct Outgoing<A> {
    pub ticket: Ticket<A>,
    pub request: ApiRequest,
}

/// In-flight bookkeeping for one page.
///
/// An action may have at most one request outstanding; while it does, its
/// trigger is disabled. Closing a modal advances the epoch so that replies
/// to requests issued from it are discarded.
#[derive(Debug)]
pub struct RequestTracker<A> {
    next_id: u64,
    in_flight: Vec<Ticket<A>>,
    modal_epoch: u64,
}

impl<A> Default for RequestTracker<A> {
    fn default() -> Self {
        Self {
            next_id: 0,
            in_flight: Vec::new(),
            modal_epoch: 0,
        }
    }
}

impl<A: Copy + Eq + fmt::Debug> RequestTracker<A> {
    /// `None` while `action` already has a request outstanding.
    pub fn begin(&mut self, action: A, request: ApiRequest) -> Option<Outgoing<A>> {
        self.issue(action, request, None)
    }

    /// Like [`begin`](Self::begin), for requests whose reply only matters
    /// while the current modal stays open.
    pub fn begin_modal(&mut self, action: A, request: ApiRequest) -> Option<Outgoing<A>> {
        self.issue(action, request, Some(self.modal_epoch))
    }

    fn issue(&mut self, action: A, request: ApiRequest, epoch: Option<u64>) -> Option<Outgoing<A>> {
        if self.is_busy(action) {
            debug!(?action, "request already in flight");
            return None;
        }
        self.next_id += 1;
        let ticket = Ticket {
            id: self.next_id,
            action,
            epoch,
        };
        self.in_flight.push(ticket);
        Some(Outgoing { ticket, request })
    }

    pub fn is_busy(&self, action: A) -> bool {
        self.in_flight.iter().any(|t| t.action == action)
    }

    pub fn close_modal(&mut self) {
        self.modal_epoch += 1;
    }

    /// Clears the in-flight mark. Returns `false` when the reply must be
    /// discarded: unknown ticket, or its modal has closed since.
    pub fn finish(&mut self, ticket: &Ticket<A>) -> bool {
        let Some(pos) = self.in_flight.iter().position(|t| t.id == ticket.id) else {
            return false;
        };
        self.in_flight.remove(pos);
        match ticket.epoch {
            Some(epoch) if epoch != self.modal_epoch => {
                debug!(action = ?ticket.action, "discarding reply for closed modal");
                false
            }
            _ => true,
        }
    }
}

/// Table navigation requested by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCommand {
    Filter(String),
    /// Toggle sort on the column at this index.
    Sort(usize),
    FirstPage,
    PreviousPage,
    NextPage,
    LastPage,
    GoToPage(usize),
    PageSize(PageSize),
}

/// Applies `command`; `false` when nothing could change (boundary reached,
/// unknown column).
pub fn apply_table_command<R: Record>(
    table: &mut RecordTable<R>,
    records: &[R],
    command: TableCommand,
) -> bool {
    match command {
        TableCommand::Filter(text) => {
            table.set_global_filter(text);
            true
        }
        TableCommand::Sort(index) => match table.columns().get(index).map(|c| c.key) {
            Some(key) => table.toggle_sort(key),
            None => false,
        },
        TableCommand::FirstPage => table.first_page(records),
        TableCommand::PreviousPage => table.previous_page(records),
        TableCommand::NextPage => table.next_page(records),
        TableCommand::LastPage => table.last_page(records),
        TableCommand::GoToPage(index) => {
            table.go_to_page(index, records);
            true
        }
        TableCommand::PageSize(size) => {
            table.set_page_size(size, records);
            true
        }
    }
}

/// Turns a failed request into an error notice. Authentication and shape
/// failures get their fixed wording; everything else is prefixed with
/// `context`.
pub(crate) fn report(notifier: &dyn Notifier, context: &str, error: &ApiError) {
    warn!(%error, context, "request failed");
    let message = match error {
        ApiError::NotAuthenticated | ApiError::Malformed(_) => error.user_message(),
        _ => format!("{context}: {}", error.user_message()),
    };
    notifier.notify(Notice::error(message));
}

/// Runs `pending` on the calling thread. `execute` performs one request and
/// returns the follow-ups it triggered, which are run in turn until none
/// remain.
pub fn run_to_completion<T>(pending: Vec<T>, mut execute: impl FnMut(T) -> Vec<T>) {
    let mut queue = pending;
    while let Some(next) = queue.pop() {
        queue.extend(execute(next));
    }
}

/// Reply variant that does not belong to the request.
pub(crate) fn unexpected(request: &str, reply: &ApiReply) -> ApiError {
    ApiError::Malformed(format!("unexpected reply to {request}: {reply:?}"))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex, PoisonError};

    use crate::notify::{Notice, NoticeLevel, Notifier};

    /// Notifier that keeps everything it is given.
    #[derive(Debug, Default)]
    pub struct Recorder {
        notices: Mutex<Vec<Notice>>,
    }

    impl Recorder {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn messages(&self) -> Vec<(NoticeLevel, String)> {
            self.notices
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .map(|n| (n.level, n.message.clone()))
                .collect()
        }

        pub fn last(&self) -> Option<(NoticeLevel, String)> {
            self.messages().pop()
        }
    }

    impl Notifier for Recorder {
        fn notify(&self, notice: Notice) {
            self.notices
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Action {
        Load,
        Save,
    }

    #[test]
    fn duplicate_action_is_refused_until_finished() {
        let mut tracker = RequestTracker::default();
        let first = tracker.begin(Action::Save, ApiRequest::ListUsers).unwrap();
        assert!(tracker.begin(Action::Save, ApiRequest::ListUsers).is_none());
        assert!(tracker.begin(Action::Load, ApiRequest::ListRoles).is_some());
        assert!(tracker.is_busy(Action::Save));

        assert!(tracker.finish(&first.ticket));
        assert!(!tracker.is_busy(Action::Save));
        assert!(!tracker.finish(&first.ticket));
        assert!(tracker.begin(Action::Save, ApiRequest::ListUsers).is_some());
    }

    #[test]
    fn follow_ups_run_until_none_remain() {
        let mut seen = Vec::new();
        run_to_completion(vec![3], |n| {
            seen.push(n);
            if n > 0 { vec![n - 1] } else { Vec::new() }
        });
        assert_eq!(seen, vec![3, 2, 1, 0]);
    }

    #[test]
    fn closing_the_modal_discards_its_replies() {
        let mut tracker = RequestTracker::default();
        let modal = tracker.begin_modal(Action::Save, ApiRequest::ListUsers).unwrap();
        let page = tracker.begin(Action::Load, ApiRequest::ListUsers).unwrap();
        tracker.close_modal();
        assert!(!tracker.finish(&modal.ticket));
        assert!(!tracker.is_busy(Action::Save));
        assert!(tracker.finish(&page.ticket));
        assert!(!tracker.is_busy(Action::Load));
    }
}
