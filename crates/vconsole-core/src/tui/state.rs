//! Application state for the TUI.

use std::sync::Arc;

use crate::api::VerifierApi;
use crate::notify::{Notifier, ToastQueue};
use crate::pages::{Outgoing, TableCommand, TemplateAction, TemplatesPage, UserAction, UsersPage};
use crate::session::Session;
use crate::table::{PageSize, RecordId};

use super::event::Reply;
use super::navigable::{NavigableTable, TableCursor};

/// Available tabs in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Templates,
    Users,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Templates, Tab::Users]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tab::Templates => "Templates",
            Tab::Users => "Users",
        }
    }

    pub fn next(&self) -> Tab {
        match self {
            Tab::Templates => Tab::Users,
            Tab::Users => Tab::Templates,
        }
    }

    pub fn prev(&self) -> Tab {
        self.next()
    }
}

/// Line-input prompts shown in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Global filter, applied on every keystroke.
    Filter,
    /// 1-based page number.
    GoToPage,
}

/// Request issued by one of the pages, tagged for routing its reply back.
#[derive(Debug, Clone, PartialEq)]
pub enum Routed {
    Templates(Outgoing<TemplateAction>),
    Users(Outgoing<UserAction>),
}

impl Routed {
    pub fn request_name(&self) -> &'static str {
        match self {
            Routed::Templates(out) => out.request.name(),
            Routed::Users(out) => out.request.name(),
        }
    }

    /// Performs the request and tags the result for [`AppState::apply_reply`].
    pub fn execute(self, api: &dyn VerifierApi) -> Reply {
        match self {
            Routed::Templates(out) => Reply::Templates(out.ticket, out.request.dispatch(api)),
            Routed::Users(out) => Reply::Users(out.ticket, out.request.dispatch(api)),
        }
    }
}

pub(crate) fn templates_out(out: impl IntoIterator<Item = Outgoing<TemplateAction>>) -> Vec<Routed> {
    out.into_iter().map(Routed::Templates).collect()
}

pub(crate) fn users_out(out: impl IntoIterator<Item = Outgoing<UserAction>>) -> Vec<Routed> {
    out.into_iter().map(Routed::Users).collect()
}

/// Main application state.
pub struct AppState {
    pub current_tab: Tab,
    pub templates: TemplatesPage,
    pub users: UsersPage,
    pub template_cursor: TableCursor,
    pub user_cursor: TableCursor,

    pub input_mode: InputMode,
    /// Text typed into the active prompt.
    pub input: String,
    pub input_error: Option<String>,

    /// Focused field index of the open form.
    pub form_focus: usize,
    /// Focused field index of the schema sub-editor.
    pub schema_focus: usize,

    pub show_help: bool,
    pub help_scroll: usize,
    pub show_quit_confirm: bool,

    pub toasts: Arc<ToastQueue>,
    pub principal: Option<String>,
    pub backend: String,
}

impl AppState {
    pub fn new(session: Arc<Session>, page_size: PageSize, backend: impl Into<String>) -> Self {
        let toasts = Arc::new(ToastQueue::default());
        let notifier: Arc<dyn Notifier> = toasts.clone();
        Self {
            current_tab: Tab::default(),
            templates: TemplatesPage::new(session.clone(), notifier.clone(), page_size),
            users: UsersPage::new(session.clone(), notifier, page_size),
            template_cursor: TableCursor::default(),
            user_cursor: TableCursor::default(),
            input_mode: InputMode::default(),
            input: String::new(),
            input_error: None,
            form_focus: 0,
            schema_focus: 0,
            show_help: false,
            help_scroll: 0,
            show_quit_confirm: false,
            toasts,
            principal: session.principal().map(str::to_string),
            backend: backend.into(),
        }
    }

    /// Switches tab and loads its page on first visit.
    pub fn switch_tab(&mut self, tab: Tab) -> Vec<Routed> {
        self.current_tab = tab;
        self.input_mode = InputMode::Normal;
        self.load_current()
    }

    pub fn load_current(&mut self) -> Vec<Routed> {
        match self.current_tab {
            Tab::Templates => templates_out(self.templates.load()),
            Tab::Users => users_out(self.users.load()),
        }
    }

    pub fn reload_current(&mut self) -> Vec<Routed> {
        match self.current_tab {
            Tab::Templates => templates_out(self.templates.reload()),
            Tab::Users => users_out(self.users.reload()),
        }
    }

    /// Applies a backend reply; returns follow-up requests.
    pub fn apply_reply(&mut self, reply: Reply) -> Vec<Routed> {
        let follow_up = match reply {
            Reply::Templates(ticket, result) => templates_out(self.templates.complete(ticket, result)),
            Reply::Users(ticket, result) => users_out(self.users.complete(ticket, result)),
        };
        self.clamp_cursors();
        follow_up
    }

    /// Whether a modal of the current tab is open.
    pub fn any_modal_open(&self) -> bool {
        match self.current_tab {
            Tab::Templates => self.templates.form().is_open(),
            Tab::Users => {
                self.users.form().is_open()
                    || self.users.status_form().is_open()
                    || self.users.delete_confirm().is_open()
                    || self.users.invite_confirm().is_open()
            }
        }
    }

    pub fn cursor(&self) -> &TableCursor {
        match self.current_tab {
            Tab::Templates => &self.template_cursor,
            Tab::Users => &self.user_cursor,
        }
    }

    pub fn cursor_mut(&mut self) -> &mut TableCursor {
        match self.current_tab {
            Tab::Templates => &mut self.template_cursor,
            Tab::Users => &mut self.user_cursor,
        }
    }

    /// Id of the record under the row cursor.
    pub fn selected_id(&self) -> Option<RecordId> {
        let index = self.cursor().selected;
        match self.current_tab {
            Tab::Templates => self.templates.view().rows.get(index).map(|t| t.id),
            Tab::Users => self.users.view().rows.get(index).map(|u| u.id),
        }
    }

    /// Runs a table command on the current tab and re-clamps the cursor.
    pub fn table_command(&mut self, command: TableCommand) -> bool {
        let changed = match self.current_tab {
            Tab::Templates => self.templates.table_command(command),
            Tab::Users => self.users.table_command(command),
        };
        self.clamp_cursors();
        changed
    }

    pub fn page_size(&self) -> PageSize {
        match self.current_tab {
            Tab::Templates => self.templates.table().state().page_size,
            Tab::Users => self.users.table().state().page_size,
        }
    }

    pub fn filter(&self) -> &str {
        match self.current_tab {
            Tab::Templates => self.templates.table().filter(),
            Tab::Users => self.users.table().filter(),
        }
    }

    pub fn clamp_cursors(&mut self) {
        let rows = self.templates.view().rows.len();
        let columns = self.templates.table().columns().len();
        self.template_cursor.clamp(rows, columns);
        let rows = self.users.view().rows.len();
        let columns = self.users.table().columns().len();
        self.user_cursor.clamp(rows, columns);
    }

    pub fn is_loading(&self) -> bool {
        self.templates.is_loading() || self.users.is_loading()
    }

    /// Whether a mutation is in flight on either page.
    pub fn is_saving(&self) -> bool {
        self.templates.is_submitting()
            || [
                UserAction::Submit,
                UserAction::Delete,
                UserAction::Invite,
                UserAction::UpdateStatus,
            ]
            .into_iter()
            .any(|action| self.users.is_busy(action))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{loaded_state, settle};
    use super::*;
    use crate::api::ApiError;
    use crate::api::mock::MockApi;

    #[test]
    fn tabs_load_once() {
        let mut state = loaded_state(&MockApi::seeded());
        assert_eq!(state.templates.templates().len(), 7);
        assert_eq!(state.users.users().len(), 6);
        assert!(state.switch_tab(Tab::Users).is_empty());
        assert_eq!(state.reload_current().len(), 2);
    }

    #[test]
    fn selection_follows_visible_page() {
        let mut state = loaded_state(&MockApi::seeded());
        state.cursor_mut().end();
        state.clamp_cursors();
        assert_eq!(state.cursor().selected, 4);
        assert_eq!(state.selected_id(), Some(state.templates.templates()[4].id));

        state.table_command(TableCommand::NextPage);
        assert_eq!(state.cursor().selected, 1);
        assert_eq!(state.selected_id(), Some(state.templates.templates()[6].id));
    }

    #[test]
    fn modal_state_is_per_tab() {
        let mut state = loaded_state(&MockApi::seeded());
        state.templates.open_create();
        assert!(state.any_modal_open());
        state.current_tab = Tab::Users;
        assert!(!state.any_modal_open());
    }

    #[test]
    fn failed_reload_leaves_a_bell_when_enabled() {
        let api = MockApi::seeded();
        let mut state = loaded_state(&api);
        state.toasts.set_bell(true);
        assert!(!state.toasts.take_bell());

        api.fail_next(ApiError::Transport("connection refused".into()));
        let routed = state.reload_current();
        settle(&mut state, &api, routed);
        assert!(state.toasts.take_bell());
        assert!(!state.toasts.take_bell());
    }
}
