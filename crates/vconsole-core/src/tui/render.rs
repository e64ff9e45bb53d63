//! Main rendering logic for TUI.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::pages::UserAction;
use crate::view::{templates_table, users_table};

use super::state::{AppState, InputMode, Tab};
use super::widgets::{
    render_confirmation, render_header, render_help, render_prompt, render_quit_confirm,
    render_status_dialog, render_table, render_template_form, render_toasts, render_user_form,
};

/// Main render function.
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();
    state.clamp_cursors();

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Min(5),    // Table + footer
    ])
    .split(area);

    render_header(frame, chunks[0], state);

    match state.current_tab {
        Tab::Templates => {
            let vm = templates_table(state.templates.table(), state.templates.templates());
            render_table(
                frame,
                chunks[1],
                &vm,
                &state.template_cursor,
                state.templates.is_loading(),
            );
        }
        Tab::Users => {
            let vm = users_table(state.users.table(), state.users.users());
            render_table(
                frame,
                chunks[1],
                &vm,
                &state.user_cursor,
                state.users.is_loading(),
            );
        }
    }

    // Modals of the current tab.
    match state.current_tab {
        Tab::Templates if state.templates.form().is_open() => {
            render_template_form(frame, area, state)
        }
        Tab::Users => {
            let users = &state.users;
            if let Some(user) = users.delete_confirm().target() {
                render_confirmation(
                    frame,
                    area,
                    "Delete User",
                    &format!("Delete {} ({})?", user.username, user.email),
                    users.is_busy(UserAction::Delete),
                );
            } else if let Some(user) = users.invite_confirm().target() {
                render_confirmation(
                    frame,
                    area,
                    "Re-Invite User",
                    &format!("Send a new invitation email to {}?", user.email),
                    users.is_busy(UserAction::Invite),
                );
            } else if users.status_form().is_open() {
                render_status_dialog(
                    frame,
                    area,
                    users.status_form(),
                    users.is_busy(UserAction::UpdateStatus),
                );
            } else if users.form().is_open() {
                render_user_form(frame, area, state);
            }
        }
        _ => {}
    }

    if state.input_mode == InputMode::GoToPage {
        render_prompt(
            frame,
            area,
            "Go to page",
            &state.input,
            "1-based page number",
            state.input_error.as_deref(),
        );
    }

    if state.show_help {
        render_help(frame, area, state.current_tab, &mut state.help_scroll);
    }
    if state.show_quit_confirm {
        render_quit_confirm(frame, area, state.any_modal_open());
    }

    render_toasts(frame, area, &state.toasts.active());
}
