//! User create/edit popup.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::forms::{FormFields, ModalMode, UserField, UserForm, UserIdCheck};
use crate::tui::state::AppState;
use crate::tui::style::Styles;
use crate::pages::UserAction;

use super::{field_lines, hint_line, popup_area};

pub fn render_user_form(frame: &mut Frame, area: Rect, state: &AppState) {
    let form = state.users.form();
    let popup = popup_area(area, 60, (50, 90), (18, 24));
    frame.render_widget(Clear, popup);

    let title = match form.mode() {
        ModalMode::Edit(_) => " Edit User ",
        _ => " Add User ",
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Styles::popup_border());
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

    let mut lines = Vec::new();
    for (i, &field) in UserForm::FIELDS.iter().enumerate() {
        let focused = i == state.form_focus;
        let value = match field {
            UserField::Role => {
                let role = form
                    .role
                    .and_then(|id| state.users.roles().iter().find(|r| r.id == id))
                    .map(|r| r.label())
                    .unwrap_or_else(|| "(none)".to_string());
                format!("◂ {role} ▸")
            }
            _ => form.text(field).unwrap_or_default().to_string(),
        };
        lines.extend(field_lines(form, field, focused, value));
        if field == UserField::UserId {
            if let Some(line) = user_id_status(form) {
                lines.push(line);
            }
        }
    }
    if form.mode().editing().is_some() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<14}", "Status"), Styles::field_label()),
            Span::styled(form.status().to_string(), Styles::dim()),
        ]));
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[0]);

    let hints = if state.users.is_busy(UserAction::Submit) {
        hint_line(&[("…", "saving")])
    } else if UserForm::FIELDS.get(state.form_focus) == Some(&UserField::Role) {
        hint_line(&[("←/→", "role"), ("Ctrl-S", "save"), ("Esc", "cancel")])
    } else {
        hint_line(&[("Tab", "next"), ("Ctrl-S", "save"), ("Esc", "cancel")])
    };
    frame.render_widget(Paragraph::new(hints), chunks[1]);
}

fn user_id_status(form: &UserForm) -> Option<Line<'static>> {
    let (text, style) = match form.user_id_check() {
        UserIdCheck::Unchecked => {
            if form.mode().editing().is_some() || !form.user_id.trim().is_empty() {
                return None;
            }
            ("left blank, a username is generated".to_string(), Styles::dim())
        }
        UserIdCheck::Checking(_) => ("checking availability…".to_string(), Styles::dim()),
        UserIdCheck::Available(id) => (format!("{id} is available"), Styles::active()),
        UserIdCheck::Taken(id) => (format!("{id} is already taken"), Styles::field_error()),
    };
    Some(Line::from(Span::styled(format!("{:16}{text}", ""), style)))
}
