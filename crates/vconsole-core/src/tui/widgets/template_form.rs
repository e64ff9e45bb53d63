//! Template create/edit popup, its role dropdown and the schema row editor.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::forms::{FormFields, ModalMode, SchemaField, SchemaRowForm, TemplateField, TemplateForm};
use crate::models::Role;
use crate::tui::state::AppState;
use crate::tui::style::Styles;

use super::{field_lines, hint_line, popup_area};

pub fn render_template_form(frame: &mut Frame, area: Rect, state: &AppState) {
    let form = state.templates.form();
    let roles = state.templates.roles();
    let popup = popup_area(area, 70, (50, 100), (20, 32));
    frame.render_widget(Clear, popup);

    let title = match form.mode() {
        ModalMode::Edit(_) => " Edit Proof Template ",
        _ => " Create Proof Template ",
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Styles::popup_border());
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

    let focus = state.form_focus;
    let mut lines = Vec::new();
    for (i, &field) in TemplateForm::FIELDS.iter().enumerate() {
        let focused = i == focus;
        match field {
            TemplateField::Roles => {
                let names: Vec<String> = form
                    .roles
                    .selected()
                    .iter()
                    .map(|id| {
                        roles
                            .iter()
                            .find(|r| r.id == *id)
                            .map(Role::label)
                            .unwrap_or_else(|| format!("#{id}"))
                    })
                    .collect();
                let value = if names.is_empty() {
                    "(none, Enter to choose)".to_string()
                } else {
                    names.join(", ")
                };
                lines.extend(field_lines(form, field, focused, value));
            }
            TemplateField::Schemas => {
                let count = form.schemas().len();
                lines.extend(field_lines(
                    form,
                    field,
                    focused,
                    format!("{count} row(s), Enter to add"),
                ));
                for (row, schema) in form.schemas().iter().enumerate() {
                    let selected = focused && row == form.schema_cursor();
                    let style = if selected {
                        Styles::selected()
                    } else {
                        Styles::dim()
                    };
                    lines.push(Line::from(Span::styled(
                        format!(
                            "{:16}{}  {}  [{}]",
                            "",
                            schema.schema_name,
                            schema.schema,
                            schema.names.join(", ")
                        ),
                        style,
                    )));
                }
            }
            _ => {
                let value = form.text(field).unwrap_or_default().to_string();
                lines.extend(field_lines(form, field, focused, value));
            }
        }
    }

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }),
        chunks[0],
    );

    let hints = if state.templates.is_submitting() {
        hint_line(&[("…", "saving")])
    } else {
        match TemplateForm::FIELDS.get(focus) {
            Some(TemplateField::Schemas) => hint_line(&[
                ("Enter", "add row"),
                ("←/→", "select"),
                ("Del", "remove"),
                ("Ctrl-S", "save"),
                ("Esc", "cancel"),
            ]),
            Some(TemplateField::Roles) => hint_line(&[
                ("Enter", "choose roles"),
                ("Ctrl-S", "save"),
                ("Esc", "cancel"),
            ]),
            _ => hint_line(&[("Tab", "next"), ("Ctrl-S", "save"), ("Esc", "cancel")]),
        }
    };
    frame.render_widget(Paragraph::new(hints), chunks[1]);

    if form.roles.is_open() {
        render_role_dropdown(frame, popup, form, roles);
    }
    if let Some(editor) = form.schema_editor() {
        render_schema_editor(frame, area, editor, state.schema_focus);
    }
}

fn render_role_dropdown(frame: &mut Frame, popup: Rect, form: &TemplateForm, roles: &[Role]) {
    let height = (roles.len() as u16 + 3).min(popup.height);
    let width = 40.min(popup.width);
    let area = Rect::new(popup.x + 18.min(popup.width - width), popup.y + 4, width, height);
    let area = area.intersection(popup);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Roles ")
        .borders(Borders::ALL)
        .border_style(Styles::popup_border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = if roles.is_empty() {
        vec![Line::from(Span::styled("No roles loaded", Styles::dim()))]
    } else {
        roles
            .iter()
            .enumerate()
            .map(|(i, role)| {
                let mark = if form.roles.contains(role.id) { "[x]" } else { "[ ]" };
                let style = if i == form.roles.cursor() {
                    Styles::selected()
                } else {
                    Styles::default()
                };
                Line::from(Span::styled(format!("{mark} {}", role.label()), style))
            })
            .collect()
    };
    lines.push(hint_line(&[("Space", "toggle"), ("Esc", "close")]));
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_schema_editor(frame: &mut Frame, area: Rect, editor: &SchemaRowForm, focus: usize) {
    let popup = popup_area(area, 60, (44, 90), (11, 16));
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Add Schema ")
        .borders(Borders::ALL)
        .border_style(Styles::popup_border());
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

    let mut lines = Vec::new();
    for (i, &field) in SchemaRowForm::FIELDS.iter().enumerate() {
        let value = match field {
            SchemaField::Attributes => editor.attributes().join(", "),
            _ => editor.text(field).unwrap_or_default().to_string(),
        };
        lines.extend(field_lines(editor, field, i == focus, value));
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[0]);

    let hints = match SchemaRowForm::FIELDS.get(focus) {
        Some(SchemaField::Attributes) => hint_line(&[
            ("Enter", "new attribute"),
            ("Del", "drop last"),
            ("Ctrl-S", "add row"),
            ("Esc", "cancel"),
        ]),
        _ => hint_line(&[("Tab", "next"), ("Ctrl-S", "add row"), ("Esc", "cancel")]),
    };
    frame.render_widget(Paragraph::new(hints), chunks[1]);
}
