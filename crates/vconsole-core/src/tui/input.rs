//! Input handling and keybindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::forms::{FormFields, SchemaField, SchemaRowForm, TemplateField, TemplateForm, UserField, UserForm};
use crate::pages::TableCommand;

use super::navigable::NavigableTable;
use super::state::{AppState, InputMode, Routed, Tab};

/// Result of handling a key event.
#[derive(Debug, PartialEq)]
pub enum KeyAction {
    /// No action, continue.
    None,
    /// Quit the application.
    Quit,
    /// Execute these backend requests.
    Send(Vec<Routed>),
}

impl KeyAction {
    fn send(routed: Vec<Routed>) -> Self {
        if routed.is_empty() {
            KeyAction::None
        } else {
            KeyAction::Send(routed)
        }
    }

    fn send_one(routed: Option<Routed>) -> Self {
        Self::send(routed.into_iter().collect())
    }
}

fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

/// Handles key input and updates state.
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> KeyAction {
    if is_ctrl(&key, 'c') {
        return KeyAction::Quit;
    }
    if state.show_quit_confirm {
        return handle_quit_confirm(state, key);
    }
    if state.show_help {
        return handle_help(state, key);
    }
    match state.input_mode {
        InputMode::Filter => return handle_filter_mode(state, key),
        InputMode::GoToPage => return handle_go_to_page_mode(state, key),
        InputMode::Normal => {}
    }
    match state.current_tab {
        Tab::Templates if state.templates.form().is_open() => handle_template_form(state, key),
        Tab::Users if state.users.delete_confirm().is_open() => handle_delete_confirm(state, key),
        Tab::Users if state.users.invite_confirm().is_open() => handle_invite_confirm(state, key),
        Tab::Users if state.users.status_form().is_open() => handle_status_dialog(state, key),
        Tab::Users if state.users.form().is_open() => handle_user_form(state, key),
        _ => handle_normal_mode(state, key),
    }
}

fn handle_quit_confirm(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('Q') => {
            state.show_quit_confirm = false;
            KeyAction::Quit
        }
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
            state.show_quit_confirm = false;
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

fn handle_help(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
            state.show_help = false;
            state.help_scroll = 0;
        }
        KeyCode::Up | KeyCode::Char('k') => state.help_scroll = state.help_scroll.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => state.help_scroll = state.help_scroll.saturating_add(1),
        KeyCode::PageUp => state.help_scroll = state.help_scroll.saturating_sub(10),
        KeyCode::PageDown => state.help_scroll = state.help_scroll.saturating_add(10),
        KeyCode::Home => state.help_scroll = 0,
        _ => {}
    }
    KeyAction::None
}

/// Handles keys in normal mode.
fn handle_normal_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            state.show_quit_confirm = true;
            KeyAction::None
        }
        KeyCode::Char('?') => {
            state.show_help = true;
            state.help_scroll = 0;
            KeyAction::None
        }

        // Tabs
        KeyCode::Tab => KeyAction::send(state.switch_tab(state.current_tab.next())),
        KeyCode::BackTab => KeyAction::send(state.switch_tab(state.current_tab.prev())),
        KeyCode::Char('1') => KeyAction::send(state.switch_tab(Tab::Templates)),
        KeyCode::Char('2') => KeyAction::send(state.switch_tab(Tab::Users)),

        // Cursor
        KeyCode::Up | KeyCode::Char('k') => {
            state.cursor_mut().select_up();
            KeyAction::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.cursor_mut().select_down();
            state.clamp_cursors();
            KeyAction::None
        }
        KeyCode::Home => {
            state.cursor_mut().home();
            KeyAction::None
        }
        KeyCode::End => {
            state.cursor_mut().end();
            state.clamp_cursors();
            KeyAction::None
        }
        KeyCode::Left | KeyCode::Char('h') => {
            state.cursor_mut().column_left();
            KeyAction::None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            state.cursor_mut().column_right();
            state.clamp_cursors();
            KeyAction::None
        }

        // Table
        KeyCode::Char('s') | KeyCode::Char('S') => {
            let column = state.cursor().column;
            state.table_command(TableCommand::Sort(column));
            KeyAction::None
        }
        KeyCode::Char('/') => {
            state.input_mode = InputMode::Filter;
            state.input = state.filter().to_string();
            KeyAction::None
        }
        KeyCode::Char('[') | KeyCode::PageUp => {
            state.table_command(TableCommand::PreviousPage);
            KeyAction::None
        }
        KeyCode::Char(']') | KeyCode::PageDown => {
            state.table_command(TableCommand::NextPage);
            KeyAction::None
        }
        KeyCode::Char('{') => {
            state.table_command(TableCommand::FirstPage);
            KeyAction::None
        }
        KeyCode::Char('}') => {
            state.table_command(TableCommand::LastPage);
            KeyAction::None
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let size = state.page_size().larger();
            state.table_command(TableCommand::PageSize(size));
            KeyAction::None
        }
        KeyCode::Char('-') => {
            let size = state.page_size().smaller();
            state.table_command(TableCommand::PageSize(size));
            KeyAction::None
        }
        KeyCode::Char('g') | KeyCode::Char('G') => {
            state.input_mode = InputMode::GoToPage;
            state.input.clear();
            state.input_error = None;
            KeyAction::None
        }
        KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::send(state.reload_current()),

        // Records
        KeyCode::Char('n') => {
            open_create(state);
            KeyAction::None
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            open_edit(state);
            KeyAction::None
        }
        KeyCode::Char('d') if state.current_tab == Tab::Users => {
            if let Some(id) = state.selected_id() {
                state.users.ask_delete(id);
            }
            KeyAction::None
        }
        KeyCode::Char('i') if state.current_tab == Tab::Users => {
            if let Some(id) = state.selected_id() {
                state.users.ask_invite(id);
            }
            KeyAction::None
        }
        KeyCode::Char('t') if state.current_tab == Tab::Users => {
            if let Some(id) = state.selected_id() {
                state.users.open_status(id);
            }
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

fn open_create(state: &mut AppState) {
    state.form_focus = 0;
    state.schema_focus = 0;
    match state.current_tab {
        Tab::Templates => state.templates.open_create(),
        Tab::Users => state.users.open_create(),
    }
}

fn open_edit(state: &mut AppState) {
    let Some(id) = state.selected_id() else {
        return;
    };
    state.form_focus = 0;
    state.schema_focus = 0;
    match state.current_tab {
        Tab::Templates => {
            state.templates.open_edit(id);
        }
        Tab::Users => {
            state.users.open_edit(id);
        }
    }
}

/// Handles keys in filter mode. The filter applies on every keystroke.
fn handle_filter_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc => {
            state.input_mode = InputMode::Normal;
            state.input.clear();
            state.table_command(TableCommand::Filter(String::new()));
        }
        KeyCode::Enter => {
            state.input_mode = InputMode::Normal;
            state.input.clear();
        }
        KeyCode::Backspace => {
            state.input.pop();
            let text = state.input.clone();
            state.table_command(TableCommand::Filter(text));
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.input.push(c);
            let text = state.input.clone();
            state.table_command(TableCommand::Filter(text));
        }
        _ => {}
    }
    KeyAction::None
}

fn handle_go_to_page_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc => {
            state.input_mode = InputMode::Normal;
            state.input.clear();
            state.input_error = None;
        }
        KeyCode::Enter => {
            let page_count = match state.current_tab {
                Tab::Templates => state.templates.view().page_count,
                Tab::Users => state.users.view().page_count,
            };
            match state.input.trim().parse::<usize>() {
                Ok(page) if (1..=page_count).contains(&page) => {
                    state.table_command(TableCommand::GoToPage(page - 1));
                    state.input_mode = InputMode::Normal;
                    state.input.clear();
                    state.input_error = None;
                }
                _ => {
                    state.input_error =
                        Some(format!("Enter a page number between 1 and {page_count}"));
                }
            }
        }
        KeyCode::Backspace => {
            state.input.pop();
            state.input_error = None;
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            state.input.push(c);
            state.input_error = None;
        }
        _ => {}
    }
    KeyAction::None
}

/// Wrapping focus move over `len` fields.
fn move_focus(focus: &mut usize, len: usize, forward: bool) {
    if len == 0 {
        return;
    }
    *focus = if forward {
        (*focus + 1) % len
    } else {
        (*focus + len - 1) % len
    };
}

/// Applies a typing key to the focused text field. `true` when the text
/// changed.
fn edit_text<F: FormFields>(form: &mut F, field: F::Field, key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c)
            if !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT) =>
        {
            match form.text_mut(field) {
                Some(text) => {
                    text.push(c);
                    true
                }
                None => false,
            }
        }
        KeyCode::Backspace => form.text_mut(field).is_some_and(|text| text.pop().is_some()),
        _ => false,
    }
}

fn template_field(focus: usize) -> TemplateField {
    TemplateForm::FIELDS
        .get(focus)
        .copied()
        .unwrap_or(TemplateField::Name)
}

fn handle_template_form(state: &mut AppState, key: KeyEvent) -> KeyAction {
    if state.templates.form().schema_editor().is_some() {
        return handle_schema_editor(state, key);
    }
    if state.templates.form().roles.is_open() {
        handle_role_dropdown(state, key);
        return KeyAction::None;
    }
    if is_ctrl(&key, 's') {
        return KeyAction::send_one(state.templates.submit().map(Routed::Templates));
    }

    let field = template_field(state.form_focus);
    match key.code {
        KeyCode::Esc => state.templates.close_form(),
        KeyCode::Tab | KeyCode::Down => {
            move_focus(&mut state.form_focus, TemplateForm::FIELDS.len(), true)
        }
        KeyCode::BackTab | KeyCode::Up => {
            move_focus(&mut state.form_focus, TemplateForm::FIELDS.len(), false)
        }
        KeyCode::Enter => match field {
            TemplateField::Roles => state.templates.form_mut().roles.open_dropdown(),
            TemplateField::Schemas => {
                state.schema_focus = 0;
                state.templates.form_mut().open_schema_editor();
            }
            _ => move_focus(&mut state.form_focus, TemplateForm::FIELDS.len(), true),
        },
        KeyCode::Left if field == TemplateField::Schemas => {
            state.templates.form_mut().schema_cursor_up()
        }
        KeyCode::Right if field == TemplateField::Schemas => {
            state.templates.form_mut().schema_cursor_down()
        }
        KeyCode::Delete if field == TemplateField::Schemas => {
            state.templates.form_mut().delete_schema();
        }
        _ => {
            edit_text(state.templates.form_mut(), field, &key);
        }
    }
    KeyAction::None
}

fn handle_role_dropdown(state: &mut AppState, key: KeyEvent) {
    let roles = state.templates.roles().to_vec();
    let selection = &mut state.templates.form_mut().roles;
    match key.code {
        KeyCode::Esc | KeyCode::Enter => selection.dismiss(),
        KeyCode::Up | KeyCode::Char('k') => selection.cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => selection.cursor_down(roles.len()),
        KeyCode::Char(' ') => selection.toggle_at_cursor(&roles),
        _ => {}
    }
}

fn handle_schema_editor(state: &mut AppState, key: KeyEvent) -> KeyAction {
    let fields = SchemaRowForm::FIELDS;
    let field = fields
        .get(state.schema_focus)
        .copied()
        .unwrap_or(SchemaField::Name);
    let form = state.templates.form_mut();

    if is_ctrl(&key, 's') {
        if let Err(errors) = form.save_schema_row() {
            tracing::debug!(%errors, "schema row rejected");
        }
        return KeyAction::None;
    }
    let Some(editor) = form.schema_editor_mut() else {
        return KeyAction::None;
    };
    match key.code {
        KeyCode::Esc => form.cancel_schema_editor(),
        KeyCode::Tab | KeyCode::Down => move_focus(&mut state.schema_focus, fields.len(), true),
        KeyCode::BackTab | KeyCode::Up => move_focus(&mut state.schema_focus, fields.len(), false),
        KeyCode::Enter if field == SchemaField::Attributes => editor.add_attribute(),
        KeyCode::Enter => move_focus(&mut state.schema_focus, fields.len(), true),
        KeyCode::Delete if field == SchemaField::Attributes => {
            let last = editor.attributes().len().saturating_sub(1);
            editor.remove_attribute(last);
        }
        _ => {
            edit_text(editor, field, &key);
        }
    }
    KeyAction::None
}

fn user_field(focus: usize) -> UserField {
    UserForm::FIELDS
        .get(focus)
        .copied()
        .unwrap_or(UserField::FirstName)
}

fn handle_user_form(state: &mut AppState, key: KeyEvent) -> KeyAction {
    if is_ctrl(&key, 's') {
        return KeyAction::send_one(state.users.submit().map(Routed::Users));
    }
    let field = user_field(state.form_focus);
    match key.code {
        KeyCode::Esc => state.users.close_form(),
        KeyCode::Tab | KeyCode::Down | KeyCode::Enter => {
            move_focus(&mut state.form_focus, UserForm::FIELDS.len(), true)
        }
        KeyCode::BackTab | KeyCode::Up => {
            move_focus(&mut state.form_focus, UserForm::FIELDS.len(), false)
        }
        KeyCode::Left if field == UserField::Role => state.users.cycle_role(false),
        KeyCode::Right | KeyCode::Char(' ') if field == UserField::Role => {
            state.users.cycle_role(true)
        }
        _ => {
            let changed = edit_text(state.users.form_mut(), field, &key);
            if changed && field == UserField::UserId {
                return KeyAction::send_one(state.users.user_id_edited().map(Routed::Users));
            }
        }
    }
    KeyAction::None
}

fn handle_delete_confirm(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
            KeyAction::send_one(state.users.confirm_delete().map(Routed::Users))
        }
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
            state.users.cancel_delete();
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

fn handle_invite_confirm(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
            KeyAction::send_one(state.users.confirm_invite().map(Routed::Users))
        }
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
            state.users.cancel_invite();
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

fn handle_status_dialog(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Enter => return KeyAction::send_one(state.users.submit_status().map(Routed::Users)),
        KeyCode::Esc => state.users.close_status(),
        KeyCode::Left | KeyCode::Up | KeyCode::Char('k') => state.users.status_form_mut().prev(),
        KeyCode::Right | KeyCode::Down | KeyCode::Char('j') => {
            state.users.status_form_mut().next()
        }
        _ => {}
    }
    KeyAction::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiRequest;
    use crate::api::mock::MockApi;
    use crate::tui::state::testing::{loaded_state, settle};
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_text(state: &mut AppState, text: &str) -> Vec<Routed> {
        let mut routed = Vec::new();
        for c in text.chars() {
            if let KeyAction::Send(out) = handle_key(state, key(KeyCode::Char(c))) {
                routed.extend(out);
            }
        }
        routed
    }

    fn sent(action: KeyAction) -> Vec<Routed> {
        match action {
            KeyAction::Send(routed) => routed,
            other => panic!("expected requests, got {other:?}"),
        }
    }

    #[test]
    fn quit_requires_confirmation() {
        let mut state = loaded_state(&MockApi::seeded());

        assert_eq!(handle_key(&mut state, key(KeyCode::Char('q'))), KeyAction::None);
        assert!(state.show_quit_confirm);
        assert_eq!(handle_key(&mut state, key(KeyCode::Esc)), KeyAction::None);
        assert!(!state.show_quit_confirm);

        handle_key(&mut state, key(KeyCode::Char('q')));
        assert_eq!(handle_key(&mut state, key(KeyCode::Enter)), KeyAction::Quit);
        assert_eq!(handle_key(&mut state, ctrl('c')), KeyAction::Quit);
    }

    #[test]
    fn number_keys_switch_tabs() {
        let mut state = loaded_state(&MockApi::seeded());
        assert_eq!(handle_key(&mut state, key(KeyCode::Char('2'))), KeyAction::None);
        assert_eq!(state.current_tab, Tab::Users);
        handle_key(&mut state, key(KeyCode::Tab));
        assert_eq!(state.current_tab, Tab::Templates);
    }

    #[test]
    fn filter_applies_live_and_esc_clears() {
        let mut state = loaded_state(&MockApi::seeded());

        handle_key(&mut state, key(KeyCode::Char('/')));
        assert_eq!(state.input_mode, InputMode::Filter);
        type_text(&mut state, "kyc");
        assert_eq!(state.filter(), "kyc");
        assert_eq!(state.templates.view().filtered_count, 1);

        handle_key(&mut state, key(KeyCode::Esc));
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.filter(), "");

        handle_key(&mut state, key(KeyCode::Char('/')));
        type_text(&mut state, "age");
        handle_key(&mut state, key(KeyCode::Enter));
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.filter(), "age");
    }

    #[test]
    fn paging_keys_move_through_pages() {
        let mut state = loaded_state(&MockApi::seeded());
        handle_key(&mut state, key(KeyCode::Char(']')));
        assert_eq!(state.templates.view().page_index, 1);
        handle_key(&mut state, key(KeyCode::Char(']')));
        assert_eq!(state.templates.view().page_index, 1);
        handle_key(&mut state, key(KeyCode::Char('{')));
        assert_eq!(state.templates.view().page_index, 0);

        handle_key(&mut state, key(KeyCode::Char('+')));
        assert_eq!(state.templates.view().page_count, 1);
        assert_eq!(state.templates.view().rows.len(), 7);
    }

    #[test]
    fn go_to_page_validates_input() {
        let mut state = loaded_state(&MockApi::seeded());
        handle_key(&mut state, key(KeyCode::Char('g')));
        type_text(&mut state, "9");
        handle_key(&mut state, key(KeyCode::Enter));
        assert_eq!(state.input_mode, InputMode::GoToPage);
        assert_eq!(
            state.input_error.as_deref(),
            Some("Enter a page number between 1 and 2")
        );

        handle_key(&mut state, key(KeyCode::Backspace));
        type_text(&mut state, "2");
        handle_key(&mut state, key(KeyCode::Enter));
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.templates.view().page_index, 1);
    }

    #[test]
    fn sort_key_toggles_column_under_cursor() {
        let mut state = loaded_state(&MockApi::seeded());
        handle_key(&mut state, key(KeyCode::Char('l')));
        handle_key(&mut state, key(KeyCode::Char('s')));
        let first = state.templates.view().rows[0].name.clone();
        assert_eq!(first, "Address Proof");
        handle_key(&mut state, key(KeyCode::Char('s')));
        assert_eq!(state.templates.view().rows[0].name, "Student ID");
    }

    #[test]
    fn template_form_submits_from_keys() {
        let api = MockApi::seeded();
        let mut state = loaded_state(&api);

        handle_key(&mut state, key(KeyCode::Char('n')));
        assert!(state.templates.form().is_open());
        assert_eq!(handle_key(&mut state, ctrl('s')), KeyAction::None);
        assert_eq!(
            state.templates.form().errors().get("name"),
            Some("Template Name is required")
        );

        type_text(&mut state, "Travel Pass");
        handle_key(&mut state, key(KeyCode::Tab));
        type_text(&mut state, "travel-pass");
        handle_key(&mut state, key(KeyCode::Tab));
        handle_key(&mut state, key(KeyCode::Enter));
        assert!(state.templates.form().roles.is_open());
        handle_key(&mut state, key(KeyCode::Char('j')));
        handle_key(&mut state, key(KeyCode::Char(' ')));
        handle_key(&mut state, key(KeyCode::Esc));
        assert!(state.templates.form().is_open());
        assert_eq!(state.templates.form().roles.selected(), &[2]);

        handle_key(&mut state, key(KeyCode::Tab));
        type_text(&mut state, "1.0.0");
        handle_key(&mut state, key(KeyCode::Tab));
        type_text(&mut state, "Travel document check");

        let routed = sent(handle_key(&mut state, ctrl('s')));
        assert_eq!(routed.len(), 1);
        assert_eq!(routed[0].request_name(), "create_template");
        assert_eq!(handle_key(&mut state, ctrl('s')), KeyAction::None);

        settle(&mut state, &api, routed);
        assert!(!state.templates.form().is_open());
        assert_eq!(state.templates.templates().len(), 8);
    }

    #[test]
    fn schema_editor_appends_rows() {
        let mut state = loaded_state(&MockApi::seeded());
        handle_key(&mut state, key(KeyCode::Char('n')));
        state.form_focus = 5;
        handle_key(&mut state, key(KeyCode::Enter));
        assert!(state.templates.form().schema_editor().is_some());

        handle_key(&mut state, ctrl('s'));
        assert!(state.templates.form().schema_editor().is_some());

        type_text(&mut state, "Passport");
        handle_key(&mut state, key(KeyCode::Tab));
        type_text(&mut state, "https://schemas.example.org/passport.json");
        handle_key(&mut state, key(KeyCode::Tab));
        type_text(&mut state, "given_name");
        handle_key(&mut state, key(KeyCode::Enter));
        type_text(&mut state, "family_name");
        handle_key(&mut state, ctrl('s'));

        let form = state.templates.form();
        assert!(form.schema_editor().is_none());
        assert_eq!(form.schemas().len(), 1);
        assert_eq!(form.schemas()[0].names, vec!["given_name", "family_name"]);

        handle_key(&mut state, key(KeyCode::Delete));
        assert!(state.templates.form().schemas().is_empty());
    }

    #[test]
    fn user_id_typing_starts_availability_check() {
        let mut state = loaded_state(&MockApi::seeded());
        handle_key(&mut state, key(KeyCode::Char('2')));
        handle_key(&mut state, key(KeyCode::Char('n')));
        state.form_focus = 2;

        let routed = type_text(&mut state, "adam");
        assert_eq!(routed.len(), 1);
        match &routed[0] {
            Routed::Users(out) => {
                assert_eq!(out.request, ApiRequest::CheckUserId("adam".into()))
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn delete_asks_before_sending() {
        let api = MockApi::seeded();
        let mut state = loaded_state(&api);
        handle_key(&mut state, key(KeyCode::Char('2')));

        handle_key(&mut state, key(KeyCode::Char('d')));
        assert!(state.users.delete_confirm().is_open());
        assert_eq!(handle_key(&mut state, key(KeyCode::Char('x'))), KeyAction::None);

        let routed = sent(handle_key(&mut state, key(KeyCode::Char('y'))));
        assert_eq!(handle_key(&mut state, key(KeyCode::Char('y'))), KeyAction::None);
        settle(&mut state, &api, routed);
        assert!(!state.users.delete_confirm().is_open());
        assert_eq!(state.users.users().len(), 5);
    }

    #[test]
    fn status_dialog_cycles_and_submits() {
        let api = MockApi::seeded();
        let mut state = loaded_state(&api);
        handle_key(&mut state, key(KeyCode::Char('2')));

        handle_key(&mut state, key(KeyCode::Char('t')));
        assert!(state.users.status_form().is_open());
        let before = state.users.status_form().status;
        handle_key(&mut state, key(KeyCode::Right));
        let chosen = state.users.status_form().status;
        assert_ne!(before, chosen);

        let routed = sent(handle_key(&mut state, key(KeyCode::Enter)));
        settle(&mut state, &api, routed);
        assert!(!state.users.status_form().is_open());
        assert_eq!(state.users.users()[0].status(), chosen);
    }
}
