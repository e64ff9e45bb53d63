//! TUI widgets.

mod dialogs;
mod header;
mod help;
mod prompt;
mod quit_confirm;
mod table;
mod template_form;
mod toasts;
mod user_form;

pub use dialogs::{render_confirmation, render_status_dialog};
pub use header::render_header;
pub use help::render_help;
pub use prompt::render_prompt;
pub use quit_confirm::render_quit_confirm;
pub use table::render_table;
pub use template_form::render_template_form;
pub use toasts::render_toasts;
pub use user_form::render_user_form;

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};

use crate::forms::FormFields;

use super::style::Styles;

/// Centered popup: `percent` of the width clamped to `width`, height clamped
/// to `height`.
pub(crate) fn popup_area(area: Rect, percent: u16, width: (u16, u16), height: (u16, u16)) -> Rect {
    let popup_width = (area.width * percent / 100)
        .clamp(width.0, width.1)
        .min(area.width);
    let popup_height = area.height.clamp(height.0, height.1).min(area.height);
    let popup_x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}

/// Label, value and (when present) validation message of one text field.
pub(crate) fn field_lines<F: FormFields>(
    form: &F,
    field: F::Field,
    focused: bool,
    value: String,
) -> Vec<Line<'static>> {
    let marker = if focused { "› " } else { "  " };
    let value_style = if focused {
        Styles::field_focused()
    } else {
        Styles::default()
    };
    let cursor = if focused && form.text(field).is_some() {
        "█"
    } else {
        ""
    };
    let mut lines = vec![Line::from(vec![
        Span::styled(marker, Styles::help_key()),
        Span::styled(format!("{:<14}", F::label(field)), Styles::field_label()),
        Span::styled(format!("{value}{cursor}"), value_style),
    ])];
    if let Some(message) = form.error(field) {
        lines.push(Line::from(Span::styled(
            format!("{:16}{message}", ""),
            Styles::field_error(),
        )));
    }
    lines
}

/// Key hints for popup footers: `[("Ctrl-S", "save"), ("Esc", "cancel")]`.
pub(crate) fn hint_line(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (i, (key, action)) in hints.iter().enumerate() {
        let key = if i == 0 {
            key.to_string()
        } else {
            format!("   {key}")
        };
        spans.push(Span::styled(key, Styles::help_key()));
        spans.push(Span::styled(format!(" → {action}"), Styles::help()));
    }
    Line::from(spans)
}
