//! Confirmation and status-change dialogs of the users tab.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::forms::StatusForm;
use crate::models::UserStatus;
use crate::tui::style::Styles;

use super::{hint_line, popup_area};

/// Yes/no dialog. While `busy` the confirm key is shown disabled.
pub fn render_confirmation(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    question: &str,
    busy: bool,
) {
    let popup = popup_area(area, 50, (40, 70), (7, 9));
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Styles::popup_border());
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let footer = if busy {
        Line::from(Span::styled("Working…", Styles::dim()))
    } else {
        hint_line(&[("Enter/y", "confirm"), ("Esc/n", "cancel")])
    };
    let content = vec![
        Line::from(Span::styled(question.to_string(), Styles::default())),
        Line::from(""),
        footer,
    ];
    frame.render_widget(
        Paragraph::new(content)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}

pub fn render_status_dialog(frame: &mut Frame, area: Rect, form: &StatusForm, busy: bool) {
    let popup = popup_area(area, 50, (40, 60), (10, 12));
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Change Status ")
        .borders(Borders::ALL)
        .border_style(Styles::popup_border());
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("User: ", Styles::field_label()),
            Span::styled(
                form.target_name().unwrap_or_default().to_string(),
                Styles::default(),
            ),
        ]),
        Line::from(""),
    ];
    for choice in UserStatus::CHOICES {
        let (mark, style) = if choice == form.status {
            ("(•)", Styles::selected())
        } else {
            ("( )", Styles::default())
        };
        lines.push(Line::from(Span::styled(format!("  {mark} {choice}"), style)));
    }
    lines.push(Line::from(""));
    lines.push(if busy {
        Line::from(Span::styled("Saving…", Styles::dim()))
    } else {
        hint_line(&[("↑/↓", "choose"), ("Enter", "apply"), ("Esc", "cancel")])
    });
    frame.render_widget(Paragraph::new(lines), inner);
}
