//! Go-to-page input popup.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tui::style::Styles;

use super::{hint_line, popup_area};

/// Renders a centered one-line prompt with an optional error below.
pub fn render_prompt(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    input: &str,
    help: &str,
    error: Option<&str>,
) {
    let popup = popup_area(area, 40, (36, 60), (7, 9));
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Styles::popup_border());
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Input: ", Styles::help_key()),
            Span::styled(
                format!("{input}█"),
                Styles::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(help.to_string(), Styles::dim())),
    ];
    if let Some(err) = error {
        lines.push(Line::from(Span::styled(
            format!("Error: {err}"),
            Styles::field_error(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(hint_line(&[("Enter", "go"), ("Esc", "cancel")]));

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true }),
        inner,
    );
}
