//! Quit confirmation popup widget.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::popup_area;

/// Renders a centered quit confirmation popup. Unsaved form input is lost on
/// quit, so the question names it when a modal is open.
pub fn render_quit_confirm(frame: &mut Frame, area: Rect, modal_open: bool) {
    let popup = popup_area(area, 50, (40, 60), (7, 9));
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Exit vconsole ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let question = if modal_open {
        "Quit and discard the open form?"
    } else {
        "Are you sure you want to quit?"
    };
    let content = vec![
        Line::from(Span::styled(question, Style::default().fg(Color::White))),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::styled(" or ", Style::default().fg(Color::DarkGray)),
            Span::styled("q", Style::default().fg(Color::Yellow)),
            Span::styled(" → quit", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" or ", Style::default().fg(Color::DarkGray)),
            Span::styled("n", Style::default().fg(Color::Yellow)),
            Span::styled(" → cancel", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    frame.render_widget(
        Paragraph::new(content)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::White)),
        inner,
    );
}
