//! Header widget showing tabs, principal and request activity.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::state::{AppState, InputMode, Tab};
use crate::tui::style::Styles;

/// Renders the header bar.
pub fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::horizontal([
        Constraint::Length(11), // Title
        Constraint::Min(24),    // Tabs
        Constraint::Length(12), // Activity
        Constraint::Length(36), // Principal / filter
    ])
    .split(area);

    frame.render_widget(
        Paragraph::new(" vconsole ").style(Styles::header()),
        chunks[0],
    );

    let tabs: Vec<Span> = Tab::all()
        .iter()
        .enumerate()
        .flat_map(|(i, tab)| {
            let style = if *tab == state.current_tab {
                Styles::tab_active()
            } else {
                Styles::tab_inactive()
            };
            vec![
                Span::styled(format!(" {}:", i + 1), Styles::tab_inactive()),
                Span::styled(format!("{} ", tab.name()), style),
            ]
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Line::from(tabs)).style(Styles::header()),
        chunks[1],
    );

    let activity = if state.is_loading() {
        " loading… "
    } else if state.is_saving() {
        " saving… "
    } else {
        ""
    };
    frame.render_widget(
        Paragraph::new(activity).style(Styles::header()),
        chunks[2],
    );

    let (right, style) = match state.input_mode {
        InputMode::Filter => (format!("Filter: {}█", state.input), Styles::filter_input()),
        InputMode::GoToPage => (format!("Page: {}█", state.input), Styles::filter_input()),
        InputMode::Normal if !state.filter().is_empty() => {
            (format!("/{}", state.filter()), Styles::header())
        }
        InputMode::Normal => {
            let who = state.principal.as_deref().unwrap_or("anonymous");
            (format!("{who} @ {}", state.backend), Styles::header())
        }
    };
    frame.render_widget(Paragraph::new(right).style(style), chunks[3]);
}
