//! Color scheme for the TUI.

use ratatui::style::{Color, Modifier, Style};

use crate::notify::NoticeLevel;
use crate::view::RowStyleClass;

/// Style palette. All widgets take their styles from here.
pub struct Styles;

impl Styles {
    pub fn default() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn header() -> Style {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    }

    pub fn tab_active() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn tab_inactive() -> Style {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    }

    pub fn table_header() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    /// Column the cursor is on (the one `s` sorts).
    pub fn table_header_focused() -> Style {
        Self::table_header().add_modifier(Modifier::REVERSED)
    }

    pub fn selected() -> Style {
        Style::default().fg(Color::Black).bg(Color::White)
    }

    pub fn dim() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn critical() -> Style {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    }

    pub fn warning() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn active() -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn accent() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn filter_input() -> Style {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    }

    pub fn help() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn help_key() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn section_header() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn popup_border() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn field_label() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn field_focused() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn field_error() -> Style {
        Style::default().fg(Color::Red)
    }

    pub fn notice(level: NoticeLevel) -> Style {
        match level {
            NoticeLevel::Success => Style::default().fg(Color::Black).bg(Color::Green),
            NoticeLevel::Info => Style::default().fg(Color::Black).bg(Color::Cyan),
            NoticeLevel::Error => Style::default().fg(Color::White).bg(Color::Red),
        }
    }

    /// Maps a view-model style class to a ratatui style.
    pub fn from_class(class: RowStyleClass) -> Style {
        match class {
            RowStyleClass::Normal => Self::default(),
            RowStyleClass::Warning => Self::warning(),
            RowStyleClass::Critical => Self::critical(),
            RowStyleClass::Active => Self::active(),
            RowStyleClass::Dimmed => Self::dim(),
            RowStyleClass::Accent => Self::accent(),
        }
    }
}
