//! Help popup with context-sensitive key and column descriptions.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::models::UserStatus;
use crate::tui::state::Tab;
use crate::tui::style::Styles;
use crate::view::status_style;

/// Renders the help popup centered on screen with scroll support.
pub fn render_help(frame: &mut Frame, area: Rect, tab: Tab, scroll: &mut usize) {
    let popup_width = (area.width * 60 / 100).clamp(40, 80).min(area.width);
    let popup_height = (area.height * 80 / 100).clamp(10, 30).min(area.height);
    let popup_x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let (title, content) = get_help_content(tab);
    let content_lines = content.len();

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

    let visible_height = chunks[0].height as usize;
    let max_scroll = content_lines.saturating_sub(visible_height);
    if *scroll > max_scroll {
        *scroll = max_scroll;
    }

    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .scroll((*scroll as u16, 0))
        .style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, chunks[0]);

    let scroll_info = if max_scroll > 0 {
        format!(" [{}/{}]", *scroll + 1, max_scroll + 1)
    } else {
        String::new()
    };
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("Press ", Styles::help()),
        Span::styled("?", Styles::help_key()),
        Span::styled(" or ", Styles::help()),
        Span::styled("Esc", Styles::help_key()),
        Span::styled(" to close, ", Styles::help()),
        Span::styled("↑↓", Styles::help_key()),
        Span::styled(" to scroll", Styles::help()),
        Span::styled(scroll_info, Styles::help()),
    ]));
    frame.render_widget(footer, chunks[1]);
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(title, Styles::section_header()))
}

fn key(keys: &'static str, description: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {keys:<14}"), Styles::help_key()),
        Span::raw(description),
    ])
}

fn common_keys(lines: &mut Vec<Line<'static>>) {
    lines.push(section("Navigation"));
    lines.push(key("1 / 2", "Templates / Users tab"));
    lines.push(key("Tab / BackTab", "next / previous tab"));
    lines.push(key("j k ↑ ↓", "select row"));
    lines.push(key("h l ← →", "move column cursor"));
    lines.push(key("Home / End", "first / last row of the page"));
    lines.push(Line::from(""));
    lines.push(section("Table"));
    lines.push(key("s", "sort by column under cursor (asc → desc → off)"));
    lines.push(key("/", "filter all columns (Esc clears, Enter keeps)"));
    lines.push(key("[ ]", "previous / next page"));
    lines.push(key("{ }", "first / last page"));
    lines.push(key("+ -", "page size (5, 10, 20, 30, 40, 50)"));
    lines.push(key("g", "go to page"));
    lines.push(key("r", "reload from the backend"));
    lines.push(Line::from(""));
    lines.push(section("Forms"));
    lines.push(key("Tab / ↓", "next field"));
    lines.push(key("BackTab / ↑", "previous field"));
    lines.push(key("Ctrl-S", "submit"));
    lines.push(key("Esc", "cancel"));
}

/// Returns help title and content lines for the given tab.
fn get_help_content(tab: Tab) -> (&'static str, Vec<Line<'static>>) {
    let mut lines = Vec::new();
    match tab {
        Tab::Templates => {
            lines.push(section("Proof templates"));
            lines.push(key("n", "new template"));
            lines.push(key("e / Enter", "edit selected template"));
            lines.push(Line::from(""));
            common_keys(&mut lines);
            lines.push(key("Enter on Roles", "open role list, Space toggles"));
            lines.push(key("Enter on Schemas", "add a schema row"));
            lines.push(key("← → on Schemas", "select schema row"));
            lines.push(key("Del on Schemas", "remove selected row"));
            lines.push(Line::from(""));
            lines.push(section("Columns"));
            lines.push(key("Template ID", "identifier used by verifiers"));
            lines.push(key("Version", "semantic version, e.g. 1.0.0"));
            lines.push(key("Roles", "verifier roles allowed to use it"));
            ("Templates Help", lines)
        }
        Tab::Users => {
            lines.push(section("Verifier users"));
            lines.push(key("n", "new user"));
            lines.push(key("e / Enter", "edit selected user"));
            lines.push(key("d", "delete selected user"));
            lines.push(key("i", "send invitation again"));
            lines.push(key("t", "change status"));
            lines.push(Line::from(""));
            common_keys(&mut lines);
            lines.push(key("← → on Role", "cycle roles"));
            lines.push(Line::from(""));
            lines.push(section("Status"));
            for (status, meaning) in [
                (UserStatus::Created, "account created, not invited"),
                (UserStatus::Invited, "invitation sent"),
                (UserStatus::Active, "invitation accepted"),
                (UserStatus::Suspended, "temporarily blocked"),
                (UserStatus::Revoked, "final, cannot change"),
            ] {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {:<14}", status.label()),
                        Styles::from_class(status_style(status)),
                    ),
                    Span::raw(meaning),
                ]));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Re-Invite is offered while a user is CREATED, INVITED or ACTIVE.",
                Styles::dim(),
            )));
            ("Users Help", lines)
        }
    }
}
