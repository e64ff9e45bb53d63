//! Toast stack in the top-right corner.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::{Clear, Paragraph, Wrap};

use crate::notify::Notice;
use crate::tui::style::Styles;

const TOAST_WIDTH: u16 = 48;

/// Renders `toasts` newest on top, below the header line.
pub fn render_toasts(frame: &mut Frame, area: Rect, toasts: &[Notice]) {
    let width = TOAST_WIDTH.min(area.width);
    let x = area.x + area.width.saturating_sub(width + 1);
    let mut y = area.y + 1;
    for notice in toasts.iter().rev() {
        let text_width = width.saturating_sub(2).max(1) as usize;
        let height = (notice.message.chars().count().div_ceil(text_width) as u16).max(1);
        if y + height > area.y + area.height {
            break;
        }
        let rect = Rect::new(x, y, width, height);
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(format!(" {} ", notice.message))
                .style(Styles::notice(notice.level))
                .wrap(Wrap { trim: true }),
            rect,
        );
        y += height + 1;
    }
}
