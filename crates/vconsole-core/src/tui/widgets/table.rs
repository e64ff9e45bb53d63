//! Record table with a pagination footer.
//! Thin TUI wrapper over [`crate::view::TableViewModel`].

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, TableState};

use crate::table::RecordId;
use crate::tui::navigable::TableCursor;
use crate::tui::style::Styles;
use crate::view::TableViewModel;

pub fn render_table(
    frame: &mut Frame,
    area: Rect,
    vm: &TableViewModel<RecordId>,
    cursor: &TableCursor,
    loading: bool,
) {
    let chunks = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).split(area);

    let headers: Vec<Span> = vm
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let style = if i == cursor.column {
                Styles::table_header_focused()
            } else {
                Styles::table_header()
            };
            Span::styled(h.clone(), style)
        })
        .collect();
    let header = Row::new(headers).style(Styles::table_header()).height(1);

    let rows: Vec<Row> = vm
        .rows
        .iter()
        .map(|vr| {
            let cells = vr.cells.iter().map(|c| match c.style {
                Some(s) => Span::styled(c.text.clone(), Styles::from_class(s)),
                None => Span::raw(c.text.clone()),
            });
            Row::new(cells).style(Styles::from_class(vr.style)).height(1)
        })
        .collect();

    let mut constraints: Vec<Constraint> = vm.widths.iter().map(|&w| Constraint::Length(w)).collect();
    constraints.push(Constraint::Fill(1));

    let title = match (loading, vm.filter.is_empty()) {
        (true, _) => format!(" {} (loading…) ", vm.title),
        (false, true) => format!(" {} ", vm.title),
        (false, false) => format!(" {} [/{}] ", vm.title, vm.filter),
    };

    if vm.rows.is_empty() {
        let message = if loading {
            "Loading…"
        } else if vm.page.total == 0 {
            "No records"
        } else {
            "No records match the filter"
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .style(Styles::default());
        let table = Table::new(Vec::<Row>::new(), constraints).header(header);
        let inner = block.inner(chunks[0]);
        frame.render_widget(block, chunks[0]);
        let split = Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).split(inner);
        frame.render_widget(table, split[0]);
        frame.render_widget(Paragraph::new(message).style(Styles::dim()), split[1]);
    } else {
        let table = Table::new(rows, constraints)
            .header(header)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .style(Styles::default()),
            )
            .column_spacing(2)
            .row_highlight_style(Styles::selected());
        let mut table_state = TableState::default().with_selected(Some(cursor.selected));
        frame.render_stateful_widget(table, chunks[0], &mut table_state);
    }

    let arrows = |enabled: bool, text: &'static str| {
        if enabled {
            Span::styled(text, Styles::help_key())
        } else {
            Span::styled(text, Styles::dim())
        }
    };
    let footer = Line::from(vec![
        arrows(vm.page.can_previous, " « [ "),
        Span::styled(vm.page.summary(), Styles::help()),
        arrows(vm.page.can_next, " ] » "),
    ]);
    frame.render_widget(Paragraph::new(footer), chunks[1]);
}
