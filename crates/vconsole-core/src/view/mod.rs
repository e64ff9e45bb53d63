//! View models built from a [`RecordTable`] and its records.

pub mod common;

pub use common::{PageInfo, RowStyleClass, TableViewModel, ViewCell, ViewRow};

use crate::models::{Template, User, UserStatus};
use crate::table::{Record, RecordId, RecordTable, SortDirection};

/// Builds the visible page of `table` over `records`.
///
/// `style` classifies each row; `cell_style` may override single cells by
/// column key.
pub fn build_table<R: Record>(
    title: &str,
    table: &RecordTable<R>,
    records: &[R],
    style: impl Fn(&R) -> RowStyleClass,
    cell_style: impl Fn(&R, &str) -> Option<RowStyleClass>,
) -> TableViewModel<RecordId> {
    let view = table.view(records);
    let columns = table.columns();

    let headers: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| match view.sort {
            Some(sort) if sort.column == i => format!("{} {}", c.header, sort.direction.indicator()),
            _ => c.header.to_string(),
        })
        .collect();

    let rows: Vec<ViewRow<RecordId>> = view
        .rows
        .iter()
        .map(|record| ViewRow {
            id: record.id(),
            cells: columns
                .iter()
                .map(|c| ViewCell {
                    text: c.cell_text(record),
                    style: cell_style(record, c.key),
                })
                .collect(),
            style: style(record),
        })
        .collect();

    let widths = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.cells.get(i))
                .map(|c| c.text.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
                .min(u16::MAX as usize) as u16
        })
        .collect();

    TableViewModel {
        title: title.to_string(),
        headers,
        widths,
        rows,
        sort_column: view.sort.map(|s| s.column),
        sort_ascending: view
            .sort
            .is_none_or(|s| s.direction == SortDirection::Ascending),
        filter: table.filter().to_string(),
        page: PageInfo {
            index: view.page_index,
            count: view.page_count,
            size: view.page_size.get(),
            filtered: view.filtered_count,
            total: view.total_count,
            can_previous: view.can_previous_page(),
            can_next: view.can_next_page(),
        },
    }
}

pub fn templates_table(
    table: &RecordTable<Template>,
    templates: &[Template],
) -> TableViewModel<RecordId> {
    build_table(
        "Proof Templates",
        table,
        templates,
        |_| RowStyleClass::Normal,
        |_, _| None,
    )
}

pub fn status_style(status: UserStatus) -> RowStyleClass {
    match status {
        UserStatus::Created => RowStyleClass::Dimmed,
        UserStatus::Invited => RowStyleClass::Warning,
        UserStatus::Active => RowStyleClass::Active,
        UserStatus::Suspended => RowStyleClass::Warning,
        UserStatus::Revoked => RowStyleClass::Critical,
        UserStatus::Unknown(_) => RowStyleClass::Normal,
    }
}

pub fn users_table(table: &RecordTable<User>, users: &[User]) -> TableViewModel<RecordId> {
    build_table(
        "Verifier Users",
        table,
        users,
        |u| match u.status() {
            UserStatus::Revoked => RowStyleClass::Dimmed,
            _ => RowStyleClass::Normal,
        },
        |u, key| match key {
            "statusId" => Some(status_style(u.status())),
            "invite" if u.status().can_reinvite() => Some(RowStyleClass::Accent),
            _ => None,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::VerifierApi;
    use crate::api::mock::MockApi;
    use crate::table::{Column, PageSize};
    use serde_json::{Value, json};

    fn numbers(n: i64) -> Vec<Value> {
        (0..n).map(|i| json!({"id": i, "name": format!("item-{i:02}")})).collect()
    }

    #[test]
    fn builds_page_window_with_widths() {
        let records = numbers(12);
        let mut table = RecordTable::new(vec![
            Column::accessor("id", "ID"),
            Column::accessor("name", "Name"),
        ])
        .with_page_size(PageSize::Five);
        table.last_page(&records);

        let model = build_table("Items", &table, &records, |_| RowStyleClass::Normal, |_, _| None);
        assert_eq!(model.rows.len(), 2);
        assert_eq!(model.rows[0].id, 10);
        assert_eq!(model.widths, vec![2, 7]);
        assert_eq!(model.page.summary(), "Page 3 of 3 | 12 records | 5 per page");
        assert!(!model.page.can_next);
    }

    #[test]
    fn sorted_header_carries_indicator() {
        let records = numbers(3);
        let mut table = RecordTable::new(vec![Column::accessor("name", "Name")]);
        table.toggle_sort("name");
        table.toggle_sort("name");
        let model = build_table("Items", &table, &records, |_| RowStyleClass::Normal, |_, _| None);
        assert_eq!(model.headers, vec!["Name ▼".to_string()]);
        assert_eq!(model.sort_column, Some(0));
        assert!(!model.sort_ascending);
        assert_eq!(model.rows[0].cells[0].text, "item-02");
    }

    #[test]
    fn users_table_styles_status_cells() {
        let api = MockApi::seeded();
        let users = api.list_users().unwrap();
        let table = RecordTable::new(vec![
            Column::accessor("email", "Email"),
            Column::accessor("statusId", "Status"),
        ])
        .with_page_size(PageSize::Ten);
        let model = users_table(&table, &users);
        assert_eq!(model.rows.len(), 6);
        assert_eq!(model.rows[0].cells[1].style, Some(RowStyleClass::Active));
        assert_eq!(model.rows[5].style, RowStyleClass::Dimmed);
    }

    #[test]
    fn text_rendering_aligns_columns() {
        let records = numbers(2);
        let table = RecordTable::new(vec![
            Column::accessor("name", "Name"),
            Column::accessor("id", "ID"),
        ]);
        let text = build_table("Items", &table, &records, |_| RowStyleClass::Normal, |_, _| None)
            .to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name     ID");
        assert_eq!(lines[1], "item-00  0");
        assert_eq!(lines[3], "Page 1 of 1 | 2 records | 5 per page");
    }
}
