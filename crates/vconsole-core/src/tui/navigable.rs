//! Row and column cursor shared by both tabs.

/// Navigation over the visible page of a table: a selected row and a column
/// cursor (the column `s` sorts).
///
/// Moves only adjust the raw indices; clamping to the rows and columns
/// actually shown happens in [`NavigableTable::clamp`], called after every
/// page change and before rendering.
pub trait NavigableTable {
    fn selected(&self) -> usize;
    fn selected_mut(&mut self) -> &mut usize;
    fn column(&self) -> usize;
    fn column_mut(&mut self) -> &mut usize;

    fn select_up(&mut self) {
        *self.selected_mut() = self.selected().saturating_sub(1);
    }

    fn select_down(&mut self) {
        *self.selected_mut() = self.selected().saturating_add(1);
    }

    fn home(&mut self) {
        *self.selected_mut() = 0;
    }

    fn end(&mut self) {
        *self.selected_mut() = usize::MAX;
    }

    fn column_left(&mut self) {
        *self.column_mut() = self.column().saturating_sub(1);
    }

    fn column_right(&mut self) {
        *self.column_mut() = self.column().saturating_add(1);
    }

    fn clamp(&mut self, rows: usize, columns: usize) {
        *self.selected_mut() = self.selected().min(rows.saturating_sub(1));
        *self.column_mut() = self.column().min(columns.saturating_sub(1));
    }
}

/// Cursor state of one tab's table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCursor {
    pub selected: usize,
    pub column: usize,
}

impl NavigableTable for TableCursor {
    fn selected(&self) -> usize {
        self.selected
    }

    fn selected_mut(&mut self) -> &mut usize {
        &mut self.selected
    }

    fn column(&self) -> usize {
        self.column
    }

    fn column_mut(&mut self) -> &mut usize {
        &mut self.column
    }
}
