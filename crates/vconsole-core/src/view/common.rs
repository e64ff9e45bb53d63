//! UI-agnostic view model types.
//!
//! These types carry presentation data without depending on a rendering
//! framework. The TUI maps them to ratatui styles; `--dump` prints them as
//! plain text.

/// Row-level style classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowStyleClass {
    #[default]
    Normal,
    /// Waiting on someone (TUI: yellow). E.g. invited users.
    Warning,
    /// Final or blocked state (TUI: red).
    Critical,
    /// Positive/active (TUI: green).
    Active,
    /// Not yet live (TUI: dark gray). E.g. created users.
    Dimmed,
    /// Accent (TUI: cyan). E.g. action hints.
    Accent,
}

/// A single table cell with optional per-cell style override.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewCell {
    pub text: String,
    /// `None` = inherit row style.
    pub style: Option<RowStyleClass>,
}

impl ViewCell {
    pub fn plain(text: String) -> Self {
        Self { text, style: None }
    }

    pub fn styled(text: String, style: RowStyleClass) -> Self {
        Self {
            text,
            style: Some(style),
        }
    }
}

/// One table row, parameterized by entity ID type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRow<Id> {
    pub id: Id,
    pub cells: Vec<ViewCell>,
    pub style: RowStyleClass,
}

/// Pagination footer data. `index` is zero-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub index: usize,
    pub count: usize,
    pub size: usize,
    pub filtered: usize,
    pub total: usize,
    pub can_previous: bool,
    pub can_next: bool,
}

impl PageInfo {
    /// `"Page 1 of 3 | 12 of 14 records | 5 per page"`.
    pub fn summary(&self) -> String {
        let records = if self.filtered == self.total {
            format!("{} records", self.total)
        } else {
            format!("{} of {} records", self.filtered, self.total)
        };
        format!(
            "Page {} of {} | {} | {} per page",
            self.index + 1,
            self.count,
            records,
            self.size
        )
    }
}

/// Complete table ready to be rendered by any frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableViewModel<Id> {
    pub title: String,
    /// Headers with the sort indicator appended to the sorted column.
    pub headers: Vec<String>,
    /// Column widths in characters: widest of header and visible cells.
    pub widths: Vec<u16>,
    pub rows: Vec<ViewRow<Id>>,
    pub sort_column: Option<usize>,
    pub sort_ascending: bool,
    pub filter: String,
    pub page: PageInfo,
}

impl<Id> TableViewModel<Id> {
    /// Plain-text rendering: header line, one line per row, footer.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let pad = |text: &str, width: u16| {
            let len = text.chars().count();
            let mut s = text.to_string();
            s.extend(std::iter::repeat_n(' ', (width as usize).saturating_sub(len)));
            s
        };
        let line = |cells: Vec<String>| cells.join("  ").trim_end().to_string();

        out.push_str(&line(
            self.headers
                .iter()
                .zip(&self.widths)
                .map(|(h, &w)| pad(h, w))
                .collect(),
        ));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&line(
                row.cells
                    .iter()
                    .zip(&self.widths)
                    .map(|(c, &w)| pad(&c.text, w))
                    .collect(),
            ));
            out.push('\n');
        }
        out.push_str(&self.page.summary());
        out.push('\n');
        out
    }
}
