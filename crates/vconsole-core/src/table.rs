//! Generic record table: global filter, single-column sort, pagination.
//!
//! The engine never owns or mutates the record collection. Every operation
//! takes the caller's slice, and the visible window is recomputed from
//! (records, columns, state) by [`RecordTable::view`]:
//! filter → sort → slice the active page.

use std::cmp::Ordering;
use std::fmt;

/// Immutable record identity (`id` field of every backend entity).
pub type RecordId = i64;

/// Value extracted from a record by a column accessor.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Missing or non-stringifiable value (nested object, array, null).
    #[default]
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    fn rank(&self) -> u8 {
        match self {
            CellValue::Empty => 0,
            CellValue::Int(_) | CellValue::Float(_) => 1,
            CellValue::Text(_) => 2,
        }
    }

    /// Type-aware total order: numbers numerically, text lexicographically.
    /// Across kinds: empty < number < text.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Int(a), CellValue::Int(b)) => a.cmp(b),
            (CellValue::Int(a), CellValue::Float(b)) => (*a as f64).total_cmp(b),
            (CellValue::Float(a), CellValue::Int(b)) => a.total_cmp(&(*b as f64)),
            (CellValue::Float(a), CellValue::Float(b)) => a.total_cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Substring test on the stringified value; `needle` must be lowercase.
    fn contains_lowercase(&self, needle: &str) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::Text(s) => s.to_lowercase().contains(needle),
            other => other.to_string().contains(needle),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Int(v) => write!(f, "{v}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or_default()
    }
}

/// A row the table can display without knowing its domain meaning.
pub trait Record {
    /// Unique identifier, stable across sort/filter changes.
    fn id(&self) -> RecordId;

    /// Value at a dotted accessor path (e.g. `verifierRole.role`).
    fn field(&self, path: &str) -> CellValue;
}

impl Record for serde_json::Value {
    fn id(&self) -> RecordId {
        self.get("id")
            .and_then(serde_json::Value::as_i64)
            .unwrap_or_default()
    }

    fn field(&self, path: &str) -> CellValue {
        let mut current = self;
        for segment in path.split('.') {
            match current.get(segment) {
                Some(next) => current = next,
                None => return CellValue::Empty,
            }
        }
        match current {
            serde_json::Value::String(s) => CellValue::Text(s.clone()),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(CellValue::Int)
                .or_else(|| n.as_f64().map(CellValue::Float))
                .unwrap_or_default(),
            serde_json::Value::Bool(b) => CellValue::Text(b.to_string()),
            _ => CellValue::Empty,
        }
    }
}

/// Custom cell renderer.
pub type CellRenderer<R> = fn(&R) -> String;

/// Static description of one table column.
pub struct Column<R> {
    /// Column key used by [`RecordTable::toggle_sort`].
    pub key: &'static str,
    pub header: &'static str,
    /// Accessor path into the record. `None` for display-only columns,
    /// which never take part in filtering or sorting.
    pub accessor: Option<&'static str>,
    pub renderer: Option<CellRenderer<R>>,
    pub sortable: bool,
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            header: self.header,
            accessor: self.accessor,
            renderer: self.renderer,
            sortable: self.sortable,
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("accessor", &self.accessor)
            .field("custom_renderer", &self.renderer.is_some())
            .field("sortable", &self.sortable)
            .finish()
    }
}

impl<R: Record> Column<R> {
    /// Sortable column reading `path`; the key is the path itself.
    pub fn accessor(path: &'static str, header: &'static str) -> Self {
        Self {
            key: path,
            header,
            accessor: Some(path),
            renderer: None,
            sortable: true,
        }
    }

    /// Display-only column rendered entirely by `renderer`.
    pub fn display(key: &'static str, header: &'static str, renderer: CellRenderer<R>) -> Self {
        Self {
            key,
            header,
            accessor: None,
            renderer: Some(renderer),
            sortable: false,
        }
    }

    pub fn with_renderer(mut self, renderer: CellRenderer<R>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Raw accessor value (used for filtering and sorting).
    pub fn value(&self, record: &R) -> CellValue {
        self.accessor
            .map(|path| record.field(path))
            .unwrap_or_default()
    }

    /// Text shown in the cell.
    pub fn cell_text(&self, record: &R) -> String {
        match self.renderer {
            Some(render) => render(record),
            None => self.value(record).to_string(),
        }
    }

    fn is_sortable(&self) -> bool {
        self.sortable && self.accessor.is_some()
    }
}

/// Sort direction of the active sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Active sort: column index + direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: usize,
    pub direction: SortDirection,
}

/// Page sizes offered by the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    Five,
    Ten,
    Twenty,
    Thirty,
    Forty,
    Fifty,
}

impl PageSize {
    pub const ALL: [PageSize; 6] = [
        PageSize::Five,
        PageSize::Ten,
        PageSize::Twenty,
        PageSize::Thirty,
        PageSize::Forty,
        PageSize::Fifty,
    ];

    pub fn get(self) -> usize {
        match self {
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
            PageSize::Thirty => 30,
            PageSize::Forty => 40,
            PageSize::Fifty => 50,
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|&s| s == self).unwrap_or(0)
    }

    /// Next larger size (saturates at 50).
    pub fn larger(self) -> Self {
        Self::ALL[(self.position() + 1).min(Self::ALL.len() - 1)]
    }

    /// Next smaller size (saturates at 5).
    pub fn smaller(self) -> Self {
        Self::ALL[self.position().saturating_sub(1)]
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Page size outside the enumerated set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPageSize(pub usize);

impl fmt::Display for InvalidPageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid page size {} (expected one of 5, 10, 20, 30, 40, 50)",
            self.0
        )
    }
}

impl std::error::Error for InvalidPageSize {}

impl TryFrom<usize> for PageSize {
    type Error = InvalidPageSize;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.get() == n)
            .ok_or(InvalidPageSize(n))
    }
}

/// `max(1, ceil(filtered / page_size))`.
pub fn page_count(filtered: usize, page_size: PageSize) -> usize {
    filtered.div_ceil(page_size.get()).max(1)
}

/// View state owned by one table instance. Not persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableState {
    pub sort: Option<Sort>,
    pub filter: String,
    pub page_index: usize,
    pub page_size: PageSize,
}

/// One computed page of the table.
#[derive(Debug)]
pub struct TableView<'a, R> {
    /// Records in the active page window, in display order.
    pub rows: Vec<&'a R>,
    pub total_count: usize,
    pub filtered_count: usize,
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: PageSize,
    pub sort: Option<Sort>,
}

impl<R> TableView<'_, R> {
    pub fn can_previous_page(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.page_index + 1 < self.page_count
    }

    /// Position of the first visible row within the filtered set.
    pub fn offset(&self) -> usize {
        self.page_index * self.page_size.get()
    }
}

/// Sortable, filterable, paginated table over any [`Record`] type.
#[derive(Debug, Clone)]
pub struct RecordTable<R> {
    columns: Vec<Column<R>>,
    state: TableState,
}

impl<R: Record> RecordTable<R> {
    pub fn new(columns: Vec<Column<R>>) -> Self {
        Self {
            columns,
            state: TableState::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.state.page_size = page_size;
        self
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn filter(&self) -> &str {
        &self.state.filter
    }

    /// Replaces the global filter and returns to the first page.
    pub fn set_global_filter(&mut self, text: impl Into<String>) {
        self.state.filter = text.into();
        self.state.page_index = 0;
    }

    /// Cycles `key` through unsorted → ascending → descending → unsorted.
    /// Selecting another column starts it at ascending and drops the previous
    /// sort. Returns `false` for unknown or non-sortable columns.
    pub fn toggle_sort(&mut self, key: &str) -> bool {
        let Some(column) = self
            .columns
            .iter()
            .position(|c| c.key == key && c.is_sortable())
        else {
            return false;
        };

        self.state.sort = match self.state.sort {
            Some(Sort {
                column: current,
                direction: SortDirection::Ascending,
            }) if current == column => Some(Sort {
                column,
                direction: SortDirection::Descending,
            }),
            Some(Sort {
                column: current,
                direction: SortDirection::Descending,
            }) if current == column => None,
            _ => Some(Sort {
                column,
                direction: SortDirection::Ascending,
            }),
        };
        true
    }

    /// Changes the page size and clamps the page index into range.
    pub fn set_page_size(&mut self, page_size: PageSize, records: &[R]) {
        self.state.page_size = page_size;
        self.state.page_index = self.current_page(records);
    }

    /// Moves to `index`, clamped to `[0, page_count - 1]`.
    pub fn go_to_page(&mut self, index: usize, records: &[R]) {
        let last = self.page_count(records) - 1;
        self.state.page_index = index.min(last);
    }

    pub fn first_page(&mut self, records: &[R]) -> bool {
        if !self.can_previous_page(records) {
            return false;
        }
        self.go_to_page(0, records);
        true
    }

    pub fn previous_page(&mut self, records: &[R]) -> bool {
        if !self.can_previous_page(records) {
            return false;
        }
        let current = self.current_page(records);
        self.go_to_page(current - 1, records);
        true
    }

    pub fn next_page(&mut self, records: &[R]) -> bool {
        if !self.can_next_page(records) {
            return false;
        }
        let current = self.current_page(records);
        self.go_to_page(current + 1, records);
        true
    }

    pub fn last_page(&mut self, records: &[R]) -> bool {
        if !self.can_next_page(records) {
            return false;
        }
        self.go_to_page(usize::MAX, records);
        true
    }

    pub fn can_previous_page(&self, records: &[R]) -> bool {
        self.current_page(records) > 0
    }

    pub fn can_next_page(&self, records: &[R]) -> bool {
        self.current_page(records) + 1 < self.page_count(records)
    }

    /// Effective page index (a stale index left by a shrinking collection
    /// is clamped here rather than trusted).
    pub fn current_page(&self, records: &[R]) -> usize {
        self.state.page_index.min(self.page_count(records) - 1)
    }

    pub fn page_count(&self, records: &[R]) -> usize {
        page_count(self.filtered_count(records), self.state.page_size)
    }

    pub fn filtered_count(&self, records: &[R]) -> usize {
        let needle = self.state.filter.to_lowercase();
        records.iter().filter(|r| self.matches(r, &needle)).count()
    }

    fn matches(&self, record: &R, needle: &str) -> bool {
        needle.is_empty()
            || self
                .columns
                .iter()
                .any(|c| c.value(record).contains_lowercase(needle))
    }

    /// Filtered records in source order.
    pub fn filtered<'a>(&self, records: &'a [R]) -> Vec<&'a R> {
        let needle = self.state.filter.to_lowercase();
        records
            .iter()
            .filter(|r| self.matches(r, &needle))
            .collect()
    }

    /// Filtered and sorted records (the full set the pages are cut from).
    pub fn sorted<'a>(&self, records: &'a [R]) -> Vec<&'a R> {
        let rows = self.filtered(records);
        let Some(sort) = self.state.sort else {
            return rows;
        };
        let Some(column) = self.columns.get(sort.column) else {
            return rows;
        };

        let mut keyed: Vec<(CellValue, &'a R)> =
            rows.into_iter().map(|r| (column.value(r), r)).collect();
        // sort_by is stable, so ties keep source order in both directions.
        match sort.direction {
            SortDirection::Ascending => keyed.sort_by(|a, b| a.0.compare(&b.0)),
            SortDirection::Descending => keyed.sort_by(|a, b| b.0.compare(&a.0)),
        }
        keyed.into_iter().map(|(_, r)| r).collect()
    }

    /// Computes the visible window.
    pub fn view<'a>(&self, records: &'a [R]) -> TableView<'a, R> {
        let sorted = self.sorted(records);
        let filtered_count = sorted.len();
        let page_size = self.state.page_size;
        let page_count = page_count(filtered_count, page_size);
        let page_index = self.state.page_index.min(page_count - 1);

        let rows = sorted
            .into_iter()
            .skip(page_index * page_size.get())
            .take(page_size.get())
            .collect();

        TableView {
            rows,
            total_count: records.len(),
            filtered_count,
            page_index,
            page_count,
            page_size,
            sort: self.state.sort,
        }
    }
}
