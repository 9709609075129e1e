//! In-memory [`TableView`] implementation.
//!
//! [`StubTable`] backs this crate's own test suites and gives embedding
//! hosts a reference for what the capability trait expects. It stores every
//! tracked feature in plain fields, counts redraws, and lets tests fire
//! change events with [`StubTable::emit`].
//!
//! # Example
//!
//! ```
//! use fraglink::table::{SortOrder, TableView};
//! use fraglink::testing::StubTable;
//!
//! let table = StubTable::new("orders").columns(5);
//! table.set_sort_order(SortOrder::ascending(3));
//! table.set_page(2);
//! assert_eq!(table.page(), 2);
//! ```

use crate::table::{
    ChangeListener, SelectionMode, SortOrder, Subscription, TableDefaults, TableView,
};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};

struct StubState {
    search: String,
    sort_order: Option<SortOrder>,
    page: usize,
    page_length: usize,
    column_visible: Vec<bool>,
    column_order: Vec<usize>,
    scroll_position: f64,
    selected: Vec<String>,
    redraws: usize,
}

/// Feature switches and configured defaults for a [`StubTable`].
struct StubConfig {
    searchable: bool,
    sortable: bool,
    paginated: bool,
    length_changeable: bool,
    columns_toggleable: bool,
    columns_reorderable: bool,
    has_scroller: bool,
    selection_mode: Option<SelectionMode>,
    default_sort_order: Option<SortOrder>,
    default_page_length: usize,
}

/// In-memory table with every capability switchable.
///
/// All features except scroll virtualization and row selection start
/// enabled; defaults are page length 10, no initial sort, five columns in
/// natural order, all visible.
pub struct StubTable {
    id: String,
    config: StubConfig,
    state: RwLock<StubState>,
    listeners: RwLock<FxHashMap<String, Vec<(u64, ChangeListener)>>>,
    next_listener_id: AtomicU64,
}

impl StubTable {
    /// A stub with the given fragment identifier and the default feature set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            config: StubConfig {
                searchable: true,
                sortable: true,
                paginated: true,
                length_changeable: true,
                columns_toggleable: true,
                columns_reorderable: true,
                has_scroller: false,
                selection_mode: None,
                default_sort_order: None,
                default_page_length: 10,
            },
            state: RwLock::new(StubState {
                search: String::new(),
                sort_order: None,
                page: 0,
                page_length: 10,
                column_visible: vec![true; 5],
                column_order: (0..5).collect(),
                scroll_position: 0.0,
                selected: Vec::new(),
                redraws: 0,
            }),
            listeners: RwLock::new(FxHashMap::default()),
            next_listener_id: AtomicU64::new(1),
        }
    }

    /// Set the column count (resets visibility and display order).
    pub fn columns(self, count: usize) -> Self {
        {
            let mut state = self.state.write();
            state.column_visible = vec![true; count];
            state.column_order = (0..count).collect();
        }
        self
    }

    /// Configure the initial sort order (also applies it).
    pub fn default_sort(mut self, order: SortOrder) -> Self {
        self.config.default_sort_order = Some(order);
        self.state.write().sort_order = Some(order);
        self
    }

    /// Configure the initial page length (also applies it).
    pub fn default_length(mut self, length: usize) -> Self {
        self.config.default_page_length = length;
        self.state.write().page_length = length;
        self
    }

    /// Attach or detach the scroll-virtualization capability.
    pub fn scroller(mut self, enabled: bool) -> Self {
        self.config.has_scroller = enabled;
        self
    }

    /// Enable row selection in the given mode.
    pub fn selection(mut self, mode: SelectionMode) -> Self {
        self.config.selection_mode = Some(mode);
        self
    }

    /// Disable the search feature.
    pub fn without_search(mut self) -> Self {
        self.config.searchable = false;
        self
    }

    /// Disable sorting.
    pub fn without_sorting(mut self) -> Self {
        self.config.sortable = false;
        self
    }

    /// Disable pagination (and page-length changes).
    pub fn without_paging(mut self) -> Self {
        self.config.paginated = false;
        self.config.length_changeable = false;
        self
    }

    /// Disable column visibility toggling.
    pub fn without_column_toggles(mut self) -> Self {
        self.config.columns_toggleable = false;
        self
    }

    /// Disable column reordering.
    pub fn without_column_reorder(mut self) -> Self {
        self.config.columns_reorderable = false;
        self
    }

    /// Number of redraws requested so far.
    pub fn redraws(&self) -> usize {
        self.state.read().redraws
    }

    /// Number of listeners currently attached to the given event.
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .read()
            .get(event)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Fire a change event, invoking every attached listener.
    pub fn emit(&self, event: &str) {
        let listeners: Vec<ChangeListener> = self
            .listeners
            .read()
            .get(event)
            .map(|entries| entries.iter().map(|(_, l)| l.clone()).collect())
            .unwrap_or_default();
        for listener in listeners {
            listener();
        }
    }

    /// The defaults a controller would resolve for this stub.
    pub fn defaults(&self) -> TableDefaults {
        TableDefaults {
            sort_order: self.config.default_sort_order,
            page_length: self.config.default_page_length,
        }
    }
}

impl TableView for StubTable {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn searchable(&self) -> bool {
        self.config.searchable
    }

    fn search(&self) -> String {
        self.state.read().search.clone()
    }

    fn set_search(&self, text: &str) {
        self.state.write().search = text.to_string();
    }

    fn sortable(&self) -> bool {
        self.config.sortable
    }

    fn sort_order(&self) -> Option<SortOrder> {
        self.state.read().sort_order
    }

    fn set_sort_order(&self, order: SortOrder) {
        self.state.write().sort_order = Some(order);
    }

    fn default_sort_order(&self) -> Option<SortOrder> {
        self.config.default_sort_order
    }

    fn paginated(&self) -> bool {
        self.config.paginated
    }

    fn page(&self) -> usize {
        self.state.read().page
    }

    fn set_page(&self, page: usize) {
        self.state.write().page = page;
    }

    fn length_changeable(&self) -> bool {
        self.config.length_changeable
    }

    fn page_length(&self) -> usize {
        self.state.read().page_length
    }

    fn set_page_length(&self, length: usize) {
        self.state.write().page_length = length;
    }

    fn default_page_length(&self) -> usize {
        self.config.default_page_length
    }

    fn column_count(&self) -> usize {
        self.state.read().column_visible.len()
    }

    fn columns_toggleable(&self) -> bool {
        self.config.columns_toggleable
    }

    fn column_visible(&self, column: usize) -> bool {
        self.state
            .read()
            .column_visible
            .get(column)
            .copied()
            .unwrap_or(false)
    }

    fn set_column_visible(&self, column: usize, visible: bool) {
        let mut state = self.state.write();
        if let Some(slot) = state.column_visible.get_mut(column) {
            *slot = visible;
        }
    }

    fn columns_reorderable(&self) -> bool {
        self.config.columns_reorderable
    }

    fn column_order(&self) -> Vec<usize> {
        self.state.read().column_order.clone()
    }

    fn set_column_order(&self, order: &[usize]) {
        self.state.write().column_order = order.to_vec();
    }

    fn has_scroller(&self) -> bool {
        self.config.has_scroller
    }

    fn scroll_position(&self) -> f64 {
        self.state.read().scroll_position
    }

    fn set_scroll_position(&self, position: f64) {
        self.state.write().scroll_position = position;
    }

    fn selection_mode(&self) -> Option<SelectionMode> {
        self.config.selection_mode
    }

    fn selected_rows(&self) -> Vec<String> {
        self.state.read().selected.clone()
    }

    fn select_row(&self, row: &str) {
        let mut state = self.state.write();
        match self.config.selection_mode {
            Some(SelectionMode::Single) => {
                state.selected = vec![row.to_string()];
            }
            Some(SelectionMode::Multiple) => {
                if !state.selected.iter().any(|r| r == row) {
                    state.selected.push(row.to_string());
                }
            }
            None => {}
        }
    }

    fn clear_selection(&self) {
        self.state.write().selected.clear();
    }

    fn redraw(&self) {
        self.state.write().redraws += 1;
    }

    fn on(&self, event: &str, listener: ChangeListener) -> Subscription {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .write()
            .entry(event.to_string())
            .or_default()
            .push((id, listener));
        Subscription::new(event, id)
    }

    fn off(&self, subscription: &Subscription) {
        let mut listeners = self.listeners.write();
        if let Some(entries) = listeners.get_mut(subscription.event()) {
            entries.retain(|(id, _)| *id != subscription.id());
        }
    }
}
