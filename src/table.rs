//! Host table abstraction.
//!
//! The table widget itself - rendering, pagination, sorting, selection,
//! scroll virtualization - lives outside this crate. [`TableView`] is the
//! capability surface a host must expose for its state to be deep-linked:
//! getters and setters for each tracked feature, capability queries used at
//! enablement time, a redraw operation, and change-event subscription.
//!
//! # Subscriptions
//!
//! [`TableView::on`] returns an explicit [`Subscription`] handle, and
//! [`TableView::off`] takes that exact handle back. Detachment never relies
//! on matching a closure by identity; the controller stores every handle it
//! receives and returns each one on detach.

use std::sync::Arc;

/// Sort direction for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest value first.
    Ascending,
    /// Largest value first.
    Descending,
}

impl SortDirection {
    /// Single-character wire code: `a` for ascending, `d` for descending.
    pub fn code(self) -> char {
        match self {
            Self::Ascending => 'a',
            Self::Descending => 'd',
        }
    }

    /// Parse the wire code produced by [`code`](Self::code).
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'a' => Some(Self::Ascending),
            'd' => Some(Self::Descending),
            _ => None,
        }
    }
}

/// A column index and the direction it is sorted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    /// Zero-based column index.
    pub column: usize,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortOrder {
    /// Ascending order on the given column.
    pub fn ascending(column: usize) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    /// Descending order on the given column.
    pub fn descending(column: usize) -> Self {
        Self {
            column,
            direction: SortDirection::Descending,
        }
    }
}

/// How many rows the host allows to be selected at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// At most one row; restoring a token applies only the first id.
    Single,
    /// Any number of rows; restoring a token applies every id.
    Multiple,
}

/// Handle for one attached change listener.
///
/// Returned by [`TableView::on`]; pass the same handle to
/// [`TableView::off`] to detach exactly that listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    event: String,
    id: u64,
}

impl Subscription {
    /// Create a handle. Hosts allocate the id; it only needs to be unique
    /// within one table instance.
    pub fn new(event: impl Into<String>, id: u64) -> Self {
        Self {
            event: event.into(),
            id,
        }
    }

    /// The change event this handle is attached to.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Host-allocated listener id.
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Callback invoked by the host when a change event fires.
pub type ChangeListener = Arc<dyn Fn() + Send + Sync>;

/// Capability surface of the host table widget.
///
/// Methods take `&self`; hosts are expected to manage their own interior
/// mutability. All state reads reflect the live widget, not a snapshot.
pub trait TableView: Send + Sync {
    /// Stable identifier keying this table's entry in the fragment.
    fn id(&self) -> String;

    // --- search ---

    /// Whether the host exposes a search/filter feature at all.
    fn searchable(&self) -> bool;
    /// Current search text (empty when not filtering).
    fn search(&self) -> String;
    /// Replace the search text.
    fn set_search(&self, text: &str);

    // --- sort order ---

    /// Whether at least one column is sortable.
    fn sortable(&self) -> bool;
    /// Current sort order, if any.
    fn sort_order(&self) -> Option<SortOrder>;
    /// Apply a sort order.
    fn set_sort_order(&self, order: SortOrder);
    /// The order the host was configured to start with.
    fn default_sort_order(&self) -> Option<SortOrder>;

    // --- paging ---

    /// Whether the host paginates at all.
    fn paginated(&self) -> bool;
    /// Zero-based current page.
    fn page(&self) -> usize;
    /// Jump to a zero-based page.
    fn set_page(&self, page: usize);
    /// Whether the page size is user-changeable.
    fn length_changeable(&self) -> bool;
    /// Current page size.
    fn page_length(&self) -> usize;
    /// Change the page size.
    fn set_page_length(&self, length: usize);
    /// The page size the host was configured to start with.
    fn default_page_length(&self) -> usize;

    // --- columns ---

    /// Total number of columns, visible or not.
    fn column_count(&self) -> usize;
    /// Whether column visibility can be toggled.
    fn columns_toggleable(&self) -> bool;
    /// Visibility of one column.
    fn column_visible(&self, column: usize) -> bool;
    /// Show or hide one column.
    fn set_column_visible(&self, column: usize, visible: bool);
    /// Whether columns can be reordered.
    fn columns_reorderable(&self) -> bool;
    /// Current display order as original column indices.
    fn column_order(&self) -> Vec<usize>;
    /// Apply a display order.
    fn set_column_order(&self, order: &[usize]);

    // --- scroll virtualization ---

    /// Whether a scroll-virtualization extension is attached.
    fn has_scroller(&self) -> bool;
    /// Current virtualized scroll offset (base row top).
    fn scroll_position(&self) -> f64;
    /// Reposition the virtualized scroll.
    fn set_scroll_position(&self, position: f64);

    // --- row selection ---

    /// Selection mode, or `None` when the host has no selection feature.
    fn selection_mode(&self) -> Option<SelectionMode>;
    /// Identifiers of the currently selected rows. Hosts with a stable row
    /// id scheme return those ids; others return row indices rendered as
    /// strings.
    fn selected_rows(&self) -> Vec<String>;
    /// Add one row to the selection.
    fn select_row(&self, row: &str);
    /// Clear the selection.
    fn clear_selection(&self);

    // --- redraw & events ---

    /// Redraw the table with its current state.
    fn redraw(&self);

    /// Attach a listener to a named change event, returning its handle.
    fn on(&self, event: &str, listener: ChangeListener) -> Subscription;

    /// Detach the listener behind the given handle.
    fn off(&self, subscription: &Subscription);
}

/// Baseline values each condition compares against when deciding whether the
/// live state is worth persisting.
///
/// Resolved exactly once, at controller construction, from the host's
/// configured defaults - never recomputed ad hoc from scattered fallback
/// sources while the table is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDefaults {
    /// Configured initial sort order.
    pub sort_order: Option<SortOrder>,
    /// Configured initial page size.
    pub page_length: usize,
}

impl TableDefaults {
    /// Capture the host's configured defaults.
    pub fn resolve(table: &dyn TableView) -> Self {
        Self {
            sort_order: table.default_sort_order(),
            page_length: table.default_page_length(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_codes() {
        assert_eq!(SortDirection::Ascending.code(), 'a');
        assert_eq!(SortDirection::Descending.code(), 'd');
        assert_eq!(
            SortDirection::from_code('a'),
            Some(SortDirection::Ascending)
        );
        assert_eq!(
            SortDirection::from_code('d'),
            Some(SortDirection::Descending)
        );
        assert_eq!(SortDirection::from_code('x'), None);
    }

    #[test]
    fn test_sort_order_constructors() {
        let order = SortOrder::ascending(3);
        assert_eq!(order.column, 3);
        assert_eq!(order.direction, SortDirection::Ascending);

        let order = SortOrder::descending(0);
        assert_eq!(order.column, 0);
        assert_eq!(order.direction, SortDirection::Descending);
    }

    #[test]
    fn test_subscription_accessors() {
        let sub = Subscription::new("order", 7);
        assert_eq!(sub.event(), "order");
        assert_eq!(sub.id(), 7);
    }
}
