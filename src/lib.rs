//! Deep-linkable table view state.
//!
//! fraglink is a bidirectional codec between a table widget's transient view
//! state - current page, page size, sort order, search text, scroll offset,
//! column visibility, column order, row selection - and a compact string
//! token stored in a URL fragment, so the exact visual state of one or more
//! independently-addressed tables on a page can be reconstructed from a
//! shared link:
//!
//! ```text
//! #orders=ffoo:oa3:p2:l25&audit=vf0.1
//! ```
//!
//! The host table widget stays outside this crate: anything that can answer
//! the [`TableView`](table::TableView) capability trait can be deep-linked.
//! So does the URL itself, behind the [`Location`](fragment::Location)
//! trait.
//!
//! # Architecture
//!
//! - [`fragment`] - parses and writes the `id=token&id=token` fragment,
//!   with merge-preserving updates so independent tables never clobber each
//!   other.
//! - [`conditions`] - the catalog of trackable state *conditions*. Each
//!   knows whether it applies to a table, whether its live value is worth
//!   persisting, and how to serialize/apply that value.
//! - [`link`] - the per-table controller. Restores state on bind, listens
//!   for change events, and rewrites the token on every change.
//! - [`config`] - the host-facing configuration value in its four accepted
//!   shapes.
//! - [`share`] - the copy-a-link affordance.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use fraglink::prelude::*;
//! use fraglink::testing::StubTable;
//!
//! // One gateway per page, shared by every table on it.
//! let gateway = FragmentGateway::new(Arc::new(MemoryLocation::with_fragment(
//!     "orders=oa3:p2",
//! )));
//!
//! // Binding restores the table from its token...
//! let table = Arc::new(StubTable::new("orders"));
//! let link = StateLink::bind(table.clone(), gateway.clone(), LinkConfig::default())?;
//! assert_eq!(table.page(), 2);
//! assert_eq!(table.sort_order(), Some(SortOrder::ascending(3)));
//!
//! // ...and every change event writes the current state back.
//! table.set_page(5);
//! table.emit("page");
//! assert_eq!(gateway.fragment(), "orders=oa3:p5");
//! # Ok::<(), fraglink::error::LinkError>(())
//! ```
//!
//! # Token format
//!
//! One token per table, `:`-joined `<key><value>` entries, only non-default
//! state included:
//!
//! | Key | Condition | Value |
//! |-----|-----------|-------|
//! | `f` | search    | percent-encoded search text |
//! | `o` | order     | `a`/`d` + column index |
//! | `p` | page      | zero-based page number |
//! | `l` | length    | page size |
//! | `v` | colvis    | `t`/`f` + dot-joined indices (shorter side) |
//! | `c` | colorder  | run-length-compressed display order |
//! | `s` | scroller  | integer scroll offset |
//! | `e` | select    | dot-joined row ids |

pub mod conditions;
pub mod config;
pub mod error;
pub mod fragment;
pub mod link;
pub mod share;
pub mod table;
pub mod testing;

/// Commonly used types, re-exported for glob import.
pub mod prelude {
    pub use crate::conditions::{Condition, ConditionRegistry, Redraw, TableContext};
    pub use crate::config::{ConditionSelector, LinkConfig, LinkOptions};
    pub use crate::error::{DecodeError, LinkError};
    pub use crate::fragment::{FragmentGateway, Location, MemoryLocation};
    pub use crate::link::StateLink;
    pub use crate::share::share_url;
    pub use crate::table::{
        SelectionMode, SortDirection, SortOrder, Subscription, TableDefaults, TableView,
    };
}
