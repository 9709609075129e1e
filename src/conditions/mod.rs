//! State conditions and the registry that drives encoding/decoding.
//!
//! A *condition* is one independently toggleable piece of table view state -
//! search text, sort order, current page, and so on. Each condition is a
//! capability bundle of four operations:
//!
//! - `is_applicable` - is the underlying table feature active at all?
//!   Consulted once, when the controller collects its enabled set.
//! - `is_non_default` - does the live value differ from the baseline,
//!   making it worth persisting?
//! - `serialize` - produce the value portion of the token entry.
//! - `deserialize` - apply a decoded value back onto the table, reporting
//!   whether a redraw is needed.
//!
//! plus metadata: a stable name, a single token key character, and the
//! change events that should trigger re-serialization.
//!
//! The [`ConditionRegistry`] stores conditions in insertion order (which is
//! also token entry order on encode) and indexes them by name and by key
//! character. Key and name uniqueness are enforced at registration; a
//! duplicate key would make token decoding ambiguous.
//!
//! # Token format
//!
//! A token is a `:`-joined list of `<key><value>` entries, e.g. `oa3:ffoo:p2`
//! for "ascending sort on column 3, search `foo`, page 3". Entry order
//! carries no meaning on decode - entries are dispatched purely by their key
//! character.

mod colorder;
mod colvis;
mod length;
mod order;
mod page;
mod scroller;
mod search;
mod select;

pub use colorder::{compress_order, expand_order, ColumnOrderCondition};
pub use colvis::ColumnVisibilityCondition;
pub use length::PageLengthCondition;
pub use order::SortOrderCondition;
pub use page::PageCondition;
pub use scroller::ScrollerCondition;
pub use search::SearchCondition;
pub use select::SelectCondition;

use crate::error::{DecodeError, LinkError};
use crate::table::{TableDefaults, TableView};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Separator between `<key><value>` entries inside one token.
pub const TOKEN_SEPARATOR: char = ':';

/// Whether applying a decoded value requires the table to redraw.
///
/// The controller coalesces these: however many entries request a redraw
/// during the initial apply pass, the table is redrawn once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    /// The applied value changes what is rendered.
    Required,
    /// The applied value only repositions (scroll); no redraw.
    NotRequired,
}

/// Everything a condition may consult: the live table and the baseline
/// defaults resolved at controller construction.
pub struct TableContext<'a> {
    /// The live host table.
    pub table: &'a dyn TableView,
    /// Baselines captured once when the controller was built.
    pub defaults: &'a TableDefaults,
}

/// One named, independently toggleable piece of table view state.
pub trait Condition: Send + Sync {
    /// Stable identifier, e.g. `"search"`.
    fn name(&self) -> &'static str;

    /// Single character prefixing this condition's token entries.
    ///
    /// Must be unique across the registry; enforced at registration.
    fn key(&self) -> char;

    /// Change events on the table that should trigger re-serialization.
    fn trigger_events(&self) -> &'static [&'static str];

    /// Whether the table feature this condition tracks is active for this
    /// table. Consulted at enablement-collection time only.
    fn is_applicable(&self, ctx: &TableContext) -> bool;

    /// Whether the live value differs from the baseline.
    fn is_non_default(&self, ctx: &TableContext) -> bool;

    /// The value portion of the token entry, or `None` to omit this
    /// condition from the token even though it is enabled.
    fn serialize(&self, ctx: &TableContext) -> Option<String>;

    /// Apply a decoded value onto the table.
    ///
    /// Errors here are decode anomalies - the caller logs and skips the
    /// entry, continuing with the rest of the token.
    fn deserialize(&self, ctx: &TableContext, raw: &str) -> Result<Redraw, DecodeError>;
}

/// Ordered catalog of conditions with O(1) lookup by name and by key.
pub struct ConditionRegistry {
    conditions: Vec<Arc<dyn Condition>>,
    by_name: FxHashMap<&'static str, usize>,
    by_key: FxHashMap<char, usize>,
}

impl ConditionRegistry {
    /// An empty registry. Use [`register`](Self::register) to populate it.
    pub fn empty() -> Self {
        Self {
            conditions: Vec::new(),
            by_name: FxHashMap::default(),
            by_key: FxHashMap::default(),
        }
    }

    /// The standard catalog: search, order, page, length, colvis, colorder,
    /// scroller, select - in that (token entry) order.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        let standard: [Arc<dyn Condition>; 8] = [
            Arc::new(SearchCondition),
            Arc::new(SortOrderCondition),
            Arc::new(PageCondition),
            Arc::new(PageLengthCondition),
            Arc::new(ColumnVisibilityCondition),
            Arc::new(ColumnOrderCondition),
            Arc::new(ScrollerCondition),
            Arc::new(SelectCondition),
        ];
        for condition in standard {
            if let Err(err) = registry.register(condition) {
                unreachable!("standard conditions have distinct names and keys: {err}");
            }
        }
        registry
    }

    /// Add a condition to the catalog.
    ///
    /// Fails fast when the condition's key character or name is already
    /// taken - a duplicate key would make token decoding ambiguous.
    pub fn register(&mut self, condition: Arc<dyn Condition>) -> Result<(), LinkError> {
        let name = condition.name();
        let key = condition.key();
        if let Some(&index) = self.by_key.get(&key) {
            return Err(LinkError::DuplicateKey {
                key,
                existing: self.conditions[index].name(),
                incoming: name,
            });
        }
        if self.by_name.contains_key(name) {
            return Err(LinkError::DuplicateName(name));
        }
        let index = self.conditions.len();
        self.conditions.push(condition);
        self.by_name.insert(name, index);
        self.by_key.insert(key, index);
        Ok(())
    }

    /// Look up by stable name.
    pub fn by_name(&self, name: &str) -> Option<&Arc<dyn Condition>> {
        self.by_name.get(name).map(|&i| &self.conditions[i])
    }

    /// Look up by token key character.
    pub fn by_key(&self, key: char) -> Option<&Arc<dyn Condition>> {
        self.by_key.get(&key).map(|&i| &self.conditions[i])
    }

    /// Look up by name, falling back to key character for single-character
    /// specs that name no condition.
    pub fn find(&self, name_or_key: &str) -> Option<&Arc<dyn Condition>> {
        if let Some(condition) = self.by_name(name_or_key) {
            return Some(condition);
        }
        let mut chars = name_or_key.chars();
        match (chars.next(), chars.next()) {
            (Some(key), None) => self.by_key(key),
            _ => None,
        }
    }

    /// Conditions in registration (token entry) order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Condition>> {
        self.conditions.iter()
    }

    /// Number of registered conditions.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl Default for ConditionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Split a token into `(key, value)` entries.
///
/// Empty entries (from doubled or trailing separators) are dropped.
pub fn split_token(token: &str) -> impl Iterator<Item = (char, &str)> {
    token.split(TOKEN_SEPARATOR).filter_map(|entry| {
        let mut chars = entry.chars();
        let key = chars.next()?;
        Some((key, chars.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_order_and_keys() {
        let registry = ConditionRegistry::standard();
        let names: Vec<_> = registry.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            [
                "search", "order", "page", "length", "colvis", "colorder", "scroller", "select"
            ]
        );
        let keys: Vec<_> = registry.iter().map(|c| c.key()).collect();
        assert_eq!(keys, ['f', 'o', 'p', 'l', 'v', 'c', 's', 'e']);
    }

    #[test]
    fn test_lookup_by_name_and_key() {
        let registry = ConditionRegistry::standard();
        assert_eq!(registry.by_name("search").map(|c| c.key()), Some('f'));
        assert_eq!(registry.by_key('o').map(|c| c.name()), Some("order"));
        assert!(registry.by_name("f").is_none());
        assert_eq!(registry.find("f").map(|c| c.name()), Some("search"));
        assert_eq!(registry.find("colvis").map(|c| c.key()), Some('v'));
        assert!(registry.find("nope").is_none());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        struct Clash;
        impl Condition for Clash {
            fn name(&self) -> &'static str {
                "filter"
            }
            fn key(&self) -> char {
                'f'
            }
            fn trigger_events(&self) -> &'static [&'static str] {
                &[]
            }
            fn is_applicable(&self, _: &TableContext) -> bool {
                false
            }
            fn is_non_default(&self, _: &TableContext) -> bool {
                false
            }
            fn serialize(&self, _: &TableContext) -> Option<String> {
                None
            }
            fn deserialize(&self, _: &TableContext, _: &str) -> Result<Redraw, DecodeError> {
                Ok(Redraw::NotRequired)
            }
        }

        let mut registry = ConditionRegistry::standard();
        let err = registry.register(Arc::new(Clash)).expect_err("must clash");
        assert_eq!(
            err,
            LinkError::DuplicateKey {
                key: 'f',
                existing: "search",
                incoming: "filter",
            }
        );
    }

    #[test]
    fn test_split_token() {
        let entries: Vec<_> = split_token("oa3:ffoo:p2").collect();
        assert_eq!(entries, [('o', "a3"), ('f', "foo"), ('p', "2")]);
    }

    #[test]
    fn test_split_token_drops_empty_entries() {
        let entries: Vec<_> = split_token("oa3::p2:").collect();
        assert_eq!(entries, [('o', "a3"), ('p', "2")]);
    }

    #[test]
    fn test_split_token_value_may_be_empty() {
        let entries: Vec<_> = split_token("v").collect();
        assert_eq!(entries, [('v', "")]);
    }
}
