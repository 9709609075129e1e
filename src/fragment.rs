//! URL fragment codec and the gateway that owns fragment access.
//!
//! The fragment (everything after `#`) stores one token per table, keyed by
//! table identifier:
//!
//! ```text
//! #orders=oa3:p2&audit=ffoo:l25
//! ```
//!
//! Several independent tables on one page share the fragment, so all reads
//! and writes go through a single [`FragmentGateway`] scoped to a
//! [`Location`]. The gateway re-reads the location on every call - it never
//! caches a copy, because other code may edit the fragment between calls -
//! and its writes are merge-preserving: updating one table's token leaves
//! every other table's raw token substring untouched.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use fraglink::fragment::{FragmentGateway, MemoryLocation};
//!
//! let location = Arc::new(MemoryLocation::default());
//! let gateway = FragmentGateway::new(location);
//!
//! gateway.write_token("orders", "oa3:p2");
//! gateway.write_token("audit", "ffoo");
//!
//! assert_eq!(gateway.read_token("orders").as_deref(), Some("oa3:p2"));
//! assert_eq!(gateway.fragment(), "orders=oa3:p2&audit=ffoo");
//! ```

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Placeholder written when the composed fragment has no entries.
///
/// An empty fragment makes the browser scroll to the top of the page; a
/// single throwaway character does not.
pub const EMPTY_FRAGMENT_PLACEHOLDER: &str = "_";

/// Source of truth for the URL fragment.
///
/// In a browser host this is backed by the window location; embedding hosts
/// and tests use [`MemoryLocation`]. Implementations return the fragment
/// *without* the leading `#`.
pub trait Location: Send + Sync {
    /// Read the current fragment (everything after `#`).
    fn fragment(&self) -> String;

    /// Replace the fragment wholesale.
    fn set_fragment(&self, fragment: &str);
}

/// In-memory [`Location`] for tests and non-browser hosts.
#[derive(Debug, Default)]
pub struct MemoryLocation {
    inner: RwLock<String>,
}

impl MemoryLocation {
    /// Create a location holding the given initial fragment.
    pub fn with_fragment(fragment: impl Into<String>) -> Self {
        Self {
            inner: RwLock::new(fragment.into()),
        }
    }
}

impl Location for MemoryLocation {
    fn fragment(&self) -> String {
        self.inner.read().clone()
    }

    fn set_fragment(&self, fragment: &str) {
        *self.inner.write() = fragment.to_string();
    }
}

/// Value side of one fragment entry.
///
/// A well-formed fragment has one entry per table identifier, but nothing
/// stops a hand-edited link from repeating an identifier. Parsing preserves
/// the repeats: the first occurrence stays a scalar, a second promotes the
/// value to a two-element sequence, later occurrences append. Callers always
/// collapse this by taking the first value (see
/// [`FragmentValue::first`]); repeats are a warning-worthy anomaly, not an
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentValue {
    /// Exactly one value for this identifier.
    Single(String),
    /// Two or more values for this identifier, in fragment order.
    Many(Vec<String>),
}

impl FragmentValue {
    /// The first value for this identifier.
    pub fn first(&self) -> &str {
        match self {
            Self::Single(v) => v,
            Self::Many(values) => values.first().map(String::as_str).unwrap_or(""),
        }
    }

    /// Number of values accumulated for this identifier.
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Many(values) => values.len(),
        }
    }

    /// True when no value is present (never produced by parsing).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, value: String) {
        match self {
            Self::Single(existing) => {
                *self = Self::Many(vec![std::mem::take(existing), value]);
            }
            Self::Many(values) => values.push(value),
        }
    }
}

/// Parse a raw fragment into an ordered identifier -> token map.
///
/// Splits on `&`, then each entry on the first `=`. Entries without a `=`
/// (including the [`EMPTY_FRAGMENT_PLACEHOLDER`]) are ignored. Repeated
/// identifiers accumulate per [`FragmentValue`].
pub fn parse_fragment(raw: &str) -> IndexMap<String, FragmentValue> {
    let mut entries: IndexMap<String, FragmentValue> = IndexMap::new();
    for part in raw.split('&') {
        let Some((id, token)) = part.split_once('=') else {
            continue;
        };
        match entries.get_mut(id) {
            Some(value) => value.push(token.to_string()),
            None => {
                entries.insert(id.to_string(), FragmentValue::Single(token.to_string()));
            }
        }
    }
    entries
}

/// Encode an identifier -> token map back into a fragment string.
///
/// Entries with an empty token are skipped. Repeated values re-expand into
/// repeated `id=token` pairs. An empty result is replaced by the
/// [`EMPTY_FRAGMENT_PLACEHOLDER`] so the browser never sees an empty
/// fragment.
pub fn encode_fragment(entries: &IndexMap<String, FragmentValue>) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(entries.len());
    for (id, value) in entries {
        match value {
            FragmentValue::Single(token) => {
                if !token.is_empty() {
                    parts.push(format!("{id}={token}"));
                }
            }
            FragmentValue::Many(tokens) => {
                for token in tokens {
                    if !token.is_empty() {
                        parts.push(format!("{id}={token}"));
                    }
                }
            }
        }
    }
    if parts.is_empty() {
        EMPTY_FRAGMENT_PLACEHOLDER.to_string()
    } else {
        parts.join("&")
    }
}

/// Gateway for all fragment reads and writes.
///
/// One gateway is shared by every controller on the page; each call takes
/// the table identifier explicitly. The gateway holds no fragment state of
/// its own - every operation re-reads the [`Location`].
#[derive(Clone)]
pub struct FragmentGateway {
    location: Arc<dyn Location>,
}

impl FragmentGateway {
    /// Create a gateway scoped to the given location.
    pub fn new(location: Arc<dyn Location>) -> Self {
        Self { location }
    }

    /// The raw fragment as currently stored.
    pub fn fragment(&self) -> String {
        self.location.fragment()
    }

    /// Read the token for one table identifier.
    ///
    /// When the fragment holds several entries for the identifier, the first
    /// one wins and a warning is logged.
    pub fn read_token(&self, id: &str) -> Option<String> {
        let entries = parse_fragment(&self.location.fragment());
        let value = entries.get(id)?;
        if value.len() > 1 {
            tracing::warn!(
                table = id,
                occurrences = value.len(),
                "fragment holds multiple tokens for one table, using the first"
            );
        }
        Some(value.first().to_string())
    }

    /// Compute the fragment that [`write_token`](Self::write_token) would
    /// store, without storing it.
    ///
    /// Used by the share affordance to build a link for the current state
    /// without touching the location.
    pub fn preview(&self, id: &str, token: &str) -> String {
        let mut entries = parse_fragment(&self.location.fragment());
        if token.is_empty() {
            entries.shift_remove(id);
        } else {
            // Replacing in place keeps the entry at its existing position,
            // and collapses any accumulated duplicates for this identifier.
            entries.insert(id.to_string(), FragmentValue::Single(token.to_string()));
        }
        encode_fragment(&entries)
    }

    /// Merge-preserving token write.
    ///
    /// Re-reads the fragment, replaces only this identifier's entry, and
    /// writes the result back. Other tables' raw token strings pass through
    /// opaquely - they are never re-parsed or re-validated. An empty token
    /// removes the entry.
    pub fn write_token(&self, id: &str, token: &str) {
        let fragment = self.preview(id, token);
        tracing::debug!(table = id, %fragment, "writing fragment");
        self.location.set_fragment(&fragment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(initial: &str) -> FragmentGateway {
        FragmentGateway::new(Arc::new(MemoryLocation::with_fragment(initial)))
    }

    #[test]
    fn test_parse_simple() {
        let entries = parse_fragment("orders=oa3:p2&audit=ffoo");
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries.get("orders"),
            Some(&FragmentValue::Single("oa3:p2".into()))
        );
        assert_eq!(
            entries.get("audit"),
            Some(&FragmentValue::Single("ffoo".into()))
        );
    }

    #[test]
    fn test_parse_skips_entries_without_equals() {
        let entries = parse_fragment("_");
        assert!(entries.is_empty());

        let entries = parse_fragment("plain-anchor&orders=p1");
        assert_eq!(entries.len(), 1);
        assert!(entries.contains_key("orders"));
    }

    #[test]
    fn test_parse_accumulates_duplicate_ids() {
        let entries = parse_fragment("t=a&t=b&t=c");
        let value = entries.get("t").expect("entry");
        assert_eq!(
            value,
            &FragmentValue::Many(vec!["a".into(), "b".into(), "c".into()])
        );
        assert_eq!(value.first(), "a");
        assert_eq!(value.len(), 3);
    }

    #[test]
    fn test_parse_value_with_equals_splits_on_first() {
        let entries = parse_fragment("t=a=b");
        assert_eq!(entries.get("t"), Some(&FragmentValue::Single("a=b".into())));
    }

    #[test]
    fn test_encode_skips_empty_tokens() {
        let mut entries = IndexMap::new();
        entries.insert("a".to_string(), FragmentValue::Single("x".into()));
        entries.insert("b".to_string(), FragmentValue::Single(String::new()));
        assert_eq!(encode_fragment(&entries), "a=x");
    }

    #[test]
    fn test_encode_empty_yields_placeholder() {
        let entries = IndexMap::new();
        assert_eq!(encode_fragment(&entries), EMPTY_FRAGMENT_PLACEHOLDER);

        let mut entries = IndexMap::new();
        entries.insert("a".to_string(), FragmentValue::Single(String::new()));
        assert_eq!(encode_fragment(&entries), EMPTY_FRAGMENT_PLACEHOLDER);
    }

    #[test]
    fn test_read_token_collapses_duplicates_to_first() {
        let gw = gateway("t=first&t=second");
        assert_eq!(gw.read_token("t").as_deref(), Some("first"));
    }

    #[test]
    fn test_write_preserves_other_tables() {
        let gw = gateway("orders=oa3:p2&audit=ffoo:l25");
        gw.write_token("orders", "od0");
        let fragment = gw.fragment();
        assert!(
            fragment.contains("audit=ffoo:l25"),
            "unrelated token must be byte-identical, got {fragment}"
        );
        assert!(fragment.contains("orders=od0"));
    }

    #[test]
    fn test_write_is_opaque_for_other_tokens() {
        // A token that is not even valid fraglink syntax must pass through.
        let gw = gateway("weird=%%%not::a=token&orders=p1");
        gw.write_token("orders", "p3");
        assert!(gw.fragment().contains("weird=%%%not::a=token"));
    }

    #[test]
    fn test_write_empty_token_removes_entry() {
        let gw = gateway("orders=p2&audit=ffoo");
        gw.write_token("orders", "");
        assert_eq!(gw.fragment(), "audit=ffoo");
    }

    #[test]
    fn test_write_last_entry_leaves_placeholder() {
        let gw = gateway("orders=p2");
        gw.write_token("orders", "");
        assert_eq!(gw.fragment(), EMPTY_FRAGMENT_PLACEHOLDER);
    }

    #[test]
    fn test_write_reads_fresh_state() {
        let location = Arc::new(MemoryLocation::default());
        let gw = FragmentGateway::new(location.clone());
        gw.write_token("orders", "p1");

        // Simulate external code rewriting the fragment between our calls.
        location.set_fragment("orders=p1&other=x");
        gw.write_token("orders", "p2");
        assert_eq!(gw.fragment(), "orders=p2&other=x");
    }

    #[test]
    fn test_preview_does_not_write() {
        let gw = gateway("orders=p2");
        let preview = gw.preview("audit", "ffoo");
        assert_eq!(preview, "orders=p2&audit=ffoo");
        assert_eq!(gw.fragment(), "orders=p2");
    }
}
