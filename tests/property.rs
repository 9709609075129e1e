//! Property-based tests for fraglink.
//!
//! Uses proptest to push randomized state through the codec and check the
//! round-trip invariants the wire format promises.

use fraglink::conditions::{compress_order, expand_order, split_token};
use fraglink::config::LinkConfig;
use fraglink::fragment::{encode_fragment, parse_fragment, FragmentGateway, MemoryLocation};
use fraglink::link::StateLink;
use fraglink::table::{SortDirection, SortOrder, TableView};
use fraglink::testing::StubTable;
use proptest::prelude::*;
use std::sync::Arc;

fn gateway(fragment: &str) -> FragmentGateway {
    FragmentGateway::new(Arc::new(MemoryLocation::with_fragment(fragment)))
}

proptest! {
    /// Run-length compression must reconstruct the exact index sequence.
    #[test]
    fn colorder_compression_round_trips(
        order in prop::collection::vec(0usize..64, 1..32),
    ) {
        let compressed = compress_order(&order);
        let expanded = expand_order(&compressed).expect("own output must expand");
        prop_assert_eq!(expanded, order);
    }

    /// A shuffled permutation (the realistic colorder input) round-trips.
    #[test]
    fn colorder_permutations_round_trip(
        order in Just((0..12usize).collect::<Vec<_>>()).prop_shuffle(),
    ) {
        let compressed = compress_order(&order);
        prop_assert_eq!(expand_order(&compressed).expect("expands"), order);
    }

    /// Compressed output never contains a dash-range for fewer than 3 items.
    #[test]
    fn colorder_never_compresses_pairs(
        order in prop::collection::vec(0usize..16, 1..16),
    ) {
        let compressed = compress_order(&order);
        for part in compressed.split('.') {
            if let Some((first, last)) = part.split_once('-') {
                let first: i64 = first.parse().expect("range start");
                let last: i64 = last.parse().expect("range end");
                prop_assert!(
                    (first - last).abs() >= 2,
                    "range {part} spans fewer than 3 indices"
                );
            }
        }
    }

    /// Fragment encode/parse round-trips for well-formed entries.
    #[test]
    fn fragment_round_trips(
        entries in prop::collection::btree_map(
            "[a-z][a-z0-9-]{0,8}",
            "[a-zA-Z0-9:.%-]{1,16}",
            0..6,
        ),
    ) {
        let mut map = indexmap::IndexMap::new();
        for (id, token) in &entries {
            map.insert(id.clone(), fraglink::fragment::FragmentValue::Single(token.clone()));
        }
        let encoded = encode_fragment(&map);
        let parsed = parse_fragment(&encoded);
        if entries.is_empty() {
            prop_assert_eq!(encoded, "_");
            prop_assert!(parsed.is_empty());
        } else {
            prop_assert_eq!(parsed, map);
        }
    }

    /// Any search text survives serialize -> token -> fragment -> restore.
    #[test]
    fn search_text_round_trips(text in ".{1,40}") {
        let gw = gateway("");
        let table = Arc::new(StubTable::new("t"));
        let link = StateLink::bind(table.clone(), gw.clone(), LinkConfig::default())
            .expect("bound");
        table.set_search(&text);
        link.write_token();

        let restored = Arc::new(StubTable::new("t"));
        let _restored_link = StateLink::bind(restored.clone(), gw, LinkConfig::default())
            .expect("bound");
        prop_assert_eq!(restored.search(), text);
    }

    /// The composed token never leaks fragment or token structure characters
    /// out of the search text.
    #[test]
    fn token_structure_survives_any_search(text in ".{1,40}") {
        let gw = gateway("");
        let table = Arc::new(StubTable::new("t"));
        let link = StateLink::bind(table.clone(), gw, LinkConfig::default()).expect("bound");
        table.set_search(&text);
        table.set_page(9);
        let token = link.compose_token();
        let entries: Vec<(char, &str)> = split_token(&token).collect();
        prop_assert_eq!(entries.len(), 2, "token was {}", token);
        prop_assert_eq!(entries[0].0, 'f');
        prop_assert_eq!(entries[1], ('p', "9"));
        prop_assert!(!token.contains('&'));
        prop_assert!(!token.contains('='));
    }

    /// Encode-then-restore reproduces every tracked scalar state.
    #[test]
    fn full_state_round_trips(
        page in 0usize..200,
        length in 1usize..100,
        column in 0usize..8,
        descending in any::<bool>(),
        hidden in prop::collection::btree_set(0usize..8, 0..4),
    ) {
        let gw = gateway("");
        let first = Arc::new(StubTable::new("t").columns(8));
        let link = StateLink::bind(first.clone(), gw.clone(), LinkConfig::default())
            .expect("bound");

        let direction = if descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        first.set_page(page);
        first.set_page_length(length);
        first.set_sort_order(SortOrder { column, direction });
        for &col in &hidden {
            first.set_column_visible(col, false);
        }
        link.write_token();

        let second = Arc::new(StubTable::new("t").columns(8));
        let _second_link = StateLink::bind(second.clone(), gw, LinkConfig::default())
            .expect("bound");

        prop_assert_eq!(second.page(), page);
        prop_assert_eq!(second.page_length(), length);
        prop_assert_eq!(second.sort_order(), Some(SortOrder { column, direction }));
        for col in 0..8 {
            prop_assert_eq!(second.column_visible(col), !hidden.contains(&col));
        }
    }
}
