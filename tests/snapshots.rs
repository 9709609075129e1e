//! Snapshot tests for composed tokens and fragments.
//!
//! Inline insta snapshots pin the exact wire format: if any of these change,
//! previously shared links stop reproducing the state they captured.

use fraglink::config::LinkConfig;
use fraglink::fragment::{FragmentGateway, MemoryLocation};
use fraglink::link::StateLink;
use fraglink::share::share_url;
use fraglink::table::{SelectionMode, SortOrder, TableView};
use fraglink::testing::StubTable;
use insta::assert_snapshot;
use std::sync::Arc;

fn linked(table: StubTable) -> (Arc<StubTable>, Arc<StateLink>, FragmentGateway) {
    let gateway = FragmentGateway::new(Arc::new(MemoryLocation::default()));
    let table = Arc::new(table);
    let link =
        StateLink::bind(table.clone(), gateway.clone(), LinkConfig::default()).unwrap();
    (table, link, gateway)
}

#[test]
fn test_snapshot_every_condition() {
    let (table, link, _) = linked(
        StubTable::new("t")
            .columns(10)
            .scroller(true)
            .selection(SelectionMode::Multiple),
    );
    table.set_search("foo bar");
    table.set_sort_order(SortOrder::descending(2));
    table.set_page(4);
    table.set_page_length(50);
    table.set_column_visible(1, false);
    table.set_column_visible(7, false);
    table.set_column_order(&[9, 1, 2, 3, 4, 8, 7, 6, 5, 0]);
    table.set_scroll_position(312.7);
    table.select_row("a1");
    table.select_row("b2");

    assert_snapshot!(
        link.compose_token(),
        @"ffoo%20bar:od2:p4:l50:vf1.7:c9.1-4.8-5.0:s312:ea1.b2"
    );
}

#[test]
fn test_snapshot_default_state_is_empty() {
    let (_table, link, _) = linked(StubTable::new("t"));
    assert_snapshot!(link.compose_token(), @"");
}

#[test]
fn test_snapshot_fragment_with_two_tables() {
    let gateway = FragmentGateway::new(Arc::new(MemoryLocation::default()));
    let orders = Arc::new(StubTable::new("orders"));
    let audit = Arc::new(StubTable::new("audit"));
    let orders_link =
        StateLink::bind(orders.clone(), gateway.clone(), LinkConfig::default()).unwrap();
    let audit_link =
        StateLink::bind(audit.clone(), gateway.clone(), LinkConfig::default()).unwrap();

    orders.set_sort_order(SortOrder::ascending(3));
    orders.set_page(2);
    orders_link.write_token();
    audit.set_search("err");
    audit.set_page_length(25);
    audit_link.write_token();

    assert_snapshot!(gateway.fragment(), @"orders=oa3:p2&audit=ferr:l25");
}

#[test]
fn test_snapshot_share_url() {
    let (table, link, _) = linked(StubTable::new("orders"));
    table.set_search("50% off");
    assert_snapshot!(
        share_url("https://example.com/report", &link),
        @"https://example.com/report#orders=f50%25%20off"
    );
}
