//! Benchmarks for the fragment and token codecs.
//!
//! The hot path is one full-state recomposition plus one merge-preserving
//! fragment write per change event, so both directions are measured on a
//! fragment carrying several tables.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fraglink::conditions::{compress_order, expand_order};
use fraglink::config::LinkConfig;
use fraglink::fragment::{parse_fragment, FragmentGateway, MemoryLocation};
use fraglink::link::StateLink;
use fraglink::table::{SortOrder, TableView};
use fraglink::testing::StubTable;
use std::sync::Arc;

const BUSY_FRAGMENT: &str =
    "orders=ffoo:oa3:p2:l25&audit=vf0.1:c9.1-4.8-5.0&users=fbar%20baz:p14&logs=s1200";

fn bench_parse_fragment(c: &mut Criterion) {
    c.bench_function("parse_fragment/4_tables", |b| {
        b.iter(|| parse_fragment(black_box(BUSY_FRAGMENT)))
    });
}

fn bench_merge_write(c: &mut Criterion) {
    let gateway = FragmentGateway::new(Arc::new(MemoryLocation::with_fragment(BUSY_FRAGMENT)));
    c.bench_function("gateway_write/merge_preserving", |b| {
        b.iter(|| gateway.write_token(black_box("orders"), black_box("p9:l50")))
    });
}

fn bench_compose_token(c: &mut Criterion) {
    let gateway = FragmentGateway::new(Arc::new(MemoryLocation::default()));
    let table = Arc::new(StubTable::new("orders").columns(10));
    let link = StateLink::bind(table.clone(), gateway, LinkConfig::default())
        .expect("bind must succeed");
    table.set_search("foo bar");
    table.set_sort_order(SortOrder::descending(2));
    table.set_page(4);
    table.set_page_length(50);
    table.set_column_visible(1, false);
    table.set_column_order(&[9, 1, 2, 3, 4, 8, 7, 6, 5, 0]);

    c.bench_function("compose_token/full_state", |b| b.iter(|| link.compose_token()));
}

fn bench_colorder(c: &mut Criterion) {
    let order: Vec<usize> = (0..32).rev().chain(32..64).collect();
    let compressed = compress_order(&order);
    c.bench_function("colorder/compress", |b| {
        b.iter(|| compress_order(black_box(&order)))
    });
    c.bench_function("colorder/expand", |b| {
        b.iter(|| expand_order(black_box(&compressed)))
    });
}

criterion_group!(
    benches,
    bench_parse_fragment,
    bench_merge_write,
    bench_compose_token,
    bench_colorder
);
criterion_main!(benches);
