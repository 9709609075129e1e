//! Fuzz target for fragment and token decoding
//!
//! Shared links arrive hand-editable, so arbitrary fragment input must never
//! cause panics or crashes - anomalies are skipped, not fatal.
//! Run with: cargo +nightly fuzz run fuzz_fragment -- -max_total_time=300

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

fuzz_target!(|data: &str| {
    // Limit input size to prevent OOM
    if data.len() > 100_000 {
        return;
    }

    // Parsing and re-encoding must never panic.
    let entries = fraglink::fragment::parse_fragment(data);
    let _ = fraglink::fragment::encode_fragment(&entries);

    // Applying the fragment to a live table must never panic either;
    // malformed entries are logged and skipped.
    let location = Arc::new(fraglink::fragment::MemoryLocation::with_fragment(data));
    let gateway = fraglink::fragment::FragmentGateway::new(location);
    let table = Arc::new(fraglink::testing::StubTable::new("t"));
    if let Ok(link) = fraglink::link::StateLink::bind(
        table,
        gateway,
        fraglink::config::LinkConfig::default(),
    ) {
        let _ = link.compose_token();
    }
});
