//! Search text condition (key `f`).
//!
//! The value is the percent-encoded search string. The encode set matches
//! JavaScript's `encodeURIComponent`, so `:`, `&` and `=` are always escaped
//! and search text can never corrupt token or fragment structure.

use crate::conditions::{Condition, Redraw, TableContext};
use crate::error::DecodeError;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Escape everything except ASCII alphanumerics and `- _ . ! ~ * ' ( )`,
/// the exact set `encodeURIComponent` leaves bare.
const COMPONENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Tracks the table's search/filter text.
pub struct SearchCondition;

impl Condition for SearchCondition {
    fn name(&self) -> &'static str {
        "search"
    }

    fn key(&self) -> char {
        'f'
    }

    fn trigger_events(&self) -> &'static [&'static str] {
        &["search"]
    }

    fn is_applicable(&self, ctx: &TableContext) -> bool {
        ctx.table.searchable()
    }

    fn is_non_default(&self, ctx: &TableContext) -> bool {
        !ctx.table.search().is_empty()
    }

    fn serialize(&self, ctx: &TableContext) -> Option<String> {
        Some(utf8_percent_encode(&ctx.table.search(), COMPONENT_SET).to_string())
    }

    fn deserialize(&self, ctx: &TableContext, raw: &str) -> Result<Redraw, DecodeError> {
        let text = percent_decode_str(raw)
            .decode_utf8()
            .map_err(|_| DecodeError::InvalidPercentEncoding(raw.to_string()))?;
        ctx.table.set_search(&text);
        Ok(Redraw::Required)
    }
}
