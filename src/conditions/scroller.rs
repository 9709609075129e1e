//! Virtualized scroll offset condition (key `s`).
//!
//! The value is the current scroll offset (base row top) truncated to an
//! integer. Applying it only repositions the viewport, so this is the one
//! condition whose deserialize never requests a redraw.

use crate::conditions::{Condition, Redraw, TableContext};
use crate::error::DecodeError;

/// Tracks the virtualized scroll position.
pub struct ScrollerCondition;

impl ScrollerCondition {
    fn offset(ctx: &TableContext) -> i64 {
        ctx.table.scroll_position().trunc() as i64
    }
}

impl Condition for ScrollerCondition {
    fn name(&self) -> &'static str {
        "scroller"
    }

    fn key(&self) -> char {
        's'
    }

    fn trigger_events(&self) -> &'static [&'static str] {
        &["scroll"]
    }

    fn is_applicable(&self, ctx: &TableContext) -> bool {
        ctx.table.has_scroller()
    }

    fn is_non_default(&self, ctx: &TableContext) -> bool {
        Self::offset(ctx) != 0
    }

    fn serialize(&self, ctx: &TableContext) -> Option<String> {
        Some(Self::offset(ctx).to_string())
    }

    fn deserialize(&self, ctx: &TableContext, raw: &str) -> Result<Redraw, DecodeError> {
        let offset: i64 = raw
            .parse()
            .map_err(|_| DecodeError::InvalidNumber(raw.to_string()))?;
        ctx.table.set_scroll_position(offset as f64);
        Ok(Redraw::NotRequired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableView;
    use crate::table::TableDefaults;
    use crate::testing::StubTable;

    fn context<'a>(table: &'a StubTable, defaults: &'a TableDefaults) -> TableContext<'a> {
        TableContext { table, defaults }
    }

    #[test]
    fn test_applicable_only_with_scroller() {
        let plain = StubTable::new("t");
        let defaults = plain.defaults();
        assert!(!ScrollerCondition.is_applicable(&context(&plain, &defaults)));

        let scrolling = StubTable::new("t").scroller(true);
        let defaults = scrolling.defaults();
        assert!(ScrollerCondition.is_applicable(&context(&scrolling, &defaults)));
    }

    #[test]
    fn test_serialize_truncates() {
        let table = StubTable::new("t").scroller(true);
        let defaults = table.defaults();
        let ctx = context(&table, &defaults);
        table.set_scroll_position(147.9);
        assert_eq!(ScrollerCondition.serialize(&ctx).as_deref(), Some("147"));
    }

    #[test]
    fn test_fractional_offset_below_one_is_default() {
        let table = StubTable::new("t").scroller(true);
        let defaults = table.defaults();
        let ctx = context(&table, &defaults);
        table.set_scroll_position(0.6);
        assert!(!ScrollerCondition.is_non_default(&ctx));
        table.set_scroll_position(1.1);
        assert!(ScrollerCondition.is_non_default(&ctx));
    }

    #[test]
    fn test_deserialize_repositions_without_redraw() {
        let table = StubTable::new("t").scroller(true);
        let defaults = table.defaults();
        let ctx = context(&table, &defaults);
        let redraw = ScrollerCondition.deserialize(&ctx, "300").expect("decoded");
        assert_eq!(redraw, Redraw::NotRequired);
        assert_eq!(table.scroll_position(), 300.0);
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        let table = StubTable::new("t").scroller(true);
        let defaults = table.defaults();
        let ctx = context(&table, &defaults);
        assert_eq!(
            ScrollerCondition.deserialize(&ctx, "3.5"),
            Err(DecodeError::InvalidNumber("3.5".into()))
        );
    }
}
