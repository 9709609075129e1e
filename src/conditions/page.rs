//! Current page condition (key `p`).
//!
//! The value is the zero-based page number as a decimal string. Page 0 is
//! the default and is never persisted.

use crate::conditions::{Condition, Redraw, TableContext};
use crate::error::DecodeError;

/// Tracks the table's current page.
pub struct PageCondition;

impl Condition for PageCondition {
    fn name(&self) -> &'static str {
        "page"
    }

    fn key(&self) -> char {
        'p'
    }

    fn trigger_events(&self) -> &'static [&'static str] {
        &["page"]
    }

    fn is_applicable(&self, ctx: &TableContext) -> bool {
        ctx.table.paginated()
    }

    fn is_non_default(&self, ctx: &TableContext) -> bool {
        ctx.table.page() != 0
    }

    fn serialize(&self, ctx: &TableContext) -> Option<String> {
        Some(ctx.table.page().to_string())
    }

    fn deserialize(&self, ctx: &TableContext, raw: &str) -> Result<Redraw, DecodeError> {
        let page: usize = raw
            .parse()
            .map_err(|_| DecodeError::InvalidNumber(raw.to_string()))?;
        ctx.table.set_page(page);
        Ok(Redraw::Required)
    }
}
