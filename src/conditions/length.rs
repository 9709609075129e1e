//! Page length condition (key `l`).
//!
//! The value is the page size as a decimal string, persisted only when it
//! differs from the host's configured default length.

use crate::conditions::{Condition, Redraw, TableContext};
use crate::error::DecodeError;

/// Tracks the table's page size.
pub struct PageLengthCondition;

impl Condition for PageLengthCondition {
    fn name(&self) -> &'static str {
        "length"
    }

    fn key(&self) -> char {
        'l'
    }

    fn trigger_events(&self) -> &'static [&'static str] {
        &["length"]
    }

    fn is_applicable(&self, ctx: &TableContext) -> bool {
        ctx.table.length_changeable()
    }

    fn is_non_default(&self, ctx: &TableContext) -> bool {
        ctx.table.page_length() != ctx.defaults.page_length
    }

    fn serialize(&self, ctx: &TableContext) -> Option<String> {
        Some(ctx.table.page_length().to_string())
    }

    fn deserialize(&self, ctx: &TableContext, raw: &str) -> Result<Redraw, DecodeError> {
        let length: usize = raw
            .parse()
            .map_err(|_| DecodeError::InvalidNumber(raw.to_string()))?;
        ctx.table.set_page_length(length);
        Ok(Redraw::Required)
    }
}
