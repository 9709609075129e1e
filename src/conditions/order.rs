//! Sort order condition (key `o`).
//!
//! The value is `<direction><column>`: one direction character (`a`
//! ascending, `d` descending) followed by the zero-based column index, e.g.
//! `a3` for ascending on column 3.

use crate::conditions::{Condition, Redraw, TableContext};
use crate::error::DecodeError;
use crate::table::{SortDirection, SortOrder};

/// Tracks the table's active sort order.
pub struct SortOrderCondition;

impl Condition for SortOrderCondition {
    fn name(&self) -> &'static str {
        "order"
    }

    fn key(&self) -> char {
        'o'
    }

    fn trigger_events(&self) -> &'static [&'static str] {
        &["order"]
    }

    fn is_applicable(&self, ctx: &TableContext) -> bool {
        ctx.table.sortable()
    }

    fn is_non_default(&self, ctx: &TableContext) -> bool {
        ctx.table.sort_order() != ctx.defaults.sort_order
    }

    fn serialize(&self, ctx: &TableContext) -> Option<String> {
        let order = ctx.table.sort_order()?;
        Some(format!("{}{}", order.direction.code(), order.column))
    }

    fn deserialize(&self, ctx: &TableContext, raw: &str) -> Result<Redraw, DecodeError> {
        let mut chars = raw.chars();
        let code = chars.next().ok_or(DecodeError::Empty)?;
        let direction = SortDirection::from_code(code).ok_or(DecodeError::UnknownDirection(code))?;
        let column: usize = chars
            .as_str()
            .parse()
            .map_err(|_| DecodeError::InvalidNumber(chars.as_str().to_string()))?;
        ctx.table.set_sort_order(SortOrder { column, direction });
        Ok(Redraw::Required)
    }
}
