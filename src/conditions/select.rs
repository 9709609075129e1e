//! Row selection condition (key `e`).
//!
//! The value is a dot-joined list of selected row identifiers - the host's
//! stable row ids where it defines them, otherwise row indices rendered as
//! strings. Identifiers are joined verbatim, so ids containing `.` are not
//! representable; hosts with dotted ids should expose an index-based id.
//!
//! On load, single-select hosts apply only the first id; multi-select hosts
//! apply all of them. This condition listens to two change events, `select`
//! and `deselect`.

use crate::conditions::{Condition, Redraw, TableContext};
use crate::error::DecodeError;
use crate::table::SelectionMode;

/// Tracks which rows are selected.
pub struct SelectCondition;

impl Condition for SelectCondition {
    fn name(&self) -> &'static str {
        "select"
    }

    fn key(&self) -> char {
        'e'
    }

    fn trigger_events(&self) -> &'static [&'static str] {
        &["select", "deselect"]
    }

    fn is_applicable(&self, ctx: &TableContext) -> bool {
        ctx.table.selection_mode().is_some()
    }

    fn is_non_default(&self, ctx: &TableContext) -> bool {
        !ctx.table.selected_rows().is_empty()
    }

    fn serialize(&self, ctx: &TableContext) -> Option<String> {
        let rows = ctx.table.selected_rows();
        if rows.is_empty() {
            return None;
        }
        Some(rows.join("."))
    }

    fn deserialize(&self, ctx: &TableContext, raw: &str) -> Result<Redraw, DecodeError> {
        if raw.is_empty() {
            return Err(DecodeError::Empty);
        }
        let Some(mode) = ctx.table.selection_mode() else {
            return Ok(Redraw::NotRequired);
        };
        ctx.table.clear_selection();
        match mode {
            SelectionMode::Single => {
                if let Some(first) = raw.split('.').next() {
                    ctx.table.select_row(first);
                }
            }
            SelectionMode::Multiple => {
                for row in raw.split('.') {
                    ctx.table.select_row(row);
                }
            }
        }
        Ok(Redraw::Required)
    }
}
