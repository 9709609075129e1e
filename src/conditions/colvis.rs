//! Column visibility condition (key `v`).
//!
//! The value is a flag character followed by a dot-joined index list:
//! `t<visible indices>` when the visible list is strictly shorter than the
//! hidden list, otherwise `f<hidden indices>`. Whichever side is shorter is
//! the one encoded, so a table with most columns hidden stays compact.

use crate::conditions::{Condition, Redraw, TableContext};
use crate::error::DecodeError;

fn join_indices(indices: &[usize]) -> String {
    let mut out = String::new();
    for (i, index) in indices.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push_str(&index.to_string());
    }
    out
}

fn parse_indices(raw: &str) -> Result<Vec<usize>, DecodeError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    raw.split('.')
        .map(|part| {
            part.parse()
                .map_err(|_| DecodeError::InvalidNumber(part.to_string()))
        })
        .collect()
}

/// Tracks which columns are hidden.
pub struct ColumnVisibilityCondition;

impl Condition for ColumnVisibilityCondition {
    fn name(&self) -> &'static str {
        "colvis"
    }

    fn key(&self) -> char {
        'v'
    }

    fn trigger_events(&self) -> &'static [&'static str] {
        &["column-visibility"]
    }

    fn is_applicable(&self, ctx: &TableContext) -> bool {
        ctx.table.columns_toggleable()
    }

    fn is_non_default(&self, ctx: &TableContext) -> bool {
        (0..ctx.table.column_count()).any(|column| !ctx.table.column_visible(column))
    }

    fn serialize(&self, ctx: &TableContext) -> Option<String> {
        let mut visible = Vec::new();
        let mut hidden = Vec::new();
        for column in 0..ctx.table.column_count() {
            if ctx.table.column_visible(column) {
                visible.push(column);
            } else {
                hidden.push(column);
            }
        }
        if visible.len() < hidden.len() {
            Some(format!("t{}", join_indices(&visible)))
        } else {
            Some(format!("f{}", join_indices(&hidden)))
        }
    }

    fn deserialize(&self, ctx: &TableContext, raw: &str) -> Result<Redraw, DecodeError> {
        let mut chars = raw.chars();
        let flag = chars.next().ok_or(DecodeError::Empty)?;
        let listed_visible = match flag {
            't' => true,
            'f' => false,
            other => return Err(DecodeError::InvalidVisibilityFlag(other)),
        };
        let listed = parse_indices(chars.as_str())?;
        for column in 0..ctx.table.column_count() {
            let in_list = listed.contains(&column);
            ctx.table.set_column_visible(column, in_list == listed_visible);
        }
        Ok(Redraw::Required)
    }
}
