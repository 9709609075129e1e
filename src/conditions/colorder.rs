//! Column display order condition (key `c`).
//!
//! The value is the display order as a dot-joined list of original column
//! indices, run-length compressed: a maximal ascending or descending run of
//! three or more consecutive indices collapses to `first-last`. Two-element
//! runs stay `first.last` - the dash form for a pair would be ambiguous with
//! a negative number.
//!
//! ```text
//! [9, 1, 2, 3, 4, 8, 7, 6, 5, 0]  <->  9.1-4.8-5.0
//! ```

use crate::conditions::{Condition, Redraw, TableContext};
use crate::error::DecodeError;

/// Compress a display order into the dot/dash wire form.
pub fn compress_order(indices: &[usize]) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut i = 0;
    while i < indices.len() {
        let mut j = i + 1;
        if j < indices.len() {
            let step = indices[j] as i64 - indices[i] as i64;
            if step == 1 || step == -1 {
                while j + 1 < indices.len()
                    && indices[j + 1] as i64 - indices[j] as i64 == step
                {
                    j += 1;
                }
                // Runs of 3+ compress; a 2-run falls through and is emitted
                // element by element (dot form).
                if j - i + 1 >= 3 {
                    parts.push(format!("{}-{}", indices[i], indices[j]));
                    i = j + 1;
                    continue;
                }
            }
        }
        parts.push(indices[i].to_string());
        i += 1;
    }
    parts.join(".")
}

/// Expand the dot/dash wire form back into a display order.
pub fn expand_order(raw: &str) -> Result<Vec<usize>, DecodeError> {
    if raw.is_empty() {
        return Err(DecodeError::Empty);
    }
    let mut indices = Vec::new();
    for part in raw.split('.') {
        match part.split_once('-') {
            Some((first, last)) => {
                let first: usize = first
                    .parse()
                    .map_err(|_| DecodeError::InvalidRange(part.to_string()))?;
                let last: usize = last
                    .parse()
                    .map_err(|_| DecodeError::InvalidRange(part.to_string()))?;
                if first <= last {
                    indices.extend(first..=last);
                } else {
                    indices.extend((last..=first).rev());
                }
            }
            None => {
                indices.push(
                    part.parse()
                        .map_err(|_| DecodeError::InvalidNumber(part.to_string()))?,
                );
            }
        }
    }
    Ok(indices)
}

/// Tracks the display order of the table's columns.
pub struct ColumnOrderCondition;

impl Condition for ColumnOrderCondition {
    fn name(&self) -> &'static str {
        "colorder"
    }

    fn key(&self) -> char {
        'c'
    }

    fn trigger_events(&self) -> &'static [&'static str] {
        &["column-reorder"]
    }

    fn is_applicable(&self, ctx: &TableContext) -> bool {
        ctx.table.columns_reorderable()
    }

    fn is_non_default(&self, ctx: &TableContext) -> bool {
        let order = ctx.table.column_order();
        order.iter().enumerate().any(|(i, &column)| i != column)
    }

    fn serialize(&self, ctx: &TableContext) -> Option<String> {
        Some(compress_order(&ctx.table.column_order()))
    }

    fn deserialize(&self, ctx: &TableContext, raw: &str) -> Result<Redraw, DecodeError> {
        let order = expand_order(raw)?;
        ctx.table.set_column_order(&order);
        Ok(Redraw::Required)
    }
}
