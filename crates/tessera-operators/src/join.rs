//! Nested-loop join: cross product, per-row predicate, left-outer
//! compensation.
//!
//! The cross product is materialized in full before filtering, which is
//! quadratic in the input sizes; acceptable at the embedded scale this
//! engine targets.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use tessera_core::{DynError, Error, Result};
use tessera_tds::{ColumnData, RowView, Table, TableBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinKind {
    Inner,
    Left,
}

/// Join `left` and `right` on an arbitrary row predicate. The predicate sees
/// one row of the cross product (both sides' columns visible by name); a
/// predicate error aborts the join with no partial result.
///
/// For `Left`, every left row with no surviving match is appended once, its
/// left-hand columns intact and every right-hand column null. Unmatched rows
/// are found by positional correspondence with the original left table, not
/// by re-deriving a join key.
pub fn join<F>(left: &Table, right: &Table, kind: JoinKind, predicate: F) -> Result<Table>
where
    F: Fn(&RowView<'_>) -> std::result::Result<bool, DynError>,
{
    let cross = left.cross_join(right)?;
    let nr = right.row_count();

    let mut dropped = HashSet::new();
    let mut matched_left: HashSet<usize> = HashSet::new();
    for r in 0..cross.row_count() {
        if predicate(&RowView::new(&cross, r)).map_err(Error::eval)? {
            // Left-major cross order: row r came from left row r / nr.
            matched_left.insert(r / nr);
        } else {
            dropped.insert(r);
        }
    }
    let matched = cross.drop_rows(&dropped);

    #[cfg(feature = "tracing")]
    tracing::trace!(
        left_rows = left.row_count(),
        right_rows = right.row_count(),
        kept = matched.row_count(),
        "join filtered cross product"
    );

    if kind == JoinKind::Inner {
        return Ok(matched);
    }

    let unmatched: Vec<usize> = (0..left.row_count())
        .filter(|l| !matched_left.contains(l))
        .collect();
    if unmatched.is_empty() {
        return Ok(matched);
    }

    // Compensation rows: left columns gathered, right columns all null.
    let mut builder = TableBuilder::new();
    for col in left.columns() {
        builder.add_column(col.name().to_string(), col.data.gather(&unmatched))?;
    }
    for col in right.columns() {
        builder.add_column(
            col.name().to_string(),
            ColumnData::all_null(col.column_type(), unmatched.len()),
        )?;
    }
    matched.concatenate(&builder.finish())
}
