//! Ranking-style window functions, built on [`extend_window_func`].
//!
//! Apart from [`nth`], which reads its row out of the frame extent, these
//! are frame-agnostic: they read the partition and the current row's
//! position. Peers are rows with equal sort-key values; within a sorted
//! partition peers are contiguous.
//!
//! [`extend_window_func`]: crate::window::extend_window_func

use std::cmp::Ordering;

use tessera_core::{value_cmp, DynError, Value};

use crate::window::{WindowCtx, WindowFn};

/// 1-based position of the row within its partition.
pub fn row_number() -> WindowFn {
    Box::new(|ctx| Ok(Value::Int((ctx.row - ctx.partition.start + 1) as i64)))
}

/// Rank with gaps: 1 + the number of rows strictly before the current row's
/// first peer.
pub fn rank() -> WindowFn {
    Box::new(|ctx| {
        let cols = sort_columns(ctx)?;
        let first = first_peer(ctx, &cols);
        Ok(Value::Int((first - ctx.partition.start + 1) as i64))
    })
}

/// Fraction of the partition strictly before the current row's first peer,
/// `(rank - 1) / (size - 1)`; 0 for a single-row partition.
pub fn percent_rank() -> WindowFn {
    Box::new(|ctx| {
        let size = ctx.partition.len();
        if size == 1 {
            return Ok(Value::Float(0.0));
        }
        let cols = sort_columns(ctx)?;
        let first = first_peer(ctx, &cols);
        Ok(Value::Float(
            (first - ctx.partition.start) as f64 / (size - 1) as f64,
        ))
    })
}

/// Fraction of the partition up to and including the current row's first
/// peer, `rank / size`.
pub fn cumulative_distribution() -> WindowFn {
    Box::new(|ctx| {
        let cols = sort_columns(ctx)?;
        let first = first_peer(ctx, &cols);
        Ok(Value::Float(
            (first - ctx.partition.start + 1) as f64 / ctx.partition.len() as f64,
        ))
    })
}

/// 1-based bucket of the current row when the partition is cut into `tiles`
/// equal slices by position.
pub fn ntile(tiles: i64) -> WindowFn {
    Box::new(move |ctx| {
        if tiles < 1 {
            return Err(DynError::from(format!("ntile requires at least 1 tile, got {tiles}")));
        }
        let pos = (ctx.row - ctx.partition.start) as f64;
        let bucket = (pos * tiles as f64 / ctx.partition.len() as f64) as i64 + 1;
        Ok(Value::Int(bucket))
    })
}

/// Value of `column` at the `n`-th row (1-based) of the current row's frame
/// extent, or null when the frame holds fewer than `n` rows.
pub fn nth(column: impl Into<String>, n: usize) -> WindowFn {
    let column = column.into();
    Box::new(move |ctx| {
        if n == 0 {
            return Ok(Value::Null);
        }
        let target = ctx.frame.start + (n - 1);
        if target < ctx.frame.end {
            column_value(ctx, &column, target)
        } else {
            Ok(Value::Null)
        }
    })
}

/// Rank without gaps: the number of distinct sort-key tuples seen up to and
/// including the current row.
pub fn dense_rank() -> WindowFn {
    Box::new(|ctx| {
        let cols = sort_columns(ctx)?;
        let mut rank = 1i64;
        let mut prev = key_tuple(ctx, &cols, ctx.partition.start);
        for r in ctx.partition.start + 1..=ctx.row {
            let tuple = key_tuple(ctx, &cols, r);
            if !tuples_equal(&tuple, &prev) {
                rank += 1;
                prev = tuple;
            }
        }
        Ok(Value::Int(rank))
    })
}

/// Value of `column` `offset` rows after the current row within the
/// partition, or `default` past the partition edge.
pub fn lead(column: impl Into<String>, offset: usize, default: Value) -> WindowFn {
    let column = column.into();
    Box::new(move |ctx| {
        let target = ctx.row + offset;
        if target < ctx.partition.end {
            column_value(ctx, &column, target)
        } else {
            Ok(default.clone())
        }
    })
}

/// Value of `column` `offset` rows before the current row within the
/// partition, or `default` past the partition edge.
pub fn lag(column: impl Into<String>, offset: usize, default: Value) -> WindowFn {
    let column = column.into();
    Box::new(move |ctx| {
        match ctx.row.checked_sub(offset) {
            Some(target) if target >= ctx.partition.start => column_value(ctx, &column, target),
            _ => Ok(default.clone()),
        }
    })
}

fn column_value(
    ctx: &WindowCtx<'_>,
    column: &str,
    row: usize,
) -> std::result::Result<Value, DynError> {
    let idx = ctx
        .table
        .column_index(column)
        .ok_or_else(|| DynError::from(format!("column '{column}' not found")))?;
    Ok(ctx.table.value(idx, row))
}

/// Absolute index of the first row in the partition whose sort-key tuple
/// equals the current row's. Peers are contiguous in a sorted partition.
fn first_peer(ctx: &WindowCtx<'_>, cols: &[usize]) -> usize {
    let current = key_tuple(ctx, cols, ctx.row);
    for r in ctx.partition.clone() {
        if tuples_equal(&key_tuple(ctx, cols, r), &current) {
            return r;
        }
    }
    ctx.row
}

fn sort_columns(ctx: &WindowCtx<'_>) -> std::result::Result<Vec<usize>, DynError> {
    ctx.sort_keys
        .iter()
        .map(|k| {
            ctx.table
                .column_index(&k.column)
                .ok_or_else(|| DynError::from(format!("sort column '{}' not found", k.column)))
        })
        .collect()
}

fn key_tuple(ctx: &WindowCtx<'_>, cols: &[usize], row: usize) -> Vec<Value> {
    cols.iter().map(|&c| ctx.table.value(c, row)).collect()
}

fn tuples_equal(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b.iter())
            .all(|(x, y)| value_cmp(x, y) == Ordering::Equal)
}
