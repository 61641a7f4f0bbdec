//! Window engine: partitioned, ordered, framed evaluation.
//!
//! A window is (partition keys, sort keys, frame). Evaluation sorts the
//! table once by partition keys followed by sort keys, walks each contiguous
//! partition, and computes for every row the inclusive row extent of its
//! frame; the supplied aggregate or ranking function runs over that extent.
//!
//! Frame bounds are one closed variant family: unbounded, a row/value
//! offset, or a value offset scaled by a duration unit. Row-offset frames
//! narrow by position; range frames narrow by the ordering column's value
//! (peer-inclusive), which requires exactly one sort key over a numeric
//! column.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use tessera_core::hash::RowKey;
use tessera_core::{ColumnType, DynError, Error, Result, SortKey, Value};
use tessera_tds::{RowView, Table};

use crate::specs::{typed_column, AggregationSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl DurationUnit {
    pub fn as_seconds(self) -> i64 {
        match self {
            DurationUnit::Seconds => 1,
            DurationUnit::Minutes => 60,
            DurationUnit::Hours => 3_600,
            DurationUnit::Days => 86_400,
        }
    }
}

/// One frame bound. Offsets are signed: negative reaches before the current
/// row, positive after.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Bound {
    Unbounded,
    Offset(i64),
    IntervalOffset(i64, DurationUnit),
}

/// Frame kinds. `Rows` offsets are row counts relative to the current row's
/// position in its partition; `Range` offsets are deltas against the
/// ordering column's value; `RangeInterval` scales those deltas by a
/// duration unit (the ordering column is expected in seconds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Frame {
    Rows { from: Bound, to: Bound },
    Range { from: Bound, to: Bound },
    RangeInterval { from: Bound, to: Bound },
}

impl Frame {
    /// Start of partition through the current row.
    pub fn cumulative() -> Self {
        Frame::Rows {
            from: Bound::Unbounded,
            to: Bound::Offset(0),
        }
    }

    /// The whole partition for every row.
    pub fn unbounded_rows() -> Self {
        Frame::Rows {
            from: Bound::Unbounded,
            to: Bound::Unbounded,
        }
    }
}

/// Partition keys, sort keys, and the frame evaluated per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub partitions: Vec<String>,
    pub sort_keys: Vec<SortKey>,
    pub frame: Frame,
}

impl Window {
    /// When no frame is supplied the default is cumulative if sort keys
    /// exist, otherwise the whole partition.
    pub fn new(partitions: Vec<String>, sort_keys: Vec<SortKey>, frame: Option<Frame>) -> Self {
        let frame = frame.unwrap_or_else(|| {
            if sort_keys.is_empty() {
                Frame::unbounded_rows()
            } else {
                Frame::cumulative()
            }
        });
        Self {
            partitions,
            sort_keys,
            frame,
        }
    }
}

/// What a ranking-style window function sees for one row: the sorted table,
/// its partition, the inclusive-exclusive frame extent, the absolute row
/// index, and the window's sort keys (for peer detection).
pub struct WindowCtx<'a> {
    pub table: &'a Table,
    pub partition: Range<usize>,
    pub frame: Range<usize>,
    pub row: usize,
    pub sort_keys: &'a [SortKey],
}

pub type WindowFn =
    Box<dyn Fn(&WindowCtx<'_>) -> std::result::Result<Value, DynError> + Send + Sync>;

/// Append one aggregated column: for each row, the spec's map function runs
/// over the rows of its frame extent and the reduce function folds the
/// mapped values. Output rows are in combined partition-and-sort order.
pub fn extend_window_agg(table: &Table, window: &Window, spec: &AggregationSpec) -> Result<Table> {
    let (sorted, parts) = sort_and_partition(table, window)?;
    let (from_delta, to_delta) = frame_deltas(&window.frame)?;

    let mut out = Vec::with_capacity(sorted.row_count());
    for part in &parts {
        let axis = order_axis_for_frame(&sorted, window, part)?;
        for pos in 0..part.len() {
            let rel = frame_extent(&window.frame, from_delta, to_delta, &axis, pos, part.len())?;
            let mut mapped = Vec::with_capacity(rel.len());
            for r in rel {
                mapped.push(spec.eval_map(&RowView::new(&sorted, part.start + r))?);
            }
            out.push(spec.eval_reduce(&mapped)?);
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(
        rows = sorted.row_count(),
        partitions = parts.len(),
        column = %spec.name,
        "evaluated window aggregate"
    );

    let data = typed_column(&spec.name, spec.column_type, out)?;
    sorted.with_column(spec.name.clone(), data)
}

/// Append one column computed by a ranking-style window function, which sees
/// the partition, frame extent, and current row directly.
pub fn extend_window_func<F>(
    table: &Table,
    window: &Window,
    name: &str,
    column_type: ColumnType,
    func: F,
) -> Result<Table>
where
    F: Fn(&WindowCtx<'_>) -> std::result::Result<Value, DynError>,
{
    let (sorted, parts) = sort_and_partition(table, window)?;
    let (from_delta, to_delta) = frame_deltas(&window.frame)?;

    let mut out = Vec::with_capacity(sorted.row_count());
    for part in &parts {
        let axis = order_axis_for_frame(&sorted, window, part)?;
        for pos in 0..part.len() {
            let rel = frame_extent(&window.frame, from_delta, to_delta, &axis, pos, part.len())?;
            let ctx = WindowCtx {
                table: &sorted,
                partition: part.clone(),
                frame: (part.start + rel.start)..(part.start + rel.end),
                row: part.start + pos,
                sort_keys: &window.sort_keys,
            };
            out.push(func(&ctx).map_err(Error::eval)?);
        }
    }

    let data = typed_column(name, column_type, out)?;
    sorted.with_column(name.to_string(), data)
}

/// One combined stable sort (partition keys prepended to sort keys), then
/// contiguous partition ranges by partition-key equality. No partition keys
/// means a single partition spanning the table.
fn sort_and_partition(table: &Table, window: &Window) -> Result<(Table, Vec<Range<usize>>)> {
    let mut keys: Vec<SortKey> = window
        .partitions
        .iter()
        .map(|p| SortKey::asc(p.as_str()))
        .collect();
    keys.extend(window.sort_keys.iter().cloned());
    let (sorted, _) = table.sort_by(&keys)?;

    let n = sorted.row_count();
    if n == 0 {
        return Ok((sorted, Vec::new()));
    }
    if window.partitions.is_empty() {
        return Ok((sorted, vec![0..n]));
    }

    let names: Vec<&str> = window.partitions.iter().map(String::as_str).collect();
    let pcols = sorted.resolve_names(&names)?;
    let part_keys: Vec<RowKey> = (0..n).map(|r| sorted.key_at(&pcols, r)).collect();

    let mut parts = Vec::new();
    let mut start = 0;
    for r in 1..=n {
        if r == n || part_keys[r] != part_keys[start] {
            parts.push(start..r);
            start = r;
        }
    }
    Ok((sorted, parts))
}

/// Value deltas for range frames, resolved once per call. `None` marks an
/// unbounded side. Rows frames carry no deltas; mixing interval offsets into
/// the wrong frame kind is a schema error.
fn frame_deltas(frame: &Frame) -> Result<(Option<f64>, Option<f64>)> {
    match frame {
        Frame::Rows { from, to } => {
            for bound in [from, to] {
                if matches!(bound, Bound::IntervalOffset(..)) {
                    return Err(Error::schema(
                        "interval offset is not valid in a rows frame".to_string(),
                    ));
                }
            }
            Ok((None, None))
        }
        Frame::Range { from, to } => Ok((range_delta(from)?, range_delta(to)?)),
        Frame::RangeInterval { from, to } => Ok((interval_delta(from)?, interval_delta(to)?)),
    }
}

fn range_delta(bound: &Bound) -> Result<Option<f64>> {
    match bound {
        Bound::Unbounded => Ok(None),
        Bound::Offset(o) => Ok(Some(*o as f64)),
        Bound::IntervalOffset(..) => Err(Error::schema(
            "interval offset is not valid in a plain range frame; use a range-interval frame"
                .to_string(),
        )),
    }
}

fn interval_delta(bound: &Bound) -> Result<Option<f64>> {
    match bound {
        Bound::Unbounded => Ok(None),
        Bound::IntervalOffset(v, unit) => Ok(Some((v * unit.as_seconds()) as f64)),
        Bound::Offset(_) => Err(Error::schema(
            "range-interval frame requires interval offsets".to_string(),
        )),
    }
}

/// Ordering-column values for one partition, direction-adjusted so larger
/// always means later, `None` for null cells. Empty for rows frames.
fn order_axis_for_frame(
    sorted: &Table,
    window: &Window,
    part: &Range<usize>,
) -> Result<Vec<Option<f64>>> {
    if matches!(window.frame, Frame::Rows { .. }) {
        return Ok(Vec::new());
    }
    if window.sort_keys.len() != 1 {
        return Err(Error::schema(
            "range frame requires exactly one sort key".to_string(),
        ));
    }
    let key = &window.sort_keys[0];
    let idx = sorted
        .column_index(&key.column)
        .ok_or_else(|| Error::schema(format!("sort column '{}' not found", key.column)))?;
    let col = sorted.column_at(idx);
    if !col.column_type().is_numeric() {
        return Err(Error::schema(format!(
            "range frame requires a numeric sort column, '{}' is {}",
            key.column,
            col.column_type()
        )));
    }
    let sign = match key.direction {
        tessera_core::Direction::Asc => 1.0,
        tessera_core::Direction::Desc => -1.0,
    };
    Ok(part
        .clone()
        .map(|r| col.value(r).as_f64().map(|v| v * sign))
        .collect())
}

/// Partition-relative extent of the frame for the row at `pos`, as an
/// exclusive range; empty when the frame reaches past its partition.
fn frame_extent(
    frame: &Frame,
    from_delta: Option<f64>,
    to_delta: Option<f64>,
    axis: &[Option<f64>],
    pos: usize,
    size: usize,
) -> Result<Range<usize>> {
    match frame {
        Frame::Rows { from, to } => rows_extent(from, to, pos, size),
        Frame::Range { .. } | Frame::RangeInterval { .. } => {
            Ok(range_extent(from_delta, to_delta, axis, pos))
        }
    }
}

fn rows_extent(from: &Bound, to: &Bound, pos: usize, size: usize) -> Result<Range<usize>> {
    let lo: i64 = match from {
        Bound::Unbounded => 0,
        Bound::Offset(o) => (pos as i64 + o).max(0),
        Bound::IntervalOffset(..) => {
            return Err(Error::schema(
                "interval offset is not valid in a rows frame".to_string(),
            ))
        }
    };
    let hi: i64 = match to {
        Bound::Unbounded => size as i64 - 1,
        Bound::Offset(o) => (pos as i64 + o).min(size as i64 - 1),
        Bound::IntervalOffset(..) => {
            return Err(Error::schema(
                "interval offset is not valid in a rows frame".to_string(),
            ))
        }
    };
    if hi < lo {
        return Ok(0..0);
    }
    Ok(lo as usize..(hi + 1) as usize)
}

/// Peer-inclusive extent: the contiguous run of rows whose ordering value
/// lies within `[current + from_delta, current + to_delta]`. Rows with a
/// null ordering value join only unbounded sides; a null current value
/// widens the frame to the whole partition.
fn range_extent(
    from_delta: Option<f64>,
    to_delta: Option<f64>,
    axis: &[Option<f64>],
    pos: usize,
) -> Range<usize> {
    let size = axis.len();
    let cur = match axis[pos] {
        Some(v) => v,
        None => return 0..size,
    };
    let lo = match from_delta {
        None => 0,
        Some(d) => {
            let bound = cur + d;
            match (0..size).find(|&i| axis[i].map_or(false, |v| v >= bound)) {
                Some(i) => i,
                None => return 0..0,
            }
        }
    };
    let hi = match to_delta {
        None => size - 1,
        Some(d) => {
            let bound = cur + d;
            match (0..size).rev().find(|&i| axis[i].map_or(false, |v| v <= bound)) {
                Some(i) => i,
                None => return 0..0,
            }
        }
    };
    if hi < lo {
        0..0
    } else {
        lo..hi + 1
    }
}
