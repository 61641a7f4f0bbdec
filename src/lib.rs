#![forbid(unsafe_code)]
//! tessera: an embedded, in-memory relational-algebra execution engine.
//!
//! A columnar table ([`Table`]) plus the fixed operator set a query compiler
//! threads tables through: map, filter, select, project, join, sort,
//! distinct, group-by, extend, and window functions. This facade re-exports
//! the workspace crates; see `tessera-core`, `tessera-tds`, and
//! `tessera-operators` for the pieces.

pub use tessera_core::{
    tuple_cmp, value_cmp, ColumnType, Direction, DynError, Error, Field, Result, Schema, SortKey,
    Value,
};
pub use tessera_operators::{
    aggregates, concatenate, distinct, drop, extend, extend_window_agg, extend_window_func,
    filter, group_by, join, limit, map, project, ranking, rename, select, AggregationSpec, Bound,
    DurationUnit, ExtendSpec, Frame, JoinKind, ProjectSpec, ReduceFn, RowFn, Window, WindowCtx,
    WindowFn,
};
pub use tessera_tds::{Column, ColumnData, RowView, Table, TableBuilder};
