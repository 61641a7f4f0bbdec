#![forbid(unsafe_code)]
//! tessera-operators: the relational operator set a query compiler threads
//! tables through.
//!
//! Design intent:
//! - Every operator is a pure, synchronous function: it consumes tables and
//!   user-supplied row/reduce closures and returns exactly one new table.
//! - Failures are fatal and carry no partial result.
//! - The window engine shares the group-by machinery: one combined stable
//!   sort, contiguous partition ranges, per-extent map/reduce.

pub mod aggregates;
pub mod group_by;
pub mod join;
pub mod ranking;
pub mod relational;
pub mod rowwise;
pub mod specs;
pub mod window;

pub use group_by::group_by;
pub use join::{join, JoinKind};
pub use relational::{concatenate, distinct, drop, limit, rename, select};
pub use rowwise::{extend, filter, map, project, ProjectSpec};
pub use specs::{AggregationSpec, ExtendSpec, ReduceFn, RowFn};
pub use window::{
    extend_window_agg, extend_window_func, Bound, DurationUnit, Frame, Window, WindowCtx,
    WindowFn,
};
