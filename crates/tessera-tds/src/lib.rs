#![forbid(unsafe_code)]
//! tessera-tds: the columnar tabular data structure (TDS).
//!
//! A table is an ordered sequence of named, homogeneously typed columns with
//! a shared row count and per-cell validity. Tables are immutable values:
//! they are assembled through a consuming [`TableBuilder`] and every
//! structural operation returns a fresh table, sharing unchanged column
//! arrays with its source where it can.

pub mod column;
pub mod row;
pub mod table;

pub use column::{Column, ColumnData};
pub use row::RowView;
pub use table::{Table, TableBuilder};
