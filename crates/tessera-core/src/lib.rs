#![forbid(unsafe_code)]
//! tessera-core: value and type vocabulary shared by the whole engine.
//!
//! This crate is pure data: scalar values, the closed column-type enum,
//! schemas, sort keys, the fatal error taxonomy, and row-key hashing.
//! No I/O and no table representation here; that lives in `tessera-tds`.

pub mod error;
pub mod hash;
pub mod prelude;
pub mod schema;
pub mod sort;
pub mod value;

pub use error::{DynError, Error, Result};
pub use schema::{Field, Schema};
pub use sort::{Direction, SortKey};
pub use value::{tuple_cmp, value_cmp, ColumnType, Value};
