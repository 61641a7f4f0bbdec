//! Convenient re-exports for downstream crates.

pub use crate::error::{DynError, Error, Result};
pub use crate::hash::{row_key, RowKey};
pub use crate::schema::{Field, Schema};
pub use crate::sort::{Direction, SortKey};
pub use crate::value::{tuple_cmp, value_cmp, ColumnType, Value};
