//! Column-synthesis and aggregation specs.
//!
//! Row and reduce functions are opaque closures supplied by the compiler.
//! Their contracts: a row function sees one [`RowView`] and returns a value
//! whose runtime type must match the spec's declared type exactly; a reduce
//! function sees the group's mapped values in row order. Any error they
//! return aborts the operator with the original cause attached.

use tessera_core::{ColumnType, DynError, Error, Result, Value};
use tessera_tds::{ColumnData, RowView};

pub type RowFn = Box<dyn Fn(&RowView<'_>) -> std::result::Result<Value, DynError> + Send + Sync>;
pub type ReduceFn = Box<dyn Fn(&[Value]) -> std::result::Result<Value, DynError> + Send + Sync>;

/// (output name, per-row function, declared output type).
pub struct ExtendSpec {
    pub name: String,
    pub column_type: ColumnType,
    row_fn: RowFn,
}

impl ExtendSpec {
    pub fn new<F>(name: impl Into<String>, column_type: ColumnType, row_fn: F) -> Self
    where
        F: Fn(&RowView<'_>) -> std::result::Result<Value, DynError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            column_type,
            row_fn: Box::new(row_fn),
        }
    }

    pub fn eval(&self, row: &RowView<'_>) -> Result<Value> {
        (self.row_fn)(row).map_err(Error::eval)
    }
}

impl std::fmt::Debug for ExtendSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtendSpec")
            .field("name", &self.name)
            .field("column_type", &self.column_type)
            .finish_non_exhaustive()
    }
}

/// (output name, per-row "map" function, per-group "reduce" function,
/// declared output type).
pub struct AggregationSpec {
    pub name: String,
    pub column_type: ColumnType,
    map_fn: RowFn,
    reduce_fn: ReduceFn,
}

impl AggregationSpec {
    pub fn new<M, R>(
        name: impl Into<String>,
        column_type: ColumnType,
        map_fn: M,
        reduce_fn: R,
    ) -> Self
    where
        M: Fn(&RowView<'_>) -> std::result::Result<Value, DynError> + Send + Sync + 'static,
        R: Fn(&[Value]) -> std::result::Result<Value, DynError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            column_type,
            map_fn: Box::new(map_fn),
            reduce_fn: Box::new(reduce_fn),
        }
    }

    pub fn eval_map(&self, row: &RowView<'_>) -> Result<Value> {
        (self.map_fn)(row).map_err(Error::eval)
    }

    pub fn eval_reduce(&self, values: &[Value]) -> Result<Value> {
        (self.reduce_fn)(values).map_err(Error::eval)
    }
}

impl std::fmt::Debug for AggregationSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregationSpec")
            .field("name", &self.name)
            .field("column_type", &self.column_type)
            .finish_non_exhaustive()
    }
}

/// Materialize values into a typed column, enforcing the declared type.
pub(crate) fn typed_column(
    name: &str,
    column_type: ColumnType,
    values: Vec<Value>,
) -> Result<ColumnData> {
    ColumnData::from_values(column_type, values).map_err(|actual| Error::Type {
        column: name.to_string(),
        expected: column_type.name(),
        actual,
    })
}
