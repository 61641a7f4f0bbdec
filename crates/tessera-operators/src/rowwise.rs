//! Row-wise operators: map, filter, extend, project.

use std::collections::HashSet;

use tessera_core::{ColumnType, DynError, Error, Result, Value};
use tessera_tds::{ColumnData, RowView, Table, TableBuilder};

use crate::specs::{typed_column, ExtendSpec};

/// Evaluate `row_fn` once per row in row order; the result is fully
/// materialized, one value per row.
pub fn map<F>(table: &Table, row_fn: F) -> Result<Vec<Value>>
where
    F: Fn(&RowView<'_>) -> std::result::Result<Value, DynError>,
{
    let mut out = Vec::with_capacity(table.row_count());
    for r in 0..table.row_count() {
        out.push(row_fn(&RowView::new(table, r)).map_err(Error::eval)?);
    }
    Ok(out)
}

/// Keep rows for which the predicate returns true, preserving row order.
pub fn filter<F>(table: &Table, predicate: F) -> Result<Table>
where
    F: Fn(&RowView<'_>) -> std::result::Result<bool, DynError>,
{
    let mut dropped = HashSet::new();
    for r in 0..table.row_count() {
        if !predicate(&RowView::new(table, r)).map_err(Error::eval)? {
            dropped.insert(r);
        }
    }
    Ok(table.drop_rows(&dropped))
}

/// Append one computed column per spec, in the caller-given order. Each spec
/// runs over the table as it exists after the previous specs in the same
/// call, so later specs can reference earlier outputs.
pub fn extend(table: &Table, specs: &[ExtendSpec]) -> Result<Table> {
    let mut current = table.clone();
    for spec in specs {
        let mut values = Vec::with_capacity(current.row_count());
        for r in 0..current.row_count() {
            values.push(spec.eval(&RowView::new(&current, r))?);
        }
        let data = typed_column(&spec.name, spec.column_type, values)?;
        current = current.with_column(spec.name.clone(), data)?;
    }
    Ok(current)
}

/// Column spec over an arbitrary source record type, used by [`project`].
/// The function returns a collection; the single-row table takes its first
/// value, and an empty collection marks the whole row null.
pub struct ProjectSpec<S> {
    pub name: String,
    pub column_type: ColumnType,
    #[allow(clippy::type_complexity)]
    source_fn: Box<dyn Fn(&S) -> std::result::Result<Vec<Value>, DynError> + Send + Sync>,
}

impl<S> ProjectSpec<S> {
    pub fn new<F>(name: impl Into<String>, column_type: ColumnType, source_fn: F) -> Self
    where
        F: Fn(&S) -> std::result::Result<Vec<Value>, DynError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            column_type,
            source_fn: Box::new(source_fn),
        }
    }

    fn eval(&self, source: &S) -> Result<Vec<Value>> {
        (self.source_fn)(source).map_err(Error::eval)
    }
}

/// Build one single-row table per source object and concatenate them. An
/// object for which any spec yields an empty collection produces an all-null
/// row rather than failing.
pub fn project<S>(objects: &[S], specs: &[ProjectSpec<S>]) -> Result<Table> {
    let mut acc = {
        let mut builder = TableBuilder::new();
        for spec in specs {
            builder.add_column(spec.name.clone(), ColumnData::new(spec.column_type))?;
        }
        builder.finish()
    };

    for object in objects {
        let mut builder = TableBuilder::new();
        let mut any_empty = false;
        for spec in specs {
            let collected = spec.eval(object)?;
            if collected.is_empty() {
                any_empty = true;
            }
            let value = collected.into_iter().next().unwrap_or(Value::Null);
            let data = typed_column(&spec.name, spec.column_type, vec![value])?;
            builder.add_column(spec.name.clone(), data)?;
        }
        let mut row = builder.finish();
        if any_empty {
            row = row.with_all_null();
        }
        acc = acc.concatenate(&row)?;
    }
    Ok(acc)
}
