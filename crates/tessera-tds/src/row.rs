//! Read-only view of one logical row.

use tessera_core::{Error, Result, Value};

use crate::table::Table;

/// A `(table, index)` pair giving named-field access to one row. This is the
/// only surface user-supplied row functions see; it never owns data and its
/// lifetime is bounded by the table's.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    table: &'a Table,
    row: usize,
}

impl<'a> RowView<'a> {
    pub fn new(table: &'a Table, row: usize) -> Self {
        debug_assert!(row < table.row_count());
        Self { table, row }
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }

    pub fn index(&self) -> usize {
        self.row
    }

    /// Cell of the named column at this row; a missing column is a caller
    /// contract violation surfaced as a schema error.
    pub fn field(&self, name: &str) -> Result<Value> {
        let idx = self
            .table
            .column_index(name)
            .ok_or_else(|| Error::schema(format!("column '{name}' not found")))?;
        Ok(self.table.value(idx, self.row))
    }
}
