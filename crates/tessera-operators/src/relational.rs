//! Set-style relational operators, thin over the TDS primitives.

use tessera_core::Result;
use tessera_tds::Table;

/// First `n` rows.
pub fn limit(table: &Table, n: usize) -> Table {
    table.slice(0, n)
}

/// All rows after the first `n`.
pub fn drop(table: &Table, n: usize) -> Table {
    table.slice(n, table.row_count())
}

/// Restrict to the named columns, in the table's existing column order.
pub fn select(table: &Table, names: &[&str]) -> Result<Table> {
    table.select_columns(names)
}

/// Rename one column.
pub fn rename(table: &Table, old: &str, new: &str) -> Result<Table> {
    table.rename(old, new)
}

/// One row per distinct combination of the named columns, first occurrence
/// wins.
pub fn distinct(table: &Table, names: &[&str]) -> Result<Table> {
    table.distinct_on(names)
}

/// Signature-checked union of rows, `a`'s rows before `b`'s.
pub fn concatenate(a: &Table, b: &Table) -> Result<Table> {
    a.concatenate(b)
}
