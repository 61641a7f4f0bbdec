//! The immutable table value and its consuming builder.
//!
//! Invariants: all columns share one row count, column names are unique, and
//! a table handed to a caller is never mutated again. Operators that need to
//! append a column do so via [`Table::with_column`], which produces a new
//! table; unchanged columns are shared by `Arc` between source and derived
//! tables.

use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use tessera_core::hash::{row_key, RowKey};
use tessera_core::{tuple_cmp, value_cmp, Direction, Error, Field, Result, Schema, SortKey, Value};

use crate::column::{Column, ColumnData};

/// Mutable assembly stage of a table. `finish` consumes the builder, so no
/// operator ever receives a half-built table.
#[derive(Debug, Default)]
pub struct TableBuilder {
    columns: Vec<Column>,
    row_count: Option<usize>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fully-populated column. The first column establishes the row
    /// count; later columns must match it, and names must be unique.
    pub fn add_column(&mut self, name: impl Into<String>, data: ColumnData) -> Result<()> {
        let name = name.into();
        if self.columns.iter().any(|c| c.name() == name) {
            return Err(Error::schema(format!("duplicate column name '{name}'")));
        }
        match self.row_count {
            None => self.row_count = Some(data.len()),
            Some(expected) if data.len() != expected => {
                return Err(Error::schema(format!(
                    "column '{name}' has {} rows, table has {expected}",
                    data.len()
                )));
            }
            Some(_) => {}
        }
        self.columns.push(Column::new(name, data));
        Ok(())
    }

    /// Type-checked convenience over [`TableBuilder::add_column`].
    pub fn add_values(
        &mut self,
        name: impl Into<String>,
        column_type: tessera_core::ColumnType,
        values: Vec<Value>,
    ) -> Result<()> {
        let name = name.into();
        let data = ColumnData::from_values(column_type, values).map_err(|actual| Error::Type {
            column: name.clone(),
            expected: column_type.name(),
            actual,
        })?;
        self.add_column(name, data)
    }

    pub fn finish(self) -> Table {
        Table {
            row_count: self.row_count.unwrap_or(0),
            columns: self.columns.into_iter().map(Arc::new).collect(),
        }
    }
}

/// The tabular data structure: ordered named columns over a shared row count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableRepr")]
pub struct Table {
    columns: Vec<Arc<Column>>,
    row_count: usize,
}

/// Raw wire shape of a table; deserialization goes through [`TryFrom`] so a
/// decoded table upholds the same invariants the builder enforces.
#[derive(Deserialize)]
struct TableRepr {
    columns: Vec<Arc<Column>>,
    row_count: usize,
}

impl TryFrom<TableRepr> for Table {
    type Error = Error;

    fn try_from(repr: TableRepr) -> Result<Self> {
        let mut names = HashSet::new();
        for col in &repr.columns {
            if !names.insert(col.name()) {
                return Err(Error::schema(format!(
                    "duplicate column name '{}'",
                    col.name()
                )));
            }
            if col.len() != repr.row_count {
                return Err(Error::schema(format!(
                    "column '{}' has {} rows, table has {}",
                    col.name(),
                    col.len(),
                    repr.row_count
                )));
            }
        }
        Ok(Table {
            columns: repr.columns,
            row_count: repr.row_count,
        })
    }
}

impl Table {
    pub fn builder() -> TableBuilder {
        TableBuilder::new()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().map(|c| c.as_ref())
    }

    pub fn column_at(&self, idx: usize) -> &Column {
        &self.columns[idx]
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|i| self.column_at(i))
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn schema(&self) -> Schema {
        Schema::new(self.columns.iter().map(|c| c.field.clone()).collect())
    }

    pub fn value(&self, column: usize, row: usize) -> Value {
        self.columns[column].value(row)
    }

    /// New table appending one computed column; errors on duplicate name or
    /// length mismatch. Existing columns are shared, not copied.
    pub fn with_column(&self, name: impl Into<String>, data: ColumnData) -> Result<Table> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(Error::schema(format!("duplicate column name '{name}'")));
        }
        if !self.columns.is_empty() && data.len() != self.row_count {
            return Err(Error::schema(format!(
                "column '{name}' has {} rows, table has {}",
                data.len(),
                self.row_count
            )));
        }
        let row_count = if self.columns.is_empty() {
            data.len()
        } else {
            self.row_count
        };
        let mut columns = self.columns.clone();
        columns.push(Arc::new(Column::new(name, data)));
        Ok(Table { columns, row_count })
    }

    /// Restrict to the named columns, preserving their original relative
    /// order (not the order of `names`).
    pub fn select_columns(&self, names: &[&str]) -> Result<Table> {
        let keep = self.resolve_name_set(names)?;
        Ok(Table {
            columns: self
                .columns
                .iter()
                .enumerate()
                .filter(|(i, _)| keep.contains(i))
                .map(|(_, c)| Arc::clone(c))
                .collect(),
            row_count: self.row_count,
        })
    }

    /// Drop the named columns, preserving the remainder's relative order.
    pub fn remove_columns(&self, names: &[&str]) -> Result<Table> {
        let drop = self.resolve_name_set(names)?;
        Ok(Table {
            columns: self
                .columns
                .iter()
                .enumerate()
                .filter(|(i, _)| !drop.contains(i))
                .map(|(_, c)| Arc::clone(c))
                .collect(),
            row_count: self.row_count,
        })
    }

    /// Rename one column; fails if `old` is absent or `new` already taken.
    pub fn rename(&self, old: &str, new: &str) -> Result<Table> {
        let idx = self
            .column_index(old)
            .ok_or_else(|| Error::schema(format!("column '{old}' not found")))?;
        if self.has_column(new) {
            return Err(Error::schema(format!("duplicate column name '{new}'")));
        }
        let mut columns = self.columns.clone();
        columns[idx] = Arc::new(Column {
            field: Field::new(new, columns[idx].column_type()),
            data: columns[idx].data.clone(),
        });
        Ok(Table {
            columns,
            row_count: self.row_count,
        })
    }

    /// Rows `[start, stop)`, clamped to the table; `stop < start` yields an
    /// empty table rather than an error.
    pub fn slice(&self, start: usize, stop: usize) -> Table {
        let start = start.min(self.row_count);
        let stop = stop.min(self.row_count);
        if stop <= start {
            return self.gather(&[]);
        }
        let rows: Vec<usize> = (start..stop).collect();
        self.gather(&rows)
    }

    /// New table omitting the given row indices, remainder order preserved.
    pub fn drop_rows(&self, drop: &HashSet<usize>) -> Table {
        let rows: Vec<usize> = (0..self.row_count).filter(|r| !drop.contains(r)).collect();
        self.gather(&rows)
    }

    /// Row-wise union with an identically-signed table, `self` rows first.
    pub fn concatenate(&self, other: &Table) -> Result<Table> {
        if self.schema() != other.schema() {
            return Err(Error::schema(
                "concatenate requires identical column names and types in the same order"
                    .to_string(),
            ));
        }
        let columns = self
            .columns
            .iter()
            .zip(other.columns.iter())
            .map(|(a, b)| {
                let mut data = a.data.clone();
                data.extend_from(&b.data);
                Arc::new(Column {
                    field: a.field.clone(),
                    data,
                })
            })
            .collect();
        Ok(Table {
            columns,
            row_count: self.row_count + other.row_count,
        })
    }

    /// One row per distinct combination of the named columns, keeping the
    /// first occurrence's full row (stable, order of first appearance).
    pub fn distinct_on(&self, names: &[&str]) -> Result<Table> {
        let key_cols = self.resolve_names(names)?;
        let mut seen: HashSet<RowKey> = HashSet::new();
        let mut rows = Vec::new();
        for r in 0..self.row_count {
            if seen.insert(self.key_at(&key_cols, r)) {
                rows.push(r);
            }
        }
        Ok(self.gather(&rows))
    }

    /// Stable multi-key sort. Returns the sorted table together with the
    /// contiguous `[start, end)` ranges of equal-key rows, computed in the
    /// same pass; group-by consumes the ranges directly.
    pub fn sort_by(&self, keys: &[SortKey]) -> Result<(Table, Vec<Range<usize>>)> {
        let key_cols: Vec<usize> = keys
            .iter()
            .map(|k| {
                self.column_index(&k.column)
                    .ok_or_else(|| Error::schema(format!("sort column '{}' not found", k.column)))
            })
            .collect::<Result<_>>()?;

        let tuples: Vec<Vec<Value>> = (0..self.row_count)
            .map(|r| key_cols.iter().map(|&c| self.columns[c].value(r)).collect())
            .collect();

        let mut order: Vec<usize> = (0..self.row_count).collect();
        order.sort_by(|&a, &b| {
            for ((x, y), key) in tuples[a].iter().zip(tuples[b].iter()).zip(keys.iter()) {
                let ord = match key.direction {
                    Direction::Asc => value_cmp(x, y),
                    Direction::Desc => value_cmp(x, y).reverse(),
                };
                if ord != std::cmp::Ordering::Equal {
                    return ord;
                }
            }
            // Ties keep original order; sort_by is stable.
            std::cmp::Ordering::Equal
        });

        let sorted = self.gather(&order);

        let mut ranges = Vec::new();
        let mut start = 0;
        for r in 1..=self.row_count {
            if r == self.row_count
                || tuple_cmp(&tuples[order[r]], &tuples[order[start]])
                    != std::cmp::Ordering::Equal
            {
                ranges.push(start..r);
                start = r;
            }
        }
        Ok((sorted, ranges))
    }

    /// Full cross product with `other`, left-major row order: row
    /// `l * other.row_count + r` pairs left row `l` with right row `r`.
    /// Column names must not collide.
    pub fn cross_join(&self, other: &Table) -> Result<Table> {
        for col in other.columns() {
            if self.has_column(col.name()) {
                return Err(Error::schema(format!(
                    "cross join column name collision on '{}'",
                    col.name()
                )));
            }
        }
        let (nl, nr) = (self.row_count, other.row_count);
        let mut left_rows = Vec::with_capacity(nl * nr);
        let mut right_rows = Vec::with_capacity(nl * nr);
        for l in 0..nl {
            for r in 0..nr {
                left_rows.push(l);
                right_rows.push(r);
            }
        }
        let mut columns: Vec<Arc<Column>> = self
            .columns
            .iter()
            .map(|c| {
                Arc::new(Column {
                    field: c.field.clone(),
                    data: c.data.gather(&left_rows),
                })
            })
            .collect();
        columns.extend(other.columns.iter().map(|c| {
            Arc::new(Column {
                field: c.field.clone(),
                data: c.data.gather(&right_rows),
            })
        }));
        Ok(Table {
            columns,
            row_count: nl * nr,
        })
    }

    /// Same shape, every cell null.
    pub fn with_all_null(&self) -> Table {
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| {
                    Arc::new(Column {
                        field: c.field.clone(),
                        data: ColumnData::all_null(c.column_type(), self.row_count),
                    })
                })
                .collect(),
            row_count: self.row_count,
        }
    }

    /// New table whose rows are `rows` of `self`, in that order.
    pub fn gather(&self, rows: &[usize]) -> Table {
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| {
                    Arc::new(Column {
                        field: c.field.clone(),
                        data: c.data.gather(rows),
                    })
                })
                .collect(),
            row_count: rows.len(),
        }
    }

    /// Digest of the given columns' cells at `row`, usable as a map key.
    pub fn key_at(&self, columns: &[usize], row: usize) -> RowKey {
        let values: Vec<Value> = columns.iter().map(|&c| self.columns[c].value(row)).collect();
        row_key(&values)
    }

    /// Resolve column names to indices, erroring on any missing name.
    pub fn resolve_names(&self, names: &[&str]) -> Result<Vec<usize>> {
        names
            .iter()
            .map(|n| {
                self.column_index(n)
                    .ok_or_else(|| Error::schema(format!("column '{n}' not found")))
            })
            .collect()
    }

    fn resolve_name_set(&self, names: &[&str]) -> Result<HashSet<usize>> {
        // Map first so duplicates in `names` collapse rather than error.
        let mut set = HashSet::new();
        let mut by_name: HashMap<&str, usize> = HashMap::new();
        for (i, c) in self.columns.iter().enumerate() {
            by_name.insert(c.name(), i);
        }
        for n in names {
            let idx = by_name
                .get(n)
                .ok_or_else(|| Error::schema(format!("column '{n}' not found")))?;
            set.insert(*idx);
        }
        Ok(set)
    }
}
