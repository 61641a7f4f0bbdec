//! Typed column storage with per-cell validity.

use serde::{Deserialize, Serialize};

use tessera_core::{ColumnType, Field, Value};

/// Backing array of one column: one homogeneous vector per declared type,
/// `None` marking a null cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnData {
    Str(Vec<Option<String>>),
    Int(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
}

impl ColumnData {
    pub fn new(column_type: ColumnType) -> Self {
        Self::with_capacity(column_type, 0)
    }

    pub fn with_capacity(column_type: ColumnType, capacity: usize) -> Self {
        match column_type {
            ColumnType::Str => ColumnData::Str(Vec::with_capacity(capacity)),
            ColumnType::Int => ColumnData::Int(Vec::with_capacity(capacity)),
            ColumnType::Float => ColumnData::Float(Vec::with_capacity(capacity)),
        }
    }

    /// A fully-null column of the given type and length. Keeps type and
    /// shape while discarding every value.
    pub fn all_null(column_type: ColumnType, len: usize) -> Self {
        match column_type {
            ColumnType::Str => ColumnData::Str(vec![None; len]),
            ColumnType::Int => ColumnData::Int(vec![None; len]),
            ColumnType::Float => ColumnData::Float(vec![None; len]),
        }
    }

    /// Build a column from scalar values, checking each against the declared
    /// type. On mismatch returns the offending value's kind name.
    pub fn from_values(
        column_type: ColumnType,
        values: Vec<Value>,
    ) -> Result<Self, &'static str> {
        let mut data = Self::with_capacity(column_type, values.len());
        for value in values {
            data.push(value)?;
        }
        Ok(data)
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Str(_) => ColumnType::Str,
            ColumnData::Int(_) => ColumnType::Int,
            ColumnData::Float(_) => ColumnType::Float,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Str(v) => v.len(),
            ColumnData::Int(v) => v.len(),
            ColumnData::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, row: usize) -> Value {
        match self {
            ColumnData::Str(v) => v[row].clone().map_or(Value::Null, Value::Str),
            ColumnData::Int(v) => v[row].map_or(Value::Null, Value::Int),
            ColumnData::Float(v) => v[row].map_or(Value::Null, Value::Float),
        }
    }

    /// Append one value; nulls fit any type. On mismatch returns the value's
    /// kind name so the caller can name the column in the error.
    pub fn push(&mut self, value: Value) -> Result<(), &'static str> {
        match (self, value) {
            (ColumnData::Str(v), Value::Null) => v.push(None),
            (ColumnData::Int(v), Value::Null) => v.push(None),
            (ColumnData::Float(v), Value::Null) => v.push(None),
            (ColumnData::Str(v), Value::Str(s)) => v.push(Some(s)),
            (ColumnData::Int(v), Value::Int(i)) => v.push(Some(i)),
            (ColumnData::Float(v), Value::Float(f)) => v.push(Some(f)),
            (_, value) => return Err(value.kind_name()),
        }
        Ok(())
    }

    /// Gather rows by index into a new column of the same type.
    pub fn gather(&self, rows: &[usize]) -> Self {
        match self {
            ColumnData::Str(v) => {
                ColumnData::Str(rows.iter().map(|&r| v[r].clone()).collect())
            }
            ColumnData::Int(v) => ColumnData::Int(rows.iter().map(|&r| v[r]).collect()),
            ColumnData::Float(v) => {
                ColumnData::Float(rows.iter().map(|&r| v[r]).collect())
            }
        }
    }

    /// Append all cells of `other`; both sides must have the same type.
    pub(crate) fn extend_from(&mut self, other: &ColumnData) {
        match (self, other) {
            (ColumnData::Str(a), ColumnData::Str(b)) => a.extend(b.iter().cloned()),
            (ColumnData::Int(a), ColumnData::Int(b)) => a.extend(b.iter().copied()),
            (ColumnData::Float(a), ColumnData::Float(b)) => a.extend(b.iter().copied()),
            _ => unreachable!("extend_from callers check the type signature first"),
        }
    }
}

/// A named, typed column. `data.len()` always equals the owning table's row
/// count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub field: Field,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            field: Field::new(name, data.column_type()),
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.field.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.field.column_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn value(&self, row: usize) -> Value {
        self.data.get(row)
    }
}
