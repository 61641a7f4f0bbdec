//! Scalar values and the closed column-type enum.
//!
//! The engine's type vocabulary is deliberately small: callers map richer
//! domain types down to string/integer/float before handing the engine a
//! row function or a column of data.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Declared type of a column. Matched exhaustively everywhere; there is no
/// "unknown type" fallback at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Str,
    Int,
    Float,
}

impl ColumnType {
    pub fn name(self) -> &'static str {
        match self {
            ColumnType::Str => "string",
            ColumnType::Int => "integer",
            ColumnType::Float => "float",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Int | ColumnType::Float)
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One cell's worth of data, as seen by row and reduce functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The column type this value belongs to; `None` for null, which fits
    /// any column.
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            Value::Null => None,
            Value::Int(_) => Some(ColumnType::Int),
            Value::Float(_) => Some(ColumnType::Float),
            Value::Str(_) => Some(ColumnType::Str),
        }
    }

    /// Name of the runtime kind, used in type-mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
        }
    }

    /// Numeric view for aggregation and range-frame arithmetic.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }
}

/// Total order over values: nulls first, NaN last among floats, mixed kinds
/// fall back to a fixed kind order.
pub fn value_cmp(a: &Value, b: &Value) -> Ordering {
    use Value::*;
    match (a, b) {
        (Null, Null) => Ordering::Equal,
        (Null, _) => Ordering::Less,
        (_, Null) => Ordering::Greater,
        (Int(x), Int(y)) => x.cmp(y),
        (Float(x), Float(y)) => {
            if x.is_nan() && y.is_nan() {
                Ordering::Equal
            } else if x.is_nan() {
                Ordering::Greater
            } else if y.is_nan() {
                Ordering::Less
            } else {
                x.partial_cmp(y).unwrap_or(Ordering::Equal)
            }
        }
        (Str(x), Str(y)) => x.cmp(y),
        _ => kind_order(a).cmp(&kind_order(b)),
    }
}

/// Lexicographic comparison of two key tuples.
pub fn tuple_cmp(a: &[Value], b: &[Value]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match value_cmp(x, y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

fn kind_order(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Int(_) => 1,
        Value::Float(_) => 2,
        Value::Str(_) => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nulls_sort_first_and_nan_last() {
        assert_eq!(value_cmp(&Value::Null, &Value::Int(0)), Ordering::Less);
        assert_eq!(
            value_cmp(&Value::Float(f64::NAN), &Value::Float(1.0)),
            Ordering::Greater
        );
        assert_eq!(
            value_cmp(&Value::Float(f64::NAN), &Value::Float(f64::NAN)),
            Ordering::Equal
        );
    }

    #[test]
    fn tuple_cmp_is_lexicographic() {
        let a = [Value::Str("a".into()), Value::Int(2)];
        let b = [Value::Str("a".into()), Value::Int(3)];
        assert_eq!(tuple_cmp(&a, &b), Ordering::Less);
        assert_eq!(tuple_cmp(&a, &a), Ordering::Equal);
    }
}
