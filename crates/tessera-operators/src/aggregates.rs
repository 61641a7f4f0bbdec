//! Stock aggregation specs over a named column.
//!
//! Nulls are skipped by every aggregate except `count`, which counts rows.
//! An aggregate over no surviving values yields null (count yields 0); this
//! matters for empty window frames, since group-by groups are never empty.

use tessera_core::{value_cmp, ColumnType, Value};

use crate::specs::AggregationSpec;

/// Row count of the group, nulls included.
pub fn count(alias: &str) -> AggregationSpec {
    AggregationSpec::new(
        alias,
        ColumnType::Int,
        |_row| Ok(Value::Int(1)),
        |values| Ok(Value::Int(values.len() as i64)),
    )
}

/// Sum of a column. The declared output type picks the accumulator: `Int`
/// sums integers exactly, `Float` sums any numeric values as f64.
pub fn sum(column: &str, alias: &str, column_type: ColumnType) -> AggregationSpec {
    let col = column.to_string();
    AggregationSpec::new(
        alias,
        column_type,
        move |row| Ok(row.field(&col)?),
        move |values| match column_type {
            ColumnType::Int => {
                let mut acc: Option<i64> = None;
                for v in values {
                    match v {
                        Value::Null => {}
                        Value::Int(i) => *acc.get_or_insert(0) += i,
                        other => {
                            return Err(format!(
                                "sum expected integer values, got {}",
                                other.kind_name()
                            )
                            .into())
                        }
                    }
                }
                Ok(acc.map_or(Value::Null, Value::Int))
            }
            ColumnType::Float => {
                let mut acc: Option<f64> = None;
                for v in values {
                    if v.is_null() {
                        continue;
                    }
                    match v.as_f64() {
                        Some(f) => *acc.get_or_insert(0.0) += f,
                        None => {
                            return Err(format!(
                                "sum expected numeric values, got {}",
                                v.kind_name()
                            )
                            .into())
                        }
                    }
                }
                Ok(acc.map_or(Value::Null, Value::Float))
            }
            ColumnType::Str => Err("sum requires a numeric output type".into()),
        },
    )
}

/// Arithmetic mean of a column's non-null values, always a float.
pub fn avg(column: &str, alias: &str) -> AggregationSpec {
    let col = column.to_string();
    AggregationSpec::new(
        alias,
        ColumnType::Float,
        move |row| Ok(row.field(&col)?),
        |values| {
            let mut acc = 0.0;
            let mut n = 0usize;
            for v in values {
                if v.is_null() {
                    continue;
                }
                match v.as_f64() {
                    Some(f) => {
                        acc += f;
                        n += 1;
                    }
                    None => {
                        return Err(
                            format!("avg expected numeric values, got {}", v.kind_name()).into()
                        )
                    }
                }
            }
            if n == 0 {
                Ok(Value::Null)
            } else {
                Ok(Value::Float(acc / n as f64))
            }
        },
    )
}

/// Smallest non-null value by the engine's total value order.
pub fn min(column: &str, alias: &str, column_type: ColumnType) -> AggregationSpec {
    extremum(column, alias, column_type, std::cmp::Ordering::Less)
}

/// Largest non-null value by the engine's total value order.
pub fn max(column: &str, alias: &str, column_type: ColumnType) -> AggregationSpec {
    extremum(column, alias, column_type, std::cmp::Ordering::Greater)
}

fn extremum(
    column: &str,
    alias: &str,
    column_type: ColumnType,
    keep: std::cmp::Ordering,
) -> AggregationSpec {
    let col = column.to_string();
    AggregationSpec::new(
        alias,
        column_type,
        move |row| Ok(row.field(&col)?),
        move |values| {
            let mut best: Option<&Value> = None;
            for v in values {
                if v.is_null() {
                    continue;
                }
                best = match best {
                    None => Some(v),
                    Some(b) if value_cmp(v, b) == keep => Some(v),
                    Some(b) => Some(b),
                };
            }
            Ok(best.cloned().unwrap_or(Value::Null))
        },
    )
}
