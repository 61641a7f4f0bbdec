//! Row-key hashing.
//!
//! Distinct and left-join compensation need to treat a tuple of cell values
//! as a set/map key. `Value` holds floats, so it is not `Hash`/`Eq` itself;
//! instead each tuple is hashed into a fixed digest with a kind tag and a
//! length-prefixed payload per value so differently-shaped tuples cannot
//! collide byte-wise.

use crate::value::Value;

/// Digest of one key tuple, usable as a `HashMap`/`HashSet` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowKey([u8; 32]);

/// Hash a tuple of values into a `RowKey`.
pub fn row_key(values: &[Value]) -> RowKey {
    let mut hasher = blake3::Hasher::new();
    for value in values {
        hash_value(&mut hasher, value);
    }
    RowKey(*hasher.finalize().as_bytes())
}

fn hash_value(hasher: &mut blake3::Hasher, value: &Value) {
    // Kind tag first, so Int(0) and Float(0.0) stay distinct keys.
    hasher.update(&[kind_tag(value)]);
    match value {
        Value::Null => {}
        Value::Int(v) => {
            hasher.update(&v.to_le_bytes());
        }
        Value::Float(v) => {
            // Canonicalize so keys agree with `value_cmp`: -0.0 keys as 0.0
            // and every NaN bit pattern keys alike.
            let bits = if v.is_nan() {
                f64::NAN.to_bits()
            } else {
                (v + 0.0).to_bits()
            };
            hasher.update(&bits.to_le_bytes());
        }
        Value::Str(s) => {
            hasher.update(&(s.len() as u64).to_le_bytes());
            hasher.update(s.as_bytes());
        }
    }
}

fn kind_tag(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Int(_) => 1,
        Value::Float(_) => 2,
        Value::Str(_) => 3,
    }
}
