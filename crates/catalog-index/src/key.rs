//! Totally ordered keys for field postings.

use std::cmp::Ordering;

use serde_json::Value;

use catalog_types::IndexError;

/// An indexable field value with a total order.
///
/// Booleans sort before numbers, numbers before strings. Numbers compare
/// across `Int`/`Float` by `f64::total_cmp`; JSON numbers exclude NaN, so
/// the order stays total.
#[derive(Debug, Clone)]
pub enum IndexKey {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl IndexKey {
    /// Convert an extracted value into a key.
    ///
    /// Null, arrays, and objects are not indexable as field values.
    pub fn from_value(value: &Value) -> Result<Self, IndexError> {
        match value {
            Value::Bool(b) => Ok(IndexKey::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(IndexKey::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(IndexKey::Float(f))
                } else {
                    Err(IndexError::UnsupportedValue(format!(
                        "number {n} is not representable"
                    )))
                }
            }
            Value::String(s) => Ok(IndexKey::Str(s.clone())),
            other => Err(IndexError::UnsupportedValue(format!(
                "field values must be scalar, got {other}"
            ))),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            IndexKey::Bool(_) => 0,
            IndexKey::Int(_) | IndexKey::Float(_) => 1,
            IndexKey::Str(_) => 2,
        }
    }
}

impl PartialEq for IndexKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for IndexKey {}

impl PartialOrd for IndexKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexKey {
    fn cmp(&self, other: &Self) -> Ordering {
        use IndexKey::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Int(a), Float(b)) => (*a as f64).total_cmp(b),
            (Float(a), Int(b)) => a.total_cmp(&(*b as f64)),
            (Str(a), Str(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}
