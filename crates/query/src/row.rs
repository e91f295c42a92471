//! Decoded rows and the column maps callers write.

use indexmap::IndexMap;
use pillar_core::Value;

/// Ordered mapping from column (or super column) name to its cell, in the
/// order the store returned or the caller supplied them.
pub type ColumnMap = IndexMap<Value, Cell>;

/// A row as returned to callers.
pub type DecodedRow = ColumnMap;

/// The content of one named entry of a row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    /// A decoded value.
    Value(Value),
    /// A decoded value with its write timestamp in microseconds.
    Timestamped { value: Value, timestamp: i64 },
    /// The sub-columns of a super column.
    Nested(ColumnMap),
}

impl Cell {
    /// Returns the scalar value, with or without timestamp.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Cell::Value(v) | Cell::Timestamped { value: v, .. } => Some(v),
            Cell::Nested(_) => None,
        }
    }

    /// Returns the write timestamp if one was requested.
    pub fn timestamp(&self) -> Option<i64> {
        match self {
            Cell::Timestamped { timestamp, .. } => Some(*timestamp),
            _ => None,
        }
    }

    /// Returns the sub-columns of a super column.
    pub fn as_nested(&self) -> Option<&ColumnMap> {
        match self {
            Cell::Nested(map) => Some(map),
            _ => None,
        }
    }
}

macro_rules! cell_from_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Cell {
                fn from(v: $t) -> Self {
                    Cell::Value(v.into())
                }
            }
        )*
    };
}

cell_from_scalar!(Value, &str, String, Vec<u8>, &[u8], i64, i32, u32);

impl From<ColumnMap> for Cell {
    fn from(map: ColumnMap) -> Self {
        Cell::Nested(map)
    }
}

/// Builds a column map from name/value pairs, keeping their order.
pub fn columns<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> ColumnMap
where
    K: Into<Value>,
    V: Into<Cell>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
