//! Raw shapes exchanged with the RPC layer.
//!
//! Everything here is already marshalled: names, values and keys are byte
//! strings. Higher layers translate between these shapes and [`Value`]s.
//!
//! [`Value`]: crate::Value

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// Replica acknowledgement level requested for a read or a write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConsistencyLevel {
    #[default]
    One,
    Two,
    Three,
    Quorum,
    LocalQuorum,
    EachQuorum,
    All,
    Any,
}

/// A plain column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    pub name: Vec<u8>,
    pub value: Vec<u8>,
    /// Write time in microseconds since the epoch.
    pub timestamp: i64,
    /// Seconds until expiry.
    pub ttl: Option<i32>,
}

impl Column {
    pub fn new(name: Vec<u8>, value: Vec<u8>, timestamp: i64) -> Self {
        Self {
            name,
            value,
            timestamp,
            ttl: None,
        }
    }

    pub fn with_ttl(mut self, ttl: Option<i32>) -> Self {
        self.ttl = ttl;
        self
    }
}

/// A super column: a named, nested collection of plain columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuperColumn {
    pub name: Vec<u8>,
    pub columns: Vec<Column>,
}

/// A counter column. Counter values are native integers, not byte strings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterColumn {
    pub name: Vec<u8>,
    pub value: i64,
}

/// A super column holding counters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterSuperColumn {
    pub name: Vec<u8>,
    pub columns: Vec<CounterColumn>,
}

/// Which payload of a [`ColumnOrSuperColumn`] is populated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemShape {
    Column,
    SuperColumn,
    CounterColumn,
    CounterSuperColumn,
}

/// One item of a slice response, or the payload of an upsert mutation.
///
/// Exactly one field is populated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnOrSuperColumn {
    pub column: Option<Column>,
    pub super_column: Option<SuperColumn>,
    pub counter_column: Option<CounterColumn>,
    pub counter_super_column: Option<CounterSuperColumn>,
}

impl ColumnOrSuperColumn {
    pub fn column(column: Column) -> Self {
        Self {
            column: Some(column),
            ..Default::default()
        }
    }

    pub fn super_column(super_column: SuperColumn) -> Self {
        Self {
            super_column: Some(super_column),
            ..Default::default()
        }
    }

    pub fn counter_column(counter_column: CounterColumn) -> Self {
        Self {
            counter_column: Some(counter_column),
            ..Default::default()
        }
    }

    pub fn counter_super_column(counter_super_column: CounterSuperColumn) -> Self {
        Self {
            counter_super_column: Some(counter_super_column),
            ..Default::default()
        }
    }

    /// Inspects which payload is populated. Returns None for an empty item.
    pub fn shape(&self) -> Option<ItemShape> {
        if self.column.is_some() {
            Some(ItemShape::Column)
        } else if self.super_column.is_some() {
            Some(ItemShape::SuperColumn)
        } else if self.counter_column.is_some() {
            Some(ItemShape::CounterColumn)
        } else if self.counter_super_column.is_some() {
            Some(ItemShape::CounterSuperColumn)
        } else {
            None
        }
    }

    /// Returns the raw name of whichever payload is populated.
    pub fn name(&self) -> Option<&[u8]> {
        if let Some(c) = &self.column {
            Some(&c.name)
        } else if let Some(sc) = &self.super_column {
            Some(&sc.name)
        } else if let Some(c) = &self.counter_column {
            Some(&c.name)
        } else {
            self.counter_super_column.as_ref().map(|sc| sc.name.as_slice())
        }
    }
}

/// A row returned by a range or index scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeySlice {
    pub key: Vec<u8>,
    pub columns: Vec<ColumnOrSuperColumn>,
}

/// The table, and optionally the super column, a read or write addresses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnParent {
    pub table_name: String,
    pub super_column: Option<Vec<u8>>,
}

/// Path to a row, a super column, or a single column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnPath {
    pub table_name: String,
    pub super_column: Option<Vec<u8>>,
    pub column: Option<Vec<u8>>,
}

/// A contiguous range of column names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SliceRange {
    /// Inclusive start; empty means unbounded.
    pub start: Vec<u8>,
    /// Inclusive finish; empty means unbounded.
    pub finish: Vec<u8>,
    pub reversed: bool,
    pub count: u32,
}

/// Selects the columns a read returns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlicePredicate {
    /// An explicit set of column names.
    Names(Vec<Vec<u8>>),
    /// A contiguous name range.
    Range(SliceRange),
}

/// A range of row keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyRange {
    /// Inclusive start; empty means unbounded.
    pub start_key: Vec<u8>,
    /// Inclusive end; empty means unbounded.
    pub end_key: Vec<u8>,
    pub count: u32,
}

/// Comparison applied by a secondary-index expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum IndexOperator {
    #[default]
    Eq,
    Gte,
    Gt,
    Lte,
    Lt,
}

/// One marshalled secondary-index condition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexExpression {
    pub column_name: Vec<u8>,
    pub op: IndexOperator,
    pub value: Vec<u8>,
}

/// A marshalled secondary-index query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexClause {
    pub expressions: Vec<IndexExpression>,
    pub start_key: Vec<u8>,
    pub count: u32,
}

/// Removal of a row, a super column, or a set of columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deletion {
    pub timestamp: i64,
    pub super_column: Option<Vec<u8>>,
    /// Columns to delete; None deletes everything under the target.
    pub predicate: Option<SlicePredicate>,
}

/// One write applied by a batch mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    Upsert(ColumnOrSuperColumn),
    Delete(Deletion),
}

/// Mutations grouped by raw row key, then by table name.
pub type MutationBatch = BTreeMap<Vec<u8>, BTreeMap<String, Vec<Mutation>>>;
