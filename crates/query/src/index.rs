//! Secondary-index queries in caller terms.

use pillar_core::wire::IndexOperator;
use pillar_core::Value;

/// Number of rows an index clause returns when the caller sets no count.
pub const DEFAULT_INDEX_COUNT: u32 = 100;

/// A condition on an indexed column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexExpression {
    pub column: Value,
    pub op: IndexOperator,
    pub value: Value,
}

impl IndexExpression {
    pub fn new(column: impl Into<Value>, value: impl Into<Value>, op: IndexOperator) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(column: impl Into<Value>, value: impl Into<Value>) -> Self {
        Self::new(column, value, IndexOperator::Eq)
    }

    pub fn gt(column: impl Into<Value>, value: impl Into<Value>) -> Self {
        Self::new(column, value, IndexOperator::Gt)
    }

    pub fn gte(column: impl Into<Value>, value: impl Into<Value>) -> Self {
        Self::new(column, value, IndexOperator::Gte)
    }

    pub fn lt(column: impl Into<Value>, value: impl Into<Value>) -> Self {
        Self::new(column, value, IndexOperator::Lt)
    }

    pub fn lte(column: impl Into<Value>, value: impl Into<Value>) -> Self {
        Self::new(column, value, IndexOperator::Lte)
    }
}

/// An index query: all expressions must hold. At least one of them must be
/// an equality on an indexed column for the store to accept the clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexClause {
    pub expressions: Vec<IndexExpression>,
    /// First row key to consider; empty starts at the beginning.
    pub start_key: Value,
    /// Maximum number of rows to return.
    pub count: u32,
}

impl IndexClause {
    pub fn new(expressions: impl IntoIterator<Item = IndexExpression>) -> Self {
        Self {
            expressions: expressions.into_iter().collect(),
            start_key: Value::Bytes(Vec::new()),
            count: DEFAULT_INDEX_COUNT,
        }
    }

    pub fn start_key(mut self, key: impl Into<Value>) -> Self {
        self.start_key = key.into();
        self
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }
}
