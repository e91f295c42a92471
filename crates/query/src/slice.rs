//! Column bounds of a read.

use pillar_core::wire::ConsistencyLevel;
use pillar_core::Value;

/// Number of columns a range slice returns when the caller sets no count.
pub const DEFAULT_COLUMN_COUNT: u32 = 100;

/// Which columns a read returns, and from where.
///
/// Either `columns` names the columns explicitly, or `start`/`finish`/
/// `reversed`/`count` select a contiguous range. Explicit columns take
/// precedence: when they are set the range fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SliceOptions {
    pub columns: Option<Vec<Value>>,
    pub start: Option<Value>,
    pub finish: Option<Value>,
    pub reversed: bool,
    /// Maximum number of columns; the reading handle's default when unset.
    pub count: Option<u32>,
    /// Restrict the read to the sub-columns of one super column.
    pub super_column: Option<Value>,
    /// Overrides the handle's read consistency for this call.
    pub consistency: Option<ConsistencyLevel>,
}

impl SliceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads exactly these columns.
    pub fn columns<V: Into<Value>>(mut self, columns: impl IntoIterator<Item = V>) -> Self {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn start(mut self, start: impl Into<Value>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn finish(mut self, finish: impl Into<Value>) -> Self {
        self.finish = Some(finish.into());
        self
    }

    pub fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn super_column(mut self, super_column: impl Into<Value>) -> Self {
        self.super_column = Some(super_column.into());
        self
    }

    pub fn consistency(mut self, consistency: ConsistencyLevel) -> Self {
        self.consistency = Some(consistency);
        self
    }
}
