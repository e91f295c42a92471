//! Marshalled request shapes built from caller arguments.

use crate::index::IndexClause;
use crate::slice::{SliceOptions, DEFAULT_COLUMN_COUNT};
use pillar_core::wire::{self, ColumnParent, ColumnPath, KeyRange, SlicePredicate, SliceRange};
use pillar_core::{Result, Value};
use pillar_marshal::CodecConfig;

/// Builds column parents, paths, slice predicates, key ranges and index
/// clauses for one table.
pub struct PredicateBuilder<'a> {
    config: &'a CodecConfig,
    column_count: u32,
}

impl<'a> PredicateBuilder<'a> {
    pub fn new(config: &'a CodecConfig) -> Self {
        Self {
            config,
            column_count: DEFAULT_COLUMN_COUNT,
        }
    }

    /// Column count of slices whose options set none.
    pub fn column_count(mut self, count: u32) -> Self {
        self.column_count = count;
        self
    }

    /// The table, narrowed to one super column if given.
    pub fn column_parent(&self, super_column: Option<&Value>) -> Result<ColumnParent> {
        Ok(ColumnParent {
            table_name: self.config.table().into(),
            super_column: super_column
                .map(|sc| self.config.encode_super_name(sc))
                .transpose()?,
        })
    }

    /// Path to a row, a super column or a single column.
    ///
    /// On a super table without a super column, `column` names a super
    /// column and lands in the path's super column slot.
    pub fn column_path(
        &self,
        super_column: Option<&Value>,
        column: Option<&Value>,
    ) -> Result<ColumnPath> {
        let (super_column, column) = match (super_column, column) {
            (None, Some(name)) if self.config.is_super() => {
                (Some(self.config.encode_super_name(name)?), None)
            }
            (sc, col) => (
                sc.map(|sc| self.config.encode_super_name(sc)).transpose()?,
                col.map(|c| self.config.encode_name(c)).transpose()?,
            ),
        };
        Ok(ColumnPath {
            table_name: self.config.table().into(),
            super_column,
            column,
        })
    }

    /// Slice predicate for a set of read options.
    pub fn slice_predicate(&self, opts: &SliceOptions) -> Result<SlicePredicate> {
        self.build_slice_predicate(
            opts.columns.as_deref(),
            opts.start.as_ref(),
            opts.finish.as_ref(),
            opts.reversed,
            opts.count.unwrap_or(self.column_count),
            opts.super_column.is_some(),
        )
    }

    /// Explicit columns always yield `Names`; otherwise a `Range` whose empty
    /// or absent bounds stay unbounded.
    ///
    /// Names address super columns when the table is super and the read is
    /// not already narrowed to one super column.
    pub fn build_slice_predicate(
        &self,
        columns: Option<&[Value]>,
        start: Option<&Value>,
        finish: Option<&Value>,
        reversed: bool,
        count: u32,
        within_super_column: bool,
    ) -> Result<SlicePredicate> {
        let addresses_super = self.config.is_super() && !within_super_column;
        let encode = |name: &Value| {
            if addresses_super {
                self.config.encode_super_name(name)
            } else {
                self.config.encode_name(name)
            }
        };
        let bound = |b: Option<&Value>| match b {
            Some(v) if !v.is_empty() => encode(v),
            _ => Ok(Vec::new()),
        };

        if let Some(columns) = columns {
            let names = columns.iter().map(&encode).collect::<Result<Vec<_>>>()?;
            return Ok(SlicePredicate::Names(names));
        }

        Ok(SlicePredicate::Range(SliceRange {
            start: bound(start)?,
            finish: bound(finish)?,
            reversed,
            count,
        }))
    }

    /// Key range for a scan; absent or empty bounds are unbounded.
    pub fn key_range(
        &self,
        start: Option<&Value>,
        finish: Option<&Value>,
        count: u32,
    ) -> Result<KeyRange> {
        Ok(KeyRange {
            start_key: self.key_bound(start)?,
            end_key: self.key_bound(finish)?,
            count,
        })
    }

    /// Marshals an index clause. Each expression's value is encoded with the
    /// value type of its own column.
    pub fn index_clause(&self, clause: &IndexClause) -> Result<wire::IndexClause> {
        let expressions = clause
            .expressions
            .iter()
            .map(|expr| {
                let column_name = self.config.encode_name(&expr.column)?;
                let value = self.config.encode_value(&column_name, &expr.value)?;
                Ok(wire::IndexExpression {
                    column_name,
                    op: expr.op,
                    value,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(wire::IndexClause {
            expressions,
            start_key: self.key_bound(Some(&clause.start_key))?,
            count: clause.count,
        })
    }

    fn key_bound(&self, key: Option<&Value>) -> Result<Vec<u8>> {
        match key {
            Some(k) if !k.is_empty() => self.config.encode_key(k),
            _ => Ok(Vec::new()),
        }
    }
}
