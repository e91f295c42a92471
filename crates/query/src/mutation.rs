//! Translation of caller column maps into batch mutations.

use crate::predicate::PredicateBuilder;
use crate::row::{Cell, ColumnMap};
use crate::timestamp::now_micros;
use pillar_core::wire::{Column, ColumnOrSuperColumn, Deletion, Mutation, SuperColumn};
use pillar_core::{Error, Result, Value};
use pillar_marshal::CodecConfig;

pub struct MutationBuilder<'a> {
    config: &'a CodecConfig,
}

impl<'a> MutationBuilder<'a> {
    pub fn new(config: &'a CodecConfig) -> Self {
        Self { config }
    }

    /// Builds one upsert per entry, in map order.
    ///
    /// On a super table every entry must be nested and becomes a super
    /// column of encoded sub-columns; on a standard table every entry must be
    /// scalar. Scalar cells take `timestamp` (now when absent) unless the
    /// cell carries its own.
    pub fn upserts(
        &self,
        columns: &ColumnMap,
        timestamp: Option<i64>,
        ttl: Option<i32>,
    ) -> Result<Vec<Mutation>> {
        let timestamp = timestamp.unwrap_or_else(now_micros);
        columns
            .iter()
            .map(|(name, cell)| {
                let item = match cell {
                    Cell::Nested(_) if !self.config.is_super() => {
                        return Err(Error::InvalidNesting);
                    }
                    Cell::Nested(sub_columns) => {
                        let columns = sub_columns
                            .iter()
                            .map(|(sub_name, sub_cell)| {
                                self.column(sub_name, sub_cell, timestamp, ttl)
                            })
                            .collect::<Result<Vec<_>>>()?;
                        ColumnOrSuperColumn::super_column(SuperColumn {
                            name: self.config.encode_super_name(name)?,
                            columns,
                        })
                    }
                    _ if self.config.is_super() => return Err(Error::InvalidNesting),
                    scalar => {
                        ColumnOrSuperColumn::column(self.column(name, scalar, timestamp, ttl)?)
                    }
                };
                Ok(Mutation::Upsert(item))
            })
            .collect()
    }

    /// Deletes a whole row, a super column, or the named columns under
    /// either.
    pub fn deletion(
        &self,
        columns: Option<&[Value]>,
        super_column: Option<&Value>,
        timestamp: i64,
    ) -> Result<Mutation> {
        let predicate = columns
            .map(|columns| {
                PredicateBuilder::new(self.config).build_slice_predicate(
                    Some(columns),
                    None,
                    None,
                    false,
                    0,
                    super_column.is_some(),
                )
            })
            .transpose()?;

        Ok(Mutation::Delete(Deletion {
            timestamp,
            super_column: super_column
                .map(|sc| self.config.encode_super_name(sc))
                .transpose()?,
            predicate,
        }))
    }

    fn column(&self, name: &Value, cell: &Cell, timestamp: i64, ttl: Option<i32>) -> Result<Column> {
        let (value, timestamp) = match cell {
            Cell::Value(v) => (v, timestamp),
            Cell::Timestamped { value, timestamp } => (value, *timestamp),
            Cell::Nested(_) => return Err(Error::InvalidNesting),
        };
        let raw_name = self.config.encode_name(name)?;
        let raw_value = self.config.encode_value(&raw_name, value)?;
        Ok(Column::new(raw_name, raw_value, timestamp).with_ttl(ttl))
    }
}
