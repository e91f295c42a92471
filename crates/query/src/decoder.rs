//! Decoding of slice responses into ordered rows.

use crate::row::{Cell, ColumnMap, DecodedRow};
use pillar_core::wire::{Column, ColumnOrSuperColumn, CounterColumn, ItemShape, KeySlice};
use pillar_core::{Result, Value};
use pillar_marshal::CodecConfig;

/// Turns raw response items into a [`DecodedRow`].
///
/// The shape of the first item decides how the whole response is read;
/// items lacking that payload are skipped.
pub struct ResultDecoder<'a> {
    config: &'a CodecConfig,
    include_timestamp: bool,
}

impl<'a> ResultDecoder<'a> {
    pub fn new(config: &'a CodecConfig, include_timestamp: bool) -> Self {
        Self {
            config,
            include_timestamp,
        }
    }

    /// Decodes a response. Returns `None` when there is no data, which is
    /// distinct from an empty row.
    pub fn decode(&self, items: &[ColumnOrSuperColumn]) -> Result<Option<DecodedRow>> {
        let Some(shape) = items.first().and_then(ColumnOrSuperColumn::shape) else {
            return Ok(None);
        };

        let mut row = DecodedRow::with_capacity(items.len());
        match shape {
            ItemShape::Column => {
                for col in items.iter().filter_map(|i| i.column.as_ref()) {
                    let (name, cell) = self.column(col)?;
                    row.insert(name, cell);
                }
            }
            ItemShape::SuperColumn => {
                for sc in items.iter().filter_map(|i| i.super_column.as_ref()) {
                    let mut nested = ColumnMap::with_capacity(sc.columns.len());
                    for col in &sc.columns {
                        let (name, cell) = self.column(col)?;
                        nested.insert(name, cell);
                    }
                    row.insert(self.config.decode_super_name(&sc.name)?, Cell::Nested(nested));
                }
            }
            ItemShape::CounterColumn => {
                for col in items.iter().filter_map(|i| i.counter_column.as_ref()) {
                    let (name, cell) = self.counter(col)?;
                    row.insert(name, cell);
                }
            }
            ItemShape::CounterSuperColumn => {
                for sc in items.iter().filter_map(|i| i.counter_super_column.as_ref()) {
                    let mut nested = ColumnMap::with_capacity(sc.columns.len());
                    for col in &sc.columns {
                        let (name, cell) = self.counter(col)?;
                        nested.insert(name, cell);
                    }
                    row.insert(self.config.decode_super_name(&sc.name)?, Cell::Nested(nested));
                }
            }
        }
        Ok(Some(row))
    }

    /// Decodes the key and columns of a scanned row.
    pub fn decode_key_slice(&self, slice: &KeySlice) -> Result<(Value, Option<DecodedRow>)> {
        let key = self.config.decode_key(&slice.key)?;
        Ok((key, self.decode(&slice.columns)?))
    }

    fn column(&self, col: &Column) -> Result<(Value, Cell)> {
        let name = self.config.decode_name(&col.name)?;
        let value = self.config.decode_value(&col.name, &col.value)?;
        let cell = if self.include_timestamp {
            Cell::Timestamped {
                value,
                timestamp: col.timestamp,
            }
        } else {
            Cell::Value(value)
        };
        Ok((name, cell))
    }

    // Counters carry no timestamp
    fn counter(&self, col: &CounterColumn) -> Result<(Value, Cell)> {
        let name = self.config.decode_name(&col.name)?;
        Ok((name, Cell::Value(Value::Long(col.value))))
    }
}
