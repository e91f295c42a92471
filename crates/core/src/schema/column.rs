//! Column metadata for Pillar schema descriptions.

use alloc::string::String;
use alloc::vec::Vec;

/// Index kind declared on a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexType {
    /// Built-in secondary index on column values.
    Keys,
    /// Index backed by a custom implementation class.
    Custom,
}

/// Validation metadata for one named column of a table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDef {
    /// Raw column name, already in the comparator's byte form.
    name: Vec<u8>,
    /// Marshal class of the column's values.
    validation_class: String,
    /// Secondary index declared on the column, if any.
    index_type: Option<IndexType>,
    /// Name of the secondary index, if any.
    index_name: Option<String>,
}

impl ColumnDef {
    /// Creates column metadata for a raw column name.
    pub fn new(name: impl Into<Vec<u8>>, validation_class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            validation_class: validation_class.into(),
            index_type: None,
            index_name: None,
        }
    }

    /// Declares a secondary index on this column.
    pub fn indexed(mut self, index_type: IndexType, index_name: impl Into<String>) -> Self {
        self.index_type = Some(index_type);
        self.index_name = Some(index_name.into());
        self
    }

    /// Returns the raw column name.
    #[inline]
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// Returns the value validation class.
    #[inline]
    pub fn validation_class(&self) -> &str {
        &self.validation_class
    }

    /// Returns the index type.
    #[inline]
    pub fn index_type(&self) -> Option<IndexType> {
        self.index_type
    }

    /// Returns the index name.
    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    /// Returns whether a secondary index exists on this column.
    pub fn is_indexed(&self) -> bool {
        self.index_type.is_some()
    }
}
