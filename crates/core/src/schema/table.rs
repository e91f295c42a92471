//! Column family definition for Pillar schema descriptions.

use super::column::ColumnDef;
use alloc::string::String;
use alloc::vec::Vec;

/// Layout of the rows in a column family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ColumnType {
    /// Rows hold plain columns.
    #[default]
    Standard,
    /// Rows hold super columns, each a nested collection of columns.
    Super,
}

impl ColumnType {
    /// Parses the schema's column type string; anything but "Super" is Standard.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("Super") {
            ColumnType::Super
        } else {
            ColumnType::Standard
        }
    }
}

/// A column family (table) definition as described by the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CfDef {
    /// Keyspace the table lives in.
    keyspace: String,
    /// Table name.
    name: String,
    /// Standard or super rows.
    column_type: ColumnType,
    /// Marshal class of column names (super column names for super tables).
    comparator_type: String,
    /// Marshal class of sub-column names for super tables.
    subcomparator_type: Option<String>,
    /// Marshal class of values without column-specific metadata.
    default_validation_class: String,
    /// Marshal class of row keys; older schema versions do not expose it.
    key_validation_class: Option<String>,
    /// Per-column value metadata.
    column_metadata: Vec<ColumnDef>,
}

impl CfDef {
    /// Starts building a definition for the named table.
    pub fn builder(name: impl Into<String>) -> CfDefBuilder {
        CfDefBuilder::new(name)
    }

    /// Returns the keyspace name.
    #[inline]
    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    /// Returns the table name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the row layout.
    #[inline]
    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Returns whether rows hold super columns.
    #[inline]
    pub fn is_super(&self) -> bool {
        self.column_type == ColumnType::Super
    }

    /// Returns the comparator class.
    #[inline]
    pub fn comparator_type(&self) -> &str {
        &self.comparator_type
    }

    /// Returns the sub-comparator class.
    pub fn subcomparator_type(&self) -> Option<&str> {
        self.subcomparator_type.as_deref()
    }

    /// Returns the default value validation class.
    #[inline]
    pub fn default_validation_class(&self) -> &str {
        &self.default_validation_class
    }

    /// Returns the key validation class.
    pub fn key_validation_class(&self) -> Option<&str> {
        self.key_validation_class.as_deref()
    }

    /// Returns the per-column metadata.
    #[inline]
    pub fn column_metadata(&self) -> &[ColumnDef] {
        &self.column_metadata
    }

    /// Gets column metadata by raw column name.
    pub fn get_column(&self, name: &[u8]) -> Option<&ColumnDef> {
        self.column_metadata.iter().find(|c| c.name() == name)
    }
}

/// Builder for column family definitions.
pub struct CfDefBuilder {
    def: CfDef,
}

impl CfDefBuilder {
    /// Creates a builder for a standard table with byte comparators and validators.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            def: CfDef {
                keyspace: String::new(),
                name: name.into(),
                column_type: ColumnType::Standard,
                comparator_type: "BytesType".into(),
                subcomparator_type: None,
                default_validation_class: "BytesType".into(),
                key_validation_class: None,
                column_metadata: Vec::new(),
            },
        }
    }

    /// Sets the keyspace name.
    pub fn keyspace(mut self, keyspace: impl Into<String>) -> Self {
        self.def.keyspace = keyspace.into();
        self
    }

    /// Sets the row layout.
    pub fn column_type(mut self, column_type: ColumnType) -> Self {
        self.def.column_type = column_type;
        self
    }

    /// Sets the comparator class.
    pub fn comparator_type(mut self, class: impl Into<String>) -> Self {
        self.def.comparator_type = class.into();
        self
    }

    /// Sets the sub-comparator class.
    pub fn subcomparator_type(mut self, class: impl Into<String>) -> Self {
        self.def.subcomparator_type = Some(class.into());
        self
    }

    /// Sets the default value validation class.
    pub fn default_validation_class(mut self, class: impl Into<String>) -> Self {
        self.def.default_validation_class = class.into();
        self
    }

    /// Sets the key validation class.
    pub fn key_validation_class(mut self, class: impl Into<String>) -> Self {
        self.def.key_validation_class = Some(class.into());
        self
    }

    /// Adds metadata for one column; a later entry for the same name replaces it.
    pub fn add_column(mut self, column: ColumnDef) -> Self {
        self.def.column_metadata.retain(|c| c.name() != column.name());
        self.def.column_metadata.push(column);
        self
    }

    /// Finishes the definition.
    pub fn build(self) -> CfDef {
        self.def
    }
}
