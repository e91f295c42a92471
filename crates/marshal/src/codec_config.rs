//! Schema-derived codec configuration.
//!
//! Resolves once per table handle which marshal type applies to keys, column
//! names, super column names and the values of each column.

use crate::codec::{decode, encode};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use hashbrown::HashMap;
use pillar_core::schema::CfDef;
use pillar_core::{Result, TypeTag, Value};

/// Which parts of a request are marshalled.
///
/// A disabled part is passed through as raw bytes: its tags resolve to
/// `Bytes` when the configuration is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Packing {
    /// Column and super column names.
    pub names: bool,
    /// Column values.
    pub values: bool,
    /// Row keys.
    pub keys: bool,
}

impl Packing {
    /// Marshal everything.
    pub const ALL: Packing = Packing {
        names: true,
        values: true,
        keys: true,
    };

    /// Pass everything through as raw bytes.
    pub const NONE: Packing = Packing {
        names: false,
        values: false,
        keys: false,
    };
}

impl Default for Packing {
    fn default() -> Self {
        Packing::ALL
    }
}

/// Immutable per-table codec state.
#[derive(Clone, Debug)]
pub struct CodecConfig {
    /// Table name
    table: String,
    /// Row key type
    key_type: TypeTag,
    /// Column name type (sub-column names for super tables)
    column_name_type: TypeTag,
    /// Super column name type, only for super tables
    super_column_name_type: Option<TypeTag>,
    /// Value type for columns without specific metadata
    default_value_type: TypeTag,
    /// Per-column value types keyed by raw column name
    value_types: HashMap<Vec<u8>, TypeTag>,
    /// Packing the configuration was resolved with
    packing: Packing,
}

impl CodecConfig {
    /// Resolves the configuration of a table.
    pub fn from_schema(cf: &CfDef, packing: Packing) -> Self {
        let comparator = TypeTag::from_class_name(cf.comparator_type());
        let (column_name_type, super_column_name_type) = if cf.is_super() {
            let sub = TypeTag::from_class_name(cf.subcomparator_type().unwrap_or_default());
            (sub, Some(comparator))
        } else {
            (comparator, None)
        };

        let (column_name_type, super_column_name_type) = if packing.names {
            (column_name_type, super_column_name_type)
        } else {
            (TypeTag::Bytes, super_column_name_type.map(|_| TypeTag::Bytes))
        };

        let key_type = if packing.keys {
            // Older schema versions carry no key validator
            cf.key_validation_class()
                .map(TypeTag::from_class_name)
                .unwrap_or(TypeTag::Bytes)
        } else {
            TypeTag::Bytes
        };

        let (default_value_type, value_types) = if packing.values {
            let value_types = cf
                .column_metadata()
                .iter()
                .map(|col| {
                    (
                        col.name().to_vec(),
                        TypeTag::from_class_name(col.validation_class()),
                    )
                })
                .collect();
            (
                TypeTag::from_class_name(cf.default_validation_class()),
                value_types,
            )
        } else {
            (TypeTag::Bytes, HashMap::new())
        };

        Self {
            table: cf.name().to_string(),
            key_type,
            column_name_type,
            super_column_name_type,
            default_value_type,
            value_types,
            packing,
        }
    }

    /// Returns the table name.
    #[inline]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the packing this configuration was resolved with.
    #[inline]
    pub fn packing(&self) -> Packing {
        self.packing
    }

    #[inline]
    pub fn key_type(&self) -> TypeTag {
        self.key_type
    }

    #[inline]
    pub fn column_name_type(&self) -> TypeTag {
        self.column_name_type
    }

    #[inline]
    pub fn super_column_name_type(&self) -> Option<TypeTag> {
        self.super_column_name_type
    }

    #[inline]
    pub fn default_value_type(&self) -> TypeTag {
        self.default_value_type
    }

    /// Returns whether the table holds super columns.
    #[inline]
    pub fn is_super(&self) -> bool {
        self.super_column_name_type.is_some()
    }

    /// Value type of a column, by raw column name.
    pub fn value_type(&self, column_name: &[u8]) -> TypeTag {
        self.value_types
            .get(column_name)
            .copied()
            .unwrap_or(self.default_value_type)
    }

    pub fn encode_key(&self, key: &Value) -> Result<Vec<u8>> {
        encode(key, self.key_type)
    }

    pub fn decode_key(&self, key: &[u8]) -> Result<Value> {
        decode(key, self.key_type)
    }

    pub fn encode_name(&self, name: &Value) -> Result<Vec<u8>> {
        encode(name, self.column_name_type)
    }

    pub fn decode_name(&self, name: &[u8]) -> Result<Value> {
        decode(name, self.column_name_type)
    }

    /// Super column names of a standard table are passed through.
    pub fn encode_super_name(&self, name: &Value) -> Result<Vec<u8>> {
        encode(name, self.super_column_name_type.unwrap_or(TypeTag::Bytes))
    }

    pub fn decode_super_name(&self, name: &[u8]) -> Result<Value> {
        decode(name, self.super_column_name_type.unwrap_or(TypeTag::Bytes))
    }

    /// Encodes a value with the type of its (raw) column name.
    pub fn encode_value(&self, column_name: &[u8], value: &Value) -> Result<Vec<u8>> {
        encode(value, self.value_type(column_name))
    }

    /// Decodes a value with the type of its (raw) column name.
    pub fn decode_value(&self, column_name: &[u8], value: &[u8]) -> Result<Value> {
        decode(value, self.value_type(column_name))
    }
}
