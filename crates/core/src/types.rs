//! Marshal type definitions for Pillar.
//!
//! This module defines the closed set of marshal types the client knows how to
//! encode, and how schema class names resolve to them.

/// Package prefix the store uses for its built-in marshal classes.
const MARSHAL_PACKAGE: &str = "org.apache.cassandra.db.marshal.";

/// Marshal types a comparator or validator can declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum TypeTag {
    /// Raw bytes, passed through untouched
    #[default]
    Bytes,
    /// Signed 64-bit integer, 8 bytes big-endian two's complement
    Long,
    /// Unsigned 32-bit integer, 4 bytes big-endian
    Integer,
    /// ASCII text
    Ascii,
    /// UTF-8 text
    Utf8,
    /// Version 1 UUID, 16 opaque bytes
    TimeUuid,
    /// Any UUID compared lexically, 16 opaque bytes
    LexicalUuid,
}

impl TypeTag {
    /// Resolves a schema class name to a marshal type.
    ///
    /// Both fully qualified (`org.apache.cassandra.db.marshal.UTF8Type`) and
    /// short (`UTF8Type`) names are accepted. Anything unrecognized, including
    /// the empty string and parameterized types, resolves to `Bytes` so values
    /// pass through unchanged.
    pub fn from_class_name(name: &str) -> Self {
        let short = name.trim().strip_prefix(MARSHAL_PACKAGE).unwrap_or(name.trim());
        match short {
            "LongType" | "CounterColumnType" => TypeTag::Long,
            "IntegerType" => TypeTag::Integer,
            "AsciiType" => TypeTag::Ascii,
            "UTF8Type" => TypeTag::Utf8,
            "TimeUUIDType" => TypeTag::TimeUuid,
            "LexicalUUIDType" => TypeTag::LexicalUuid,
            // BytesType and every unknown class
            _ => TypeTag::Bytes,
        }
    }

    /// Returns the encoded width in bytes for fixed-width types.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            TypeTag::Long => Some(8),
            TypeTag::Integer => Some(4),
            TypeTag::TimeUuid | TypeTag::LexicalUuid => Some(16),
            TypeTag::Bytes | TypeTag::Ascii | TypeTag::Utf8 => None,
        }
    }

    /// Returns whether values of this type decode to text.
    pub fn is_text(self) -> bool {
        matches!(self, TypeTag::Ascii | TypeTag::Utf8)
    }
}
