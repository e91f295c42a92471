//! Value type definitions for Pillar.
//!
//! This module defines the `Value` enum which represents any application-level
//! value that can be marshalled into a key, a column name or a column value.

use alloc::string::String;
use alloc::vec::Vec;
use uuid::Uuid;

/// An application-level value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Value {
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Text (ASCII or UTF-8)
    Text(String),
    /// Signed 64-bit integer
    Long(i64),
    /// Unsigned 32-bit integer
    Integer(u32),
    /// 16-byte UUID
    Uuid(Uuid),
}

impl Value {
    /// Returns a short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bytes(_) => "bytes",
            Value::Text(_) => "text",
            Value::Long(_) => "long",
            Value::Integer(_) => "integer",
            Value::Uuid(_) => "uuid",
        }
    }

    /// Returns the integer value widened to i64 if this is a Long or an Integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Long(v) => Some(*v),
            Value::Integer(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is Text, None otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Returns the raw bytes backing Bytes, Text and Uuid values.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(v) => Some(v.as_slice()),
            Value::Text(v) => Some(v.as_bytes()),
            Value::Uuid(v) => Some(v.as_bytes().as_slice()),
            Value::Long(_) | Value::Integer(_) => None,
        }
    }

    /// Returns the UUID if this is a Uuid, None otherwise.
    pub fn as_uuid(&self) -> Option<&Uuid> {
        match self {
            Value::Uuid(v) => Some(v),
            _ => None,
        }
    }

    /// Returns true for empty Bytes or Text, which mean "no bound" in slices.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Bytes(v) => v.is_empty(),
            Value::Text(v) => v.is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Long(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}
