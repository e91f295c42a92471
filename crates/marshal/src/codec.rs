//! Value encoding and decoding per marshal type.

use crate::long::{decode_long, encode_long, LONG_WIDTH};
use alloc::string::String;
use alloc::vec::Vec;
use pillar_core::{Error, Result, TypeTag, Value};
use uuid::Uuid;

const INTEGER_WIDTH: usize = 4;
const UUID_WIDTH: usize = 16;

/// Encodes a value into the wire bytes of `tag`.
///
/// Integer types accept `Long` and `Integer` values; byte and text types
/// accept `Bytes`, `Text` and `Uuid` values; UUID types additionally parse
/// hyphenated UUID text. Any other pairing is a type mismatch.
pub fn encode(value: &Value, tag: TypeTag) -> Result<Vec<u8>> {
    match tag {
        TypeTag::Long => {
            let v = value
                .as_i64()
                .ok_or_else(|| Error::type_mismatch(tag, value.kind()))?;
            Ok(encode_long(v).to_vec())
        }
        TypeTag::Integer => {
            let v = match value {
                Value::Integer(v) => *v,
                Value::Long(v) => u32::try_from(*v)
                    .map_err(|_| Error::out_of_range(tag, alloc::format!("{}", v)))?,
                other => return Err(Error::type_mismatch(tag, other.kind())),
            };
            Ok(v.to_be_bytes().to_vec())
        }
        TypeTag::TimeUuid | TypeTag::LexicalUuid => encode_uuid(value, tag),
        // Bytes, text, and the identity fallback for unknown classes
        TypeTag::Bytes | TypeTag::Ascii | TypeTag::Utf8 => value
            .as_bytes()
            .map(<[u8]>::to_vec)
            .ok_or_else(|| Error::type_mismatch(tag, value.kind())),
    }
}

fn encode_uuid(value: &Value, tag: TypeTag) -> Result<Vec<u8>> {
    match value {
        Value::Uuid(id) => Ok(id.as_bytes().to_vec()),
        Value::Bytes(b) if b.len() == UUID_WIDTH => Ok(b.clone()),
        Value::Bytes(b) => Err(Error::malformed(tag, UUID_WIDTH, b.len())),
        Value::Text(s) => Uuid::try_parse(s)
            .map(|id| id.as_bytes().to_vec())
            .map_err(|_| Error::out_of_range(tag, alloc::format!("not a uuid: {}", s))),
        other => Err(Error::type_mismatch(tag, other.kind())),
    }
}

/// Decodes wire bytes of `tag` into a value.
pub fn decode(bytes: &[u8], tag: TypeTag) -> Result<Value> {
    match tag {
        TypeTag::Bytes => Ok(Value::Bytes(bytes.to_vec())),
        TypeTag::Ascii | TypeTag::Utf8 => {
            Ok(Value::Text(String::from_utf8_lossy(bytes).into_owned()))
        }
        TypeTag::Integer => {
            let raw: [u8; INTEGER_WIDTH] = bytes
                .try_into()
                .map_err(|_| Error::malformed(tag, INTEGER_WIDTH, bytes.len()))?;
            Ok(Value::Integer(u32::from_be_bytes(raw)))
        }
        TypeTag::Long => {
            let raw: [u8; LONG_WIDTH] = bytes
                .try_into()
                .map_err(|_| Error::malformed(tag, LONG_WIDTH, bytes.len()))?;
            Ok(Value::Long(decode_long(raw)))
        }
        TypeTag::TimeUuid | TypeTag::LexicalUuid => {
            let raw: [u8; UUID_WIDTH] = bytes
                .try_into()
                .map_err(|_| Error::malformed(tag, UUID_WIDTH, bytes.len()))?;
            Ok(Value::Uuid(Uuid::from_bytes(raw)))
        }
    }
}
