//! Error types for Pillar codecs.

use crate::types::TypeTag;
use alloc::string::String;

/// Result type alias for codec operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised while marshalling values to or from the wire format.
///
/// An unrecognized schema type is never an error: it resolves to
/// [`TypeTag::Bytes`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The value cannot be represented by the target type.
    #[error("type mismatch: cannot marshal {got} as {expected:?}")]
    TypeMismatch {
        expected: TypeTag,
        got: &'static str,
    },
    /// The value is of the right kind but outside the type's range.
    #[error("value out of range for {tag:?}: {message}")]
    OutOfRange {
        tag: TypeTag,
        message: String,
    },
    /// Raw bytes do not have the width the type requires.
    #[error("malformed {tag:?} payload: expected {expected} bytes, got {got}")]
    Malformed {
        tag: TypeTag,
        expected: usize,
        got: usize,
    },
    /// A row's nesting does not match its table: super tables take exactly
    /// one level of sub-columns, standard tables take none.
    #[error("column nesting does not match the table's column type")]
    InvalidNesting,
}

impl Error {
    /// Creates a type mismatch error.
    pub fn type_mismatch(expected: TypeTag, got: &'static str) -> Self {
        Error::TypeMismatch { expected, got }
    }

    /// Creates an out-of-range error.
    pub fn out_of_range(tag: TypeTag, message: impl Into<String>) -> Self {
        Error::OutOfRange {
            tag,
            message: message.into(),
        }
    }

    /// Creates a malformed payload error.
    pub fn malformed(tag: TypeTag, expected: usize, got: usize) -> Self {
        Error::Malformed { tag, expected, got }
    }
}
