//! Error types for the Pillar client.

use crate::rpc::{Method, RpcError};
use pillar_core::Value;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers of a column-family handle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A single-key read found no columns.
    #[error("no columns for key {key:?} in {table}")]
    NotFound { table: String, key: Value },
    /// The keyspace schema has no such table.
    #[error("table {table} not found in keyspace {keyspace}")]
    UnknownTable { keyspace: String, table: String },
    /// Rejected before any round trip.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Reported by the collaborator.
    #[error("rpc failed: {0}")]
    Rpc(#[from] RpcError),
    /// A value could not be marshalled.
    #[error(transparent)]
    Codec(#[from] pillar_core::Error),
    /// The collaborator answered with the wrong response shape.
    #[error("unexpected {got} response to {method}")]
    UnexpectedResponse { method: Method, got: &'static str },
}

impl Error {
    pub fn not_found(table: impl Into<String>, key: Value) -> Self {
        Error::NotFound {
            table: table.into(),
            key,
        }
    }

    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration(message.into())
    }

    /// Returns true for [`Error::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
