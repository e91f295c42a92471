//! Pillar Client - typed access to a column-family store.
//!
//! This crate is the public surface of Pillar. It drives an [`Rpc`]
//! collaborator with marshalled requests and hands back decoded rows:
//!
//! - `Keyspace`: schema of a keyspace and the entry point for handles
//! - `ColumnFamily`: reads, writes, counters and scans against one table
//! - `Mutator`: batched writes across rows and tables
//! - `RangeIterator`, `IndexedIterator`: paginated scans
//!
//! # Example
//!
//! ```rust,ignore
//! use pillar_client::{ColumnFamily, SliceOptions, WriteOptions};
//! use pillar_query::columns;
//! use std::sync::Arc;
//!
//! let users = ColumnFamily::open(Arc::new(rpc), "app", "users")?;
//! users.insert("row1", &columns([("a", 5i64), ("b", -3)]), &WriteOptions::new())?;
//!
//! let row = users.get("row1", &SliceOptions::new())?;
//!
//! for item in users.get_range("", "", Some(1000), &SliceOptions::new(), None)? {
//!     let (key, row) = item?;
//! }
//! ```

pub mod column_family;
pub mod error;
pub mod iterator;
pub mod keyspace;
pub mod mutator;
pub mod options;
pub mod rpc;

pub use column_family::ColumnFamily;
pub use error::{Error, Result};
pub use iterator::{IndexedIterator, PagedRows, RangeIterator, MIN_BUFFER_SIZE};
pub use keyspace::Keyspace;
pub use mutator::Mutator;
pub use options::{ColumnFamilyOptions, WriteOptions};
pub use rpc::{Method, Request, Response, Rpc, RpcError, RpcErrorKind};

pub use pillar_core::wire::ConsistencyLevel;
pub use pillar_core::Value;
pub use pillar_marshal::Packing;
pub use pillar_query::{
    columns, Cell, ColumnMap, DecodedRow, IndexClause, IndexExpression, SliceOptions,
};
