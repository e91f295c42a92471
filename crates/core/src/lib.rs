//! Pillar Core - Core types for the Pillar column-family client.
//!
//! This crate provides the foundational types shared by every layer of the
//! client:
//!
//! - `TypeTag`: Marshal types a schema can declare (Bytes, Long, Integer, Ascii, Utf8, TimeUuid, LexicalUuid)
//! - `Value`: Application-level values that are marshalled to and from the store
//! - `schema`: Schema descriptions as returned by the store (`KsDef`, `CfDef`, `ColumnDef`)
//! - `wire`: Raw request/response shapes exchanged with the RPC layer
//! - `Error`: Codec error types
//!
//! # Example
//!
//! ```rust
//! use pillar_core::{TypeTag, Value};
//! use pillar_core::schema::CfDef;
//!
//! let cf = CfDef::builder("users")
//!     .comparator_type("UTF8Type")
//!     .default_validation_class("LongType")
//!     .build();
//!
//! assert_eq!(TypeTag::from_class_name(cf.comparator_type()), TypeTag::Utf8);
//! assert_eq!(Value::from(5i64).as_i64(), Some(5));
//! ```

#![no_std]

extern crate alloc;

mod error;
pub mod schema;
mod types;
mod value;
pub mod wire;

pub use error::{Error, Result};
pub use types::TypeTag;
pub use value::Value;
