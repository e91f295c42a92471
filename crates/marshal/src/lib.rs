//! Type marshaler for the Pillar column-family client.
//!
//! Converts application values to and from the store's untyped byte strings,
//! driven by the marshal types a table's schema declares.
//!
//! ## Wire encodings
//!
//! ```text
//! +-------------+-----------------------------------------------+
//! | TypeTag     | bytes                                         |
//! +-------------+-----------------------------------------------+
//! | Bytes       | identity                                      |
//! | Ascii, Utf8 | text bytes (decode repairs invalid UTF-8)     |
//! | Integer     | 4 bytes, unsigned big-endian                  |
//! | Long        | 8 bytes, big-endian two's complement          |
//! | *Uuid       | 16 opaque bytes                               |
//! +-------------+-----------------------------------------------+
//! ```
//!
//! `CodecConfig` resolves, once per table handle, which tag applies to keys,
//! column names, super column names and each column's values.

#![no_std]

extern crate alloc;

mod codec;
mod codec_config;
mod config_cache;
pub mod long;

pub use codec::{decode, encode};
pub use codec_config::{CodecConfig, Packing};
pub use config_cache::CodecConfigCache;
