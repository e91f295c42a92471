//! Pillar Query - request shaping and response decoding for the Pillar client.
//!
//! This crate turns caller-level arguments into the marshalled shapes the RPC
//! layer expects, and turns raw responses back into ordered, decoded rows:
//!
//! - `PredicateBuilder`: column parents, column paths, slice predicates, key
//!   ranges and index clauses
//! - `ResultDecoder`: plain, super and counter columns into a `DecodedRow`
//! - `MutationBuilder`: ordered column maps into upsert and delete mutations
//!
//! # Example
//!
//! ```rust
//! use pillar_core::schema::CfDef;
//! use pillar_marshal::{CodecConfig, Packing};
//! use pillar_query::{columns, MutationBuilder, ResultDecoder};
//! use pillar_core::wire::Mutation;
//! use pillar_core::Value;
//!
//! let cf = CfDef::builder("users")
//!     .comparator_type("UTF8Type")
//!     .default_validation_class("LongType")
//!     .build();
//! let config = CodecConfig::from_schema(&cf, Packing::ALL);
//!
//! let mutations = MutationBuilder::new(&config)
//!     .upserts(&columns([("a", 5i64), ("b", -3)]), Some(1), None)
//!     .unwrap();
//! let items: Vec<_> = mutations
//!     .into_iter()
//!     .filter_map(|m| match m {
//!         Mutation::Upsert(item) => Some(item),
//!         Mutation::Delete(_) => None,
//!     })
//!     .collect();
//!
//! let row = ResultDecoder::new(&config, false).decode(&items).unwrap().unwrap();
//! assert_eq!(row[&Value::from("a")].value(), Some(&Value::Long(5)));
//! ```

pub mod decoder;
pub mod index;
pub mod mutation;
pub mod predicate;
pub mod row;
pub mod slice;
pub mod timestamp;

pub use decoder::ResultDecoder;
pub use index::{IndexClause, IndexExpression, DEFAULT_INDEX_COUNT};
pub use mutation::MutationBuilder;
pub use predicate::PredicateBuilder;
pub use row::{columns, Cell, ColumnMap, DecodedRow};
pub use slice::{SliceOptions, DEFAULT_COLUMN_COUNT};
pub use timestamp::now_micros;
