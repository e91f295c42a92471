//! Schema module for Pillar.
//!
//! This module contains the schema descriptions the store returns for a
//! keyspace: tables, their comparators and validators, and per-column metadata.

mod column;
mod keyspace;
mod table;

pub use column::{ColumnDef, IndexType};
pub use keyspace::KsDef;
pub use table::{CfDef, CfDefBuilder, ColumnType};
