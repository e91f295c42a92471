//! Keyspace definition for Pillar schema descriptions.

use super::table::CfDef;
use alloc::string::String;
use alloc::vec::Vec;

/// A keyspace as returned by the schema-description call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KsDef {
    /// Keyspace name.
    name: String,
    /// Tables of the keyspace.
    cf_defs: Vec<CfDef>,
}

impl KsDef {
    /// Creates a keyspace description.
    pub fn new(name: impl Into<String>, cf_defs: Vec<CfDef>) -> Self {
        Self {
            name: name.into(),
            cf_defs,
        }
    }

    /// Returns the keyspace name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the table definitions.
    #[inline]
    pub fn cf_defs(&self) -> &[CfDef] {
        &self.cf_defs
    }

    /// Gets a table definition by name.
    pub fn get_cf(&self, name: &str) -> Option<&CfDef> {
        self.cf_defs.iter().find(|cf| cf.name() == name)
    }
}
