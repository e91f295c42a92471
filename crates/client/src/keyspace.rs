//! Keyspace - entry point that hands out column-family handles.
//!
//! Holds the keyspace schema fetched from the store and a cache of resolved
//! codec configurations, so handles on the same table and packing share one
//! configuration.

use crate::column_family::ColumnFamily;
use crate::error::{Error, Result};
use crate::mutator::Mutator;
use crate::options::ColumnFamilyOptions;
use crate::rpc::Rpc;
use pillar_core::schema::KsDef;
use pillar_core::wire::ConsistencyLevel;
use pillar_marshal::CodecConfigCache;
use std::sync::Arc;

pub struct Keyspace<R> {
    rpc: Arc<R>,
    def: KsDef,
    configs: CodecConfigCache,
}

impl<R: Rpc> Keyspace<R> {
    /// Fetches the schema of `name`.
    pub fn connect(rpc: Arc<R>, name: &str) -> Result<Self> {
        let def = rpc.describe_keyspace(name)?;
        tracing::debug!(keyspace = name, tables = def.cf_defs().len(), "described keyspace");
        Ok(Self {
            rpc,
            def,
            configs: CodecConfigCache::new(),
        })
    }

    pub fn name(&self) -> &str {
        self.def.name()
    }

    pub fn def(&self) -> &KsDef {
        &self.def
    }

    /// Names of the keyspace's tables.
    pub fn table_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.def.cf_defs().iter().map(|cf| cf.name())
    }

    /// Opens a handle on `table` with default options.
    pub fn column_family(&mut self, table: &str) -> Result<ColumnFamily<R>> {
        self.column_family_with(table, ColumnFamilyOptions::default())
    }

    pub fn column_family_with(
        &mut self,
        table: &str,
        options: ColumnFamilyOptions,
    ) -> Result<ColumnFamily<R>> {
        let cf_def = self.def.get_cf(table).ok_or_else(|| Error::UnknownTable {
            keyspace: self.def.name().into(),
            table: table.into(),
        })?;
        let config = self.configs.get_or_create(cf_def, options.packing);
        Ok(ColumnFamily::with_config(
            Arc::clone(&self.rpc),
            Arc::new(cf_def.clone()),
            config,
            options,
        ))
    }

    /// A mutator for writes spanning several tables.
    pub fn mutator(&self, consistency: ConsistencyLevel) -> Mutator<R> {
        Mutator::new(Arc::clone(&self.rpc), consistency)
    }

    /// Fetches the schema again and drops every cached configuration.
    /// Handles opened earlier keep the schema they were opened with.
    pub fn refresh_schema(&mut self) -> Result<()> {
        let def = self.rpc.describe_keyspace(self.def.name())?;
        self.def = def;
        self.configs.clear();
        Ok(())
    }

    /// Number of codec configurations resolved so far.
    pub fn cached_configs(&self) -> usize {
        self.configs.len()
    }
}
