//! CodecConfig cache for avoiding repeated schema resolution.
//!
//! Configurations are cached by table name and packing, and shared as `Arc`
//! so every handle and iterator over the same table reads the same instance.

use crate::codec_config::{CodecConfig, Packing};
use alloc::string::String;
use alloc::sync::Arc;
use hashbrown::HashMap;
use pillar_core::schema::CfDef;

/// Cache of resolved codec configurations.
#[derive(Default)]
pub struct CodecConfigCache {
    configs: HashMap<(String, Packing), Arc<CodecConfig>>,
}

impl CodecConfigCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self {
            configs: HashMap::new(),
        }
    }

    /// Get or resolve the configuration of a table for the given packing.
    pub fn get_or_create(&mut self, cf: &CfDef, packing: Packing) -> Arc<CodecConfig> {
        self.configs
            .entry((cf.name().into(), packing))
            .or_insert_with(|| Arc::new(CodecConfig::from_schema(cf, packing)))
            .clone()
    }

    /// Invalidate every packing of a table (call when its schema changes)
    pub fn invalidate(&mut self, table: &str) {
        self.configs.retain(|(name, _), _| name != table);
    }

    /// Clear all cached configurations
    pub fn clear(&mut self) {
        self.configs.clear();
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
