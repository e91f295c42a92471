//! Handle-level configuration.

use pillar_core::wire::ConsistencyLevel;
use pillar_marshal::Packing;
use serde::Deserialize;

/// Rows fetched per page by range and index scans.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Keys per `multiget_slice` round trip.
pub const DEFAULT_MULTIGET_CHUNK_SIZE: usize = 16;

/// Settings of a column-family handle.
///
/// Deserializes from partial documents; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnFamilyOptions {
    pub read_consistency: ConsistencyLevel,
    pub write_consistency: ConsistencyLevel,
    /// Pair each returned value with its write timestamp.
    pub include_timestamp: bool,
    pub buffer_size: usize,
    pub multiget_chunk_size: usize,
    /// Column count of a read without explicit bounds.
    pub column_count: u32,
    pub packing: Packing,
}

impl Default for ColumnFamilyOptions {
    fn default() -> Self {
        Self {
            read_consistency: ConsistencyLevel::One,
            write_consistency: ConsistencyLevel::One,
            include_timestamp: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
            multiget_chunk_size: DEFAULT_MULTIGET_CHUNK_SIZE,
            column_count: pillar_query::DEFAULT_COLUMN_COUNT,
            packing: Packing::ALL,
        }
    }
}

impl ColumnFamilyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_consistency(mut self, level: ConsistencyLevel) -> Self {
        self.read_consistency = level;
        self
    }

    pub fn write_consistency(mut self, level: ConsistencyLevel) -> Self {
        self.write_consistency = level;
        self
    }

    pub fn include_timestamp(mut self, include: bool) -> Self {
        self.include_timestamp = include;
        self
    }

    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    pub fn multiget_chunk_size(mut self, size: usize) -> Self {
        self.multiget_chunk_size = size;
        self
    }

    pub fn column_count(mut self, count: u32) -> Self {
        self.column_count = count;
        self
    }

    pub fn packing(mut self, packing: Packing) -> Self {
        self.packing = packing;
        self
    }
}

/// Per-call settings of a write.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Write time in microseconds; now when unset.
    pub timestamp: Option<i64>,
    /// Seconds until the written columns expire.
    pub ttl: Option<i32>,
    /// Overrides the handle's write consistency.
    pub consistency: Option<ConsistencyLevel>,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn ttl(mut self, ttl: i32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn consistency(mut self, level: ConsistencyLevel) -> Self {
        self.consistency = Some(level);
        self
    }
}
