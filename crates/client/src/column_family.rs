//! ColumnFamily - typed reads and writes against one table.
//!
//! A handle binds a table's schema to a resolved [`CodecConfig`] and turns
//! caller values into marshalled requests. Handles are cheap to clone and
//! never change after construction: switching packing builds a new one.

use crate::error::{Error, Result};
use crate::iterator::{IndexedIterator, IndexedPages, PagedRows, RangeIterator, RangePages};
use crate::mutator::Mutator;
use crate::options::{ColumnFamilyOptions, WriteOptions};
use crate::rpc::{traced_call, Method, Request, Response, Rpc};
use indexmap::IndexMap;
use pillar_core::schema::CfDef;
use pillar_core::wire::{ColumnOrSuperColumn, ConsistencyLevel, CounterColumn};
use pillar_core::Value;
use pillar_marshal::{CodecConfig, Packing};
use pillar_query::{
    now_micros, ColumnMap, DecodedRow, IndexClause, PredicateBuilder, ResultDecoder, SliceOptions,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Handle to one table.
pub struct ColumnFamily<R> {
    rpc: Arc<R>,
    cf_def: Arc<CfDef>,
    config: Arc<CodecConfig>,
    options: ColumnFamilyOptions,
}

impl<R> Clone for ColumnFamily<R> {
    fn clone(&self) -> Self {
        Self {
            rpc: Arc::clone(&self.rpc),
            cf_def: Arc::clone(&self.cf_def),
            config: Arc::clone(&self.config),
            options: self.options.clone(),
        }
    }
}

impl<R: Rpc> ColumnFamily<R> {
    /// Opens a table, fetching its schema with one `describe_keyspace` call.
    pub fn open(rpc: Arc<R>, keyspace: &str, table: &str) -> Result<Self> {
        let ks_def = rpc.describe_keyspace(keyspace)?;
        let cf_def = ks_def.get_cf(table).cloned().ok_or_else(|| Error::UnknownTable {
            keyspace: keyspace.into(),
            table: table.into(),
        })?;
        Ok(Self::with_schema(rpc, cf_def, ColumnFamilyOptions::default()))
    }

    /// Builds a handle from a known schema.
    pub fn with_schema(rpc: Arc<R>, cf_def: CfDef, options: ColumnFamilyOptions) -> Self {
        let config = Arc::new(CodecConfig::from_schema(&cf_def, options.packing));
        Self::with_config(rpc, Arc::new(cf_def), config, options)
    }

    pub(crate) fn with_config(
        rpc: Arc<R>,
        cf_def: Arc<CfDef>,
        config: Arc<CodecConfig>,
        options: ColumnFamilyOptions,
    ) -> Self {
        Self {
            rpc,
            cf_def,
            config,
            options,
        }
    }

    /// A handle on the same table with different packing.
    pub fn with_packing(&self, packing: Packing) -> Self {
        self.with_options(self.options.clone().packing(packing))
    }

    /// A handle on the same table with different options. The codec
    /// configuration is resolved again only when the packing changes.
    pub fn with_options(&self, options: ColumnFamilyOptions) -> Self {
        let config = if options.packing == self.config.packing() {
            Arc::clone(&self.config)
        } else {
            Arc::new(CodecConfig::from_schema(&self.cf_def, options.packing))
        };
        Self::with_config(Arc::clone(&self.rpc), Arc::clone(&self.cf_def), config, options)
    }

    pub fn name(&self) -> &str {
        self.cf_def.name()
    }

    pub fn cf_def(&self) -> &CfDef {
        &self.cf_def
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn options(&self) -> &ColumnFamilyOptions {
        &self.options
    }

    /// A mutator writing at this handle's write consistency.
    pub fn mutator(&self) -> Mutator<R> {
        Mutator::new(Arc::clone(&self.rpc), self.options.write_consistency)
    }

    /// Reads one row. A row without columns is [`Error::NotFound`].
    pub fn get(&self, key: impl Into<Value>, opts: &SliceOptions) -> Result<DecodedRow> {
        let key = key.into();
        let predicates = self.predicates();
        let request = Request::GetSlice {
            key: self.config.encode_key(&key)?,
            parent: predicates.column_parent(opts.super_column.as_ref())?,
            predicate: predicates.slice_predicate(opts)?,
            consistency: self.read_consistency(opts),
        };
        let items = match self.call(request)? {
            Response::Slice(items) => items,
            other => return Err(self.unexpected(Method::GetSlice, other)),
        };
        match self.decoder().decode(&items)? {
            Some(row) if !row.is_empty() => Ok(row),
            _ => {
                tracing::debug!(table = self.name(), ?key, "row not found");
                Err(Error::not_found(self.name(), key))
            }
        }
    }

    /// Reads many rows, `multiget_chunk_size` keys per round trip.
    pub fn multi_get<K: Into<Value>>(
        &self,
        keys: impl IntoIterator<Item = K>,
        opts: &SliceOptions,
    ) -> Result<IndexMap<Value, DecodedRow>> {
        self.multi_get_chunked(keys, opts, self.options.multiget_chunk_size)
    }

    /// Reads many rows, `chunk_size` keys per round trip. Rows come back in
    /// request order; keys without columns are omitted. A failing chunk
    /// fails the whole call.
    pub fn multi_get_chunked<K: Into<Value>>(
        &self,
        keys: impl IntoIterator<Item = K>,
        opts: &SliceOptions,
        chunk_size: usize,
    ) -> Result<IndexMap<Value, DecodedRow>> {
        if chunk_size == 0 {
            return Err(Error::invalid_configuration("chunk_size must be positive"));
        }
        let requested = self.encode_keys(keys)?;
        let predicates = self.predicates();
        let parent = predicates.column_parent(opts.super_column.as_ref())?;
        let predicate = predicates.slice_predicate(opts)?;
        let consistency = self.read_consistency(opts);

        let raw_keys: Vec<Vec<u8>> = requested.keys().cloned().collect();
        let mut fetched: HashMap<Vec<u8>, Vec<ColumnOrSuperColumn>> =
            HashMap::with_capacity(raw_keys.len());
        for chunk in raw_keys.chunks(chunk_size) {
            tracing::trace!(table = self.name(), keys = chunk.len(), "fetching multiget chunk");
            let request = Request::MultigetSlice {
                keys: chunk.to_vec(),
                parent: parent.clone(),
                predicate: predicate.clone(),
                consistency,
            };
            match self.call(request)? {
                Response::MultiSlice(rows) => fetched.extend(rows),
                other => return Err(self.unexpected(Method::MultigetSlice, other)),
            }
        }

        let decoder = self.decoder();
        let mut rows = IndexMap::with_capacity(requested.len());
        for (raw_key, key) in requested {
            let Some(items) = fetched.get(&raw_key) else {
                continue;
            };
            if let Some(row) = decoder.decode(items)? {
                if !row.is_empty() {
                    rows.insert(key, row);
                }
            }
        }
        Ok(rows)
    }

    /// Counts the columns of one row.
    pub fn get_count(&self, key: impl Into<Value>, opts: &SliceOptions) -> Result<u32> {
        let predicates = self.predicates();
        let request = Request::GetCount {
            key: self.config.encode_key(&key.into())?,
            parent: predicates.column_parent(opts.super_column.as_ref())?,
            predicate: predicates.slice_predicate(opts)?,
            consistency: self.read_consistency(opts),
        };
        match self.call(request)? {
            Response::Count(count) => Ok(count),
            other => Err(self.unexpected(Method::GetCount, other)),
        }
    }

    /// Counts the columns of many rows in one round trip, in request order.
    pub fn multi_get_count<K: Into<Value>>(
        &self,
        keys: impl IntoIterator<Item = K>,
        opts: &SliceOptions,
    ) -> Result<IndexMap<Value, u32>> {
        let requested = self.encode_keys(keys)?;
        let predicates = self.predicates();
        let request = Request::MultigetCount {
            keys: requested.keys().cloned().collect(),
            parent: predicates.column_parent(opts.super_column.as_ref())?,
            predicate: predicates.slice_predicate(opts)?,
            consistency: self.read_consistency(opts),
        };
        let counts: HashMap<Vec<u8>, u32> = match self.call(request)? {
            Response::MultiCount(counts) => counts.into_iter().collect(),
            other => return Err(self.unexpected(Method::MultigetCount, other)),
        };
        Ok(requested
            .into_iter()
            .filter_map(|(raw_key, key)| counts.get(&raw_key).map(|count| (key, *count)))
            .collect())
    }

    /// Writes columns to one row. Returns the write timestamp.
    pub fn insert(
        &self,
        key: impl Into<Value>,
        columns: &ColumnMap,
        opts: &WriteOptions,
    ) -> Result<i64> {
        self.batch_insert([(key.into(), columns.clone())], opts)
    }

    /// Writes columns to many rows in one `batch_mutate`. Every column
    /// shares one timestamp, which is returned.
    pub fn batch_insert<K: Into<Value>>(
        &self,
        rows: impl IntoIterator<Item = (K, ColumnMap)>,
        opts: &WriteOptions,
    ) -> Result<i64> {
        let timestamp = opts.timestamp.unwrap_or_else(now_micros);
        let mut mutator = Mutator::new(Arc::clone(&self.rpc), self.write_consistency(opts));
        for (key, columns) in rows {
            mutator.insert(self, &key.into(), &columns, Some(timestamp), opts.ttl)?;
        }
        mutator.send()?;
        Ok(timestamp)
    }

    /// Removes a row, a super column, or the given columns under either.
    /// Returns the deletion timestamp.
    ///
    /// A single target goes through `remove`; several named columns become
    /// one deletion in a `batch_mutate`.
    pub fn remove(
        &self,
        key: impl Into<Value>,
        columns: Option<&[Value]>,
        super_column: Option<&Value>,
        opts: &WriteOptions,
    ) -> Result<i64> {
        let key = key.into();
        let timestamp = opts.timestamp.unwrap_or_else(now_micros);
        let consistency = self.write_consistency(opts);

        let single = match columns {
            None => Some(None),
            Some([column]) => Some(Some(column)),
            Some(_) => None,
        };
        if let Some(column) = single {
            let request = Request::Remove {
                key: self.config.encode_key(&key)?,
                path: self.predicates().column_path(super_column, column)?,
                timestamp,
                consistency,
            };
            return match self.call(request)? {
                Response::Done => Ok(timestamp),
                other => Err(self.unexpected(Method::Remove, other)),
            };
        }

        let mut mutator = Mutator::new(Arc::clone(&self.rpc), consistency);
        mutator.remove(self, &key, columns, super_column, Some(timestamp))?;
        mutator.send()?;
        Ok(timestamp)
    }

    /// Increments a counter column by `value` (negative to decrement).
    /// Counters carry no timestamp or TTL; only the consistency level of
    /// `opts` applies.
    pub fn add(
        &self,
        key: impl Into<Value>,
        column: impl Into<Value>,
        value: i64,
        super_column: Option<&Value>,
        opts: &WriteOptions,
    ) -> Result<()> {
        let request = Request::Add {
            key: self.config.encode_key(&key.into())?,
            parent: self.predicates().column_parent(super_column)?,
            column: CounterColumn {
                name: self.config.encode_name(&column.into())?,
                value,
            },
            consistency: self.write_consistency(opts),
        };
        match self.call(request)? {
            Response::Done => Ok(()),
            other => Err(self.unexpected(Method::Add, other)),
        }
    }

    /// Removes a counter column, or every counter of a row or super column.
    pub fn remove_counter(
        &self,
        key: impl Into<Value>,
        column: Option<&Value>,
        super_column: Option<&Value>,
        opts: &WriteOptions,
    ) -> Result<()> {
        let request = Request::RemoveCounter {
            key: self.config.encode_key(&key.into())?,
            path: self.predicates().column_path(super_column, column)?,
            consistency: self.write_consistency(opts),
        };
        match self.call(request)? {
            Response::Done => Ok(()),
            other => Err(self.unexpected(Method::RemoveCounter, other)),
        }
    }

    /// Deletes every row of the table.
    pub fn truncate(&self) -> Result<()> {
        let request = Request::Truncate {
            table_name: self.name().to_string(),
        };
        match self.call(request)? {
            Response::Done => Ok(()),
            other => Err(self.unexpected(Method::Truncate, other)),
        }
    }

    /// Scans rows from `start` to `finish` (both inclusive; empty means
    /// unbounded), yielding at most `row_limit` rows.
    ///
    /// Pages hold `buffer_size` rows, the handle's default when `None`.
    pub fn get_range(
        &self,
        start: impl Into<Value>,
        finish: impl Into<Value>,
        row_limit: Option<u32>,
        opts: &SliceOptions,
        buffer_size: Option<usize>,
    ) -> Result<RangeIterator<R>> {
        let buffer_size = buffer_size.unwrap_or(self.options.buffer_size);
        let predicates = self.predicates();
        let range = predicates.key_range(Some(&start.into()), Some(&finish.into()), 0)?;
        let pages = RangePages::new(
            Arc::clone(&self.rpc),
            predicates.column_parent(opts.super_column.as_ref())?,
            predicates.slice_predicate(opts)?,
            range.end_key,
            self.read_consistency(opts),
        );
        PagedRows::new(
            pages,
            Arc::clone(&self.config),
            self.options.include_timestamp,
            range.start_key,
            row_limit,
            buffer_size,
        )
    }

    /// Scans rows matching an index clause. The clause's count is the row
    /// limit; its start key is where the scan begins.
    pub fn get_indexed_slices(
        &self,
        clause: &IndexClause,
        opts: &SliceOptions,
        buffer_size: Option<usize>,
    ) -> Result<IndexedIterator<R>> {
        let buffer_size = buffer_size.unwrap_or(self.options.buffer_size);
        let predicates = self.predicates();
        let clause = predicates.index_clause(clause)?;
        let start_key = clause.start_key.clone();
        let row_limit = clause.count;
        let pages = IndexedPages::new(
            Arc::clone(&self.rpc),
            predicates.column_parent(opts.super_column.as_ref())?,
            predicates.slice_predicate(opts)?,
            clause,
            self.read_consistency(opts),
        );
        PagedRows::new(
            pages,
            Arc::clone(&self.config),
            self.options.include_timestamp,
            start_key,
            Some(row_limit),
            buffer_size,
        )
    }

    fn predicates(&self) -> PredicateBuilder<'_> {
        PredicateBuilder::new(&self.config).column_count(self.options.column_count)
    }

    fn decoder(&self) -> ResultDecoder<'_> {
        ResultDecoder::new(&self.config, self.options.include_timestamp)
    }

    fn read_consistency(&self, opts: &SliceOptions) -> ConsistencyLevel {
        opts.consistency.unwrap_or(self.options.read_consistency)
    }

    fn write_consistency(&self, opts: &WriteOptions) -> ConsistencyLevel {
        opts.consistency.unwrap_or(self.options.write_consistency)
    }

    /// Encodes keys, dropping duplicates and keeping first-seen order.
    fn encode_keys<K: Into<Value>>(
        &self,
        keys: impl IntoIterator<Item = K>,
    ) -> Result<IndexMap<Vec<u8>, Value>> {
        let mut encoded = IndexMap::new();
        for key in keys {
            let key = key.into();
            encoded.entry(self.config.encode_key(&key)?).or_insert(key);
        }
        Ok(encoded)
    }

    fn call(&self, request: Request) -> Result<Response> {
        Ok(traced_call(&*self.rpc, self.name(), request)?)
    }

    fn unexpected(&self, method: Method, response: Response) -> Error {
        tracing::debug!(table = self.name(), %method, got = response.kind(), "unexpected response");
        Error::UnexpectedResponse {
            method,
            got: response.kind(),
        }
    }
}
