//! Batched writes across rows and tables.

use crate::column_family::ColumnFamily;
use crate::error::{Error, Result};
use crate::rpc::{traced_call, Method, Request, Response, Rpc};
use pillar_core::wire::{ConsistencyLevel, Mutation, MutationBatch};
use pillar_core::Value;
use pillar_query::{now_micros, ColumnMap, MutationBuilder};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Accumulates mutations and sends them with one `batch_mutate` call.
///
/// With a queue size set, the batch is sent as soon as that many mutations
/// are pending.
pub struct Mutator<R> {
    rpc: Arc<R>,
    batch: MutationBatch,
    pending: usize,
    consistency: ConsistencyLevel,
    queue_size: Option<usize>,
}

impl<R: Rpc> Mutator<R> {
    pub fn new(rpc: Arc<R>, consistency: ConsistencyLevel) -> Self {
        Self {
            rpc,
            batch: MutationBatch::new(),
            pending: 0,
            consistency,
            queue_size: None,
        }
    }

    /// Sends automatically once `size` mutations are pending.
    pub fn with_queue_size(mut self, size: usize) -> Self {
        self.queue_size = Some(size.max(1));
        self
    }

    /// Number of mutations waiting to be sent.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending == 0
    }

    /// Queues upserts of `columns` under `key`. Returns the timestamp the
    /// columns are written with.
    pub fn insert(
        &mut self,
        cf: &ColumnFamily<R>,
        key: &Value,
        columns: &ColumnMap,
        timestamp: Option<i64>,
        ttl: Option<i32>,
    ) -> Result<i64> {
        let timestamp = timestamp.unwrap_or_else(now_micros);
        let mutations = MutationBuilder::new(cf.config()).upserts(columns, Some(timestamp), ttl)?;
        self.push(cf, key, mutations)?;
        Ok(timestamp)
    }

    /// Queues a deletion of a whole row, a super column, or named columns.
    pub fn remove(
        &mut self,
        cf: &ColumnFamily<R>,
        key: &Value,
        columns: Option<&[Value]>,
        super_column: Option<&Value>,
        timestamp: Option<i64>,
    ) -> Result<i64> {
        let timestamp = timestamp.unwrap_or_else(now_micros);
        let deletion =
            MutationBuilder::new(cf.config()).deletion(columns, super_column, timestamp)?;
        self.push(cf, key, vec![deletion])?;
        Ok(timestamp)
    }

    /// Sends every queued mutation and clears the queue. An empty queue
    /// sends nothing. On failure the queue is kept so the send can be
    /// retried.
    pub fn send(&mut self) -> Result<()> {
        if self.batch.is_empty() {
            return Ok(());
        }
        let rows = self.batch.len();
        let tables = self
            .batch
            .values()
            .flat_map(|by_table| by_table.keys().map(String::as_str))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>()
            .join(",");
        tracing::debug!(rows, mutations = self.pending, "sending batch");

        let request = Request::BatchMutate {
            mutations: self.batch.clone(),
            consistency: self.consistency,
        };
        match traced_call(&*self.rpc, &tables, request)? {
            Response::Done => {
                self.batch.clear();
                self.pending = 0;
                Ok(())
            }
            other => Err(Error::UnexpectedResponse {
                method: Method::BatchMutate,
                got: other.kind(),
            }),
        }
    }

    fn push(&mut self, cf: &ColumnFamily<R>, key: &Value, mutations: Vec<Mutation>) -> Result<()> {
        if mutations.is_empty() {
            return Ok(());
        }
        let raw_key = cf.config().encode_key(key)?;
        self.pending += mutations.len();
        self.batch
            .entry(raw_key)
            .or_default()
            .entry(cf.name().to_string())
            .or_default()
            .extend(mutations);

        match self.queue_size {
            Some(size) if self.pending >= size => self.send(),
            _ => Ok(()),
        }
    }
}
