//! Paginated scans over row ranges and secondary indexes.
//!
//! A scan fetches pages of at most `buffer_size` rows. Each continuation
//! page starts at the last key seen, so its first row repeats the previous
//! page's boundary row; that row is dropped once. The scan ends when the row
//! limit is reached or a page comes back shorter than requested.

use crate::error::{Error, Result};
use crate::rpc::{traced_call, Request, Response, Rpc};
use pillar_core::wire::{self, ColumnParent, ConsistencyLevel, KeyRange, KeySlice, SlicePredicate};
use pillar_core::Value;
use pillar_marshal::CodecConfig;
use pillar_query::{DecodedRow, ResultDecoder};
use std::collections::VecDeque;
use std::sync::Arc;

/// Smallest page that still makes progress past the boundary row.
pub const MIN_BUFFER_SIZE: usize = 2;

/// Fetches one page of rows starting at a raw key (inclusive).
pub trait PageSource {
    fn fetch(&mut self, start_key: &[u8], count: u32) -> Result<Vec<KeySlice>>;
}

/// Pages of a key range scan.
pub struct RangePages<R> {
    rpc: Arc<R>,
    parent: ColumnParent,
    predicate: SlicePredicate,
    end_key: Vec<u8>,
    consistency: ConsistencyLevel,
}

impl<R: Rpc> RangePages<R> {
    pub(crate) fn new(
        rpc: Arc<R>,
        parent: ColumnParent,
        predicate: SlicePredicate,
        end_key: Vec<u8>,
        consistency: ConsistencyLevel,
    ) -> Self {
        Self {
            rpc,
            parent,
            predicate,
            end_key,
            consistency,
        }
    }
}

impl<R: Rpc> PageSource for RangePages<R> {
    fn fetch(&mut self, start_key: &[u8], count: u32) -> Result<Vec<KeySlice>> {
        let request = Request::GetRangeSlices {
            parent: self.parent.clone(),
            predicate: self.predicate.clone(),
            range: KeyRange {
                start_key: start_key.to_vec(),
                end_key: self.end_key.clone(),
                count,
            },
            consistency: self.consistency,
        };
        key_slices(&*self.rpc, &self.parent.table_name, request)
    }
}

/// Pages of a secondary-index scan. Each page re-submits the clause with
/// its start key advanced and its count shrunk to the remaining budget.
pub struct IndexedPages<R> {
    rpc: Arc<R>,
    parent: ColumnParent,
    predicate: SlicePredicate,
    clause: wire::IndexClause,
    consistency: ConsistencyLevel,
}

impl<R: Rpc> IndexedPages<R> {
    pub(crate) fn new(
        rpc: Arc<R>,
        parent: ColumnParent,
        predicate: SlicePredicate,
        clause: wire::IndexClause,
        consistency: ConsistencyLevel,
    ) -> Self {
        Self {
            rpc,
            parent,
            predicate,
            clause,
            consistency,
        }
    }
}

impl<R: Rpc> PageSource for IndexedPages<R> {
    fn fetch(&mut self, start_key: &[u8], count: u32) -> Result<Vec<KeySlice>> {
        let mut clause = self.clause.clone();
        clause.start_key = start_key.to_vec();
        clause.count = count;
        let request = Request::GetIndexedSlices {
            parent: self.parent.clone(),
            clause,
            predicate: self.predicate.clone(),
            consistency: self.consistency,
        };
        key_slices(&*self.rpc, &self.parent.table_name, request)
    }
}

fn key_slices<R: Rpc>(rpc: &R, table: &str, request: Request) -> Result<Vec<KeySlice>> {
    let method = request.method();
    match traced_call(rpc, table, request)? {
        Response::KeySlices(slices) => Ok(slices),
        other => Err(Error::UnexpectedResponse {
            method,
            got: other.kind(),
        }),
    }
}

enum Cursor {
    Fresh,
    Yielding {
        page: VecDeque<KeySlice>,
        /// The page was as long as requested, so more rows may follow.
        full: bool,
    },
    Exhausted,
}

/// Forward-only iterator over the decoded rows of a paged scan.
///
/// Rows without columns are skipped and do not count toward the limit.
/// Any error ends the scan.
pub struct PagedRows<S> {
    source: S,
    config: Arc<CodecConfig>,
    include_timestamp: bool,
    buffer_size: u32,
    row_limit: Option<u32>,
    rows_emitted: u64,
    start_key: Vec<u8>,
    last_key: Vec<u8>,
    cursor: Cursor,
}

/// Rows of a key range.
pub type RangeIterator<R> = PagedRows<RangePages<R>>;

/// Rows matching an index clause.
pub type IndexedIterator<R> = PagedRows<IndexedPages<R>>;

impl<S: PageSource> PagedRows<S> {
    /// Fails when `buffer_size` is below [`MIN_BUFFER_SIZE`]; no page is
    /// fetched before the first call to `next`.
    pub(crate) fn new(
        source: S,
        config: Arc<CodecConfig>,
        include_timestamp: bool,
        start_key: Vec<u8>,
        row_limit: Option<u32>,
        buffer_size: usize,
    ) -> Result<Self> {
        if buffer_size < MIN_BUFFER_SIZE {
            return Err(Error::invalid_configuration(format!(
                "buffer_size must be at least {MIN_BUFFER_SIZE}, got {buffer_size}"
            )));
        }
        Ok(Self {
            source,
            config,
            include_timestamp,
            buffer_size: u32::try_from(buffer_size).unwrap_or(u32::MAX),
            row_limit,
            rows_emitted: 0,
            last_key: start_key.clone(),
            start_key,
            cursor: Cursor::Fresh,
        })
    }

    /// Number of rows yielded so far.
    pub fn rows_emitted(&self) -> u64 {
        self.rows_emitted
    }

    fn remaining(&self) -> Option<u32> {
        let emitted = u32::try_from(self.rows_emitted).unwrap_or(u32::MAX);
        self.row_limit.map(|limit| limit.saturating_sub(emitted))
    }

    fn limit_reached(&self) -> bool {
        self.remaining() == Some(0)
    }

    fn first_page(&mut self) -> Result<Cursor> {
        let count = self
            .remaining()
            .map_or(self.buffer_size, |r| r.min(self.buffer_size));
        let start_key = self.start_key.clone();
        let page = self.source.fetch(&start_key, count)?;
        tracing::debug!(requested = count, received = page.len(), "fetched first page");
        Ok(Self::cursor_for(page.into(), count))
    }

    fn next_page(&mut self) -> Result<Cursor> {
        // One extra row for the boundary
        let count = self.remaining().map_or(self.buffer_size, |r| {
            r.saturating_add(1).min(self.buffer_size)
        });
        let last_key = self.last_key.clone();
        let mut page: VecDeque<KeySlice> = self.source.fetch(&last_key, count)?.into();
        tracing::trace!(requested = count, received = page.len(), "fetched continuation page");

        let received = page.len();
        if page.front().is_some_and(|row| row.key == last_key) {
            page.pop_front();
        }
        if page.is_empty() {
            return Ok(Cursor::Exhausted);
        }
        Ok(Cursor::Yielding {
            page,
            full: received >= count as usize,
        })
    }

    fn cursor_for(page: VecDeque<KeySlice>, requested: u32) -> Cursor {
        if page.is_empty() {
            return Cursor::Exhausted;
        }
        let full = page.len() >= requested as usize;
        Cursor::Yielding { page, full }
    }

    fn decode(&self, slice: &KeySlice) -> Result<(Value, Option<DecodedRow>)> {
        Ok(ResultDecoder::new(&self.config, self.include_timestamp).decode_key_slice(slice)?)
    }

    fn advance(&mut self) -> Result<Option<(Value, DecodedRow)>> {
        loop {
            if self.limit_reached() {
                self.cursor = Cursor::Exhausted;
            }
            let next = match &mut self.cursor {
                Cursor::Exhausted => return Ok(None),
                Cursor::Fresh => None,
                Cursor::Yielding { page, full } => Some((page.pop_front(), *full)),
            };
            match next {
                None => self.cursor = self.first_page()?,
                Some((Some(slice), _)) => {
                    self.last_key.clone_from(&slice.key);
                    match self.decode(&slice)? {
                        (key, Some(row)) => {
                            self.rows_emitted += 1;
                            return Ok(Some((key, row)));
                        }
                        (key, None) => tracing::trace!(?key, "skipping row without columns"),
                    }
                }
                Some((None, true)) => self.cursor = self.next_page()?,
                Some((None, false)) => self.cursor = Cursor::Exhausted,
            }
        }
    }
}

impl<S: PageSource> Iterator for PagedRows<S> {
    type Item = Result<(Value, DecodedRow)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                tracing::debug!(rows = self.rows_emitted, "scan finished");
                None
            }
            Err(err) => {
                self.cursor = Cursor::Exhausted;
                Some(Err(err))
            }
        }
    }
}
