//! The RPC collaborator the client talks to.
//!
//! Transport, connection pooling and retries live behind [`Rpc`]; the client
//! only shapes requests and interprets responses.

use pillar_core::schema::KsDef;
use pillar_core::wire::{
    ColumnOrSuperColumn, ColumnParent, ColumnPath, ConsistencyLevel, CounterColumn, IndexClause,
    KeyRange, KeySlice, MutationBatch, SlicePredicate,
};
use std::fmt;

/// A store that answers marshalled requests.
pub trait Rpc {
    /// Performs one round trip.
    fn call(&self, request: Request) -> Result<Response, RpcError>;

    /// Returns the schema of a keyspace.
    fn describe_keyspace(&self, keyspace: &str) -> Result<KsDef, RpcError>;
}

impl<R: Rpc + ?Sized> Rpc for std::sync::Arc<R> {
    fn call(&self, request: Request) -> Result<Response, RpcError> {
        (**self).call(request)
    }

    fn describe_keyspace(&self, keyspace: &str) -> Result<KsDef, RpcError> {
        (**self).describe_keyspace(keyspace)
    }
}

/// Performs one round trip inside an `rpc` span.
pub(crate) fn traced_call<R: Rpc + ?Sized>(
    rpc: &R,
    table: &str,
    request: Request,
) -> Result<Response, RpcError> {
    let method = request.method();
    let span = tracing::debug_span!("rpc", method = method.name(), table);
    let _enter = span.enter();
    let result = rpc.call(request);
    if let Err(err) = &result {
        tracing::debug!(kind = ?err.kind, message = %err.message, "rpc failed");
    }
    result
}

/// The remote procedure a request invokes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    GetSlice,
    MultigetSlice,
    GetRangeSlices,
    GetIndexedSlices,
    GetCount,
    MultigetCount,
    BatchMutate,
    Add,
    Remove,
    RemoveCounter,
    Truncate,
}

impl Method {
    pub fn name(self) -> &'static str {
        match self {
            Method::GetSlice => "get_slice",
            Method::MultigetSlice => "multiget_slice",
            Method::GetRangeSlices => "get_range_slices",
            Method::GetIndexedSlices => "get_indexed_slices",
            Method::GetCount => "get_count",
            Method::MultigetCount => "multiget_count",
            Method::BatchMutate => "batch_mutate",
            Method::Add => "add",
            Method::Remove => "remove",
            Method::RemoveCounter => "remove_counter",
            Method::Truncate => "truncate",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A marshalled request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    GetSlice {
        key: Vec<u8>,
        parent: ColumnParent,
        predicate: SlicePredicate,
        consistency: ConsistencyLevel,
    },
    MultigetSlice {
        keys: Vec<Vec<u8>>,
        parent: ColumnParent,
        predicate: SlicePredicate,
        consistency: ConsistencyLevel,
    },
    GetRangeSlices {
        parent: ColumnParent,
        predicate: SlicePredicate,
        range: KeyRange,
        consistency: ConsistencyLevel,
    },
    GetIndexedSlices {
        parent: ColumnParent,
        clause: IndexClause,
        predicate: SlicePredicate,
        consistency: ConsistencyLevel,
    },
    GetCount {
        key: Vec<u8>,
        parent: ColumnParent,
        predicate: SlicePredicate,
        consistency: ConsistencyLevel,
    },
    MultigetCount {
        keys: Vec<Vec<u8>>,
        parent: ColumnParent,
        predicate: SlicePredicate,
        consistency: ConsistencyLevel,
    },
    BatchMutate {
        mutations: MutationBatch,
        consistency: ConsistencyLevel,
    },
    Add {
        key: Vec<u8>,
        parent: ColumnParent,
        column: CounterColumn,
        consistency: ConsistencyLevel,
    },
    Remove {
        key: Vec<u8>,
        path: ColumnPath,
        timestamp: i64,
        consistency: ConsistencyLevel,
    },
    RemoveCounter {
        key: Vec<u8>,
        path: ColumnPath,
        consistency: ConsistencyLevel,
    },
    Truncate {
        table_name: String,
    },
}

impl Request {
    pub fn method(&self) -> Method {
        match self {
            Request::GetSlice { .. } => Method::GetSlice,
            Request::MultigetSlice { .. } => Method::MultigetSlice,
            Request::GetRangeSlices { .. } => Method::GetRangeSlices,
            Request::GetIndexedSlices { .. } => Method::GetIndexedSlices,
            Request::GetCount { .. } => Method::GetCount,
            Request::MultigetCount { .. } => Method::MultigetCount,
            Request::BatchMutate { .. } => Method::BatchMutate,
            Request::Add { .. } => Method::Add,
            Request::Remove { .. } => Method::Remove,
            Request::RemoveCounter { .. } => Method::RemoveCounter,
            Request::Truncate { .. } => Method::Truncate,
        }
    }
}

/// A response; each method answers with exactly one variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    /// `get_slice`
    Slice(Vec<ColumnOrSuperColumn>),
    /// `multiget_slice`, keyed by raw row key. Keys without data may be
    /// absent or carry an empty slice.
    MultiSlice(Vec<(Vec<u8>, Vec<ColumnOrSuperColumn>)>),
    /// `get_range_slices` and `get_indexed_slices`
    KeySlices(Vec<KeySlice>),
    /// `get_count`
    Count(u32),
    /// `multiget_count`
    MultiCount(Vec<(Vec<u8>, u32)>),
    /// Writes and `truncate`
    Done,
}

impl Response {
    pub fn kind(&self) -> &'static str {
        match self {
            Response::Slice(_) => "slice",
            Response::MultiSlice(_) => "multi_slice",
            Response::KeySlices(_) => "key_slices",
            Response::Count(_) => "count",
            Response::MultiCount(_) => "multi_count",
            Response::Done => "done",
        }
    }
}

/// Category of a collaborator failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RpcErrorKind {
    /// The connection failed or was closed.
    Transport,
    /// The store did not answer in time.
    TimedOut,
    /// Not enough replicas for the requested consistency level.
    Unavailable,
    /// The store rejected the request.
    InvalidRequest,
}

/// A failure reported by the collaborator. Passed to callers unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind:?}: {message}")]
pub struct RpcError {
    pub kind: RpcErrorKind,
    pub message: String,
}

impl RpcError {
    pub fn new(kind: RpcErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
