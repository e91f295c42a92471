//! In-memory store answering client requests, for integration tests.
//!
//! Row keys and column names sort bytewise. Every request is recorded so
//! tests can count round trips per method.

#![allow(dead_code)]

use pillar_client::{Method, Request, Response, Rpc, RpcError, RpcErrorKind};
use pillar_core::schema::{CfDef, ColumnDef, ColumnType, IndexType, KsDef};
use pillar_core::wire::{
    Column, ColumnOrSuperColumn, ColumnPath, CounterColumn, CounterSuperColumn, Deletion,
    IndexClause, IndexOperator, KeySlice, Mutation, SlicePredicate, SuperColumn,
};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

pub const KEYSPACE: &str = "app";

#[derive(Clone, Debug)]
enum Entry {
    Column(Column),
    Super(BTreeMap<Vec<u8>, Column>),
    Counter(i64),
    CounterSuper(BTreeMap<Vec<u8>, i64>),
}

type Row = BTreeMap<Vec<u8>, Entry>;
type Table = BTreeMap<Vec<u8>, Row>;

#[derive(Default)]
struct State {
    tables: BTreeMap<String, Table>,
    requests: Vec<Request>,
    failure: Option<(Method, RpcError)>,
    describes: usize,
}

pub struct MemoryStore {
    keyspace: KsDef,
    state: RefCell<State>,
}

impl MemoryStore {
    pub fn new(keyspace: KsDef) -> Arc<Self> {
        Arc::new(Self {
            keyspace,
            state: RefCell::new(State::default()),
        })
    }

    /// A store serving [`schema`].
    pub fn with_default_schema() -> Arc<Self> {
        Self::new(schema())
    }

    /// Number of requests made with `method`.
    pub fn calls(&self, method: Method) -> usize {
        self.state
            .borrow()
            .requests
            .iter()
            .filter(|r| r.method() == method)
            .count()
    }

    pub fn requests(&self) -> Vec<Request> {
        self.state.borrow().requests.clone()
    }

    pub fn describe_calls(&self) -> usize {
        self.state.borrow().describes
    }

    pub fn reset_calls(&self) {
        self.state.borrow_mut().requests.clear();
    }

    /// Fails the next request made with `method`.
    pub fn fail_next(&self, method: Method, error: RpcError) {
        self.state.borrow_mut().failure = Some((method, error));
    }

    /// Leaves a row without columns, as a range scan sees a deleted row.
    pub fn put_ghost(&self, table: &str, key: &[u8]) {
        self.state
            .borrow_mut()
            .tables
            .entry(table.to_string())
            .or_default()
            .insert(key.to_vec(), Row::new());
    }

    /// Writes a raw column directly.
    pub fn put_raw(&self, table: &str, key: &[u8], name: &[u8], value: &[u8]) {
        self.state
            .borrow_mut()
            .tables
            .entry(table.to_string())
            .or_default()
            .entry(key.to_vec())
            .or_default()
            .insert(
                name.to_vec(),
                Entry::Column(Column::new(name.to_vec(), value.to_vec(), 0)),
            );
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.state
            .borrow()
            .tables
            .get(table)
            .map_or(0, |t| t.values().filter(|r| !r.is_empty()).count())
    }

    fn handle(&self, request: Request) -> Result<Response, RpcError> {
        let mut state = self.state.borrow_mut();
        match request {
            Request::GetSlice {
                key,
                parent,
                predicate,
                ..
            } => {
                let items = state
                    .row(&parent.table_name, &key)
                    .map(|row| slice(row, parent.super_column.as_deref(), &predicate))
                    .unwrap_or_default();
                Ok(Response::Slice(items))
            }
            Request::MultigetSlice {
                keys,
                parent,
                predicate,
                ..
            } => {
                let rows = keys
                    .into_iter()
                    .map(|key| {
                        let items = state
                            .row(&parent.table_name, &key)
                            .map(|row| slice(row, parent.super_column.as_deref(), &predicate))
                            .unwrap_or_default();
                        (key, items)
                    })
                    .collect();
                Ok(Response::MultiSlice(rows))
            }
            Request::GetRangeSlices {
                parent,
                predicate,
                range,
                ..
            } => {
                let Some(table) = state.tables.get(&parent.table_name) else {
                    return Ok(Response::KeySlices(Vec::new()));
                };
                let rows = table
                    .range::<Vec<u8>, _>((bound(range.start_key), bound(range.end_key)))
                    .take(range.count as usize)
                    .map(|(key, row)| KeySlice {
                        key: key.clone(),
                        columns: slice(row, parent.super_column.as_deref(), &predicate),
                    })
                    .collect();
                Ok(Response::KeySlices(rows))
            }
            Request::GetIndexedSlices {
                parent,
                clause,
                predicate,
                ..
            } => {
                let Some(table) = state.tables.get(&parent.table_name) else {
                    return Ok(Response::KeySlices(Vec::new()));
                };
                let rows = table
                    .range::<Vec<u8>, _>((bound(clause.start_key.clone()), Bound::Unbounded))
                    .filter(|(_, row)| matches(row, &clause))
                    .take(clause.count as usize)
                    .map(|(key, row)| KeySlice {
                        key: key.clone(),
                        columns: slice(row, parent.super_column.as_deref(), &predicate),
                    })
                    .collect();
                Ok(Response::KeySlices(rows))
            }
            Request::GetCount {
                key,
                parent,
                predicate,
                ..
            } => {
                let count = state
                    .row(&parent.table_name, &key)
                    .map_or(0, |row| slice(row, parent.super_column.as_deref(), &predicate).len());
                Ok(Response::Count(count as u32))
            }
            Request::MultigetCount {
                keys,
                parent,
                predicate,
                ..
            } => {
                let counts = keys
                    .into_iter()
                    .map(|key| {
                        let count = state.row(&parent.table_name, &key).map_or(0, |row| {
                            slice(row, parent.super_column.as_deref(), &predicate).len()
                        });
                        (key, count as u32)
                    })
                    .collect();
                Ok(Response::MultiCount(counts))
            }
            Request::BatchMutate { mutations, .. } => {
                for (key, by_table) in mutations {
                    for (table, mutations) in by_table {
                        let row = state.row_mut(&table, &key);
                        for mutation in mutations {
                            match mutation {
                                Mutation::Upsert(item) => upsert(row, item),
                                Mutation::Delete(deletion) => delete(row, deletion)?,
                            }
                        }
                    }
                }
                Ok(Response::Done)
            }
            Request::Add {
                key,
                parent,
                column,
                ..
            } => {
                let row = state.row_mut(&parent.table_name, &key);
                match parent.super_column {
                    Some(sc) => {
                        let entry = row
                            .entry(sc)
                            .or_insert_with(|| Entry::CounterSuper(BTreeMap::new()));
                        if let Entry::CounterSuper(counters) = entry {
                            *counters.entry(column.name).or_insert(0) += column.value;
                        }
                    }
                    None => {
                        let entry = row.entry(column.name).or_insert(Entry::Counter(0));
                        if let Entry::Counter(v) = entry {
                            *v += column.value;
                        }
                    }
                }
                Ok(Response::Done)
            }
            Request::Remove { key, path, .. } | Request::RemoveCounter { key, path, .. } => {
                let row = state.row_mut(&path.table_name, &key);
                remove_path(row, path);
                Ok(Response::Done)
            }
            Request::Truncate { table_name } => {
                state.tables.remove(&table_name);
                Ok(Response::Done)
            }
        }
    }
}

impl Rpc for MemoryStore {
    fn call(&self, request: Request) -> Result<Response, RpcError> {
        {
            let mut state = self.state.borrow_mut();
            state.requests.push(request.clone());
            if state
                .failure
                .as_ref()
                .is_some_and(|(method, _)| *method == request.method())
            {
                if let Some((_, err)) = state.failure.take() {
                    return Err(err);
                }
            }
        }
        self.handle(request)
    }

    fn describe_keyspace(&self, keyspace: &str) -> Result<KsDef, RpcError> {
        self.state.borrow_mut().describes += 1;
        if keyspace == self.keyspace.name() {
            Ok(self.keyspace.clone())
        } else {
            Err(RpcError::new(
                RpcErrorKind::InvalidRequest,
                format!("keyspace {keyspace} does not exist"),
            ))
        }
    }
}

impl State {
    fn row(&self, table: &str, key: &[u8]) -> Option<&Row> {
        self.tables.get(table)?.get(key)
    }

    fn row_mut(&mut self, table: &str, key: &[u8]) -> &mut Row {
        self.tables
            .entry(table.to_string())
            .or_default()
            .entry(key.to_vec())
            .or_default()
    }
}

fn bound(key: Vec<u8>) -> Bound<Vec<u8>> {
    if key.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Included(key)
    }
}

fn item(name: &[u8], entry: &Entry) -> ColumnOrSuperColumn {
    match entry {
        Entry::Column(c) => ColumnOrSuperColumn::column(c.clone()),
        Entry::Super(columns) => ColumnOrSuperColumn::super_column(SuperColumn {
            name: name.to_vec(),
            columns: columns.values().cloned().collect(),
        }),
        Entry::Counter(v) => ColumnOrSuperColumn::counter_column(CounterColumn {
            name: name.to_vec(),
            value: *v,
        }),
        Entry::CounterSuper(counters) => {
            ColumnOrSuperColumn::counter_super_column(CounterSuperColumn {
                name: name.to_vec(),
                columns: counters
                    .iter()
                    .map(|(n, v)| CounterColumn {
                        name: n.clone(),
                        value: *v,
                    })
                    .collect(),
            })
        }
    }
}

/// Named items of a row, or of one of its super columns, in name order.
fn items(row: &Row, super_column: Option<&[u8]>) -> Vec<(Vec<u8>, ColumnOrSuperColumn)> {
    match super_column {
        None => row
            .iter()
            .map(|(name, entry)| (name.clone(), item(name, entry)))
            .collect(),
        Some(sc) => match row.get(sc) {
            Some(Entry::Super(columns)) => columns
                .iter()
                .map(|(name, c)| (name.clone(), ColumnOrSuperColumn::column(c.clone())))
                .collect(),
            Some(Entry::CounterSuper(counters)) => counters
                .iter()
                .map(|(name, v)| {
                    (
                        name.clone(),
                        item(name, &Entry::Counter(*v)),
                    )
                })
                .collect(),
            _ => Vec::new(),
        },
    }
}

fn slice(
    row: &Row,
    super_column: Option<&[u8]>,
    predicate: &SlicePredicate,
) -> Vec<ColumnOrSuperColumn> {
    let items = items(row, super_column);
    match predicate {
        SlicePredicate::Names(names) => items
            .into_iter()
            .filter(|(name, _)| names.contains(name))
            .map(|(_, item)| item)
            .collect(),
        SlicePredicate::Range(range) => {
            let in_range = |name: &Vec<u8>| {
                let (low, high) = if range.reversed {
                    (&range.finish, &range.start)
                } else {
                    (&range.start, &range.finish)
                };
                (low.is_empty() || name >= low) && (high.is_empty() || name <= high)
            };
            let selected = items.into_iter().filter(|(name, _)| in_range(name));
            let ordered: Vec<_> = if range.reversed {
                selected.rev().collect()
            } else {
                selected.collect()
            };
            ordered
                .into_iter()
                .take(range.count as usize)
                .map(|(_, item)| item)
                .collect()
        }
    }
}

fn matches(row: &Row, clause: &IndexClause) -> bool {
    clause.expressions.iter().all(|expr| {
        let Some(Entry::Column(column)) = row.get(&expr.column_name) else {
            return false;
        };
        let v = &column.value;
        match expr.op {
            IndexOperator::Eq => *v == expr.value,
            IndexOperator::Gt => *v > expr.value,
            IndexOperator::Gte => *v >= expr.value,
            IndexOperator::Lt => *v < expr.value,
            IndexOperator::Lte => *v <= expr.value,
        }
    })
}

fn upsert(row: &mut Row, item: ColumnOrSuperColumn) {
    if let Some(column) = item.column {
        row.insert(column.name.clone(), Entry::Column(column));
    } else if let Some(sc) = item.super_column {
        let entry = row
            .entry(sc.name)
            .or_insert_with(|| Entry::Super(BTreeMap::new()));
        if let Entry::Super(columns) = entry {
            for column in sc.columns {
                columns.insert(column.name.clone(), column);
            }
        }
    }
}

fn delete(row: &mut Row, deletion: Deletion) -> Result<(), RpcError> {
    let names = match deletion.predicate {
        None => None,
        Some(SlicePredicate::Names(names)) => Some(names),
        Some(SlicePredicate::Range(_)) => {
            return Err(RpcError::new(
                RpcErrorKind::InvalidRequest,
                "range deletions are not supported",
            ))
        }
    };
    match (deletion.super_column, names) {
        (None, None) => row.clear(),
        (None, Some(names)) => names.iter().for_each(|n| {
            row.remove(n);
        }),
        (Some(sc), None) => {
            row.remove(&sc);
        }
        (Some(sc), Some(names)) => match row.get_mut(&sc) {
            Some(Entry::Super(columns)) => names.iter().for_each(|n| {
                columns.remove(n);
            }),
            Some(Entry::CounterSuper(counters)) => names.iter().for_each(|n| {
                counters.remove(n);
            }),
            _ => {}
        },
    }
    Ok(())
}

fn remove_path(row: &mut Row, path: ColumnPath) {
    match (path.super_column, path.column) {
        (None, None) => row.clear(),
        (None, Some(column)) => {
            row.remove(&column);
        }
        (Some(sc), None) => {
            row.remove(&sc);
        }
        (Some(sc), Some(column)) => match row.get_mut(&sc) {
            Some(Entry::Super(columns)) => {
                columns.remove(&column);
            }
            Some(Entry::CounterSuper(counters)) => {
                counters.remove(&column);
            }
            _ => {}
        },
    }
}

/// Tables used across the integration tests.
///
/// - `users`: UTF8 names, Long values by default, UTF8 keys; `name` holds
///   text and `state` is an indexed text column
/// - `events`: super table with UTF8 super column names and Long sub-column
///   names
/// - `counters`, `super_counters`: counter tables
/// - `raw`: bytes everywhere
pub fn schema() -> KsDef {
    let users = CfDef::builder("users")
        .keyspace(KEYSPACE)
        .comparator_type("org.apache.cassandra.db.marshal.UTF8Type")
        .default_validation_class("LongType")
        .key_validation_class("UTF8Type")
        .add_column(ColumnDef::new(&b"name"[..], "UTF8Type"))
        .add_column(ColumnDef::new(&b"state"[..], "UTF8Type").indexed(IndexType::Keys, "users_state"))
        .build();
    let events = CfDef::builder("events")
        .keyspace(KEYSPACE)
        .column_type(ColumnType::Super)
        .comparator_type("UTF8Type")
        .subcomparator_type("LongType")
        .default_validation_class("UTF8Type")
        .key_validation_class("UTF8Type")
        .build();
    let counters = CfDef::builder("counters")
        .keyspace(KEYSPACE)
        .comparator_type("UTF8Type")
        .default_validation_class("CounterColumnType")
        .key_validation_class("UTF8Type")
        .build();
    let super_counters = CfDef::builder("super_counters")
        .keyspace(KEYSPACE)
        .column_type(ColumnType::Super)
        .comparator_type("UTF8Type")
        .subcomparator_type("UTF8Type")
        .default_validation_class("CounterColumnType")
        .key_validation_class("UTF8Type")
        .build();
    let raw = CfDef::builder("raw").keyspace(KEYSPACE).build();
    KsDef::new(KEYSPACE, vec![users, events, counters, super_counters, raw])
}

/// Zero-padded text key, so text order matches numeric order.
pub fn key(i: usize) -> String {
    format!("key{i:04}")
}
