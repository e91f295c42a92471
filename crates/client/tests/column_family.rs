//! Integration tests for single-table reads and writes.

mod common;

use common::{key, MemoryStore, KEYSPACE};
use pillar_client::{
    columns, Cell, ColumnFamily, ColumnFamilyOptions, ColumnMap, ConsistencyLevel, Error,
    Keyspace, Method, Packing, Request, RpcError, RpcErrorKind, SliceOptions, Value,
    WriteOptions,
};
use std::sync::Arc;

fn open(store: &Arc<MemoryStore>, table: &str) -> ColumnFamily<MemoryStore> {
    ColumnFamily::open(Arc::clone(store), KEYSPACE, table).unwrap()
}

#[test]
fn test_insert_then_get_round_trips() {
    let store = MemoryStore::with_default_schema();
    let users = open(&store, "users");

    users
        .insert("row1", &columns([("a", 5i64), ("b", -3)]), &WriteOptions::new())
        .unwrap();
    let row = users.get("row1", &SliceOptions::new()).unwrap();

    assert_eq!(row, columns([("a", 5i64), ("b", -3)]));
    let names: Vec<_> = row.keys().cloned().collect();
    assert_eq!(names, vec![Value::from("a"), Value::from("b")]);
    assert_eq!(store.describe_calls(), 1);
}

#[test]
fn test_per_column_validators() {
    let store = MemoryStore::with_default_schema();
    let users = open(&store, "users");

    let row = columns([("name", Value::from("ann")), ("age", Value::Long(41))]);
    users.insert("u1", &row, &WriteOptions::new()).unwrap();

    let got = users.get("u1", &SliceOptions::new()).unwrap();
    assert_eq!(got[&Value::from("name")], Cell::Value(Value::from("ann")));
    assert_eq!(got[&Value::from("age")], Cell::Value(Value::Long(41)));
}

#[test]
fn test_missing_row_is_not_found() {
    let store = MemoryStore::with_default_schema();
    let users = open(&store, "users");

    let err = users.get("nobody", &SliceOptions::new()).unwrap_err();
    assert_eq!(err, Error::not_found("users", Value::from("nobody")));
}

#[test]
fn test_open_unknown_table() {
    let store = MemoryStore::with_default_schema();
    let err = ColumnFamily::open(Arc::clone(&store), KEYSPACE, "nope")
        .err()
        .unwrap();
    assert!(matches!(err, Error::UnknownTable { .. }));

    let err = ColumnFamily::open(Arc::clone(&store), "other", "users")
        .err()
        .unwrap();
    assert!(matches!(err, Error::Rpc(RpcError { kind: RpcErrorKind::InvalidRequest, .. })));
}

#[test]
fn test_slice_options() {
    let store = MemoryStore::with_default_schema();
    let users = open(&store, "users");
    let row = columns([("a", 1i64), ("b", 2), ("c", 3), ("d", 4)]);
    users.insert("r", &row, &WriteOptions::new()).unwrap();

    let got = users
        .get("r", &SliceOptions::new().columns(["b", "d", "z"]))
        .unwrap();
    assert_eq!(got, columns([("b", 2i64), ("d", 4)]));

    let got = users
        .get("r", &SliceOptions::new().start("b").finish("c"))
        .unwrap();
    assert_eq!(got, columns([("b", 2i64), ("c", 3)]));

    let got = users
        .get("r", &SliceOptions::new().reversed(true).count(2))
        .unwrap();
    let names: Vec<_> = got.keys().cloned().collect();
    assert_eq!(names, vec![Value::from("d"), Value::from("c")]);
}

#[test]
fn test_default_column_count_from_options() {
    let store = MemoryStore::with_default_schema();
    let users = open(&store, "users")
        .with_options(ColumnFamilyOptions::new().column_count(2));
    let row = columns([("a", 1i64), ("b", 2), ("c", 3)]);
    users.insert("r", &row, &WriteOptions::new()).unwrap();

    assert_eq!(users.get("r", &SliceOptions::new()).unwrap().len(), 2);
    assert_eq!(users.get("r", &SliceOptions::new().count(3)).unwrap().len(), 3);
}

#[test]
fn test_multi_get_is_chunked() {
    let store = MemoryStore::with_default_schema();
    let users = open(&store, "users");
    let rows = (0..130).map(|i| (key(i), columns([("n", i as i64)])));
    users.batch_insert(rows, &WriteOptions::new()).unwrap();
    store.reset_calls();

    let keys: Vec<String> = (0..130).map(key).collect();
    let chunked = users
        .multi_get_chunked(keys.clone(), &SliceOptions::new(), 50)
        .unwrap();

    assert_eq!(store.calls(Method::MultigetSlice), 3);
    let sizes: Vec<usize> = store
        .requests()
        .into_iter()
        .filter_map(|r| match r {
            Request::MultigetSlice { keys, .. } => Some(keys.len()),
            _ => None,
        })
        .collect();
    assert_eq!(sizes, vec![50, 50, 30]);

    let whole = users
        .multi_get_chunked(keys.clone(), &SliceOptions::new(), 1000)
        .unwrap();
    assert_eq!(chunked, whole);
    assert_eq!(chunked.len(), 130);
    assert_eq!(chunked[&Value::from(key(129))], columns([("n", 129i64)]));
}

#[test]
fn test_multi_get_keeps_request_order_and_omits_missing() {
    let store = MemoryStore::with_default_schema();
    let users = open(&store, "users");
    for i in 0..3 {
        users
            .insert(key(i), &columns([("n", i as i64)]), &WriteOptions::new())
            .unwrap();
    }

    let rows = users
        .multi_get([key(2), "missing".to_string(), key(0)], &SliceOptions::new())
        .unwrap();
    let keys: Vec<_> = rows.keys().cloned().collect();
    assert_eq!(keys, vec![Value::from(key(2)), Value::from(key(0))]);
}

#[test]
fn test_multi_get_rejects_zero_chunk() {
    let store = MemoryStore::with_default_schema();
    let users = open(&store, "users");
    let err = users
        .multi_get_chunked(["a"], &SliceOptions::new(), 0)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration(_)));
    assert_eq!(store.calls(Method::MultigetSlice), 0);
}

#[test]
fn test_counts() {
    let store = MemoryStore::with_default_schema();
    let users = open(&store, "users");
    users
        .insert("a", &columns([("x", 1i64), ("y", 2)]), &WriteOptions::new())
        .unwrap();
    users
        .insert("b", &columns([("x", 1i64)]), &WriteOptions::new())
        .unwrap();

    assert_eq!(users.get_count("a", &SliceOptions::new()).unwrap(), 2);
    assert_eq!(users.get_count("none", &SliceOptions::new()).unwrap(), 0);

    let counts = users
        .multi_get_count(["b", "a"], &SliceOptions::new())
        .unwrap();
    let pairs: Vec<_> = counts.into_iter().collect();
    assert_eq!(pairs, vec![(Value::from("b"), 1), (Value::from("a"), 2)]);
}

#[test]
fn test_remove() {
    let store = MemoryStore::with_default_schema();
    let users = open(&store, "users");
    let row = columns([("a", 1i64), ("b", 2), ("c", 3), ("d", 4)]);
    users.insert("r", &row, &WriteOptions::new()).unwrap();

    users
        .remove("r", Some(&[Value::from("a")]), None, &WriteOptions::new())
        .unwrap();
    assert_eq!(store.calls(Method::Remove), 1);

    store.reset_calls();
    let ts = users
        .remove(
            "r",
            Some(&[Value::from("b"), Value::from("c")]),
            None,
            &WriteOptions::new().timestamp(77),
        )
        .unwrap();
    assert_eq!(ts, 77);
    assert_eq!(store.calls(Method::BatchMutate), 1);
    assert_eq!(
        users.get("r", &SliceOptions::new()).unwrap(),
        columns([("d", 4i64)])
    );

    users.remove("r", None, None, &WriteOptions::new()).unwrap();
    assert!(users.get("r", &SliceOptions::new()).unwrap_err().is_not_found());
}

#[test]
fn test_super_columns() {
    let store = MemoryStore::with_default_schema();
    let events = open(&store, "events");
    let row = columns([
        ("day1", columns([(1i64, "login"), (2, "logout")])),
        ("day2", columns([(1i64, "login")])),
    ]);
    events.insert("e1", &row, &WriteOptions::new()).unwrap();

    let got = events.get("e1", &SliceOptions::new()).unwrap();
    assert_eq!(got, row);
    let day1 = got[&Value::from("day1")].as_nested().unwrap();
    assert_eq!(day1[&Value::Long(2)], Cell::from("logout"));

    // Reading within one super column returns its sub-columns
    let sub = events
        .get("e1", &SliceOptions::new().super_column("day1").columns([2i64]))
        .unwrap();
    assert_eq!(sub, columns([(2i64, "logout")]));

    // Super column names select whole super columns
    let only = events
        .get("e1", &SliceOptions::new().columns(["day2"]))
        .unwrap();
    assert_eq!(only.len(), 1);

    events
        .remove("e1", None, Some(&Value::from("day1")), &WriteOptions::new())
        .unwrap();
    let got = events.get("e1", &SliceOptions::new()).unwrap();
    let names: Vec<_> = got.keys().cloned().collect();
    assert_eq!(names, vec![Value::from("day2")]);
}

#[test]
fn test_counters() {
    let store = MemoryStore::with_default_schema();
    let counters = open(&store, "counters");

    counters.add("page", "hits", 5, None, &WriteOptions::new()).unwrap();
    counters.add("page", "hits", -2, None, &WriteOptions::new()).unwrap();
    let row = counters.get("page", &SliceOptions::new()).unwrap();
    assert_eq!(row[&Value::from("hits")], Cell::Value(Value::Long(3)));

    counters
        .remove_counter("page", Some(&Value::from("hits")), None, &WriteOptions::new())
        .unwrap();
    assert!(counters.get("page", &SliceOptions::new()).unwrap_err().is_not_found());

    let super_counters = open(&store, "super_counters");
    let day = Value::from("day1");
    super_counters
        .add("page", "views", 4, Some(&day), &WriteOptions::new())
        .unwrap();
    let row = super_counters.get("page", &SliceOptions::new()).unwrap();
    let nested = row[&day].as_nested().unwrap();
    assert_eq!(nested[&Value::from("views")].value(), Some(&Value::Long(4)));
}

#[test]
fn test_packing_toggle() {
    let store = MemoryStore::with_default_schema();
    let users = open(&store, "users");
    users
        .insert("row1", &columns([("a", 5i64)]), &WriteOptions::new())
        .unwrap();

    let raw = users.with_packing(Packing::NONE);
    let row = raw.get(&b"row1"[..], &SliceOptions::new()).unwrap();
    assert_eq!(
        row[&Value::Bytes(b"a".to_vec())],
        Cell::Value(Value::Bytes(5i64.to_be_bytes().to_vec()))
    );

    let values_only = users.with_packing(Packing {
        names: true,
        values: false,
        keys: true,
    });
    let row = values_only.get("row1", &SliceOptions::new()).unwrap();
    assert_eq!(
        row[&Value::from("a")],
        Cell::Value(Value::Bytes(5i64.to_be_bytes().to_vec()))
    );

    // The original handle is unchanged
    let row = users.get("row1", &SliceOptions::new()).unwrap();
    assert_eq!(row[&Value::from("a")], Cell::from(5i64));
}

#[test]
fn test_include_timestamp() {
    let store = MemoryStore::with_default_schema();
    let users = open(&store, "users");
    users
        .insert("r", &columns([("a", 1i64)]), &WriteOptions::new().timestamp(42))
        .unwrap();

    let timestamped = users.with_options(users.options().clone().include_timestamp(true));
    let row = timestamped.get("r", &SliceOptions::new()).unwrap();
    assert_eq!(row[&Value::from("a")].timestamp(), Some(42));
    assert_eq!(row[&Value::from("a")].value(), Some(&Value::Long(1)));
}

#[test]
fn test_write_options_reach_the_store() {
    let store = MemoryStore::with_default_schema();
    let users = open(&store, "users");
    let opts = WriteOptions::new()
        .timestamp(9)
        .ttl(60)
        .consistency(ConsistencyLevel::Quorum);
    let ts = users.insert("r", &columns([("a", 1i64)]), &opts).unwrap();
    assert_eq!(ts, 9);

    let Some(Request::BatchMutate {
        mutations,
        consistency,
    }) = store.requests().pop()
    else {
        panic!("expected a batch_mutate");
    };
    assert_eq!(consistency, ConsistencyLevel::Quorum);
    let by_table = &mutations[&b"r".to_vec()];
    let pillar_core::wire::Mutation::Upsert(item) = &by_table["users"][0] else {
        panic!("expected an upsert");
    };
    let column = item.column.as_ref().unwrap();
    assert_eq!(column.timestamp, 9);
    assert_eq!(column.ttl, Some(60));
}

#[test]
fn test_counter_writes_take_write_consistency() {
    let store = MemoryStore::with_default_schema();
    let counters = open(&store, "counters");
    let opts = WriteOptions::new().consistency(ConsistencyLevel::All);

    counters.add("page", "hits", 1, None, &opts).unwrap();
    let Some(Request::Add { consistency, .. }) = store.requests().pop() else {
        panic!("expected an add");
    };
    assert_eq!(consistency, ConsistencyLevel::All);

    counters
        .remove_counter("page", Some(&Value::from("hits")), None, &opts)
        .unwrap();
    let Some(Request::RemoveCounter { consistency, .. }) = store.requests().pop() else {
        panic!("expected a remove_counter");
    };
    assert_eq!(consistency, ConsistencyLevel::All);

    // Without an override the handle's write consistency applies
    counters.add("page", "hits", 1, None, &WriteOptions::new()).unwrap();
    let Some(Request::Add { consistency, .. }) = store.requests().pop() else {
        panic!("expected an add");
    };
    assert_eq!(consistency, ConsistencyLevel::One);
}

#[test]
fn test_cell_timestamps_override_batch_timestamp() {
    let store = MemoryStore::with_default_schema();
    let users = open(&store, "users").with_options(ColumnFamilyOptions::new().include_timestamp(true));
    let mut row = ColumnMap::new();
    row.insert(
        Value::from("a"),
        Cell::Timestamped {
            value: Value::Long(1),
            timestamp: 5,
        },
    );
    row.insert(Value::from("b"), Cell::from(2i64));
    users
        .insert("r", &row, &WriteOptions::new().timestamp(100))
        .unwrap();

    let got = users.get("r", &SliceOptions::new()).unwrap();
    assert_eq!(got[&Value::from("a")].timestamp(), Some(5));
    assert_eq!(got[&Value::from("b")].timestamp(), Some(100));
}

#[test]
fn test_codec_errors_surface() {
    let store = MemoryStore::with_default_schema();
    let users = open(&store, "users");
    let err = users
        .insert("r", &columns([("a", "not a long")]), &WriteOptions::new())
        .unwrap_err();
    assert!(matches!(err, Error::Codec(pillar_core::Error::TypeMismatch { .. })));
    assert_eq!(store.calls(Method::BatchMutate), 0);
}

#[test]
fn test_rpc_errors_propagate_unchanged() {
    let store = MemoryStore::with_default_schema();
    let users = open(&store, "users");
    let failure = RpcError::new(RpcErrorKind::TimedOut, "no answer");
    store.fail_next(Method::GetSlice, failure.clone());

    let err = users.get("r", &SliceOptions::new()).unwrap_err();
    assert_eq!(err, Error::Rpc(failure));
}

#[test]
fn test_truncate() {
    let store = MemoryStore::with_default_schema();
    let users = open(&store, "users");
    for i in 0..5 {
        users
            .insert(key(i), &columns([("n", 1i64)]), &WriteOptions::new())
            .unwrap();
    }
    assert_eq!(store.row_count("users"), 5);

    users.truncate().unwrap();
    assert_eq!(store.row_count("users"), 0);
}

#[test]
fn test_keyspace_shares_configs() {
    let store = MemoryStore::with_default_schema();
    let mut keyspace = Keyspace::connect(Arc::clone(&store), KEYSPACE).unwrap();
    assert_eq!(keyspace.name(), KEYSPACE);
    assert!(keyspace.table_names().any(|t| t == "events"));

    let a = keyspace.column_family("users").unwrap();
    let b = keyspace.column_family("users").unwrap();
    assert_eq!(keyspace.cached_configs(), 1);
    assert_eq!(a.config().table(), b.config().table());

    keyspace
        .column_family_with("users", ColumnFamilyOptions::new().packing(Packing::NONE))
        .unwrap();
    assert_eq!(keyspace.cached_configs(), 2);

    assert!(matches!(
        keyspace.column_family("nope"),
        Err(Error::UnknownTable { .. })
    ));

    keyspace.refresh_schema().unwrap();
    assert_eq!(keyspace.cached_configs(), 0);
    assert_eq!(store.describe_calls(), 2);
}
