//! # Builtins and Schema-Qualified Access Tests
//!
//! `CURRENT_DATABASE()` / `CURRENT_SCHEMA()` / `now()`, schema-qualified
//! tables with aliases, and defaults resolved at insert time.

use ephemdb::{Database, Registry, Value};

#[test]
fn current_database_without_from() {
    let db = Database::new("mydb");
    let (_, rows) = db.query("SELECT CURRENT_DATABASE()", &[]).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get_text(0).unwrap(), "mydb");
}

#[test]
fn current_database_reflects_registry_name() {
    let registry = Registry::new();
    let db = registry.open("registered");
    let (_, rows) = db.query("SELECT CURRENT_DATABASE()", &[]).unwrap();
    assert_eq!(rows[0].get_text(0).unwrap(), "registered");
}

#[test]
fn current_schema_is_public() {
    let db = Database::new("mydb");
    let (_, rows) = db.query("SELECT CURRENT_SCHEMA()", &[]).unwrap();
    assert_eq!(rows[0].get_text(0).unwrap(), "public");
}

#[test]
fn now_yields_a_timestamp() {
    let db = Database::new("mydb");
    let (_, rows) = db.query("SELECT now()", &[]).unwrap();
    match rows[0].get(0) {
        Some(Value::Timestamp(us)) => assert!(*us > 0),
        other => panic!("expected timestamp, got {:?}", other),
    }
}

#[test]
fn schema_qualified_select_with_alias() {
    let db = Database::new("mydb");
    db.execute("CREATE SCHEMA foo", &[]).unwrap();
    db.execute(
        "CREATE TABLE foo.products (id BIGSERIAL PRIMARY KEY, name TEXT)",
        &[],
    )
    .unwrap();
    db.execute("INSERT INTO foo.products (name) VALUES ('Widget')", &[])
        .unwrap();

    let (_, rows) = db
        .query("SELECT name FROM foo.products WHERE id = 1", &[])
        .unwrap();
    assert_eq!(rows[0].get_text(0).unwrap(), "Widget");

    let (_, rows) = db
        .query("SELECT p.name FROM foo.products AS p WHERE p.id = 1", &[])
        .unwrap();
    assert_eq!(rows[0].get_text(0).unwrap(), "Widget");
}

#[test]
fn same_table_name_in_two_schemas() {
    let db = Database::new("mydb");
    db.execute("CREATE SCHEMA foo", &[]).unwrap();
    db.execute("CREATE TABLE items (id INT PRIMARY KEY)", &[]).unwrap();
    db.execute("CREATE TABLE foo.items (id INT PRIMARY KEY)", &[])
        .unwrap();

    db.execute("INSERT INTO items (id) VALUES (1)", &[]).unwrap();
    db.execute("INSERT INTO foo.items (id) VALUES (10), (20)", &[])
        .unwrap();

    let (_, rows) = db.query("SELECT count(*) FROM items", &[]).unwrap();
    assert_eq!(rows[0].get_int(0).unwrap(), 1);
    let (_, rows) = db.query("SELECT count(*) FROM foo.items", &[]).unwrap();
    assert_eq!(rows[0].get_int(0).unwrap(), 2);
}

#[test]
fn default_now_fills_timestamp_column() {
    let db = Database::new("mydb");
    db.execute(
        "CREATE TABLE events (id BIGSERIAL PRIMARY KEY, \
         created_at TIMESTAMP DEFAULT now())",
        &[],
    )
    .unwrap();
    db.execute("INSERT INTO events (id) VALUES (DEFAULT)", &[])
        .unwrap();

    let (_, rows) = db.query("SELECT created_at FROM events", &[]).unwrap();
    match rows[0].get(0) {
        Some(Value::Timestamp(us)) => assert!(*us > 0),
        other => panic!("expected timestamp default, got {:?}", other),
    }
}

#[test]
fn timestamp_literals_compare_in_predicates() {
    let db = Database::new("mydb");
    db.execute(
        "CREATE TABLE logs (id INT PRIMARY KEY, at TIMESTAMP)",
        &[],
    )
    .unwrap();
    db.execute(
        "INSERT INTO logs (id, at) VALUES \
         (1, '2020-01-01 00:00:00'), (2, '2024-06-15 12:30:00')",
        &[],
    )
    .unwrap();

    let (_, rows) = db
        .query("SELECT id FROM logs WHERE at > '2022-01-01'", &[])
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get_int(0).unwrap(), 2);
}

#[test]
fn select_now_from_table_repeats_per_row() {
    let db = Database::new("mydb");
    db.execute("CREATE TABLE t (id INT PRIMARY KEY)", &[]).unwrap();
    db.execute("INSERT INTO t (id) VALUES (1), (2)", &[]).unwrap();

    let (_, rows) = db.query("SELECT now() FROM t", &[]).unwrap();
    assert_eq!(rows.len(), 2);
}
