//! # LIMIT / OFFSET Tests
//!
//! LIMIT and OFFSET with literals and bind parameters, applied over the
//! stable insertion order of the row store.

use ephemdb::{Database, NamedValue, Value};

fn seeded(n: i64) -> Database {
    let db = Database::new("limitdb");
    db.execute("CREATE TABLE items (id TEXT PRIMARY KEY)", &[])
        .unwrap();
    for i in 1..=n {
        db.execute(
            "INSERT INTO items (id) VALUES ($1)",
            &[NamedValue::positional(1, Value::Text(format!("id{}", i)))],
        )
        .unwrap();
    }
    db
}

fn ids(rows: &[ephemdb::Row]) -> Vec<String> {
    rows.iter()
        .map(|r| r.get_text(0).unwrap().to_string())
        .collect()
}

#[test]
fn limit_literal() {
    let db = seeded(5);
    let (_, rows) = db.query("SELECT * FROM items LIMIT 3", &[]).unwrap();
    assert_eq!(ids(&rows), vec!["id1", "id2", "id3"]);
}

#[test]
fn limit_with_parameter() {
    let db = seeded(5);
    let (_, rows) = db
        .query(
            "SELECT * FROM items LIMIT $1",
            &[NamedValue::positional(1, Value::Int(3))],
        )
        .unwrap();
    assert_eq!(rows.len(), 3);
}

#[test]
fn offset_with_parameter() {
    let db = seeded(5);
    let (_, rows) = db
        .query(
            "SELECT * FROM items OFFSET $1",
            &[NamedValue::positional(1, Value::Int(2))],
        )
        .unwrap();
    assert_eq!(ids(&rows), vec!["id3", "id4", "id5"]);
}

#[test]
fn limit_and_offset_with_parameters() {
    let db = seeded(10);
    let (_, rows) = db
        .query(
            "SELECT * FROM items LIMIT $1 OFFSET $2",
            &[
                NamedValue::positional(1, Value::Int(3)),
                NamedValue::positional(2, Value::Int(2)),
            ],
        )
        .unwrap();
    assert_eq!(ids(&rows), vec!["id3", "id4", "id5"]);
}

#[test]
fn limit_larger_than_table() {
    let db = seeded(3);
    let (_, rows) = db.query("SELECT * FROM items LIMIT 10", &[]).unwrap();
    assert_eq!(rows.len(), 3);
}

#[test]
fn offset_beyond_end_returns_no_rows() {
    let db = seeded(3);
    let (_, rows) = db
        .query("SELECT * FROM items LIMIT 5 OFFSET 7", &[])
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn limit_zero_returns_no_rows() {
    let db = seeded(3);
    let (_, rows) = db.query("SELECT * FROM items LIMIT 0", &[]).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn limit_window_size_is_exact() {
    // LIMIT n OFFSET m yields exactly min(n, max(total - m, 0)) rows.
    let db = seeded(10);
    for (limit, offset, expected) in [(3i64, 2i64, 3usize), (5, 8, 2), (4, 10, 0), (10, 0, 10)] {
        let (_, rows) = db
            .query(
                "SELECT * FROM items LIMIT $1 OFFSET $2",
                &[
                    NamedValue::positional(1, Value::Int(limit)),
                    NamedValue::positional(2, Value::Int(offset)),
                ],
            )
            .unwrap();
        assert_eq!(rows.len(), expected, "LIMIT {} OFFSET {}", limit, offset);
    }
}

#[test]
fn negative_limit_is_rejected() {
    let db = seeded(3);
    let err = db
        .query(
            "SELECT * FROM items LIMIT $1",
            &[NamedValue::positional(1, Value::Int(-1))],
        )
        .unwrap_err();
    assert!(err.to_string().contains("wrong limit value"));
}
