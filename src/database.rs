//! # Public Database API
//!
//! The client-facing surface consumed by driver shims and tests:
//!
//! - [`Registry`]: opens engines by name, idempotently — two `open` calls
//!   with the same name share one engine instance. The registry is an owned
//!   struct, not process-global state; a driver shim owns exactly one.
//! - [`Database`]: a named handle over a shared engine. `begin` starts an
//!   explicit transaction; `execute`/`query` are autocommit conveniences.
//! - [`Row`]: one result row with typed accessors.
//!
//! ## Example
//!
//! ```ignore
//! use ephemdb::{Database, NamedValue, Value};
//!
//! let db = Database::new("mydb");
//! db.execute("CREATE TABLE users (id BIGSERIAL PRIMARY KEY, name TEXT)", &[])?;
//! db.execute(
//!     "INSERT INTO users (name) VALUES ($1)",
//!     &[NamedValue::positional(1, Value::from("Ada"))],
//! )?;
//!
//! let (cols, rows) = db.query("SELECT name FROM users WHERE id = 1", &[])?;
//! assert_eq!(cols, vec!["name"]);
//! assert_eq!(rows[0].get_text(0)?, "Ada");
//! ```

use crate::engine::Engine;
use crate::executor::{NamedValue, Tx};
use crate::types::Value;
use eyre::{bail, Result};
use hashbrown::HashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// One result row with typed accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn get_int(&self, index: usize) -> Result<i64> {
        match self.get(index) {
            Some(Value::Int(i)) => Ok(*i),
            Some(other) => bail!("expected INT, got {:?}", other),
            None => bail!("column {} out of bounds", index),
        }
    }

    pub fn get_float(&self, index: usize) -> Result<f64> {
        match self.get(index) {
            Some(Value::Float(f)) => Ok(*f),
            Some(other) => bail!("expected FLOAT, got {:?}", other),
            None => bail!("column {} out of bounds", index),
        }
    }

    pub fn get_text(&self, index: usize) -> Result<&str> {
        match self.get(index) {
            Some(Value::Text(s)) => Ok(s),
            Some(other) => bail!("expected TEXT, got {:?}", other),
            None => bail!("column {} out of bounds", index),
        }
    }

    pub fn get_bool(&self, index: usize) -> Result<bool> {
        match self.get(index) {
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => bail!("expected BOOL, got {:?}", other),
            None => bail!("column {} out of bounds", index),
        }
    }

    pub fn is_null(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Value::Null))
    }

    pub fn column_count(&self) -> usize {
        self.values.len()
    }
}

/// A named handle over a shared in-memory engine.
#[derive(Clone)]
pub struct Database {
    engine: Arc<Engine>,
}

impl Database {
    /// Creates a standalone database (not attached to any registry).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            engine: Arc::new(Engine::new(name)),
        }
    }

    fn from_engine(engine: Arc<Engine>) -> Self {
        Self { engine }
    }

    pub fn name(&self) -> &str {
        self.engine.name()
    }

    /// Starts an explicit transaction. Blocks while another transaction
    /// holds the engine.
    pub fn begin(&self) -> Tx {
        Tx::new(self.engine.begin())
    }

    /// Executes statements in a single autocommitted transaction.
    pub fn execute(&self, sql: &str, args: &[NamedValue]) -> Result<(i64, i64)> {
        let mut tx = self.begin();
        let result = tx.execute(sql, args)?;
        tx.commit()?;
        Ok(result)
    }

    /// Runs one query in a single autocommitted transaction.
    pub fn query(&self, sql: &str, args: &[NamedValue]) -> Result<(Vec<String>, Vec<Row>)> {
        let mut tx = self.begin();
        let (columns, tuples) = tx.query(sql, args)?;
        tx.commit()?;
        Ok((
            columns,
            tuples
                .into_iter()
                .map(|t| Row::new(t.into_values()))
                .collect(),
        ))
    }
}

/// Process-wide registry of named engines. `open` is idempotent by name:
/// every handle opened under one name shares the same engine until `close`.
#[derive(Default)]
pub struct Registry {
    engines: Mutex<HashMap<String, Arc<Engine>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens (or creates) the engine registered under `name`.
    pub fn open(&self, name: &str) -> Database {
        let mut engines = self.engines.lock();
        let engine = engines
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Engine::new(name)))
            .clone();
        Database::from_engine(engine)
    }

    /// Drops the engine registered under `name`. Existing handles keep
    /// working on the detached engine; a later `open` starts fresh.
    pub fn close(&self, name: &str) {
        self.engines.lock().remove(name);
    }
}
