//! # Storage Engine
//!
//! The agnostic storage kernel: schemas, relations, tuples, indexes, and
//! transactions. "Agnostic" because nothing in this layer knows about SQL —
//! the executor lowers parsed statements into kernel operations and plan
//! nodes.
//!
//! ## Concurrency Model
//!
//! One coarse `parking_lot::Mutex` guards the whole engine state. A
//! [`Transaction`] owns the guard for its entire life (`lock_arc`), so:
//!
//! - statements within a transaction observe their own writes immediately
//! - transactions are totally ordered by lock acquisition
//! - there is no row-level locking and no MVCC
//!
//! Callers on other threads simply block on `begin()` until the active
//! transaction commits, rolls back, or is dropped.
//!
//! ## Bootstrap
//!
//! Every engine starts with the `public` schema and an
//! `information_schema` holding a `tables` relation
//! `(table_schema, table_name, table_type)`. The kernel keeps that catalog
//! in sync as user relations are created and dropped.

pub mod transaction;

pub use transaction::Transaction;

use crate::config::{DEFAULT_SCHEMA, INFORMATION_SCHEMA, INFORMATION_SCHEMA_TABLES};
use crate::schema::{Attribute, Relation, Schema};
use crate::types::DataType;
use eyre::{bail, Result};
use hashbrown::HashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Maps an empty schema qualifier to the default schema.
pub fn resolve_schema(name: &str) -> &str {
    if name.is_empty() {
        DEFAULT_SCHEMA
    } else {
        name
    }
}

/// The mutable world behind the engine lock: all schemas plus the search
/// path whose head is the current schema.
#[derive(Debug)]
pub struct EngineState {
    schemas: HashMap<String, Schema>,
    search_path: Vec<String>,
}

impl EngineState {
    fn new() -> Self {
        let mut schemas = HashMap::new();
        schemas.insert(DEFAULT_SCHEMA.to_string(), Schema::new(DEFAULT_SCHEMA));

        let mut info = Schema::new(INFORMATION_SCHEMA);
        let tables = Relation::new(
            INFORMATION_SCHEMA,
            INFORMATION_SCHEMA_TABLES,
            vec![
                Attribute::new("table_schema", DataType::Text),
                Attribute::new("table_name", DataType::Text),
                Attribute::new("table_type", DataType::Text),
            ],
            &[],
        )
        .expect("information_schema bootstrap is statically valid");
        info.add(tables);
        schemas.insert(INFORMATION_SCHEMA.to_string(), info);

        Self {
            schemas,
            search_path: vec![DEFAULT_SCHEMA.to_string()],
        }
    }

    /// Head of the search path.
    pub fn current_schema(&self) -> &str {
        self.search_path
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_SCHEMA)
    }

    pub fn has_schema(&self, name: &str) -> bool {
        self.schemas.contains_key(resolve_schema(name))
    }

    pub fn schema(&self, name: &str) -> Result<&Schema> {
        let name = resolve_schema(name);
        match self.schemas.get(name) {
            Some(s) => Ok(s),
            None => bail!("schema {} does not exist", name),
        }
    }

    pub fn schema_mut(&mut self, name: &str) -> Result<&mut Schema> {
        let name = resolve_schema(name);
        match self.schemas.get_mut(name) {
            Some(s) => Ok(s),
            None => bail!("schema {} does not exist", name),
        }
    }

    pub fn relation(&self, schema: &str, name: &str) -> Result<&Relation> {
        self.schema(schema)?.relation(name)
    }

    pub fn relation_mut(&mut self, schema: &str, name: &str) -> Result<&mut Relation> {
        self.schema_mut(schema)?.relation_mut(name)
    }

    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    pub(crate) fn add_schema(&mut self, schema: Schema) {
        self.schemas.insert(schema.name().to_string(), schema);
    }

    pub(crate) fn remove_schema(&mut self, name: &str) -> Option<Schema> {
        self.schemas.remove(name)
    }
}

/// Process-wide in-memory database engine. Cheap to share; all state lives
/// behind one lock.
pub struct Engine {
    name: String,
    state: Arc<Mutex<EngineState>>,
}

impl Engine {
    /// Creates an engine with the mandatory `public` and
    /// `information_schema` schemas.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(EngineState::new())),
        }
    }

    /// Database name, surfaced by `CURRENT_DATABASE()`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Starts a transaction. Blocks until the engine lock is available; the
    /// returned transaction holds the lock until commit or rollback.
    pub fn begin(&self) -> Transaction {
        Transaction::new(self.name.clone(), self.state.lock_arc())
    }
}
