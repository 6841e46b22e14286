//! # ephemdb - In-Memory PostgreSQL-Dialect SQL Engine
//!
//! ephemdb is an in-memory relational database engine speaking a
//! PostgreSQL-compatible SQL dialect, built for test environments and
//! embedded use where a fast, ephemeral, dependency-free database with
//! familiar semantics matters more than durability.
//!
//! ## Quick Start
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
//! let (cols, rows) = db.query("SELECT * FROM users LIMIT 10", &[])?;
//! ```
//!
//! ## Architecture
//!
//! Three layers carry every statement:
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Public API (Registry/Database/Tx) │
//! ├─────────────────────────────────────┤
//! │  SQL Front End (Lexer/Parser/AST)   │
//! ├─────────────────────────────────────┤
//! │  Executor (AST → plan nodes)        │
//! ├─────────────────────────────────────┤
//! │  Agnostic Kernel                    │
//! │  (schemas, relations, tuples,       │
//! │   hash indexes, transactions)       │
//! └─────────────────────────────────────┘
//! ```
//!
//! The kernel is SQL-agnostic: the executor lowers the typed AST into
//! composable plan nodes (scanners, predicates, joiners, selectors,
//! sorters) and drives kernel operations under a single coarse engine
//! lock. Every mutation logs its inverse, so `rollback` restores the
//! engine to its exact state at `begin`.
//!
//! ## Supported SQL
//!
//! - DML: SELECT (joins, aliases, DISTINCT [ON], ORDER BY, LIMIT/OFFSET,
//!   FOR UPDATE), INSERT (multi-row, ON CONFLICT DO NOTHING/UPDATE with
//!   `excluded`, RETURNING), UPDATE, DELETE
//! - DDL: CREATE TABLE (PK/UNIQUE/DEFAULT/BIGSERIAL, column- and
//!   table-level foreign keys), CREATE SCHEMA, CREATE INDEX (hash),
//!   DROP TABLE/SCHEMA, TRUNCATE
//! - Builtins: `now()`, `current_schema()`, `current_database()`
//! - Parameters: `$N`, `?`, `:name`
//!
//! Constraints are enforced eagerly through hash indexes: primary keys and
//! UNIQUE columns reject duplicates, foreign keys require a matching parent
//! row and RESTRICT deletes/updates of referenced parents.
//!
//! ## Module Overview
//!
//! - [`sql`]: lexer, typed arena-allocated AST, recursive descent parser
//! - [`types`]: canonical data types and runtime values
//! - [`schema`]: schemas, relations, attributes, hash indexes
//! - [`plan`]: composable plan-node primitives
//! - [`engine`]: the coarse-locked engine and undoable transactions
//! - [`executor`]: statement lowering and dispatch
//! - [`database`]: public `Registry`/`Database`/`Row` surface

pub mod config;
pub mod constraints;
pub mod database;
pub mod engine;
pub mod executor;
pub mod parsing;
pub mod plan;
pub mod schema;
pub mod sql;
pub mod types;

pub use database::{Database, Registry, Row};
pub use executor::{NamedValue, Tx};
pub use types::{DataType, Value};
