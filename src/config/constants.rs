//! # Engine Constants
//!
//! This module centralizes the fixed names and numeric seeds the engine
//! relies on. Import constants from here rather than redefining them
//! locally.
//!
//! ## Schema bootstrap
//!
//! Every engine starts with two schemas:
//!
//! - [`DEFAULT_SCHEMA`]: the `public` schema, target of every unqualified
//!   relation name.
//! - [`INFORMATION_SCHEMA`]: holds the [`INFORMATION_SCHEMA_TABLES`]
//!   relation `(table_schema, table_name, table_type)` that ORMs probe for
//!   table existence.
//!
//! ## Sequences
//!
//! Auto-increment columns (`BIGSERIAL` or explicit `AUTOINCREMENT`) draw
//! from a per-relation counter seeded with [`SEQUENCE_START`].

/// Name of the default schema, target of unqualified relation names.
pub const DEFAULT_SCHEMA: &str = "public";

/// Name of the metadata schema created at engine bootstrap.
pub const INFORMATION_SCHEMA: &str = "information_schema";

/// Name of the catalog relation inside [`INFORMATION_SCHEMA`].
pub const INFORMATION_SCHEMA_TABLES: &str = "tables";

/// `table_type` value recorded for user relations in the catalog.
pub const BASE_TABLE_TYPE: &str = "BASE TABLE";

/// First value handed out by an auto-increment sequence.
pub const SEQUENCE_START: i64 = 1;
