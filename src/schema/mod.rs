//! # Schema Catalog
//!
//! This module implements the engine's multi-schema catalog: PostgreSQL-style
//! namespaces, each holding an independent set of relations.
//!
//! ## Schema Hierarchy
//!
//! ```text
//! Engine
//! ├── Schema "public" (default)
//! │   ├── Relation "users"
//! │   └── Relation "orders"
//! ├── Schema "information_schema" (system)
//! │   └── Relation "tables"
//! └── Schema "foo" (user-created)
//!     └── Relation "products"
//! ```
//!
//! ## Name Resolution
//!
//! Relation names resolve in this order:
//!
//! 1. If qualified (`schema.table`), look in that schema
//! 2. Otherwise, look in the `public` schema
//!
//! All catalog keys are lowercase; case-folding happens once at the executor
//! boundary, so lookups here are exact.
//!
//! ## Module Structure
//!
//! - `attribute`: column metadata and foreign-key definitions
//! - `relation`: relation storage (rows, attribute map, auto indexes)
//! - `index`: hash indexes over attribute tuples

pub mod attribute;
pub mod index;
pub mod relation;

pub use attribute::{Attribute, DefaultValue, ForeignKey};
pub use index::{HashIndex, IndexKey, IndexType};
pub use relation::{Relation, RowId, Tuple};

use eyre::{bail, Result};
use hashbrown::HashMap;

/// A namespace of relations. Names are unique, lowercase keys.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    relations: HashMap<String, Relation>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            relations: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add(&mut self, relation: Relation) {
        self.relations
            .insert(relation.name().to_string(), relation);
    }

    pub fn remove(&mut self, name: &str) -> Result<Relation> {
        match self.relations.remove(name) {
            Some(r) => Ok(r),
            None => bail!("relation {} does not exist", name),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.relations.contains_key(name)
    }

    pub fn relation(&self, name: &str) -> Result<&Relation> {
        match self.relations.get(name) {
            Some(r) => Ok(r),
            None => bail!("relation {} does not exist", name),
        }
    }

    pub fn relation_mut(&mut self, name: &str) -> Result<&mut Relation> {
        match self.relations.get_mut(name) {
            Some(r) => Ok(r),
            None => bail!("relation {} does not exist", name),
        }
    }

    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.relations.values()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}
