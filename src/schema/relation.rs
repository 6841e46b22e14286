//! # Relation Storage
//!
//! A relation is a named table inside a schema: ordered attributes, an
//! insertion-ordered row store, primary-key metadata, and hash indexes.
//!
//! ## Row Store
//!
//! Rows live in a `BTreeMap<RowId, Tuple>` keyed by a monotonically
//! increasing handle. This gives the three properties the engine needs:
//!
//! 1. Iteration yields stable insertion order (new rows append)
//! 2. Deletion by handle is cheap and does not disturb order
//! 3. Rollback can re-insert a deleted row at its old handle, restoring
//!    the original position
//!
//! ## Automatic Indexes
//!
//! Relation construction creates hash indexes eagerly so constraint checks
//! are probes rather than scans:
//!
//! - one unique index over the primary key, when one is declared
//! - one unique index per UNIQUE column
//! - one non-unique index per distinct foreign-key group, keyed by the
//!   local columns (deduped by the FK's reference signature)
//!
//! An index on an attribute list is only created once; explicit
//! `CREATE INDEX` on the same list is a no-op at this layer.

use super::attribute::{Attribute, ForeignKey};
use super::index::{HashIndex, IndexKey};
use crate::config::SEQUENCE_START;
use crate::types::Value;
use eyre::{bail, Result};
use hashbrown::HashMap;
use std::collections::BTreeMap;
use std::fmt;

/// Stable handle of a row within its relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(pub u64);

/// One row: values aligned with the relation's attribute order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tuple {
    values: Vec<Value>,
}

impl Tuple {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn from_values(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

#[derive(Debug, Clone)]
pub struct Relation {
    schema: String,
    name: String,
    attributes: Vec<Attribute>,
    attr_index: HashMap<String, usize>,
    pk: Vec<usize>,
    rows: BTreeMap<RowId, Tuple>,
    next_row_id: u64,
    sequence: i64,
    indexes: Vec<HashIndex>,
}

impl Relation {
    pub fn new(
        schema: impl Into<String>,
        name: impl Into<String>,
        attributes: Vec<Attribute>,
        pk: &[String],
    ) -> Result<Self> {
        let schema = schema.into();
        let name = name.into();

        let mut attr_index = HashMap::new();
        for (i, attr) in attributes.iter().enumerate() {
            if attr_index.insert(attr.name().to_string(), i).is_some() {
                bail!(
                    "column \"{}\" specified more than once in relation {}",
                    attr.name(),
                    name
                );
            }
        }

        let mut pk_indices = Vec::with_capacity(pk.len());
        for col in pk {
            match attr_index.get(col.as_str()) {
                Some(&i) => pk_indices.push(i),
                None => bail!("column \"{}\" does not exist", col),
            }
        }

        let mut relation = Self {
            schema,
            name,
            attributes,
            attr_index,
            pk: pk_indices,
            rows: BTreeMap::new(),
            next_row_id: 0,
            sequence: SEQUENCE_START - 1,
            indexes: Vec::new(),
        };

        if !relation.pk.is_empty() {
            relation.ensure_hash_index("pk_", pk, true);
        }

        let unique_cols: Vec<String> = relation
            .attributes
            .iter()
            .filter(|a| a.unique())
            .map(|a| a.name().to_string())
            .collect();
        for col in unique_cols {
            relation.ensure_hash_index("unique_", &[col], true);
        }

        for fk in relation.unique_foreign_keys() {
            let local = fk.local_columns().to_vec();
            if !local.is_empty() {
                relation.ensure_hash_index("fk_", &local, false);
            }
        }

        Ok(relation)
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Resolves an attribute by its lowercase name.
    pub fn attribute(&self, name: &str) -> Result<(usize, &Attribute)> {
        match self.attr_index.get(name) {
            Some(&i) => Ok((i, &self.attributes[i])),
            None => bail!("column \"{}\" does not exist", name),
        }
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attr_index.contains_key(name)
    }

    pub fn pk_indices(&self) -> &[usize] {
        &self.pk
    }

    pub fn pk_columns(&self) -> Vec<String> {
        self.pk
            .iter()
            .map(|&i| self.attributes[i].name().to_string())
            .collect()
    }

    /// Distinct foreign-key groups carried by this relation's attributes,
    /// deduped by reference signature with a stable order.
    pub fn unique_foreign_keys(&self) -> Vec<ForeignKey> {
        let mut seen: BTreeMap<String, ForeignKey> = BTreeMap::new();
        for attr in &self.attributes {
            let Some(fk) = attr.foreign_key() else {
                continue;
            };
            let mut fk = fk.clone();
            if fk.local_columns().is_empty() {
                fk = fk.with_local_column(attr.name());
            }
            seen.entry(fk.signature()).or_insert(fk);
        }
        seen.into_values().collect()
    }

    /// Creates a hash index on `attrs` unless one with the same attribute
    /// list (same order) already exists.
    fn ensure_hash_index(&mut self, prefix: &str, attrs: &[String], unique: bool) {
        if attrs.is_empty() || self.has_index_on(attrs) {
            return;
        }
        let mut indices = Vec::with_capacity(attrs.len());
        for attr in attrs {
            match self.attr_index.get(attr.as_str()) {
                Some(&i) => indices.push(i),
                None => return,
            }
        }
        let name = format!("{}{}_{}_{}", prefix, self.schema, self.name, attrs.join("_"));
        self.indexes
            .push(HashIndex::new(name, attrs.to_vec(), indices, unique));
    }

    fn has_index_on(&self, attrs: &[String]) -> bool {
        self.indexes.iter().any(|i| i.covers(attrs))
    }

    pub fn find_index_on(&self, attrs: &[String]) -> Option<&HashIndex> {
        self.indexes.iter().find(|i| i.covers(attrs))
    }

    pub fn indexes(&self) -> &[HashIndex] {
        &self.indexes
    }

    /// Adds a user-created hash index and backfills it from existing rows.
    pub fn create_index(&mut self, name: &str, attrs: &[String]) -> Result<()> {
        let mut indices = Vec::with_capacity(attrs.len());
        for attr in attrs {
            let (i, _) = self.attribute(attr)?;
            indices.push(i);
        }
        if self.has_index_on(attrs) {
            return Ok(());
        }
        let mut index = HashIndex::new(name, attrs.to_vec(), indices, false);
        for (id, tuple) in &self.rows {
            index.insert(index.key_for_row(tuple.values()), *id);
        }
        self.indexes.push(index);
        Ok(())
    }

    pub fn drop_index(&mut self, name: &str) {
        self.indexes.retain(|i| i.name() != name);
    }

    /// The primary-key index, if a primary key is declared.
    pub fn pk_index(&self) -> Option<&HashIndex> {
        if self.pk.is_empty() {
            return None;
        }
        self.indexes.iter().find(|i| i.name().starts_with("pk_"))
    }

    /// Probes the primary-key index for `values`; true means a row with the
    /// same key already exists.
    pub fn pk_conflict(&self, values: &[Value]) -> bool {
        let Some(index) = self.pk_index() else {
            return false;
        };
        let key = index.key_for_row(values);
        index.get(&key).is_some_and(|rows| !rows.is_empty())
    }

    pub fn row(&self, id: RowId) -> Option<&Tuple> {
        self.rows.get(&id)
    }

    pub fn rows(&self) -> impl Iterator<Item = (RowId, &Tuple)> {
        self.rows.iter().map(|(id, t)| (*id, t))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Appends a row and registers it with every index.
    pub fn insert_row(&mut self, values: Vec<Value>) -> RowId {
        let id = RowId(self.next_row_id);
        self.next_row_id += 1;
        for index in &mut self.indexes {
            let key = index.key_for_row(&values);
            index.insert(key, id);
        }
        self.rows.insert(id, Tuple::from_values(values));
        id
    }

    /// Re-inserts a row at its original handle (rollback of a delete).
    pub fn restore_row(&mut self, id: RowId, values: Vec<Value>) {
        self.next_row_id = self.next_row_id.max(id.0 + 1);
        for index in &mut self.indexes {
            let key = index.key_for_row(&values);
            index.insert(key, id);
        }
        self.rows.insert(id, Tuple::from_values(values));
    }

    /// Removes a row and unregisters it from every index.
    pub fn remove_row(&mut self, id: RowId) -> Option<Tuple> {
        let tuple = self.rows.remove(&id)?;
        for index in &mut self.indexes {
            let key = index.key_for_row(tuple.values());
            index.remove(&key, id);
        }
        Some(tuple)
    }

    /// Replaces a row's values in place, refreshing index entries.
    pub fn update_row(&mut self, id: RowId, new_values: Vec<Value>) -> Option<Tuple> {
        let old = self.rows.get(&id)?.clone();
        for index in &mut self.indexes {
            let old_key = index.key_for_row(old.values());
            index.remove(&old_key, id);
            let new_key = index.key_for_row(&new_values);
            index.insert(new_key, id);
        }
        self.rows.insert(id, Tuple::from_values(new_values));
        Some(old)
    }

    /// Removes every row and empties every index, preserving the schema.
    /// Returns the drained rows for the undo log.
    pub fn truncate(&mut self) -> Vec<(RowId, Tuple)> {
        for index in &mut self.indexes {
            index.truncate();
        }
        std::mem::take(&mut self.rows).into_iter().collect()
    }

    /// Restores rows drained by [`Relation::truncate`] (rollback path).
    pub fn restore_rows(&mut self, rows: Vec<(RowId, Tuple)>) {
        for (id, tuple) in rows {
            self.restore_row(id, tuple.into_values());
        }
    }

    /// Advances and returns the auto-increment counter.
    pub fn next_sequence(&mut self) -> i64 {
        self.sequence += 1;
        self.sequence
    }

    pub fn sequence(&self) -> i64 {
        self.sequence
    }

    pub fn set_sequence(&mut self, value: i64) {
        self.sequence = value;
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.schema.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.schema, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    fn users() -> Relation {
        Relation::new(
            "public",
            "users",
            vec![
                Attribute::new("id", DataType::BigInt),
                Attribute::new("email", DataType::Text).with_unique(),
            ],
            &["id".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn new_creates_pk_and_unique_indexes() {
        let rel = users();
        assert_eq!(rel.indexes().len(), 2);
        assert!(rel.pk_index().is_some());
        assert!(rel.find_index_on(&["email".to_string()]).is_some());
    }

    #[test]
    fn new_rejects_unknown_pk_column() {
        let err = Relation::new(
            "public",
            "t",
            vec![Attribute::new("a", DataType::Int)],
            &["missing".to_string()],
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn new_rejects_duplicate_columns() {
        assert!(Relation::new(
            "public",
            "t",
            vec![
                Attribute::new("a", DataType::Int),
                Attribute::new("a", DataType::Text),
            ],
            &[],
        )
        .is_err());
    }

    #[test]
    fn fk_groups_get_one_index_each() {
        let fk = ForeignKey::new(None)
            .with_local_column("name")
            .with_local_column("catalog_id")
            .with_ref_relation("categories")
            .with_ref_column("name")
            .with_ref_column("catalog_id");
        let rel = Relation::new(
            "public",
            "controls",
            vec![
                Attribute::new("id", DataType::BigInt),
                Attribute::new("name", DataType::Text).with_foreign_key(fk.clone()),
                Attribute::new("catalog_id", DataType::Text).with_foreign_key(fk),
            ],
            &["id".to_string()],
        )
        .unwrap();

        // One PK index, one FK index (deduped across the two attributes).
        assert_eq!(rel.indexes().len(), 2);
        assert!(rel
            .find_index_on(&["name".to_string(), "catalog_id".to_string()])
            .is_some());
    }

    #[test]
    fn insert_updates_indexes_and_pk_conflict() {
        let mut rel = users();
        rel.insert_row(vec![Value::Int(1), Value::from("a@x")]);
        assert!(rel.pk_conflict(&[Value::Int(1), Value::from("other")]));
        assert!(!rel.pk_conflict(&[Value::Int(2), Value::from("a@x")]));
    }

    #[test]
    fn rows_iterate_in_insertion_order_and_restore_preserves_it() {
        let mut rel = users();
        let a = rel.insert_row(vec![Value::Int(1), Value::from("a")]);
        let b = rel.insert_row(vec![Value::Int(2), Value::from("b")]);
        rel.insert_row(vec![Value::Int(3), Value::from("c")]);

        let removed = rel.remove_row(b).unwrap();
        assert_eq!(
            rel.rows().map(|(id, _)| id).collect::<Vec<_>>(),
            vec![a, RowId(2)]
        );

        rel.restore_row(b, removed.into_values());
        let ids: Vec<RowId> = rel.rows().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b, RowId(2)]);
    }

    #[test]
    fn update_row_refreshes_indexes() {
        let mut rel = users();
        let id = rel.insert_row(vec![Value::Int(1), Value::from("old@x")]);
        rel.update_row(id, vec![Value::Int(1), Value::from("new@x")]);

        let email_idx = rel.find_index_on(&["email".to_string()]).unwrap();
        assert!(email_idx
            .get(&IndexKey::new([Value::from("old@x")]))
            .is_none());
        assert!(email_idx
            .get(&IndexKey::new([Value::from("new@x")]))
            .is_some());
    }

    #[test]
    fn truncate_empties_rows_and_indexes() {
        let mut rel = users();
        rel.insert_row(vec![Value::Int(1), Value::from("a")]);
        rel.insert_row(vec![Value::Int(2), Value::from("b")]);

        let drained = rel.truncate();
        assert_eq!(drained.len(), 2);
        assert_eq!(rel.row_count(), 0);
        assert!(rel.indexes().iter().all(|i| i.is_empty()));

        // Idempotent: a second truncation drains nothing.
        assert!(rel.truncate().is_empty());
    }

    #[test]
    fn sequence_starts_at_one() {
        let mut rel = users();
        assert_eq!(rel.next_sequence(), 1);
        assert_eq!(rel.next_sequence(), 2);
    }
}
