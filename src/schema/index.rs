//! # Hash Indexes
//!
//! Hash index over an ordered attribute tuple, mapping composed key values
//! to row handles. PK and UNIQUE indexes enforce at-most-one handle per key;
//! foreign-key indexes may hold many.
//!
//! Index maintenance is eager: every row mutation updates the affected
//! indexes inside the same critical section, so an index never disagrees
//! with its relation's row list.

use super::relation::RowId;
use crate::types::Value;
use hashbrown::HashMap;
use smallvec::SmallVec;

/// Index access method. Hash is the only implemented kind; BTree is a
/// declared capability the kernel rejects at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    Hash,
    BTree,
}

/// Composed key of an index probe: the values of the indexed attributes in
/// index order. Uses `Value`'s identity equality, so NULLs compose into
/// keys deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexKey(SmallVec<[Value; 2]>);

impl IndexKey {
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        Self(values.into_iter().collect())
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct HashIndex {
    name: String,
    attrs: Vec<String>,
    attr_indices: Vec<usize>,
    unique: bool,
    buckets: HashMap<IndexKey, SmallVec<[RowId; 1]>>,
}

impl HashIndex {
    pub fn new(
        name: impl Into<String>,
        attrs: Vec<String>,
        attr_indices: Vec<usize>,
        unique: bool,
    ) -> Self {
        Self {
            name: name.into(),
            attrs,
            attr_indices,
            unique,
            buckets: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attrs(&self) -> &[String] {
        &self.attrs
    }

    pub fn unique(&self) -> bool {
        self.unique
    }

    /// True if this index covers exactly `attrs` in the same order.
    pub fn covers(&self, attrs: &[String]) -> bool {
        self.attrs == attrs
    }

    /// Composes this index's key from a full row value vector.
    pub fn key_for_row(&self, values: &[Value]) -> IndexKey {
        IndexKey(
            self.attr_indices
                .iter()
                .map(|&i| values[i].clone())
                .collect(),
        )
    }

    pub fn get(&self, key: &IndexKey) -> Option<&[RowId]> {
        self.buckets.get(key).map(|rows| rows.as_slice())
    }

    pub fn insert(&mut self, key: IndexKey, row: RowId) {
        self.buckets.entry(key).or_default().push(row);
    }

    pub fn remove(&mut self, key: &IndexKey, row: RowId) {
        if let Some(rows) = self.buckets.get_mut(key) {
            rows.retain(|r| *r != row);
            if rows.is_empty() {
                self.buckets.remove(key);
            }
        }
    }

    pub fn truncate(&mut self) {
        self.buckets.clear();
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> HashIndex {
        HashIndex::new("pk_t_id", vec!["id".into()], vec![0], true)
    }

    #[test]
    fn insert_get_remove() {
        let mut idx = index();
        let key = IndexKey::new([Value::Int(1)]);
        idx.insert(key.clone(), RowId(7));
        assert_eq!(idx.get(&key), Some(&[RowId(7)][..]));

        idx.remove(&key, RowId(7));
        assert_eq!(idx.get(&key), None);
        assert!(idx.is_empty());
    }

    #[test]
    fn composite_keys_must_match_all_columns() {
        let mut idx = HashIndex::new(
            "fk_child",
            vec!["name".into(), "catalog_id".into()],
            vec![0, 1],
            false,
        );
        idx.insert(
            IndexKey::new([Value::from("cat"), Value::from("catalog1")]),
            RowId(1),
        );

        let partial = IndexKey::new([Value::from("cat"), Value::from("catalog2")]);
        assert_eq!(idx.get(&partial), None);
    }

    #[test]
    fn key_for_row_picks_indexed_slots() {
        let idx = HashIndex::new("i", vec!["b".into()], vec![1], false);
        let key = idx.key_for_row(&[Value::Int(1), Value::from("x")]);
        assert_eq!(key.values(), &[Value::from("x")]);
    }
}
