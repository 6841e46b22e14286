//! # Plan-Node Primitives
//!
//! Composable building blocks the executor assembles into query plans:
//!
//! - [`scan`]: row sources (`Relation`, single-row) with predicate filtering
//! - [`predicate`]: boolean expression trees over value functors
//! - [`join`]: equi hash join between two relations
//! - [`select`]: projection operators, including `COUNT`
//! - [`sort`]: post-scan row reshaping (offset, distinct, order by, limit)
//!
//! Every primitive is a tagged enum with one evaluation method per kind;
//! the executor dispatches by variant. Evaluation happens against a
//! [`Columns`] context describing which `(relation, attribute)` pair each
//! tuple slot holds, so the same predicate tree works before and after a
//! join widens the tuples.

pub mod join;
pub mod predicate;
pub mod scan;
pub mod select;
pub mod sort;

pub use join::Joiner;
pub use predicate::{ArithOp, ComparisonOp, Predicate, ValueFunctor};
pub use scan::{RelationScanner, ScanRow, Source};
pub use select::Selector;
pub use sort::{SortKey, SortOrder, Sorter};

use crate::schema::Relation;

/// One output slot of a row stream: the relation it came from and the
/// attribute name it carries. Both lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnId {
    pub relation: String,
    pub attribute: String,
}

/// Ordered column layout of a row stream.
#[derive(Debug, Clone, Default)]
pub struct Columns {
    items: Vec<ColumnId>,
}

impl Columns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Qualified column layout of a full relation scan.
    pub fn from_relation(relation: &Relation) -> Self {
        Self {
            items: relation
                .attributes()
                .iter()
                .map(|a| ColumnId {
                    relation: relation.name().to_string(),
                    attribute: a.name().to_string(),
                })
                .collect(),
        }
    }

    pub fn push(&mut self, relation: impl Into<String>, attribute: impl Into<String>) {
        self.items.push(ColumnId {
            relation: relation.into(),
            attribute: attribute.into(),
        });
    }

    pub fn extend_from(&mut self, other: &Columns) {
        self.items.extend(other.items.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[ColumnId] {
        &self.items
    }

    /// Finds the slot of `attribute`, restricted to `relation` when given.
    /// Unqualified lookups take the first matching attribute.
    pub fn lookup(&self, relation: Option<&str>, attribute: &str) -> Option<usize> {
        self.items.iter().position(|c| {
            c.attribute == attribute && relation.map_or(true, |r| c.relation == r)
        })
    }
}
