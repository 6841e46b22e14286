//! # Row Sources and Scanning
//!
//! The scanner walks a source, evaluates the conjunction of its predicates
//! against each row, and yields the survivors with their handles.
//!
//! ## Sources
//!
//! - `Relation`: every row of a relation, in insertion order
//! - `SingleRow`: exactly one empty tuple — the source behind
//!   `SELECT 1` / `SELECT current_database()` without a FROM clause
//!
//! ## Index Shortcut
//!
//! A scan whose predicates include an equality between an indexed attribute
//! of the scanned relation and a constant probes the hash index for
//! candidates instead of walking the full row list. All predicates are
//! still evaluated against each candidate, so extra conjuncts stay correct.

use super::predicate::{ComparisonOp, Predicate, ValueFunctor};
use super::Columns;
use crate::schema::{Relation, RowId, Tuple};
use eyre::Result;

/// Where a scan draws its rows from.
pub enum Source<'r> {
    Relation(&'r Relation),
    SingleRow,
}

/// One scanned row: its handle and a materialized copy of its values.
#[derive(Debug, Clone)]
pub struct ScanRow {
    pub id: RowId,
    pub tuple: Tuple,
}

pub struct RelationScanner<'r> {
    source: Source<'r>,
    predicates: Vec<Predicate>,
}

impl<'r> RelationScanner<'r> {
    pub fn new(source: Source<'r>, predicates: Vec<Predicate>) -> Self {
        Self { source, predicates }
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    pub fn exec(&self) -> Result<(Columns, Vec<ScanRow>)> {
        match self.source {
            Source::SingleRow => Ok((
                Columns::new(),
                vec![ScanRow {
                    id: RowId(0),
                    tuple: Tuple::new(),
                }],
            )),
            Source::Relation(relation) => {
                let cols = Columns::from_relation(relation);
                let mut out = Vec::new();

                if let Some(candidates) = self.index_candidates(relation) {
                    for id in candidates {
                        let Some(tuple) = relation.row(id) else {
                            continue;
                        };
                        if self.matches(&cols, tuple)? {
                            out.push(ScanRow {
                                id,
                                tuple: tuple.clone(),
                            });
                        }
                    }
                    return Ok((cols, out));
                }

                for (id, tuple) in relation.rows() {
                    if self.matches(&cols, tuple)? {
                        out.push(ScanRow {
                            id,
                            tuple: tuple.clone(),
                        });
                    }
                }
                Ok((cols, out))
            }
        }
    }

    fn matches(&self, cols: &Columns, tuple: &Tuple) -> Result<bool> {
        for p in &self.predicates {
            if !p.eval(cols, tuple)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Candidate row handles from a hash-index probe, when one of the
    /// predicates is `indexed_attr = const` on the scanned relation.
    fn index_candidates(&self, relation: &Relation) -> Option<Vec<RowId>> {
        for p in &self.predicates {
            let Predicate::Comparison {
                left,
                op: ComparisonOp::Eq,
                right,
            } = p
            else {
                continue;
            };

            let (attr, constant) = match (left, right) {
                (
                    ValueFunctor::Attribute {
                        relation: r,
                        attribute,
                    },
                    ValueFunctor::Const(v),
                ) if r == relation.name() => (attribute, v),
                (
                    ValueFunctor::Const(v),
                    ValueFunctor::Attribute {
                        relation: r,
                        attribute,
                    },
                ) if r == relation.name() => (attribute, v),
                _ => continue,
            };

            let index = relation.find_index_on(std::slice::from_ref(attr))?;
            let (_, attr_meta) = relation.attribute(attr).ok()?;
            let probe = constant.coerce_to(attr_meta.data_type()).ok()?;
            let key = crate::schema::IndexKey::new([probe]);
            return Some(index.get(&key).map(|ids| ids.to_vec()).unwrap_or_default());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Attribute;
    use crate::types::{DataType, Value};

    fn items() -> Relation {
        let mut rel = Relation::new(
            "public",
            "items",
            vec![
                Attribute::new("id", DataType::BigInt),
                Attribute::new("label", DataType::Text),
            ],
            &["id".to_string()],
        )
        .unwrap();
        for i in 1..=5 {
            rel.insert_row(vec![Value::Int(i), Value::Text(format!("item{}", i))]);
        }
        rel
    }

    #[test]
    fn scan_without_predicates_yields_all_rows_in_order() {
        let rel = items();
        let scanner = RelationScanner::new(Source::Relation(&rel), vec![]);
        let (cols, rows) = scanner.exec().unwrap();
        assert_eq!(cols.len(), 2);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].tuple.get(0), Some(&Value::Int(1)));
        assert_eq!(rows[4].tuple.get(0), Some(&Value::Int(5)));
    }

    #[test]
    fn scan_filters_on_predicate() {
        let rel = items();
        let p = Predicate::Comparison {
            left: ValueFunctor::attribute("items", "id"),
            op: ComparisonOp::Ge,
            right: ValueFunctor::Const(Value::Int(3)),
        };
        let scanner = RelationScanner::new(Source::Relation(&rel), vec![p]);
        let (_, rows) = scanner.exec().unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn indexed_equality_uses_the_pk_index() {
        let rel = items();
        let p = Predicate::Comparison {
            left: ValueFunctor::attribute("items", "id"),
            op: ComparisonOp::Eq,
            right: ValueFunctor::Const(Value::Int(4)),
        };
        let scanner = RelationScanner::new(Source::Relation(&rel), vec![p]);
        assert!(scanner.index_candidates(&rel).is_some());
        let (_, rows) = scanner.exec().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tuple.get(1), Some(&Value::from("item4")));
    }

    #[test]
    fn single_row_source_emits_one_empty_tuple() {
        let scanner = RelationScanner::new(Source::SingleRow, vec![]);
        let (cols, rows) = scanner.exec().unwrap();
        assert!(cols.is_empty());
        assert_eq!(rows.len(), 1);
        assert!(rows[0].tuple.is_empty());
    }
}
