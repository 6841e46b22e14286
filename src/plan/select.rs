//! # Selectors
//!
//! Projection operators turning a filtered, joined, sorted row stream into
//! the client-visible column list.
//!
//! ## Variants
//!
//! - `Star`: every column of one relation
//! - `Attribute`: a single named column
//! - `Count`: row (or non-null) count — aggregates the stream to one row
//! - `Const`: a literal or builtin value, repeated per row
//!
//! A `Const` remembers the relation of the surrounding FROM clause (when
//! there is one) so the executor can hand the kernel a base table to scan
//! even for `SELECT 1 FROM items`.

use super::Columns;
use crate::schema::Tuple;
use crate::types::Value;
use eyre::{bail, Result};

#[derive(Debug, Clone)]
pub enum Selector {
    Star {
        relation: String,
    },
    Attribute {
        relation: String,
        attribute: String,
    },
    Count {
        relation: String,
        /// `None` counts rows (`COUNT(*)`); a column counts non-nulls.
        attribute: Option<String>,
    },
    Const {
        relation: Option<String>,
        value: Value,
        label: String,
    },
}

impl Selector {
    /// The relation this selector reads from, used to infer the base table
    /// of a query.
    pub fn relation(&self) -> Option<&str> {
        match self {
            Selector::Star { relation }
            | Selector::Attribute { relation, .. }
            | Selector::Count { relation, .. } => Some(relation),
            Selector::Const { relation, .. } => relation.as_deref(),
        }
    }

    fn is_count(&self) -> bool {
        matches!(self, Selector::Count { .. })
    }
}

/// Projects the row stream through `selectors`, returning column labels and
/// output tuples. A `Count` selector collapses the stream to a single row.
pub fn project(
    selectors: &[Selector],
    cols: &Columns,
    rows: &[Tuple],
) -> Result<(Vec<String>, Vec<Tuple>)> {
    if selectors.iter().any(Selector::is_count) {
        return project_counts(selectors, cols, rows);
    }

    let mut labels = Vec::new();
    let mut slots: Vec<SlotPlan> = Vec::new();

    for selector in selectors {
        match selector {
            Selector::Star { relation } => {
                let mut matched = false;
                for (i, col) in cols.items().iter().enumerate() {
                    if col.relation == *relation {
                        labels.push(col.attribute.clone());
                        slots.push(SlotPlan::Column(i));
                        matched = true;
                    }
                }
                if !matched {
                    bail!("relation {} does not exist", relation);
                }
            }
            Selector::Attribute {
                relation,
                attribute,
            } => {
                let rel = if relation.is_empty() {
                    None
                } else {
                    Some(relation.as_str())
                };
                let Some(i) = cols.lookup(rel, attribute) else {
                    bail!("column \"{}\" does not exist", attribute);
                };
                labels.push(attribute.clone());
                slots.push(SlotPlan::Column(i));
            }
            Selector::Const { value, label, .. } => {
                labels.push(label.clone());
                slots.push(SlotPlan::Const(value.clone()));
            }
            Selector::Count { .. } => unreachable!("count handled above"),
        }
    }

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let mut values = Vec::with_capacity(slots.len());
        for slot in &slots {
            match slot {
                SlotPlan::Column(i) => values.push(row.get(*i).cloned().unwrap_or(Value::Null)),
                SlotPlan::Const(v) => values.push(v.clone()),
            }
        }
        out.push(Tuple::from_values(values));
    }

    Ok((labels, out))
}

enum SlotPlan {
    Column(usize),
    Const(Value),
}

fn project_counts(
    selectors: &[Selector],
    cols: &Columns,
    rows: &[Tuple],
) -> Result<(Vec<String>, Vec<Tuple>)> {
    let mut labels = Vec::new();
    let mut values = Vec::new();

    for selector in selectors {
        match selector {
            Selector::Count {
                relation,
                attribute: None,
            } => {
                let _ = relation;
                labels.push("count(*)".to_string());
                values.push(Value::Int(rows.len() as i64));
            }
            Selector::Count {
                relation,
                attribute: Some(attr),
            } => {
                let rel = if relation.is_empty() {
                    None
                } else {
                    Some(relation.as_str())
                };
                let Some(i) = cols.lookup(rel, attr) else {
                    bail!("column \"{}\" does not exist", attr);
                };
                let count = rows
                    .iter()
                    .filter(|r| r.get(i).is_some_and(|v| !v.is_null()))
                    .count();
                labels.push(format!("count({})", attr));
                values.push(Value::Int(count as i64));
            }
            _ => bail!("not implemented: mixing COUNT with other select items"),
        }
    }

    Ok((labels, vec![Tuple::from_values(values)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Columns, Vec<Tuple>) {
        let mut cols = Columns::new();
        cols.push("t", "id");
        cols.push("t", "name");
        let rows = vec![
            Tuple::from_values(vec![Value::Int(1), Value::from("a")]),
            Tuple::from_values(vec![Value::Int(2), Value::Null]),
        ];
        (cols, rows)
    }

    #[test]
    fn star_projects_relation_columns() {
        let (cols, rows) = fixture();
        let (labels, out) = project(
            &[Selector::Star {
                relation: "t".into(),
            }],
            &cols,
            &rows,
        )
        .unwrap();
        assert_eq!(labels, vec!["id", "name"]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn attribute_and_const_mix() {
        let (cols, rows) = fixture();
        let (labels, out) = project(
            &[
                Selector::Attribute {
                    relation: "t".into(),
                    attribute: "id".into(),
                },
                Selector::Const {
                    relation: Some("t".into()),
                    value: Value::from("x"),
                    label: "x".into(),
                },
            ],
            &cols,
            &rows,
        )
        .unwrap();
        assert_eq!(labels, vec!["id", "x"]);
        assert_eq!(out[1].get(1), Some(&Value::from("x")));
    }

    #[test]
    fn count_star_and_count_column() {
        let (cols, rows) = fixture();
        let (_, out) = project(
            &[Selector::Count {
                relation: "t".into(),
                attribute: None,
            }],
            &cols,
            &rows,
        )
        .unwrap();
        assert_eq!(out[0].get(0), Some(&Value::Int(2)));

        let (_, out) = project(
            &[Selector::Count {
                relation: "t".into(),
                attribute: Some("name".into()),
            }],
            &cols,
            &rows,
        )
        .unwrap();
        // One of the two names is NULL.
        assert_eq!(out[0].get(0), Some(&Value::Int(1)));
    }

    #[test]
    fn unknown_column_errors_with_name() {
        let (cols, rows) = fixture();
        let err = project(
            &[Selector::Attribute {
                relation: "t".into(),
                attribute: "nope".into(),
            }],
            &cols,
            &rows,
        )
        .unwrap_err();
        assert!(err.to_string().contains("column \"nope\" does not exist"));
    }
}
