//! # Equi-Join
//!
//! Hash join binding two relations by one column on each side. The hash map
//! is built on the smaller input; the larger side streams through it, so
//! output order follows the probe side. Joined tuples are the concatenation
//! of left and right values, with the column layout widened accordingly.

use super::Columns;
use crate::schema::Tuple;
use crate::types::Value;
use eyre::{bail, Result};
use hashbrown::HashMap;

#[derive(Debug, Clone)]
pub struct Joiner {
    left_relation: String,
    left_column: String,
    right_relation: String,
    right_column: String,
}

impl Joiner {
    pub fn new(
        left_relation: impl Into<String>,
        left_column: impl Into<String>,
        right_relation: impl Into<String>,
        right_column: impl Into<String>,
    ) -> Self {
        Self {
            left_relation: left_relation.into(),
            left_column: left_column.into(),
            right_relation: right_relation.into(),
            right_column: right_column.into(),
        }
    }

    pub fn right_relation(&self) -> &str {
        &self.right_relation
    }

    pub fn exec(
        &self,
        left_cols: &Columns,
        left_rows: Vec<Tuple>,
        right_cols: &Columns,
        right_rows: Vec<Tuple>,
    ) -> Result<(Columns, Vec<Tuple>)> {
        let Some(left_idx) = left_cols.lookup(Some(&self.left_relation), &self.left_column) else {
            bail!("column \"{}\" does not exist", self.left_column);
        };
        let Some(right_idx) = right_cols.lookup(Some(&self.right_relation), &self.right_column)
        else {
            bail!("column \"{}\" does not exist", self.right_column);
        };

        let mut cols = Columns::new();
        cols.extend_from(left_cols);
        cols.extend_from(right_cols);

        let mut out = Vec::new();

        // Build on the smaller side, stream the larger one through it.
        if right_rows.len() <= left_rows.len() {
            let mut table: HashMap<Value, Vec<&Tuple>> = HashMap::new();
            for tuple in &right_rows {
                if let Some(v) = tuple.get(right_idx) {
                    if !v.is_null() {
                        table.entry(v.clone()).or_default().push(tuple);
                    }
                }
            }
            for left in &left_rows {
                let Some(key) = left.get(left_idx) else {
                    continue;
                };
                if let Some(matches) = table.get(key) {
                    for right in matches {
                        out.push(merge(left, right));
                    }
                }
            }
        } else {
            let mut table: HashMap<Value, Vec<&Tuple>> = HashMap::new();
            for tuple in &left_rows {
                if let Some(v) = tuple.get(left_idx) {
                    if !v.is_null() {
                        table.entry(v.clone()).or_default().push(tuple);
                    }
                }
            }
            for right in &right_rows {
                let Some(key) = right.get(right_idx) else {
                    continue;
                };
                if let Some(matches) = table.get(key) {
                    for left in matches {
                        out.push(merge(left, right));
                    }
                }
            }
        }

        Ok((cols, out))
    }
}

fn merge(left: &Tuple, right: &Tuple) -> Tuple {
    let mut values = Vec::with_capacity(left.len() + right.len());
    values.extend_from_slice(left.values());
    values.extend_from_slice(right.values());
    Tuple::from_values(values)
}
