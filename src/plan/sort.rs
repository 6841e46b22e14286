//! # Sorters
//!
//! Post-scan operators reshaping the row stream. The application order is
//! fixed regardless of the order the clauses appeared in:
//!
//! ```text
//! OFFSET → DISTINCT → ORDER BY → LIMIT
//! ```
//!
//! so `LIMIT n OFFSET m` over the insertion order returns exactly
//! `min(n, max(total - m, 0))` rows, and DISTINCT deduplicates by projected
//! key preserving the first occurrence.

use super::Columns;
use crate::schema::Tuple;
use crate::types::Value;
use eyre::{bail, Result};
use hashbrown::HashSet;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// One ORDER BY key.
#[derive(Debug, Clone)]
pub struct SortKey {
    pub relation: Option<String>,
    pub attribute: String,
    pub order: SortOrder,
}

#[derive(Debug, Clone)]
pub enum Sorter {
    Offset(usize),
    /// Deduplicate on the named attributes; an empty list means the whole
    /// row is the key.
    Distinct { attrs: Vec<(Option<String>, String)> },
    OrderBy { keys: Vec<SortKey> },
    Limit(usize),
}

/// Applies `sorters` in the canonical order.
pub fn apply(sorters: &[Sorter], cols: &Columns, rows: Vec<Tuple>) -> Result<Vec<Tuple>> {
    let mut offset: Option<usize> = None;
    let mut distinct: Option<&Sorter> = None;
    let mut order_by: Option<&Sorter> = None;
    let mut limit: Option<usize> = None;

    for sorter in sorters {
        match sorter {
            Sorter::Offset(n) => offset = Some(*n),
            Sorter::Distinct { .. } => distinct = Some(sorter),
            Sorter::OrderBy { .. } => order_by = Some(sorter),
            Sorter::Limit(n) => limit = Some(*n),
        }
    }

    let mut rows = rows;

    if let Some(n) = offset {
        rows = rows.into_iter().skip(n).collect();
    }

    if let Some(Sorter::Distinct { attrs }) = distinct {
        rows = apply_distinct(attrs, cols, rows)?;
    }

    if let Some(Sorter::OrderBy { keys }) = order_by {
        rows = apply_order_by(keys, cols, rows)?;
    }

    if let Some(n) = limit {
        rows.truncate(n);
    }

    Ok(rows)
}

fn apply_distinct(
    attrs: &[(Option<String>, String)],
    cols: &Columns,
    rows: Vec<Tuple>,
) -> Result<Vec<Tuple>> {
    let mut indices = Vec::with_capacity(attrs.len());
    for (relation, attr) in attrs {
        match cols.lookup(relation.as_deref(), attr) {
            Some(i) => indices.push(i),
            None => bail!("column \"{}\" does not exist", attr),
        }
    }

    let mut seen: HashSet<Vec<Value>> = HashSet::new();
    let mut out = Vec::new();
    for row in rows {
        let key: Vec<Value> = if indices.is_empty() {
            row.values().to_vec()
        } else {
            indices
                .iter()
                .map(|&i| row.get(i).cloned().unwrap_or(Value::Null))
                .collect()
        };
        if seen.insert(key) {
            out.push(row);
        }
    }
    Ok(out)
}

fn apply_order_by(keys: &[SortKey], cols: &Columns, mut rows: Vec<Tuple>) -> Result<Vec<Tuple>> {
    let mut indices = Vec::with_capacity(keys.len());
    for key in keys {
        match cols.lookup(key.relation.as_deref(), &key.attribute) {
            Some(i) => indices.push((i, key.order)),
            None => bail!("column \"{}\" does not exist", key.attribute),
        }
    }

    rows.sort_by(|a, b| {
        for &(i, order) in &indices {
            let av = a.get(i).unwrap_or(&Value::Null);
            let bv = b.get(i).unwrap_or(&Value::Null);
            let ord = av.compare(bv).unwrap_or(Ordering::Equal);
            let ord = match order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });

    Ok(rows)
}
