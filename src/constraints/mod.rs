//! # Constraint Enforcement
//!
//! Constraint validation for DML operations. Constraints are declared in
//! the schema and enforced here during INSERT, UPDATE, and DELETE to keep
//! referential integrity.
//!
//! | Constraint  | INSERT | UPDATE | DELETE | Check |
//! |-------------|--------|--------|--------|-------|
//! | NOT NULL    | ✓      | ✓      | -      | primary-key columns reject NULL |
//! | PRIMARY KEY | ✓      | -      | -      | unique index probe |
//! | UNIQUE      | ✓      | -      | -      | unique index probe |
//! | FK existence| ✓      | ✓      | -      | parent index probe |
//! | FK restrict | -      | ✓      | ✓      | child index probe with parent key |
//!
//! ## Validation Order
//!
//! 1. NOT NULL (cheap, fail fast)
//! 2. PK / UNIQUE via the relation's unique hash indexes
//! 3. FK existence via the parent's key index
//!
//! On the parent side, deleting or re-keying a row consults every relation
//! whose foreign keys reference it; any child hit rejects the mutation with
//! RESTRICT semantics (the only supported referential action). Composite
//! keys must match all referenced columns jointly — a partial overlap is
//! not a reference.
//!
//! ## Error Surface
//!
//! Stable message prefixes: `unique constraint violation`,
//! `foreign key violation`, `foreign key restrict`.

use crate::engine::EngineState;
use crate::schema::{ForeignKey, IndexKey, Relation};
use crate::types::Value;
use eyre::{bail, Result};
use std::cmp::Ordering;

/// Rejects NULL in primary-key columns. NOT NULL is implicit for the
/// primary key only.
pub fn check_not_null(relation: &Relation, values: &[Value]) -> Result<()> {
    for &i in relation.pk_indices() {
        if values.get(i).map_or(true, Value::is_null) {
            bail!(
                "null value in column \"{}\" violates not-null constraint",
                relation.attributes()[i].name()
            );
        }
    }
    Ok(())
}

/// Probes every unique index of the relation with the proposed row.
pub fn check_unique(relation: &Relation, values: &[Value]) -> Result<()> {
    for index in relation.indexes().iter().filter(|i| i.unique()) {
        let key = index.key_for_row(values);
        if key.values().iter().any(Value::is_null) {
            continue;
        }
        if index.get(&key).is_some_and(|rows| !rows.is_empty()) {
            bail!("unique constraint violation on {}", relation);
        }
    }
    Ok(())
}

/// Verifies that every foreign key of `child` has a matching parent row for
/// the proposed values. Rows with any NULL local column are exempt.
pub fn check_foreign_keys(
    state: &EngineState,
    child_schema: &str,
    child: &Relation,
    values: &[Value],
) -> Result<()> {
    for fk in child.unique_foreign_keys() {
        let mut local_values = Vec::with_capacity(fk.local_columns().len());
        for col in fk.local_columns() {
            let (i, _) = child.attribute(col)?;
            local_values.push(values[i].clone());
        }
        if local_values.iter().any(Value::is_null) {
            continue;
        }

        let parent_schema = fk.ref_schema().unwrap_or(child_schema);
        let parent = state.relation(parent_schema, fk.ref_relation())?;

        let ref_cols = resolve_ref_columns(&fk, parent);
        if ref_cols.len() != local_values.len() {
            bail!("foreign key violation on {}", child);
        }

        let mut probe = Vec::with_capacity(ref_cols.len());
        for (col, value) in ref_cols.iter().zip(&local_values) {
            let (_, attr) = parent.attribute(col)?;
            probe.push(value.coerce_to(attr.data_type())?);
        }

        let found = match parent.find_index_on(&ref_cols) {
            Some(index) => index
                .get(&IndexKey::new(probe.clone()))
                .is_some_and(|rows| !rows.is_empty()),
            None => scan_for_match(parent, &ref_cols, &probe)?,
        };

        if !found {
            bail!("foreign key violation on {}", child);
        }
    }
    Ok(())
}

/// RESTRICT check on the parent side: rejects deleting (or re-keying) a
/// parent row that any child still references.
///
/// `changed` carries the attribute slots an UPDATE is about to modify; a
/// foreign key only restricts when one of its referenced columns is among
/// them. Pass `None` for DELETE, where every referenced column counts.
pub fn check_restrict(
    state: &EngineState,
    parent_schema: &str,
    parent: &Relation,
    parent_values: &[Value],
    changed: Option<&[usize]>,
) -> Result<()> {
    for (child_schema, child_name, fk) in referencing_foreign_keys(state, parent_schema, parent) {
        let child = state.relation(&child_schema, &child_name)?;
        let ref_cols = resolve_ref_columns(&fk, parent);
        if ref_cols.len() != fk.local_columns().len() {
            continue;
        }

        if let Some(changed) = changed {
            let mut touches_key = false;
            for col in &ref_cols {
                let (i, _) = parent.attribute(col)?;
                if changed.contains(&i) {
                    touches_key = true;
                    break;
                }
            }
            if !touches_key {
                continue;
            }
        }

        let mut probe = Vec::with_capacity(ref_cols.len());
        for (ref_col, local_col) in ref_cols.iter().zip(fk.local_columns()) {
            let (i, _) = parent.attribute(ref_col)?;
            let (_, local_attr) = child.attribute(local_col)?;
            probe.push(parent_values[i].coerce_to(local_attr.data_type())?);
        }
        if probe.iter().any(Value::is_null) {
            continue;
        }

        let referenced = match child.find_index_on(fk.local_columns()) {
            Some(index) => index
                .get(&IndexKey::new(probe.clone()))
                .is_some_and(|rows| !rows.is_empty()),
            None => scan_for_match(child, fk.local_columns(), &probe)?,
        };

        if referenced {
            bail!("foreign key restrict on {}", parent);
        }
    }
    Ok(())
}

/// Every foreign key in the engine referencing `parent`, with the schema
/// and name of the child relation carrying it.
pub fn referencing_foreign_keys(
    state: &EngineState,
    parent_schema: &str,
    parent: &Relation,
) -> Vec<(String, String, ForeignKey)> {
    let mut out = Vec::new();
    for schema in state.schemas() {
        for child in schema.relations() {
            for fk in child.unique_foreign_keys() {
                let ref_schema = fk.ref_schema().unwrap_or(schema.name());
                if ref_schema == parent_schema && fk.ref_relation() == parent.name() {
                    out.push((schema.name().to_string(), child.name().to_string(), fk));
                }
            }
        }
    }
    out
}

fn resolve_ref_columns(fk: &ForeignKey, parent: &Relation) -> Vec<String> {
    if fk.ref_columns().is_empty() {
        parent.pk_columns()
    } else {
        fk.ref_columns().to_vec()
    }
}

fn scan_for_match(relation: &Relation, cols: &[String], probe: &[Value]) -> Result<bool> {
    let mut indices = Vec::with_capacity(cols.len());
    for col in cols {
        let (i, _) = relation.attribute(col)?;
        indices.push(i);
    }
    Ok(relation.rows().any(|(_, tuple)| {
        indices.iter().zip(probe).all(|(&i, expected)| {
            tuple
                .get(i)
                .is_some_and(|v| v.compare(expected) == Some(Ordering::Equal))
        })
    }))
}
