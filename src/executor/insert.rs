//! # INSERT Execution
//!
//! Resolves each VALUES row into a column→value map (binding `$N`, `?` and
//! `:name` parameters), dispatches the kernel insert, and handles
//! `ON CONFLICT` and `RETURNING`.
//!
//! ## ON CONFLICT
//!
//! The proposed row is first tested against the primary key. On conflict:
//!
//! - `DO NOTHING` skips the row
//! - `DO UPDATE SET …` builds an AND-predicate over the conflict target
//!   columns and dispatches a kernel update; `excluded.col` in the SET
//!   expressions reads from the proposed row
//!
//! ## last_insert_id
//!
//! Taken from the first column of the last inserted (or updated) row when
//! it is integral, which covers the common `BIGSERIAL PRIMARY KEY` layout.

use super::{expr_value, StatementContext, StatementResult, Tx};
use crate::plan::{Predicate, Selector, ValueFunctor};
use crate::schema::Tuple;
use crate::sql::{ColumnRef, Expr, InsertStmt, OnConflict, OnConflictAction};
use crate::types::Value;
use eyre::{bail, eyre, Result};
use hashbrown::HashMap;

use super::NamedValue;

pub fn execute_insert(
    tx: &mut Tx,
    stmt: &InsertStmt<'_>,
    args: &[NamedValue],
) -> Result<StatementResult> {
    let ctx = StatementContext::new(args);
    let schema = stmt
        .table
        .schema
        .map(str::to_lowercase)
        .unwrap_or_default();
    let relation = stmt.table.name.to_lowercase();

    let returning = match stmt.returning {
        Some(column) => Some(resolve_returning(tx, &schema, &relation, &column)?),
        None => None,
    };

    let mut last_insert_id = 0i64;
    let mut inserted = 0i64;
    let mut rows = Vec::new();

    for value_exprs in stmt.values {
        if value_exprs.len() != stmt.columns.len() {
            bail!(
                "parsing error: {} values for {} columns",
                value_exprs.len(),
                stmt.columns.len()
            );
        }

        let mut values: HashMap<String, Value> = HashMap::new();
        for (column, expr) in stmt.columns.iter().zip(*value_exprs) {
            if matches!(expr, Expr::Default) {
                continue;
            }
            values.insert(column.to_lowercase(), expr_value(tx, expr, &ctx)?);
        }

        let tuple = match stmt.on_conflict {
            Some(on_conflict) => {
                handle_on_conflict(tx, &schema, &relation, &values, on_conflict, &ctx)?
            }
            None => Some(tx.kernel().insert(&schema, &relation, &values)?),
        };

        let Some(tuple) = tuple else {
            continue;
        };
        inserted += 1;
        if let Some(Value::Int(id)) = tuple.get(0) {
            last_insert_id = *id;
        }
        if let Some((_, index)) = &returning {
            rows.push(Tuple::from_values(vec![tuple
                .get(*index)
                .cloned()
                .unwrap_or(Value::Null)]));
        }
    }

    let columns = returning.map(|(name, _)| vec![name]).unwrap_or_default();
    Ok(StatementResult {
        last_insert_id,
        rows_affected: inserted,
        columns,
        rows,
    })
}

fn resolve_returning(
    tx: &Tx,
    schema: &str,
    relation: &str,
    column: &ColumnRef<'_>,
) -> Result<(String, usize)> {
    let name = column.column.to_lowercase();
    let (index, _) = tx
        .kernel_ref()
        .relation_attribute(schema, relation, &name)
        .map_err(|_| {
            eyre!(
                "cannot return {}, doesn't exist in relation {}",
                column.column,
                relation
            )
        })?;
    Ok((name, index))
}

/// Runs the ON CONFLICT protocol for one proposed row. Returns the stored
/// tuple, or `None` when DO NOTHING skipped the row.
fn handle_on_conflict(
    tx: &mut Tx,
    schema: &str,
    relation: &str,
    values: &HashMap<String, Value>,
    on_conflict: &OnConflict<'_>,
    ctx: &StatementContext<'_>,
) -> Result<Option<Tuple>> {
    if !tx
        .kernel_ref()
        .check_primary_key_conflict(schema, relation, values)?
    {
        return Ok(Some(tx.kernel().insert(schema, relation, values)?));
    }

    let assignments = match on_conflict.action {
        OnConflictAction::DoNothing => return Ok(None),
        OnConflictAction::DoUpdate(assignments) => assignments,
    };

    let mut predicate: Option<Predicate> = None;
    for target in on_conflict.targets {
        let column = target.to_lowercase();
        let Some(value) = values.get(&column) else {
            bail!("conflict target columns must have values in the INSERT statement");
        };
        let comparison = Predicate::Comparison {
            left: ValueFunctor::attribute(relation, column),
            op: crate::plan::ComparisonOp::Eq,
            right: ValueFunctor::Const(value.clone()),
        };
        predicate = Some(match predicate {
            None => comparison,
            Some(existing) => existing.and(comparison),
        });
    }
    let Some(predicate) = predicate else {
        bail!("conflict target columns must have values in the INSERT statement");
    };

    let mut set: HashMap<String, Value> = HashMap::new();
    for assignment in assignments {
        let column = assignment.column.to_lowercase();
        let value = match assignment.value {
            // excluded.col: the value the rejected INSERT proposed.
            Expr::Column(ColumnRef {
                table: Some(qualifier),
                column: ref_column,
            }) if qualifier.eq_ignore_ascii_case("excluded") => values
                .get(&ref_column.to_lowercase())
                .cloned()
                .unwrap_or(Value::Null),
            other => expr_value(tx, other, ctx)?,
        };
        set.insert(column, value);
    }

    let selectors = [Selector::Star {
        relation: relation.to_string(),
    }];
    let (_, updated) = tx
        .kernel()
        .update(schema, relation, &set, &selectors, predicate)?;

    match updated.into_iter().next() {
        Some(tuple) => Ok(Some(tuple)),
        None => bail!("internal error: conflict detected but no matching rows found for update"),
    }
}
