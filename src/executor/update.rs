//! # UPDATE Execution
//!
//! Resolves SET assignments to constants, lowers the WHERE clause through
//! the shared predicate machinery, and dispatches the kernel update. A
//! missing WHERE updates every row. `RETURNING col` projects the named
//! column from each updated row.

use super::query::{lower_predicate, Scope};
use super::{expr_value, StatementContext, StatementResult, Tx};
use crate::plan::{Predicate, Selector};
use crate::sql::UpdateStmt;
use crate::types::Value;
use eyre::{eyre, Result};
use hashbrown::HashMap;

use super::NamedValue;

pub fn execute_update(
    tx: &mut Tx,
    stmt: &UpdateStmt<'_>,
    args: &[NamedValue],
) -> Result<StatementResult> {
    let ctx = StatementContext::new(args);
    let schema = stmt
        .table
        .schema
        .map(str::to_lowercase)
        .unwrap_or_default();
    let relation = stmt.table.name.to_lowercase();
    let scope = Scope::single(&relation);

    let returning = match stmt.returning {
        Some(column) => {
            let name = column.column.to_lowercase();
            tx.kernel_ref()
                .relation_attribute(&schema, &relation, &name)
                .map_err(|_| {
                    eyre!(
                        "cannot return {}, doesn't exist in relation {}",
                        column.column,
                        relation
                    )
                })?;
            Some(name)
        }
        None => None,
    };

    let mut set: HashMap<String, Value> = HashMap::new();
    for assignment in stmt.assignments {
        set.insert(
            assignment.column.to_lowercase(),
            expr_value(tx, assignment.value, &ctx)?,
        );
    }

    let predicate = match stmt.where_clause {
        Some(expr) => lower_predicate(tx, expr, &ctx, &schema, &scope)?,
        None => Predicate::True,
    };

    let selectors: Vec<Selector> = returning
        .into_iter()
        .map(|attribute| Selector::Attribute {
            relation: relation.clone(),
            attribute,
        })
        .collect();

    let (columns, rows) = tx
        .kernel()
        .update(&schema, &relation, &set, &selectors, predicate)?;

    Ok(StatementResult {
        last_insert_id: 0,
        rows_affected: rows.len() as i64,
        columns,
        rows,
    })
}
