//! # DELETE Execution
//!
//! Lowers the WHERE clause and dispatches the kernel delete, which enforces
//! RESTRICT against every referencing child. DELETE without WHERE is the
//! whole-table case and dispatches a truncation instead, mirroring the
//! dialect's equivalence between the two.

use super::query::{lower_predicate, Scope};
use super::{StatementContext, StatementResult, Tx};
use crate::sql::DeleteStmt;
use eyre::Result;

use super::NamedValue;

pub fn execute_delete(
    tx: &mut Tx,
    stmt: &DeleteStmt<'_>,
    args: &[NamedValue],
) -> Result<StatementResult> {
    let schema = stmt
        .table
        .schema
        .map(str::to_lowercase)
        .unwrap_or_default();
    let relation = stmt.table.name.to_lowercase();

    let Some(where_clause) = stmt.where_clause else {
        let removed = tx.kernel().truncate(&schema, &relation)?;
        return Ok(StatementResult::affected(removed as i64));
    };

    let ctx = StatementContext::new(args);
    let scope = Scope::single(&relation);
    let predicate = lower_predicate(tx, where_clause, &ctx, &schema, &scope)?;

    let (_, removed) = tx.kernel().delete(&schema, &relation, &[], predicate)?;
    Ok(StatementResult::affected(removed.len() as i64))
}
