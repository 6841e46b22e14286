//! # Statement Executor
//!
//! The tree-walking executor: lowers the typed AST into kernel operations
//! and plan nodes, drives the storage kernel, and shapes results for the
//! client surface.
//!
//! ## Dispatch
//!
//! Each top-level statement variant maps to one executor function — the
//! typed equivalent of a token→handler dispatch table:
//!
//! | Statement | Handler |
//! |-----------|---------|
//! | SELECT | [`query::execute_select`] |
//! | INSERT | [`insert::execute_insert`] |
//! | UPDATE | [`update::execute_update`] |
//! | DELETE | [`delete::execute_delete`] |
//! | CREATE TABLE / SCHEMA / INDEX, DROP, TRUNCATE | [`ddl`] |
//! | GRANT | no-op success |
//!
//! ## Statement Atomicity
//!
//! Each statement runs against an undo-log mark; any error unwinds exactly
//! that statement's mutations and leaves the enclosing transaction intact
//! and usable.
//!
//! ## Case Folding
//!
//! Identifiers are folded to lowercase here, once, at the AST boundary.
//! The kernel below only ever sees lowercase names; error messages keep the
//! user's original casing where it matters.

pub mod attribute;
pub mod ddl;
pub mod delete;
pub mod insert;
pub mod query;
pub mod update;

use crate::engine::Transaction;
use crate::schema::Tuple;
use crate::sql::{Parameter, Parser, Statement};
use crate::types::Value;
use bumpalo::Bump;
use eyre::{bail, Result};
use std::cell::Cell;
use tracing::debug;

/// A bound statement argument: positional ordinal plus optional name.
#[derive(Debug, Clone)]
pub struct NamedValue {
    pub name: Option<String>,
    pub ordinal: i64,
    pub value: Value,
}

impl NamedValue {
    pub fn positional(ordinal: i64, value: Value) -> Self {
        Self {
            name: None,
            ordinal,
            value,
        }
    }

    pub fn named(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: Some(name.into()),
            ordinal: 0,
            value,
        }
    }
}

/// Everything one statement produced.
#[derive(Debug, Default)]
pub struct StatementResult {
    pub last_insert_id: i64,
    pub rows_affected: i64,
    pub columns: Vec<String>,
    pub rows: Vec<Tuple>,
}

impl StatementResult {
    pub fn affected(rows_affected: i64) -> Self {
        Self {
            rows_affected,
            ..Self::default()
        }
    }
}

/// Per-statement lowering context: bound arguments plus the running counter
/// that numbers anonymous `?` parameters left to right.
pub(crate) struct StatementContext<'a> {
    args: &'a [NamedValue],
    anonymous: Cell<i64>,
}

impl<'a> StatementContext<'a> {
    pub fn new(args: &'a [NamedValue]) -> Self {
        Self {
            args,
            anonymous: Cell::new(0),
        }
    }

    pub fn resolve(&self, parameter: &Parameter<'_>) -> Result<Value> {
        match parameter {
            Parameter::Positional(n) => self.by_ordinal(*n as i64),
            Parameter::Anonymous => {
                let next = self.anonymous.get() + 1;
                self.anonymous.set(next);
                self.by_ordinal(next)
            }
            Parameter::Named(name) => {
                for arg in self.args {
                    if arg.name.as_deref() == Some(*name) {
                        return Ok(arg.value.clone());
                    }
                }
                bail!("no named argument found for '{}'", name)
            }
        }
    }

    fn by_ordinal(&self, ordinal: i64) -> Result<Value> {
        if let Some(arg) = self.args.iter().find(|a| a.ordinal == ordinal) {
            return Ok(arg.value.clone());
        }
        match self.args.get(ordinal as usize - 1) {
            Some(arg) => Ok(arg.value.clone()),
            None => bail!(
                "reference to ${}, but only {} arguments provided",
                ordinal,
                self.args.len()
            ),
        }
    }
}

/// SQL-facing transaction: parses statements and drives the kernel.
pub struct Tx {
    inner: Transaction,
}

impl Tx {
    pub(crate) fn new(inner: Transaction) -> Self {
        Self { inner }
    }

    pub(crate) fn kernel(&mut self) -> &mut Transaction {
        &mut self.inner
    }

    pub(crate) fn kernel_ref(&self) -> &Transaction {
        &self.inner
    }

    /// Executes one or more `;`-separated statements, returning the last
    /// insert id and the total affected row count.
    pub fn execute(&mut self, sql: &str, args: &[NamedValue]) -> Result<(i64, i64)> {
        debug!(sql, "execute");
        let arena = Bump::new();
        let mut parser = Parser::new(sql, &arena);
        let statements = parser.parse()?;

        let mut last_insert_id = 0;
        let mut rows_affected = 0;
        for statement in statements {
            let result = self.execute_statement(statement, args)?;
            last_insert_id = result.last_insert_id;
            rows_affected += result.rows_affected;
        }
        Ok((last_insert_id, rows_affected))
    }

    /// Runs exactly one statement and returns its result set.
    pub fn query(&mut self, sql: &str, args: &[NamedValue]) -> Result<(Vec<String>, Vec<Tuple>)> {
        debug!(sql, "query");
        let arena = Bump::new();
        let mut parser = Parser::new(sql, &arena);
        let statements = parser.parse()?;
        if statements.len() != 1 {
            bail!("expected 1 query, got {}", statements.len());
        }

        let result = self.execute_statement(statements[0], args)?;
        Ok((result.columns, result.rows))
    }

    /// Makes the transaction permanent and releases the engine lock.
    pub fn commit(self) -> Result<()> {
        self.inner.commit()
    }

    /// Reverts the transaction. Never fails.
    pub fn rollback(self) {
        self.inner.rollback()
    }

    /// Runs one statement atomically: on error, the statement's own
    /// mutations are unwound and the transaction stays usable.
    fn execute_statement(
        &mut self,
        statement: Statement<'_>,
        args: &[NamedValue],
    ) -> Result<StatementResult> {
        let mark = self.inner.log_mark();
        let result = self.dispatch(statement, args);
        if result.is_err() {
            self.inner.rollback_to(mark);
        }
        result
    }

    fn dispatch(
        &mut self,
        statement: Statement<'_>,
        args: &[NamedValue],
    ) -> Result<StatementResult> {
        match statement {
            Statement::Select(stmt) => query::execute_select(self, stmt, args),
            Statement::Insert(stmt) => insert::execute_insert(self, stmt, args),
            Statement::Update(stmt) => update::execute_update(self, stmt, args),
            Statement::Delete(stmt) => delete::execute_delete(self, stmt, args),
            Statement::CreateTable(stmt) => ddl::create_table(self, stmt),
            Statement::CreateSchema(stmt) => ddl::create_schema(self, stmt),
            Statement::CreateIndex(stmt) => ddl::create_index(self, stmt),
            Statement::Drop(stmt) => ddl::drop(self, stmt),
            Statement::Truncate(stmt) => ddl::truncate(self, stmt),
            Statement::Grant => Ok(StatementResult::affected(1)),
        }
    }
}

/// Converts a parsed literal into a runtime value by its lexical shape.
pub(crate) fn literal_value(literal: &crate::sql::Literal<'_>) -> Result<Value> {
    use crate::sql::Literal;
    Ok(match literal {
        Literal::Null => Value::Null,
        Literal::Boolean(b) => Value::Bool(*b),
        Literal::Integer(s) => Value::Int(
            s.parse()
                .map_err(|_| eyre::eyre!("cannot convert '{}' to bigint", s))?,
        ),
        Literal::Float(s) => Value::Float(
            s.parse()
                .map_err(|_| eyre::eyre!("cannot convert '{}' to float", s))?,
        ),
        Literal::String(s) => Value::Text(unescape_string(s)),
    })
}

/// Undoes the `''` escaping of single-quoted SQL strings.
fn unescape_string(s: &str) -> String {
    if s.contains("''") {
        s.replace("''", "'")
    } else {
        s.to_string()
    }
}

/// Evaluates a value-position expression (INSERT VALUES, SET right-hand
/// side) to a constant. Column references are not value expressions here;
/// `excluded.col` is resolved by the ON CONFLICT path before this runs.
pub(crate) fn expr_value(
    tx: &Tx,
    expr: &crate::sql::Expr<'_>,
    ctx: &StatementContext<'_>,
) -> Result<Value> {
    use crate::sql::{Expr, FunctionCall};
    match expr {
        Expr::Literal(lit) => literal_value(lit),
        Expr::Parameter(p) => ctx.resolve(p),
        Expr::Function(FunctionCall::Now) => Ok(Value::Timestamp(
            crate::parsing::literal::now_micros(),
        )),
        Expr::Function(FunctionCall::CurrentSchema) => {
            Ok(Value::Text(tx.kernel_ref().current_schema().to_string()))
        }
        Expr::Function(FunctionCall::CurrentDatabase) => {
            Ok(Value::Text(tx.kernel_ref().db_name().to_string()))
        }
        other => bail!("cannot evaluate {:?} as a value", other),
    }
}
