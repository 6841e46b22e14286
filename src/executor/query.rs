//! # SELECT Lowering and Execution
//!
//! Walks a parsed SELECT into kernel plan nodes:
//!
//! - FROM tables and JOIN clauses, with aliases resolved to real relation
//!   names before the kernel ever sees them
//! - WHERE into a [`Predicate`] tree over value functors
//! - ORDER BY / LIMIT / OFFSET / DISTINCT [ON] into [`Sorter`]s —
//!   LIMIT and OFFSET accept integer literals or bind parameters
//! - select items into [`Selector`]s: `*`, `[table.]col`, `COUNT(expr)`,
//!   literals, and the builtins `CURRENT_SCHEMA()` / `CURRENT_DATABASE()`
//!
//! Unqualified column references probe each FROM (and JOIN) table in order
//! and bind to the first relation carrying the attribute; no match is
//! reported as `column "x" does not exist` with the user's casing.
//!
//! The shared predicate lowering here is also used by UPDATE and DELETE.

use super::{literal_value, StatementContext, StatementResult, Tx};
use crate::plan::{
    ArithOp, ComparisonOp, Joiner, Predicate, Selector, SortKey, SortOrder, Sorter, ValueFunctor,
};
use crate::sql::{
    BinaryOperator, ColumnRef, CountArg, Distinct, Expr, FunctionCall, Literal, SelectColumn,
    SelectStmt,
};
use crate::types::Value;
use eyre::{bail, Result};
use hashbrown::HashMap;

use super::NamedValue;

/// Alias map plus the ordered list of relations in scope.
pub(crate) struct Scope {
    pub tables: Vec<String>,
    pub aliases: HashMap<String, String>,
}

impl Scope {
    pub fn single(relation: &str) -> Self {
        Self {
            tables: vec![relation.to_string()],
            aliases: HashMap::new(),
        }
    }

    fn resolve_alias(&self, name: &str) -> String {
        self.aliases
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }
}

pub fn execute_select(
    tx: &mut Tx,
    stmt: &SelectStmt<'_>,
    args: &[NamedValue],
) -> Result<StatementResult> {
    let ctx = StatementContext::new(args);

    let schema = stmt
        .from
        .first()
        .and_then(|t| t.schema)
        .map(str::to_lowercase)
        .unwrap_or_default();

    let mut scope = Scope {
        tables: Vec::new(),
        aliases: HashMap::new(),
    };
    for table in stmt.from {
        let name = table.name.to_lowercase();
        if let Some(alias) = table.alias {
            scope.aliases.insert(alias.to_lowercase(), name.clone());
        }
        scope.tables.push(name);
    }

    let mut joiners = Vec::new();
    for join in stmt.joins {
        let right = join.table.name.to_lowercase();
        if let Some(alias) = join.table.alias {
            scope.aliases.insert(alias.to_lowercase(), right.clone());
        }
        scope.tables.push(right.clone());
        joiners.push(build_joiner(tx, &schema, &scope, &right, join)?);
    }

    let predicate = match stmt.where_clause {
        Some(expr) => lower_predicate(tx, expr, &ctx, &schema, &scope)?,
        None => Predicate::True,
    };

    let mut sorters = Vec::new();
    if let Some(expr) = stmt.offset {
        sorters.push(Sorter::Offset(count_value(expr, &ctx, "offset")?));
    }
    match stmt.distinct {
        Distinct::All => {}
        Distinct::Rows => {
            let attrs = first_selected_column(stmt)
                .map(|col| vec![(None, col)])
                .unwrap_or_default();
            sorters.push(Sorter::Distinct { attrs });
        }
        Distinct::On(cols) => {
            let attrs = cols
                .iter()
                .map(|c| {
                    (
                        c.table.map(|t| scope.resolve_alias(&t.to_lowercase())),
                        c.column.to_lowercase(),
                    )
                })
                .collect();
            sorters.push(Sorter::Distinct { attrs });
        }
    }
    if !stmt.order_by.is_empty() {
        let keys = stmt
            .order_by
            .iter()
            .map(|item| SortKey {
                relation: item
                    .column
                    .table
                    .map(|t| scope.resolve_alias(&t.to_lowercase())),
                attribute: item.column.column.to_lowercase(),
                order: match item.direction {
                    crate::sql::OrderDirection::Asc => SortOrder::Asc,
                    crate::sql::OrderDirection::Desc => SortOrder::Desc,
                },
            })
            .collect();
        sorters.push(Sorter::OrderBy { keys });
    }
    if let Some(expr) = stmt.limit {
        sorters.push(Sorter::Limit(count_value(expr, &ctx, "limit")?));
    }

    let mut selectors = Vec::with_capacity(stmt.columns.len());
    for column in stmt.columns {
        match column {
            SelectColumn::AllColumns => {
                let Some(base) = scope.tables.first() else {
                    bail!("parsing error: SELECT * requires a FROM clause");
                };
                selectors.push(Selector::Star {
                    relation: base.clone(),
                });
            }
            SelectColumn::Expr { expr, .. } => {
                selectors.push(lower_selector(tx, expr, &ctx, &schema, &scope)?);
            }
        }
    }

    let (columns, rows) = tx
        .kernel_ref()
        .query(&schema, &selectors, predicate, &joiners, &sorters)?;

    Ok(StatementResult {
        last_insert_id: 0,
        rows_affected: 0,
        columns,
        rows,
    })
}

/// Orients a JOIN's ON columns: one side names the joined relation, the
/// other names a relation already in scope.
fn build_joiner(
    tx: &Tx,
    schema: &str,
    scope: &Scope,
    right: &str,
    join: &crate::sql::JoinClause<'_>,
) -> Result<Joiner> {
    let left_qualifier = join
        .left
        .table
        .map(|t| scope.resolve_alias(&t.to_lowercase()));
    let right_qualifier = join
        .right
        .table
        .map(|t| scope.resolve_alias(&t.to_lowercase()));

    let left_col = join.left.column.to_lowercase();
    let right_col = join.right.column.to_lowercase();

    let joined_on_left = match (&left_qualifier, &right_qualifier) {
        (Some(q), _) if q == right => true,
        (_, Some(q)) if q == right => false,
        // Unqualified: probe the joined relation for the left column.
        _ => tx
            .kernel_ref()
            .relation_attribute(schema, right, &left_col)
            .is_ok(),
    };

    let base = scope
        .tables
        .first()
        .cloned()
        .unwrap_or_else(|| right.to_string());

    if joined_on_left {
        let other = right_qualifier.unwrap_or(base);
        Ok(Joiner::new(other, right_col, right, left_col))
    } else {
        let other = left_qualifier.unwrap_or(base);
        Ok(Joiner::new(other, left_col, right, right_col))
    }
}

fn first_selected_column(stmt: &SelectStmt<'_>) -> Option<String> {
    stmt.columns.iter().find_map(|c| match c {
        SelectColumn::Expr {
            expr: Expr::Column(col),
            ..
        } => Some(col.column.to_lowercase()),
        _ => None,
    })
}

/// LIMIT/OFFSET operand: literal or bound parameter, non-negative.
fn count_value(expr: &Expr<'_>, ctx: &StatementContext<'_>, clause: &str) -> Result<usize> {
    let value = match expr {
        Expr::Literal(Literal::Integer(s)) => Value::Int(
            s.parse()
                .map_err(|_| eyre::eyre!("wrong {} value: {}", clause, s))?,
        ),
        Expr::Parameter(p) => ctx.resolve(p)?,
        other => bail!("wrong {} value: {:?}", clause, other),
    };
    let n = match &value {
        Value::Int(n) => *n,
        Value::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| eyre::eyre!("wrong {} value: {}", clause, s))?,
        Value::Float(f) => *f as i64,
        other => bail!("wrong {} value: {}", clause, other),
    };
    if n < 0 {
        bail!("wrong {} value: {}", clause, n);
    }
    Ok(n as usize)
}

/// Resolves a column reference to `(relation, attribute)`, honoring alias
/// qualifiers and probing the tables in scope for unqualified names.
pub(crate) fn resolve_column(
    tx: &Tx,
    schema: &str,
    scope: &Scope,
    column: &ColumnRef<'_>,
) -> Result<(String, String)> {
    let attr = column.column.to_lowercase();

    if let Some(qualifier) = column.table {
        let relation = scope.resolve_alias(&qualifier.to_lowercase());
        tx.kernel_ref().relation_attribute(schema, &relation, &attr)?;
        return Ok((relation, attr));
    }

    if scope.tables.is_empty() {
        bail!("column \"{}\" does not exist", column.column);
    }
    for table in &scope.tables {
        if tx
            .kernel_ref()
            .relation_attribute(schema, table, &attr)
            .is_ok()
        {
            return Ok((table.clone(), attr));
        }
    }
    bail!("column \"{}\" does not exist", column.column)
}

fn lower_selector(
    tx: &Tx,
    expr: &Expr<'_>,
    ctx: &StatementContext<'_>,
    schema: &str,
    scope: &Scope,
) -> Result<Selector> {
    let base = scope.tables.first().cloned();
    match expr {
        Expr::Column(column) => {
            let (relation, attribute) = resolve_column(tx, schema, scope, column)?;
            Ok(Selector::Attribute {
                relation,
                attribute,
            })
        }
        Expr::Function(FunctionCall::Count(arg)) => {
            let Some(base) = base else {
                bail!("parsing error: COUNT requires a FROM clause");
            };
            match arg {
                CountArg::Star => Ok(Selector::Count {
                    relation: base,
                    attribute: None,
                }),
                CountArg::Column(column) => {
                    let (relation, attribute) = resolve_column(tx, schema, scope, column)?;
                    Ok(Selector::Count {
                        relation,
                        attribute: Some(attribute),
                    })
                }
            }
        }
        Expr::Function(FunctionCall::CurrentSchema) => Ok(Selector::Const {
            relation: base,
            value: Value::Text(tx.kernel_ref().current_schema().to_string()),
            label: "current_schema".to_string(),
        }),
        Expr::Function(FunctionCall::CurrentDatabase) => Ok(Selector::Const {
            relation: base,
            value: Value::Text(tx.kernel_ref().db_name().to_string()),
            label: "current_database".to_string(),
        }),
        Expr::Function(FunctionCall::Now) => Ok(Selector::Const {
            relation: base,
            value: Value::Timestamp(crate::parsing::literal::now_micros()),
            label: "now".to_string(),
        }),
        Expr::Literal(lit) => {
            let value = literal_value(lit)?;
            let label = match lit {
                Literal::Integer(s) | Literal::Float(s) => (*s).to_string(),
                Literal::String(s) => (*s).to_string(),
                Literal::Boolean(b) => b.to_string(),
                Literal::Null => "null".to_string(),
            };
            Ok(Selector::Const {
                relation: base,
                value,
                label,
            })
        }
        Expr::Parameter(p) => Ok(Selector::Const {
            relation: base,
            value: ctx.resolve(p)?,
            label: "?column?".to_string(),
        }),
        other => bail!("cannot select {:?}", other),
    }
}

/// Lowers a WHERE expression into a kernel predicate tree.
pub(crate) fn lower_predicate(
    tx: &Tx,
    expr: &Expr<'_>,
    ctx: &StatementContext<'_>,
    schema: &str,
    scope: &Scope,
) -> Result<Predicate> {
    match expr {
        Expr::Binary {
            left,
            op: BinaryOperator::And,
            right,
        } => Ok(Predicate::And(
            Box::new(lower_predicate(tx, left, ctx, schema, scope)?),
            Box::new(lower_predicate(tx, right, ctx, schema, scope)?),
        )),
        Expr::Binary {
            left,
            op: BinaryOperator::Or,
            right,
        } => Ok(Predicate::Or(
            Box::new(lower_predicate(tx, left, ctx, schema, scope)?),
            Box::new(lower_predicate(tx, right, ctx, schema, scope)?),
        )),
        Expr::Binary { left, op, right } if op.is_comparison() => Ok(Predicate::Comparison {
            left: lower_functor(tx, left, ctx, schema, scope)?,
            op: comparison_op(*op),
            right: lower_functor(tx, right, ctx, schema, scope)?,
        }),
        Expr::IsNull {
            expr: inner,
            negated,
        } => Ok(Predicate::NullCheck {
            value: lower_functor(tx, inner, ctx, schema, scope)?,
            negated: *negated,
        }),
        Expr::InList {
            expr: inner,
            negated,
            list,
        } => {
            let value = lower_functor(tx, inner, ctx, schema, scope)?;
            let mut values = Vec::with_capacity(list.len());
            for item in *list {
                values.push(super::expr_value(tx, item, ctx)?);
            }
            let p = Predicate::In {
                value,
                list: values,
            };
            Ok(if *negated {
                Predicate::Not(Box::new(p))
            } else {
                p
            })
        }
        Expr::TupleIn {
            exprs,
            negated,
            rows,
        } => {
            let mut functors = Vec::with_capacity(exprs.len());
            for e in *exprs {
                functors.push(lower_functor(tx, e, ctx, schema, scope)?);
            }
            let mut tuples = Vec::with_capacity(rows.len());
            for row in *rows {
                let mut values = Vec::with_capacity(row.len());
                for item in *row {
                    values.push(super::expr_value(tx, item, ctx)?);
                }
                tuples.push(values);
            }
            let p = Predicate::TupleIn {
                values: functors,
                rows: tuples,
            };
            Ok(if *negated {
                Predicate::Not(Box::new(p))
            } else {
                p
            })
        }
        // WHERE 1 and boolean literals.
        Expr::Literal(Literal::Integer("1")) | Expr::Literal(Literal::Boolean(true)) => {
            Ok(Predicate::True)
        }
        Expr::Literal(Literal::Boolean(false)) => Ok(Predicate::Not(Box::new(Predicate::True))),
        other => bail!("parsing error: unsupported predicate {:?}", other),
    }
}

fn comparison_op(op: BinaryOperator) -> ComparisonOp {
    match op {
        BinaryOperator::Eq => ComparisonOp::Eq,
        BinaryOperator::NotEq => ComparisonOp::Neq,
        BinaryOperator::Lt => ComparisonOp::Le,
        BinaryOperator::LtEq => ComparisonOp::Leq,
        BinaryOperator::Gt => ComparisonOp::Ge,
        BinaryOperator::GtEq => ComparisonOp::Geq,
        _ => unreachable!("comparison_op called on non-comparison operator"),
    }
}

fn lower_functor(
    tx: &Tx,
    expr: &Expr<'_>,
    ctx: &StatementContext<'_>,
    schema: &str,
    scope: &Scope,
) -> Result<ValueFunctor> {
    match expr {
        Expr::Column(column) => {
            let (relation, attribute) = resolve_column(tx, schema, scope, column)?;
            Ok(ValueFunctor::attribute(relation, attribute))
        }
        Expr::Literal(lit) => Ok(ValueFunctor::Const(literal_value(lit)?)),
        Expr::Parameter(p) => Ok(ValueFunctor::Const(ctx.resolve(p)?)),
        Expr::Function(FunctionCall::Now) => Ok(ValueFunctor::Now),
        Expr::Function(FunctionCall::CurrentSchema) => Ok(ValueFunctor::CurrentSchema(
            tx.kernel_ref().current_schema().to_string(),
        )),
        Expr::Function(FunctionCall::CurrentDatabase) => Ok(ValueFunctor::CurrentDatabase(
            tx.kernel_ref().db_name().to_string(),
        )),
        Expr::Binary { left, op, right } => {
            let arith = match op {
                BinaryOperator::Plus => ArithOp::Add,
                BinaryOperator::Minus => ArithOp::Sub,
                BinaryOperator::Multiply => ArithOp::Mul,
                BinaryOperator::Divide => ArithOp::Div,
                other => bail!("parsing error: unsupported operator {:?} in expression", other),
            };
            Ok(ValueFunctor::Arith {
                left: Box::new(lower_functor(tx, left, ctx, schema, scope)?),
                op: arith,
                right: Box::new(lower_functor(tx, right, ctx, schema, scope)?),
            })
        }
        other => bail!("parsing error: unsupported operand {:?}", other),
    }
}
