//! # Predicates and Value Functors
//!
//! Boolean expression trees evaluated per row during scans. Operands are
//! [`ValueFunctor`]s: constants, attribute reads, arithmetic combinations,
//! and the builtin functions (`now()`, `current_schema()`,
//! `current_database()`).
//!
//! ## NULL Semantics
//!
//! Comparisons go through [`crate::types::Value::compare`], which yields
//! `None` when either operand is NULL; a `None` ordering fails the
//! predicate. `IS NULL` / `IS NOT NULL` are expressed as an equality
//! against a NULL constant wrapped in `Not` where needed, mirroring how the
//! executor lowers them — identity equality against NULL is handled by the
//! dedicated [`Predicate::NullCheck`] variant so it does not leak into
//! ordinary comparisons.

use super::Columns;
use crate::parsing::literal::now_micros;
use crate::schema::Tuple;
use crate::types::Value;
use eyre::{bail, Result};
use std::cmp::Ordering;

/// Arithmetic operator inside a comparison operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Produces one value per row.
#[derive(Debug, Clone)]
pub enum ValueFunctor {
    Const(Value),
    Attribute {
        relation: String,
        attribute: String,
    },
    Arith {
        left: Box<ValueFunctor>,
        op: ArithOp,
        right: Box<ValueFunctor>,
    },
    Now,
    CurrentSchema(String),
    CurrentDatabase(String),
}

impl ValueFunctor {
    pub fn attribute(relation: impl Into<String>, attribute: impl Into<String>) -> Self {
        ValueFunctor::Attribute {
            relation: relation.into(),
            attribute: attribute.into(),
        }
    }

    pub fn eval(&self, cols: &Columns, tuple: &Tuple) -> Result<Value> {
        match self {
            ValueFunctor::Const(v) => Ok(v.clone()),
            ValueFunctor::Attribute {
                relation,
                attribute,
            } => {
                let rel = if relation.is_empty() {
                    None
                } else {
                    Some(relation.as_str())
                };
                match cols.lookup(rel, attribute).and_then(|i| tuple.get(i)) {
                    Some(v) => Ok(v.clone()),
                    None => bail!("column \"{}\" does not exist", attribute),
                }
            }
            ValueFunctor::Arith { left, op, right } => {
                let l = left.eval(cols, tuple)?;
                let r = right.eval(cols, tuple)?;
                eval_arith(&l, *op, &r)
            }
            ValueFunctor::Now => Ok(Value::Timestamp(now_micros())),
            ValueFunctor::CurrentSchema(name) | ValueFunctor::CurrentDatabase(name) => {
                Ok(Value::Text(name.clone()))
            }
        }
    }
}

fn eval_arith(left: &Value, op: ArithOp, right: &Value) -> Result<Value> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(match op {
            ArithOp::Add => Value::Int(a + b),
            ArithOp::Sub => Value::Int(a - b),
            ArithOp::Mul => Value::Int(a * b),
            ArithOp::Div => {
                if *b == 0 {
                    bail!("division by zero");
                }
                Value::Int(a / b)
            }
        }),
        _ => {
            let (Some(a), Some(b)) = (as_f64(left), as_f64(right)) else {
                bail!("cannot apply arithmetic to {:?} and {:?}", left, right);
            };
            Ok(match op {
                ArithOp::Add => Value::Float(a + b),
                ArithOp::Sub => Value::Float(a - b),
                ArithOp::Mul => Value::Float(a * b),
                ArithOp::Div => {
                    if b == 0.0 {
                        bail!("division by zero");
                    }
                    Value::Float(a / b)
                }
            })
        }
    }
}

fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Comparison operator of a predicate. `Le`/`Ge` are the strict forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Neq,
    Le,
    Leq,
    Ge,
    Geq,
}

/// Boolean expression evaluated per row.
#[derive(Debug, Clone)]
pub enum Predicate {
    True,
    Comparison {
        left: ValueFunctor,
        op: ComparisonOp,
        right: ValueFunctor,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
    In {
        value: ValueFunctor,
        list: Vec<Value>,
    },
    TupleIn {
        values: Vec<ValueFunctor>,
        rows: Vec<Vec<Value>>,
    },
    /// `IS NULL` (identity test, unlike SQL equality).
    NullCheck {
        value: ValueFunctor,
        negated: bool,
    },
}

impl Predicate {
    pub fn eval(&self, cols: &Columns, tuple: &Tuple) -> Result<bool> {
        match self {
            Predicate::True => Ok(true),
            Predicate::Comparison { left, op, right } => {
                let l = left.eval(cols, tuple)?;
                let r = right.eval(cols, tuple)?;
                Ok(match (l.compare(&r), op) {
                    (None, _) => false,
                    (Some(Ordering::Equal), ComparisonOp::Eq) => true,
                    (Some(ord), ComparisonOp::Neq) => ord != Ordering::Equal,
                    (Some(Ordering::Less), ComparisonOp::Le | ComparisonOp::Leq) => true,
                    (Some(Ordering::Equal), ComparisonOp::Leq | ComparisonOp::Geq) => true,
                    (Some(Ordering::Greater), ComparisonOp::Ge | ComparisonOp::Geq) => true,
                    _ => false,
                })
            }
            Predicate::And(a, b) => Ok(a.eval(cols, tuple)? && b.eval(cols, tuple)?),
            Predicate::Or(a, b) => Ok(a.eval(cols, tuple)? || b.eval(cols, tuple)?),
            Predicate::Not(p) => Ok(!p.eval(cols, tuple)?),
            Predicate::In { value, list } => {
                let v = value.eval(cols, tuple)?;
                Ok(list
                    .iter()
                    .any(|item| v.compare(item) == Some(Ordering::Equal)))
            }
            Predicate::TupleIn { values, rows } => {
                let mut current = Vec::with_capacity(values.len());
                for functor in values {
                    current.push(functor.eval(cols, tuple)?);
                }
                Ok(rows.iter().any(|row| {
                    row.len() == current.len()
                        && row
                            .iter()
                            .zip(&current)
                            .all(|(a, b)| b.compare(a) == Some(Ordering::Equal))
                }))
            }
            Predicate::NullCheck { value, negated } => {
                let v = value.eval(cols, tuple)?;
                Ok(v.is_null() != *negated)
            }
        }
    }

    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::And(Box::new(self), Box::new(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> (Columns, Tuple) {
        let mut cols = Columns::new();
        cols.push("t", "a");
        cols.push("t", "b");
        let tuple = Tuple::from_values(vec![Value::Int(10), Value::Null]);
        (cols, tuple)
    }

    #[test]
    fn comparison_against_null_is_false_both_ways() {
        let (cols, tuple) = ctx();
        for op in [ComparisonOp::Eq, ComparisonOp::Neq] {
            let p = Predicate::Comparison {
                left: ValueFunctor::attribute("t", "b"),
                op,
                right: ValueFunctor::Const(Value::Null),
            };
            assert!(!p.eval(&cols, &tuple).unwrap());
        }
    }

    #[test]
    fn null_check_sees_null() {
        let (cols, tuple) = ctx();
        let is_null = Predicate::NullCheck {
            value: ValueFunctor::attribute("t", "b"),
            negated: false,
        };
        assert!(is_null.eval(&cols, &tuple).unwrap());

        let is_not_null = Predicate::NullCheck {
            value: ValueFunctor::attribute("t", "a"),
            negated: true,
        };
        assert!(is_not_null.eval(&cols, &tuple).unwrap());
    }

    #[test]
    fn arithmetic_operand_in_comparison() {
        let (cols, tuple) = ctx();
        // a * 3 > 25
        let p = Predicate::Comparison {
            left: ValueFunctor::Arith {
                left: Box::new(ValueFunctor::attribute("t", "a")),
                op: ArithOp::Mul,
                right: Box::new(ValueFunctor::Const(Value::Int(3))),
            },
            op: ComparisonOp::Ge,
            right: ValueFunctor::Const(Value::Int(25)),
        };
        assert!(p.eval(&cols, &tuple).unwrap());
    }

    #[test]
    fn in_list_compares_with_coercion() {
        let (cols, tuple) = ctx();
        let p = Predicate::In {
            value: ValueFunctor::attribute("t", "a"),
            list: vec![Value::Int(1), Value::Int(10)],
        };
        assert!(p.eval(&cols, &tuple).unwrap());
    }

    #[test]
    fn tuple_in_requires_all_columns_to_match() {
        let mut cols = Columns::new();
        cols.push("t", "x");
        cols.push("t", "y");
        let tuple = Tuple::from_values(vec![Value::from("cat"), Value::from("catalog1")]);

        let p = Predicate::TupleIn {
            values: vec![
                ValueFunctor::attribute("t", "x"),
                ValueFunctor::attribute("t", "y"),
            ],
            rows: vec![vec![Value::from("cat"), Value::from("catalog2")]],
        };
        assert!(!p.eval(&cols, &tuple).unwrap());
    }

    #[test]
    fn unknown_column_is_an_error() {
        let (cols, tuple) = ctx();
        let p = Predicate::Comparison {
            left: ValueFunctor::attribute("t", "missing"),
            op: ComparisonOp::Eq,
            right: ValueFunctor::Const(Value::Int(1)),
        };
        let err = p.eval(&cols, &tuple).unwrap_err();
        assert!(err.to_string().contains("column \"missing\" does not exist"));
    }
}
