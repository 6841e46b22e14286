//! # Column Definition Lowering
//!
//! Turns parsed column definitions into kernel [`Attribute`]s: canonical
//! type, auto-increment, defaults (constant or `now()` thunk), uniqueness,
//! and inline foreign keys. Table-level foreign keys are built here too and
//! distributed onto their local attributes by the CREATE TABLE executor.

use crate::schema::{Attribute, ForeignKey};
use crate::sql::{ColumnConstraint, ColumnDef, Expr, FunctionCall, TableConstraint};
use crate::types::Value;
use eyre::{bail, Result};

/// Lowers one column definition. Returns the attribute and whether the
/// column was declared `PRIMARY KEY` inline.
pub fn build_attribute(column: &ColumnDef<'_>) -> Result<(Attribute, bool)> {
    let name = column.name.to_lowercase();
    let mut attr = Attribute::new(name.clone(), column.data_type);
    let mut is_pk = false;

    for constraint in column.constraints {
        match constraint {
            ColumnConstraint::PrimaryKey => is_pk = true,
            ColumnConstraint::Unique => attr = attr.with_unique(),
            ColumnConstraint::NotNull => attr = attr.with_not_null(),
            ColumnConstraint::AutoIncrement => attr = attr.with_auto_increment(),
            ColumnConstraint::Default(expr) => {
                attr = apply_default(attr, column, expr)?;
            }
            ColumnConstraint::References {
                constraint,
                schema,
                table,
                column: ref_column,
            } => {
                let mut fk = ForeignKey::new(constraint.map(|c| c.to_lowercase()))
                    .with_local_column(name.clone())
                    .with_ref_relation(table.to_lowercase());
                if let Some(schema) = schema {
                    fk = fk.with_ref_schema(schema.to_lowercase());
                }
                if let Some(col) = ref_column {
                    fk = fk.with_ref_column(col.to_lowercase());
                }
                attr = attr.with_foreign_key(fk);
            }
        }
    }

    Ok((attr, is_pk))
}

fn apply_default(attr: Attribute, column: &ColumnDef<'_>, expr: &Expr<'_>) -> Result<Attribute> {
    match expr {
        Expr::Function(FunctionCall::Now) => Ok(attr.with_default_now()),
        Expr::Literal(lit) => {
            let value = crate::executor::literal_value(lit)?;
            let value = match &value {
                Value::Text(s) => Value::from_literal(s, column.data_type)?,
                other => other.coerce_to(column.data_type)?,
            };
            Ok(attr.with_default_const(value))
        }
        other => bail!(
            "cannot use {:?} as DEFAULT for column \"{}\"",
            other,
            column.name
        ),
    }
}

/// Builds a kernel foreign key from a table-level constraint.
pub fn build_table_foreign_key(constraint: &TableConstraint<'_>) -> Option<ForeignKey> {
    let TableConstraint::ForeignKey {
        constraint,
        columns,
        ref_schema,
        ref_table,
        ref_columns,
    } = constraint
    else {
        return None;
    };

    let mut fk = ForeignKey::new(constraint.map(|c| c.to_lowercase()))
        .with_ref_relation(ref_table.to_lowercase());
    if let Some(schema) = ref_schema {
        fk = fk.with_ref_schema(schema.to_lowercase());
    }
    for col in *columns {
        fk = fk.with_local_column(col.to_lowercase());
    }
    for col in *ref_columns {
        fk = fk.with_ref_column(col.to_lowercase());
    }
    Some(fk)
}
