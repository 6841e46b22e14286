//! # DDL Execution
//!
//! CREATE TABLE / SCHEMA / INDEX, DROP TABLE / SCHEMA, and TRUNCATE.
//!
//! CREATE TABLE walks the column definitions into attributes, gathers the
//! primary key from inline and table-level declarations, and distributes
//! table-level foreign keys onto their local attributes so the relation can
//! derive its deduplicated FK indexes.

use super::attribute::{build_attribute, build_table_foreign_key};
use super::{StatementResult, Tx};
use crate::schema::IndexType;
use crate::sql::{
    CreateIndexStmt, CreateSchemaStmt, CreateTableStmt, DropStmt, IndexKind, ObjectType,
    TableConstraint, TruncateStmt,
};
use eyre::{bail, Result};

pub fn create_table(tx: &mut Tx, stmt: &CreateTableStmt<'_>) -> Result<StatementResult> {
    let schema = stmt
        .table
        .schema
        .map(str::to_lowercase)
        .unwrap_or_default();
    let relation = stmt.table.name.to_lowercase();

    if tx.kernel_ref().check_relation(&schema, &relation) {
        if stmt.if_not_exists {
            return Ok(StatementResult::default());
        }
        bail!("relation already exists");
    }

    let mut pk: Vec<String> = Vec::new();
    let mut attributes = Vec::with_capacity(stmt.columns.len());
    for column in stmt.columns {
        let (attr, is_pk) = build_attribute(column)?;
        if is_pk {
            pk.push(attr.name().to_string());
        }
        attributes.push(attr);
    }

    for constraint in stmt.constraints {
        if let TableConstraint::PrimaryKey { columns } = constraint {
            for col in *columns {
                pk.push(col.to_lowercase());
            }
            continue;
        }
        if let Some(fk) = build_table_foreign_key(constraint) {
            for local in fk.local_columns() {
                let Some(attr) = attributes.iter_mut().find(|a| a.name() == local) else {
                    bail!("column \"{}\" does not exist", local);
                };
                *attr = attr.clone().with_foreign_key(fk.clone());
            }
        }
    }

    tx.kernel().create_relation(&schema, &relation, attributes, &pk)?;
    Ok(StatementResult::affected(1))
}

pub fn create_schema(tx: &mut Tx, stmt: &CreateSchemaStmt<'_>) -> Result<StatementResult> {
    let name = stmt.name.to_lowercase();
    if stmt.if_not_exists && tx.kernel_ref().check_schema(&name) {
        return Ok(StatementResult::default());
    }
    tx.kernel().create_schema(&name)?;
    Ok(StatementResult::default())
}

pub fn create_index(tx: &mut Tx, stmt: &CreateIndexStmt<'_>) -> Result<StatementResult> {
    let schema = stmt
        .table
        .schema
        .map(str::to_lowercase)
        .unwrap_or_default();
    let relation = stmt.table.name.to_lowercase();
    let name = stmt.name.to_lowercase();
    let columns: Vec<String> = stmt.columns.iter().map(|c| c.to_lowercase()).collect();

    let index_type = match stmt.index_kind {
        IndexKind::Hash => IndexType::Hash,
        IndexKind::BTree => IndexType::BTree,
    };

    tx.kernel()
        .create_index(&schema, &relation, &name, index_type, &columns)?;
    Ok(StatementResult::default())
}

pub fn drop(tx: &mut Tx, stmt: &DropStmt<'_>) -> Result<StatementResult> {
    match stmt.object {
        ObjectType::Table => {
            let schema = stmt.schema.map(str::to_lowercase).unwrap_or_default();
            let name = stmt.name.to_lowercase();
            let exists = tx.kernel_ref().check_relation(&schema, &name);
            if !exists {
                if stmt.if_exists {
                    return Ok(StatementResult::default());
                }
                bail!("relation {} does not exist", name);
            }
            tx.kernel().drop_relation(&schema, &name)?;
            Ok(StatementResult::affected(1))
        }
        ObjectType::Schema => {
            let name = stmt.name.to_lowercase();
            if stmt.if_exists && !tx.kernel_ref().check_schema(&name) {
                return Ok(StatementResult::default());
            }
            tx.kernel().drop_schema(&name)?;
            Ok(StatementResult::affected(1))
        }
    }
}

pub fn truncate(tx: &mut Tx, stmt: &TruncateStmt<'_>) -> Result<StatementResult> {
    let schema = stmt
        .table
        .schema
        .map(str::to_lowercase)
        .unwrap_or_default();
    let relation = stmt.table.name.to_lowercase();
    let removed = tx.kernel().truncate(&schema, &relation)?;
    Ok(StatementResult::affected(removed as i64))
}
