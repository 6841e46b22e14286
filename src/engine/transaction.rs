//! # Transactions and the Undo Log
//!
//! A [`Transaction`] owns the engine lock for its whole life and records an
//! inverse operation for every mutation it applies. `commit` discards the
//! log; `rollback` (and `Drop` without commit) replays it in reverse,
//! restoring the engine to its state at `begin` — including row order,
//! dropped relations and schemas, truncated rows, and sequence counters.
//!
//! ## Kernel Operations
//!
//! All storage operations live here: relation/schema lifecycle, tuple
//! mutation with constraint enforcement, and the query pipeline that wires
//! scanners, joiners, sorters, and selectors together.
//!
//! Every mutating path appends its undo record immediately after the
//! mutation succeeds, so a statement that fails midway can be unwound with
//! [`Transaction::rollback_to`] without touching the rest of the
//! transaction.
//!
//! ## Insert Pipeline
//!
//! 1. order the supplied column values by attribute order, coercing each to
//!    its column type
//! 2. fill unspecified columns from defaults (constant or `now()` thunk)
//!    and the auto-increment sequence
//! 3. NOT NULL on primary-key columns, PK/UNIQUE probes, FK existence
//! 4. append the row, updating every index, and log the undo

use super::{resolve_schema, EngineState};
use crate::config::{BASE_TABLE_TYPE, INFORMATION_SCHEMA, INFORMATION_SCHEMA_TABLES};
use crate::constraints;
use crate::parsing::literal::now_micros;
use crate::plan::{self, Columns, Joiner, Predicate, RelationScanner, Selector, Sorter, Source};
use crate::schema::{
    Attribute, DefaultValue, IndexType, Relation, RowId, Schema, Tuple,
};
use crate::types::Value;
use eyre::{bail, Result};
use hashbrown::HashMap;
use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::RawMutex;
use tracing::debug;

/// Inverse of one applied mutation. Replayed in reverse order on rollback.
#[derive(Debug)]
pub enum UndoRecord {
    InsertTuple {
        schema: String,
        relation: String,
        row: RowId,
    },
    UpdateTuple {
        schema: String,
        relation: String,
        row: RowId,
        old: Vec<Value>,
    },
    DeleteTuple {
        schema: String,
        relation: String,
        row: RowId,
        values: Vec<Value>,
    },
    Truncate {
        schema: String,
        relation: String,
        rows: Vec<(RowId, Tuple)>,
        sequence: i64,
    },
    CreateRelation {
        schema: String,
        relation: String,
    },
    DropRelation {
        schema: String,
        relation: Box<Relation>,
    },
    CreateSchema {
        name: String,
    },
    DropSchema {
        schema: Box<Schema>,
    },
    CreateIndex {
        schema: String,
        relation: String,
        index: String,
    },
}

/// A coarse-locked, undoable unit of work over the engine.
pub struct Transaction {
    db_name: String,
    state: ArcMutexGuard<RawMutex, EngineState>,
    log: Vec<UndoRecord>,
    finished: bool,
}

impl Transaction {
    pub(crate) fn new(db_name: String, state: ArcMutexGuard<RawMutex, EngineState>) -> Self {
        Self {
            db_name,
            state,
            log: Vec::new(),
            finished: false,
        }
    }

    /// Database name, for `CURRENT_DATABASE()`.
    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    /// Head of the search path, for `CURRENT_SCHEMA()`.
    pub fn current_schema(&self) -> &str {
        self.state.current_schema()
    }

    pub fn check_schema(&self, name: &str) -> bool {
        self.state.has_schema(name)
    }

    pub fn check_relation(&self, schema: &str, name: &str) -> bool {
        self.state
            .schema(schema)
            .map(|s| s.contains(name))
            .unwrap_or(false)
    }

    /// Resolves a column to its slot and metadata.
    pub fn relation_attribute(
        &self,
        schema: &str,
        relation: &str,
        column: &str,
    ) -> Result<(usize, Attribute)> {
        let rel = self.state.relation(resolve_schema(schema), relation)?;
        let (i, attr) = rel.attribute(column)?;
        Ok((i, attr.clone()))
    }

    /// Attribute names of a relation, in order.
    pub fn relation_columns(&self, schema: &str, relation: &str) -> Result<Vec<String>> {
        let rel = self.state.relation(resolve_schema(schema), relation)?;
        Ok(rel
            .attributes()
            .iter()
            .map(|a| a.name().to_string())
            .collect())
    }

    // ------------------------------------------------------------------
    // DDL
    // ------------------------------------------------------------------

    pub fn create_schema(&mut self, name: &str) -> Result<()> {
        if self.state.has_schema(name) {
            bail!("schema {} already exists", name);
        }
        self.state.add_schema(Schema::new(name));
        self.log.push(UndoRecord::CreateSchema {
            name: name.to_string(),
        });
        Ok(())
    }

    pub fn drop_schema(&mut self, name: &str) -> Result<()> {
        {
            let schema = self.state.schema(name)?;
            if !schema.is_empty() {
                bail!("schema {} is not empty", name);
            }
        }
        if let Some(schema) = self.state.remove_schema(name) {
            self.log.push(UndoRecord::DropSchema {
                schema: Box::new(schema),
            });
        }
        Ok(())
    }

    pub fn create_relation(
        &mut self,
        schema: &str,
        name: &str,
        attributes: Vec<Attribute>,
        pk: &[String],
    ) -> Result<()> {
        let schema = resolve_schema(schema).to_string();
        {
            let s = self.state.schema(&schema)?;
            if s.contains(name) {
                bail!("relation already exists");
            }
        }

        let relation = Relation::new(schema.clone(), name, attributes, pk)?;
        self.state.schema_mut(&schema)?.add(relation);
        self.log.push(UndoRecord::CreateRelation {
            schema: schema.clone(),
            relation: name.to_string(),
        });
        debug!(schema = %schema, relation = name, "created relation");

        if schema != INFORMATION_SCHEMA {
            self.catalog_insert(&schema, name)?;
        }
        Ok(())
    }

    pub fn drop_relation(&mut self, schema: &str, name: &str) -> Result<()> {
        let schema = resolve_schema(schema).to_string();
        {
            let target = self.state.relation(&schema, name)?;
            for (child_schema, child_name, _) in
                constraints::referencing_foreign_keys(&self.state, &schema, target)
            {
                if child_schema == schema && child_name == name {
                    continue;
                }
                bail!(
                    "cannot drop relation {}: referenced by foreign key on {}.{}",
                    name,
                    child_schema,
                    child_name
                );
            }
        }

        let relation = self.state.schema_mut(&schema)?.remove(name)?;
        self.log.push(UndoRecord::DropRelation {
            schema: schema.clone(),
            relation: Box::new(relation),
        });

        if schema != INFORMATION_SCHEMA {
            self.catalog_remove(&schema, name)?;
        }
        Ok(())
    }

    pub fn truncate(&mut self, schema: &str, name: &str) -> Result<u64> {
        let schema = resolve_schema(schema).to_string();
        let rel = self.state.relation_mut(&schema, name)?;
        let sequence = rel.sequence();
        let rows = rel.truncate();
        let count = rows.len() as u64;
        self.log.push(UndoRecord::Truncate {
            schema,
            relation: name.to_string(),
            rows,
            sequence,
        });
        Ok(count)
    }

    pub fn create_index(
        &mut self,
        schema: &str,
        relation: &str,
        name: &str,
        index_type: IndexType,
        columns: &[String],
    ) -> Result<()> {
        if index_type == IndexType::BTree {
            bail!("not implemented: btree indexes");
        }
        let schema = resolve_schema(schema).to_string();
        let rel = self.state.relation_mut(&schema, relation)?;
        rel.create_index(name, columns)?;
        self.log.push(UndoRecord::CreateIndex {
            schema,
            relation: relation.to_string(),
            index: name.to_string(),
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // DML
    // ------------------------------------------------------------------

    /// Inserts one row from a column→value map and returns the stored tuple.
    pub fn insert(
        &mut self,
        schema: &str,
        relation: &str,
        values: &HashMap<String, Value>,
    ) -> Result<Tuple> {
        let schema = resolve_schema(schema).to_string();

        let (mut ordered, auto_slots) = {
            let rel = self.state.relation(&schema, relation)?;
            for column in values.keys() {
                rel.attribute(column)?;
            }

            let mut ordered = Vec::with_capacity(rel.attributes().len());
            let mut auto_slots = Vec::new();
            for (i, attr) in rel.attributes().iter().enumerate() {
                match values.get(attr.name()) {
                    Some(v) => ordered.push(v.coerce_to(attr.data_type())?),
                    None => {
                        if attr.auto_increment() {
                            auto_slots.push(i);
                            ordered.push(Value::Null);
                        } else if let Some(default) = attr.default() {
                            ordered.push(match default {
                                DefaultValue::Const(v) => v.coerce_to(attr.data_type())?,
                                DefaultValue::Now => Value::Timestamp(now_micros())
                                    .coerce_to(attr.data_type())?,
                            });
                        } else {
                            ordered.push(Value::Null);
                        }
                    }
                }
            }
            (ordered, auto_slots)
        };

        if !auto_slots.is_empty() {
            let rel = self.state.relation_mut(&schema, relation)?;
            for i in auto_slots {
                ordered[i] = Value::Int(rel.next_sequence());
            }
        }

        {
            let rel = self.state.relation(&schema, relation)?;
            constraints::check_not_null(rel, &ordered)?;
            constraints::check_unique(rel, &ordered)?;
            constraints::check_foreign_keys(&self.state, &schema, rel, &ordered)?;
        }

        let rel = self.state.relation_mut(&schema, relation)?;
        let row = rel.insert_row(ordered.clone());
        self.log.push(UndoRecord::InsertTuple {
            schema,
            relation: relation.to_string(),
            row,
        });
        Ok(Tuple::from_values(ordered))
    }

    /// Updates every row matching `predicate` with the assignments in
    /// `set`, returning the projected updated rows.
    pub fn update(
        &mut self,
        schema: &str,
        relation: &str,
        set: &HashMap<String, Value>,
        selectors: &[Selector],
        predicate: Predicate,
    ) -> Result<(Vec<String>, Vec<Tuple>)> {
        let schema = resolve_schema(schema).to_string();

        let (cols, planned) = {
            let rel = self.state.relation(&schema, relation)?;
            let scanner = RelationScanner::new(Source::Relation(rel), vec![predicate]);
            let (cols, rows) = scanner.exec()?;

            let mut planned = Vec::with_capacity(rows.len());
            for row in rows {
                let mut new_values = row.tuple.values().to_vec();
                let mut changed = Vec::new();
                for (column, value) in set {
                    let (i, attr) = rel.attribute(column)?;
                    let coerced = value.coerce_to(attr.data_type())?;
                    if coerced != new_values[i] {
                        changed.push(i);
                    }
                    new_values[i] = coerced;
                }

                constraints::check_foreign_keys(&self.state, &schema, rel, &new_values)?;
                constraints::check_restrict(
                    &self.state,
                    &schema,
                    rel,
                    row.tuple.values(),
                    Some(&changed),
                )?;
                planned.push((row.id, new_values));
            }
            (cols, planned)
        };

        let mut updated = Vec::with_capacity(planned.len());
        let rel = self.state.relation_mut(&schema, relation)?;
        for (id, new_values) in planned {
            if let Some(old) = rel.update_row(id, new_values.clone()) {
                self.log.push(UndoRecord::UpdateTuple {
                    schema: schema.clone(),
                    relation: relation.to_string(),
                    row: id,
                    old: old.into_values(),
                });
                updated.push(Tuple::from_values(new_values));
            }
        }
        debug!(schema = %schema, relation, rows = updated.len(), "update applied");

        if selectors.is_empty() {
            Ok((Vec::new(), updated))
        } else {
            plan::select::project(selectors, &cols, &updated)
        }
    }

    /// Deletes every row matching `predicate`, enforcing RESTRICT on
    /// referencing children. Returns the removed rows.
    pub fn delete(
        &mut self,
        schema: &str,
        relation: &str,
        selectors: &[Selector],
        predicate: Predicate,
    ) -> Result<(Vec<String>, Vec<Tuple>)> {
        let schema = resolve_schema(schema).to_string();

        let (cols, doomed) = {
            let rel = self.state.relation(&schema, relation)?;
            let scanner = RelationScanner::new(Source::Relation(rel), vec![predicate]);
            let (cols, rows) = scanner.exec()?;
            for row in &rows {
                constraints::check_restrict(&self.state, &schema, rel, row.tuple.values(), None)?;
            }
            (cols, rows)
        };

        let mut removed = Vec::with_capacity(doomed.len());
        let rel = self.state.relation_mut(&schema, relation)?;
        for row in doomed {
            if let Some(tuple) = rel.remove_row(row.id) {
                self.log.push(UndoRecord::DeleteTuple {
                    schema: schema.clone(),
                    relation: relation.to_string(),
                    row: row.id,
                    values: tuple.values().to_vec(),
                });
                removed.push(tuple);
            }
        }
        debug!(schema = %schema, relation, rows = removed.len(), "delete applied");

        if selectors.is_empty() {
            Ok((Vec::new(), removed))
        } else {
            plan::select::project(selectors, &cols, &removed)
        }
    }

    /// Runs a read-only query pipeline: scan (or single row) → joins →
    /// sorters → projection.
    pub fn query(
        &self,
        schema: &str,
        selectors: &[Selector],
        predicate: Predicate,
        joiners: &[Joiner],
        sorters: &[Sorter],
    ) -> Result<(Vec<String>, Vec<Tuple>)> {
        let schema = resolve_schema(schema);

        let base = selectors.iter().find_map(Selector::relation);
        let Some(base) = base else {
            let scanner = RelationScanner::new(Source::SingleRow, vec![predicate]);
            let (cols, rows) = scanner.exec()?;
            let tuples: Vec<Tuple> = rows.into_iter().map(|r| r.tuple).collect();
            return plan::select::project(selectors, &cols, &tuples);
        };

        let rel = self.state.relation(schema, base)?;
        let scanner = RelationScanner::new(Source::Relation(rel), vec![predicate]);
        let (mut cols, rows) = scanner.exec()?;
        let mut tuples: Vec<Tuple> = rows.into_iter().map(|r| r.tuple).collect();

        for joiner in joiners {
            let right = self.state.relation(schema, joiner.right_relation())?;
            let right_cols = Columns::from_relation(right);
            let right_rows: Vec<Tuple> = right.rows().map(|(_, t)| t.clone()).collect();
            let (joined_cols, joined_rows) = joiner.exec(&cols, tuples, &right_cols, right_rows)?;
            cols = joined_cols;
            tuples = joined_rows;
        }

        let tuples = plan::sort::apply(sorters, &cols, tuples)?;
        plan::select::project(selectors, &cols, &tuples)
    }

    /// Probes the primary key with the given column values; true means an
    /// existing row already carries that key.
    pub fn check_primary_key_conflict(
        &self,
        schema: &str,
        relation: &str,
        values: &HashMap<String, Value>,
    ) -> Result<bool> {
        let rel = self.state.relation(resolve_schema(schema), relation)?;
        if rel.pk_indices().is_empty() {
            return Ok(false);
        }

        let mut probe = vec![Value::Null; rel.attributes().len()];
        for &i in rel.pk_indices() {
            let attr = &rel.attributes()[i];
            match values.get(attr.name()) {
                Some(v) => probe[i] = v.coerce_to(attr.data_type())?,
                None => return Ok(false),
            }
        }
        Ok(rel.pk_conflict(&probe))
    }

    // ------------------------------------------------------------------
    // Transaction lifecycle
    // ------------------------------------------------------------------

    /// Number of undo records so far; pair with [`Transaction::rollback_to`]
    /// to unwind a single failed statement.
    pub fn log_mark(&self) -> usize {
        self.log.len()
    }

    /// Unwinds every mutation recorded after `mark`, in reverse order.
    pub fn rollback_to(&mut self, mark: usize) {
        while self.log.len() > mark {
            if let Some(record) = self.log.pop() {
                apply_undo(&mut self.state, record);
            }
        }
    }

    /// Makes the transaction's mutations permanent and releases the engine
    /// lock.
    pub fn commit(mut self) -> Result<()> {
        self.log.clear();
        self.finished = true;
        Ok(())
    }

    /// Reverts every mutation of this transaction and releases the engine
    /// lock. Never fails.
    pub fn rollback(mut self) {
        self.rollback_to(0);
        self.finished = true;
    }

    fn catalog_insert(&mut self, schema: &str, relation: &str) -> Result<()> {
        let info = self
            .state
            .relation_mut(INFORMATION_SCHEMA, INFORMATION_SCHEMA_TABLES)?;
        let row = info.insert_row(vec![
            Value::Text(schema.to_string()),
            Value::Text(relation.to_string()),
            Value::Text(BASE_TABLE_TYPE.to_string()),
        ]);
        self.log.push(UndoRecord::InsertTuple {
            schema: INFORMATION_SCHEMA.to_string(),
            relation: INFORMATION_SCHEMA_TABLES.to_string(),
            row,
        });
        Ok(())
    }

    fn catalog_remove(&mut self, schema: &str, relation: &str) -> Result<()> {
        let info = self
            .state
            .relation_mut(INFORMATION_SCHEMA, INFORMATION_SCHEMA_TABLES)?;
        let target: Vec<RowId> = info
            .rows()
            .filter(|(_, t)| {
                t.get(0).and_then(Value::as_text) == Some(schema)
                    && t.get(1).and_then(Value::as_text) == Some(relation)
            })
            .map(|(id, _)| id)
            .collect();
        for id in target {
            if let Some(tuple) = info.remove_row(id) {
                self.log.push(UndoRecord::DeleteTuple {
                    schema: INFORMATION_SCHEMA.to_string(),
                    relation: INFORMATION_SCHEMA_TABLES.to_string(),
                    row: id,
                    values: tuple.into_values(),
                });
            }
        }
        Ok(())
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.finished {
            self.rollback_to(0);
        }
    }
}

fn apply_undo(state: &mut EngineState, record: UndoRecord) {
    match record {
        UndoRecord::InsertTuple {
            schema,
            relation,
            row,
        } => {
            if let Ok(rel) = state.relation_mut(&schema, &relation) {
                rel.remove_row(row);
            }
        }
        UndoRecord::UpdateTuple {
            schema,
            relation,
            row,
            old,
        } => {
            if let Ok(rel) = state.relation_mut(&schema, &relation) {
                rel.update_row(row, old);
            }
        }
        UndoRecord::DeleteTuple {
            schema,
            relation,
            row,
            values,
        } => {
            if let Ok(rel) = state.relation_mut(&schema, &relation) {
                rel.restore_row(row, values);
            }
        }
        UndoRecord::Truncate {
            schema,
            relation,
            rows,
            sequence,
        } => {
            if let Ok(rel) = state.relation_mut(&schema, &relation) {
                rel.restore_rows(rows);
                rel.set_sequence(sequence);
            }
        }
        UndoRecord::CreateRelation { schema, relation } => {
            if let Ok(s) = state.schema_mut(&schema) {
                let _ = s.remove(&relation);
            }
        }
        UndoRecord::DropRelation { schema, relation } => {
            if let Ok(s) = state.schema_mut(&schema) {
                s.add(*relation);
            }
        }
        UndoRecord::CreateSchema { name } => {
            state.remove_schema(&name);
        }
        UndoRecord::DropSchema { schema } => {
            state.add_schema(*schema);
        }
        UndoRecord::CreateIndex {
            schema,
            relation,
            index,
        } => {
            if let Ok(rel) = state.relation_mut(&schema, &relation) {
                rel.drop_index(&index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::types::DataType;

    fn value_map(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn users_tx(engine: &Engine) -> Transaction {
        let mut tx = engine.begin();
        tx.create_relation(
            "",
            "users",
            vec![
                Attribute::new("id", DataType::BigSerial),
                Attribute::new("name", DataType::Text),
            ],
            &["id".to_string()],
        )
        .unwrap();
        tx
    }

    #[test]
    fn insert_applies_auto_increment_and_defaults() {
        let engine = Engine::new("t");
        let mut tx = users_tx(&engine);

        let t1 = tx
            .insert("", "users", &value_map(&[("name", Value::from("ada"))]))
            .unwrap();
        let t2 = tx
            .insert("", "users", &value_map(&[("name", Value::from("bob"))]))
            .unwrap();
        assert_eq!(t1.get(0), Some(&Value::Int(1)));
        assert_eq!(t2.get(0), Some(&Value::Int(2)));
    }

    #[test]
    fn insert_unknown_column_is_rejected() {
        let engine = Engine::new("t");
        let mut tx = users_tx(&engine);
        let err = tx
            .insert("", "users", &value_map(&[("nope", Value::Int(1))]))
            .unwrap_err();
        assert!(err.to_string().contains("column \"nope\" does not exist"));
    }

    #[test]
    fn duplicate_pk_is_a_unique_violation() {
        let engine = Engine::new("t");
        let mut tx = users_tx(&engine);
        tx.insert(
            "",
            "users",
            &value_map(&[("id", Value::Int(7)), ("name", Value::from("a"))]),
        )
        .unwrap();
        let err = tx
            .insert(
                "",
                "users",
                &value_map(&[("id", Value::Int(7)), ("name", Value::from("b"))]),
            )
            .unwrap_err();
        assert!(err.to_string().contains("unique constraint violation"));
    }

    #[test]
    fn rollback_restores_rows_relations_and_catalog() {
        let engine = Engine::new("t");
        {
            let mut tx = engine.begin();
            tx.create_relation(
                "",
                "keep",
                vec![Attribute::new("id", DataType::BigInt)],
                &["id".to_string()],
            )
            .unwrap();
            tx.insert("", "keep", &value_map(&[("id", Value::Int(1))]))
                .unwrap();
            tx.commit().unwrap();
        }

        {
            let mut tx = engine.begin();
            tx.insert("", "keep", &value_map(&[("id", Value::Int(2))]))
                .unwrap();
            tx.create_relation("", "gone", vec![Attribute::new("x", DataType::Int)], &[])
                .unwrap();
            tx.rollback();
        }

        let tx = engine.begin();
        assert!(!tx.check_relation("", "gone"));
        let (_, rows) = tx
            .query(
                "",
                &[Selector::Star {
                    relation: "keep".into(),
                }],
                Predicate::True,
                &[],
                &[],
            )
            .unwrap();
        assert_eq!(rows.len(), 1);

        // The catalog only lists the surviving relation.
        let (_, rows) = tx
            .query(
                INFORMATION_SCHEMA,
                &[Selector::Star {
                    relation: INFORMATION_SCHEMA_TABLES.into(),
                }],
                Predicate::True,
                &[],
                &[],
            )
            .unwrap();
        let names: Vec<&str> = rows
            .iter()
            .filter_map(|r| r.get(1).and_then(Value::as_text))
            .collect();
        assert!(names.contains(&"keep"));
        assert!(!names.contains(&"gone"));
    }

    #[test]
    fn rollback_restores_truncated_rows_and_sequence() {
        let engine = Engine::new("t");
        let mut tx = users_tx(&engine);
        tx.insert("", "users", &value_map(&[("name", Value::from("a"))]))
            .unwrap();
        tx.insert("", "users", &value_map(&[("name", Value::from("b"))]))
            .unwrap();

        let mark = tx.log_mark();
        assert_eq!(tx.truncate("", "users").unwrap(), 2);
        assert_eq!(tx.truncate("", "users").unwrap(), 0);
        tx.rollback_to(mark);

        let (_, rows) = tx
            .query(
                "",
                &[Selector::Star {
                    relation: "users".into(),
                }],
                Predicate::True,
                &[],
                &[],
            )
            .unwrap();
        assert_eq!(rows.len(), 2);

        // Sequence resumes after the restored rows.
        let t3 = tx
            .insert("", "users", &value_map(&[("name", Value::from("c"))]))
            .unwrap();
        assert_eq!(t3.get(0), Some(&Value::Int(3)));
    }

    #[test]
    fn drop_relation_referenced_by_fk_is_rejected() {
        let engine = Engine::new("t");
        let mut tx = users_tx(&engine);
        let fk = crate::schema::ForeignKey::new(None)
            .with_local_column("user_id")
            .with_ref_relation("users")
            .with_ref_column("id");
        tx.create_relation(
            "",
            "posts",
            vec![
                Attribute::new("id", DataType::BigSerial),
                Attribute::new("user_id", DataType::BigInt).with_foreign_key(fk),
            ],
            &["id".to_string()],
        )
        .unwrap();

        let err = tx.drop_relation("", "users").unwrap_err();
        assert!(err.to_string().contains("referenced by foreign key"));

        tx.drop_relation("", "posts").unwrap();
        tx.drop_relation("", "users").unwrap();
    }

    #[test]
    fn query_without_from_emits_one_row() {
        let engine = Engine::new("mydb");
        let tx = engine.begin();
        let (cols, rows) = tx
            .query(
                "",
                &[Selector::Const {
                    relation: None,
                    value: Value::Int(1),
                    label: "1".into(),
                }],
                Predicate::True,
                &[],
                &[],
            )
            .unwrap();
        assert_eq!(cols, vec!["1"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(0), Some(&Value::Int(1)));
    }

    #[test]
    fn dropped_transaction_rolls_back() {
        let engine = Engine::new("t");
        {
            let mut tx = engine.begin();
            tx.create_relation("", "temp", vec![Attribute::new("x", DataType::Int)], &[])
                .unwrap();
            // No commit: dropping the guard must undo the DDL.
        }
        let tx = engine.begin();
        assert!(!tx.check_relation("", "temp"));
    }
}
