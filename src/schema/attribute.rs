//! # Attribute and Foreign-Key Metadata
//!
//! Column metadata for relations: name, canonical type, auto-increment,
//! default value, uniqueness, and an optional foreign-key definition.
//!
//! Both `Attribute` and `ForeignKey` use a consuming builder style so DDL
//! lowering reads as a chain of `with_*` calls.
//!
//! ## Foreign Keys
//!
//! A `ForeignKey` covers both column-level (`REFERENCES t(c)`, one local
//! column) and table-level (`FOREIGN KEY (a, b) REFERENCES t (x, y)`,
//! composite) constraints. Table-level definitions are distributed onto each
//! local attribute; [`ForeignKey::signature`] lets the relation derive the
//! deduplicated set back out when creating FK indexes.
//!
//! Empty `ref_columns` means "reference the parent's primary key".

use crate::types::{DataType, Value};

/// Default value of a column: a constant, or a thunk resolved at insert time.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Const(Value),
    /// `DEFAULT now()` / `DEFAULT LOCALTIMESTAMP`: wall clock at insert.
    Now,
}

/// A foreign-key constraint attached to its local attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    name: Option<String>,
    local_columns: Vec<String>,
    ref_schema: Option<String>,
    ref_relation: String,
    ref_columns: Vec<String>,
}

impl ForeignKey {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            local_columns: Vec::new(),
            ref_schema: None,
            ref_relation: String::new(),
            ref_columns: Vec::new(),
        }
    }

    pub fn with_local_column(mut self, column: impl Into<String>) -> Self {
        self.local_columns.push(column.into());
        self
    }

    pub fn with_ref_schema(mut self, schema: impl Into<String>) -> Self {
        self.ref_schema = Some(schema.into());
        self
    }

    pub fn with_ref_relation(mut self, relation: impl Into<String>) -> Self {
        self.ref_relation = relation.into();
        self
    }

    pub fn with_ref_column(mut self, column: impl Into<String>) -> Self {
        self.ref_columns.push(column.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn local_columns(&self) -> &[String] {
        &self.local_columns
    }

    /// Referenced schema; `None` means the child's own schema.
    pub fn ref_schema(&self) -> Option<&str> {
        self.ref_schema.as_deref()
    }

    pub fn ref_relation(&self) -> &str {
        &self.ref_relation
    }

    /// Referenced columns; empty means the parent's primary key.
    pub fn ref_columns(&self) -> &[String] {
        &self.ref_columns
    }

    /// Dedup key over (ref_schema, ref_relation, local_cols, ref_cols).
    pub fn signature(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.ref_schema.as_deref().unwrap_or(""),
            self.ref_relation,
            self.local_columns.join(","),
            self.ref_columns.join(","),
        )
    }
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    name: String,
    data_type: DataType,
    auto_increment: bool,
    default: Option<DefaultValue>,
    unique: bool,
    not_null: bool,
    fk: Option<ForeignKey>,
}

impl Attribute {
    /// Creates an attribute. `BIGSERIAL` columns come out auto-incrementing.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            auto_increment: data_type.is_serial(),
            default: None,
            unique: false,
            not_null: false,
            fk: None,
        }
    }

    pub fn with_auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn with_default_const(mut self, value: Value) -> Self {
        self.default = Some(DefaultValue::Const(value));
        self
    }

    pub fn with_default_now(mut self) -> Self {
        self.default = Some(DefaultValue::Now);
        self
    }

    pub fn with_unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn with_not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn with_foreign_key(mut self, fk: ForeignKey) -> Self {
        self.fk = Some(fk);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn auto_increment(&self) -> bool {
        self.auto_increment
    }

    pub fn default(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    pub fn unique(&self) -> bool {
        self.unique
    }

    pub fn not_null(&self) -> bool {
        self.not_null
    }

    pub fn foreign_key(&self) -> Option<&ForeignKey> {
        self.fk.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bigserial_implies_auto_increment() {
        let attr = Attribute::new("id", DataType::BigSerial);
        assert!(attr.auto_increment());
        assert!(!Attribute::new("id", DataType::BigInt).auto_increment());
    }

    #[test]
    fn foreign_key_signature_dedups_by_shape() {
        let a = ForeignKey::new(Some("fk_a".into()))
            .with_local_column("x")
            .with_ref_relation("parent")
            .with_ref_column("id");
        let b = ForeignKey::new(Some("fk_b".into()))
            .with_local_column("x")
            .with_ref_relation("parent")
            .with_ref_column("id");
        // Name is not part of the identity.
        assert_eq!(a.signature(), b.signature());

        let c = ForeignKey::new(None)
            .with_local_column("y")
            .with_ref_relation("parent")
            .with_ref_column("id");
        assert_ne!(a.signature(), c.signature());
    }
}
