//! # SQL Abstract Syntax Tree
//!
//! AST types produced by the SQL parser. All nodes are arena-allocated in a
//! bumpalo arena, with string slices borrowing directly from the input for
//! zero-copy parsing.
//!
//! ## Statement Types
//!
//! The top-level `Statement` enum covers every supported statement:
//!
//! - **DML**: SELECT, INSERT (with ON CONFLICT and RETURNING), UPDATE, DELETE
//! - **DDL**: CREATE TABLE / SCHEMA / INDEX, DROP TABLE / SCHEMA, TRUNCATE
//! - **Compatibility**: GRANT (accepted, executes as a no-op)
//!
//! Each statement gets its own strongly typed node; the shapes are the
//! contract between the parser and the executor.
//!
//! ## Expressions
//!
//! `Expr` covers the predicate and value grammar of the dialect: literals,
//! column references, bind parameters, binary arithmetic and boolean
//! operators, `IS [NOT] NULL`, scalar and tuple `[NOT] IN`, the builtin
//! functions (`COUNT`, `NOW`, `CURRENT_SCHEMA`, `CURRENT_DATABASE`), and the
//! `DEFAULT` placeholder inside `VALUES`.
//!
//! ## Memory Layout
//!
//! Arena-allocated nodes use `&'a T` for children:
//!
//! ```text
//! Statement<'a>
//!     └── SelectStmt<'a>
//!             ├── columns: &'a [SelectColumn<'a>]
//!             ├── from: &'a [TableRef<'a>]
//!             ├── joins: &'a [JoinClause<'a>]
//!             └── where_clause: Option<&'a Expr<'a>>
//! ```

use super::token::Parameter;
use crate::types::DataType;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Statement<'a> {
    Select(&'a SelectStmt<'a>),
    Insert(&'a InsertStmt<'a>),
    Update(&'a UpdateStmt<'a>),
    Delete(&'a DeleteStmt<'a>),
    CreateTable(&'a CreateTableStmt<'a>),
    CreateSchema(&'a CreateSchemaStmt<'a>),
    CreateIndex(&'a CreateIndexStmt<'a>),
    Drop(&'a DropStmt<'a>),
    Truncate(&'a TruncateStmt<'a>),
    Grant,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectStmt<'a> {
    pub distinct: Distinct<'a>,
    pub columns: &'a [SelectColumn<'a>],
    pub from: &'a [TableRef<'a>],
    pub joins: &'a [JoinClause<'a>],
    pub where_clause: Option<&'a Expr<'a>>,
    pub order_by: &'a [OrderByItem<'a>],
    pub limit: Option<&'a Expr<'a>>,
    pub offset: Option<&'a Expr<'a>>,
    pub for_update: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distinct<'a> {
    /// Plain SELECT.
    All,
    /// SELECT DISTINCT, deduplicating on the first projected column.
    Rows,
    /// SELECT DISTINCT ON (cols).
    On(&'a [ColumnRef<'a>]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectColumn<'a> {
    /// `*`
    AllColumns,
    Expr {
        expr: &'a Expr<'a>,
        alias: Option<&'a str>,
    },
}

/// A `[schema.]name [AS alias]` table reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableRef<'a> {
    pub schema: Option<&'a str>,
    pub name: &'a str,
    pub alias: Option<&'a str>,
}

/// An equi-join clause: `JOIN table ON left = right`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinClause<'a> {
    pub table: TableRef<'a>,
    pub left: ColumnRef<'a>,
    pub right: ColumnRef<'a>,
}

/// A possibly table-qualified column reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnRef<'a> {
    pub table: Option<&'a str>,
    pub column: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderByItem<'a> {
    pub column: ColumnRef<'a>,
    pub direction: OrderDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsertStmt<'a> {
    pub table: TableRef<'a>,
    pub columns: &'a [&'a str],
    pub values: &'a [&'a [&'a Expr<'a>]],
    pub on_conflict: Option<&'a OnConflict<'a>>,
    pub returning: Option<ColumnRef<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnConflict<'a> {
    pub targets: &'a [&'a str],
    pub action: OnConflictAction<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OnConflictAction<'a> {
    DoNothing,
    DoUpdate(&'a [Assignment<'a>]),
}

/// A `col = expr` assignment in SET clauses. The expression may reference
/// `excluded.col` inside ON CONFLICT DO UPDATE.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment<'a> {
    pub column: &'a str,
    pub value: &'a Expr<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateStmt<'a> {
    pub table: TableRef<'a>,
    pub assignments: &'a [Assignment<'a>],
    pub where_clause: Option<&'a Expr<'a>>,
    pub returning: Option<ColumnRef<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeleteStmt<'a> {
    pub table: TableRef<'a>,
    pub where_clause: Option<&'a Expr<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreateTableStmt<'a> {
    pub if_not_exists: bool,
    pub table: TableRef<'a>,
    pub columns: &'a [ColumnDef<'a>],
    pub constraints: &'a [TableConstraint<'a>],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnDef<'a> {
    pub name: &'a str,
    pub data_type: DataType,
    pub constraints: &'a [ColumnConstraint<'a>],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnConstraint<'a> {
    PrimaryKey,
    Unique,
    NotNull,
    AutoIncrement,
    Default(&'a Expr<'a>),
    References {
        constraint: Option<&'a str>,
        schema: Option<&'a str>,
        table: &'a str,
        column: Option<&'a str>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TableConstraint<'a> {
    PrimaryKey {
        columns: &'a [&'a str],
    },
    ForeignKey {
        constraint: Option<&'a str>,
        columns: &'a [&'a str],
        ref_schema: Option<&'a str>,
        ref_table: &'a str,
        ref_columns: &'a [&'a str],
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreateSchemaStmt<'a> {
    pub if_not_exists: bool,
    pub name: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreateIndexStmt<'a> {
    pub if_not_exists: bool,
    pub unique: bool,
    pub name: &'a str,
    pub table: TableRef<'a>,
    pub index_kind: IndexKind,
    pub columns: &'a [&'a str],
}

/// Index access methods the grammar accepts. Only hash indexes execute;
/// btree is declared capability that the kernel rejects as unimplemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Hash,
    BTree,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropStmt<'a> {
    pub object: ObjectType,
    pub if_exists: bool,
    pub schema: Option<&'a str>,
    pub name: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Table,
    Schema,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruncateStmt<'a> {
    pub table: TableRef<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'a> {
    Literal(Literal<'a>),
    Column(ColumnRef<'a>),
    Parameter(Parameter<'a>),
    Binary {
        left: &'a Expr<'a>,
        op: BinaryOperator,
        right: &'a Expr<'a>,
    },
    IsNull {
        expr: &'a Expr<'a>,
        negated: bool,
    },
    InList {
        expr: &'a Expr<'a>,
        negated: bool,
        list: &'a [&'a Expr<'a>],
    },
    /// `(c1, c2) IN ((v1, v2), ...)`
    TupleIn {
        exprs: &'a [&'a Expr<'a>],
        negated: bool,
        rows: &'a [&'a [&'a Expr<'a>]],
    },
    Function(FunctionCall<'a>),
    /// The DEFAULT placeholder inside INSERT VALUES.
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal<'a> {
    Null,
    Boolean(bool),
    Integer(&'a str),
    Float(&'a str),
    String(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FunctionCall<'a> {
    Count(CountArg<'a>),
    Now,
    CurrentSchema,
    CurrentDatabase,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CountArg<'a> {
    Star,
    Column(ColumnRef<'a>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    Plus,
    Minus,
    Multiply,
    Divide,
}

impl BinaryOperator {
    /// True for `AND`/`OR`.
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }

    /// True for the six comparison operators.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOperator::Eq
                | BinaryOperator::NotEq
                | BinaryOperator::Lt
                | BinaryOperator::LtEq
                | BinaryOperator::Gt
                | BinaryOperator::GtEq
        )
    }
}
