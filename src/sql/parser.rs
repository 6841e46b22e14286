//! # SQL Parser - Arena-Allocated AST Builder
//!
//! Recursive descent parser producing the typed, arena-allocated AST of
//! [`super::ast`]. Statement-level parsing is plain recursive descent with a
//! single token of lookahead; expressions use Pratt parsing with binding
//! powers.
//!
//! ## Expression Precedence
//!
//! | Precedence | Operators |
//! |------------|-----------|
//! | 1 (lowest) | OR |
//! | 2 | AND |
//! | 3 | =, <>, <, <=, >, >=, IS, IN |
//! | 5 | +, - (binary) |
//! | 6 | *, / |
//!
//! ## Statement Grammar Notes
//!
//! - `SELECT` works without FROM (`SELECT 1`, `SELECT CURRENT_SCHEMA()`).
//! - Table aliases come from `AS alias` or a bare trailing identifier.
//! - `LIMIT` / `OFFSET` accept an integer literal or a bind parameter.
//! - `(a, b) IN ((1, 2), (3, 4))` is recognized by the comma following the
//!   first parenthesized expression; without a comma the bracket is an
//!   ordinary sub-expression.
//! - `DELETE` without WHERE carries no predicate; the executor lowers it to
//!   a truncation.
//! - `GRANT` is consumed permissively to the end of the statement.
//!
//! ## Error Handling
//!
//! Every syntax failure is an `eyre` error prefixed `parsing error:` citing
//! the offending lexeme with its line and column. Reaching end of input in
//! the middle of a clause is an error, never a silent truncation. The parse
//! is total: any error aborts the whole statement list with no partial
//! result.

use super::ast::*;
use super::lexer::Lexer;
use super::token::{Keyword, Parameter, Token};
use crate::types::DataType;
use bumpalo::Bump;
use eyre::{bail, Result};

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one<'a>(sql: &'a str, arena: &'a Bump) -> Statement<'a> {
        let mut parser = Parser::new(sql, arena);
        let mut stmts = parser.parse().expect("parse should succeed");
        assert_eq!(stmts.len(), 1, "expected exactly one statement");
        stmts.remove(0)
    }

    #[test]
    fn parse_simple_select() {
        let arena = Bump::new();
        let stmt = parse_one("SELECT 1", &arena);
        assert!(matches!(stmt, Statement::Select(_)));
    }

    #[test]
    fn parse_select_without_from_keeps_empty_tables() {
        let arena = Bump::new();
        if let Statement::Select(s) = parse_one("SELECT CURRENT_DATABASE()", &arena) {
            assert!(s.from.is_empty());
            assert_eq!(s.columns.len(), 1);
        } else {
            panic!("expected select");
        }
    }

    #[test]
    fn parse_select_star_from() {
        let arena = Bump::new();
        if let Statement::Select(s) = parse_one("SELECT * FROM users", &arena) {
            assert!(matches!(s.columns[0], SelectColumn::AllColumns));
            assert_eq!(s.from[0].name, "users");
        } else {
            panic!("expected select");
        }
    }

    #[test]
    fn parse_schema_qualified_table_with_alias() {
        let arena = Bump::new();
        if let Statement::Select(s) = parse_one("SELECT p.name FROM foo.products AS p", &arena) {
            assert_eq!(s.from[0].schema, Some("foo"));
            assert_eq!(s.from[0].name, "products");
            assert_eq!(s.from[0].alias, Some("p"));
        } else {
            panic!("expected select");
        }
    }

    #[test]
    fn parse_bare_alias() {
        let arena = Bump::new();
        if let Statement::Select(s) = parse_one("SELECT o.id FROM orders o", &arena) {
            assert_eq!(s.from[0].alias, Some("o"));
        } else {
            panic!("expected select");
        }
    }

    #[test]
    fn parse_join_on() {
        let arena = Bump::new();
        let sql = "SELECT u.name FROM users u JOIN posts p ON p.user_id = u.id";
        if let Statement::Select(s) = parse_one(sql, &arena) {
            assert_eq!(s.joins.len(), 1);
            assert_eq!(s.joins[0].table.name, "posts");
            assert_eq!(s.joins[0].left.column, "user_id");
            assert_eq!(s.joins[0].right.column, "id");
        } else {
            panic!("expected select");
        }
    }

    #[test]
    fn parse_join_on_with_brackets() {
        let arena = Bump::new();
        let sql = "SELECT u.name FROM users u JOIN posts p ON (p.user_id = u.id)";
        if let Statement::Select(s) = parse_one(sql, &arena) {
            assert_eq!(s.joins.len(), 1);
            assert_eq!(s.joins[0].left.table, Some("p"));
        } else {
            panic!("expected select");
        }
    }

    #[test]
    fn parse_limit_offset_parameters() {
        let arena = Bump::new();
        if let Statement::Select(s) = parse_one("SELECT * FROM items LIMIT $1 OFFSET $2", &arena) {
            assert!(matches!(
                s.limit,
                Some(Expr::Parameter(Parameter::Positional(1)))
            ));
            assert!(matches!(
                s.offset,
                Some(Expr::Parameter(Parameter::Positional(2)))
            ));
        } else {
            panic!("expected select");
        }
    }

    #[test]
    fn parse_where_precedence_and_or() {
        let arena = Bump::new();
        let sql = "SELECT * FROM t WHERE a = 1 OR b = 2 AND c = 3";
        if let Statement::Select(s) = parse_one(sql, &arena) {
            // AND binds tighter: a = 1 OR (b = 2 AND c = 3)
            match s.where_clause.unwrap() {
                Expr::Binary {
                    op: BinaryOperator::Or,
                    right,
                    ..
                } => assert!(matches!(
                    right,
                    Expr::Binary {
                        op: BinaryOperator::And,
                        ..
                    }
                )),
                other => panic!("expected OR at root, got {:?}", other),
            }
        } else {
            panic!("expected select");
        }
    }

    #[test]
    fn parse_where_arithmetic_comparison() {
        let arena = Bump::new();
        let sql = "SELECT * FROM t WHERE price * quantity > 1000";
        if let Statement::Select(s) = parse_one(sql, &arena) {
            match s.where_clause.unwrap() {
                Expr::Binary {
                    op: BinaryOperator::Gt,
                    left,
                    ..
                } => assert!(matches!(
                    left,
                    Expr::Binary {
                        op: BinaryOperator::Multiply,
                        ..
                    }
                )),
                other => panic!("expected comparison at root, got {:?}", other),
            }
        } else {
            panic!("expected select");
        }
    }

    #[test]
    fn parse_is_not_null_and_in() {
        let arena = Bump::new();
        let sql = "SELECT * FROM t WHERE a IS NOT NULL AND b IN (1, 2, 3)";
        if let Statement::Select(s) = parse_one(sql, &arena) {
            match s.where_clause.unwrap() {
                Expr::Binary { left, right, .. } => {
                    assert!(matches!(left, Expr::IsNull { negated: true, .. }));
                    assert!(matches!(right, Expr::InList { negated: false, .. }));
                }
                other => panic!("expected AND, got {:?}", other),
            }
        } else {
            panic!("expected select");
        }
    }

    #[test]
    fn parse_tuple_in() {
        let arena = Bump::new();
        let sql = "SELECT * FROM t WHERE (a, b) IN (('x', 1), ('y', 2))";
        if let Statement::Select(s) = parse_one(sql, &arena) {
            match s.where_clause.unwrap() {
                Expr::TupleIn { exprs, rows, .. } => {
                    assert_eq!(exprs.len(), 2);
                    assert_eq!(rows.len(), 2);
                    assert_eq!(rows[0].len(), 2);
                }
                other => panic!("expected tuple IN, got {:?}", other),
            }
        } else {
            panic!("expected select");
        }
    }

    #[test]
    fn parse_parenthesized_expression_is_not_tuple() {
        let arena = Bump::new();
        let sql = "SELECT * FROM t WHERE (price * quantity) > 100";
        if let Statement::Select(s) = parse_one(sql, &arena) {
            assert!(matches!(
                s.where_clause.unwrap(),
                Expr::Binary {
                    op: BinaryOperator::Gt,
                    ..
                }
            ));
        } else {
            panic!("expected select");
        }
    }

    #[test]
    fn parse_distinct_on() {
        let arena = Bump::new();
        let sql = "SELECT DISTINCT ON (category) name FROM products";
        if let Statement::Select(s) = parse_one(sql, &arena) {
            match s.distinct {
                Distinct::On(cols) => assert_eq!(cols[0].column, "category"),
                other => panic!("expected DISTINCT ON, got {:?}", other),
            }
        } else {
            panic!("expected select");
        }
    }

    #[test]
    fn parse_insert_multi_row() {
        let arena = Bump::new();
        let sql = "INSERT INTO t (a, b) VALUES (1, 'x'), (2, 'y')";
        if let Statement::Insert(i) = parse_one(sql, &arena) {
            assert_eq!(i.columns, &["a", "b"]);
            assert_eq!(i.values.len(), 2);
        } else {
            panic!("expected insert");
        }
    }

    #[test]
    fn parse_insert_on_conflict_do_update_excluded() {
        let arena = Bump::new();
        let sql = "INSERT INTO t (id, v) VALUES (1, 'a') \
                   ON CONFLICT (id) DO UPDATE SET v = excluded.v RETURNING id";
        if let Statement::Insert(i) = parse_one(sql, &arena) {
            let oc = i.on_conflict.unwrap();
            assert_eq!(oc.targets, &["id"]);
            match oc.action {
                OnConflictAction::DoUpdate(assigns) => {
                    assert_eq!(assigns[0].column, "v");
                    assert!(matches!(
                        assigns[0].value,
                        Expr::Column(ColumnRef {
                            table: Some("excluded"),
                            column: "v",
                        })
                    ));
                }
                other => panic!("expected DO UPDATE, got {:?}", other),
            }
            assert_eq!(i.returning.unwrap().column, "id");
        } else {
            panic!("expected insert");
        }
    }

    #[test]
    fn parse_insert_on_conflict_do_nothing() {
        let arena = Bump::new();
        let sql = "INSERT INTO t (id) VALUES (1) ON CONFLICT (id) DO NOTHING";
        if let Statement::Insert(i) = parse_one(sql, &arena) {
            assert!(matches!(
                i.on_conflict.unwrap().action,
                OnConflictAction::DoNothing
            ));
        } else {
            panic!("expected insert");
        }
    }

    #[test]
    fn parse_insert_default_value() {
        let arena = Bump::new();
        let sql = "INSERT INTO t (id, v) VALUES (DEFAULT, 'x')";
        if let Statement::Insert(i) = parse_one(sql, &arena) {
            assert!(matches!(i.values[0][0], Expr::Default));
        } else {
            panic!("expected insert");
        }
    }

    #[test]
    fn parse_update_with_where() {
        let arena = Bump::new();
        let sql = "UPDATE t SET a = 1, b = :name WHERE id = $1";
        if let Statement::Update(u) = parse_one(sql, &arena) {
            assert_eq!(u.assignments.len(), 2);
            assert!(u.where_clause.is_some());
        } else {
            panic!("expected update");
        }
    }

    #[test]
    fn parse_delete_without_where() {
        let arena = Bump::new();
        if let Statement::Delete(d) = parse_one("DELETE FROM t", &arena) {
            assert!(d.where_clause.is_none());
        } else {
            panic!("expected delete");
        }
    }

    #[test]
    fn parse_create_table_with_constraints() {
        let arena = Bump::new();
        let sql = "CREATE TABLE IF NOT EXISTS controls (\
                     id BIGSERIAL PRIMARY KEY, \
                     category_name TEXT, \
                     category_catalog_id TEXT, \
                     FOREIGN KEY (category_name, category_catalog_id) \
                       REFERENCES categories (name, catalog_id))";
        if let Statement::CreateTable(c) = parse_one(sql, &arena) {
            assert!(c.if_not_exists);
            assert_eq!(c.columns.len(), 3);
            assert_eq!(c.columns[0].data_type, DataType::BigSerial);
            assert!(c.columns[0]
                .constraints
                .contains(&ColumnConstraint::PrimaryKey));
            match c.constraints[0] {
                TableConstraint::ForeignKey {
                    columns,
                    ref_table,
                    ref_columns,
                    ..
                } => {
                    assert_eq!(columns, &["category_name", "category_catalog_id"]);
                    assert_eq!(ref_table, "categories");
                    assert_eq!(ref_columns, &["name", "catalog_id"]);
                }
                other => panic!("expected FK, got {:?}", other),
            }
        } else {
            panic!("expected create table");
        }
    }

    #[test]
    fn parse_create_table_inline_references() {
        let arena = Bump::new();
        let sql = "CREATE TABLE m (user_id BIGINT CONSTRAINT m_fk REFERENCES users (id))";
        if let Statement::CreateTable(c) = parse_one(sql, &arena) {
            match c.columns[0].constraints[0] {
                ColumnConstraint::References {
                    constraint,
                    table,
                    column,
                    ..
                } => {
                    assert_eq!(constraint, Some("m_fk"));
                    assert_eq!(table, "users");
                    assert_eq!(column, Some("id"));
                }
                other => panic!("expected references, got {:?}", other),
            }
        } else {
            panic!("expected create table");
        }
    }

    #[test]
    fn parse_create_table_default_now() {
        let arena = Bump::new();
        let sql = "CREATE TABLE t (created_at TIMESTAMP DEFAULT now())";
        if let Statement::CreateTable(c) = parse_one(sql, &arena) {
            assert!(matches!(
                c.columns[0].constraints[0],
                ColumnConstraint::Default(Expr::Function(FunctionCall::Now))
            ));
        } else {
            panic!("expected create table");
        }
    }

    #[test]
    fn parse_create_schema_and_index() {
        let arena = Bump::new();
        let stmt = parse_one("CREATE SCHEMA IF NOT EXISTS foo", &arena);
        assert!(matches!(stmt, Statement::CreateSchema(s) if s.if_not_exists && s.name == "foo"));

        let stmt = parse_one("CREATE UNIQUE INDEX idx ON t USING HASH (a, b)", &arena);
        if let Statement::CreateIndex(i) = stmt {
            assert!(i.unique);
            assert_eq!(i.index_kind, IndexKind::Hash);
            assert_eq!(i.columns, &["a", "b"]);
        } else {
            panic!("expected create index");
        }
    }

    #[test]
    fn parse_drop_if_exists() {
        let arena = Bump::new();
        let stmt = parse_one("DROP TABLE IF EXISTS foo.bar", &arena);
        if let Statement::Drop(d) = stmt {
            assert_eq!(d.object, ObjectType::Table);
            assert!(d.if_exists);
            assert_eq!(d.schema, Some("foo"));
            assert_eq!(d.name, "bar");
        } else {
            panic!("expected drop");
        }
    }

    #[test]
    fn parse_grant_is_permissive() {
        let arena = Bump::new();
        let stmt = parse_one("GRANT ALL PRIVILEGES ON DATABASE x TO y", &arena);
        assert!(matches!(stmt, Statement::Grant));
    }

    #[test]
    fn parse_multiple_statements() {
        let arena = Bump::new();
        let mut parser = Parser::new("CREATE SCHEMA a; CREATE SCHEMA b;", &arena);
        let stmts = parser.parse().unwrap();
        assert_eq!(stmts.len(), 2);
    }

    #[test]
    fn parse_error_cites_lexeme() {
        let arena = Bump::new();
        let mut parser = Parser::new("SELECT FROM WHERE", &arena);
        let err = parser.parse().unwrap_err();
        assert!(err.to_string().starts_with("parsing error"));
    }

    #[test]
    fn parse_error_on_truncated_statement() {
        let arena = Bump::new();
        let mut parser = Parser::new("INSERT INTO t (a) VALUES", &arena);
        assert!(parser.parse().is_err());
    }

    #[test]
    fn parse_for_update_suffix() {
        let arena = Bump::new();
        if let Statement::Select(s) = parse_one("SELECT * FROM t WHERE id = 1 FOR UPDATE", &arena)
        {
            assert!(s.for_update);
        } else {
            panic!("expected select");
        }
    }

    #[test]
    fn parse_negative_number_literal() {
        let arena = Bump::new();
        if let Statement::Select(s) = parse_one("SELECT * FROM t WHERE a = -5", &arena) {
            match s.where_clause.unwrap() {
                Expr::Binary { right, .. } => {
                    assert!(matches!(right, Expr::Literal(Literal::Integer("-5"))))
                }
                other => panic!("expected comparison, got {:?}", other),
            }
        } else {
            panic!("expected select");
        }
    }
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    arena: &'a Bump,
    current: Token<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, arena: &'a Bump) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self {
            lexer,
            arena,
            current,
        }
    }

    /// Parses a semicolon-separated statement list.
    pub fn parse(&mut self) -> Result<Vec<Statement<'a>>> {
        let mut statements = Vec::new();
        loop {
            while self.consume_token(&Token::Semicolon) {}
            if matches!(self.current, Token::Eof) {
                break;
            }
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    pub fn parse_statement(&mut self) -> Result<Statement<'a>> {
        if let Token::Error(msg) = self.current {
            bail!("parsing error: {}", msg);
        }
        match self.current {
            Token::Keyword(Keyword::Select) => {
                let select = self.parse_select()?;
                Ok(Statement::Select(self.arena.alloc(select)))
            }
            Token::Keyword(Keyword::Insert) => {
                let insert = self.parse_insert()?;
                Ok(Statement::Insert(self.arena.alloc(insert)))
            }
            Token::Keyword(Keyword::Update) => {
                let update = self.parse_update()?;
                Ok(Statement::Update(self.arena.alloc(update)))
            }
            Token::Keyword(Keyword::Delete) => {
                let delete = self.parse_delete()?;
                Ok(Statement::Delete(self.arena.alloc(delete)))
            }
            Token::Keyword(Keyword::Create) => self.parse_create(),
            Token::Keyword(Keyword::Drop) => {
                let drop = self.parse_drop()?;
                Ok(Statement::Drop(self.arena.alloc(drop)))
            }
            Token::Keyword(Keyword::Truncate) => {
                let truncate = self.parse_truncate()?;
                Ok(Statement::Truncate(self.arena.alloc(truncate)))
            }
            Token::Keyword(Keyword::Grant) => {
                self.parse_grant();
                Ok(Statement::Grant)
            }
            ref other => bail!(
                "parsing error: unexpected {} at start of statement",
                describe(other)
            ),
        }
    }

    fn peek(&self) -> &Token<'a> {
        &self.current
    }

    fn advance(&mut self) -> Token<'a> {
        std::mem::replace(&mut self.current, self.lexer.next_token())
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.current, Token::Keyword(k) if k == keyword)
    }

    fn consume_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<()> {
        if self.check_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            bail!(
                "parsing error: expected {:?}, found {} at line {} column {}",
                keyword,
                describe(&self.current),
                self.lexer.line(),
                self.lexer.column()
            )
        }
    }

    fn check_token(&self, expected: &Token<'_>) -> bool {
        std::mem::discriminant(&self.current) == std::mem::discriminant(expected)
    }

    fn consume_token(&mut self, expected: &Token<'_>) -> bool {
        if self.check_token(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_token(&mut self, expected: &Token<'_>) -> Result<()> {
        if self.check_token(expected) {
            self.advance();
            Ok(())
        } else {
            bail!(
                "parsing error: expected {}, found {} at line {} column {}",
                describe(expected),
                describe(&self.current),
                self.lexer.line(),
                self.lexer.column()
            )
        }
    }

    fn expect_ident(&mut self) -> Result<&'a str> {
        match self.current {
            Token::Ident(s) | Token::QuotedIdent(s) => {
                self.advance();
                Ok(s)
            }
            ref other => bail!(
                "parsing error: expected identifier, found {} at line {} column {}",
                describe(other),
                self.lexer.line(),
                self.lexer.column()
            ),
        }
    }

    // SELECT [DISTINCT [ON (cols)]] items [FROM tables [JOIN ...]]
    // [WHERE ...] [ORDER BY ...] [LIMIT n] [OFFSET n] [FOR UPDATE]
    fn parse_select(&mut self) -> Result<SelectStmt<'a>> {
        self.expect_keyword(Keyword::Select)?;

        let distinct = if self.consume_keyword(Keyword::Distinct) {
            if self.consume_keyword(Keyword::On) {
                self.expect_token(&Token::LParen)?;
                let mut cols = bumpalo::collections::Vec::new_in(self.arena);
                loop {
                    cols.push(self.parse_column_ref()?);
                    if !self.consume_token(&Token::Comma) {
                        break;
                    }
                }
                self.expect_token(&Token::RParen)?;
                Distinct::On(cols.into_bump_slice())
            } else {
                Distinct::Rows
            }
        } else {
            Distinct::All
        };

        let mut columns = bumpalo::collections::Vec::new_in(self.arena);
        loop {
            if self.consume_token(&Token::Star) {
                columns.push(SelectColumn::AllColumns);
            } else {
                let expr = self.parse_expr(0)?;
                let alias = if self.consume_keyword(Keyword::As) {
                    Some(self.expect_ident()?)
                } else {
                    None
                };
                columns.push(SelectColumn::Expr {
                    expr: self.arena.alloc(expr),
                    alias,
                });
            }
            if !self.consume_token(&Token::Comma) {
                break;
            }
        }

        let mut from = bumpalo::collections::Vec::new_in(self.arena);
        if self.consume_keyword(Keyword::From) {
            loop {
                from.push(self.parse_table_ref()?);
                if !self.consume_token(&Token::Comma) {
                    break;
                }
            }
        }

        let mut joins = bumpalo::collections::Vec::new_in(self.arena);
        loop {
            if self.check_keyword(Keyword::Inner) {
                self.advance();
                self.expect_keyword(Keyword::Join)?;
            } else if !self.consume_keyword(Keyword::Join) {
                break;
            }
            let table = self.parse_table_ref()?;
            self.expect_keyword(Keyword::On)?;
            let bracketed = self.consume_token(&Token::LParen);
            let left = self.parse_column_ref()?;
            self.expect_token(&Token::Eq)?;
            let right = self.parse_column_ref()?;
            if bracketed {
                self.expect_token(&Token::RParen)?;
            }
            joins.push(JoinClause { table, left, right });
        }

        let mut where_clause = None;
        let mut order_by: &'a [OrderByItem<'a>] = &[];
        let mut limit = None;
        let mut offset = None;
        let mut for_update = false;

        loop {
            match self.current {
                Token::Keyword(Keyword::Where) => {
                    self.advance();
                    let expr = self.parse_expr(0)?;
                    where_clause = Some(&*self.arena.alloc(expr));
                }
                Token::Keyword(Keyword::Order) => {
                    self.advance();
                    self.expect_keyword(Keyword::By)?;
                    let mut items = bumpalo::collections::Vec::new_in(self.arena);
                    loop {
                        let column = self.parse_column_ref()?;
                        let direction = if self.consume_keyword(Keyword::Desc) {
                            OrderDirection::Desc
                        } else {
                            self.consume_keyword(Keyword::Asc);
                            OrderDirection::Asc
                        };
                        items.push(OrderByItem { column, direction });
                        if !self.consume_token(&Token::Comma) {
                            break;
                        }
                    }
                    order_by = items.into_bump_slice();
                }
                Token::Keyword(Keyword::Limit) => {
                    self.advance();
                    let expr = self.parse_count_operand()?;
                    limit = Some(&*self.arena.alloc(expr));
                }
                Token::Keyword(Keyword::Offset) => {
                    self.advance();
                    let expr = self.parse_count_operand()?;
                    offset = Some(&*self.arena.alloc(expr));
                }
                Token::Keyword(Keyword::For) => {
                    self.advance();
                    self.expect_keyword(Keyword::Update)?;
                    for_update = true;
                }
                _ => break,
            }
        }

        Ok(SelectStmt {
            distinct,
            columns: columns.into_bump_slice(),
            from: from.into_bump_slice(),
            joins: joins.into_bump_slice(),
            where_clause,
            order_by,
            limit,
            offset,
            for_update,
        })
    }

    /// LIMIT/OFFSET operand: an integer literal or a bind parameter.
    fn parse_count_operand(&mut self) -> Result<Expr<'a>> {
        match self.current {
            Token::Integer(n) => {
                self.advance();
                Ok(Expr::Literal(Literal::Integer(n)))
            }
            Token::Parameter(p) => {
                self.advance();
                Ok(Expr::Parameter(p))
            }
            ref other => bail!(
                "parsing error: expected row count, found {} at line {} column {}",
                describe(other),
                self.lexer.line(),
                self.lexer.column()
            ),
        }
    }

    fn parse_table_ref(&mut self) -> Result<TableRef<'a>> {
        let first = self.expect_ident()?;
        let (schema, name) = if self.consume_token(&Token::Dot) {
            (Some(first), self.expect_ident()?)
        } else {
            (None, first)
        };

        let alias = if self.consume_keyword(Keyword::As) {
            Some(self.expect_ident()?)
        } else if let Token::Ident(a) = self.current {
            self.advance();
            Some(a)
        } else {
            None
        };

        Ok(TableRef {
            schema,
            name,
            alias,
        })
    }

    fn parse_column_ref(&mut self) -> Result<ColumnRef<'a>> {
        let first = self.expect_ident()?;
        if self.consume_token(&Token::Dot) {
            Ok(ColumnRef {
                table: Some(first),
                column: self.expect_ident()?,
            })
        } else {
            Ok(ColumnRef {
                table: None,
                column: first,
            })
        }
    }

    // INSERT INTO table (cols) VALUES (exprs), ...
    // [ON CONFLICT (cols) DO NOTHING | DO UPDATE SET ...] [RETURNING col]
    fn parse_insert(&mut self) -> Result<InsertStmt<'a>> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        let table = self.parse_table_ref()?;

        self.expect_token(&Token::LParen)?;
        let mut columns = bumpalo::collections::Vec::new_in(self.arena);
        loop {
            columns.push(self.expect_ident()?);
            if !self.consume_token(&Token::Comma) {
                break;
            }
        }
        self.expect_token(&Token::RParen)?;

        self.expect_keyword(Keyword::Values)?;
        let mut values = bumpalo::collections::Vec::new_in(self.arena);
        loop {
            self.expect_token(&Token::LParen)?;
            let mut row = bumpalo::collections::Vec::new_in(self.arena);
            loop {
                let expr = self.parse_expr(0)?;
                row.push(&*self.arena.alloc(expr));
                if !self.consume_token(&Token::Comma) {
                    break;
                }
            }
            self.expect_token(&Token::RParen)?;
            values.push(&*self.arena.alloc_slice_copy(&row));
            if !self.consume_token(&Token::Comma) {
                break;
            }
        }

        let on_conflict = if self.consume_keyword(Keyword::On) {
            let oc = self.parse_on_conflict()?;
            Some(&*self.arena.alloc(oc))
        } else {
            None
        };

        let returning = if self.consume_keyword(Keyword::Returning) {
            Some(self.parse_column_ref()?)
        } else {
            None
        };

        Ok(InsertStmt {
            table,
            columns: columns.into_bump_slice(),
            values: values.into_bump_slice(),
            on_conflict,
            returning,
        })
    }

    fn parse_on_conflict(&mut self) -> Result<OnConflict<'a>> {
        self.expect_keyword(Keyword::Conflict)?;
        self.expect_token(&Token::LParen)?;
        let mut targets = bumpalo::collections::Vec::new_in(self.arena);
        loop {
            targets.push(self.expect_ident()?);
            if !self.consume_token(&Token::Comma) {
                break;
            }
        }
        self.expect_token(&Token::RParen)?;

        self.expect_keyword(Keyword::Do)?;
        let action = if self.consume_keyword(Keyword::Nothing) {
            OnConflictAction::DoNothing
        } else {
            self.expect_keyword(Keyword::Update)?;
            self.expect_keyword(Keyword::Set)?;
            OnConflictAction::DoUpdate(self.parse_assignments()?)
        };

        Ok(OnConflict {
            targets: targets.into_bump_slice(),
            action,
        })
    }

    fn parse_assignments(&mut self) -> Result<&'a [Assignment<'a>]> {
        let mut assignments = bumpalo::collections::Vec::new_in(self.arena);
        loop {
            let column = self.expect_ident()?;
            self.expect_token(&Token::Eq)?;
            let value = self.parse_expr(0)?;
            assignments.push(Assignment {
                column,
                value: self.arena.alloc(value),
            });
            if !self.consume_token(&Token::Comma) {
                break;
            }
        }
        Ok(assignments.into_bump_slice())
    }

    fn parse_update(&mut self) -> Result<UpdateStmt<'a>> {
        self.expect_keyword(Keyword::Update)?;
        let table = self.parse_table_ref()?;
        self.expect_keyword(Keyword::Set)?;
        let assignments = self.parse_assignments()?;

        let where_clause = if self.consume_keyword(Keyword::Where) {
            let expr = self.parse_expr(0)?;
            Some(&*self.arena.alloc(expr))
        } else {
            None
        };

        let returning = if self.consume_keyword(Keyword::Returning) {
            Some(self.parse_column_ref()?)
        } else {
            None
        };

        Ok(UpdateStmt {
            table,
            assignments,
            where_clause,
            returning,
        })
    }

    fn parse_delete(&mut self) -> Result<DeleteStmt<'a>> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let table = self.parse_table_ref()?;

        let where_clause = if self.consume_keyword(Keyword::Where) {
            let expr = self.parse_expr(0)?;
            Some(&*self.arena.alloc(expr))
        } else {
            None
        };

        Ok(DeleteStmt {
            table,
            where_clause,
        })
    }

    fn parse_create(&mut self) -> Result<Statement<'a>> {
        self.expect_keyword(Keyword::Create)?;
        match self.current {
            Token::Keyword(Keyword::Table) => {
                let table = self.parse_create_table()?;
                Ok(Statement::CreateTable(self.arena.alloc(table)))
            }
            Token::Keyword(Keyword::Schema) => {
                self.advance();
                let if_not_exists = self.parse_if_not_exists()?;
                let name = self.expect_ident()?;
                Ok(Statement::CreateSchema(self.arena.alloc(CreateSchemaStmt {
                    if_not_exists,
                    name,
                })))
            }
            Token::Keyword(Keyword::Unique) | Token::Keyword(Keyword::Index) => {
                let unique = self.consume_keyword(Keyword::Unique);
                self.expect_keyword(Keyword::Index)?;
                let index = self.parse_create_index(unique)?;
                Ok(Statement::CreateIndex(self.arena.alloc(index)))
            }
            ref other => bail!(
                "parsing error: expected TABLE, SCHEMA or INDEX after CREATE, found {}",
                describe(other)
            ),
        }
    }

    fn parse_if_not_exists(&mut self) -> Result<bool> {
        if self.consume_keyword(Keyword::If) {
            self.expect_keyword(Keyword::Not)?;
            self.expect_keyword(Keyword::Exists)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn parse_create_table(&mut self) -> Result<CreateTableStmt<'a>> {
        self.expect_keyword(Keyword::Table)?;
        let if_not_exists = self.parse_if_not_exists()?;

        let first = self.expect_ident()?;
        let (schema, name) = if self.consume_token(&Token::Dot) {
            (Some(first), self.expect_ident()?)
        } else {
            (None, first)
        };

        self.expect_token(&Token::LParen)?;

        let mut columns = bumpalo::collections::Vec::new_in(self.arena);
        let mut constraints = bumpalo::collections::Vec::new_in(self.arena);

        loop {
            match self.current {
                Token::Keyword(Keyword::Primary)
                | Token::Keyword(Keyword::Foreign)
                | Token::Keyword(Keyword::Constraint) => {
                    constraints.push(self.parse_table_constraint()?);
                }
                _ => columns.push(self.parse_column_def()?),
            }
            if !self.consume_token(&Token::Comma) {
                break;
            }
        }
        self.expect_token(&Token::RParen)?;

        Ok(CreateTableStmt {
            if_not_exists,
            table: TableRef {
                schema,
                name,
                alias: None,
            },
            columns: columns.into_bump_slice(),
            constraints: constraints.into_bump_slice(),
        })
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef<'a>> {
        let name = self.expect_ident()?;
        let data_type = self.parse_data_type()?;

        let mut constraints = bumpalo::collections::Vec::new_in(self.arena);
        loop {
            match self.current {
                Token::Keyword(Keyword::Primary) => {
                    self.advance();
                    self.expect_keyword(Keyword::Key)?;
                    constraints.push(ColumnConstraint::PrimaryKey);
                }
                Token::Keyword(Keyword::Unique) => {
                    self.advance();
                    constraints.push(ColumnConstraint::Unique);
                }
                Token::Keyword(Keyword::Not) => {
                    self.advance();
                    self.expect_keyword(Keyword::Null)?;
                    constraints.push(ColumnConstraint::NotNull);
                }
                Token::Keyword(Keyword::Null) => {
                    self.advance();
                }
                Token::Keyword(Keyword::Autoincrement) => {
                    self.advance();
                    constraints.push(ColumnConstraint::AutoIncrement);
                }
                Token::Keyword(Keyword::Default) => {
                    self.advance();
                    let expr = self.parse_prefix()?;
                    constraints.push(ColumnConstraint::Default(self.arena.alloc(expr)));
                }
                Token::Keyword(Keyword::References) => {
                    self.advance();
                    constraints.push(self.parse_references(None)?);
                }
                Token::Keyword(Keyword::Constraint) => {
                    self.advance();
                    let constraint_name = self.expect_ident()?;
                    self.expect_keyword(Keyword::References)?;
                    constraints.push(self.parse_references(Some(constraint_name))?);
                }
                _ => break,
            }
        }

        Ok(ColumnDef {
            name,
            data_type,
            constraints: constraints.into_bump_slice(),
        })
    }

    fn parse_references(&mut self, constraint: Option<&'a str>) -> Result<ColumnConstraint<'a>> {
        let first = self.expect_ident()?;
        let (schema, table) = if self.consume_token(&Token::Dot) {
            (Some(first), self.expect_ident()?)
        } else {
            (None, first)
        };

        let column = if self.consume_token(&Token::LParen) {
            let col = self.expect_ident()?;
            self.expect_token(&Token::RParen)?;
            Some(col)
        } else {
            None
        };

        Ok(ColumnConstraint::References {
            constraint,
            schema,
            table,
            column,
        })
    }

    fn parse_table_constraint(&mut self) -> Result<TableConstraint<'a>> {
        let constraint = if self.consume_keyword(Keyword::Constraint) {
            Some(self.expect_ident()?)
        } else {
            None
        };

        if self.consume_keyword(Keyword::Primary) {
            self.expect_keyword(Keyword::Key)?;
            self.expect_token(&Token::LParen)?;
            let mut columns = bumpalo::collections::Vec::new_in(self.arena);
            loop {
                columns.push(self.expect_ident()?);
                if !self.consume_token(&Token::Comma) {
                    break;
                }
            }
            self.expect_token(&Token::RParen)?;
            return Ok(TableConstraint::PrimaryKey {
                columns: columns.into_bump_slice(),
            });
        }

        self.expect_keyword(Keyword::Foreign)?;
        self.expect_keyword(Keyword::Key)?;
        self.expect_token(&Token::LParen)?;
        let mut columns = bumpalo::collections::Vec::new_in(self.arena);
        loop {
            columns.push(self.expect_ident()?);
            if !self.consume_token(&Token::Comma) {
                break;
            }
        }
        self.expect_token(&Token::RParen)?;

        self.expect_keyword(Keyword::References)?;
        let first = self.expect_ident()?;
        let (ref_schema, ref_table) = if self.consume_token(&Token::Dot) {
            (Some(first), self.expect_ident()?)
        } else {
            (None, first)
        };

        let mut ref_columns = bumpalo::collections::Vec::new_in(self.arena);
        if self.consume_token(&Token::LParen) {
            loop {
                ref_columns.push(self.expect_ident()?);
                if !self.consume_token(&Token::Comma) {
                    break;
                }
            }
            self.expect_token(&Token::RParen)?;
        }

        Ok(TableConstraint::ForeignKey {
            constraint,
            columns: columns.into_bump_slice(),
            ref_schema,
            ref_table,
            ref_columns: ref_columns.into_bump_slice(),
        })
    }

    fn parse_data_type(&mut self) -> Result<DataType> {
        let keyword = match self.current {
            Token::Keyword(k) if k.type_name().is_some() => {
                self.advance();
                k
            }
            ref other => bail!(
                "parsing error: expected column type, found {} at line {} column {}",
                describe(other),
                self.lexer.line(),
                self.lexer.column()
            ),
        };

        // Multi-word spellings.
        match keyword {
            Keyword::Double => {
                self.consume_keyword(Keyword::Precision);
            }
            Keyword::Character => {
                self.consume_keyword(Keyword::Varying);
            }
            Keyword::Timestamp => {
                if self.consume_keyword(Keyword::With) || self.consume_keyword(Keyword::Without) {
                    self.expect_keyword(Keyword::Time)?;
                    self.expect_keyword(Keyword::Zone)?;
                }
            }
            _ => {}
        }

        // Length/precision argument, accepted and ignored.
        if self.consume_token(&Token::LParen) {
            self.expect_token(&Token::Integer(""))?;
            if self.consume_token(&Token::Comma) {
                self.expect_token(&Token::Integer(""))?;
            }
            self.expect_token(&Token::RParen)?;
        }

        let name = keyword
            .type_name()
            .expect("checked above that keyword is a type");
        DataType::from_name(name)
    }

    fn parse_create_index(&mut self, unique: bool) -> Result<CreateIndexStmt<'a>> {
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.expect_ident()?;
        self.expect_keyword(Keyword::On)?;

        let first = self.expect_ident()?;
        let (schema, table_name) = if self.consume_token(&Token::Dot) {
            (Some(first), self.expect_ident()?)
        } else {
            (None, first)
        };

        let index_kind = if self.consume_keyword(Keyword::Using) {
            if self.consume_keyword(Keyword::Hash) {
                IndexKind::Hash
            } else if self.consume_keyword(Keyword::Btree) {
                IndexKind::BTree
            } else {
                bail!(
                    "parsing error: expected HASH or BTREE after USING, found {}",
                    describe(&self.current)
                )
            }
        } else {
            IndexKind::Hash
        };

        self.expect_token(&Token::LParen)?;
        let mut columns = bumpalo::collections::Vec::new_in(self.arena);
        loop {
            columns.push(self.expect_ident()?);
            if !self.consume_token(&Token::Comma) {
                break;
            }
        }
        self.expect_token(&Token::RParen)?;

        Ok(CreateIndexStmt {
            if_not_exists,
            unique,
            name,
            table: TableRef {
                schema,
                name: table_name,
                alias: None,
            },
            index_kind,
            columns: columns.into_bump_slice(),
        })
    }

    fn parse_drop(&mut self) -> Result<DropStmt<'a>> {
        self.expect_keyword(Keyword::Drop)?;
        let object = if self.consume_keyword(Keyword::Table) {
            ObjectType::Table
        } else if self.consume_keyword(Keyword::Schema) {
            ObjectType::Schema
        } else {
            bail!(
                "parsing error: expected TABLE or SCHEMA after DROP, found {}",
                describe(&self.current)
            )
        };

        let if_exists = if self.consume_keyword(Keyword::If) {
            self.expect_keyword(Keyword::Exists)?;
            true
        } else {
            false
        };

        let first = self.expect_ident()?;
        let (schema, name) = if object == ObjectType::Table && self.consume_token(&Token::Dot) {
            (Some(first), self.expect_ident()?)
        } else {
            (None, first)
        };

        Ok(DropStmt {
            object,
            if_exists,
            schema,
            name,
        })
    }

    fn parse_truncate(&mut self) -> Result<TruncateStmt<'a>> {
        self.expect_keyword(Keyword::Truncate)?;
        self.consume_keyword(Keyword::Table);
        let table = self.parse_table_ref()?;
        Ok(TruncateStmt { table })
    }

    /// GRANT is a compatibility no-op: swallow everything up to the end of
    /// the statement.
    fn parse_grant(&mut self) {
        loop {
            match self.current {
                Token::Semicolon | Token::Eof => break,
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn parse_expr(&mut self, min_bp: u8) -> Result<Expr<'a>> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let op = match self.peek() {
                Token::Keyword(Keyword::Or) => Some((BinaryOperator::Or, 2, 3)),
                Token::Keyword(Keyword::And) => Some((BinaryOperator::And, 4, 5)),
                Token::Eq => Some((BinaryOperator::Eq, 6, 7)),
                Token::NotEq => Some((BinaryOperator::NotEq, 6, 7)),
                Token::Lt => Some((BinaryOperator::Lt, 6, 7)),
                Token::LtEq => Some((BinaryOperator::LtEq, 6, 7)),
                Token::Gt => Some((BinaryOperator::Gt, 6, 7)),
                Token::GtEq => Some((BinaryOperator::GtEq, 6, 7)),
                Token::Plus => Some((BinaryOperator::Plus, 10, 11)),
                Token::Minus => Some((BinaryOperator::Minus, 10, 11)),
                Token::Star => Some((BinaryOperator::Multiply, 12, 13)),
                Token::Slash => Some((BinaryOperator::Divide, 12, 13)),
                _ => None,
            };

            if let Some((op, l_bp, r_bp)) = op {
                if l_bp < min_bp {
                    break;
                }
                self.advance();
                let rhs = self.parse_expr(r_bp)?;
                lhs = Expr::Binary {
                    left: self.arena.alloc(lhs),
                    op,
                    right: self.arena.alloc(rhs),
                };
                continue;
            }

            if self.check_keyword(Keyword::Is) {
                if 6 < min_bp {
                    break;
                }
                self.advance();
                let negated = self.consume_keyword(Keyword::Not);
                self.expect_keyword(Keyword::Null)?;
                lhs = Expr::IsNull {
                    expr: self.arena.alloc(lhs),
                    negated,
                };
                continue;
            }

            let negated = if self.check_keyword(Keyword::Not) {
                if 6 < min_bp {
                    break;
                }
                self.advance();
                true
            } else {
                false
            };

            if self.check_keyword(Keyword::In) {
                if 6 < min_bp {
                    break;
                }
                self.advance();
                self.expect_token(&Token::LParen)?;
                let mut list = bumpalo::collections::Vec::new_in(self.arena);
                loop {
                    let expr = self.parse_expr(0)?;
                    list.push(&*self.arena.alloc(expr));
                    if !self.consume_token(&Token::Comma) {
                        break;
                    }
                }
                self.expect_token(&Token::RParen)?;
                lhs = Expr::InList {
                    expr: self.arena.alloc(lhs),
                    negated,
                    list: list.into_bump_slice(),
                };
                continue;
            }

            if negated {
                bail!("parsing error: expected IN after NOT");
            }

            break;
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expr<'a>> {
        if let Token::Error(msg) = self.current {
            bail!("parsing error: {}", msg);
        }
        match self.current {
            Token::Integer(n) => {
                self.advance();
                Ok(Expr::Literal(Literal::Integer(n)))
            }
            Token::Float(n) => {
                self.advance();
                Ok(Expr::Literal(Literal::Float(n)))
            }
            Token::String(s) => {
                self.advance();
                Ok(Expr::Literal(Literal::String(s)))
            }
            Token::Keyword(Keyword::True) => {
                self.advance();
                Ok(Expr::Literal(Literal::Boolean(true)))
            }
            Token::Keyword(Keyword::False) => {
                self.advance();
                Ok(Expr::Literal(Literal::Boolean(false)))
            }
            Token::Keyword(Keyword::Null) => {
                self.advance();
                Ok(Expr::Literal(Literal::Null))
            }
            Token::Keyword(Keyword::Default) => {
                self.advance();
                Ok(Expr::Default)
            }
            Token::Parameter(p) => {
                self.advance();
                Ok(Expr::Parameter(p))
            }
            Token::Minus => {
                self.advance();
                match self.current {
                    Token::Integer(n) => {
                        self.advance();
                        let negated = bumpalo::format!(in self.arena, "-{}", n);
                        Ok(Expr::Literal(Literal::Integer(negated.into_bump_str())))
                    }
                    Token::Float(n) => {
                        self.advance();
                        let negated = bumpalo::format!(in self.arena, "-{}", n);
                        Ok(Expr::Literal(Literal::Float(negated.into_bump_str())))
                    }
                    ref other => bail!(
                        "parsing error: expected number after '-', found {}",
                        describe(other)
                    ),
                }
            }
            Token::Keyword(Keyword::Now) | Token::Keyword(Keyword::Localtimestamp) => {
                self.advance();
                self.consume_empty_call_parens()?;
                Ok(Expr::Function(FunctionCall::Now))
            }
            Token::Keyword(Keyword::CurrentSchema) => {
                self.advance();
                self.consume_empty_call_parens()?;
                Ok(Expr::Function(FunctionCall::CurrentSchema))
            }
            Token::Keyword(Keyword::CurrentDatabase) => {
                self.advance();
                self.consume_empty_call_parens()?;
                Ok(Expr::Function(FunctionCall::CurrentDatabase))
            }
            Token::Keyword(Keyword::Count) => {
                self.advance();
                self.expect_token(&Token::LParen)?;
                let arg = if self.consume_token(&Token::Star) {
                    CountArg::Star
                } else {
                    CountArg::Column(self.parse_column_ref()?)
                };
                self.expect_token(&Token::RParen)?;
                Ok(Expr::Function(FunctionCall::Count(arg)))
            }
            Token::Ident(_) | Token::QuotedIdent(_) => {
                Ok(Expr::Column(self.parse_column_ref()?))
            }
            Token::LParen => {
                self.advance();
                let first = self.parse_expr(0)?;

                if self.consume_token(&Token::Comma) {
                    // Tuple expression: must be followed by [NOT] IN.
                    let mut exprs = bumpalo::collections::Vec::new_in(self.arena);
                    exprs.push(&*self.arena.alloc(first));
                    loop {
                        let expr = self.parse_expr(0)?;
                        exprs.push(&*self.arena.alloc(expr));
                        if !self.consume_token(&Token::Comma) {
                            break;
                        }
                    }
                    self.expect_token(&Token::RParen)?;

                    let negated = if self.consume_keyword(Keyword::Not) {
                        true
                    } else {
                        false
                    };
                    self.expect_keyword(Keyword::In)?;
                    let rows = self.parse_tuple_rows()?;
                    return Ok(Expr::TupleIn {
                        exprs: exprs.into_bump_slice(),
                        negated,
                        rows,
                    });
                }

                self.expect_token(&Token::RParen)?;
                Ok(first)
            }
            ref other => bail!(
                "parsing error: unexpected {} in expression at line {} column {}",
                describe(other),
                self.lexer.line(),
                self.lexer.column()
            ),
        }
    }

    fn parse_tuple_rows(&mut self) -> Result<&'a [&'a [&'a Expr<'a>]]> {
        self.expect_token(&Token::LParen)?;
        let mut rows = bumpalo::collections::Vec::new_in(self.arena);
        loop {
            self.expect_token(&Token::LParen)?;
            let mut row = bumpalo::collections::Vec::new_in(self.arena);
            loop {
                let expr = self.parse_expr(0)?;
                row.push(&*self.arena.alloc(expr));
                if !self.consume_token(&Token::Comma) {
                    break;
                }
            }
            self.expect_token(&Token::RParen)?;
            rows.push(&*self.arena.alloc_slice_copy(&row));
            if !self.consume_token(&Token::Comma) {
                break;
            }
        }
        self.expect_token(&Token::RParen)?;
        Ok(rows.into_bump_slice())
    }

    fn consume_empty_call_parens(&mut self) -> Result<()> {
        if self.consume_token(&Token::LParen) {
            self.expect_token(&Token::RParen)?;
        }
        Ok(())
    }
}

/// Human-readable token description for error messages, preserving the
/// user's lexeme where one exists.
fn describe(token: &Token<'_>) -> String {
    match token {
        Token::Keyword(k) => format!("{:?}", k).to_uppercase(),
        Token::Ident(s) | Token::QuotedIdent(s) => format!("identifier \"{}\"", s),
        Token::String(s) => format!("string '{}'", s),
        Token::Integer(s) | Token::Float(s) => format!("number {}", s),
        Token::Parameter(Parameter::Positional(n)) => format!("parameter ${}", n),
        Token::Parameter(Parameter::Named(n)) => format!("parameter :{}", n),
        Token::Parameter(Parameter::Anonymous) => "parameter ?".to_string(),
        Token::Eof => "end of statement".to_string(),
        Token::Error(msg) => (*msg).to_string(),
        other => format!("{:?}", other),
    }
}
