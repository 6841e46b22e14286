//! # SQL Processing Module
//!
//! SQL front end: tokens, lexer, AST, and parser. The implementation is
//! zero-copy where possible — tokens and AST nodes borrow from the original
//! input string, and AST nodes live in a bump arena owned by the caller.
//!
//! ## Module Structure
//!
//! - `token`: token and keyword definitions
//! - `lexer`: zero-copy SQL tokenizer
//! - `ast`: typed, arena-allocated statement tree
//! - `parser`: recursive descent parser with Pratt expressions
//!
//! ## Supported SQL
//!
//! A PostgreSQL-compatible dialect:
//!
//! - DML: SELECT (joins, aliases, DISTINCT [ON], ORDER BY, LIMIT/OFFSET,
//!   FOR UPDATE), INSERT (multi-row VALUES, ON CONFLICT, RETURNING),
//!   UPDATE, DELETE
//! - DDL: CREATE TABLE / SCHEMA / INDEX, DROP TABLE / SCHEMA, TRUNCATE
//! - Compatibility: GRANT (parsed, no-op)
//! - Parameters: `$N`, `?`, `:name`
//!
//! ## Example
//!
//! ```ignore
//! use bumpalo::Bump;
//! use ephemdb::sql::{Parser, Statement};
//!
//! let arena = Bump::new();
//! let mut parser = Parser::new("SELECT id, name FROM users WHERE id = $1", &arena);
//! let statements = parser.parse()?;
//! assert!(matches!(statements[0], Statement::Select(_)));
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::*;
pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{Keyword, Parameter, Span, Token};
