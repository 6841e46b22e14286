//! # SQL Lexer - Zero-Copy Tokenizer
//!
//! This module implements the SQL lexer. All string tokens (identifiers,
//! literals) are borrowed slices pointing directly into the input string;
//! tokenization never allocates.
//!
//! ## Design
//!
//! 1. **Zero-copy tokenization**: tokens borrow from input
//! 2. **O(1) keyword lookup**: phf perfect hash map over uppercase lexemes
//! 3. **Rich positions**: line/column tracking for every token
//!
//! ## Identifiers and Literals
//!
//! - Unquoted identifiers: `[A-Za-z_][A-Za-z0-9_]*`, keyword-checked
//! - Double-quoted identifiers: `"Order"`, `""` escapes a quote
//! - String literals: single-quoted, `''` escapes a quote
//! - Numbers: integers, decimal floats, exponent notation
//!
//! ## Parameters
//!
//! `$N` positional, `:name` named, `?` anonymous/ordinal.
//!
//! ## Comments
//!
//! `-- line` and `/* block */` comments are skipped as whitespace.
//!
//! ## Error Handling
//!
//! Invalid input produces `Token::Error` with a static message; the parser
//! turns it into a parsing error citing the position.

use super::token::{Keyword, Parameter, Span, Token};
use phf::phf_map;

static KEYWORDS: phf::Map<&'static str, Keyword> = phf_map! {
    "SELECT" => Keyword::Select,
    "FROM" => Keyword::From,
    "WHERE" => Keyword::Where,
    "JOIN" => Keyword::Join,
    "INNER" => Keyword::Inner,
    "ON" => Keyword::On,
    "INSERT" => Keyword::Insert,
    "INTO" => Keyword::Into,
    "VALUES" => Keyword::Values,
    "UPDATE" => Keyword::Update,
    "SET" => Keyword::Set,
    "DELETE" => Keyword::Delete,
    "CREATE" => Keyword::Create,
    "TABLE" => Keyword::Table,
    "SCHEMA" => Keyword::Schema,
    "INDEX" => Keyword::Index,
    "PRIMARY" => Keyword::Primary,
    "KEY" => Keyword::Key,
    "FOREIGN" => Keyword::Foreign,
    "REFERENCES" => Keyword::References,
    "CONSTRAINT" => Keyword::Constraint,
    "UNIQUE" => Keyword::Unique,
    "DEFAULT" => Keyword::Default,
    "NOT" => Keyword::Not,
    "NULL" => Keyword::Null,
    "IS" => Keyword::Is,
    "IN" => Keyword::In,
    "AND" => Keyword::And,
    "OR" => Keyword::Or,
    "ORDER" => Keyword::Order,
    "BY" => Keyword::By,
    "ASC" => Keyword::Asc,
    "DESC" => Keyword::Desc,
    "LIMIT" => Keyword::Limit,
    "OFFSET" => Keyword::Offset,
    "FOR" => Keyword::For,
    "DISTINCT" => Keyword::Distinct,
    "CONFLICT" => Keyword::Conflict,
    "DO" => Keyword::Do,
    "NOTHING" => Keyword::Nothing,
    "RETURNING" => Keyword::Returning,
    "TRUE" => Keyword::True,
    "FALSE" => Keyword::False,
    "COUNT" => Keyword::Count,
    "CURRENT_SCHEMA" => Keyword::CurrentSchema,
    "CURRENT_DATABASE" => Keyword::CurrentDatabase,
    "NOW" => Keyword::Now,
    "LOCALTIMESTAMP" => Keyword::Localtimestamp,
    "AUTOINCREMENT" => Keyword::Autoincrement,
    "AUTO_INCREMENT" => Keyword::Autoincrement,
    "IF" => Keyword::If,
    "EXISTS" => Keyword::Exists,
    "AS" => Keyword::As,
    "GRANT" => Keyword::Grant,
    "TRUNCATE" => Keyword::Truncate,
    "DROP" => Keyword::Drop,
    "USING" => Keyword::Using,
    "HASH" => Keyword::Hash,
    "BTREE" => Keyword::Btree,
    "TO" => Keyword::To,
    "ALL" => Keyword::All,
    "WITH" => Keyword::With,
    "WITHOUT" => Keyword::Without,
    "TIME" => Keyword::Time,
    "ZONE" => Keyword::Zone,
    "PRECISION" => Keyword::Precision,
    "VARYING" => Keyword::Varying,
    "INT" => Keyword::Int,
    "INT2" => Keyword::Smallint,
    "INT4" => Keyword::Int,
    "INT8" => Keyword::Bigint,
    "INTEGER" => Keyword::Integer,
    "SMALLINT" => Keyword::Smallint,
    "BIGINT" => Keyword::Bigint,
    "BIGSERIAL" => Keyword::Bigserial,
    "SERIAL" => Keyword::Serial,
    "FLOAT" => Keyword::Float,
    "REAL" => Keyword::Real,
    "DOUBLE" => Keyword::Double,
    "DECIMAL" => Keyword::Decimal,
    "NUMERIC" => Keyword::Numeric,
    "VARCHAR" => Keyword::Varchar,
    "CHAR" => Keyword::Char,
    "CHARACTER" => Keyword::Character,
    "TEXT" => Keyword::Text,
    "BOOL" => Keyword::Bool,
    "BOOLEAN" => Keyword::Boolean,
    "TIMESTAMP" => Keyword::Timestamp,
    "TIMESTAMPTZ" => Keyword::Timestamptz,
    "DATE" => Keyword::Date,
};

pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    column: u32,
    token_start: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
            token_start: 0,
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn span(&self) -> Span {
        Span::new(self.token_start, self.pos - self.token_start)
    }

    pub fn next_token(&mut self) -> Token<'a> {
        self.skip_whitespace_and_comments();
        self.token_start = self.pos;

        if self.is_eof() {
            return Token::Eof;
        }

        let ch = self.current();

        if ch.is_ascii_alphabetic() || ch == b'_' {
            return self.scan_identifier_or_keyword();
        }

        if ch.is_ascii_digit() {
            return self.scan_number();
        }

        match ch {
            b'\'' => self.scan_string(),
            b'"' => self.scan_quoted_identifier(),
            b'$' => self.scan_positional_param(),
            b':' => self.scan_named_param(),
            b'?' => {
                self.advance();
                Token::Parameter(Parameter::Anonymous)
            }
            b'=' => {
                self.advance();
                Token::Eq
            }
            b'<' => {
                self.advance();
                match self.current_opt() {
                    Some(b'>') => {
                        self.advance();
                        Token::NotEq
                    }
                    Some(b'=') => {
                        self.advance();
                        Token::LtEq
                    }
                    _ => Token::Lt,
                }
            }
            b'>' => {
                self.advance();
                if self.current_opt() == Some(b'=') {
                    self.advance();
                    Token::GtEq
                } else {
                    Token::Gt
                }
            }
            b'!' => {
                self.advance();
                if self.current_opt() == Some(b'=') {
                    self.advance();
                    Token::NotEq
                } else {
                    Token::Error("unexpected '!'")
                }
            }
            b'+' => {
                self.advance();
                Token::Plus
            }
            b'-' => {
                self.advance();
                Token::Minus
            }
            b'*' => {
                self.advance();
                Token::Star
            }
            b'/' => {
                self.advance();
                Token::Slash
            }
            b'(' => {
                self.advance();
                Token::LParen
            }
            b')' => {
                self.advance();
                Token::RParen
            }
            b',' => {
                self.advance();
                Token::Comma
            }
            b';' => {
                self.advance();
                Token::Semicolon
            }
            b'.' => {
                self.advance();
                Token::Dot
            }
            _ => {
                self.advance();
                Token::Error("unexpected character")
            }
        }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn current(&self) -> u8 {
        self.bytes[self.pos]
    }

    fn current_opt(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_char(&self) -> Option<u8> {
        self.bytes.get(self.pos + 1).copied()
    }

    fn advance(&mut self) {
        if !self.is_eof() {
            if self.current() == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.pos += 1;
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while !self.is_eof() {
                match self.current() {
                    b' ' | b'\t' | b'\r' | b'\n' => self.advance(),
                    _ => break,
                }
            }

            if self.current_opt() == Some(b'-') && self.peek_char() == Some(b'-') {
                while !self.is_eof() && self.current() != b'\n' {
                    self.advance();
                }
                continue;
            }

            if self.current_opt() == Some(b'/') && self.peek_char() == Some(b'*') {
                self.advance();
                self.advance();
                while !self.is_eof() {
                    if self.current() == b'*' && self.peek_char() == Some(b'/') {
                        self.advance();
                        self.advance();
                        break;
                    }
                    self.advance();
                }
                continue;
            }

            break;
        }
    }

    fn scan_identifier_or_keyword(&mut self) -> Token<'a> {
        let start = self.pos;

        while !self.is_eof() && (self.current().is_ascii_alphanumeric() || self.current() == b'_') {
            self.advance();
        }

        let ident = &self.input[start..self.pos];
        let upper = ident.to_ascii_uppercase();

        if let Some(&keyword) = KEYWORDS.get(&upper) {
            Token::Keyword(keyword)
        } else {
            Token::Ident(ident)
        }
    }

    fn scan_number(&mut self) -> Token<'a> {
        let start = self.pos;

        while !self.is_eof() && self.current().is_ascii_digit() {
            self.advance();
        }

        let mut is_float = false;

        if !self.is_eof() && self.current() == b'.' {
            if let Some(next) = self.peek_char() {
                if next.is_ascii_digit() {
                    is_float = true;
                    self.advance();
                    while !self.is_eof() && self.current().is_ascii_digit() {
                        self.advance();
                    }
                }
            }
        }

        if !self.is_eof() && (self.current() == b'e' || self.current() == b'E') {
            let mut lookahead = self.pos + 1;
            if self.bytes.get(lookahead) == Some(&b'+') || self.bytes.get(lookahead) == Some(&b'-')
            {
                lookahead += 1;
            }
            if self
                .bytes
                .get(lookahead)
                .is_some_and(|b| b.is_ascii_digit())
            {
                is_float = true;
                self.advance();
                if self.current() == b'+' || self.current() == b'-' {
                    self.advance();
                }
                while !self.is_eof() && self.current().is_ascii_digit() {
                    self.advance();
                }
            }
        }

        let num = &self.input[start..self.pos];
        if is_float {
            Token::Float(num)
        } else {
            Token::Integer(num)
        }
    }

    fn scan_string(&mut self) -> Token<'a> {
        self.advance();
        let start = self.pos;

        loop {
            if self.is_eof() {
                return Token::Error("unterminated string");
            }

            if self.current() == b'\'' {
                if self.peek_char() == Some(b'\'') {
                    self.advance();
                    self.advance();
                } else {
                    let end = self.pos;
                    self.advance();
                    return Token::String(&self.input[start..end]);
                }
            } else {
                self.advance();
            }
        }
    }

    fn scan_quoted_identifier(&mut self) -> Token<'a> {
        self.advance();
        let start = self.pos;

        loop {
            if self.is_eof() {
                return Token::Error("unterminated quoted identifier");
            }

            if self.current() == b'"' {
                if self.peek_char() == Some(b'"') {
                    self.advance();
                    self.advance();
                } else {
                    let end = self.pos;
                    self.advance();
                    return Token::QuotedIdent(&self.input[start..end]);
                }
            } else {
                self.advance();
            }
        }
    }

    fn scan_positional_param(&mut self) -> Token<'a> {
        self.advance();
        let start = self.pos;

        while !self.is_eof() && self.current().is_ascii_digit() {
            self.advance();
        }

        if self.pos == start {
            return Token::Error("expected digits after '$'");
        }

        match self.input[start..self.pos].parse::<u32>() {
            Ok(n) if n >= 1 => Token::Parameter(Parameter::Positional(n)),
            _ => Token::Error("invalid positional parameter"),
        }
    }

    fn scan_named_param(&mut self) -> Token<'a> {
        self.advance();
        let start = self.pos;

        while !self.is_eof() && (self.current().is_ascii_alphanumeric() || self.current() == b'_') {
            self.advance();
        }

        if self.pos == start {
            return Token::Error("expected name after ':'");
        }

        Token::Parameter(Parameter::Named(&self.input[start..self.pos]))
    }
}
