//! Restricted expressions over row columns.
//!
//! Two small languages share one lexer:
//! - label expressions: `est_sig + "\n" + confint`, `round(est, 3)`
//! - predicates: `est > 0 & pval < .05`, `!(op == "~~")`

use crate::error::{Error, Result};
use crate::model::{Cell, Row};
use crate::params::format_fixed;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Ident(String),
    Str(String),
    Number(f64),
    Plus,
    Comma,
    LParen,
    RParen,
    Cmp(CompareOp),
    And,
    Or,
    Not,
}

struct Lexer<'input> {
    input: &'input str,
    pos: usize,
}

impl<'input> Lexer<'input> {
    fn new(input: &'input str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + offset).copied()
    }

    fn skip_ws(&mut self) {
        while let Some(b) = self.peek() {
            if !b.is_ascii_whitespace() {
                break;
            }
            self.pos += 1;
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Expression {
            input: self.input.to_string(),
            message: message.into(),
        }
    }

    fn lex_string(&mut self, quote: u8) -> Result<Tok> {
        self.pos += 1;
        let mut out = String::new();
        let mut chars = self.input[self.pos..].char_indices();
        while let Some((i, ch)) = chars.next() {
            if ch as u32 == quote as u32 {
                self.pos += i + 1;
                return Ok(Tok::Str(out));
            }
            if ch == '\\' {
                match chars.next() {
                    Some((_, 'n')) => out.push('\n'),
                    Some((_, 't')) => out.push('\t'),
                    Some((_, other)) => out.push(other),
                    None => break,
                }
                continue;
            }
            out.push(ch);
        }
        Err(self.error("unterminated string literal"))
    }

    fn lex_number(&mut self) -> Result<Tok> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() || b == b'.' {
                self.pos += 1;
                continue;
            }
            break;
        }
        let raw = &self.input[start..self.pos];
        raw.parse::<f64>()
            .map(Tok::Number)
            .map_err(|_| self.error(format!("invalid number `{raw}`")))
    }

    fn lex_ident(&mut self) -> Tok {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' {
                self.pos += 1;
                continue;
            }
            break;
        }
        Tok::Ident(self.input[start..self.pos].to_string())
    }

    fn next_token(&mut self) -> Option<Result<Tok>> {
        self.skip_ws();
        let b = self.peek()?;
        let two = |lexer: &mut Self, tok: Tok| {
            lexer.pos += 2;
            Some(Ok(tok))
        };
        let one = |lexer: &mut Self, tok: Tok| {
            lexer.pos += 1;
            Some(Ok(tok))
        };
        match (b, self.peek_at(1)) {
            (b'"' | b'\'', _) => Some(self.lex_string(b)),
            (b'=', Some(b'=')) => two(self, Tok::Cmp(CompareOp::Eq)),
            (b'!', Some(b'=')) => two(self, Tok::Cmp(CompareOp::Ne)),
            (b'<', Some(b'=')) => two(self, Tok::Cmp(CompareOp::Le)),
            (b'>', Some(b'=')) => two(self, Tok::Cmp(CompareOp::Ge)),
            (b'&', Some(b'&')) => two(self, Tok::And),
            (b'|', Some(b'|')) => two(self, Tok::Or),
            (b'<', _) => one(self, Tok::Cmp(CompareOp::Lt)),
            (b'>', _) => one(self, Tok::Cmp(CompareOp::Gt)),
            (b'&', _) => one(self, Tok::And),
            (b'|', _) => one(self, Tok::Or),
            (b'!', _) => one(self, Tok::Not),
            (b'+', _) => one(self, Tok::Plus),
            (b',', _) => one(self, Tok::Comma),
            (b'(', _) => one(self, Tok::LParen),
            (b')', _) => one(self, Tok::RParen),
            (b'-', Some(n)) if n.is_ascii_digit() || n == b'.' => Some(self.lex_number()),
            (b'.', Some(n)) if n.is_ascii_digit() => Some(self.lex_number()),
            (b, _) if b.is_ascii_digit() => Some(self.lex_number()),
            (b, _) if b.is_ascii_alphabetic() || b == b'_' => Some(Ok(self.lex_ident())),
            _ => Some(Err(self.error(format!(
                "unexpected character `{}` at {}",
                self.input[self.pos..].chars().next().unwrap_or('?'),
                self.pos
            )))),
        }
    }

    fn tokenize(mut self) -> Result<Vec<Tok>> {
        let mut out = Vec::new();
        while let Some(tok) = self.next_token() {
            out.push(tok?);
        }
        Ok(out)
    }
}

struct Parser<'a> {
    input: &'a str,
    toks: Vec<Tok>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self> {
        Ok(Self {
            input,
            toks: Lexer::new(input).tokenize()?,
            pos: 0,
        })
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Expression {
            input: self.input.to_string(),
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<&Tok> {
        self.toks.get(self.pos)
    }

    fn bump(&mut self) -> Option<Tok> {
        let tok = self.toks.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn eat(&mut self, tok: &Tok) -> bool {
        if self.peek() == Some(tok) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn expect(&mut self, tok: &Tok, what: &str) -> Result<()> {
        if self.eat(tok) {
            return Ok(());
        }
        Err(self.error(format!("expected {what}")))
    }

    fn finish(&self) -> Result<()> {
        match self.peek() {
            None => Ok(()),
            Some(tok) => Err(self.error(format!("unexpected trailing token {tok:?}"))),
        }
    }

    fn label(&mut self) -> Result<LabelExpr> {
        let mut parts = vec![self.label_term()?];
        while self.eat(&Tok::Plus) {
            parts.push(self.label_term()?);
        }
        Ok(if parts.len() == 1 {
            parts.remove(0)
        } else {
            LabelExpr::Concat(parts)
        })
    }

    fn label_term(&mut self) -> Result<LabelExpr> {
        match self.bump() {
            Some(Tok::Str(s)) => Ok(LabelExpr::Literal(s)),
            Some(Tok::Ident(name)) if self.peek() == Some(&Tok::LParen) => self.label_call(name),
            Some(Tok::Ident(name)) => Ok(LabelExpr::Column(name)),
            Some(Tok::LParen) => {
                let inner = self.label()?;
                self.expect(&Tok::RParen, "`)`")?;
                Ok(inner)
            }
            _ => Err(self.error("expected a column, string literal or `round(...)`")),
        }
    }

    fn label_call(&mut self, name: String) -> Result<LabelExpr> {
        if name != "round" {
            return Err(self.error(format!("unknown function `{name}`")));
        }
        self.expect(&Tok::LParen, "`(`")?;
        let Some(Tok::Ident(column)) = self.bump() else {
            return Err(self.error("round() expects a column name"));
        };
        let digits = if self.eat(&Tok::Comma) {
            match self.bump() {
                Some(Tok::Number(d)) if d >= 0.0 && d.fract() == 0.0 => d as usize,
                _ => return Err(self.error("round() digits must be a non-negative integer")),
            }
        } else {
            0
        };
        self.expect(&Tok::RParen, "`)`")?;
        Ok(LabelExpr::Round { column, digits })
    }

    fn predicate(&mut self) -> Result<Predicate> {
        let mut lhs = self.conjunction()?;
        while self.eat(&Tok::Or) {
            let rhs = self.conjunction()?;
            lhs = Predicate::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn conjunction(&mut self) -> Result<Predicate> {
        let mut lhs = self.unary()?;
        while self.eat(&Tok::And) {
            let rhs = self.unary()?;
            lhs = Predicate::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Predicate> {
        if self.eat(&Tok::Not) {
            return Ok(Predicate::Not(Box::new(self.unary()?)));
        }
        if self.eat(&Tok::LParen) {
            let inner = self.predicate()?;
            self.expect(&Tok::RParen, "`)`")?;
            return Ok(inner);
        }
        let Some(Tok::Ident(column)) = self.bump() else {
            return Err(self.error("expected a column name"));
        };
        let Some(Tok::Cmp(op)) = self.peek().cloned() else {
            return Ok(Predicate::Truthy(column));
        };
        self.pos += 1;
        let value = match self.bump() {
            Some(Tok::Number(v)) => Literal::Number(v),
            Some(Tok::Str(s)) => Literal::Text(s),
            Some(Tok::Ident(word)) if word == "true" || word == "TRUE" => Literal::Bool(true),
            Some(Tok::Ident(word)) if word == "false" || word == "FALSE" => Literal::Bool(false),
            _ => return Err(self.error("expected a number, string or boolean literal")),
        };
        Ok(Predicate::Compare { column, op, value })
    }
}

/// Label built from row columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LabelExpr {
    Column(String),
    Literal(String),
    Round { column: String, digits: usize },
    Concat(Vec<LabelExpr>),
}

impl LabelExpr {
    pub fn column(name: impl Into<String>) -> Self {
        LabelExpr::Column(name.into())
    }

    pub fn parse(input: &str) -> Result<Self> {
        let mut parser = Parser::new(input)?;
        let expr = parser.label()?;
        parser.finish()?;
        Ok(expr)
    }

    /// Evaluates against `row`; missing columns contribute nothing.
    pub fn eval<R: Row + ?Sized>(&self, row: &R) -> String {
        let mut out = String::new();
        self.eval_into(row, &mut out);
        out
    }

    fn eval_into<R: Row + ?Sized>(&self, row: &R, out: &mut String) {
        match self {
            LabelExpr::Column(name) => out.push_str(&row.column(name).to_string()),
            LabelExpr::Literal(s) => out.push_str(s),
            LabelExpr::Round { column, digits } => match row.column(column) {
                Cell::Number(v) => out.push_str(&format_fixed(v, *digits)),
                other => out.push_str(&other.to_string()),
            },
            LabelExpr::Concat(parts) => {
                for part in parts {
                    part.eval_into(row, out);
                }
            }
        }
    }
}

/// Double-quoted string using only the escapes the lexer reads back.
fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for ch in s.chars() {
        match ch {
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '"' | '\\' => {
                f.write_char('\\')?;
                f.write_char(ch)?;
            }
            _ => f.write_char(ch)?,
        }
    }
    f.write_char('"')
}

impl fmt::Display for LabelExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelExpr::Column(name) => f.write_str(name),
            LabelExpr::Literal(s) => write_quoted(f, s),
            LabelExpr::Round { column, digits } => write!(f, "round({column}, {digits})"),
            LabelExpr::Concat(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" + ")?;
                    }
                    write!(f, "{part}")?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for LabelExpr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LabelExpr {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<LabelExpr> for String {
    fn from(value: LabelExpr) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    fn test(self, ord: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            CompareOp::Eq => ord == Equal,
            CompareOp::Ne => ord != Equal,
            CompareOp::Lt => ord == Less,
            CompareOp::Le => ord != Greater,
            CompareOp::Gt => ord == Greater,
            CompareOp::Ge => ord != Less,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(v) => write!(f, "{v}"),
            Literal::Text(s) => write_quoted(f, s),
            Literal::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Boolean condition over row columns. Comparisons with missing cells are false.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare {
        column: String,
        op: CompareOp,
        value: Literal,
    },
    /// A bare column name, true when the column holds `true`.
    Truthy(String),
    Not(Box<Predicate>),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    pub fn parse(input: &str) -> Result<Self> {
        let mut parser = Parser::new(input)?;
        let pred = parser.predicate()?;
        parser.finish()?;
        Ok(pred)
    }

    pub fn eval<R: Row + ?Sized>(&self, row: &R) -> bool {
        match self {
            Predicate::Compare { column, op, value } => {
                let cell = row.column(column);
                let ord = match (&cell, value) {
                    (Cell::Number(a), Literal::Number(b)) => a.partial_cmp(b),
                    (Cell::Text(a), Literal::Text(b)) => Some(a.as_str().cmp(b.as_str())),
                    (Cell::Bool(a), Literal::Bool(b)) => Some(a.cmp(b)),
                    (Cell::Text(a), Literal::Number(b)) => {
                        a.trim().parse::<f64>().ok().and_then(|a| a.partial_cmp(b))
                    }
                    _ => None,
                };
                ord.is_some_and(|ord| op.test(ord))
            }
            Predicate::Truthy(column) => matches!(row.column(column), Cell::Bool(true)),
            Predicate::Not(inner) => !inner.eval(row),
            Predicate::And(a, b) => a.eval(row) && b.eval(row),
            Predicate::Or(a, b) => a.eval(row) || b.eval(row),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare { column, op, value } => {
                write!(f, "{column} {} {value}", op.as_str())
            }
            Predicate::Truthy(column) => f.write_str(column),
            Predicate::Not(inner) => write!(f, "!({inner})"),
            Predicate::And(a, b) => write!(f, "({a} & {b})"),
            Predicate::Or(a, b) => write!(f, "({a} | {b})"),
        }
    }
}

impl FromStr for Predicate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
