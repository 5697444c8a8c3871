//! Parser — token stream to expression IR, and the IR type itself.
//!
//! Standard recursive-descent, precedence-climbing parser matching the
//! surface grammar:
//!
//! ```text
//! expr    = term     { ("+" | "-") term } .
//! term    = factor   { ("*" | "/") factor } .
//! factor  = unary    [ "^" factor ] .            (* right-recursive *)
//! unary   = [ "-" ] primary .
//! primary = number | ident [ "(" expr { "," expr } ")" ] | "(" expr ")" .
//! ```
//!
//! One precedence detail is not literally the textual grammar above: a
//! leading unary `-` wraps the *entire* right-associative power chain that
//! follows it, not just the immediate primary, so `-2^2` parses as
//! `-(2^2)` rather than `(-2)^2`. See `DESIGN.md` Open Question #1.

use crate::error::{CompileError, Span};
use crate::lexer::{Operator, Token, TokenKind};

/// A binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `^` (right-associative)
    Pow,
}

/// An unresolved expression tree: the output of parsing, the input to
/// lowering. A strict tree — no sharing, no cycles, each node owns its
/// children.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A finite numeric literal.
    Literal(f64),
    /// An unresolved variable reference by name.
    Variable(String),
    /// Unary negation.
    UnaryMinus(Box<Expr>),
    /// A binary operator application.
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    /// A function call with one or more argument subtrees, plus the span of
    /// the call's name (used to report `UnknownFunction`/`Arity` precisely).
    Call(String, Vec<Expr>, Span),
}

/// Parse a token stream into an [`Expr`] tree.
///
/// Fails with [`CompileError::UnexpectedToken`], `UnexpectedEndOfInput`, or
/// `TrailingTokens` on any grammar violation.
pub fn parse(tokens: &[Token]) -> Result<Expr, CompileError> {
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expr()?;
    if parser.pos < parser.tokens.len() {
        return Err(CompileError::TrailingTokens { span: parser.tokens[parser.pos].span });
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect_op(&mut self, want: Operator) -> bool {
        match self.peek() {
            Some(Token { kind: TokenKind::Op(op), .. }) if *op == want => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    /// `expr = term { ("+" | "-") term } .`
    fn parse_expr(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token { kind: TokenKind::Op(Operator::Add), .. }) => BinaryOp::Add,
                Some(Token { kind: TokenKind::Op(Operator::Sub), .. }) => BinaryOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    /// `term = factor { ("*" | "/") factor } .`
    fn parse_term(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token { kind: TokenKind::Op(Operator::Mul), .. }) => BinaryOp::Mul,
                Some(Token { kind: TokenKind::Op(Operator::Div), .. }) => BinaryOp::Div,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    /// `unary = "-" unary | factor .`
    ///
    /// Recursing on `unary` (rather than immediately descending to a bare
    /// primary) lets a leading minus absorb an entire power chain, which is
    /// what pins `-2^2 == -4` and `2^-3 == 0.125` simultaneously: a minus
    /// seen here always negates the full `factor` production, and a minus
    /// seen as a `^` exponent (via the recursive call in `parse_factor`)
    /// only negates that exponent's own power chain.
    fn parse_unary(&mut self) -> Result<Expr, CompileError> {
        if self.expect_op(Operator::Sub) {
            let inner = self.parse_unary()?;
            return Ok(Expr::UnaryMinus(Box::new(inner)));
        }
        self.parse_factor()
    }

    /// `factor = primary [ "^" unary ] .` (right-associative)
    fn parse_factor(&mut self) -> Result<Expr, CompileError> {
        let base = self.parse_primary()?;
        if self.expect_op(Operator::Pow) {
            let exponent = self.parse_unary()?;
            return Ok(Expr::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    /// `primary = number | ident [ "(" expr { "," expr } ")" ] | "(" expr ")" .`
    fn parse_primary(&mut self) -> Result<Expr, CompileError> {
        let tok = self.advance().ok_or(CompileError::UnexpectedEndOfInput)?;
        match &tok.kind {
            TokenKind::Number(n) => Ok(Expr::Literal(*n)),
            TokenKind::Ident(name) => {
                if matches!(self.peek(), Some(Token { kind: TokenKind::LParen, .. })) {
                    self.parse_call(name.clone(), tok.span)
                } else {
                    Ok(Expr::Variable(name.clone()))
                }
            }
            TokenKind::LParen => {
                let inner = self.parse_expr()?;
                self.expect_rparen()?;
                Ok(inner)
            }
            other => Err(CompileError::UnexpectedToken {
                expected: "expression".to_string(),
                got: describe(other),
                span: tok.span,
            }),
        }
    }

    fn parse_call(&mut self, name: String, name_span: Span) -> Result<Expr, CompileError> {
        self.pos += 1; // consume '('
        let mut args = Vec::new();

        self.reject_rparen_as_argument()?;
        loop {
            args.push(self.parse_expr()?);
            match self.peek() {
                Some(Token { kind: TokenKind::Comma, .. }) => {
                    self.pos += 1;
                    self.reject_rparen_as_argument()?;
                }
                _ => break,
            }
        }

        self.expect_rparen()?;
        Ok(Expr::Call(name, args, name_span))
    }

    /// Reject `)` where an argument expression is required — covers both an
    /// empty argument list (`f()`) and a trailing comma (`f(1, 2,)`).
    fn reject_rparen_as_argument(&self) -> Result<(), CompileError> {
        match self.peek() {
            Some(Token { kind: TokenKind::RParen, span }) => Err(CompileError::UnexpectedToken {
                expected: "an argument".to_string(),
                got: ")".to_string(),
                span: *span,
            }),
            _ => Ok(()),
        }
    }

    fn expect_rparen(&mut self) -> Result<(), CompileError> {
        match self.peek() {
            Some(Token { kind: TokenKind::RParen, .. }) => {
                self.pos += 1;
                Ok(())
            }
            Some(tok) => Err(CompileError::UnexpectedToken {
                expected: ")".to_string(),
                got: describe(&tok.kind),
                span: tok.span,
            }),
            None => Err(CompileError::UnexpectedEndOfInput),
        }
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Number(n) => format!("number '{n}'"),
        TokenKind::Ident(name) => format!("identifier '{name}'"),
        TokenKind::Op(Operator::Add) => "'+'".to_string(),
        TokenKind::Op(Operator::Sub) => "'-'".to_string(),
        TokenKind::Op(Operator::Mul) => "'*'".to_string(),
        TokenKind::Op(Operator::Div) => "'/'".to_string(),
        TokenKind::Op(Operator::Pow) => "'^'".to_string(),
        TokenKind::LParen => "'('".to_string(),
        TokenKind::RParen => "')'".to_string(),
        TokenKind::Comma => "','".to_string(),
    }
}
