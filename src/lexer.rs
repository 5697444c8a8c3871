//! Lexer — source text to a finite token stream.
//!
//! Single pass, stateless across tokens, non-restartable: callers wanting to
//! re-lex simply call [`lex`] again on the original source.

use crate::error::{CompileError, Span};
use std::iter::Peekable;
use std::str::CharIndices;

/// Arithmetic operator symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `^`
    Pow,
}

/// The kind of a lexical token, with its literal/identifier payload if any.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A decimal number literal, already parsed to `f64`.
    Number(f64),
    /// A letter/underscore-led identifier.
    Ident(String),
    /// One of `+ - * / ^`.
    Op(Operator),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
}

/// A token paired with the span of source text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token's kind and payload.
    pub kind: TokenKind,
    /// Where in the source this token was found.
    pub span: Span,
}

/// Lex `source` into a finite sequence of tokens.
///
/// Whitespace is skipped. Fails with [`CompileError::InvalidChar`] on any
/// character outside `[0-9a-zA-Z_.+\-*/^(),\s]`, or
/// [`CompileError::InvalidNumber`] if a numeric literal does not parse as a
/// finite `f64` (e.g. two decimal points, or a lone trailing exponent sign).
pub fn lex(source: &str) -> Result<Vec<Token>, CompileError> {
    let mut chars = source.char_indices().peekable();
    let mut tokens = Vec::new();

    while let Some(&(i, ch)) = chars.peek() {
        match ch {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '(' => push_single(&mut chars, &mut tokens, TokenKind::LParen, i),
            ')' => push_single(&mut chars, &mut tokens, TokenKind::RParen, i),
            ',' => push_single(&mut chars, &mut tokens, TokenKind::Comma, i),
            '+' => push_single(&mut chars, &mut tokens, TokenKind::Op(Operator::Add), i),
            '-' => push_single(&mut chars, &mut tokens, TokenKind::Op(Operator::Sub), i),
            '*' => push_single(&mut chars, &mut tokens, TokenKind::Op(Operator::Mul), i),
            '/' => push_single(&mut chars, &mut tokens, TokenKind::Op(Operator::Div), i),
            '^' => push_single(&mut chars, &mut tokens, TokenKind::Op(Operator::Pow), i),
            '0'..='9' | '.' => {
                let (text, end) = scan_number(source, &mut chars, i);
                let value = text
                    .parse::<f64>()
                    .ok()
                    .filter(|v: &f64| v.is_finite())
                    .ok_or_else(|| CompileError::InvalidNumber {
                        text: text.to_string(),
                        span: Span::new(i, end),
                    })?;
                tokens.push(Token { kind: TokenKind::Number(value), span: Span::new(i, end) });
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut end = i;
                let mut name = String::new();
                while let Some(&(j, c)) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        name.push(c);
                        end = j + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token { kind: TokenKind::Ident(name), span: Span::new(i, end) });
            }
            other => return Err(CompileError::InvalidChar { ch: other, span: Span::at(i) }),
        }
    }

    Ok(tokens)
}

fn push_single(
    chars: &mut Peekable<CharIndices<'_>>,
    tokens: &mut Vec<Token>,
    kind: TokenKind,
    pos: usize,
) {
    chars.next();
    tokens.push(Token { kind, span: Span::at(pos) });
}

/// Greedily consume a numeric literal starting at byte offset `start`:
/// digits, an optional single `.`, and an optional exponent (`e`/`E`,
/// optional sign, digits). Returns the literal text and its end offset;
/// does not validate the result beyond stopping at the first character
/// that cannot extend a numeric literal — [`lex`] parses and validates the
/// slice afterwards so malformed input (e.g. `3.14.15`) surfaces as one
/// `InvalidNumber` rather than a partial token.
fn scan_number(
    source: &str,
    chars: &mut Peekable<CharIndices<'_>>,
    start: usize,
) -> (String, usize) {
    let mut end = start;

    while let Some(&(j, c)) = chars.peek() {
        match c {
            // Greedily consume every digit/dot, even a second `.` — letting
            // a malformed literal like "3.14.15" fail at `f64` parsing keeps
            // the error a single InvalidNumber over the whole run instead of
            // silently splitting it into two valid numbers.
            '0'..='9' | '.' => {
                end = j + 1;
                chars.next();
            }
            'e' | 'E' => {
                end = j + 1;
                chars.next();
                if let Some(&(k, sign)) = chars.peek() {
                    if sign == '+' || sign == '-' {
                        end = k + 1;
                        chars.next();
                    }
                }
                while let Some(&(k, d)) = chars.peek() {
                    if d.is_ascii_digit() {
                        end = k + 1;
                        chars.next();
                    } else {
                        break;
                    }
                }
                break;
            }
            _ => break,
        }
    }

    (source[start..end].to_string(), end)
}
