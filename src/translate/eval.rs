//! Restricted evaluation of rewritten phrases.
//!
//! Marker forms (`^2`, `^3`, `sqrt(`, `sq(`, `cube(`) are handled by pattern
//! extraction. Everything else goes through a small precedence-climbing
//! evaluator over `+ - * / ( )` and decimal literals.

use super::rules::{CUBE_OPEN, CUBED, SQRT_OPEN, SQUARE_OPEN, SQUARED};
use crate::error::CalcError;
use crate::unary;

/// Parentheses deeper than this are rejected.
const MAX_DEPTH: usize = 64;

fn failure(message: impl Into<String>) -> CalcError {
    CalcError::TranslationFailure(message.into())
}

/// Evaluates the output of the rewrite pipeline.
pub fn evaluate_rewritten(expression: &str) -> Result<f64, CalcError> {
    if let Some((base, _)) = expression.split_once(SQUARED) {
        return Ok(unary::square(evaluate_arithmetic(base)?));
    }
    if let Some((base, _)) = expression.split_once(CUBED) {
        return Ok(unary::cube(evaluate_arithmetic(base)?));
    }
    if let Some(argument) = marker_argument(expression, SQRT_OPEN) {
        return unary::square_root(evaluate_arithmetic(argument)?);
    }
    for (marker, default_exponent) in [(SQUARE_OPEN, 2.0), (CUBE_OPEN, 3.0)] {
        if let Some(arguments) = marker_argument(expression, marker) {
            let mut parts = arguments.split(',');
            let base = evaluate_arithmetic(parts.next().unwrap_or(""))?;
            let exponent = match parts.next() {
                Some(part) => evaluate_arithmetic(part)?,
                None => default_exponent,
            };
            if parts.next().is_some() {
                return Err(failure("a power takes at most two arguments"));
            }
            return Ok(unary::power(base, exponent));
        }
    }

    evaluate_arithmetic(expression)
}

/// Text between `marker` and the next `)`, or the end of input when the
/// parenthesis was never closed.
fn marker_argument<'a>(expression: &'a str, marker: &str) -> Option<&'a str> {
    let start = expression.find(marker)? + marker.len();
    let rest = &expression[start..];
    Some(rest.find(')').map_or(rest, |end| &rest[..end]))
}

/// Drops every character outside the digit, operator, parenthesis and
/// whitespace set.
pub fn sanitize(expression: &str) -> String {
    expression
        .chars()
        .filter(|c| c.is_ascii_digit() || "+-*/().".contains(*c) || c.is_whitespace())
        .collect()
}

/// Sanitizes and evaluates plain arithmetic with the usual precedence.
pub fn evaluate_arithmetic(expression: &str) -> Result<f64, CalcError> {
    let tokens = tokenize(&sanitize(expression))?;
    if tokens.is_empty() {
        return Err(failure("nothing left to evaluate"));
    }
    Parser::new(&tokens).parse()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(expression: &str) -> Result<Vec<Token>, CalcError> {
    let mut tokens = Vec::new();
    let mut chars = expression.chars().peekable();

    while let Some(c) = chars.next() {
        let token = match c {
            '0'..='9' | '.' => {
                let mut literal = String::from(c);
                while let Some(&next) = chars.peek() {
                    if !(next.is_ascii_digit() || next == '.') {
                        break;
                    }
                    literal.push(next);
                    chars.next();
                }
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| failure(format!("invalid number '{}'", literal)))?;
                Token::Number(value)
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            c if c.is_whitespace() => continue,
            other => return Err(failure(format!("unexpected character '{}'", other))),
        };
        tokens.push(token);
    }

    Ok(tokens)
}

/// Binding power of a binary operator token.
fn precedence(token: Token) -> Option<u8> {
    match token {
        Token::Plus | Token::Minus => Some(1),
        Token::Star | Token::Slash => Some(2),
        _ => None,
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    fn parse(mut self) -> Result<f64, CalcError> {
        let value = self.parse_expression(1, 0)?;
        if self.position != self.tokens.len() {
            return Err(failure(format!(
                "unexpected token at position {}",
                self.position
            )));
        }
        Ok(value)
    }

    fn parse_expression(&mut self, min_prec: u8, depth: usize) -> Result<f64, CalcError> {
        if depth > MAX_DEPTH {
            return Err(failure("expression nesting is too deep"));
        }

        let mut lhs = self.parse_prefix(depth)?;

        while let Some(&op) = self.tokens.get(self.position) {
            let Some(prec) = precedence(op) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            self.position += 1;
            // All four operators are left-associative.
            let rhs = self.parse_expression(prec + 1, depth + 1)?;
            lhs = match op {
                Token::Plus => lhs + rhs,
                Token::Minus => lhs - rhs,
                Token::Star => lhs * rhs,
                // Division by zero yields an infinity, not an error.
                _ => lhs / rhs,
            };
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self, depth: usize) -> Result<f64, CalcError> {
        if depth > MAX_DEPTH {
            return Err(failure("expression nesting is too deep"));
        }

        // A run of signs folds into one, however long it is.
        let mut negative = false;
        while let Some(sign @ (Token::Minus | Token::Plus)) = self.tokens.get(self.position) {
            negative ^= *sign == Token::Minus;
            self.position += 1;
        }

        let value = self.parse_operand(depth)?;
        Ok(if negative { -value } else { value })
    }

    fn parse_operand(&mut self, depth: usize) -> Result<f64, CalcError> {
        let token = self
            .tokens
            .get(self.position)
            .copied()
            .ok_or_else(|| failure("unexpected end of expression"))?;
        self.position += 1;

        match token {
            Token::Number(value) => Ok(value),
            Token::LParen => {
                let value = self.parse_expression(1, depth + 1)?;
                match self.tokens.get(self.position) {
                    Some(Token::RParen) => {
                        self.position += 1;
                        Ok(value)
                    }
                    _ => Err(failure("missing closing ')'")),
                }
            }
            _ => Err(failure(format!(
                "unexpected token at position {}",
                self.position - 1
            ))),
        }
    }
}
