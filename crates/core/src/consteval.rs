//! Constant-expression evaluator for enum value mappings.
//!
//! Accepts integer, float and string literals, unary and binary `+ - * /`,
//! and `( )` / `[ ]` grouping. Strings may only appear on their own.
//! Evaluation is pure; nesting depth is bounded by [`MAX_DEPTH`].

use crate::ast::EnumValue;
use crate::lexer::{Spanned, Token};

pub const MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("unexpected {0} in constant expression")]
    UnexpectedToken(String),
    #[error("unexpected end of constant expression")]
    UnexpectedEnd,
    #[error("division by zero in constant expression")]
    DivisionByZero,
    #[error("operator '{0}' cannot be applied to a string")]
    StringOperand(char),
    #[error("constant expression nested deeper than {MAX_DEPTH} levels")]
    TooDeep,
}

/// Evaluate `tokens` (whitespace already removed) to a single value.
pub fn evaluate(tokens: &[Spanned]) -> Result<EnumValue, EvalError> {
    let mut ev = Evaluator { tokens, pos: 0 };
    let value = ev.expr(0)?;
    match ev.tokens.get(ev.pos) {
        None => Ok(value),
        Some(t) => Err(EvalError::UnexpectedToken(t.describe())),
    }
}

struct Evaluator<'a> {
    tokens: &'a [Spanned],
    pos: usize,
}

impl<'a> Evaluator<'a> {
    fn peek_op(&self) -> Option<char> {
        match self.tokens.get(self.pos).map(|t| &t.token) {
            Some(Token::Other(c)) => Some(*c),
            _ => None,
        }
    }

    fn expr(&mut self, depth: usize) -> Result<EnumValue, EvalError> {
        let mut left = self.term(depth)?;
        while let Some(op @ ('+' | '-')) = self.peek_op() {
            self.pos += 1;
            let right = self.term(depth)?;
            left = apply(op, left, right)?;
        }
        Ok(left)
    }

    fn term(&mut self, depth: usize) -> Result<EnumValue, EvalError> {
        let mut left = self.unary(depth)?;
        while let Some(op @ ('*' | '/')) = self.peek_op() {
            self.pos += 1;
            let right = self.unary(depth)?;
            left = apply(op, left, right)?;
        }
        Ok(left)
    }

    fn unary(&mut self, depth: usize) -> Result<EnumValue, EvalError> {
        if depth >= MAX_DEPTH {
            return Err(EvalError::TooDeep);
        }
        match self.peek_op() {
            Some(op @ ('+' | '-')) => {
                self.pos += 1;
                match (op, self.unary(depth + 1)?) {
                    (_, EnumValue::Str(_)) => Err(EvalError::StringOperand(op)),
                    ('-', EnumValue::Int(n)) => Ok(n
                        .checked_neg()
                        .map(EnumValue::Int)
                        .unwrap_or(EnumValue::Float(-(n as f64)))),
                    ('-', EnumValue::Float(x)) => Ok(EnumValue::Float(-x)),
                    (_, v) => Ok(v),
                }
            }
            _ => self.primary(depth),
        }
    }

    fn primary(&mut self, depth: usize) -> Result<EnumValue, EvalError> {
        let tok = self.tokens.get(self.pos).ok_or(EvalError::UnexpectedEnd)?;
        self.pos += 1;
        match &tok.token {
            Token::Int(n) => Ok(EnumValue::Int(*n)),
            Token::Float(s) => s
                .parse::<f64>()
                .map(EnumValue::Float)
                .map_err(|_| EvalError::UnexpectedToken(tok.describe())),
            Token::Str(s) => Ok(EnumValue::Str(s.clone())),
            Token::Other(open @ ('(' | '[')) => {
                let close = if *open == '(' { ')' } else { ']' };
                let inner = self.expr(depth + 1)?;
                match self.tokens.get(self.pos) {
                    Some(t) if t.is_other(close) => {
                        self.pos += 1;
                        Ok(inner)
                    }
                    Some(t) => Err(EvalError::UnexpectedToken(t.describe())),
                    None => Err(EvalError::UnexpectedEnd),
                }
            }
            _ => Err(EvalError::UnexpectedToken(tok.describe())),
        }
    }
}

fn apply(op: char, left: EnumValue, right: EnumValue) -> Result<EnumValue, EvalError> {
    use EnumValue::{Float, Int, Str};
    match (left, right) {
        (Str(_), _) | (_, Str(_)) => Err(EvalError::StringOperand(op)),
        (Int(a), Int(b)) => {
            let checked = match op {
                '+' => a.checked_add(b),
                '-' => a.checked_sub(b),
                '*' => a.checked_mul(b),
                _ => {
                    if b == 0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    match a.checked_rem(b) {
                        Some(0) => a.checked_div(b),
                        _ => None,
                    }
                }
            };
            match checked {
                Some(n) => Ok(Int(n)),
                // overflow and inexact division fall back to floats
                None => float_op(op, a as f64, b as f64),
            }
        }
        (Int(a), Float(b)) => float_op(op, a as f64, b),
        (Float(a), Int(b)) => float_op(op, a, b as f64),
        (Float(a), Float(b)) => float_op(op, a, b),
    }
}

fn float_op(op: char, a: f64, b: f64) -> Result<EnumValue, EvalError> {
    let v = match op {
        '+' => a + b,
        '-' => a - b,
        '*' => a * b,
        _ => {
            if b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            a / b
        }
    };
    Ok(EnumValue::Float(v))
}
