use indexmap::IndexMap;

use super::data::PendingDefinition;
use super::Parser;
use crate::ast::{Condition, Deriving, ANY_CONSTRUCTOR, MESSAGE_DERIVINGS};
use crate::consteval;
use crate::error::ParseError;
use crate::lexer::{Spanned, Token};

impl Parser {
    // -- deriving (A, B: "message.name") ------------------------

    /// Starts at the `deriving` keyword; returns the first significant
    /// token after the closing `)`.
    pub(super) fn parse_deriving(
        &mut self,
        pending: &mut PendingDefinition,
    ) -> Result<Spanned, ParseError> {
        let tok = self.source.next_significant()?;
        self.expect_other(&tok, '(')?;

        let mut tok = self.source.next_significant()?;
        while !tok.is_other(')') {
            let name = self.expect_word(&tok)?;
            pending.derivings.push(Deriving::from_name(&name));
            tok = self.source.next_significant()?;

            if tok.is_other(':') && MESSAGE_DERIVINGS.contains(&name.as_str()) {
                tok = self.source.next_significant()?;
                pending.message_name = Some(self.expect_str(&tok)?);
                tok = self.source.next_significant()?;
            }

            if tok.is_other(',') {
                tok = self.source.next_significant()?;
            } else if !tok.is_other(')') {
                return Err(self.unexpected("',' or ')'", &tok));
            }
        }

        self.source.next_significant()
    }

    // -- with (A: 1 + 2, B: "lit") ------------------------------

    /// Starts at the `with` keyword. Fills the values of the `Enum` deriving.
    pub(super) fn parse_enum_mapping(
        &mut self,
        pending: &mut PendingDefinition,
    ) -> Result<Spanned, ParseError> {
        let tok = self.source.next_significant()?;
        self.expect_other(&tok, '(')?;

        let mut mapping = IndexMap::new();
        let mut tok = self.source.next_significant()?;
        while !tok.is_other(')') {
            let case = self.expect_word(&tok)?;
            let case_line = tok.line;
            tok = self.source.next_significant()?;
            self.expect_other(&tok, ':')?;

            let (span, next) = self.collect_value_span()?;
            let value = consteval::evaluate(&span).map_err(|e| {
                ParseError::new(
                    self.filename(),
                    case_line,
                    format!("invalid value for enum case '{}': {}", case, e),
                )
            })?;
            mapping.insert(case, value);

            tok = next;
            if tok.is_other(',') {
                tok = self.source.next_significant()?;
            }
        }

        for deriving in pending.derivings.iter_mut() {
            if let Deriving::Enum { values } = deriving {
                *values = mapping;
                break;
            }
        }

        self.source.next_significant()
    }

    /// Tokens of one enum value, up to `,` or `)` at bracket depth 0.
    /// Whitespace is dropped. Returns the span and the terminating token.
    fn collect_value_span(&mut self) -> Result<(Vec<Spanned>, Spanned), ParseError> {
        let mut span = Vec::new();
        let mut depth = 0usize;
        loop {
            let tok = self.source.next_significant()?;
            match &tok.token {
                Token::Other(',' | ')') if depth == 0 => return Ok((span, tok)),
                Token::Other(']') if depth == 0 => {
                    return Err(self.unexpected("',' or ')'", &tok));
                }
                Token::Other('(' | '[') => depth += 1,
                Token::Other(')' | ']') => depth -= 1,
                _ => {}
            }
            span.push(tok);
        }
    }

    // -- where [Ctor:] | guard => "message" ... -----------------

    /// Starts at the `where` keyword; returns the first significant token
    /// after the last guard.
    pub(super) fn parse_conditions(
        &mut self,
        pending: &mut PendingDefinition,
    ) -> Result<Spanned, ParseError> {
        let mut scope = ANY_CONSTRUCTOR.to_owned();
        let mut tok = self.source.next_significant()?;

        loop {
            if matches!(tok.token, Token::Word(_) | Token::NsSeparator) {
                let (name, next) = self.parse_condition_scope(tok)?;
                scope = name;
                tok = next;
                self.expect_other(&tok, ':')?;
                tok = self.source.next_significant()?;
            }
            self.expect_other(&tok, '|')?;

            loop {
                let expression = self.collect_guard_span()?;
                tok = self.source.next_significant()?;
                let message = self.expect_str(&tok)?;
                pending.conditions.push(Condition {
                    constructor: scope.clone(),
                    expression,
                    message,
                });

                tok = self.source.next_significant()?;
                if !tok.is_other('|') {
                    break;
                }
            }

            if !matches!(tok.token, Token::Word(_) | Token::NsSeparator) {
                return Ok(tok);
            }
        }
    }

    /// `_`, `Name`, or `\Absolute\Name` before the `:` of a guard group.
    /// Returns the scope and the first significant token after it.
    fn parse_condition_scope(
        &mut self,
        mut tok: Spanned,
    ) -> Result<(String, Spanned), ParseError> {
        let absolute = tok.token == Token::NsSeparator;
        if absolute {
            tok = self.source.next()?;
        }
        let mut name = self.expect_word(&tok)?;
        tok = self.source.next()?;
        while tok.token == Token::NsSeparator {
            tok = self.source.next()?;
            name.push('\\');
            name.push_str(&self.expect_word(&tok)?);
            tok = self.source.next()?;
        }

        let scope = if absolute || name == ANY_CONSTRUCTOR {
            name
        } else {
            self.qualify(&name)
        };
        Ok((scope, self.source.skip_whitespace(tok)?))
    }

    /// Raw text of a guard expression, up to `=>` at bracket depth 0.
    /// The arrow is consumed; the text is trimmed.
    fn collect_guard_span(&mut self) -> Result<String, ParseError> {
        let mut code = String::new();
        let mut depth = 0i32;
        loop {
            let tok = self.source.next()?;
            match &tok.token {
                Token::Other('(' | '[') => depth += 1,
                Token::Other(')' | ']') => depth -= 1,
                Token::DoubleArrow if depth == 0 => break,
                _ => {}
            }
            code.push_str(&tok.text);
        }
        Ok(code.trim().to_owned())
    }
}
