use super::Parser;
use crate::ast::{
    is_scalar_constructor, is_scalar_type, Argument, Condition, Constructor, Definition, Deriving,
    SCALAR_CONSTRUCTORS,
};
use crate::error::ParseError;
use crate::lexer::{Spanned, Token};

/// Sub-states of a `data` declaration.
enum DataState {
    Constructors,
    Deriving,
    EnumMapping,
    Conditions,
    Build,
}

/// Pieces collected while a declaration is being parsed.
#[derive(Default)]
pub(super) struct PendingDefinition {
    pub(super) constructors: Vec<Constructor>,
    pub(super) derivings: Vec<Deriving>,
    pub(super) conditions: Vec<Condition>,
    pub(super) message_name: Option<String>,
}

impl Parser {
    /// `data Name = Ctor {...} [deriving (...)] [with (...)] [where ...];`
    pub(super) fn parse_data(&mut self, keyword: &Spanned) -> Result<Definition, ParseError> {
        let tok = self.source.next()?;
        self.expect_whitespace(&tok)?;
        let tok = self.source.next()?;
        let name = self.expect_word(&tok)?;
        let mut tok = self.source.next_significant()?;
        self.expect_other(&tok, '=')?;

        let mut pending = PendingDefinition::default();
        let mut state = DataState::Constructors;

        loop {
            state = match state {
                DataState::Constructors => {
                    let (constructor, next) = self.parse_constructor()?;
                    pending.constructors.push(constructor);
                    tok = self.source.skip_whitespace(next)?;
                    match &tok.token {
                        Token::Other('|') => DataState::Constructors,
                        Token::Other(';') => DataState::Build,
                        Token::Word(w) if w == "deriving" => DataState::Deriving,
                        Token::Word(w) if w == "with" => DataState::EnumMapping,
                        Token::Word(w) if w == "where" => DataState::Conditions,
                        _ => {
                            return Err(self.unexpected(
                                "'|', 'deriving', 'with', 'where' or ';'",
                                &tok,
                            ))
                        }
                    }
                }
                DataState::Deriving => {
                    tok = self.parse_deriving(&mut pending)?;
                    match &tok.token {
                        Token::Other(';') => DataState::Build,
                        Token::Word(w) if w == "with" => DataState::EnumMapping,
                        Token::Word(w) if w == "where" => DataState::Conditions,
                        _ => return Err(self.unexpected("'with', 'where' or ';'", &tok)),
                    }
                }
                DataState::EnumMapping => {
                    if !pending.derivings.iter().any(Deriving::is_enum) {
                        return Err(self.unexpected("'where' or ';'", &tok));
                    }
                    tok = self.parse_enum_mapping(&mut pending)?;
                    match &tok.token {
                        Token::Other(';') => DataState::Build,
                        Token::Word(w) if w == "where" => DataState::Conditions,
                        _ => return Err(self.unexpected("'where' or ';'", &tok)),
                    }
                }
                DataState::Conditions => {
                    tok = self.parse_conditions(&mut pending)?;
                    self.expect_other(&tok, ';')?;
                    DataState::Build
                }
                DataState::Build => break,
            };
        }

        Definition::new(
            self.namespace.clone(),
            name.clone(),
            pending.constructors,
            pending.derivings,
            pending.conditions,
            pending.message_name,
        )
        .map_err(|e| {
            ParseError::new(
                self.filename(),
                tok.line,
                format!(
                    "invalid definition '{}' (declared on line {}): {}",
                    name, keyword.line, e
                ),
            )
        })
    }

    /// Parse one constructor after `=` or `|`. Returns the constructor and
    /// the token following it.
    fn parse_constructor(&mut self) -> Result<(Constructor, Spanned), ParseError> {
        let mut tok = self.source.next_significant()?;

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

        if !absolute && SCALAR_CONSTRUCTORS.contains(&name.as_str()) && tok.is_other('[') {
            tok = self.source.next()?;
            self.expect_other(&tok, ']')?;
            tok = self.source.next()?;
            name.push_str("[]");
        }

        if !absolute && !is_scalar_constructor(&name) {
            name = self.qualify(&name);
        }

        tok = self.source.skip_whitespace(tok)?;
        let mut arguments = Vec::new();
        if tok.is_other('{') {
            arguments = self.parse_arguments()?;
            tok = self.source.next()?;
        }

        Ok((Constructor::new(name, arguments), tok))
    }

    /// Argument list after `{`, up to and including `}`.
    fn parse_arguments(&mut self) -> Result<Vec<Argument>, ParseError> {
        let mut arguments = Vec::new();
        loop {
            let mut tok = self.source.next_significant()?;
            if tok.is_other('}') {
                break;
            }

            let mut nullable = false;
            if tok.is_other('?') {
                nullable = true;
                tok = self.source.next_significant()?;
                if !matches!(tok.token, Token::Word(_) | Token::NsSeparator) {
                    return Err(self.unexpected("type name", &tok));
                }
            }

            tok = match &tok.token {
                Token::Variable(v) => {
                    arguments.push(Argument::untyped(v.clone()));
                    self.source.next_significant()?
                }
                Token::Word(_) | Token::NsSeparator => {
                    let (argument, next) = self.parse_typed_argument(tok, nullable)?;
                    arguments.push(argument);
                    next
                }
                _ => return Err(self.unexpected("type name or variable", &tok)),
            };

            if tok.is_other('}') {
                break;
            }
            if !tok.is_other(',') {
                return Err(self.unexpected("',' or '}'", &tok));
            }
        }
        Ok(arguments)
    }

    /// `[\]Type{\Segment}[[]] $name`, starting at the first type token.
    fn parse_typed_argument(
        &mut self,
        mut tok: Spanned,
        nullable: bool,
    ) -> Result<(Argument, Spanned), ParseError> {
        let absolute = tok.token == Token::NsSeparator;
        if absolute {
            tok = self.source.next()?;
        }
        let mut type_name = self.expect_word(&tok)?;
        tok = self.source.next()?;

        let mut is_list = false;
        loop {
            if tok.is_other('[') {
                tok = self.source.next()?;
                self.expect_other(&tok, ']')?;
                tok = self.source.next()?;
                self.expect_whitespace(&tok)?;
                is_list = true;
            }
            if tok.is_whitespace() {
                break;
            }
            if tok.token != Token::NsSeparator {
                return Err(self.unexpected("whitespace or '\\'", &tok));
            }
            tok = self.source.next()?;
            type_name.push('\\');
            type_name.push_str(&self.expect_word(&tok)?);
            tok = self.source.next()?;
        }

        if !absolute && !is_scalar_type(&type_name) {
            type_name = self.qualify(&type_name);
        }

        let tok = self.source.skip_whitespace(tok)?;
        let name = self.expect_variable(&tok)?;
        let next = self.source.next_significant()?;
        Ok((Argument::new(name, type_name, nullable, is_list), next))
    }
}
