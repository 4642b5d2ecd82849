//! Grammar parser for `.datatypes` files.
//!
//! Pulls tokens from a [`TokenSource`] and drives an explicit state machine:
//!
//! ```text
//! Start -> ExpectTopLevel -> { Namespace | DataDecl } -> ExpectTopLevel ... -> End
//! ```
//!
//! A data declaration runs its own sub-machine (see `data.rs`):
//! `Constructors -> Deriving? -> EnumMapping? -> Conditions? -> Build`.
use crate::ast::DefinitionCollection;
use crate::error::ParseError;
use crate::lexer::{Spanned, Token};
use crate::token_source::TokenSource;

mod clauses;
mod data;

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

enum State {
    Start,
    ExpectTopLevel,
    Namespace(Spanned),
    DataDecl(Spanned),
    End,
}

struct Parser {
    source: TokenSource,
    /// Active namespace; empty when none is open.
    namespace: String,
    /// Set while a `namespace X { ... }` block is open.
    in_namespace_block: bool,
}

impl Parser {
    fn new(source: TokenSource) -> Self {
        Parser {
            source,
            namespace: String::new(),
            in_namespace_block: false,
        }
    }

    fn filename(&self) -> &str {
        self.source.filename()
    }

    fn unexpected(&self, expected: &str, found: &Spanned) -> ParseError {
        ParseError::unexpected_token(self.filename(), expected, found)
    }

    // -- Token requirements -------------------------------------

    fn expect_whitespace(&self, tok: &Spanned) -> Result<(), ParseError> {
        if tok.is_whitespace() {
            Ok(())
        } else {
            Err(self.unexpected("whitespace", tok))
        }
    }

    fn expect_word(&self, tok: &Spanned) -> Result<String, ParseError> {
        match &tok.token {
            Token::Word(w) => Ok(w.clone()),
            _ => Err(self.unexpected("identifier", tok)),
        }
    }

    fn expect_other(&self, tok: &Spanned, c: char) -> Result<(), ParseError> {
        if tok.is_other(c) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", c), tok))
        }
    }

    fn expect_variable(&self, tok: &Spanned) -> Result<String, ParseError> {
        match &tok.token {
            Token::Variable(v) => Ok(v.clone()),
            _ => Err(self.unexpected("variable", tok)),
        }
    }

    fn expect_str(&self, tok: &Spanned) -> Result<String, ParseError> {
        match &tok.token {
            Token::Str(s) => Ok(s.clone()),
            _ => Err(self.unexpected("string literal", tok)),
        }
    }

    /// Prefix `name` with the active namespace.
    fn qualify(&self, name: &str) -> String {
        if self.namespace.is_empty() {
            name.to_owned()
        } else {
            format!("{}\\{}", self.namespace, name)
        }
    }

    // -- Top level ----------------------------------------------

    fn parse_file(&mut self) -> Result<DefinitionCollection, ParseError> {
        let mut collection = DefinitionCollection::new(self.filename());
        let mut state = State::Start;

        loop {
            state = match state {
                State::Start => State::ExpectTopLevel,
                State::ExpectTopLevel => match self.source.next_opt() {
                    Some(tok) => self.dispatch_top_level(tok)?,
                    None => {
                        if self.in_namespace_block {
                            return Err(ParseError::new(
                                self.filename(),
                                self.source.line(),
                                format!("namespace '{}' is never closed", self.namespace),
                            ));
                        }
                        State::End
                    }
                },
                State::Namespace(keyword) => {
                    self.parse_namespace(&keyword)?;
                    State::ExpectTopLevel
                }
                State::DataDecl(keyword) => {
                    let definition = self.parse_data(&keyword)?;
                    collection.push(definition);
                    State::ExpectTopLevel
                }
                State::End => break,
            };
        }

        Ok(collection)
    }

    fn dispatch_top_level(&mut self, tok: Spanned) -> Result<State, ParseError> {
        match &tok.token {
            Token::Whitespace => Ok(State::ExpectTopLevel),
            Token::Word(w) if w == "namespace" => Ok(State::Namespace(tok)),
            Token::Word(w) if w == "data" => Ok(State::DataDecl(tok)),
            Token::Word(_) => Err(ParseError::unknown_definition(self.filename(), &tok)),
            Token::Other('}') if self.in_namespace_block => {
                self.in_namespace_block = false;
                self.namespace.clear();
                Ok(State::ExpectTopLevel)
            }
            _ => Err(self.unexpected("'data' or 'namespace'", &tok)),
        }
    }

    /// `namespace A\B;` or `namespace A\B {`.
    fn parse_namespace(&mut self, keyword: &Spanned) -> Result<(), ParseError> {
        if self.in_namespace_block {
            return Err(ParseError::nested_namespaces(self.filename(), keyword.line));
        }

        let tok = self.source.next()?;
        self.expect_whitespace(&tok)?;
        let tok = self.source.next()?;
        let mut namespace = self.expect_word(&tok)?;
        let mut tok = self.source.next()?;
        while tok.token == Token::NsSeparator {
            tok = self.source.next()?;
            namespace.push('\\');
            namespace.push_str(&self.expect_word(&tok)?);
            tok = self.source.next()?;
        }

        let tok = self.source.skip_whitespace(tok)?;
        if tok.is_other('{') {
            self.in_namespace_block = true;
        } else if !tok.is_other(';') {
            return Err(self.unexpected("';' or '{'", &tok));
        }
        self.namespace = namespace;
        Ok(())
    }
}

/// Parse `.datatypes` source text into its definitions.
pub fn parse(src: &str, filename: &str) -> Result<DefinitionCollection, ParseError> {
    let source = TokenSource::from_source(src, filename)?;
    let collection = Parser::new(source).parse_file()?;
    tracing::debug!(
        file = filename,
        definitions = collection.len(),
        "parsed datatypes file"
    );
    Ok(collection)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
