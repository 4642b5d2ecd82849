//! Pull-based token stream over the lexer output.
//!
//! Comments are skipped transparently; whitespace is kept because some
//! productions require it as a separator.

use crate::error::ParseError;
use crate::lexer::{self, Spanned, Token};

pub struct TokenSource {
    tokens: Vec<Spanned>,
    pos: usize,
    line: u32,
    filename: String,
}

impl TokenSource {
    pub fn new(tokens: Vec<Spanned>, filename: &str) -> Self {
        TokenSource {
            tokens,
            pos: 0,
            line: 0,
            filename: filename.to_owned(),
        }
    }

    /// Lex `src` and wrap the result.
    pub fn from_source(src: &str, filename: &str) -> Result<Self, ParseError> {
        Ok(TokenSource::new(lexer::lex(src, filename)?, filename))
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Line of the most recently returned token.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Advance to the next non-comment token.
    pub fn next(&mut self) -> Result<Spanned, ParseError> {
        self.next_opt()
            .ok_or_else(|| ParseError::unexpected_end_of_input(&self.filename, self.line))
    }

    /// Like [`TokenSource::next`], but `None` at end of input.
    pub fn next_opt(&mut self) -> Option<Spanned> {
        while let Some(tok) = self.tokens.get(self.pos) {
            self.pos += 1;
            if tok.token == Token::Comment {
                continue;
            }
            self.line = tok.line;
            return Some(tok.clone());
        }
        None
    }

    /// Advance past whitespace starting at `tok`.
    pub fn skip_whitespace(&mut self, mut tok: Spanned) -> Result<Spanned, ParseError> {
        while tok.is_whitespace() {
            tok = self.next()?;
        }
        Ok(tok)
    }

    /// `next()` followed by `skip_whitespace()`.
    pub fn next_significant(&mut self) -> Result<Spanned, ParseError> {
        let tok = self.next()?;
        self.skip_whitespace(tok)
    }

    /// True when only comments (or nothing) remain.
    pub fn is_exhausted(&self) -> bool {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .all(|t| t.token == Token::Comment)
    }
}
