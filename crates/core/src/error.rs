use serde::{Deserialize, Serialize};

use crate::lexer::Spanned;

/// A positional parse error. Lines are 0-based.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, thiserror::Error)]
#[error("{file}:{line}: {message}")]
pub struct ParseError {
    pub file: String,
    pub line: u32,
    pub message: String,
}

impl ParseError {
    pub fn new(file: &str, line: u32, message: impl Into<String>) -> Self {
        ParseError {
            file: file.to_owned(),
            line,
            message: message.into(),
        }
    }

    pub fn lex(file: &str, line: u32, message: impl Into<String>) -> Self {
        ParseError::new(file, line, message)
    }

    pub fn unexpected_token(file: &str, expected: &str, found: &Spanned) -> Self {
        ParseError::new(
            file,
            found.line,
            format!("expected {}, found {}", expected, found.describe()),
        )
    }

    pub fn unexpected_end_of_input(file: &str, line: u32) -> Self {
        ParseError::new(file, line, "unexpected end of input")
    }

    pub fn nested_namespaces(file: &str, line: u32) -> Self {
        ParseError::new(file, line, "nested namespaces are not supported")
    }

    pub fn unknown_definition(file: &str, found: &Spanned) -> Self {
        ParseError::new(
            file,
            found.line,
            format!("unknown definition '{}', expected 'data'", found.text),
        )
    }

    /// JSON rendering used by `--output json`. All fields are always present.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "file":    self.file,
            "line":    self.line,
            "message": self.message,
        })
    }
}
