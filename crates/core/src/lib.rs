#![allow(clippy::result_large_err)]
//! dtgen-core: `.datatypes` front end.
//!
//! Turns DSL source text into a [`DefinitionCollection`]:
//!
//! - [`lexer`] -- raw tokens with literal text and 0-based lines
//! - [`token_source`] -- pull stream that skips comments
//! - [`parser`] -- state-machine grammar parser
//! - [`consteval`] -- constant evaluator for `with (...)` enum values
//! - [`ast`] -- the definition model shared with code generation
//! - [`source`] -- source providers and input file discovery

pub mod ast;
pub mod consteval;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod token_source;

// ── Convenience re-exports: key types ────────────────────────────────

pub use ast::{
    Argument, Condition, Constructor, Definition, DefinitionCollection, DefinitionError, Deriving,
    EnumValue,
};
pub use error::ParseError;
pub use source::{FileSystemProvider, InMemoryProvider, ScanError, SourceProvider};

// ── Convenience re-exports: entry points ─────────────────────────────

pub use parser::parse;
pub use source::{parse_file, scan};
