#![allow(clippy::result_large_err)]
//! dtgen-codegen: turns parsed definitions into PHP value objects.
//!
//! - [`convention`] -- the capability set a generation strategy provides
//! - [`registry`] -- deriving name -> strategy lookup, per namespace
//! - [`builtin`] / [`declarative`] -- compiled-in and TOML-defined strategies
//! - [`template`] -- fixed-order assembly of one class
//! - [`emit`] -- composer-based path resolution and file output

pub mod builtin;
pub mod convention;
pub mod declarative;
pub mod emit;
pub mod error;
pub mod registry;
pub mod template;

pub use convention::{AttributeDefinition, ClassKind, ConstDefinition, Convention};
pub use declarative::DeclarativeConvention;
pub use emit::{emit, ComposerAutoload, OutDirResolver, PathResolver};
pub use error::GenerationError;
pub use registry::{ConventionCatalog, ConventionRegistry};
pub use template::{assemble, generate, generate_all, GeneratedUnit};
