//! Source provider abstraction and `.datatypes` file discovery.
//!
//! The [`SourceProvider`] trait abstracts file reads so parsing can be
//! exercised without touching the filesystem.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::ast::DefinitionCollection;
use crate::error::ParseError;
use crate::parser;

/// Extension of DSL input files.
pub const DATATYPES_EXTENSION: &str = "datatypes";

/// Trait that abstracts file I/O for the parser.
pub trait SourceProvider {
    /// Read the source text for a given path.
    fn read_source(&self, path: &Path) -> Result<String, std::io::Error>;
}

/// Default filesystem-backed source provider.
pub struct FileSystemProvider;

impl SourceProvider for FileSystemProvider {
    fn read_source(&self, path: &Path) -> Result<String, std::io::Error> {
        std::fs::read_to_string(path)
    }
}

/// In-memory source provider for testing.
pub struct InMemoryProvider {
    files: HashMap<PathBuf, String>,
}

impl InMemoryProvider {
    pub fn new(files: HashMap<PathBuf, String>) -> Self {
        Self { files }
    }
}

impl SourceProvider for InMemoryProvider {
    fn read_source(&self, path: &Path) -> Result<String, std::io::Error> {
        self.files.get(path).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("file not found in memory: {}", path.display()),
            )
        })
    }
}

/// Read `path` through `provider` and parse it. Read failures are reported
/// as a [`ParseError`] on line 0 of the file.
pub fn parse_file(
    provider: &dyn SourceProvider,
    path: &Path,
) -> Result<DefinitionCollection, ParseError> {
    let filename = path.display().to_string();
    let src = provider
        .read_source(path)
        .map_err(|e| ParseError::new(&filename, 0, format!("cannot read file: {}", e)))?;
    parser::parse(&src, &filename)
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("'{0}' is not readable")]
    NotReadable(PathBuf),
    #[error("no .datatypes files found in '{0}'")]
    NoInputFiles(PathBuf),
    #[error("invalid scan pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("cannot read directory entry: {0}")]
    Entry(#[from] glob::GlobError),
}

/// Collect input files. A file is returned as-is; a directory is searched
/// recursively for `*.datatypes`, sorted by path.
pub fn scan(path: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let meta = std::fs::metadata(path).map_err(|_| ScanError::NotReadable(path.to_path_buf()))?;
    if meta.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let root = glob::Pattern::escape(&path.display().to_string());
    let pattern = format!(
        "{}/**/*.{}",
        root.trim_end_matches('/'),
        DATATYPES_EXTENSION
    );

    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        let file = entry?;
        if file.is_file() {
            files.push(file);
        }
    }
    if files.is_empty() {
        return Err(ScanError::NoInputFiles(path.to_path_buf()));
    }
    files.sort();
    tracing::debug!(root = %path.display(), files = files.len(), "scanned input directory");
    Ok(files)
}
