//! Output path resolution and writing of generated units.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::error::GenerationError;
use crate::template::GeneratedUnit;

/// Maps a fully qualified class name to the file it is written to.
pub trait PathResolver {
    fn resolve_path(&self, class: &str) -> Result<PathBuf, GenerationError>;
}

/// PSR-4 / PSR-0 prefix maps read from a `composer.json`.
#[derive(Debug, Clone, Default)]
pub struct ComposerAutoload {
    psr4: Vec<(String, PathBuf)>,
    psr0: Vec<(String, PathBuf)>,
}

#[derive(Debug, Default, Deserialize)]
struct ComposerManifest {
    #[serde(default)]
    autoload: AutoloadSection,
    #[serde(default, rename = "autoload-dev")]
    autoload_dev: AutoloadSection,
}

#[derive(Debug, Default, Deserialize)]
struct AutoloadSection {
    #[serde(default, rename = "psr-4")]
    psr4: serde_json::Map<String, Value>,
    #[serde(default, rename = "psr-0")]
    psr0: serde_json::Map<String, Value>,
}

impl ComposerAutoload {
    pub fn from_composer_json(path: &Path) -> Result<Self, GenerationError> {
        let src = std::fs::read_to_string(path).map_err(|e| GenerationError::InvalidComposer {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_json_str(&src, base).map_err(|e| match e {
            GenerationError::InvalidComposer { message, .. } => GenerationError::InvalidComposer {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Directories in the manifest are taken relative to `base_dir`.
    pub fn from_json_str(src: &str, base_dir: &Path) -> Result<Self, GenerationError> {
        let invalid = |message: String| GenerationError::InvalidComposer {
            path: "composer.json".to_owned(),
            message,
        };
        let manifest: ComposerManifest =
            serde_json::from_str(src).map_err(|e| invalid(e.to_string()))?;

        let mut autoload = ComposerAutoload::default();
        for section in [&manifest.autoload, &manifest.autoload_dev] {
            for (prefix, dirs) in &section.psr4 {
                let dir = first_dir(dirs).ok_or_else(|| {
                    invalid(format!("psr-4 entry '{}' has no directory", prefix))
                })?;
                autoload.psr4.push((prefix.clone(), base_dir.join(dir)));
            }
            for (prefix, dirs) in &section.psr0 {
                let dir = first_dir(dirs).ok_or_else(|| {
                    invalid(format!("psr-0 entry '{}' has no directory", prefix))
                })?;
                autoload.psr0.push((prefix.clone(), base_dir.join(dir)));
            }
        }
        // Most specific prefix first.
        autoload.psr4.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        autoload.psr0.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Ok(autoload)
    }
}

/// A psr entry is a single directory or a list; only the first is used.
fn first_dir(value: &Value) -> Option<&str> {
    match value {
        Value::String(dir) => Some(dir.as_str()),
        Value::Array(dirs) => dirs.first().and_then(Value::as_str),
        _ => None,
    }
}

impl PathResolver for ComposerAutoload {
    fn resolve_path(&self, class: &str) -> Result<PathBuf, GenerationError> {
        let class = class.trim_start_matches('\\');

        for (prefix, dir) in &self.psr4 {
            if let Some(rest) = class.strip_prefix(prefix.as_str()) {
                return Ok(join_segments(dir, rest.split('\\')));
            }
        }

        let (namespace, short) = match class.rfind('\\') {
            Some(pos) => (&class[..pos], &class[pos + 1..]),
            None => ("", class),
        };
        for (prefix, dir) in &self.psr0 {
            if class.starts_with(prefix.as_str()) {
                let segments = namespace
                    .split('\\')
                    .filter(|s| !s.is_empty())
                    .chain(short.split('_'));
                return Ok(join_segments(dir, segments));
            }
        }

        Err(GenerationError::PathResolution {
            class: class.to_owned(),
        })
    }
}

/// Writes every class under `root`, laid out by namespace.
#[derive(Debug, Clone)]
pub struct OutDirResolver {
    root: PathBuf,
}

impl OutDirResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        OutDirResolver { root: root.into() }
    }
}

impl PathResolver for OutDirResolver {
    fn resolve_path(&self, class: &str) -> Result<PathBuf, GenerationError> {
        let class = class.trim_start_matches('\\');
        if class.is_empty() {
            return Err(GenerationError::PathResolution {
                class: class.to_owned(),
            });
        }
        Ok(join_segments(&self.root, class.split('\\')))
    }
}

fn join_segments<'a>(root: &Path, segments: impl Iterator<Item = &'a str>) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in segments.filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path.set_extension("php");
    path
}

/// Resolve every unit's path first, then write them all. Returns the
/// written paths in unit order.
pub fn emit(
    units: &[GeneratedUnit],
    resolver: &dyn PathResolver,
) -> Result<Vec<PathBuf>, GenerationError> {
    let targets = units
        .iter()
        .map(|unit| resolver.resolve_path(&unit.class_name))
        .collect::<Result<Vec<_>, _>>()?;

    for (unit, path) in units.iter().zip(&targets) {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| GenerationError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, &unit.source).map_err(|source| GenerationError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(class = %unit.class_name, path = %path.display(), "wrote class");
    }
    Ok(targets)
}
