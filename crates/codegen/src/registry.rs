//! Convention lookup.
//!
//! A [`ConventionRegistry`] maps deriving names to strategies within one
//! namespace. A [`ConventionCatalog`] holds every namespace known to a run:
//! the built-in one plus whatever conventions files were loaded.

use std::collections::BTreeMap;
use std::path::Path;

use crate::builtin;
use crate::convention::Convention;
use crate::declarative::ConventionsFile;
use crate::error::GenerationError;

/// Deriving name -> strategy, for one convention namespace.
pub struct ConventionRegistry {
    namespace: String,
    conventions: BTreeMap<String, Box<dyn Convention>>,
}

impl ConventionRegistry {
    pub fn new(namespace: &str) -> Self {
        ConventionRegistry {
            namespace: normalize_namespace(namespace),
            conventions: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, deriving: &str, convention: impl Convention + 'static) {
        self.register_boxed(deriving, Box::new(convention));
    }

    /// Registering a name twice replaces the earlier strategy.
    pub fn register_boxed(&mut self, deriving: &str, convention: Box<dyn Convention>) {
        if self
            .conventions
            .insert(deriving.to_owned(), convention)
            .is_some()
        {
            tracing::debug!(namespace = %self.namespace, deriving, "convention replaced");
        }
    }

    pub fn resolve(&self, deriving: &str) -> Option<&dyn Convention> {
        self.conventions.get(deriving).map(|c| c.as_ref())
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Registered deriving names, sorted.
    pub fn derivings(&self) -> Vec<&str> {
        self.conventions.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.conventions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conventions.is_empty()
    }
}

impl std::fmt::Debug for ConventionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConventionRegistry")
            .field("namespace", &self.namespace)
            .field("derivings", &self.derivings())
            .finish()
    }
}

/// Every convention namespace available to a run.
#[derive(Debug, Default)]
pub struct ConventionCatalog {
    registries: BTreeMap<String, ConventionRegistry>,
}

impl ConventionCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Catalog seeded with the built-in namespace.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        catalog.insert(builtin::registry());
        catalog
    }

    /// Add a registry; an existing namespace of the same name absorbs its
    /// conventions.
    pub fn insert(&mut self, registry: ConventionRegistry) {
        match self.registries.get_mut(registry.namespace()) {
            Some(existing) => {
                for (name, convention) in registry.conventions {
                    existing.register_boxed(&name, convention);
                }
            }
            None => {
                self.registries
                    .insert(registry.namespace().to_owned(), registry);
            }
        }
    }

    /// Merge the namespaces declared in a TOML conventions document.
    /// `origin` names the document in error messages.
    pub fn add_toml(&mut self, src: &str, origin: &str) -> Result<(), GenerationError> {
        let file =
            ConventionsFile::from_toml(src).map_err(|e| GenerationError::InvalidConventions {
                path: origin.to_owned(),
                message: e.to_string(),
            })?;

        for spec in file.namespaces {
            if normalize_namespace(&spec.name).is_empty() {
                return Err(GenerationError::InvalidConventions {
                    path: origin.to_owned(),
                    message: "namespace name must not be empty".to_owned(),
                });
            }
            let mut registry = ConventionRegistry::new(&spec.name);
            for (name, convention) in spec.conventions {
                registry.register(&name, convention);
            }
            tracing::debug!(
                namespace = %registry.namespace(),
                conventions = registry.len(),
                origin,
                "loaded convention namespace"
            );
            self.insert(registry);
        }
        Ok(())
    }

    pub fn load_file(&mut self, path: &Path) -> Result<(), GenerationError> {
        let origin = path.display().to_string();
        let src =
            std::fs::read_to_string(path).map_err(|e| GenerationError::InvalidConventions {
                path: origin.clone(),
                message: e.to_string(),
            })?;
        self.add_toml(&src, &origin)
    }

    /// Registry for `namespace`; leading and trailing `\` are ignored.
    pub fn registry(&self, namespace: &str) -> Result<&ConventionRegistry, GenerationError> {
        let key = normalize_namespace(namespace);
        self.registries
            .get(&key)
            .ok_or(GenerationError::UnknownNamespace { namespace: key })
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &ConventionRegistry> {
        self.registries.values()
    }
}

fn normalize_namespace(namespace: &str) -> String {
    namespace.trim().trim_matches('\\').to_owned()
}
