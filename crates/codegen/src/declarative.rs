//! Data-driven conventions read from a TOML conventions file.

use std::collections::BTreeMap;

use dtgen_core::Constructor;
use serde::Deserialize;

use crate::convention::{AttributeDefinition, ClassKind, ConstDefinition, Convention};

/// A convention whose capabilities are plain data.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeclarativeConvention {
    pub kind: ClassKind,
    pub uses: Vec<String>,
    pub extends: Vec<String>,
    pub implements: Vec<String>,
    pub traits: Vec<String>,
    pub public_consts: Vec<ConstDefinition>,
    pub private_consts: Vec<ConstDefinition>,
    pub protected_attrs: Vec<AttributeDefinition>,
    pub private_attrs: Vec<AttributeDefinition>,
    /// Argument names the constructor must declare.
    pub required_arguments: Vec<String>,
}

impl Convention for DeclarativeConvention {
    fn class_kind(&self) -> ClassKind {
        self.kind
    }

    fn uses(&self) -> Vec<String> {
        self.uses.clone()
    }

    fn extends(&self) -> Vec<String> {
        self.extends.clone()
    }

    fn implements(&self) -> Vec<String> {
        self.implements.clone()
    }

    fn traits(&self) -> Vec<String> {
        self.traits.clone()
    }

    fn public_consts(&self) -> Vec<ConstDefinition> {
        self.public_consts.clone()
    }

    fn private_consts(&self) -> Vec<ConstDefinition> {
        self.private_consts.clone()
    }

    fn protected_attrs(&self) -> Vec<AttributeDefinition> {
        self.protected_attrs.clone()
    }

    fn private_attrs(&self) -> Vec<AttributeDefinition> {
        self.private_attrs.clone()
    }

    fn validate(&self, constructor: &Constructor) -> Result<(), String> {
        let missing: Vec<&str> = self
            .required_arguments
            .iter()
            .filter(|name| constructor.argument(name).is_none())
            .map(String::as_str)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(format!(
                "constructor '{}' is missing required argument(s): {}",
                constructor.name(),
                missing
                    .iter()
                    .map(|n| format!("${}", n))
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        }
    }
}

/// Top-level layout of a conventions file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConventionsFile {
    #[serde(default, rename = "namespace")]
    pub namespaces: Vec<NamespaceSpec>,
}

/// One `[[namespace]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamespaceSpec {
    pub name: String,
    #[serde(default)]
    pub conventions: BTreeMap<String, DeclarativeConvention>,
}

impl ConventionsFile {
    pub fn from_toml(src: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(src)
    }
}
