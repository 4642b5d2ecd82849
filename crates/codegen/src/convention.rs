//! The capability set every convention strategy provides.
//!
//! Each capability defaults to "nothing"; a convention only overrides what
//! it contributes. The assembly order is fixed by the template engine and
//! cannot be changed by a convention.

use dtgen_core::{Argument, Constructor};
use serde::{Deserialize, Serialize};

/// Kind keyword of the generated class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    #[default]
    Final,
    Abstract,
    #[serde(rename = "class")]
    Plain,
}

impl ClassKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ClassKind::Final => "final class",
            ClassKind::Abstract => "abstract class",
            ClassKind::Plain => "class",
        }
    }
}

/// `key = value`; the value is literal target-language text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstDefinition {
    pub key: String,
    pub value: String,
}

impl ConstDefinition {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        ConstDefinition {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A generated property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, rename = "list")]
    pub is_list: bool,
    /// Literal default value text; never set for constructor-derived fields.
    #[serde(default)]
    pub default: Option<String>,
}

impl AttributeDefinition {
    pub fn new(name: &str, type_name: &str, nullable: bool, is_list: bool) -> Self {
        AttributeDefinition {
            name: name.to_owned(),
            type_name: type_name.to_owned(),
            nullable,
            is_list,
            default: None,
        }
    }

    pub fn with_default(mut self, value: &str) -> Self {
        self.default = Some(value.to_owned());
        self
    }
}

impl From<&Argument> for AttributeDefinition {
    fn from(arg: &Argument) -> Self {
        AttributeDefinition::new(arg.name(), arg.type_name(), arg.nullable(), arg.is_list())
    }
}

/// A generation strategy selected by a definition's deriving.
pub trait Convention: Send + Sync {
    fn class_kind(&self) -> ClassKind;

    /// Extra fully-qualified names to import.
    fn uses(&self) -> Vec<String> {
        Vec::new()
    }

    fn extends(&self) -> Vec<String> {
        Vec::new()
    }

    fn implements(&self) -> Vec<String> {
        Vec::new()
    }

    fn traits(&self) -> Vec<String> {
        Vec::new()
    }

    fn public_consts(&self) -> Vec<ConstDefinition> {
        Vec::new()
    }

    fn private_consts(&self) -> Vec<ConstDefinition> {
        Vec::new()
    }

    fn protected_attrs(&self) -> Vec<AttributeDefinition> {
        Vec::new()
    }

    fn private_attrs(&self) -> Vec<AttributeDefinition> {
        Vec::new()
    }

    /// Reject constructors that do not fit the convention. The error is a
    /// human-readable reason.
    fn validate(&self, _constructor: &Constructor) -> Result<(), String> {
        Ok(())
    }
}
