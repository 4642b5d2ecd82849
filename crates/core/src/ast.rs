//! Definition model produced by the parser and consumed by code generation.
//!
//! Every value here is created once during parsing and never mutated.
//! `Definition` can only be built through [`Definition::new`], which
//! enforces the one-constructor / one-deriving invariant.

use serde::Serialize;
use indexmap::IndexMap;

/// Scalar argument types; never namespace-prefixed.
pub const SCALAR_TYPES: [&str; 4] = ["string", "int", "bool", "float"];

/// Scalar constructor shorthands accepted with a `[]` suffix.
pub const SCALAR_CONSTRUCTORS: [&str; 4] = ["Bool", "Float", "Int", "String"];

pub fn is_scalar_type(name: &str) -> bool {
    SCALAR_TYPES.contains(&name)
}

/// `Bool`, `Bool[]`, ... `String[]`.
pub fn is_scalar_constructor(name: &str) -> bool {
    let base = name.strip_suffix("[]").unwrap_or(name);
    SCALAR_CONSTRUCTORS.contains(&base)
}

// ──────────────────────────────────────────────
// Arguments and constructors
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Argument {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    nullable: bool,
    is_list: bool,
}

impl Argument {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, nullable: bool, is_list: bool) -> Self {
        Argument {
            name: name.into(),
            type_name: type_name.into(),
            nullable,
            is_list,
        }
    }

    /// A bare `$name` argument. The type stays empty and is passed through as-is.
    pub fn untyped(name: impl Into<String>) -> Self {
        Argument::new(name, "", false, false)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_list(&self) -> bool {
        self.is_list
    }

    pub fn is_scalar(&self) -> bool {
        is_scalar_type(&self.type_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Constructor {
    name: String,
    arguments: Vec<Argument>,
}

impl Constructor {
    pub fn new(name: impl Into<String>, arguments: Vec<Argument>) -> Self {
        Constructor {
            name: name.into(),
            arguments,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|a| a.name == name)
    }
}

// ──────────────────────────────────────────────
// Deriving
// ──────────────────────────────────────────────

/// Deriving name that carries a value mapping.
pub const ENUM_DERIVING: &str = "Enum";

/// Derivings that accept a `: "message.name"` annotation.
pub const MESSAGE_DERIVINGS: [&str; 4] = ["AggregateChanged", "Command", "DomainEvent", "Query"];

/// Resolved value of one enum case.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnumValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl std::fmt::Display for EnumValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnumValue::Int(n) => write!(f, "{}", n),
            EnumValue::Float(x) => write!(f, "{}", x),
            EnumValue::Str(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Deriving {
    /// Plain strategy selection by name.
    Named { name: String },
    /// `Enum`, with the constructor-name to value table from `with (...)`.
    Enum { values: IndexMap<String, EnumValue> },
}

impl Deriving {
    pub fn from_name(name: &str) -> Self {
        if name == ENUM_DERIVING {
            Deriving::Enum {
                values: IndexMap::new(),
            }
        } else {
            Deriving::Named {
                name: name.to_owned(),
            }
        }
    }

    /// Identifier used for convention lookup.
    pub fn name(&self) -> &str {
        match self {
            Deriving::Named { name } => name,
            Deriving::Enum { .. } => ENUM_DERIVING,
        }
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, Deriving::Enum { .. })
    }
}

// ──────────────────────────────────────────────
// Conditions
// ──────────────────────────────────────────────

/// Constructor scope of a condition that applies to every constructor.
pub const ANY_CONSTRUCTOR: &str = "_";

/// A `where` guard. The expression is an opaque token span; it is never
/// evaluated by the compiler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub constructor: String,
    pub expression: String,
    pub message: String,
}

// ──────────────────────────────────────────────
// Definitions
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DefinitionError {
    #[error("no constructor given")]
    MissingConstructor,
    #[error("multiple constructors not supported")]
    MultipleConstructors,
    #[error("no deriving given")]
    MissingDeriving,
    #[error("multiple derivings not supported")]
    MultipleDerivings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Definition {
    namespace: String,
    name: String,
    constructor: Constructor,
    deriving: Deriving,
    conditions: Vec<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_name: Option<String>,
}

impl Definition {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        constructors: Vec<Constructor>,
        derivings: Vec<Deriving>,
        conditions: Vec<Condition>,
        message_name: Option<String>,
    ) -> Result<Self, DefinitionError> {
        if constructors.len() > 1 {
            return Err(DefinitionError::MultipleConstructors);
        }
        if derivings.len() > 1 {
            return Err(DefinitionError::MultipleDerivings);
        }
        let constructor = constructors
            .into_iter()
            .next()
            .ok_or(DefinitionError::MissingConstructor)?;
        let deriving = derivings
            .into_iter()
            .next()
            .ok_or(DefinitionError::MissingDeriving)?;
        Ok(Definition {
            namespace: namespace.into(),
            name: name.into(),
            constructor,
            deriving,
            conditions,
            message_name,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constructor(&self) -> &Constructor {
        &self.constructor
    }

    pub fn deriving(&self) -> &Deriving {
        &self.deriving
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn message_name(&self) -> Option<&str> {
        self.message_name.as_deref()
    }

    /// `Namespace\Name`, or just `Name` in the global namespace.
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}\\{}", self.namespace, self.name)
        }
    }
}

/// Definitions of one input file, in declaration order. Duplicate names are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DefinitionCollection {
    file: String,
    definitions: Vec<Definition>,
}

impl DefinitionCollection {
    pub fn new(file: &str) -> Self {
        DefinitionCollection {
            file: file.to_owned(),
            definitions: Vec::new(),
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn push(&mut self, definition: Definition) {
        self.definitions.push(definition);
    }

    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Definition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl<'a> IntoIterator for &'a DefinitionCollection {
    type Item = &'a Definition;
    type IntoIter = std::slice::Iter<'a, Definition>;

    fn into_iter(self) -> Self::IntoIter {
        self.definitions.iter()
    }
}
