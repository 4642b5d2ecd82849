//! Template assembly engine.
//!
//! Section order is fixed: namespace, imports, class header, traits,
//! constants, properties, constructor, accessors, `with` mutators.
//! The convention is validated against the constructor before any text
//! is produced.

use std::collections::HashSet;

use dtgen_core::ast::is_scalar_type;
use dtgen_core::{Constructor, Definition, DefinitionCollection};

use crate::convention::{AttributeDefinition, Convention};
use crate::error::GenerationError;
use crate::registry::ConventionRegistry;

const INDENT: &str = "    ";

/// One generated source unit.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedUnit {
    /// Fully qualified class name of the generated type.
    pub class_name: String,
    pub source: String,
}

/// Validate and assemble one definition.
pub fn assemble(
    definition: &Definition,
    convention: &dyn Convention,
) -> Result<GeneratedUnit, GenerationError> {
    convention
        .validate(definition.constructor())
        .map_err(|reason| GenerationError::ConventionViolation {
            definition: definition.qualified_name(),
            reason,
        })?;

    let mut text = String::from("<?php\n\ndeclare(strict_types=1);\n\n");
    if !definition.namespace().is_empty() {
        text.push_str(&format!("namespace {};\n\n", definition.namespace()));
    }

    let imports = import_section(convention);
    if !imports.is_empty() {
        text.push_str(&imports.join("\n"));
        text.push_str("\n\n");
    }

    text.push_str(&class_signature(definition.name(), convention));
    text.push_str("\n{\n");

    let body = class_body(definition.constructor(), convention);
    if !body.is_empty() {
        text.push_str(&body.join("\n\n"));
        text.push('\n');
    }
    text.push_str("}\n");

    Ok(GeneratedUnit {
        class_name: definition.qualified_name(),
        source: text,
    })
}

/// Resolve the definition's deriving in `registry`, then assemble.
pub fn generate(
    definition: &Definition,
    registry: &ConventionRegistry,
) -> Result<GeneratedUnit, GenerationError> {
    let deriving = definition.deriving().name();
    let convention =
        registry
            .resolve(deriving)
            .ok_or_else(|| GenerationError::UnknownDeriving {
                definition: definition.qualified_name(),
                deriving: deriving.to_owned(),
                namespace: registry.namespace().to_owned(),
            })?;
    let unit = assemble(definition, convention)?;
    tracing::debug!(class = %unit.class_name, deriving, "assembled definition");
    Ok(unit)
}

/// Assemble every definition of every collection, stopping at the first
/// failure.
pub fn generate_all(
    collections: &[DefinitionCollection],
    registry: &ConventionRegistry,
) -> Result<Vec<GeneratedUnit>, GenerationError> {
    let mut seen = HashSet::new();
    let mut units = Vec::new();
    for collection in collections {
        for definition in collection {
            let unit = generate(definition, registry)?;
            if !seen.insert(unit.class_name.clone()) {
                tracing::warn!(
                    class = %unit.class_name,
                    file = collection.file(),
                    "class generated more than once; the last one written wins"
                );
            }
            units.push(unit);
        }
    }
    Ok(units)
}

/// Member blocks of the class body, in emission order.
fn class_body(constructor: &Constructor, convention: &dyn Convention) -> Vec<String> {
    let mut blocks = Vec::new();

    let traits = trait_section(convention);
    if !traits.is_empty() {
        blocks.push(traits.join("\n"));
    }

    let constants = constant_section(convention);
    if !constants.is_empty() {
        blocks.push(constants.join("\n"));
    }

    let arguments: Vec<AttributeDefinition> = constructor
        .arguments()
        .iter()
        .map(AttributeDefinition::from)
        .collect();
    let private_attrs = convention.private_attrs();

    for attr in convention.protected_attrs() {
        blocks.push(property(&attr, "protected"));
    }
    for attr in &private_attrs {
        blocks.push(property(attr, "private"));
    }
    for attr in &arguments {
        blocks.push(property(attr, "private"));
    }

    blocks.push(constructor_method(&arguments));

    for attr in arguments.iter().chain(private_attrs.iter()) {
        blocks.push(accessor(attr));
    }
    for attr in arguments.iter().chain(private_attrs.iter()) {
        blocks.push(mutator(attr));
    }

    blocks
}

// ──────────────────────────────────────────────
// Sections
// ──────────────────────────────────────────────

fn import_section(convention: &dyn Convention) -> Vec<String> {
    convention
        .uses()
        .into_iter()
        .chain(convention.implements())
        .chain(convention.extends())
        .chain(convention.traits())
        .map(|name| format!("use \\{};", name.trim_start_matches('\\')))
        .collect()
}

fn class_signature(class_name: &str, convention: &dyn Convention) -> String {
    let mut text = format!("{} {}", convention.class_kind().keyword(), class_name);

    let extends = convention.extends();
    if !extends.is_empty() {
        text.push_str(" extends ");
        text.push_str(&short_names(&extends).join(", "));
    }

    let implements = convention.implements();
    if !implements.is_empty() {
        text.push_str(" implements ");
        text.push_str(&short_names(&implements).join(", "));
    }

    text
}

fn trait_section(convention: &dyn Convention) -> Vec<String> {
    short_names(&convention.traits())
        .into_iter()
        .map(|name| format!("{INDENT}use {};", name))
        .collect()
}

fn constant_section(convention: &dyn Convention) -> Vec<String> {
    let public = convention
        .public_consts()
        .into_iter()
        .map(|c| format!("{INDENT}public const {} = {};", c.key, c.value));
    let private = convention
        .private_consts()
        .into_iter()
        .map(|c| format!("{INDENT}private const {} = {};", c.key, c.value));
    public.chain(private).collect()
}

fn property(attr: &AttributeDefinition, visibility: &str) -> String {
    let mut text = format!(
        "{INDENT}/**\n{INDENT} * @var {}\n{INDENT} */\n{INDENT}{} ${}",
        doc_type(attr),
        visibility,
        attr.name
    );
    if let Some(default) = &attr.default {
        text.push_str(" = ");
        text.push_str(default);
    }
    text.push(';');
    text
}

fn constructor_method(arguments: &[AttributeDefinition]) -> String {
    let params: Vec<String> = arguments.iter().map(parameter).collect();
    let mut text = format!(
        "{INDENT}public function __construct({})\n{INDENT}{{",
        params.join(", ")
    );
    for attr in arguments {
        text.push_str(&format!(
            "\n{INDENT}{INDENT}$this->{} = ${};",
            attr.name, attr.name
        ));
    }
    text.push_str(&format!("\n{INDENT}}}"));
    text
}

fn accessor(attr: &AttributeDefinition) -> String {
    let return_type = type_hint(attr)
        .map(|hint| format!(": {}", hint))
        .unwrap_or_default();
    format!(
        "{INDENT}public function {name}(){return_type}\n{INDENT}{{\n{INDENT}{INDENT}return $this->{name};\n{INDENT}}}",
        name = attr.name,
    )
}

/// Copy-on-write: the clone receives the new value, `$this` is untouched.
fn mutator(attr: &AttributeDefinition) -> String {
    format!(
        "{INDENT}public function {method}({param}): self\n\
         {INDENT}{{\n\
         {INDENT}{INDENT}$new = clone $this;\n\
         {INDENT}{INDENT}$new->{name} = ${name};\n\
         \n\
         {INDENT}{INDENT}return $new;\n\
         {INDENT}}}",
        method = mutator_name(&attr.name),
        param = parameter(attr),
        name = attr.name,
    )
}

// ──────────────────────────────────────────────
// Type rendering
// ──────────────────────────────────────────────

/// `withName` for `name`.
pub fn mutator_name(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => format!("with{}{}", first.to_uppercase(), chars.as_str()),
        None => "with".to_owned(),
    }
}

/// Last segment of a qualified name.
fn short_names(names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|n| n.rsplit('\\').next().unwrap_or(n).to_owned())
        .collect()
}

/// Scalars as-is, class names fully qualified; empty stays empty.
fn qualified_type(type_name: &str) -> String {
    let bare = type_name.trim_start_matches('\\');
    if bare.is_empty() || is_scalar_type(bare) {
        bare.to_owned()
    } else {
        format!("\\{}", bare)
    }
}

/// Native type declaration, or `None` for untyped arguments.
fn type_hint(attr: &AttributeDefinition) -> Option<String> {
    let base = if attr.is_list {
        "array".to_owned()
    } else {
        qualified_type(&attr.type_name)
    };
    if base.is_empty() {
        return None;
    }
    Some(if attr.nullable {
        format!("?{}", base)
    } else {
        base
    })
}

fn parameter(attr: &AttributeDefinition) -> String {
    match type_hint(attr) {
        Some(hint) => format!("{} ${}", hint, attr.name),
        None => format!("${}", attr.name),
    }
}

/// `@var` annotation: semantic type, `[]` for lists, `|null` if nullable.
fn doc_type(attr: &AttributeDefinition) -> String {
    let mut text = qualified_type(&attr.type_name);
    if text.is_empty() {
        text.push_str("mixed");
    }
    if attr.is_list {
        text.push_str("[]");
    }
    if attr.nullable {
        text.push_str("|null");
    }
    text
}
