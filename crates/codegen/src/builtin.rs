//! Conventions compiled into the binary, registered under
//! [`BUILTIN_NAMESPACE`].

use dtgen_core::Constructor;

use crate::convention::{AttributeDefinition, ClassKind, ConstDefinition, Convention};
use crate::registry::ConventionRegistry;

pub const BUILTIN_NAMESPACE: &str = "Dtgen\\Conventions";

/// Registry holding every built-in convention.
pub fn registry() -> ConventionRegistry {
    let mut registry = ConventionRegistry::new(BUILTIN_NAMESPACE);
    registry.register("ComplexClassType", ComplexClassType);
    registry.register("ValueObject", ValueObject);
    registry
}

/// Exercises every capability; requires an `id` argument.
pub struct ComplexClassType;

impl Convention for ComplexClassType {
    fn class_kind(&self) -> ClassKind {
        ClassKind::Final
    }

    fn uses(&self) -> Vec<String> {
        vec!["Some\\YetAnother\\CustomNamespace\\UsedClass".into()]
    }

    fn extends(&self) -> Vec<String> {
        vec!["Some\\Other\\CustomNamespace\\ExtensibleClass".into()]
    }

    fn implements(&self) -> Vec<String> {
        vec![
            "Some\\CustomNamespace\\InterfaceClass".into(),
            "Some\\CustomNamespace\\AnotherInterfaceClass".into(),
        ]
    }

    fn traits(&self) -> Vec<String> {
        vec!["Traits\\SomeTrait".into(), "Traits\\AnotherTrait".into()]
    }

    fn public_consts(&self) -> Vec<ConstDefinition> {
        vec![
            ConstDefinition::new("someKey1", "\"someValue1\""),
            ConstDefinition::new("someKey2", "\"someValue2\""),
        ]
    }

    fn private_consts(&self) -> Vec<ConstDefinition> {
        vec![
            ConstDefinition::new("someKey3", "5"),
            ConstDefinition::new("someKey4", "10"),
        ]
    }

    fn protected_attrs(&self) -> Vec<AttributeDefinition> {
        vec![
            AttributeDefinition::new("protectedAttr1", "string", false, false)
                .with_default("\"hello\""),
            AttributeDefinition::new("protectedAttr2", "string", false, false),
        ]
    }

    fn private_attrs(&self) -> Vec<AttributeDefinition> {
        vec![
            AttributeDefinition::new("privateAttr1", "string", false, false)
                .with_default("\"hello\""),
            AttributeDefinition::new("privateAttr2", "int", false, false).with_default("5"),
            AttributeDefinition::new("privateAttr3", "int", false, false),
            AttributeDefinition::new("nullablePrivateAttr4", "int", true, false),
            AttributeDefinition::new("listPrivateAttr5", "string", false, true),
        ]
    }

    fn validate(&self, constructor: &Constructor) -> Result<(), String> {
        match constructor.argument("id") {
            Some(_) => Ok(()),
            None => Err("'string $id' should be provided for ComplexClassType as convention".into()),
        }
    }
}

/// Plain final value object.
pub struct ValueObject;

impl Convention for ValueObject {
    fn class_kind(&self) -> ClassKind {
        ClassKind::Final
    }
}
