//! Parses the `.datatypes` fixtures under `fixtures/` and checks the
//! resulting definition model.

use std::path::{Path, PathBuf};

use dtgen_core::{parse_file, Argument, Deriving, EnumValue, FileSystemProvider};

/// Locate the fixtures directory by walking up from CARGO_MANIFEST_DIR.
fn fixture(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures")
        .join(rel)
}

#[test]
fn complex_class_fixture() {
    let c = parse_file(&FileSystemProvider, &fixture("positive/complex_class.datatypes"))
        .expect("fixture should parse");
    assert_eq!(c.len(), 1);
    let d = &c.definitions()[0];
    assert_eq!(d.qualified_name(), "Dtgen\\Fixtures\\Output\\ComplexClass");
    assert_eq!(d.deriving().name(), "ComplexClassType");
    assert_eq!(
        d.constructor().arguments(),
        &[
            Argument::new("id", "string", false, false),
            Argument::new("otherThing", "int", false, false),
            Argument::new("nullable", "int", true, false),
            Argument::new("lastThing", "string", false, true),
        ]
    );
}

#[test]
fn shop_fixture_covers_the_grammar() {
    let c = parse_file(&FileSystemProvider, &fixture("positive/shop.datatypes"))
        .unwrap_or_else(|e| panic!("fixture should parse: {}", e));

    let names: Vec<String> = c.iter().map(|d| d.qualified_name()).collect();
    assert_eq!(
        names,
        vec![
            "Shop\\Domain\\ProductId",
            "Shop\\Domain\\Price",
            "Shop\\Domain\\Status",
            "Shop\\Domain\\ProductPublished",
            "Shop\\Domain\\Tags",
            "Shop\\Orders\\Order",
        ]
    );

    let price = &c.definitions()[1];
    assert_eq!(price.constructor().arguments()[1].type_name(), "Shop\\Money\\Currency");
    assert_eq!(price.conditions().len(), 1);
    assert_eq!(price.conditions()[0].expression, "$amount < 0");

    match c.definitions()[2].deriving() {
        Deriving::Enum { values } => {
            assert_eq!(values["Draft"], EnumValue::Int(1));
            assert_eq!(values["Published"], EnumValue::Int(2));
            assert_eq!(values["Archived"], EnumValue::Str("archived".into()));
        }
        other => panic!("expected enum deriving, got {:?}", other),
    }

    let published = &c.definitions()[3];
    assert_eq!(published.message_name(), Some("product.published"));
    let args = published.constructor().arguments();
    assert_eq!(args[0].type_name(), "Shop\\Domain\\ProductId");
    assert!(args[1].nullable());
    assert!(args[2].is_list());

    assert_eq!(c.definitions()[4].constructor().name(), "String[]");

    let order = &c.definitions()[5];
    let args = order.constructor().arguments();
    assert_eq!(args[0].type_name(), "Shop\\Orders\\OrderId");
    assert_eq!(args[1].type_name(), "Shop\\Domain\\ProductId");
    assert!(args[1].is_list());
    assert_eq!(args[2], Argument::untyped("note"));
    let scopes: Vec<&str> = order
        .conditions()
        .iter()
        .map(|c| c.constructor.as_str())
        .collect();
    assert_eq!(scopes, vec!["Shop\\Orders\\Order", "_"]);
    assert_eq!(order.conditions()[1].expression, "strlen($id->value()) > 36");
}

#[test]
fn nested_namespace_fixture_is_rejected() {
    let path = fixture("negative/nested_namespace.datatypes");
    let err = parse_file(&FileSystemProvider, &path).unwrap_err();
    assert_eq!(err.line, 1);
    assert!(err.message.contains("nested namespaces"));
    assert!(err.file.ends_with("nested_namespace.datatypes"));
}

#[test]
fn truncated_fixture_reports_end_of_input() {
    let err = parse_file(&FileSystemProvider, &fixture("negative/truncated.datatypes")).unwrap_err();
    assert_eq!(err.message, "unexpected end of input");
}

#[test]
fn collection_serializes_to_json() {
    let c = parse_file(&FileSystemProvider, &fixture("positive/shop.datatypes")).unwrap();
    let v = serde_json::to_value(&c).unwrap();
    assert_eq!(v["definitions"][2]["deriving"]["kind"], "enum");
    assert_eq!(v["definitions"][2]["deriving"]["values"]["Published"], 2);
    assert_eq!(v["definitions"][3]["message_name"], "product.published");
}
