//! End-to-end generation over the fixtures: parse, resolve conventions,
//! assemble, and write.

use std::path::{Path, PathBuf};

use dtgen_codegen::{
    builtin::BUILTIN_NAMESPACE, emit, generate_all, ComposerAutoload, ConventionCatalog,
    GenerationError, OutDirResolver, PathResolver,
};
use dtgen_core::{parse_file, DefinitionCollection, FileSystemProvider};

fn fixture(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures")
        .join(rel)
}

fn parse_fixture(rel: &str) -> DefinitionCollection {
    parse_file(&FileSystemProvider, &fixture(rel)).expect("fixture should parse")
}

fn without_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

fn shop_catalog() -> ConventionCatalog {
    let mut catalog = ConventionCatalog::builtin();
    catalog
        .load_file(&fixture("conventions.toml"))
        .expect("conventions fixture should load");
    catalog
}

#[test]
fn complex_class_matches_expected_output() {
    let collection = parse_fixture("positive/complex_class.datatypes");
    let catalog = ConventionCatalog::builtin();
    let registry = catalog.registry(BUILTIN_NAMESPACE).unwrap();

    let units = generate_all(&[collection], registry).unwrap();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].class_name, "Dtgen\\Fixtures\\Output\\ComplexClass");

    let expected = std::fs::read_to_string(fixture("expected/ComplexClass.php")).unwrap();
    assert_eq!(
        without_whitespace(&units[0].source),
        without_whitespace(&expected)
    );
    // the layout itself is stable too
    assert_eq!(units[0].source, expected);
}

#[test]
fn missing_required_argument_fails_generation() {
    let collection = parse_fixture("negative/missing_id.datatypes");
    let catalog = ConventionCatalog::builtin();
    let registry = catalog.registry(BUILTIN_NAMESPACE).unwrap();

    let err = generate_all(&[collection], registry).unwrap_err();
    match &err {
        GenerationError::ConventionViolation { definition, reason } => {
            assert_eq!(definition, "Dtgen\\Fixtures\\Output\\ComplexClass");
            assert!(reason.contains("'string $id' should be provided"));
        }
        other => panic!("expected convention violation, got {:?}", other),
    }
}

#[test]
fn unknown_deriving_names_the_namespace() {
    let collection = parse_fixture("negative/unknown_deriving.datatypes");
    let catalog = ConventionCatalog::builtin();
    let registry = catalog.registry(BUILTIN_NAMESPACE).unwrap();

    let err = generate_all(&[collection], registry).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Acme\\Foo: no convention registered for deriving 'NoSuchConvention' in namespace 'Dtgen\\Conventions'"
    );
}

#[test]
fn declarative_conventions_generate_the_shop() {
    let catalog = shop_catalog();
    let registry = catalog.registry("Shop\\Conventions").unwrap();
    let units = generate_all(&[parse_fixture("positive/shop.datatypes")], registry).unwrap();

    let names: Vec<&str> = units.iter().map(|u| u.class_name.as_str()).collect();
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

    let price = &units[1].source;
    assert!(price.contains("use \\Shop\\Support\\ValueObject;"));
    assert!(price.contains("final class Price implements ValueObject\n"));
    assert!(price.contains(
        "public function __construct(int $amount, \\Shop\\Money\\Currency $currency)"
    ));

    let status = &units[2].source;
    assert!(status.contains("public const OPTIONS = ['Draft', 'Published', 'Archived'];"));

    let event = &units[3].source;
    assert!(event.contains("final class ProductPublished extends AggregateChanged\n"));
    assert!(event.contains("    use RecordsMetadata;\n"));
    assert!(event.contains("private $version = 0;"));
    assert!(event.contains("public function withVersion(int $version): self"));
    assert!(event.contains("?\\Shop\\Domain\\Price $price"));

    let order = &units[5].source;
    assert!(order.contains("namespace Shop\\Orders;"));
    assert!(order.contains(
        "public function __construct(\\Shop\\Orders\\OrderId $id, array $products, $note)"
    ));
    assert!(order.contains("* @var \\Shop\\Domain\\ProductId[]"));
}

#[test]
fn declarative_required_arguments_are_enforced() {
    let mut catalog = ConventionCatalog::empty();
    catalog
        .add_toml(
            "[[namespace]]\nname = \"Strict\"\n\
             [namespace.conventions.ValueObject]\nrequired_arguments = [\"value\"]\n",
            "inline",
        )
        .unwrap();
    let registry = catalog.registry("Strict").unwrap();

    let err = generate_all(&[parse_fixture("positive/shop.datatypes")], registry).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Shop\\Domain\\ProductId: constructor 'Shop\\Domain\\ProductId' is missing required argument(s): $value"
    );
}

#[test]
fn composer_paths_for_the_shop() {
    let autoload = ComposerAutoload::from_composer_json(&fixture("composer.json")).unwrap();
    let root = fixture("");
    assert_eq!(
        autoload.resolve_path("Shop\\Domain\\Price").unwrap(),
        root.join("src/Domain/Price.php")
    );
    assert_eq!(
        autoload.resolve_path("Shop\\Orders\\Order").unwrap(),
        root.join("modules/orders/Order.php")
    );
    assert_eq!(
        autoload.resolve_path("Dtgen_Sample_Thing").unwrap(),
        root.join("tests/Dtgen/Sample/Thing.php")
    );
    assert!(matches!(
        autoload.resolve_path("Elsewhere\\Thing"),
        Err(GenerationError::PathResolution { .. })
    ));
}

#[test]
fn emit_writes_every_unit_under_out_dir() {
    let catalog = shop_catalog();
    let registry = catalog.registry("Shop\\Conventions").unwrap();
    let units = generate_all(&[parse_fixture("positive/shop.datatypes")], registry).unwrap();

    let out = tempfile::tempdir().unwrap();
    let written = emit(&units, &OutDirResolver::new(out.path())).unwrap();
    assert_eq!(written.len(), units.len());

    let order = std::fs::read_to_string(out.path().join("Shop/Orders/Order.php")).unwrap();
    assert_eq!(order, units[5].source);
    assert!(out.path().join("Shop/Domain/Tags.php").is_file());
}

#[test]
fn emit_through_a_copied_composer_project() {
    let project = tempfile::tempdir().unwrap();
    std::fs::copy(fixture("composer.json"), project.path().join("composer.json")).unwrap();
    let autoload =
        ComposerAutoload::from_composer_json(&project.path().join("composer.json")).unwrap();

    let catalog = ConventionCatalog::builtin();
    let registry = catalog.registry(BUILTIN_NAMESPACE).unwrap();
    let mut units =
        generate_all(&[parse_fixture("positive/complex_class.datatypes")], registry).unwrap();
    // Dtgen\Fixtures\Output is not covered by the fixture's psr-4 map
    assert!(emit(&units, &autoload).is_err());

    units[0].class_name = "Shop\\Generated\\ComplexClass".into();
    let written = emit(&units, &autoload).unwrap();
    assert_eq!(
        written,
        vec![project.path().join("src/Generated/ComplexClass.php")]
    );
}
