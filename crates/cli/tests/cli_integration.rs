//! CLI integration tests for the `dtgen` subcommands.
//!
//! Uses `assert_cmd` to spawn the binary and verify exit codes, stdout
//! content, and stderr content. Commands run from the workspace root so
//! fixture paths resolve relative to it.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Locate the workspace root by walking up from CARGO_MANIFEST_DIR.
fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    // crates/cli -> workspace root is two levels up
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

/// Helper: create a Command for the `dtgen` binary, rooted at workspace.
fn dtgen() -> Command {
    let mut cmd = cargo_bin_cmd!("dtgen");
    cmd.current_dir(workspace_root());
    cmd.env_remove("RUST_LOG");
    cmd
}

/// A scratch project with a composer.json mapping `Dtgen\Fixtures\` to src/.
fn scratch_project() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("composer.json"),
        r#"{"autoload": {"psr-4": {"Dtgen\\Fixtures\\": "src/"}}}"#,
    )
    .expect("write composer.json");
    dir
}

fn fixture(rel: &str) -> PathBuf {
    workspace_root().join("fixtures").join(rel)
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    dtgen()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("PHP value objects"));
}

#[test]
fn version_exits_0() {
    dtgen()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dtgen"));
}

#[test]
fn generate_requires_input_and_namespace() {
    dtgen()
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<INPUT>"));
}

// ──────────────────────────────────────────────
// 2. Parse subcommand
// ──────────────────────────────────────────────

#[test]
fn parse_prints_definitions_as_json() {
    let out = dtgen()
        .args(["parse", "fixtures/positive/shop.datatypes"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).expect("valid JSON");
    let defs = json["definitions"].as_array().expect("definitions array");
    assert_eq!(defs.len(), 6);
    assert_eq!(defs[0]["name"], "ProductId");
    assert_eq!(defs[3]["message_name"], "product.published");
}

#[test]
fn parse_error_exits_1_with_location() {
    dtgen()
        .args(["parse", "fixtures/negative/nested_namespace.datatypes"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("nested namespaces are not supported"))
        .stderr(predicate::str::contains("nested_namespace.datatypes:"));
}

#[test]
fn parse_error_json_output() {
    let out = dtgen()
        .args([
            "--output",
            "json",
            "parse",
            "fixtures/negative/truncated.datatypes",
        ])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).expect("valid JSON error");
    assert!(json["file"].as_str().unwrap().ends_with("truncated.datatypes"));
    assert!(json["line"].is_u64());
    assert!(json["message"].is_string());
}

#[test]
fn parse_missing_file_exits_1() {
    dtgen()
        .args(["parse", "fixtures/does_not_exist.datatypes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read file"));
}

// ──────────────────────────────────────────────
// 3. Generate subcommand
// ──────────────────────────────────────────────

#[test]
fn generate_writes_to_composer_psr4_path() {
    let project = scratch_project();
    dtgen()
        .current_dir(project.path())
        .arg("generate")
        .arg(fixture("positive/complex_class.datatypes"))
        .arg("Dtgen\\Conventions")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Successfully generated and written to disk",
        ));

    let written = fs::read_to_string(project.path().join("src/Output/ComplexClass.php"))
        .expect("generated file");
    let expected = fs::read_to_string(fixture("expected/ComplexClass.php")).unwrap();
    assert_eq!(written, expected);
}

#[test]
fn generate_with_explicit_composer_and_leading_backslash_namespace() {
    let project = scratch_project();
    dtgen()
        .arg("generate")
        .arg("fixtures/positive/complex_class.datatypes")
        .arg("\\Dtgen\\Conventions\\")
        .arg("--composer")
        .arg(project.path().join("composer.json"))
        .assert()
        .success();
    assert!(project.path().join("src/Output/ComplexClass.php").is_file());
}

#[test]
fn generate_directory_with_declarative_conventions() {
    let out = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();
    fs::copy(
        fixture("positive/shop.datatypes"),
        input.path().join("shop.datatypes"),
    )
    .unwrap();

    dtgen()
        .arg("generate")
        .arg(input.path())
        .arg("Shop\\Conventions")
        .args(["--conventions", "fixtures/conventions.toml"])
        .arg("--out-dir")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Shop\\Orders\\Order ->"));

    for class in [
        "Shop/Domain/ProductId.php",
        "Shop/Domain/Price.php",
        "Shop/Domain/Status.php",
        "Shop/Domain/ProductPublished.php",
        "Shop/Domain/Tags.php",
        "Shop/Orders/Order.php",
    ] {
        assert!(out.path().join(class).is_file(), "missing {}", class);
    }
}

#[test]
fn generate_dry_run_writes_nothing() {
    let out = TempDir::new().unwrap();
    let stdout = dtgen()
        .args(["--output", "json", "generate"])
        .arg("fixtures/positive/complex_class.datatypes")
        .arg("Dtgen\\Conventions")
        .arg("--out-dir")
        .arg(out.path())
        .arg("--dry-run")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&stdout).expect("valid JSON");
    assert_eq!(json["dry_run"], true);
    assert_eq!(
        json["generated"][0]["class"],
        "Dtgen\\Fixtures\\Output\\ComplexClass"
    );
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn generate_convention_violation_writes_nothing() {
    let out = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();
    fs::copy(
        fixture("positive/complex_class.datatypes"),
        input.path().join("a.datatypes"),
    )
    .unwrap();
    fs::copy(
        fixture("negative/missing_id.datatypes"),
        input.path().join("b.datatypes"),
    )
    .unwrap();

    dtgen()
        .arg("generate")
        .arg(input.path())
        .arg("Dtgen\\Conventions")
        .arg("--out-dir")
        .arg(out.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "'string $id' should be provided for ComplexClassType as convention",
        ));
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn generate_unknown_deriving_exits_1() {
    let out = TempDir::new().unwrap();
    dtgen()
        .args([
            "generate",
            "fixtures/negative/unknown_deriving.datatypes",
            "Dtgen\\Conventions",
        ])
        .arg("--out-dir")
        .arg(out.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("NoSuchConvention"));
}

#[test]
fn generate_unknown_namespace_exits_1() {
    dtgen()
        .args([
            "--output",
            "json",
            "generate",
            "fixtures/positive/complex_class.datatypes",
            "No\\Such\\Namespace",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"error\""))
        .stderr(predicate::str::contains("unknown convention namespace"));
}

#[test]
fn generate_parse_error_aborts_whole_run() {
    let out = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();
    fs::copy(
        fixture("positive/complex_class.datatypes"),
        input.path().join("a.datatypes"),
    )
    .unwrap();
    fs::copy(
        fixture("negative/truncated.datatypes"),
        input.path().join("b.datatypes"),
    )
    .unwrap();

    dtgen()
        .arg("generate")
        .arg(input.path())
        .arg("Dtgen\\Conventions")
        .arg("--out-dir")
        .arg(out.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse error"));
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn generate_unmapped_class_reports_psr_failure() {
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join("composer.json"),
        r#"{"autoload": {"psr-4": {"Elsewhere\\": "src/"}}}"#,
    )
    .unwrap();
    dtgen()
        .current_dir(project.path())
        .arg("generate")
        .arg(fixture("positive/complex_class.datatypes"))
        .arg("Dtgen\\Conventions")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "could not find psr autoloading path for Dtgen\\Fixtures\\Output\\ComplexClass",
        ));
    assert!(!project.path().join("src").exists());
}

#[test]
fn generate_empty_directory_exits_1() {
    let input = TempDir::new().unwrap();
    dtgen()
        .arg("generate")
        .arg(input.path())
        .arg("Dtgen\\Conventions")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no .datatypes files found"));
}

#[test]
fn quiet_suppresses_error_text_but_keeps_exit_code() {
    dtgen()
        .args([
            "--quiet",
            "generate",
            "fixtures/positive/complex_class.datatypes",
            "No\\Such\\Namespace",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::is_empty());
}

// ──────────────────────────────────────────────
// 4. Conventions subcommand
// ──────────────────────────────────────────────

#[test]
fn conventions_lists_builtin_namespace() {
    dtgen()
        .arg("conventions")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dtgen\\Conventions"))
        .stdout(predicate::str::contains("  ComplexClassType"))
        .stdout(predicate::str::contains("  ValueObject"));
}

#[test]
fn conventions_json_includes_loaded_file() {
    let out = dtgen()
        .args([
            "--output",
            "json",
            "conventions",
            "--conventions",
            "fixtures/conventions.toml",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).expect("valid JSON");
    let names: Vec<&str> = json["namespaces"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["namespace"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Dtgen\\Conventions", "Shop\\Conventions"]);
}

#[test]
fn conventions_invalid_file_exits_1() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.toml");
    fs::write(&bad, "[[namespace]]\nname = 3\n").unwrap();
    dtgen()
        .arg("conventions")
        .arg("--conventions")
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid conventions file"));
}
