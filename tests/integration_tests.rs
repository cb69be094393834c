//! Integration tests for the plaza CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get a plaza command
fn plaza() -> Command {
    Command::cargo_bin("plaza").unwrap()
}

const VALID_DATASET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<dataset>
  <metadata>
    <title>Población por distrito</title>
    <description>Habitantes empadronados por distrito municipal</description>
    <category>Demografia</category>
    <source>Padrón municipal</source>
    <updated>2025-03-15</updated>
    <license>CC BY 4.0</license>
    <tags>padron, distritos</tags>
  </metadata>
  <visualization>
    <type>bar</type>
    <config>
      <title>Habitantes por distrito</title>
    </config>
  </visualization>
  <data>
    <json>
    [
      {"distrito": "Centro", "habitantes": 12000},
      {"distrito": "Oeste", "habitantes": 9500}
    ]
    </json>
  </data>
</dataset>"#;

const VALID_CATEGORY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<category>
  <name>Demografia</name>
  <description>Datos de población</description>
  <icon>👥</icon>
</category>"#;

/// Missing required title and with an empty data array
const INVALID_DATASET: &str = r#"<dataset>
  <metadata>
    <description>d</description>
    <category>Demografia</category>
    <source>s</source>
    <updated>2025-01-01</updated>
    <license>CC BY 4.0</license>
  </metadata>
  <data><json>[{"a": 1}]</json></data>
</dataset>"#;

/// Valid shape but a category outside the standard list
const WARNING_DATASET: &str = r#"<dataset>
  <metadata>
    <title>t</title>
    <description>d</description>
    <category>Astrologia</category>
    <source>s</source>
    <updated>2025-01-01</updated>
    <license>CC BY 4.0</license>
  </metadata>
  <data><json>[{"a": 1}]</json></data>
</dataset>"#;

fn write_file(tmp: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = tmp.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    plaza()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("open data"));
}

#[test]
fn test_version_displays() {
    plaza()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("plaza"));
}

#[test]
fn test_unknown_command_fails() {
    plaza()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// ============================================================================
// Validate Command Tests
// ============================================================================

#[test]
fn test_validate_valid_dataset() {
    let tmp = TempDir::new().unwrap();
    let path = write_file(&tmp, "poblacion.xml", VALID_DATASET);

    plaza()
        .arg("validate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("All files passed validation"));
}

#[test]
fn test_validate_invalid_dataset_fails() {
    let tmp = TempDir::new().unwrap();
    let path = write_file(&tmp, "broken.xml", INVALID_DATASET);

    plaza()
        .arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed"));
}

#[test]
fn test_validate_warnings_pass_by_default() {
    let tmp = TempDir::new().unwrap();
    let path = write_file(&tmp, "odd.xml", WARNING_DATASET);

    plaza()
        .arg("validate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("warning"));
}

#[test]
fn test_validate_strict_promotes_warnings() {
    let tmp = TempDir::new().unwrap();
    let path = write_file(&tmp, "odd.xml", WARNING_DATASET);

    plaza()
        .arg("validate")
        .arg("--strict")
        .arg(&path)
        .assert()
        .failure();
}

#[test]
fn test_validate_walks_directories() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("datasets")).unwrap();
    write_file(&tmp, "datasets/a.xml", VALID_DATASET);
    write_file(&tmp, "cat.xml", VALID_CATEGORY);
    write_file(&tmp, "notes.txt", "not xml");

    plaza()
        .arg("validate")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Files checked:  2"));
}

#[test]
fn test_validate_type_filter() {
    let tmp = TempDir::new().unwrap();
    write_file(&tmp, "a.xml", VALID_DATASET);
    write_file(&tmp, "cat.xml", VALID_CATEGORY);

    plaza()
        .arg("validate")
        .arg("-t")
        .arg("category")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Files checked:  1"));
}

// ============================================================================
// Convert Command Tests
// ============================================================================

#[test]
fn test_convert_to_json() {
    let tmp = TempDir::new().unwrap();
    let path = write_file(&tmp, "poblacion.xml", VALID_DATASET);

    plaza()
        .arg("convert")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"Población por distrito\""))
        .stdout(predicate::str::contains("\"distrito\": \"Centro\""));
}

#[test]
fn test_convert_to_normalized_xml() {
    let tmp = TempDir::new().unwrap();
    let path = write_file(&tmp, "poblacion.xml", VALID_DATASET);

    plaza()
        .arg("convert")
        .arg("-f")
        .arg("xml")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("<json>"))
        .stdout(predicate::str::contains("<title>Población por distrito</title>"));
}

#[test]
fn test_convert_writes_output_file() {
    let tmp = TempDir::new().unwrap();
    let input = write_file(&tmp, "poblacion.xml", VALID_DATASET);
    let output = tmp.path().join("out.json");

    plaza()
        .arg("convert")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("\"habitantes\": 12000"));
}

#[test]
fn test_convert_malformed_xml_fails() {
    let tmp = TempDir::new().unwrap();
    let path = write_file(&tmp, "bad.xml", "<dataset><metadata></dataset>");

    plaza().arg("convert").arg(&path).assert().failure();
}

// ============================================================================
// Chart Command Tests
// ============================================================================

#[test]
fn test_chart_builds_bar_config() {
    let tmp = TempDir::new().unwrap();
    let path = write_file(&tmp, "poblacion.xml", VALID_DATASET);

    plaza()
        .arg("chart")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"bar\""))
        .stdout(predicate::str::contains("\"labels\""));
}

#[test]
fn test_chart_rejects_category() {
    let tmp = TempDir::new().unwrap();
    let path = write_file(&tmp, "cat.xml", VALID_CATEGORY);

    plaza()
        .arg("chart")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a dataset"));
}

// ============================================================================
// Render Command Tests
// ============================================================================

#[test]
fn test_render_template_against_dataset() {
    let tmp = TempDir::new().unwrap();
    let dataset = write_file(&tmp, "poblacion.xml", VALID_DATASET);
    let template = write_file(
        &tmp,
        "detail.html",
        "<h1>{{metadata.title}}</h1>{{#each data}}<li>{{distrito}}</li>{{/each}}",
    );

    plaza()
        .arg("render")
        .arg(&template)
        .arg(&dataset)
        .assert()
        .success()
        .stdout(predicate::str::contains("<h1>Población por distrito</h1>"))
        .stdout(predicate::str::contains("<li>Centro</li><li>Oeste</li>"));
}

// ============================================================================
// Template Command Tests
// ============================================================================

#[test]
fn test_template_prints_dataset_skeleton() {
    plaza()
        .arg("template")
        .assert()
        .success()
        .stdout(predicate::str::contains("<dataset>"))
        .stdout(predicate::str::contains("<metadata>"));
}

#[test]
fn test_template_prints_category_skeleton() {
    plaza()
        .arg("template")
        .arg("category")
        .assert()
        .success()
        .stdout(predicate::str::contains("<category>"));
}

#[test]
fn test_template_unknown_type_fails() {
    plaza()
        .arg("template")
        .arg("report")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown document type"));
}

// ============================================================================
// Pipeline Tests
// ============================================================================

#[test]
fn test_template_output_validates() {
    let tmp = TempDir::new().unwrap();

    let output = plaza().arg("template").output().unwrap();
    let skeleton = String::from_utf8(output.stdout).unwrap();
    let path = write_file(&tmp, "new.xml", &skeleton);

    plaza()
        .arg("validate")
        .arg("--strict")
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn test_normalized_xml_revalidates() {
    let tmp = TempDir::new().unwrap();
    let input = write_file(&tmp, "poblacion.xml", VALID_DATASET);
    let normalized = tmp.path().join("normalized.xml");

    plaza()
        .arg("convert")
        .arg("-f")
        .arg("xml")
        .arg(&input)
        .arg("-o")
        .arg(&normalized)
        .assert()
        .success();

    plaza()
        .arg("validate")
        .arg("--strict")
        .arg(&normalized)
        .assert()
        .success();
}
