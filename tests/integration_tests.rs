//! Integration tests for the DFO CLI
//!
//! These tests exercise the binary end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use dfo::document::{parse_document, Format, Node};

const SAMPLE_JSON: &str = r#"{"name":"Alice","dob":"1990-01-01"}"#;

/// Helper to get a dfo command isolated from the caller's environment
fn dfo() -> Command {
    let mut cmd = Command::cargo_bin("dfo").unwrap();
    cmd.env_remove("DFO_SEED")
        .env_remove("DFO_NAME_STYLE")
        .env_remove("DFO_LOG");
    cmd
}

/// Helper to write an input file into a temp directory
fn write_input(tmp: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = tmp.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn read_doc(path: &PathBuf, format: Format) -> Node {
    let content = fs::read_to_string(path).unwrap();
    parse_document(&content, format, &path.display().to_string())
        .unwrap()
        .root
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    dfo()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("--input"))
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--type"));
}

#[test]
fn test_version_displays() {
    dfo()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dfo"));
}

#[test]
fn test_missing_input_fails() {
    dfo()
        .args(["-o", "out.xml"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--input"));
}

#[test]
fn test_missing_output_fails() {
    dfo()
        .args(["-i", "in.json"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--output"));
}

#[test]
fn test_completions() {
    dfo()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dfo"));
}

// ============================================================================
// Transformation Tests
// ============================================================================

#[test]
fn test_json_to_xml_example() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "person.json", SAMPLE_JSON);
    let output = tmp.path().join("person.xml");

    dfo()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["-t", "json_to_xml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote xml"));

    let xml = fs::read_to_string(&output).unwrap();
    assert!(xml.starts_with("<?xml"));
    assert!(!xml.contains("<name>"));
    assert!(!xml.contains("<dob>"));
    assert!(!xml.contains("1990-01-01"));
    assert!(xml.contains("Alice"));

    let root = read_doc(&output, Format::Xml);
    let keys = root.keys();
    assert_eq!(keys.len(), 2);

    let date = match &root {
        Node::Map(entries) => entries[1].1.as_str().unwrap().to_string(),
        other => panic!("unexpected root {:?}", other),
    };
    let allowed = ["01/01/1990", "01.01.1990", "1990/01/01", "01-Jan-1990"];
    assert!(allowed.contains(&date.as_str()), "unexpected date {}", date);
}

#[test]
fn test_format_inferred_from_output_extension() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "in.json", SAMPLE_JSON);
    let output = tmp.path().join("out.yaml");

    dfo()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let original = read_doc(&input, Format::Json);
    let root = read_doc(&output, Format::Yaml);
    assert!(root.same_shape(&original));
    assert!(!root.keys().contains(&"name".to_string()));
}

#[test]
fn test_date_obfuscation_keeps_keys() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(
        &tmp,
        "in.json",
        r#"{"name": "Alice", "dob": "1990-01-01", "visits": ["2021-06-30", "n/a"]}"#,
    );
    let output = tmp.path().join("out.json");

    dfo()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["-t", "date_obfuscation"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 dates reformatted"));

    let root = read_doc(&output, Format::Json);
    assert_eq!(root.keys(), vec!["name", "dob", "visits"]);
    assert_eq!(root.get("name").and_then(Node::as_str), Some("Alice"));
    assert_ne!(root.get("dob").and_then(Node::as_str), Some("1990-01-01"));
}

#[test]
fn test_xml_input_to_json() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(
        &tmp,
        "in.xml",
        "<people><person><name>Bob</name><born>1985-07-14</born></person></people>",
    );
    let output = tmp.path().join("out.json");

    dfo()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["-t", "xml_to_json", "--seed", "1"])
        .assert()
        .success();

    let root = read_doc(&output, Format::Json);
    let keys = root.keys();
    assert_eq!(keys.len(), 3);
    for original in ["person", "name", "born"] {
        assert!(!keys.contains(&original.to_string()));
    }
}

#[test]
fn test_seed_gives_identical_output() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "in.json", SAMPLE_JSON);
    let first = tmp.path().join("a.xml");
    let second = tmp.path().join("b.xml");

    for out in [&first, &second] {
        dfo()
            .arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(out)
            .args(["--seed", "42", "-q"])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }

    assert_eq!(
        fs::read_to_string(&first).unwrap(),
        fs::read_to_string(&second).unwrap()
    );
}

#[test]
fn test_seed_from_environment() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "in.json", SAMPLE_JSON);
    let output = tmp.path().join("out.xml");

    dfo()
        .env("DFO_SEED", "99")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("seed 99"));
}

#[test]
fn test_stdout_output() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "in.json", SAMPLE_JSON);

    let assert = dfo()
        .arg("-i")
        .arg(&input)
        .args(["-o", "-", "-t", "xml"])
        .assert()
        .success()
        .stderr(predicate::str::contains("stdout"));

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let doc = parse_document(&stdout, Format::Xml, "<stdout>").unwrap();
    assert_eq!(doc.root.keys().len(), 2);
}

#[test]
fn test_stdin_input() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("out.json");

    dfo()
        .args(["-i", "-", "-t", "full"])
        .arg("-o")
        .arg(&output)
        .write_stdin(r#"{"salary": 125000, "since": "2015-03-01"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 number reformatted"));

    let root = read_doc(&output, Format::Json);
    assert_eq!(root.keys().len(), 2);
}

#[test]
fn test_config_file() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "in.json", r#"{"dob": "1990-02-03"}"#);
    let config = write_input(
        &tmp,
        "dfo.yaml",
        "seed: 5\ndate_formats: ['%d/%m/%Y']\nindent: 2\n",
    );
    let output = tmp.path().join("out.json");

    dfo()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("-c")
        .arg(&config)
        .args(["-t", "date_obfuscation"])
        .assert()
        .success();

    let content = fs::read_to_string(&output).unwrap();
    insta::assert_snapshot!(content.trim_end(), @r#"
    {
      "dob": "03/02/1990"
    }
    "#);
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
fn test_unsupported_transform_type() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "in.json", SAMPLE_JSON);
    let output = tmp.path().join("out.xml");

    dfo()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["-t", "csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported output format"));

    assert!(!output.exists());
}

#[test]
fn test_unsupported_output_extension() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "in.json", SAMPLE_JSON);
    let output = tmp.path().join("out.csv");

    dfo()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported output format"));
}

#[test]
fn test_missing_input_file() {
    let tmp = TempDir::new().unwrap();

    dfo()
        .arg("-i")
        .arg(tmp.path().join("missing.json"))
        .arg("-o")
        .arg(tmp.path().join("out.xml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_malformed_input() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "in.json", "{\"name\": \"Alice\",}");

    dfo()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(tmp.path().join("out.xml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("json syntax error"));
}

#[test]
fn test_unsupported_input_type() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "in.csv", "a,b\n1,2\n");

    dfo()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(tmp.path().join("out.xml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported input file type"));
}

#[test]
fn test_same_input_and_output() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "in.json", SAMPLE_JSON);

    dfo()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("same file"));

    assert_eq!(fs::read_to_string(&input).unwrap(), SAMPLE_JSON);
}
