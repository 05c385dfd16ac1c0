//! Integration tests for the `shorthand` CLI binary.
//!
//! These drive the `build` and `render` subcommands through the real binary,
//! covering argument joining, JSON/YAML/TOML output, `@file` options, stdin and file
//! I/O, and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn fixtures_dir() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures")
}

fn request_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/request.json")
}

fn shorthand() -> Command {
    Command::cargo_bin("shorthand").unwrap()
}

/// Run `shorthand build` and parse stdout as JSON.
fn build_json(args: &[&str]) -> serde_json::Value {
    let output = shorthand()
        .arg("build")
        .args(args)
        .output()
        .expect("binary must run");
    assert!(
        output.status.success(),
        "build failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout must be JSON")
}

// ─────────────────────────────────────────────────────────────────────────────
// build
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn build_joins_arguments() {
    let value = build_json(&["foo.bar:", "1,", ".baz:", "true,", "tags:", "a,", "b"]);
    assert_eq!(
        value,
        serde_json::json!({"foo": {"bar": 1, "baz": true}, "tags": ["a", "b"]})
    );
}

#[test]
fn build_single_argument() {
    let value = build_json(&["ports[].container: 80, .host: 8080, [].container: 443"]);
    assert_eq!(
        value,
        serde_json::json!({"ports": [{"container": 80, "host": 8080}, {"container": 443}]})
    );
}

#[test]
fn build_pretty_json_by_default() {
    shorthand()
        .args(["build", "a: 1, b: 2"])
        .assert()
        .success()
        .stdout("{\n  \"a\": 1,\n  \"b\": 2\n}\n");
}

#[test]
fn build_compact_json() {
    shorthand()
        .args(["build", "--compact", "a: 1, b:~ 2"])
        .assert()
        .success()
        .stdout("{\"a\":1,\"b\":\"2\"}\n");
}

#[test]
fn build_yaml() {
    shorthand()
        .args(["build", "--format", "yaml", "name: demo, ports: 80, 443"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name: demo"))
        .stdout(predicate::str::contains("- 80"))
        .stdout(predicate::str::contains("- 443"));
}

#[test]
fn build_toml() {
    shorthand()
        .args([
            "build",
            "--format",
            "toml",
            "name: demo, ports: 80, 443, server{host: localhost, port: 8080}",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("name = \"demo\""))
        .stdout(predicate::str::contains("ports = [80, 443]"))
        .stdout(predicate::str::contains("[server]"))
        .stdout(predicate::str::contains("host = \"localhost\""))
        .stdout(predicate::str::contains("port = 8080"));
}

#[test]
fn build_toml_rejects_null() {
    shorthand()
        .args(["build", "-f", "toml", "name: demo, missing: null"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to encode TOML"));
}

#[test]
fn build_negative_number_argument() {
    let value = build_json(&["offset:", "-3"]);
    assert_eq!(value, serde_json::json!({"offset": -3}));
}

#[test]
fn build_loads_file_from_base_dir() {
    let value = build_json(&["--base-dir", fixtures_dir(), "body: @payload.json"]);
    assert_eq!(value, serde_json::json!({"body": {"greeting": "hi"}}));
}

#[test]
fn build_no_files_refuses_file_values() {
    shorthand()
        .args(["build", "--no-files", "--base-dir", fixtures_dir(), "body: @payload.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("file loading is disabled"));
}

#[test]
fn build_syntax_error_names_source() {
    shorthand()
        .args(["build", "--source-name", "cli", "foo bar"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cli:1:5: syntax error"));
}

#[test]
fn build_structure_error() {
    shorthand()
        .args(["build", "foo: 1, foo.bar: 2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot build `foo`"));
}

#[test]
fn build_logs_to_stderr_with_rust_log() {
    shorthand()
        .env("RUST_LOG", "debug")
        .args(["build", "--compact", "a: 1"])
        .assert()
        .success()
        .stdout("{\"a\":1}\n")
        .stderr(predicate::str::contains("building shorthand arguments"))
        .stderr(predicate::str::contains("built shorthand document"));
}

#[test]
fn build_requires_input() {
    shorthand().arg("build").assert().failure();
}

#[test]
fn build_to_output_file() {
    let output_path = std::env::temp_dir().join("shorthand-cli-build-output.json");
    let _ = std::fs::remove_file(&output_path);

    shorthand()
        .args(["build", "--compact", "-o"])
        .arg(&output_path)
        .arg("a.b: 1")
        .assert()
        .success()
        .stdout("");

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    assert_eq!(content, "{\"a\":{\"b\":1}}\n");
    let _ = std::fs::remove_file(&output_path);
}

// ─────────────────────────────────────────────────────────────────────────────
// render
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn render_stdin_to_stdout() {
    shorthand()
        .arg("render")
        .write_stdin(r#"{"foo": {"bar": 1}, "tags": ["a", "b"]}"#)
        .assert()
        .success()
        .stdout("foo.bar: 1, tags: a, b\n");
}

#[test]
fn render_file() {
    shorthand()
        .args(["render", "-i", request_json_path()])
        .assert()
        .success()
        .stdout(
            "image{repo: nginx, tag:~ 1.25}, labels.team: platform, name: demo, \
             ports[]{container: 80, host: 8080}, []{container: 443, host: 8443}, \
             replicas: 3\n",
        );
}

#[test]
fn render_output_rebuilds_to_same_json() {
    let rendered = shorthand()
        .args(["render", "-i", request_json_path()])
        .output()
        .expect("binary must run");
    assert!(rendered.status.success());
    let text = String::from_utf8(rendered.stdout).unwrap();

    let rebuilt = build_json(&[text.trim_end()]);
    let original: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(request_json_path()).unwrap()).unwrap();
    assert_eq!(rebuilt, original);
}

#[test]
fn render_rejects_non_object() {
    shorthand()
        .arg("render")
        .write_stdin("[1, 2]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be a JSON object, found list"));
}

#[test]
fn render_rejects_invalid_json() {
    shorthand()
        .arg("render")
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse input JSON"));
}

#[test]
fn render_missing_file() {
    shorthand()
        .args(["render", "-i", "/nonexistent/request.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot read JSON input /nonexistent/request.json"));
}
