//! Integration tests for docdeps
//!
//! These tests drive the compiled binary end to end: manifest in, JSON out.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const MANIFEST: &str = r#"{
    "originals": [
        { "copy": { "path": "fr/index.md" }, "original": { "path": "index.md" } }
    ],
    "edges": [
        { "from": { "path": "index.md" }, "to": { "path": "intro.md" }, "kind": "include", "transitive": true },
        { "from": { "path": "intro.md" }, "to": { "path": "index.md" }, "kind": "include", "transitive": true },
        { "from": { "path": "intro.md" }, "to": { "path": "logo.png" }, "kind": "resource" },
        { "from": { "path": "fr/index.md" }, "to": { "path": "guide.md" }, "kind": "link" },
        { "from": { "path": "fr/index.md" }, "to": { "path": "index.md" }, "kind": "link" },
        { "from": { "path": "guide.md" }, "to": null, "kind": "uid" }
    ]
}"#;

fn docdeps(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_docdeps"))
        .args(args)
        .output()
        .expect("Failed to execute docdeps")
}

fn write_manifest(dir: &Path) -> String {
    let path = dir.join("manifest.json");
    fs::write(&path, MANIFEST).unwrap();
    path.to_string_lossy().into_owned()
}

fn targets(entry: &serde_json::Value) -> Vec<String> {
    entry["dependencies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["to"]["path"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_cli_help() {
    let output = docdeps(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("Flatten build-time document dependency graphs"));
    assert!(stdout.contains("build"));
    assert!(stdout.contains("stats"));
}

#[test]
fn test_build_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = write_manifest(temp_dir.path());

    let output = docdeps(&["build", &manifest]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let map: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = map.as_array().unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0]["source"]["path"], "index.md");
    assert_eq!(
        targets(&rows[0]),
        vec!["guide.md", "index.md", "intro.md", "logo.png"]
    );
    assert_eq!(rows[1]["source"]["path"], "intro.md");
    // "intro.md" reaches everything "index.md" does, through the cycle.
    assert_eq!(targets(&rows[1]), targets(&rows[0]));
}

#[test]
fn test_build_orders_agree() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = write_manifest(temp_dir.path());
    let sorted_path = temp_dir.path().join("sorted.json");
    let reverse_path = temp_dir.path().join("reverse.json");

    let sorted = docdeps(&["build", &manifest, "-o", &sorted_path.to_string_lossy()]);
    let reverse = docdeps(&[
        "build",
        &manifest,
        "--order",
        "reverse",
        "--workers",
        "1",
        "--pretty",
        "-o",
        &reverse_path.to_string_lossy(),
    ]);
    assert!(sorted.status.success());
    assert!(reverse.status.success());

    let sorted: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&sorted_path).unwrap()).unwrap();
    let reverse: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&reverse_path).unwrap()).unwrap();
    assert_eq!(sorted, reverse);
}

#[test]
fn test_stats_report() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = write_manifest(temp_dir.path());

    let output = docdeps(&["stats", &manifest]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["recording"]["recorded"], 4);
    assert_eq!(report["recording"]["missing_target"], 1);
    assert_eq!(report["recording"]["same_original"], 1);
    assert_eq!(report["closure"]["sources"], 2);
    assert_eq!(report["transitive_cycles"][0][0]["path"], "index.md");
    assert_eq!(report["transitive_cycles"][0][1]["path"], "intro.md");
}

#[test]
fn test_config_file_beside_manifest() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = write_manifest(temp_dir.path());
    fs::write(temp_dir.path().join("docdeps.toml"), "workers = 2\npretty = true\n").unwrap();

    let output = docdeps(&["stats", &manifest]);
    assert!(output.status.success());
    // Pretty output spans several lines.
    assert!(String::from_utf8_lossy(&output.stdout).lines().count() > 1);
}

#[test]
fn test_invalid_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = write_manifest(temp_dir.path());
    fs::write(temp_dir.path().join("docdeps.toml"), "threads = 2\n").unwrap();

    let output = docdeps(&["build", &manifest]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("malformed configuration"));
}

#[test]
fn test_missing_manifest_fails() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.json");

    let output = docdeps(&["build", &missing.to_string_lossy()]);
    assert!(!output.status.success());
}
