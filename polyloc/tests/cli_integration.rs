//! Integration tests for polyloc CLI

use std::fs;
use std::path::Path;
use std::process::Command;

fn run_polyloc(args: &[&str]) -> (String, String, bool) {
    let mut cmd_args = vec!["run", "-p", "polyloc", "--"];
    cmd_args.extend(args);

    let output = Command::new("cargo")
        .args(&cmd_args)
        .current_dir(env!("CARGO_MANIFEST_DIR").to_string() + "/..")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

fn create_sample_tree(root: &Path) {
    fs::write(root.join(".gitignore"), "*.pyc\n").unwrap();
    fs::write(root.join("app.py"), "import os\n\nprint(os.name)\n").unwrap();
    fs::write(root.join("app.pyc"), [0u8, 1, 2, 3]).unwrap();
    fs::write(root.join("main.go"), "package main\n\nfunc main() {}\n").unwrap();
}

#[test]
fn test_cli_help() {
    let (stdout, _, success) = run_polyloc(&["--help"]);

    assert!(success);
    assert!(stdout.contains("polyloc"));
    assert!(stdout.contains("--output"));
    assert!(stdout.contains("--exclude"));
    assert!(stdout.contains("--verbose"));
}

#[test]
fn test_cli_version() {
    let (stdout, _, success) = run_polyloc(&["--version"]);

    assert!(success);
    assert!(stdout.contains("polyloc"));
}

#[test]
fn test_table_output() {
    let temp = tempfile::tempdir().unwrap();
    create_sample_tree(temp.path());

    let (stdout, _, success) = run_polyloc(&[temp.path().to_str().unwrap()]);

    assert!(success);
    assert!(stdout.contains("Language"));
    assert!(stdout.contains("Python"));
    assert!(stdout.contains("Go"));
    assert!(stdout.contains("Total"));
    // The ignored .pyc never shows up anywhere
    assert!(!stdout.contains("pyc"));
}

#[test]
fn test_json_output() {
    let temp = tempfile::tempdir().unwrap();
    create_sample_tree(temp.path());

    let (stdout, _, success) =
        run_polyloc(&[temp.path().to_str().unwrap(), "--output", "json"]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    let languages = parsed["languages"].as_array().unwrap();
    assert_eq!(languages.len(), 2);
    assert_eq!(parsed["total"]["files"], 2);
}

#[test]
fn test_single_file_argument() {
    let temp = tempfile::tempdir().unwrap();
    create_sample_tree(temp.path());

    let file = temp.path().join("app.py");
    let (stdout, _, success) =
        run_polyloc(&[file.to_str().unwrap(), "--output", "json"]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["total"]["files"], 1);
    assert_eq!(parsed["languages"][0]["name"], "Python");
}

#[test]
fn test_missing_path_fails() {
    let (_, stderr, success) = run_polyloc(&["/definitely/not/a/real/path"]);

    assert!(!success);
    assert!(stderr.contains("error"));
}

#[test]
fn test_extra_exclude_pattern() {
    let temp = tempfile::tempdir().unwrap();
    create_sample_tree(temp.path());

    let (stdout, _, success) = run_polyloc(&[
        temp.path().to_str().unwrap(),
        "--exclude",
        "*.go",
        "--output",
        "json",
    ]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["total"]["files"], 1);
    assert_eq!(parsed["languages"][0]["name"], "Python");
}
