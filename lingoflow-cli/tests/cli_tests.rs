use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn lingoflow_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("lingoflow"))
}

const ANDROID: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <string name="hello">Hello</string>
    <string name="app_id" translatable="false">com.example</string>
    <string-array name="planets">
        <item>Mercury</item>
        <item>Venus</item>
    </string-array>
</resources>
"#;

fn write_android(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("strings.xml");
    fs::write(&path, ANDROID).unwrap();
    path
}

#[test]
fn test_convert_android_to_resx() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_android(&temp_dir);
    let output = temp_dir.path().join("Strings.resx");

    let out = lingoflow_cmd()
        .args([
            "convert",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert!(
        out.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    assert!(String::from_utf8_lossy(&out.stdout).contains("Converted 3 entries"));

    let resx = fs::read_to_string(&output).unwrap();
    assert!(resx.contains(r#"<data name="hello" xml:space="preserve">"#));
    assert!(resx.contains(r#"<data name="planets[1]" xml:space="preserve">"#));
    assert!(!resx.contains("app_id"));
}

#[test]
fn test_convert_with_explicit_formats() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_android(&temp_dir);
    let output = temp_dir.path().join("out.txt");

    let out = lingoflow_cmd()
        .args([
            "convert",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--from",
            "android",
            "--to",
            "csv",
        ])
        .output()
        .unwrap();

    assert!(out.status.success());
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "hello,Hello,\nplanets[0],Mercury,\nplanets[1],Venus,\n"
    );
}

#[test]
fn test_convert_unknown_output_extension_fails() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_android(&temp_dir);
    let output = temp_dir.path().join("out.po");

    let out = lingoflow_cmd()
        .current_dir(temp_dir.path())
        .args([
            "convert",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).starts_with("Error: "));
    assert!(!output.exists());
}

#[test]
fn test_config_supplies_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_android(&temp_dir);
    fs::write(
        temp_dir.path().join("lingoflow.toml"),
        "[parse]\ninclude_non_translatable = true\n\n[export]\nformat = \"csv\"\n",
    )
    .unwrap();

    let out = lingoflow_cmd()
        .current_dir(temp_dir.path())
        .args(["convert", "-i", input.to_str().unwrap(), "-o", "out.txt"])
        .output()
        .unwrap();

    assert!(
        out.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let csv = fs::read_to_string(temp_dir.path().join("out.txt")).unwrap();
    assert!(csv.contains("app_id,com.example,\n"));
}

#[test]
fn test_android_to_android_keeps_non_translatable_marker() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_android(&temp_dir);
    fs::write(
        temp_dir.path().join("lingoflow.toml"),
        "[parse]\ninclude_non_translatable = true\n",
    )
    .unwrap();

    let out = lingoflow_cmd()
        .current_dir(temp_dir.path())
        .args(["convert", "-i", input.to_str().unwrap(), "-o", "copy.xml"])
        .output()
        .unwrap();

    assert!(
        out.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let xml = fs::read_to_string(temp_dir.path().join("copy.xml")).unwrap();
    assert!(xml.contains(r#"<string name="app_id" translatable="false">com.example</string>"#));
    assert!(xml.contains(r#"<string name="hello">Hello</string>"#));
}

#[test]
fn test_view_json_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_android(&temp_dir);

    let out = lingoflow_cmd()
        .current_dir(temp_dir.path())
        .args(["view", "-i", input.to_str().unwrap(), "--json"])
        .output()
        .unwrap();

    assert!(out.status.success());
    let entries: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["key"], "hello");
    assert_eq!(entries[2]["key"], "planets[1]");
    assert_eq!(entries[2]["value"], "Venus");
}

#[test]
fn test_view_malformed_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("strings.xml");
    fs::write(&input, "<resources><string name=\"a\">A</resources>").unwrap();

    let out = lingoflow_cmd()
        .current_dir(temp_dir.path())
        .args(["view", "-i", input.to_str().unwrap()])
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Error: Failed to read"));
}

#[test]
fn test_check_allowed_and_denied() {
    let allowed = lingoflow_cmd()
        .args([
            "check", "--state", "review", "--action", "approve", "--role", "reviewer",
            "--author", "alice", "--actor", "bob",
        ])
        .output()
        .unwrap();
    assert!(allowed.status.success());
    assert_eq!(
        String::from_utf8_lossy(&allowed.stdout).trim(),
        "allowed: review -> approved"
    );

    let denied = lingoflow_cmd()
        .args([
            "check", "--state", "draft", "--action", "submit", "--role", "translator",
            "--author", "alice", "--actor", "bob",
        ])
        .output()
        .unwrap();
    assert_eq!(denied.status.code(), Some(1));
    assert_eq!(
        String::from_utf8_lossy(&denied.stdout).trim(),
        "denied: not permitted"
    );
}

#[test]
fn test_check_json_output() {
    let out = lingoflow_cmd()
        .args([
            "check", "--state", "approved", "--action", "reject", "--role", "admin",
            "--author", "alice", "--actor", "root", "--json",
        ])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    let decision: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(decision["outcome"], "denied");
    assert_eq!(decision["reason"], "illegal_transition");
}

#[test]
fn test_formats_lists_identifiers() {
    let out = lingoflow_cmd().arg("formats").output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("android .xml"));
    assert!(stdout.contains("resx"));
    assert!(stdout.contains("csv"));
}
