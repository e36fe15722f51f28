/*!
 * End-to-end tests for the mpkg binary
 */

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const DEST: &str = r#"{
  "id": "dest",
  "title": "Lecture",
  "elements": [
    {"id": "e1", "type": "track", "has_video": true, "has_audio": true, "flavor": "video/mp4", "tags": ["engage"]}
  ]
}"#;

const SRC: &str = r#"{
  "id": "src",
  "elements": [
    {"id": "e1", "type": "track", "has_video": true, "has_audio": false, "flavor": "video/quicktime"},
    {"id": "e2", "type": "catalog", "flavor": "dublincore/episode", "checksum": {"type": "md5", "value": "abc"}}
  ]
}"#;

fn mpkg(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mpkg"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run mpkg")
}

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("dest.json"), DEST).unwrap();
    fs::write(dir.path().join("src.json"), SRC).unwrap();
    dir
}

fn path(dir: &TempDir, name: &str) -> String {
    dir.path().join(name).to_string_lossy().into_owned()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_merge_skip_to_output() {
    let dir = setup();
    let out = path(&dir, "out.json");
    let output = mpkg(&[
        "merge",
        &path(&dir, "dest.json"),
        &path(&dir, "src.json"),
        "--mode",
        "skip",
        "-o",
        &out,
    ]);
    assert_eq!(output.status.code(), Some(0));

    let merged = read_json(Path::new(&out));
    let elements = merged["elements"].as_array().unwrap();
    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0]["flavor"], "video/mp4");
    assert_eq!(elements[1]["id"], "e2");
}

#[test]
fn test_merge_fail_exits_with_conflict() {
    let dir = setup();
    let output = mpkg(&[
        "merge",
        &path(&dir, "dest.json"),
        &path(&dir, "src.json"),
        "--mode",
        "fail",
    ]);
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(fs::read_to_string(dir.path().join("dest.json")).unwrap(), DEST);
}

#[test]
fn test_merge_mode_from_config_file() {
    let dir = setup();
    let config = dir.path().join("mpkg.toml");
    fs::write(&config, "merge_mode = \"replace\"\npretty = false\n").unwrap();

    let output = mpkg(&[
        "--config",
        &config.to_string_lossy(),
        "merge",
        &path(&dir, "dest.json"),
        &path(&dir, "src.json"),
    ]);
    assert_eq!(output.status.code(), Some(0));

    let merged = read_json(&dir.path().join("dest.json"));
    assert_eq!(merged["elements"][0]["flavor"], "video/quicktime");
    assert_eq!(merged["elements"][0]["has_audio"], false);
}

#[test]
fn test_merge_json_report() {
    let dir = setup();
    let output = mpkg(&[
        "--json",
        "merge",
        &path(&dir, "dest.json"),
        &path(&dir, "src.json"),
    ]);
    assert_eq!(output.status.code(), Some(0));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["mode"], "merge");
    assert_eq!(report["outcomes"][0]["outcome"], "renamed");
    assert_eq!(report["outcomes"][0]["from"], "e1");
    assert_eq!(report["outcomes"][1]["outcome"], "added");
}

#[test]
fn test_check_passes_and_fails() {
    let dir = setup();
    let output = mpkg(&["check", &path(&dir, "dest.json")]);
    assert_eq!(output.status.code(), Some(0));

    fs::write(dir.path().join("blank.json"), r#"{"id": "  ", "elements": []}"#).unwrap();
    let output = mpkg(&["check", &path(&dir, "blank.json")]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("blank ID"));
}

#[test]
fn test_filter_lists_matching_elements() {
    let dir = setup();
    let output = mpkg(&[
        "--json",
        "filter",
        &path(&dir, "src.json"),
        "--where",
        "flavor:dublincore/*",
        "--where",
        "checksum",
    ]);
    assert_eq!(output.status.code(), Some(0));

    let selected: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let selected = selected.as_array().unwrap();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0]["id"], "e2");
}

#[test]
fn test_filter_rejects_unknown_expression() {
    let dir = setup();
    let output = mpkg(&["filter", &path(&dir, "src.json"), "--where", "colour:red"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_show_missing_file() {
    let dir = TempDir::new().unwrap();
    let output = mpkg(&["show", &path(&dir, "absent.json")]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_show_renders_package() {
    let dir = setup();
    let output = mpkg(&["show", &path(&dir, "dest.json")]);
    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("dest"));
    assert!(text.contains("video/mp4"));
}

#[test]
fn test_unknown_element_type_is_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("odd.json"),
        r#"{"id": "mp", "elements": [{"id": "x", "type": "hologram"}]}"#,
    )
    .unwrap();
    let output = mpkg(&["show", &path(&dir, "odd.json")]);
    assert_eq!(output.status.code(), Some(2));
}
