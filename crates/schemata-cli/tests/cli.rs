use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures")
        .join(name)
}

/// Run the binary inside `dir` so no stray schemata.toml is picked up.
fn schemata(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_schemata"))
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("run schemata")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

#[test]
fn check_lists_record_types() {
    let dir = TempDir::new().expect("tempdir");
    let schema = fixture("people.schema.json");
    let output = schemata(&dir, &["check", path_arg(&schema)]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Address: 3 properties (city, postcode, country)"));
    assert!(text.contains("Person: 5 properties (name, age, born, tags, home)"));
    assert!(text.contains("2 record types ok"));
}

#[test]
fn validate_reports_failures_and_exits_non_zero() {
    let dir = TempDir::new().expect("tempdir");
    let schema = fixture("people.schema.json");
    let records = fixture("people.records.json");
    let output = schemata(
        &dir,
        &[
            "validate",
            "--schema",
            path_arg(&schema),
            "--record-type",
            "Person",
            path_arg(&records),
        ],
    );

    assert!(!output.status.success());
    let text = stdout(&output);
    assert!(text.contains("record 0: ok"));
    assert!(text.contains(r#"  - The value of "200" for "age" fails max of 150."#));
    assert!(text.contains("2 of 3 records invalid"));
}

#[test]
fn settings_can_disable_failing_exit() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("schemata.toml"),
        "[validate]\nfail_on_error = false\n",
    )
    .expect("write settings");
    let schema = fixture("people.schema.json");
    let records = fixture("people.records.json");
    let output = schemata(
        &dir,
        &[
            "validate",
            "--schema",
            path_arg(&schema),
            "--record-type",
            "Person",
            path_arg(&records),
        ],
    );

    assert!(output.status.success());
}

#[test]
fn perfect_writes_output_file() {
    let dir = TempDir::new().expect("tempdir");
    let records = dir.path().join("one.json");
    fs::write(&records, r#"{"name": "Ada", "extra": true}"#).expect("write records");
    let out = dir.path().join("out/perfected.json");
    let schema = fixture("people.schema.json");

    let output = schemata(
        &dir,
        &[
            "perfect",
            "--schema",
            path_arg(&schema),
            "--record-type",
            "Person",
            "--out",
            path_arg(&out),
            path_arg(&records),
        ],
    );
    assert!(output.status.success());

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).expect("read output")).expect("json");
    assert_eq!(
        written,
        serde_json::json!({
            "name": "Ada",
            "age": null,
            "born": null,
            "tags": [],
            "home": null
        })
    );
}

#[test]
fn unknown_record_type_fails() {
    let dir = TempDir::new().expect("tempdir");
    let schema = fixture("people.schema.json");
    let records = fixture("people.records.json");
    let output = schemata(
        &dir,
        &[
            "validate",
            "--schema",
            path_arg(&schema),
            "--record-type",
            "Robot",
            path_arg(&records),
        ],
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Robot"));
}
