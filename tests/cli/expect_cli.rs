use std::path::{Path, PathBuf};

use predicates::prelude::predicate;
use serde_json::{Value, json};
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn fixture_arg(name: &str) -> String {
    fixture(name).to_str().expect("utf8 fixture path").to_string()
}

fn filexpect_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("filexpect");
    cmd.env_remove("RUST_LOG").env_remove("FILEXPECT_LOG");
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout json")
}

fn stderr_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stderr).expect("stderr json")
}

#[test]
fn exists_reports_failure_as_data() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("abc");
    let output = filexpect_cmd()
        .args(["--path", missing.to_str().expect("utf8 path"), "exists"])
        .output()
        .expect("run exists");

    assert_eq!(output.status.code(), Some(2));
    let payload = stdout_json(&output);
    assert_eq!(payload["expectation_type"], json!("expect_file_to_exist"));
    assert_eq!(payload["success"], json!(false));
}

#[test]
fn hash_match_exits_zero() {
    filexpect_cmd()
        .args([
            "--path",
            &fixture_arg("passengers.csv"),
            "hash",
            "--value",
            "7a1c30f13100efacc659632edefce210a2648d5d4403cd61359cd9f452d5275f",
            "--alg",
            "sha256",
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::contains(r#""success":true"#))
        .stderr(predicate::str::is_empty());
}

#[test]
fn unknown_hash_alg_is_invalid_parameter() {
    let output = filexpect_cmd()
        .args([
            "--path",
            &fixture_arg("passengers.csv"),
            "hash",
            "--value",
            "abc",
            "--alg",
            "md51",
        ])
        .output()
        .expect("run hash");

    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
    assert_eq!(stderr_json(&output)["error"], json!("invalid_parameter"));
}

#[test]
fn size_accepts_raw_bounds_and_rejects_bad_ones() {
    let ok = filexpect_cmd()
        .args([
            "--path",
            &fixture_arg("passengers.csv"),
            "size",
            "--min",
            "358",
            "--max",
            "358",
        ])
        .output()
        .expect("run size");
    assert_eq!(ok.status.code(), Some(0));
    assert_eq!(stdout_json(&ok)["result"]["observed_value"], json!(358));

    for (min, max) in [("a", "10000"), ("-1", "10"), ("10", "1")] {
        let output = filexpect_cmd()
            .args([
                "--path",
                &fixture_arg("passengers.csv"),
                "size",
                "--min",
                min,
                "--max",
                max,
            ])
            .output()
            .expect("run size");
        assert_eq!(output.status.code(), Some(3), "({min}, {max})");
        assert_eq!(stderr_json(&output)["error"], json!("invalid_parameter"));
    }
}

#[test]
fn missing_file_is_io_fault() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("abc");
    let output = filexpect_cmd()
        .args([
            "--path",
            missing.to_str().expect("utf8 path"),
            "size",
            "--min",
            "0",
            "--max",
            "10000",
        ])
        .output()
        .expect("run size");

    assert_eq!(output.status.code(), Some(3));
    let payload = stderr_json(&output);
    assert_eq!(payload["error"], json!("io_fault"));
    assert!(payload["message"].as_str().expect("message").contains("abc"));
}

#[test]
fn header_with_duplicates_exits_two() {
    let output = filexpect_cmd()
        .args([
            "--path",
            &fixture_arg("same_column_names.csv"),
            "header",
            "--regex",
            r"\|",
            "--skip",
            "2",
        ])
        .output()
        .expect("run header");

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout_json(&output)["result"]["duplicates"], json!(["reading"]));
}

#[test]
fn header_skip_past_end_of_file_exits_three() {
    let output = filexpect_cmd()
        .args([
            "--path",
            &fixture_arg("same_column_names.csv"),
            "header",
            "--regex",
            r"\|",
            "--skip",
            "99",
        ])
        .output()
        .expect("run header");

    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
    let payload = stderr_json(&output);
    assert_eq!(payload["error"], json!("invalid_parameter"));
    assert!(payload["message"].as_str().expect("message").contains("skip"));
}

#[test]
fn header_literal_flag_uses_csv_quoting() {
    filexpect_cmd()
        .args([
            "--path",
            &fixture_arg("passengers.csv"),
            "header",
            "--regex",
            ",",
            "--literal",
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::contains(r#""SexCode""#));
}

#[test]
fn json_against_schema() {
    let schema = fixture_arg("sample_schema.json");
    let failing = filexpect_cmd()
        .args([
            "--path",
            &fixture_arg("json_test1_against_schema.json"),
            "json",
            "--schema",
            &schema,
        ])
        .output()
        .expect("run json");
    assert_eq!(failing.status.code(), Some(2));
    assert_eq!(stdout_json(&failing)["result"]["violation_count"], json!(3));

    filexpect_cmd()
        .args([
            "--path",
            &fixture_arg("json_test2_against_schema.json"),
            "json",
            "--schema",
            &schema,
        ])
        .assert()
        .code(0);
}

#[test]
fn line_count_equal_with_skip() {
    let output = filexpect_cmd()
        .args([
            "--path",
            &fixture_arg("passengers.csv"),
            "line-count-equal",
            "--regex",
            ",",
            "--count",
            "7",
            "--skip",
            "1",
        ])
        .output()
        .expect("run line-count-equal");

    assert_eq!(output.status.code(), Some(0));
    let payload = stdout_json(&output);
    assert_eq!(
        payload["expectation_type"],
        json!("expect_file_line_regex_match_count_to_equal")
    );
    assert_eq!(payload["kwargs"]["skip"], json!(1));
}

#[test]
fn line_count_between_with_mostly() {
    filexpect_cmd()
        .args([
            "--path",
            &fixture_arg("passengers.csv"),
            "line-count",
            "--regex",
            ",",
            "--min",
            "7",
            "--mostly",
            "0.8",
        ])
        .assert()
        .code(0);
}

#[test]
fn debug_logging_goes_to_stderr_only() {
    let output = filexpect_cmd()
        .env("FILEXPECT_LOG", "debug")
        .args([
            "--path",
            &fixture_arg("passengers.csv"),
            "exists",
            "--log-format",
            "json",
        ])
        .output()
        .expect("run exists");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output)["success"], json!(true));
    let stderr = String::from_utf8(output.stderr).expect("stderr utf8");
    assert!(stderr.contains("checked file existence"));
}
