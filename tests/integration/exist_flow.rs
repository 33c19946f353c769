use std::path::{Path, PathBuf};

use filexpect::{ExpectationKind, FileExpectations};
use serde_json::json;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn missing_paths_fail_without_error() {
    let dir = tempdir().expect("tempdir");
    for name in ["abc", "nested/abc.csv", ""] {
        let result = FileExpectations::new(dir.path().join(name)).expect_file_to_exist();
        assert!(!result.success, "{name}");
    }
}

#[test]
fn existing_file_succeeds() {
    let result = FileExpectations::new(fixture("passengers.csv")).expect_file_to_exist();
    assert!(result.success);
    assert_eq!(result.expectation_type, ExpectationKind::ExpectFileToExist);
    assert_eq!(result.observed_value(), Some(&json!(true)));
}

#[test]
fn result_reflects_state_at_call_time() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("late.txt");
    let file = FileExpectations::new(&path);

    assert!(!file.expect_file_to_exist().success);
    std::fs::write(&path, "now here").expect("write file");
    assert!(file.expect_file_to_exist().success);
    std::fs::remove_file(&path).expect("remove file");
    assert!(!file.expect_file_to_exist().success);
}
