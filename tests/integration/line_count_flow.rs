use std::path::{Path, PathBuf};

use filexpect::engine::file::LineMatchCount;
use filexpect::{CountRange, FileExpectations, Mostly};
use serde_json::json;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn missing_file_is_an_io_fault() {
    let dir = tempdir().expect("tempdir");
    let params = LineMatchCount::new(",", CountRange::default()).expect("params");
    let error = FileExpectations::new(dir.path().join("abc"))
        .expect_file_line_regex_match_count_to_be_between(&params)
        .expect_err("must fail");
    assert!(error.is_io());
}

#[test]
fn data_rows_share_a_comma_count() {
    let file = FileExpectations::new(fixture("passengers.csv"));
    let params = LineMatchCount::new(",", CountRange::exactly(7).expect("range"))
        .expect("params")
        .skip(1);

    let result = file
        .expect_file_line_regex_match_count_to_equal(&params)
        .expect("line result");
    assert!(result.success);
    assert_eq!(result.result["element_count"], json!(5));
    assert_eq!(result.result["unexpected_count"], json!(0));
}

#[test]
fn unskipped_header_is_the_only_unexpected_line() {
    let file = FileExpectations::new(fixture("passengers.csv"));
    let params =
        LineMatchCount::new(",", CountRange::new(7, Some(8)).expect("range")).expect("params");

    let strict = file
        .expect_file_line_regex_match_count_to_be_between(&params)
        .expect("line result");
    assert!(!strict.success);
    assert_eq!(strict.result["unexpected_index_list"], json!([0]));

    let lenient = file
        .expect_file_line_regex_match_count_to_be_between(
            &params.clone().mostly(Mostly::new(0.8).expect("mostly")),
        )
        .expect("line result");
    assert!(lenient.success);
    assert_eq!(lenient.kwargs["mostly"], json!(0.8));
}

#[test]
fn blank_lines_are_missing_not_unexpected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("sparse.txt");
    std::fs::write(&path, "k=v\n\n\t\nk=v\n").expect("write file");

    let params = LineMatchCount::new("=", CountRange::exactly(1).expect("range")).expect("params");
    let result = FileExpectations::new(&path)
        .expect_file_line_regex_match_count_to_equal(&params)
        .expect("line result");
    assert!(result.success);
    assert_eq!(result.result["missing_count"], json!(2));
    assert_eq!(result.result["unexpected_percent"], json!(0.0));
}
