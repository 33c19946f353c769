use std::path::PathBuf;

use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::bounds::{CountRange, Mostly, SizeBounds};
use crate::domain::error::ExpectationError;
use crate::domain::result::ExpectationResult;
use crate::engine::file::{FileExpectations, HeaderDelimiter, LineMatchCount};

/// Input arguments for one expectation run against `path`.
#[derive(Debug, Clone)]
pub struct ExpectCommandArgs {
    pub path: PathBuf,
    pub expectation: ExpectationArgs,
}

/// Raw, unvalidated parameters per expectation.
#[derive(Debug, Clone)]
pub enum ExpectationArgs {
    Exists,
    Hash {
        value: String,
        alg: String,
    },
    Size {
        min: String,
        max: String,
    },
    Header {
        regex: String,
        skip: usize,
        literal: bool,
    },
    Json {
        schema: Option<PathBuf>,
    },
    LineCount {
        regex: String,
        min: i64,
        max: Option<i64>,
        lines: LineOptions,
    },
    LineCountEqual {
        regex: String,
        count: i64,
        lines: LineOptions,
    },
}

#[derive(Debug, Clone, Default)]
pub struct LineOptions {
    pub skip: usize,
    pub mostly: Option<f64>,
    pub null_lines_regex: Option<String>,
}

/// Structured command response that carries exit-code mapping and JSON payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExpectCommandResponse {
    pub exit_code: i32,
    pub payload: Value,
}

pub fn run(args: &ExpectCommandArgs) -> ExpectCommandResponse {
    match execute(args) {
        Ok(result) => result_response(result),
        Err(error) => ExpectCommandResponse {
            exit_code: 3,
            payload: json!({
                "error": error.kind(),
                "message": error.to_string(),
                "path": args.path.display().to_string(),
            }),
        },
    }
}

fn result_response(result: ExpectationResult) -> ExpectCommandResponse {
    let exit_code = if result.success { 0 } else { 2 };
    match serde_json::to_value(&result) {
        Ok(payload) => ExpectCommandResponse { exit_code, payload },
        Err(_) => ExpectCommandResponse {
            exit_code: 1,
            payload: json!({
                "error": "internal_error",
                "message": "failed to serialize expectation result"
            }),
        },
    }
}

fn execute(args: &ExpectCommandArgs) -> Result<ExpectationResult, ExpectationError> {
    let file = FileExpectations::new(&args.path);
    match &args.expectation {
        ExpectationArgs::Exists => Ok(file.expect_file_to_exist()),
        ExpectationArgs::Hash { value, alg } => file.expect_file_hash_to_equal(value, alg),
        ExpectationArgs::Size { min, max } => {
            file.expect_file_size_to_be_between(SizeBounds::parse(min, max)?)
        }
        ExpectationArgs::Header {
            regex,
            skip,
            literal,
        } => {
            let delimiter = if *literal {
                HeaderDelimiter::literal(regex)?
            } else {
                HeaderDelimiter::pattern(regex)?
            };
            file.expect_file_to_have_valid_table_header_with(&delimiter, *skip)
        }
        ExpectationArgs::Json { schema } => file.expect_file_to_be_valid_json(schema.as_deref()),
        ExpectationArgs::LineCount {
            regex,
            min,
            max,
            lines,
        } => {
            let params = line_params(regex, CountRange::new(*min, *max)?, lines)?;
            file.expect_file_line_regex_match_count_to_be_between(&params)
        }
        ExpectationArgs::LineCountEqual {
            regex,
            count,
            lines,
        } => {
            let params = line_params(regex, CountRange::exactly(*count)?, lines)?;
            file.expect_file_line_regex_match_count_to_equal(&params)
        }
    }
}

fn line_params(
    regex: &str,
    range: CountRange,
    options: &LineOptions,
) -> Result<LineMatchCount, ExpectationError> {
    let mut params = LineMatchCount::new(regex, range)?.skip(options.skip);
    if let Some(mostly) = options.mostly {
        params = params.mostly(Mostly::new(mostly)?);
    }
    if let Some(pattern) = &options.null_lines_regex {
        params = params.null_lines_regex(pattern)?;
    }
    Ok(params)
}
