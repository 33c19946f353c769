use std::path::Path;

use jsonschema::{Validator, validator_for};
use serde::Serialize;
use serde_json::Value;

use crate::domain::error::ExpectationError;

/// Location and message of a JSON syntax error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseFailure {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// One schema violation, addressed with a `$.field[0]` style path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: String,
    pub schema_path: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonOutcome {
    Valid,
    Malformed(ParseFailure),
    SchemaViolations(Vec<Violation>),
}

impl JsonOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Loads and compiles a JSON Schema document.
///
/// A missing schema file is an I/O fault; a schema that is not JSON, or not a
/// valid schema, is a parameter error.
pub fn load_schema(path: &Path) -> Result<Validator, ExpectationError> {
    let raw = std::fs::read(path)
        .map_err(|source| ExpectationError::io("read schema", path, source))?;
    let schema: Value = serde_json::from_slice(&raw).map_err(|error| {
        ExpectationError::invalid_parameter(
            "schema",
            format!("schema `{}` is not valid JSON: {error}", path.display()),
        )
    })?;
    validator_for(&schema).map_err(|error| {
        ExpectationError::invalid_parameter(
            "schema",
            format!("invalid schema `{}`: {error}", path.display()),
        )
    })
}

/// Parses `path` as JSON and, when a validator is given, checks conformance.
pub fn check_json(
    path: &Path,
    validator: Option<&Validator>,
) -> Result<JsonOutcome, ExpectationError> {
    let raw = std::fs::read(path).map_err(|source| ExpectationError::io("read", path, source))?;
    let document: Value = match serde_json::from_slice(&raw) {
        Ok(document) => document,
        Err(error) => {
            return Ok(JsonOutcome::Malformed(ParseFailure {
                line: error.line(),
                column: error.column(),
                message: error.to_string(),
            }));
        }
    };

    let Some(validator) = validator else {
        return Ok(JsonOutcome::Valid);
    };

    let mut violations: Vec<Violation> = validator
        .iter_errors(&document)
        .map(|error| Violation {
            path: path_from_json_pointer(error.instance_path().as_str()),
            schema_path: error.schema_path().as_str().to_string(),
            message: error.to_string(),
        })
        .collect();

    if violations.is_empty() {
        return Ok(JsonOutcome::Valid);
    }
    violations.sort_by(|left, right| {
        (&left.path, &left.schema_path, &left.message).cmp(&(
            &right.path,
            &right.schema_path,
            &right.message,
        ))
    });
    Ok(JsonOutcome::SchemaViolations(violations))
}

fn path_from_json_pointer(pointer: &str) -> String {
    let mut path = "$".to_string();
    if pointer.is_empty() {
        return path;
    }

    for token in pointer.trim_start_matches('/').split('/') {
        let segment = decode_pointer_token(token);
        if is_simple_identifier(&segment) {
            path.push('.');
            path.push_str(&segment);
        } else if is_array_index(&segment) {
            path.push('[');
            path.push_str(&segment);
            path.push(']');
        } else {
            path.push('[');
            path.push_str(
                &serde_json::to_string(&segment)
                    .unwrap_or_else(|_| "\"<invalid-segment>\"".to_string()),
            );
            path.push(']');
        }
    }

    path
}

fn decode_pointer_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

fn is_simple_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

fn is_array_index(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|ch| ch.is_ascii_digit())
}
