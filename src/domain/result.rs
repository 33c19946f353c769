use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Named expectation evaluated against a file asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectationKind {
    ExpectFileToExist,
    ExpectFileHashToEqual,
    ExpectFileSizeToBeBetween,
    ExpectFileToHaveValidTableHeader,
    ExpectFileToBeValidJson,
    ExpectFileLineRegexMatchCountToBeBetween,
    ExpectFileLineRegexMatchCountToEqual,
}

impl ExpectationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExpectFileToExist => "expect_file_to_exist",
            Self::ExpectFileHashToEqual => "expect_file_hash_to_equal",
            Self::ExpectFileSizeToBeBetween => "expect_file_size_to_be_between",
            Self::ExpectFileToHaveValidTableHeader => "expect_file_to_have_valid_table_header",
            Self::ExpectFileToBeValidJson => "expect_file_to_be_valid_json",
            Self::ExpectFileLineRegexMatchCountToBeBetween => {
                "expect_file_line_regex_match_count_to_be_between"
            }
            Self::ExpectFileLineRegexMatchCountToEqual => {
                "expect_file_line_regex_match_count_to_equal"
            }
        }
    }
}

impl fmt::Display for ExpectationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one expectation call.
///
/// `result` holds observed values (`observed_value`, `element_count`, ...)
/// and, on failure, the diagnostics needed to understand it without
/// re-running the check. `kwargs` echoes the effective parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpectationResult {
    pub expectation_type: ExpectationKind,
    pub success: bool,
    pub kwargs: Map<String, Value>,
    pub result: Map<String, Value>,
}

impl ExpectationResult {
    pub fn builder(kind: ExpectationKind) -> ResultBuilder {
        ResultBuilder::new(kind)
    }

    pub fn observed_value(&self) -> Option<&Value> {
        self.result.get("observed_value")
    }
}

/// Accumulates parameters and observations; `build` is the only way to
/// obtain an `ExpectationResult`.
#[derive(Debug, Clone)]
pub struct ResultBuilder {
    kind: ExpectationKind,
    kwargs: Map<String, Value>,
    result: Map<String, Value>,
}

impl ResultBuilder {
    pub fn new(kind: ExpectationKind) -> Self {
        Self {
            kind,
            kwargs: Map::new(),
            result: Map::new(),
        }
    }

    pub fn kwarg(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.kwargs.insert(name.to_string(), value.into());
        self
    }

    pub fn observed_value(self, value: impl Into<Value>) -> Self {
        self.entry("observed_value", value)
    }

    pub fn entry(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.result.insert(key.to_string(), value.into());
        self
    }

    /// Adds a diagnostic under `result.details`.
    pub fn detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        let details = self
            .result
            .entry("details")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(map) = details {
            map.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn build(self, success: bool) -> ExpectationResult {
        ExpectationResult {
            expectation_type: self.kind,
            success,
            kwargs: self.kwargs,
            result: self.result,
        }
    }
}
