use std::path::Path;

use regex::Regex;

use crate::domain::bounds::{CountRange, Mostly};
use crate::domain::error::ExpectationError;
use crate::engine::file::text;

pub const DEFAULT_NULL_LINES_REGEX: &str = r"^\s*$";
const PARTIAL_UNEXPECTED_LIMIT: usize = 20;

/// Compiled parameters for the per-line regex match-count expectations.
#[derive(Debug, Clone)]
pub struct LineMatchCount {
    pub regex: Regex,
    pub range: CountRange,
    pub skip: usize,
    pub mostly: Mostly,
    pub null_lines: Regex,
}

impl LineMatchCount {
    pub fn new(regex: &str, range: CountRange) -> Result<Self, ExpectationError> {
        Ok(Self {
            regex: compile("regex", regex)?,
            range,
            skip: 0,
            mostly: Mostly::default(),
            null_lines: compile("null_lines_regex", DEFAULT_NULL_LINES_REGEX)?,
        })
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn mostly(mut self, mostly: Mostly) -> Self {
        self.mostly = mostly;
        self
    }

    pub fn null_lines_regex(mut self, pattern: &str) -> Result<Self, ExpectationError> {
        self.null_lines = compile("null_lines_regex", pattern)?;
        Ok(self)
    }
}

/// Aggregate line statistics for one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct LineMatchReport {
    pub element_count: usize,
    pub missing_count: usize,
    /// 0-based positions among the lines left after `skip`.
    pub unexpected_index_list: Vec<usize>,
    pub partial_unexpected_list: Vec<String>,
}

impl LineMatchReport {
    pub fn evaluated_count(&self) -> usize {
        self.element_count - self.missing_count
    }

    pub fn unexpected_count(&self) -> usize {
        self.unexpected_index_list.len()
    }

    /// Share of evaluated (non-null) lines outside the range, in percent.
    pub fn unexpected_percent(&self) -> f64 {
        let evaluated = self.evaluated_count();
        if evaluated == 0 {
            return 0.0;
        }
        self.unexpected_count() as f64 / evaluated as f64 * 100.0
    }

    pub fn meets(&self, mostly: Mostly) -> bool {
        let evaluated = self.evaluated_count();
        if evaluated == 0 {
            return true;
        }
        let expected = evaluated - self.unexpected_count();
        expected as f64 / evaluated as f64 >= mostly.get()
    }
}

pub fn count_line_matches(
    path: &Path,
    params: &LineMatchCount,
) -> Result<LineMatchReport, ExpectationError> {
    let lines = text::read_lines(path, params.skip, None)?;
    let mut report = LineMatchReport {
        element_count: lines.len(),
        missing_count: 0,
        unexpected_index_list: Vec::new(),
        partial_unexpected_list: Vec::new(),
    };

    for (index, line) in lines.into_iter().enumerate() {
        if params.null_lines.is_match(&line.text) {
            report.missing_count += 1;
            continue;
        }
        let matches = params.regex.find_iter(&line.text).count() as u64;
        if !params.range.contains(matches) {
            report.unexpected_index_list.push(index);
            if report.partial_unexpected_list.len() < PARTIAL_UNEXPECTED_LIMIT {
                report.partial_unexpected_list.push(line.text);
            }
        }
    }

    Ok(report)
}

fn compile(name: &'static str, pattern: &str) -> Result<Regex, ExpectationError> {
    Regex::new(pattern).map_err(|error| {
        ExpectationError::invalid_parameter(name, format!("invalid regex: {error}"))
    })
}
