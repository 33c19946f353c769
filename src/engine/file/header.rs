use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use regex::Regex;

use crate::domain::error::ExpectationError;
use crate::engine::file::text::{self, Line};

/// How a header line is split into column names.
#[derive(Debug, Clone)]
pub enum HeaderDelimiter {
    /// Split on every match of a regular expression.
    Pattern(Regex),
    /// Single-byte field delimiter with CSV quoting rules.
    Literal(u8),
}

impl HeaderDelimiter {
    pub fn pattern(regex: &str) -> Result<Self, ExpectationError> {
        Regex::new(regex).map(Self::Pattern).map_err(|error| {
            ExpectationError::invalid_parameter(
                "regex",
                format!("invalid delimiter pattern: {error}"),
            )
        })
    }

    /// Literal delimiter. Multi-byte delimiters fall back to an escaped
    /// pattern and therefore do not honour quoting.
    pub fn literal(delimiter: &str) -> Result<Self, ExpectationError> {
        match delimiter.as_bytes() {
            [] => Err(ExpectationError::invalid_parameter(
                "regex",
                "literal delimiter must not be empty",
            )),
            [byte] => Ok(Self::Literal(*byte)),
            _ => Self::pattern(&regex::escape(delimiter)),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Pattern(regex) => regex.as_str().to_string(),
            Self::Literal(byte) => char::from(*byte).to_string(),
        }
    }

    fn split(&self, line: &str) -> Result<Vec<String>, csv::Error> {
        match self {
            Self::Pattern(regex) => Ok(regex.split(line).map(ToOwned::to_owned).collect()),
            Self::Literal(byte) => {
                let mut reader = csv::ReaderBuilder::new()
                    .has_headers(false)
                    .flexible(true)
                    .delimiter(*byte)
                    .from_reader(line.as_bytes());
                match reader.records().next() {
                    Some(record) => Ok(record?.iter().map(ToOwned::to_owned).collect()),
                    None => Ok(vec![String::new()]),
                }
            }
        }
    }
}

/// Ordered column names parsed from one header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderDescriptor {
    pub line_number: usize,
    pub columns: Vec<String>,
}

impl HeaderDescriptor {
    pub fn is_unique(&self) -> bool {
        self.duplicate_count() == 0
    }

    /// Number of columns beyond the first occurrence of each name.
    pub fn duplicate_count(&self) -> usize {
        self.occurrences().values().map(|count| count - 1).sum()
    }

    /// Names that occur more than once, sorted.
    pub fn duplicates(&self) -> Vec<String> {
        self.occurrences()
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    fn occurrences(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for column in &self.columns {
            *counts.entry(column.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

/// Reads the header line that follows `skip` discarded lines. Returns `None`
/// when the file has no such line.
pub fn read_header(
    path: &Path,
    delimiter: &HeaderDelimiter,
    skip: usize,
) -> Result<Option<HeaderDescriptor>, ExpectationError> {
    let Some(Line { number, text: raw }) =
        text::read_lines(path, skip, Some(1))?.into_iter().next()
    else {
        return Ok(None);
    };

    let columns = delimiter.split(raw.trim()).map_err(|error| {
        ExpectationError::io(
            "parse header of",
            path,
            io::Error::new(io::ErrorKind::InvalidData, error),
        )
    })?;

    Ok(Some(HeaderDescriptor {
        line_number: number,
        columns,
    }))
}
