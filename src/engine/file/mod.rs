pub mod hash;
pub mod header;
pub mod json;
pub mod lines;
pub mod text;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::domain::bounds::SizeBounds;
use crate::domain::error::ExpectationError;
use crate::domain::result::{ExpectationKind, ExpectationResult};

pub use hash::HashAlgorithm;
pub use header::{HeaderDelimiter, HeaderDescriptor};
pub use json::{JsonOutcome, Violation};
pub use lines::{DEFAULT_NULL_LINES_REGEX, LineMatchCount, LineMatchReport};

/// Name of the digest used when the caller does not pick one.
pub const DEFAULT_HASH_ALG: &str = "md5";

/// Expectations about a single file on disk.
///
/// The path is not checked at construction. Every expectation opens and
/// closes the file within the call and keeps no state between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileExpectations {
    path: PathBuf,
}

impl FileExpectations {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Succeeds iff the path currently resolves to a regular file. A missing
    /// file is a failed expectation, never an error.
    #[instrument(level = "debug", skip_all, fields(path = %self.path.display()))]
    pub fn expect_file_to_exist(&self) -> ExpectationResult {
        let exists = self.path.is_file();
        debug!(exists, "checked file existence");
        ExpectationResult::builder(ExpectationKind::ExpectFileToExist)
            .observed_value(exists)
            .build(exists)
    }

    /// Compares the file digest under `hash_alg` (see [`HashAlgorithm`]) with
    /// `value`, ignoring ASCII case.
    #[instrument(
        level = "debug",
        skip_all,
        fields(path = %self.path.display(), hash_alg = %hash_alg)
    )]
    pub fn expect_file_hash_to_equal(
        &self,
        value: &str,
        hash_alg: &str,
    ) -> Result<ExpectationResult, ExpectationError> {
        let algorithm: HashAlgorithm = hash_alg.parse()?;
        let digest = hash::hash_file(&self.path, algorithm)?;
        let success = digest.eq_ignore_ascii_case(value);
        debug!(%digest, success, "computed file digest");

        Ok(
            ExpectationResult::builder(ExpectationKind::ExpectFileHashToEqual)
                .kwarg("value", value)
                .kwarg("hash_alg", algorithm.as_str())
                .observed_value(digest)
                .entry("hash_alg", algorithm.as_str())
                .build(success),
        )
    }

    /// Checks that the byte length lies within `bounds`, inclusive both ends.
    #[instrument(level = "debug", skip_all, fields(path = %self.path.display()))]
    pub fn expect_file_size_to_be_between(
        &self,
        bounds: SizeBounds,
    ) -> Result<ExpectationResult, ExpectationError> {
        let metadata = fs::metadata(&self.path)
            .map_err(|source| ExpectationError::io("stat", &self.path, source))?;
        if !metadata.is_file() {
            return Err(ExpectationError::io(
                "stat",
                &self.path,
                io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }

        let size = metadata.len();
        let success = bounds.contains(size);
        debug!(size, success, "measured file size");

        Ok(
            ExpectationResult::builder(ExpectationKind::ExpectFileSizeToBeBetween)
                .kwarg("minsize", bounds.minsize())
                .kwarg("maxsize", bounds.maxsize())
                .observed_value(size)
                .entry("min_value", bounds.minsize())
                .entry("max_value", bounds.maxsize())
                .build(success),
        )
    }

    /// Splits the header line (after `skip` lines) on the `regex` pattern and
    /// succeeds iff all column names are distinct.
    pub fn expect_file_to_have_valid_table_header(
        &self,
        regex: &str,
        skip: usize,
    ) -> Result<ExpectationResult, ExpectationError> {
        let delimiter = HeaderDelimiter::pattern(regex)?;
        self.expect_file_to_have_valid_table_header_with(&delimiter, skip)
    }

    #[instrument(level = "debug", skip_all, fields(path = %self.path.display(), skip = skip))]
    pub fn expect_file_to_have_valid_table_header_with(
        &self,
        delimiter: &HeaderDelimiter,
        skip: usize,
    ) -> Result<ExpectationResult, ExpectationError> {
        let Some(header) = header::read_header(&self.path, delimiter, skip)? else {
            return Err(ExpectationError::invalid_parameter(
                "skip",
                format!("skip ({skip}) must be less than the number of lines in the file"),
            ));
        };

        let success = header.is_unique();
        let duplicates = header.duplicates();
        debug!(
            columns = header.columns.len(),
            duplicates = duplicates.len(),
            "parsed table header"
        );

        Ok(
            ExpectationResult::builder(ExpectationKind::ExpectFileToHaveValidTableHeader)
                .kwarg("regex", delimiter.describe())
                .kwarg("skip", skip)
                .entry("element_count", header.columns.len())
                .entry("duplicate_count", header.duplicate_count())
                .entry("duplicates", duplicates)
                .entry("header_line", header.line_number)
                .observed_value(header.columns)
                .build(success),
        )
    }

    /// Succeeds iff the file parses as JSON and, when `schema` is given,
    /// conforms to that JSON Schema document. Malformed content is a failed
    /// expectation; a missing file or schema is an error.
    #[instrument(level = "debug", skip_all, fields(path = %self.path.display()))]
    pub fn expect_file_to_be_valid_json(
        &self,
        schema: Option<&Path>,
    ) -> Result<ExpectationResult, ExpectationError> {
        let validator = schema.map(json::load_schema).transpose()?;
        let outcome = json::check_json(&self.path, validator.as_ref())?;
        debug!(valid = outcome.is_valid(), "checked json document");

        let schema_value = schema
            .map(|path| Value::String(path.display().to_string()))
            .unwrap_or(Value::Null);
        let builder = ExpectationResult::builder(ExpectationKind::ExpectFileToBeValidJson)
            .kwarg("schema", schema_value.clone())
            .entry("schema", schema_value);

        Ok(match outcome {
            JsonOutcome::Valid => builder.build(true),
            JsonOutcome::Malformed(failure) => builder
                .detail("parse_error", json!(failure))
                .build(false),
            JsonOutcome::SchemaViolations(violations) => {
                let first = violations.first().map(|violation| json!(violation));
                builder
                    .entry("violation_count", violations.len())
                    .detail("first_violation", first)
                    .entry("violations", json!(violations))
                    .build(false)
            }
        })
    }

    /// Counts non-overlapping `params.regex` matches per line and succeeds
    /// iff at least a `params.mostly` share of non-null lines falls within
    /// `params.range`.
    pub fn expect_file_line_regex_match_count_to_be_between(
        &self,
        params: &LineMatchCount,
    ) -> Result<ExpectationResult, ExpectationError> {
        self.line_match_count(
            ExpectationKind::ExpectFileLineRegexMatchCountToBeBetween,
            params,
        )
    }

    /// Same as the ranged form, with `params.range` pinned to one count.
    pub fn expect_file_line_regex_match_count_to_equal(
        &self,
        params: &LineMatchCount,
    ) -> Result<ExpectationResult, ExpectationError> {
        if params.range.max() != Some(params.range.min()) {
            return Err(ExpectationError::invalid_parameter(
                "expected_count",
                "range must pin a single count; build it with CountRange::exactly",
            ));
        }
        self.line_match_count(ExpectationKind::ExpectFileLineRegexMatchCountToEqual, params)
    }

    #[instrument(level = "debug", skip_all, fields(path = %self.path.display(), kind = %kind))]
    fn line_match_count(
        &self,
        kind: ExpectationKind,
        params: &LineMatchCount,
    ) -> Result<ExpectationResult, ExpectationError> {
        let report = lines::count_line_matches(&self.path, params)?;
        let success = report.meets(params.mostly);
        debug!(
            element_count = report.element_count,
            unexpected_count = report.unexpected_count(),
            success,
            "counted line matches"
        );

        let builder = ExpectationResult::builder(kind).kwarg("regex", params.regex.as_str());
        let builder = match kind {
            ExpectationKind::ExpectFileLineRegexMatchCountToEqual => {
                builder.kwarg("expected_count", params.range.min())
            }
            _ => builder
                .kwarg("expected_min_count", params.range.min())
                .kwarg("expected_max_count", params.range.max()),
        };

        Ok(builder
            .kwarg("skip", params.skip)
            .kwarg("mostly", params.mostly.get())
            .kwarg("null_lines_regex", params.null_lines.as_str())
            .entry("element_count", report.element_count)
            .entry("missing_count", report.missing_count)
            .entry("unexpected_count", report.unexpected_count())
            .entry("unexpected_percent", report.unexpected_percent())
            .entry("unexpected_index_list", report.unexpected_index_list)
            .entry("partial_unexpected_list", report.partial_unexpected_list)
            .build(success))
    }
}
