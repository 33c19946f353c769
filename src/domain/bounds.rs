use serde::Serialize;

use crate::domain::error::ExpectationError;

/// Inclusive byte-size range accepted by `expect_file_size_to_be_between`.
///
/// Construction is the single validation path: both bounds are integers,
/// non-negative, and `minsize <= maxsize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeBounds {
    minsize: u64,
    maxsize: u64,
}

impl SizeBounds {
    pub fn new(minsize: i64, maxsize: i64) -> Result<Self, ExpectationError> {
        let minsize = non_negative("minsize", minsize)?;
        let maxsize = non_negative("maxsize", maxsize)?;
        if minsize > maxsize {
            return Err(ExpectationError::invalid_parameter(
                "minsize",
                format!("minsize ({minsize}) must be <= maxsize ({maxsize})"),
            ));
        }
        Ok(Self { minsize, maxsize })
    }

    /// Parses textual bounds, e.g. from command-line flags.
    pub fn parse(minsize: &str, maxsize: &str) -> Result<Self, ExpectationError> {
        let minsize = parse_integer("minsize", minsize)?;
        let maxsize = parse_integer("maxsize", maxsize)?;
        Self::new(minsize, maxsize)
    }

    pub fn minsize(&self) -> u64 {
        self.minsize
    }

    pub fn maxsize(&self) -> u64 {
        self.maxsize
    }

    pub fn contains(&self, size: u64) -> bool {
        self.minsize <= size && size <= self.maxsize
    }
}

/// Inclusive per-line match-count range; `max == None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountRange {
    min: u64,
    max: Option<u64>,
}

impl CountRange {
    pub fn new(min: i64, max: Option<i64>) -> Result<Self, ExpectationError> {
        let min = non_negative("expected_min_count", min)?;
        let max = max
            .map(|max| non_negative("expected_max_count", max))
            .transpose()?;
        if let Some(max) = max {
            if min > max {
                return Err(ExpectationError::invalid_parameter(
                    "expected_min_count",
                    format!("expected_min_count ({min}) must be <= expected_max_count ({max})"),
                ));
            }
        }
        Ok(Self { min, max })
    }

    pub fn exactly(count: i64) -> Result<Self, ExpectationError> {
        let count = non_negative("expected_count", count)?;
        Ok(Self {
            min: count,
            max: Some(count),
        })
    }

    pub fn min(&self) -> u64 {
        self.min
    }

    pub fn max(&self) -> Option<u64> {
        self.max
    }

    pub fn contains(&self, count: u64) -> bool {
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }
}

impl Default for CountRange {
    fn default() -> Self {
        Self { min: 0, max: None }
    }
}

/// Minimum fraction of evaluated lines that must meet a line-level criterion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Mostly(f64);

impl Mostly {
    pub fn new(fraction: f64) -> Result<Self, ExpectationError> {
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return Err(ExpectationError::invalid_parameter(
                "mostly",
                format!("must be a fraction between 0 and 1, got {fraction}"),
            ));
        }
        Ok(Self(fraction))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for Mostly {
    fn default() -> Self {
        Self(1.0)
    }
}

fn non_negative(name: &'static str, value: i64) -> Result<u64, ExpectationError> {
    u64::try_from(value)
        .map_err(|_| ExpectationError::invalid_parameter(name, format!("must be >= 0, got {value}")))
}

/// Accepts integer literals and integral decimals such as `10.0`.
fn parse_integer(name: &'static str, raw: &str) -> Result<i64, ExpectationError> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(value);
    }
    match trimmed.parse::<f64>() {
        Ok(value)
            if value.is_finite()
                && value.fract() == 0.0
                && value >= i64::MIN as f64
                && value < i64::MAX as f64 =>
        {
            Ok(value as i64)
        }
        _ => Err(ExpectationError::invalid_parameter(
            name,
            format!("must be an integer, got `{raw}`"),
        )),
    }
}
