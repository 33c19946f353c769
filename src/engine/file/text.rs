use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::domain::error::ExpectationError;

/// One decoded line with its 1-based position in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub text: String,
}

/// Reads lines after discarding `skip` leading ones, stopping after `limit`
/// lines when given. Line terminators (`\n`, `\r\n`) are stripped and invalid
/// UTF-8 is replaced rather than rejected.
pub fn read_lines(
    path: &Path,
    skip: usize,
    limit: Option<usize>,
) -> Result<Vec<Line>, ExpectationError> {
    let file = File::open(path).map_err(|source| ExpectationError::io("open", path, source))?;
    let mut reader = BufReader::new(file);
    let mut lines = Vec::new();
    let mut buffer = Vec::new();
    let mut number = 0usize;

    loop {
        if limit.is_some_and(|limit| lines.len() >= limit) {
            break;
        }
        buffer.clear();
        let read = reader
            .read_until(b'\n', &mut buffer)
            .map_err(|source| ExpectationError::io("read", path, source))?;
        if read == 0 {
            break;
        }
        number += 1;
        if number <= skip {
            continue;
        }
        lines.push(Line {
            number,
            text: decode_line(&buffer),
        });
    }

    Ok(lines)
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
