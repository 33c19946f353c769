use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by file expectations before a result can be produced.
///
/// A failed expectation is not an error: it is an `ExpectationResult` with
/// `success == false`. These variants cover the cases where no meaningful
/// result exists.
#[derive(Debug, Error)]
pub enum ExpectationError {
    /// Caller input is malformed or out of range. Raised before any I/O.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A file the expectation must read is missing or unreadable.
    #[error("failed to {operation} `{}`: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExpectationError {
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Stable machine-readable kind used in command payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::Io { .. } => "io_fault",
        }
    }
}
