//! Expectations about a single file: existence, digest, size, table header
//! uniqueness, JSON validity and per-line regex match counts.

pub mod cmd;
pub mod domain;
pub mod engine;
pub mod logging;

pub use domain::bounds::{CountRange, Mostly, SizeBounds};
pub use domain::error::ExpectationError;
pub use domain::result::{ExpectationKind, ExpectationResult, ResultBuilder};
pub use engine::file::FileExpectations;
