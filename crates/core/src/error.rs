//! Error types for Structura

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Merge,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Merge => "merge",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

/// Main error type for Structura operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported input format for {path}: {reason}")]
    InputFormat { path: PathBuf, reason: String },

    #[error("Feature {index} has geometry type {found}, only Point is supported")]
    GeometryType { index: usize, found: String },

    #[error("Invalid merge radius: {0} (must be finite and non-negative)")]
    InvalidRadius(f64),

    #[error("Structure {id} has a non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate { id: usize, x: f64, y: f64 },

    #[error("Feature {index} is missing required property '{field}'")]
    MissingAttribute { index: usize, field: String },

    #[error("Feature {index} has invalid property '{field}': {reason}")]
    InvalidAttribute {
        index: usize,
        field: String,
        reason: String,
    },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Internal invariant violated: {0}")]
    InternalInvariant(String),

    #[error("Failed to write {path}: {reason}")]
    Output { path: PathBuf, reason: String },
}

impl Error {
    /// The pipeline stage this error belongs to.
    ///
    /// Bare I/O and JSON failures are attributed to loading; the writer
    /// reports its failures as [`Error::Output`].
    pub fn stage(&self) -> Stage {
        match self {
            Error::Io(_)
            | Error::Json(_)
            | Error::InputFormat { .. }
            | Error::GeometryType { .. }
            | Error::MissingAttribute { .. }
            | Error::InvalidAttribute { .. } => Stage::Load,
            Error::InvalidRadius(_)
            | Error::NonFiniteCoordinate { .. }
            | Error::InvalidParameter { .. }
            | Error::InternalInvariant(_) => Stage::Merge,
            Error::Output { .. } => Stage::Write,
        }
    }
}

/// Result type alias for Structura operations
pub type Result<T> = std::result::Result<T, Error>;
