use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::record::RecordKind;

/// Data-level errors raised while processing a single record.
/// These never escape a stream run: the handler turns them into failure results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessError {
    #[error("type mismatch: {processor} expects {expected} records, got {found}")]
    TypeMismatch {
        processor: String,
        expected: RecordKind,
        found: RecordKind,
    },

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("format error: {0}")]
    Format(String),

    #[error("validation error: {0}")]
    Validation(String),
}

impl ProcessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProcessError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            ProcessError::InvalidValue(_) => ErrorKind::Value,
            ProcessError::Format(_) => ErrorKind::Format,
            ProcessError::Validation(_) => ErrorKind::Validation,
        }
    }
}

/// Classification carried by a failure result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    TypeMismatch,
    Value,
    Format,
    Validation,
    /// A processor panicked; the stream caught it and moved on
    Fault,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::TypeMismatch => "TypeMismatchError",
            ErrorKind::Value => "ValueError",
            ErrorKind::Format => "FormatError",
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Fault => "Fault",
        };
        f.write_str(name)
    }
}

/// Misconfiguration errors. Unlike [`ProcessError`], these abort the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StreamError {
    #[error("stream {stream_id}: no processor mapped for {kind} records at index {index}")]
    Unmapped {
        stream_id: String,
        kind: RecordKind,
        index: usize,
    },

    #[error("invalid processor configuration: {0}")]
    Config(String),
}
