use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ErrorKind, ProcessError};
use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn parse(level: &str) -> Option<Self> {
        match level {
            "DEBUG" => Some(LogLevel::Debug),
            "INFO" => Some(LogLevel::Info),
            "WARNING" | "WARN" => Some(LogLevel::Warning),
            "ERROR" => Some(LogLevel::Error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields extracted from one structured log line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: Option<NaiveDateTime>,
    pub level: LogLevel,
    pub message: String,
}

/// Successful value produced by a processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Output {
    Number {
        value: f64,
    },
    Series {
        values: Vec<f64>,
        sum: f64,
        mean: f64,
    },
    Text {
        text: String,
        tokens: Vec<String>,
        characters: usize,
    },
    Log(LogEntry),
}

impl Output {
    /// Scalar view used by stream analysis: the value itself, or a series mean
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Output::Number { value } => Some(*value),
            Output::Series { mean, .. } => Some(*mean),
            _ => None,
        }
    }

    pub fn as_log(&self) -> Option<&LogEntry> {
        match self {
            Output::Log(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Output::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Number { value } => write!(f, "Processed numeric value: {}", value),
            Output::Series { values, sum, mean } => write!(
                f,
                "Processed {} numeric values, sum={}, avg={:.1}",
                values.len(),
                sum,
                mean
            ),
            Output::Text {
                tokens, characters, ..
            } => write!(
                f,
                "Processed text: {} characters, {} words",
                characters,
                tokens.len()
            ),
            Output::Log(entry) => match entry.level {
                LogLevel::Error => write!(f, "[ALERT] ERROR level detected: {}", entry.message),
                level => write!(f, "[{level}] {level} level detected: {}", entry.message),
            },
        }
    }
}

/// Failure descriptor: what went wrong and on which record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
    pub record: Record,
}

impl Failure {
    pub fn new(kind: ErrorKind, message: impl Into<String>, record: Record) -> Self {
        Self {
            kind,
            message: message.into(),
            record,
        }
    }

    pub fn from_error(error: &ProcessError, record: Record) -> Self {
        Self::new(error.kind(), error.to_string(), record)
    }
}

/// Outcome of processing one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessingResult {
    Success { record: Record, output: Output },
    Failure(Failure),
}

impl ProcessingResult {
    pub fn success(record: Record, output: Output) -> Self {
        ProcessingResult::Success { record, output }
    }

    pub fn failure(error: &ProcessError, record: Record) -> Self {
        ProcessingResult::Failure(Failure::from_error(error, record))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProcessingResult::Success { .. })
    }

    pub fn record(&self) -> &Record {
        match self {
            ProcessingResult::Success { record, .. } => record,
            ProcessingResult::Failure(failure) => &failure.record,
        }
    }

    pub fn output(&self) -> Option<&Output> {
        match self {
            ProcessingResult::Success { output, .. } => Some(output),
            ProcessingResult::Failure(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&Failure> {
        match self {
            ProcessingResult::Failure(failure) => Some(failure),
            ProcessingResult::Success { .. } => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.as_failure().map(|f| f.kind)
    }
}

impl fmt::Display for ProcessingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingResult::Success { output, .. } => write!(f, "Output: {}", output),
            ProcessingResult::Failure(failure) => {
                write!(f, "Error: {} ({})", failure.message, failure.kind)
            }
        }
    }
}
