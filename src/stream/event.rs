use anyhow::Result;
use std::sync::Arc;

use super::{StreamCore, StreamHandler};
use crate::error::ProcessError;
use crate::processors::{LogProcessor, ProcessorMap, TextProcessor};
use crate::record::Record;
use crate::result::{LogLevel, Output, ProcessingResult};

/// System events: log lines and plain event names.
///
/// Every record must carry a timestamp greater than the last accepted one.
/// A record that breaks the order fails validation and leaves the last
/// accepted timestamp untouched.
pub struct EventStream {
    core: StreamCore,
    last_timestamp: Option<i64>,
}

impl EventStream {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        Self::with_text(id, TextProcessor::default())
    }

    /// Event stream that upper-cases plain event names
    pub fn uppercased(id: impl Into<String>) -> Result<Self> {
        Self::with_text(id, TextProcessor::uppercase())
    }

    fn with_text(id: impl Into<String>, text: TextProcessor) -> Result<Self> {
        let processors = ProcessorMap::new()
            .with(Arc::new(LogProcessor::new()?))
            .with(Arc::new(text));
        Ok(Self::with_processors(id, processors))
    }

    pub fn with_processors(id: impl Into<String>, processors: ProcessorMap) -> Self {
        Self {
            core: StreamCore::new(id, processors),
            last_timestamp: None,
        }
    }
}

fn is_error_event(output: &Output) -> bool {
    match output {
        Output::Log(entry) => entry.level == LogLevel::Error,
        Output::Text { text, .. } => text.eq_ignore_ascii_case("error"),
        _ => false,
    }
}

impl StreamHandler for EventStream {
    fn core(&self) -> &StreamCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StreamCore {
        &mut self.core
    }

    fn stream_type(&self) -> &'static str {
        "System Events"
    }

    fn check(&mut self, record: &Record) -> Result<(), ProcessError> {
        let timestamp = record
            .timestamp()
            .ok_or_else(|| ProcessError::Validation("event has no timestamp".to_string()))?;

        if let Some(last) = self.last_timestamp {
            if timestamp <= last {
                return Err(ProcessError::Validation(format!(
                    "timestamp {} is not after {}",
                    timestamp, last
                )));
            }
        }
        self.last_timestamp = Some(timestamp);
        Ok(())
    }

    fn reset(&mut self) {
        self.last_timestamp = None;
    }

    fn summarize(&self, results: &[ProcessingResult]) -> String {
        let errors = results.iter().filter(|r| self.is_priority(r)).count();
        format!(
            "Event analysis: {} events, {} error detected",
            results.len(),
            errors
        )
    }

    fn is_priority(&self, result: &ProcessingResult) -> bool {
        result.output().is_some_and(is_error_event)
    }
}
