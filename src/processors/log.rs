use anyhow::Result;
use chrono::{DateTime, NaiveDateTime};
use regex::Regex;

use super::Processor;
use crate::error::ProcessError;
use crate::record::{Record, RecordKind};
use crate::result::{LogEntry, LogLevel, Output};

/// Offset-less timestamps are taken as UTC
const LOCAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parses log lines into timestamp, level and message.
///
/// Two shapes are accepted:
/// - `2087-01-01T00:00:00 ERROR disk full`
/// - `ERROR: disk full`
///
/// Timestamps are ISO-8601 with optional fractional seconds and an optional
/// `Z` or `+hh:mm` offset; zoned timestamps are normalized to UTC.
#[derive(Debug, Clone)]
pub struct LogProcessor {
    stamped: Regex,
    short: Regex,
}

impl LogProcessor {
    pub fn new() -> Result<Self> {
        let stamped = Regex::new(r"^(?P<timestamp>\d{4}-\d{2}-\d{2}T\S+)\s+(?P<level>[A-Z]+)\s+(?P<message>\S.*)$")?;
        let short = Regex::new(r"^(?P<level>[A-Z]+):\s*(?P<message>\S.*)$")?;
        Ok(Self { stamped, short })
    }

    fn parse_line(&self, line: &str) -> Result<LogEntry, ProcessError> {
        let line = line.trim();

        let (timestamp, level, message) = if let Some(caps) = self.stamped.captures(line) {
            let raw = &caps["timestamp"];
            let timestamp = parse_timestamp(raw)?;
            (Some(timestamp), caps["level"].to_string(), caps["message"].to_string())
        } else if let Some(caps) = self.short.captures(line) {
            (None, caps["level"].to_string(), caps["message"].to_string())
        } else {
            return Err(ProcessError::Format(format!(
                "line does not match the log pattern: '{}'",
                line
            )));
        };

        let level = LogLevel::parse(&level)
            .ok_or_else(|| ProcessError::Format(format!("unknown log level '{}'", level)))?;

        Ok(LogEntry {
            timestamp,
            level,
            message: message.trim_end().to_string(),
        })
    }
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, ProcessError> {
    if let Ok(zoned) = DateTime::parse_from_rfc3339(raw) {
        return Ok(zoned.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, LOCAL_TIMESTAMP_FORMAT)
        .map_err(|e| ProcessError::Format(format!("bad timestamp '{}': {}", raw, e)))
}

impl Processor for LogProcessor {
    fn name(&self) -> &str {
        "log"
    }

    fn kind(&self) -> RecordKind {
        RecordKind::Log
    }

    fn transform(&self, record: &Record) -> Result<Output, ProcessError> {
        let line = record
            .payload_str()
            .ok_or_else(|| ProcessError::Format(format!("log payload must be a string, got {}", record.payload)))?;
        self.parse_line(line).map(Output::Log)
    }
}

pub fn register(registry: &mut super::ProcessorRegistry) {
    registry.register_fn("log", |config: &serde_yaml::Value| {
        if !config.is_null() && config.as_mapping().map_or(true, |m| !m.is_empty()) {
            anyhow::bail!("log processor takes no parameters");
        }
        Ok(std::sync::Arc::new(LogProcessor::new()?))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::NaiveDate;

    fn processor() -> LogProcessor {
        LogProcessor::new().unwrap()
    }

    #[test]
    fn parses_timestamped_line() {
        let result = processor().process(Record::log("2087-01-01T00:00:00 ERROR disk full"));
        let expected = NaiveDate::from_ymd_opt(2087, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            result.output().and_then(Output::as_log),
            Some(&LogEntry {
                timestamp: Some(expected),
                level: LogLevel::Error,
                message: "disk full".into(),
            })
        );
    }

    fn stamp(line: &str) -> Option<NaiveDateTime> {
        processor()
            .process(Record::log(line))
            .output()
            .and_then(Output::as_log)
            .and_then(|entry| entry.timestamp)
    }

    fn at(h: u32, m: u32, s: u32, milli: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2087, 1, 1)
            .unwrap()
            .and_hms_milli_opt(h, m, s, milli)
            .unwrap()
    }

    #[test]
    fn accepts_utc_designator() {
        assert_eq!(stamp("2087-01-01T00:00:00Z ERROR disk full"), Some(at(0, 0, 0, 0)));
    }

    #[test]
    fn accepts_fractional_seconds() {
        assert_eq!(stamp("2087-01-01T00:00:00.123 INFO tick"), Some(at(0, 0, 0, 123)));
        assert_eq!(stamp("2087-01-01T00:00:00.123Z INFO tick"), Some(at(0, 0, 0, 123)));
    }

    #[test]
    fn normalizes_offsets_to_utc() {
        let expected = NaiveDate::from_ymd_opt(2086, 12, 31)
            .unwrap()
            .and_hms_opt(22, 0, 0)
            .unwrap();
        assert_eq!(stamp("2087-01-01T00:00:00+02:00 WARNING hot"), Some(expected));
        assert_eq!(stamp("2087-01-01T02:30:00-01:30 INFO late"), Some(at(4, 0, 0, 0)));
    }

    #[test]
    fn parses_short_form() {
        let result = processor().process(Record::log("INFO: System ready"));
        let entry = result.output().and_then(Output::as_log).unwrap();
        assert_eq!(entry.timestamp, None);
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.message, "System ready");

        let warn = processor().process(Record::log("WARN: low memory"));
        assert_eq!(warn.output().and_then(Output::as_log).unwrap().level, LogLevel::Warning);
    }

    #[test]
    fn rejects_malformed_lines() {
        for line in [
            "garbage line",
            "2087-13-01T00:00:00 ERROR bad month",
            "2087-01-01T00:00 ERROR no seconds",
            "2087-01-01T00:00:00 FATAL unknown level",
            "ERROR:",
            "",
        ] {
            let result = processor().process(Record::log(line));
            assert_eq!(result.error_kind(), Some(ErrorKind::Format), "line: {line:?}");
        }
    }

    #[test]
    fn non_string_payload_is_a_format_error() {
        let result = processor().process(Record::new(RecordKind::Log, 12));
        assert_eq!(result.error_kind(), Some(ErrorKind::Format));
    }
}
