use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Kind tag carried by every record; selects the processor that handles it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Numeric,
    Text,
    Log,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [RecordKind::Numeric, RecordKind::Text, RecordKind::Log];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Numeric => "numeric",
            RecordKind::Text => "text",
            RecordKind::Log => "log",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        RecordKind::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// One unit of input data.
///
/// The payload is kept raw (any JSON value); interpreting it is the job of the
/// processor mapped to `kind`. Records are never modified once built, the
/// `with_*` helpers consume and return a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub kind: RecordKind,
    #[serde(default)]
    pub payload: Value,
    #[serde(default, skip_serializing_if = "is_empty_metadata")]
    pub metadata: Metadata,
}

fn is_empty_metadata(metadata: &Metadata) -> bool {
    metadata.timestamp.is_none() && metadata.source.is_none()
}

impl Record {
    pub fn new(kind: RecordKind, payload: impl Into<Value>) -> Self {
        Self {
            kind,
            payload: payload.into(),
            metadata: Metadata::default(),
        }
    }

    pub fn numeric(payload: impl Into<Value>) -> Self {
        Self::new(RecordKind::Numeric, payload)
    }

    pub fn text(payload: impl Into<Value>) -> Self {
        Self::new(RecordKind::Text, payload)
    }

    pub fn log(line: impl Into<String>) -> Self {
        Self::new(RecordKind::Log, Value::String(line.into()))
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.metadata.timestamp = Some(timestamp);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.metadata.source = Some(source.into());
        self
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.metadata.timestamp
    }

    pub fn source(&self) -> Option<&str> {
        self.metadata.source.as_deref()
    }

    /// Payload as a string slice, if it is a JSON string
    pub fn payload_str(&self) -> Option<&str> {
        self.payload.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_json_line_with_metadata() {
        let line = r#"{"kind":"log","payload":"INFO: up","metadata":{"timestamp":7,"source":"node-1"}}"#;
        let record: Record = serde_json::from_str(line).unwrap();
        assert_eq!(record.kind, RecordKind::Log);
        assert_eq!(record.payload_str(), Some("INFO: up"));
        assert_eq!(record.timestamp(), Some(7));
        assert_eq!(record.source(), Some("node-1"));
        assert_eq!(
            record,
            Record::log("INFO: up").with_timestamp(7).with_source("node-1")
        );
    }

    #[test]
    fn metadata_is_optional() {
        let record: Record = serde_json::from_str(r#"{"kind":"numeric","payload":[1,2]}"#).unwrap();
        assert_eq!(record.payload, json!([1, 2]));
        assert_eq!(record.metadata, Metadata::default());

        let encoded = serde_json::to_string(&record).unwrap();
        assert!(!encoded.contains("metadata"));
    }

    #[test]
    fn kind_names() {
        assert_eq!(RecordKind::parse("text"), Some(RecordKind::Text));
        assert_eq!(RecordKind::parse("video"), None);
        assert_eq!(RecordKind::Numeric.to_string(), "numeric");
    }
}
