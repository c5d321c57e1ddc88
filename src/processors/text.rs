use serde::{Deserialize, Serialize};
use serde_json::Value;
use unicode_segmentation::UnicodeSegmentation;

use super::Processor;
use crate::error::ProcessError;
use crate::record::{Record, RecordKind};
use crate::result::Output;

/// Case folding applied after trimming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextCase {
    #[default]
    Keep,
    Lower,
    Upper,
}

/// Cleans text payloads and splits them into word tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextProcessor {
    pub case: TextCase,
    pub trim: bool,
    /// Fail null or empty payloads instead of producing an empty output
    pub require_non_empty: bool,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self {
            case: TextCase::Keep,
            trim: true,
            require_non_empty: false,
        }
    }
}

impl TextProcessor {
    pub fn strict() -> Self {
        Self {
            require_non_empty: true,
            ..Self::default()
        }
    }

    /// Text processor that upper-cases every payload
    pub fn uppercase() -> Self {
        Self {
            case: TextCase::Upper,
            ..Self::default()
        }
    }
}

impl Processor for TextProcessor {
    fn name(&self) -> &str {
        "text"
    }

    fn kind(&self) -> RecordKind {
        RecordKind::Text
    }

    fn transform(&self, record: &Record) -> Result<Output, ProcessError> {
        let mut text = match &record.payload {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        if self.trim {
            text = text.trim().to_string();
        }
        match self.case {
            TextCase::Keep => {}
            TextCase::Lower => text = text.to_lowercase(),
            TextCase::Upper => text = text.to_uppercase(),
        }

        if self.require_non_empty && text.is_empty() {
            return Err(ProcessError::InvalidValue(
                "text payload is empty".to_string(),
            ));
        }

        let tokens = text.unicode_words().map(str::to_string).collect();
        let characters = text.chars().count();

        Ok(Output::Text {
            text,
            tokens,
            characters,
        })
    }
}

pub fn register(registry: &mut super::ProcessorRegistry) {
    registry.register_fn("text", |config: &serde_yaml::Value| {
        let processor: TextProcessor = if config.is_null() {
            TextProcessor::default()
        } else {
            serde_yaml::from_value(config.clone())?
        };
        Ok(std::sync::Arc::new(processor))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn counts_characters_and_words() {
        let result = TextProcessor::default().process(Record::text("Hello Nexus World"));
        let output = result.output().unwrap();
        assert_eq!(output.to_string(), "Processed text: 17 characters, 3 words");
    }

    #[test]
    fn cleans_before_tokenizing() {
        let processor = TextProcessor {
            case: TextCase::Lower,
            ..TextProcessor::default()
        };
        let result = processor.process(Record::text("  Data, STREAMS!  "));
        assert_eq!(
            result.output(),
            Some(&Output::Text {
                text: "data, streams!".into(),
                tokens: vec!["data".into(), "streams".into()],
                characters: 14,
            })
        );
    }

    #[test]
    fn empty_payload_only_fails_when_required() {
        let lenient = TextProcessor::default().process(Record::text(json!(null)));
        assert!(lenient.is_success());

        for payload in [json!(null), json!(""), json!("   ")] {
            let strict = TextProcessor::strict().process(Record::text(payload));
            assert_eq!(strict.error_kind(), Some(ErrorKind::Value));
        }
    }

    #[test]
    fn uppercases_events() {
        let result = TextProcessor::uppercase().process(Record::text(" login "));
        assert_eq!(result.output().and_then(Output::as_text), Some("LOGIN"));
    }

    #[test]
    fn case_parses_from_yaml() {
        let processor: TextProcessor = serde_yaml::from_str("case: upper").unwrap();
        assert_eq!(processor, TextProcessor::uppercase());
        assert!(serde_yaml::from_str::<TextProcessor>("case: title").is_err());
    }

    #[test]
    fn stringifies_scalars() {
        let result = TextProcessor::strict().process(Record::text(42));
        assert_eq!(result.output().and_then(Output::as_text), Some("42"));
    }
}
