use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Processor;
use crate::error::{ProcessError, StreamError};
use crate::record::{Record, RecordKind};
use crate::result::Output;

/// Transform applied to every number a [`NumericProcessor`] reads
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum NumericTransform {
    #[default]
    Identity,
    Double,
    Scale {
        factor: f64,
    },
    Offset {
        delta: f64,
    },
    /// Min-max normalization into [0, 1] for values inside the range
    Normalize {
        min: f64,
        max: f64,
    },
}

impl NumericTransform {
    pub fn apply(&self, value: f64) -> f64 {
        match *self {
            NumericTransform::Identity => value,
            NumericTransform::Double => value * 2.0,
            NumericTransform::Scale { factor } => value * factor,
            NumericTransform::Offset { delta } => value + delta,
            NumericTransform::Normalize { min, max } => (value - min) / (max - min),
        }
    }

    fn check(&self) -> Result<(), StreamError> {
        match *self {
            NumericTransform::Scale { factor } if !factor.is_finite() => Err(StreamError::Config(
                format!("scale factor must be finite, got {}", factor),
            )),
            NumericTransform::Offset { delta } if !delta.is_finite() => Err(StreamError::Config(
                format!("offset must be finite, got {}", delta),
            )),
            NumericTransform::Normalize { min, max } if !(min.is_finite() && max.is_finite()) || max <= min => {
                Err(StreamError::Config(format!(
                    "normalize needs finite bounds with min < max, got [{}, {}]",
                    min, max
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Parses numeric payloads (a number, a numeric string, or an array of
/// those) and applies its transform to each value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericProcessor {
    transform: NumericTransform,
}

impl NumericProcessor {
    pub fn new(transform: NumericTransform) -> Result<Self, StreamError> {
        transform.check()?;
        Ok(Self { transform })
    }

    pub fn offset(delta: f64) -> Result<Self, StreamError> {
        Self::new(NumericTransform::Offset { delta })
    }

    fn convert(&self, value: &Value) -> Result<f64, ProcessError> {
        let transformed = self.transform.apply(parse_number(value)?);
        if transformed.is_finite() {
            Ok(transformed)
        } else {
            Err(ProcessError::InvalidValue(format!(
                "transform produced a non-finite value from {}",
                value
            )))
        }
    }
}

fn parse_number(value: &Value) -> Result<f64, ProcessError> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => Ok(n),
        Some(n) => Err(ProcessError::InvalidValue(format!(
            "numeric payload must be finite, got {}",
            n
        ))),
        None => Err(ProcessError::InvalidValue(format!(
            "payload is not numeric: {}",
            value
        ))),
    }
}

impl Processor for NumericProcessor {
    fn name(&self) -> &str {
        "numeric"
    }

    fn kind(&self) -> RecordKind {
        RecordKind::Numeric
    }

    fn transform(&self, record: &Record) -> Result<Output, ProcessError> {
        match &record.payload {
            Value::Array(items) => {
                if items.is_empty() {
                    return Err(ProcessError::InvalidValue(
                        "numeric series is empty".to_string(),
                    ));
                }
                let values = items
                    .iter()
                    .map(|item| self.convert(item))
                    .collect::<Result<Vec<_>, _>>()?;
                let sum: f64 = values.iter().sum();
                let mean = sum / values.len() as f64;
                Ok(Output::Series { values, sum, mean })
            }
            scalar => Ok(Output::Number {
                value: self.convert(scalar)?,
            }),
        }
    }
}

pub fn register(registry: &mut super::ProcessorRegistry) {
    #[derive(Deserialize, Default)]
    #[serde(default, deny_unknown_fields)]
    struct Params {
        transform: NumericTransform,
    }

    registry.register_fn("numeric", |config: &serde_yaml::Value| {
        let params: Params = if config.is_null() {
            Params::default()
        } else {
            serde_yaml::from_value(config.clone())?
        };
        Ok(std::sync::Arc::new(NumericProcessor::new(params.transform)?))
    });
}
