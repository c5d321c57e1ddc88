use std::sync::Arc;

use super::{StreamCore, StreamHandler};
use crate::error::StreamError;
use crate::processors::{NumericProcessor, ProcessorMap, TextProcessor};
use crate::result::{Output, ProcessingResult};

/// Readings above this temperature are flagged as critical
const ALERT_THRESHOLD: f64 = 30.0;

/// Environmental sensor readings: numeric records (optionally calibrated by
/// a fixed offset) and free-text sensor notes
pub struct SensorStream {
    core: StreamCore,
}

impl SensorStream {
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_processors(id, Self::default_processors(NumericProcessor::default()))
    }

    /// Sensor stream whose numeric readings are shifted by `offset`
    pub fn with_calibration(id: impl Into<String>, offset: f64) -> Result<Self, StreamError> {
        let numeric = NumericProcessor::offset(offset)?;
        Ok(Self::with_processors(id, Self::default_processors(numeric)))
    }

    pub fn with_processors(id: impl Into<String>, processors: ProcessorMap) -> Self {
        Self {
            core: StreamCore::new(id, processors),
        }
    }

    fn default_processors(numeric: NumericProcessor) -> ProcessorMap {
        ProcessorMap::new()
            .with(Arc::new(numeric))
            .with(Arc::new(TextProcessor::default()))
    }
}

fn readings(output: &Output) -> &[f64] {
    match output {
        Output::Number { value } => std::slice::from_ref(value),
        Output::Series { values, .. } => values,
        _ => &[],
    }
}

impl StreamHandler for SensorStream {
    fn core(&self) -> &StreamCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StreamCore {
        &mut self.core
    }

    fn stream_type(&self) -> &'static str {
        "Environmental Data"
    }

    fn summarize(&self, results: &[ProcessingResult]) -> String {
        let values: Vec<f64> = results
            .iter()
            .filter_map(ProcessingResult::output)
            .flat_map(|o| readings(o).iter().copied())
            .collect();
        let avg = if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        };
        format!(
            "Sensor analysis: {} readings processed, avg temp: {:.1}ºC",
            values.len(),
            avg
        )
    }

    fn is_priority(&self, result: &ProcessingResult) -> bool {
        result
            .output()
            .is_some_and(|o| readings(o).iter().any(|v| *v > ALERT_THRESHOLD))
    }
}
