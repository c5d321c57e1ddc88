use std::sync::Arc;

use super::{StreamCore, StreamHandler};
use crate::error::StreamError;
use crate::processors::{NumericProcessor, NumericTransform, ProcessorMap, TextProcessor};
use crate::result::{Output, ProcessingResult};

/// Operations moving more than this many units are flagged
const LARGE_AMOUNT: f64 = 100.0;

/// Financial operations as signed amounts: sells are positive inflows,
/// buys negative outflows. Text records carry memos.
pub struct TransactionStream {
    core: StreamCore,
}

impl TransactionStream {
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_processors(id, Self::default_processors(NumericProcessor::default()))
    }

    /// Transaction stream that deducts a proportional fee from every amount,
    /// e.g. `0.05` keeps 95% of each operation
    pub fn with_fee(id: impl Into<String>, rate: f64) -> Result<Self, StreamError> {
        if !(0.0..1.0).contains(&rate) {
            return Err(StreamError::Config(format!(
                "fee rate must be in [0, 1), got {}",
                rate
            )));
        }
        let numeric = NumericProcessor::new(NumericTransform::Scale { factor: 1.0 - rate })?;
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

/// Amount rounded to cents, without trailing zeros
fn format_units(amount: f64) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    // -0.001 rounds to -0.0
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{:.2}", rounded);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if rounded > 0.0 {
        format!("+{}", text)
    } else {
        text.to_string()
    }
}

fn amounts(output: &Output) -> &[f64] {
    match output {
        Output::Number { value } => std::slice::from_ref(value),
        Output::Series { values, .. } => values,
        _ => &[],
    }
}

impl StreamHandler for TransactionStream {
    fn core(&self) -> &StreamCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StreamCore {
        &mut self.core
    }

    fn stream_type(&self) -> &'static str {
        "Financial Data"
    }

    fn summarize(&self, results: &[ProcessingResult]) -> String {
        let (operations, net) = results
            .iter()
            .filter_map(ProcessingResult::output)
            .flat_map(|o| amounts(o).iter().copied())
            .fold((0usize, 0.0f64), |(n, net), amount| (n + 1, net + amount));
        format!(
            "Transaction analysis: {} operations, net flow: {} units",
            operations,
            format_units(net)
        )
    }

    fn is_priority(&self, result: &ProcessingResult) -> bool {
        result
            .output()
            .is_some_and(|o| amounts(o).iter().any(|a| a.abs() > LARGE_AMOUNT))
    }
}
