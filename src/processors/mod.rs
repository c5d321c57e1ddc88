use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::ProcessError;
use crate::record::{Record, RecordKind};
use crate::result::{Output, ProcessingResult};

pub mod log;
pub mod numeric;
pub mod registry;
pub mod text;

pub use log::LogProcessor;
pub use numeric::{NumericProcessor, NumericTransform};
pub use registry::{ProcessorFactory, ProcessorRegistry};
pub use text::{TextCase, TextProcessor};

/// Processor trait - unified interface for all record processors
///
/// Variants only supply `transform`; kind checking and wrapping the outcome
/// into a [`ProcessingResult`] are shared.
pub trait Processor: Send + Sync {
    fn name(&self) -> &str;

    /// Record kind this processor accepts
    fn kind(&self) -> RecordKind;

    fn transform(&self, record: &Record) -> Result<Output, ProcessError>;

    fn validate(&self, record: &Record) -> Result<(), ProcessError> {
        if record.kind == self.kind() {
            Ok(())
        } else {
            Err(ProcessError::TypeMismatch {
                processor: self.name().to_string(),
                expected: self.kind(),
                found: record.kind,
            })
        }
    }

    /// Process one record. Never fails: errors become failure results.
    fn process(&self, record: Record) -> ProcessingResult {
        match self.validate(&record).and_then(|()| self.transform(&record)) {
            Ok(output) => ProcessingResult::success(record, output),
            Err(e) => ProcessingResult::failure(&e, record),
        }
    }
}

/// Fixed mapping from record kind to the processor that handles it
#[derive(Clone, Default)]
pub struct ProcessorMap {
    processors: BTreeMap<RecordKind, Arc<dyn Processor>>,
    fallback: Option<Arc<dyn Processor>>,
}

impl ProcessorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a processor under its own declared kind
    pub fn with(mut self, processor: Arc<dyn Processor>) -> Self {
        self.insert(processor.kind(), processor);
        self
    }

    /// Processor used for kinds without an explicit entry
    pub fn with_fallback(mut self, processor: Arc<dyn Processor>) -> Self {
        self.fallback = Some(processor);
        self
    }

    pub fn insert(&mut self, kind: RecordKind, processor: Arc<dyn Processor>) {
        self.processors.insert(kind, processor);
    }

    pub fn resolve(&self, kind: RecordKind) -> Option<&Arc<dyn Processor>> {
        self.processors.get(&kind).or(self.fallback.as_ref())
    }

    pub fn kinds(&self) -> impl Iterator<Item = RecordKind> + '_ {
        self.processors.keys().copied()
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

impl std::fmt::Debug for ProcessorMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (kind, processor) in &self.processors {
            map.entry(kind, &processor.name());
        }
        if let Some(fallback) = &self.fallback {
            map.entry(&"*", &fallback.name());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn process_rejects_other_kinds() {
        let processor = NumericProcessor::default();
        let result = processor.process(Record::text("hello"));
        assert_eq!(result.error_kind(), Some(ErrorKind::TypeMismatch));
    }

    #[test]
    fn map_resolves_explicit_entries_before_fallback() {
        let map = ProcessorMap::new()
            .with(Arc::new(NumericProcessor::default()))
            .with_fallback(Arc::new(TextProcessor::default()));

        assert_eq!(map.resolve(RecordKind::Numeric).unwrap().name(), "numeric");
        assert_eq!(map.resolve(RecordKind::Log).unwrap().name(), "text");
        assert_eq!(map.kinds().collect::<Vec<_>>(), vec![RecordKind::Numeric]);
    }

    #[test]
    fn map_without_fallback_leaves_kinds_unresolved() {
        let map = ProcessorMap::new().with(Arc::new(TextProcessor::default()));
        assert!(map.resolve(RecordKind::Numeric).is_none());
        assert!(!map.has_fallback());
    }
}
