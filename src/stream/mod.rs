use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{ErrorKind, ProcessError, StreamError};
use crate::processors::{Processor, ProcessorMap};
use crate::record::Record;
use crate::result::{Failure, ProcessingResult};

mod event;
mod manager;
mod report;
mod sensor;
mod transaction;

pub use event::EventStream;
pub use manager::{StreamOutcome, StreamProcessor};
pub use report::StreamReport;
pub use sensor::SensorStream;
pub use transaction::TransactionStream;

/// Lifecycle of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
}

/// State shared by every stream handler: identity, processor mapping and
/// counters of the current run
#[derive(Debug, Clone)]
pub struct StreamCore {
    id: String,
    processors: ProcessorMap,
    state: RunState,
    processed: usize,
    failed: usize,
}

impl StreamCore {
    pub fn new(id: impl Into<String>, processors: ProcessorMap) -> Self {
        Self {
            id: id.into(),
            processors,
            state: RunState::Idle,
            processed: 0,
            failed: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Stream handler trait - drives records through processors.
///
/// Implementors provide their stream-level validation and analysis; the run
/// loop, processor resolution and failure isolation are shared. Every record
/// yields exactly one result, in input order. Data errors (including a
/// panicking processor) become failure results; only an unmapped record kind
/// stops a run.
pub trait StreamHandler: Send {
    fn core(&self) -> &StreamCore;

    fn core_mut(&mut self) -> &mut StreamCore;

    /// Human label, e.g. "Environmental Data"
    fn stream_type(&self) -> &'static str;

    /// Stream-level check applied before a record reaches its processor
    fn check(&mut self, _record: &Record) -> Result<(), ProcessError> {
        Ok(())
    }

    /// Clear stream-level state before a new run
    fn reset(&mut self) {}

    /// One-line analysis of a run's results
    fn summarize(&self, results: &[ProcessingResult]) -> String;

    /// Whether a result is high-priority for this stream
    fn is_priority(&self, _result: &ProcessingResult) -> bool {
        false
    }

    /// High-priority subset of a run's results, in input order
    fn filter<'r>(&self, results: &'r [ProcessingResult]) -> Vec<&'r ProcessingResult> {
        results.iter().filter(|r| self.is_priority(r)).collect()
    }

    fn stream_id(&self) -> &str {
        self.core().id()
    }

    fn state(&self) -> RunState {
        self.core().state
    }

    fn describe(&self) -> String {
        format!("Stream ID: {}, Type: {}", self.stream_id(), self.stream_type())
    }

    /// Replace the processor mapped under `processor.kind()`
    fn set_processor(&mut self, processor: Arc<dyn Processor>) {
        self.core_mut().processors.insert(processor.kind(), processor);
    }

    /// Process one record at `index` of the current run
    fn handle(&mut self, index: usize, record: Record) -> Result<ProcessingResult, StreamError> {
        let result = match self.check(&record) {
            Err(e) => ProcessingResult::failure(&e, record),
            Ok(()) => {
                let processor = self
                    .core()
                    .processors
                    .resolve(record.kind)
                    .cloned()
                    .ok_or_else(|| StreamError::Unmapped {
                        stream_id: self.stream_id().to_string(),
                        kind: record.kind,
                        index,
                    })?;
                process_guarded(&processor, record)
            }
        };

        let core = self.core_mut();
        core.processed += 1;
        if let Some(failure) = result.as_failure() {
            core.failed += 1;
            debug!(
                stream = %core.id,
                index,
                kind = %failure.kind,
                "record failed: {}",
                failure.message
            );
        }
        Ok(result)
    }

    /// Run over all records eagerly
    fn run(&mut self, records: Vec<Record>) -> Result<Vec<ProcessingResult>, StreamError> {
        RunIter::new(self, records.into_iter()).collect()
    }

    /// Run lazily: one record is processed per `next()`. Dropping the
    /// iterator early stops the run.
    fn stream<I>(&mut self, records: I) -> RunIter<'_, Self, I::IntoIter>
    where
        Self: Sized,
        I: IntoIterator<Item = Record>,
    {
        RunIter::new(self, records.into_iter())
    }

    fn report(&self, results: &[ProcessingResult]) -> StreamReport {
        let failed = results.iter().filter(|r| !r.is_success()).count();
        StreamReport {
            stream_id: self.stream_id().to_string(),
            stream_type: self.stream_type().to_string(),
            total: results.len(),
            succeeded: results.len() - failed,
            failed,
            priority: self.filter(results).len(),
            summary: self.summarize(results),
        }
    }
}

/// Invoke a processor, converting a panic into a `Fault` failure
fn process_guarded(processor: &Arc<dyn Processor>, record: Record) -> ProcessingResult {
    let backup = record.clone();
    match panic::catch_unwind(AssertUnwindSafe(|| processor.process(record))) {
        Ok(result) => result,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            ProcessingResult::Failure(Failure::new(
                ErrorKind::Fault,
                format!("processor '{}' panicked: {}", processor.name(), reason),
                backup,
            ))
        }
    }
}

/// Lazy run over a record source, see [`StreamHandler::stream`]
pub struct RunIter<'a, H: StreamHandler + ?Sized, I> {
    handler: &'a mut H,
    records: I,
    index: usize,
    done: bool,
}

impl<'a, H: StreamHandler + ?Sized, I: Iterator<Item = Record>> RunIter<'a, H, I> {
    fn new(handler: &'a mut H, records: I) -> Self {
        handler.reset();
        let core = handler.core_mut();
        core.state = RunState::Running;
        core.processed = 0;
        core.failed = 0;
        info!(stream = %core.id, "run started");
        Self {
            handler,
            records,
            index: 0,
            done: false,
        }
    }
}

impl<H: StreamHandler + ?Sized, I: Iterator<Item = Record>> Iterator for RunIter<'_, H, I> {
    type Item = Result<ProcessingResult, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let Some(record) = self.records.next() else {
            self.done = true;
            let core = self.handler.core_mut();
            core.state = RunState::Completed;
            info!(
                stream = %core.id,
                processed = core.processed,
                failed = core.failed,
                "run completed"
            );
            return None;
        };

        let index = self.index;
        self.index += 1;
        match self.handler.handle(index, record) {
            Ok(result) => Some(Ok(result)),
            Err(e) => {
                self.done = true;
                self.handler.core_mut().state = RunState::Idle;
                warn!(stream = %self.handler.stream_id(), "run aborted: {}", e);
                Some(Err(e))
            }
        }
    }
}
