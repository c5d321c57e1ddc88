//! Code Nexus - polymorphic record processing.
//!
//! Processors turn one [`Record`] into one [`ProcessingResult`] through a
//! shared [`Processor`] interface. Stream handlers drive sequences of records
//! through the processor mapped to each record's kind, isolating per-record
//! failures so a bad record never aborts a run.

pub mod config;
pub mod error;
pub mod io;
pub mod processors;
pub mod record;
pub mod result;
pub mod runtime;
pub mod samples;
pub mod stream;

pub use error::{ErrorKind, ProcessError, StreamError};
pub use processors::{
    LogProcessor, NumericProcessor, NumericTransform, Processor, ProcessorMap, ProcessorRegistry,
    TextCase, TextProcessor,
};
pub use record::{Metadata, Record, RecordKind};
pub use result::{Failure, LogEntry, LogLevel, Output, ProcessingResult};
pub use stream::{
    EventStream, RunIter, RunState, SensorStream, StreamHandler, StreamProcessor, StreamReport,
    TransactionStream,
};
