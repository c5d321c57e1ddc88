use rayon::prelude::*;
use tracing::{info, warn};

use super::{StreamHandler, StreamReport};
use crate::error::StreamError;
use crate::record::Record;
use crate::result::ProcessingResult;

/// Result of running one registered stream over its batch
#[derive(Debug)]
pub struct StreamOutcome {
    pub stream_id: String,
    pub result: Result<(Vec<ProcessingResult>, StreamReport), StreamError>,
}

impl StreamOutcome {
    pub fn report(&self) -> Option<&StreamReport> {
        self.result.as_ref().ok().map(|(_, report)| report)
    }
}

/// Holds several stream handlers and drives them together.
///
/// Batches are matched to streams by position. Streams run in parallel, each
/// on its own handler, and outcomes come back in registration order. A fatal
/// error in one stream does not affect the others.
#[derive(Default)]
pub struct StreamProcessor {
    streams: Vec<Box<dyn StreamHandler>>,
}

impl StreamProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stream(&mut self, stream: Box<dyn StreamHandler>) {
        self.streams.push(stream);
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Run stream `i` over `batches[i]`. Streams without a batch are skipped.
    pub fn process_all(&mut self, batches: Vec<Vec<Record>>) -> Vec<StreamOutcome> {
        if batches.len() > self.streams.len() {
            warn!(
                batches = batches.len(),
                streams = self.streams.len(),
                "more batches than streams, extra batches ignored"
            );
        }

        let outcomes: Vec<StreamOutcome> = self
            .streams
            .par_iter_mut()
            .zip(batches.into_par_iter())
            .map(|(stream, batch)| {
                let result = stream
                    .run(batch)
                    .map(|results| {
                        let report = stream.report(&results);
                        (results, report)
                    });
                StreamOutcome {
                    stream_id: stream.stream_id().to_string(),
                    result,
                }
            })
            .collect();

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        info!(streams = outcomes.len(), failed, "processed stream batches");
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{EventStream, SensorStream, TransactionStream};

    fn processor() -> StreamProcessor {
        let mut processor = StreamProcessor::new();
        processor.add_stream(Box::new(SensorStream::new("SENSOR_001")));
        processor.add_stream(Box::new(TransactionStream::new("TRANS_001")));
        processor.add_stream(Box::new(EventStream::new("EVENT_001").unwrap()));
        processor
    }

    #[test]
    fn runs_each_stream_on_its_batch_in_order() {
        assert!(StreamProcessor::new().is_empty());
        let mut streams = processor();
        assert_eq!(streams.len(), 3);
        let outcomes = streams.process_all(vec![
            vec![Record::numeric(22.5), Record::numeric(21.0), Record::numeric(24.0)],
            vec![Record::numeric(-100), Record::numeric(150), Record::numeric(-25)],
            vec![
                Record::text("login").with_timestamp(1),
                Record::text("error").with_timestamp(2),
                Record::text("logout").with_timestamp(3),
            ],
        ]);

        let summaries: Vec<_> = outcomes
            .iter()
            .map(|o| o.report().unwrap().summary.clone())
            .collect();
        assert_eq!(
            summaries,
            vec![
                "Sensor analysis: 3 readings processed, avg temp: 22.5ºC",
                "Transaction analysis: 3 operations, net flow: +25 units",
                "Event analysis: 3 events, 1 error detected",
            ]
        );
    }

    #[test]
    fn fatal_error_is_isolated_to_its_stream() {
        let mut streams = processor();
        let outcomes = streams.process_all(vec![
            vec![Record::log("INFO: not a sensor reading")],
            vec![Record::numeric(5)],
        ]);

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].result.is_err());
        assert_eq!(outcomes[1].stream_id, "TRANS_001");
        assert!(outcomes[1].result.is_ok());
    }
}
