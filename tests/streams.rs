use code_nexus::{
    ErrorKind, EventStream, LogLevel, NumericProcessor, NumericTransform, Output, Processor,
    Record, RecordKind, RunState, SensorStream, StreamHandler, TextProcessor, TransactionStream,
};
use serde_json::json;

#[test]
fn every_record_gets_exactly_one_result_in_order() {
    let records: Vec<Record> = (0..50)
        .map(|i| {
            if i % 7 == 0 {
                Record::numeric(format!("bad-{i}"))
            } else {
                Record::numeric(i)
            }
        })
        .collect();

    let mut stream = TransactionStream::new("TRANS_001");
    let results = stream.run(records.clone()).unwrap();

    assert_eq!(results.len(), records.len());
    for (record, result) in records.iter().zip(&results) {
        assert_eq!(result.record(), record);
    }
    assert_eq!(results.iter().filter(|r| !r.is_success()).count(), 8);
}

#[test]
fn malformed_record_does_not_abort_the_stream() {
    let mut stream = SensorStream::new("SENSOR_001");
    let results = stream
        .run(vec![Record::numeric("abc"), Record::numeric(3), Record::numeric(4)])
        .unwrap();

    let failure = results[0].as_failure().unwrap();
    assert_eq!(failure.kind, ErrorKind::Value);
    assert_eq!(failure.record, Record::numeric("abc"));
    assert_eq!(results[1].output(), Some(&Output::Number { value: 3.0 }));
    assert_eq!(results[2].output(), Some(&Output::Number { value: 4.0 }));
    assert_eq!(stream.state(), RunState::Completed);
}

#[test]
fn processing_is_idempotent() {
    let processors: Vec<(Box<dyn Processor>, Record)> = vec![
        (Box::new(NumericProcessor::default()) as Box<dyn Processor>, Record::numeric(json!([1, 2, 3]))),
        (Box::new(TextProcessor::default()) as Box<dyn Processor>, Record::text("Hello Nexus")),
        (
            Box::new(code_nexus::LogProcessor::new().unwrap()) as Box<dyn Processor>,
            Record::log("2087-01-01T00:00:00 ERROR disk full"),
        ),
    ];

    for (processor, record) in processors {
        let first = processor.process(record.clone());
        let second = processor.process(record);
        assert!(first.is_success());
        assert_eq!(first, second);
    }
}

#[test]
fn double_transform_scenario() {
    let processor = NumericProcessor::new(NumericTransform::Double).unwrap();
    let result = processor.process(Record::numeric(10));
    assert_eq!(result.output().and_then(Output::as_f64), Some(20.0));
}

#[test]
fn log_scenarios() {
    let mut events = EventStream::new("EVENT_001").unwrap();
    let results = events
        .run(vec![
            Record::log("2087-01-01T00:00:00 ERROR disk full").with_timestamp(1),
            Record::log("garbage line").with_timestamp(2),
        ])
        .unwrap();

    let entry = results[0].output().and_then(Output::as_log).unwrap();
    assert_eq!(
        entry.timestamp.map(|t| t.to_string()),
        Some("2087-01-01 00:00:00".to_string())
    );
    assert_eq!(entry.level, LogLevel::Error);
    assert_eq!(entry.message, "disk full");
    assert_eq!(results[1].error_kind(), Some(ErrorKind::Format));
}

#[test]
fn event_timestamps_must_increase() {
    let mut events = EventStream::new("EVENT_001").unwrap();
    let results = events
        .run(vec![
            Record::log("INFO: a").with_timestamp(1),
            Record::log("INFO: b").with_timestamp(2),
            Record::log("INFO: c").with_timestamp(1),
        ])
        .unwrap();

    assert!(results[0].is_success());
    assert!(results[1].is_success());
    assert_eq!(results[2].error_kind(), Some(ErrorKind::Validation));
}

#[test]
fn lazy_run_can_stop_early() {
    let mut stream = SensorStream::new("SENSOR_001");
    let first_two: Vec<_> = stream
        .stream((0..1_000).map(|i| Record::numeric(i)))
        .take(2)
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(first_two.len(), 2);
    assert_eq!(stream.state(), RunState::Running);
}

#[test]
fn handlers_share_one_interface() {
    let mut handlers: Vec<(Box<dyn StreamHandler>, Vec<Record>)> = vec![
        (Box::new(SensorStream::new("S")) as Box<dyn StreamHandler>, vec![Record::numeric(22.5)]),
        (Box::new(TransactionStream::new("T")) as Box<dyn StreamHandler>, vec![Record::numeric(150)]),
        (
            Box::new(EventStream::new("E").unwrap()) as Box<dyn StreamHandler>,
            vec![Record::text("error").with_timestamp(1)],
        ),
    ];

    let types: Vec<_> = handlers
        .iter_mut()
        .map(|(handler, batch)| {
            let results = handler.run(std::mem::take(batch)).unwrap();
            let report = handler.report(&results);
            assert_eq!(report.total, 1);
            report.stream_type
        })
        .collect();
    assert_eq!(types, ["Environmental Data", "Financial Data", "System Events"]);
}

#[test]
fn mismatched_processor_yields_type_mismatch() {
    let processor = TextProcessor::default();
    let result = processor.process(Record::new(RecordKind::Log, "INFO: x"));
    assert_eq!(result.error_kind(), Some(ErrorKind::TypeMismatch));
}

#[test]
fn filter_matches_reported_priority() {
    let mut sensor = SensorStream::with_calibration("SENSOR_001", 1.0).unwrap();
    let results = sensor
        .run(vec![
            Record::numeric(22.5),
            Record::numeric(31.0),
            Record::numeric(json!([28, 35])),
            Record::numeric("abc"),
        ])
        .unwrap();

    let critical = sensor.filter(&results);
    assert_eq!(critical.len(), sensor.report(&results).priority);
    assert_eq!(critical[0].record(), &Record::numeric(31.0));
    assert_eq!(critical[1].record(), &Record::numeric(json!([28, 35])));
}
