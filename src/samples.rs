//! Built-in sample datasets for the `demo` command

use anyhow::Result;
use clap::ValueEnum;
use serde_json::json;

use crate::record::Record;
use crate::stream::{EventStream, SensorStream, StreamHandler, TransactionStream};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dataset {
    Numeric,
    Text,
    Log,
}

impl Dataset {
    /// Handler suited to the dataset, paired with its sample records
    pub fn load(self) -> Result<(Box<dyn StreamHandler>, Vec<Record>)> {
        let loaded = match self {
            Dataset::Numeric => (
                Box::new(SensorStream::new("SENSOR_001")) as Box<dyn StreamHandler>,
                vec![
                    Record::numeric(22.5),
                    Record::numeric(21.0),
                    Record::numeric(24.0),
                    Record::numeric("abc"),
                    Record::numeric(json!([31, 32.5, 29])),
                ],
            ),
            Dataset::Text => (
                Box::new(EventStream::new("EVENT_001")?) as Box<dyn StreamHandler>,
                vec![
                    Record::text("login").with_timestamp(1),
                    Record::text("error").with_timestamp(2),
                    Record::text("logout").with_timestamp(3),
                    Record::text("replayed").with_timestamp(2),
                ],
            ),
            Dataset::Log => (
                Box::new(EventStream::new("EVENT_002")?) as Box<dyn StreamHandler>,
                vec![
                    Record::log("2087-01-01T00:00:00 ERROR disk full").with_timestamp(1),
                    Record::log("INFO: System ready").with_timestamp(2),
                    Record::log("WARNING: Connection slow").with_timestamp(3),
                    Record::log("garbage line").with_timestamp(4),
                ],
            ),
        };
        Ok(loaded)
    }
}

/// One handler per stream type with the batches used by the mixed demo
pub fn mixed() -> Result<Vec<(Box<dyn StreamHandler>, Vec<Record>)>> {
    Ok(vec![
        (
            Box::new(SensorStream::new("SENSOR_001")) as Box<dyn StreamHandler>,
            vec![
                Record::numeric(22.5),
                Record::numeric(21.0),
                Record::numeric(24.0),
            ],
        ),
        (
            Box::new(TransactionStream::new("TRANS_001")) as Box<dyn StreamHandler>,
            vec![
                Record::numeric(-100),
                Record::numeric(150),
                Record::numeric(-25),
            ],
        ),
        (
            Box::new(EventStream::new("EVENT_001")?) as Box<dyn StreamHandler>,
            vec![
                Record::text("login").with_timestamp(1),
                Record::text("error").with_timestamp(2),
                Record::text("logout").with_timestamp(3),
            ],
        ),
    ])
}
