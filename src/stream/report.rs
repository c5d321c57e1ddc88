use serde::{Deserialize, Serialize};
use std::fmt;

/// Aggregate view of one stream run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamReport {
    pub stream_id: String,
    pub stream_type: String,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Results the stream flags as high-priority (alerts, large operations)
    pub priority: usize,
    pub summary: String,
}

impl fmt::Display for StreamReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stream ID: {}, Type: {}", self.stream_id, self.stream_type)?;
        writeln!(f, "  {}", self.summary)?;
        write!(
            f,
            "  {} records: {} ok, {} failed, {} high-priority",
            self.total, self.succeeded, self.failed, self.priority
        )
    }
}
