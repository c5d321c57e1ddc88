use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub pipeline_name: String,
    pub streams: Vec<StreamManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamManifest {
    pub id: String,
    pub stream_type: String,
    pub input_files: Vec<String>,
    pub results_file: Option<String>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub priority: usize,
    pub summary: String,
    pub error: Option<String>, // Set when the run was aborted
}

impl Manifest {
    pub fn new(pipeline_name: String) -> Self {
        Self {
            pipeline_name,
            streams: Vec::new(),
        }
    }

    pub fn add_stream(&mut self, stream: StreamManifest) {
        self.streams.push(stream);
    }

    pub fn failed_streams(&self) -> usize {
        self.streams.iter().filter(|s| s.error.is_some()).count()
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        crate::io::write_json(self, path.as_ref())
    }
}
