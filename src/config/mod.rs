use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::processors::ProcessorRegistry;
use crate::stream::{EventStream, SensorStream, StreamHandler, TransactionStream};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NexusConfig {
    pub name: String,
    /// Directory for per-stream results and the run manifest
    #[serde(default)]
    pub output: Option<PathBuf>,
    pub streams: Vec<StreamConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Sensor,
    Transaction,
    Event,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StreamConfig {
    pub id: String,
    pub kind: StreamKind,
    /// Glob pattern of JSON-lines record files
    pub input: String,
    /// Processor overrides keyed by processor name, e.g. `numeric: { transform: ... }`
    #[serde(default)]
    pub processors: BTreeMap<String, serde_yaml::Value>,
}

impl NexusConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: NexusConfig =
            serde_yaml::from_str(content).context("Failed to parse YAML configuration")?;

        // Validate
        config.validate(&ProcessorRegistry::with_defaults())?;
        Ok(config)
    }

    fn validate(&self, registry: &ProcessorRegistry) -> Result<()> {
        if self.streams.is_empty() {
            anyhow::bail!("Config '{}' declares no streams", self.name);
        }

        let mut ids = HashSet::new();
        for stream in &self.streams {
            if !ids.insert(&stream.id) {
                anyhow::bail!("Duplicate stream id: {}", stream.id);
            }
            if stream.input.trim().is_empty() {
                anyhow::bail!("Stream '{}' has an empty input pattern", stream.id);
            }
            // Building catches unknown names and bad parameters up front
            stream
                .build(registry)
                .with_context(|| format!("Invalid stream '{}'", stream.id))?;
        }

        Ok(())
    }
}

impl StreamConfig {
    /// Build the handler for this stream with any processor overrides applied
    pub fn build(&self, registry: &ProcessorRegistry) -> Result<Box<dyn StreamHandler>> {
        let mut handler: Box<dyn StreamHandler> = match self.kind {
            StreamKind::Sensor => Box::new(SensorStream::new(&self.id)),
            StreamKind::Transaction => Box::new(TransactionStream::new(&self.id)),
            StreamKind::Event => Box::new(EventStream::new(&self.id)?),
        };

        for (name, params) in &self.processors {
            let processor = registry
                .build(name, params)
                .with_context(|| format!("Failed to create processor: {}", name))?;
            handler.set_processor(processor);
        }

        Ok(handler)
    }
}
