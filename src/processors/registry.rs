use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::Arc;

use super::Processor;

/// Builds a shared processor from the YAML parameters given under its name
/// in a stream's `processors:` overrides
pub trait ProcessorFactory: Send + Sync {
    fn create(&self, config: &serde_yaml::Value) -> Result<Arc<dyn Processor>>;
}

/// Processor factories keyed by the names used in stream configs.
///
/// A built processor replaces the handler's mapping for the processor's own
/// record kind, so the name only selects the factory.
#[derive(Default)]
pub struct ProcessorRegistry {
    factories: HashMap<String, Box<dyn ProcessorFactory>>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `numeric`, `text` and `log` processors
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        super::numeric::register(&mut registry);
        super::text::register(&mut registry);
        super::log::register(&mut registry);
        registry
    }

    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: ProcessorFactory + 'static,
    {
        self.factories.insert(name.to_string(), Box::new(factory));
    }

    pub fn register_fn<F>(&mut self, name: &str, factory_fn: F)
    where
        F: Fn(&serde_yaml::Value) -> Result<Arc<dyn Processor>> + Send + Sync + 'static,
    {
        struct FnFactory<F> {
            f: F,
        }

        impl<F> ProcessorFactory for FnFactory<F>
        where
            F: Fn(&serde_yaml::Value) -> Result<Arc<dyn Processor>> + Send + Sync,
        {
            fn create(&self, config: &serde_yaml::Value) -> Result<Arc<dyn Processor>> {
                (self.f)(config)
            }
        }

        self.factories
            .insert(name.to_string(), Box::new(FnFactory { f: factory_fn }));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn build(&self, name: &str, config: &serde_yaml::Value) -> Result<Arc<dyn Processor>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| anyhow!("Unknown processor: {}", name))?;
        factory.create(config)
    }
}
