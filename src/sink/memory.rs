use super::MetricSink;
use crate::error::SinkError;
use crate::models::metric::MetricValue;

/// Keeps every dispatched value. Backs the one-shot snapshot modes.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub values: Vec<MetricValue>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value reported for `plugin_instance` / `type_instance`, if any.
    pub fn get(&self, plugin_instance: &str, type_instance: &str) -> Option<u64> {
        self.values.iter()
            .find(|v| v.plugin_instance == plugin_instance && v.type_instance == type_instance)
            .map(|v| v.value)
    }
}

impl MetricSink for MemorySink {
    fn dispatch(&mut self, values: &[MetricValue]) -> Result<(), SinkError> {
        self.values.extend_from_slice(values);
        Ok(())
    }
}
