use chrono::{DateTime, Utc};
use serde::Serialize;

/// Plugin name every value is reported under.
pub const PLUGIN: &str = "df";
/// collectd type for the free/reserved/used triple.
pub const TYPE: &str = "df_complex";

/// One value handed to a metrics sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricValue {
    pub host:            String,
    pub plugin:          &'static str,
    pub plugin_instance: String,
    #[serde(rename = "type")]
    pub type_:           &'static str,
    pub type_instance:   &'static str,
    pub time:            DateTime<Utc>,
    pub interval_secs:   u64,
    pub value:           u64,
}

impl MetricValue {
    /// collectd identifier: `host/df-sda1/df_complex-free`.
    pub fn identifier(&self) -> String {
        format!(
            "{}/{}-{}/{}-{}",
            self.host, self.plugin, self.plugin_instance, self.type_, self.type_instance
        )
    }
}
