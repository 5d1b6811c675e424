use super::MetricSink;
use crate::error::SinkError;
use crate::models::metric::MetricValue;
use std::io::Write;

/// One JSON object per value, newline-delimited.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MetricSink for JsonLinesSink<W> {
    fn dispatch(&mut self, values: &[MetricValue]) -> Result<(), SinkError> {
        for v in values {
            serde_json::to_writer(&mut self.out, v)?;
            self.out.write_all(b"\n")?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metric::{PLUGIN, TYPE};
    use chrono::Utc;
    use serde_json::Value;

    #[test]
    fn emits_parseable_lines() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.dispatch(&[MetricValue {
            host: "h".into(),
            plugin: PLUGIN,
            plugin_instance: "sda1".into(),
            type_: TYPE,
            type_instance: "used",
            time: Utc::now(),
            interval_secs: 10,
            value: 245_760,
        }]).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let v: Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(v["type"], "df_complex");
        assert_eq!(v["type_instance"], "used");
        assert_eq!(v["value"], 245_760);
    }
}
