use super::MetricSink;
use crate::error::SinkError;
use crate::models::metric::MetricValue;
use std::io::Write;

/// Format one value as a collectd plain-text `PUTVAL` command.
pub fn putval_line(v: &MetricValue) -> String {
    format!(
        "PUTVAL \"{}\" interval={} {}:{}",
        v.identifier(), v.interval_secs, v.time.timestamp(), v.value
    )
}

/// Writes `PUTVAL` lines to a writer; on stdout this feeds collectd's exec plugin.
pub struct PutvalSink<W: Write> {
    out: W,
}

impl<W: Write> PutvalSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl PutvalSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> MetricSink for PutvalSink<W> {
    fn dispatch(&mut self, values: &[MetricValue]) -> Result<(), SinkError> {
        for v in values {
            writeln!(self.out, "{}", putval_line(v))?;
        }
        // exec plugin reads line-by-line; don't sit in a buffer
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metric::{PLUGIN, TYPE};
    use chrono::{TimeZone, Utc};

    fn value(type_instance: &'static str, value: u64) -> MetricValue {
        MetricValue {
            host: "box".into(),
            plugin: PLUGIN,
            plugin_instance: "sda1".into(),
            type_: TYPE,
            type_instance,
            time: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            interval_secs: 10,
            value,
        }
    }

    #[test]
    fn formats_putval_command() {
        assert_eq!(
            putval_line(&value("free", 122_880)),
            "PUTVAL \"box/df-sda1/df_complex-free\" interval=10 1700000000:122880"
        );
    }

    #[test]
    fn writes_one_line_per_value() {
        let mut sink = PutvalSink::new(Vec::new());
        sink.dispatch(&[value("free", 1), value("reserved", 2), value("used", 3)]).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("df_complex-used"));
        assert!(lines[2].ends_with(":3"));
    }
}
