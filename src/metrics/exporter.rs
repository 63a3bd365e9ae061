use std::io::Write;

use parking_lot::Mutex;

use crate::metrics::snapshot::ByteLfuMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for cache metrics snapshots.
///
/// Writes the Prometheus text exposition format so the output can be scraped
/// or forwarded to an OpenTelemetry collector.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the exporter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_metric(&self, kind: &str, suffix: &str, value: u64) {
        let name = self.metric_name(suffix);
        let mut writer = self.writer.lock();
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send> MetricsExporter<ByteLfuMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &ByteLfuMetricsSnapshot) {
        let counters = [
            ("get_calls_total", snapshot.get_calls),
            ("get_hits_total", snapshot.get_hits),
            ("get_misses_total", snapshot.get_misses),
            ("set_calls_total", snapshot.set_calls),
            ("set_new_total", snapshot.set_new),
            ("set_unchanged_total", snapshot.set_unchanged),
            ("set_replaced_total", snapshot.set_replaced),
            ("set_rejected_total", snapshot.set_rejected),
            ("del_calls_total", snapshot.del_calls),
            ("del_hits_total", snapshot.del_hits),
            ("del_misses_total", snapshot.del_misses),
            ("evict_calls_total", snapshot.evict_calls),
            ("evicted_entries_total", snapshot.evicted_entries),
            ("evicted_bytes_total", snapshot.evicted_bytes),
            ("promotions_total", snapshot.promotions),
            ("clear_calls_total", snapshot.clear_calls),
        ];
        for (suffix, value) in counters {
            self.write_metric("counter", suffix, value);
        }

        let gauges = [
            ("cache_len", snapshot.cache_len),
            ("size_bytes", snapshot.size_bytes),
            ("capacity_bytes", snapshot.capacity_bytes),
        ];
        for (suffix, value) in gauges {
            self.write_metric("gauge", suffix, value as u64);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exports_prefixed_counters_and_gauges() {
        let exporter = PrometheusTextExporter::new("strcache", Vec::new());
        let snapshot = ByteLfuMetricsSnapshot {
            get_calls: 7,
            size_bytes: 12,
            ..Default::default()
        };
        exporter.export(&snapshot);

        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert!(text.contains("# TYPE strcache_get_calls_total counter"));
        assert!(text.contains("strcache_get_calls_total 7"));
        assert!(text.contains("# TYPE strcache_size_bytes gauge"));
        assert!(text.contains("strcache_size_bytes 12"));
    }

    #[test]
    fn empty_prefix_uses_bare_names() {
        let exporter = PrometheusTextExporter::new("", Vec::new());
        exporter.export(&ByteLfuMetricsSnapshot::default());
        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert!(text.contains("\nget_hits_total 0\n"));
    }
}
