use std::fmt;

/// Point-in-time copy of [`ByteLfuMetrics`](crate::metrics::ByteLfuMetrics)
/// plus gauges read at snapshot time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ByteLfuMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub set_calls: u64,
    pub set_new: u64,
    pub set_unchanged: u64,
    pub set_replaced: u64,
    pub set_rejected: u64,

    pub del_calls: u64,
    pub del_hits: u64,
    pub del_misses: u64,

    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub evicted_bytes: u64,
    pub promotions: u64,
    pub clear_calls: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub size_bytes: usize,
    pub capacity_bytes: usize,
}

impl ByteLfuMetricsSnapshot {
    /// Fraction of `get` calls that hit, or `0.0` before any call.
    pub fn hit_rate(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }
}

impl fmt::Display for ByteLfuMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gets={} hits={} ({:.1}%) sets={} evicted={} ({} B) len={} size={}/{} B",
            self.get_calls,
            self.get_hits,
            self.hit_rate() * 100.0,
            self.set_calls,
            self.evicted_entries,
            self.evicted_bytes,
            self.cache_len,
            self.size_bytes,
            self.capacity_bytes
        )
    }
}
