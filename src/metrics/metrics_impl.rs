use crate::metrics::snapshot::ByteLfuMetricsSnapshot;
use crate::metrics::traits::ByteLfuMetricsRecorder;

/// Counter block owned by `ByteLfuCore`.
///
/// Plain integers: every write happens through `&mut` under the cache lock.
#[derive(Debug, Default, Clone)]
pub struct ByteLfuMetrics {
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
}

impl ByteLfuMetrics {
    /// Builds a snapshot, adding the gauges supplied by the cache.
    pub fn snapshot_with(&self, len: usize, size: usize, capacity: usize) -> ByteLfuMetricsSnapshot {
        ByteLfuMetricsSnapshot {
            get_calls: self.get_calls,
            get_hits: self.get_hits,
            get_misses: self.get_misses,
            set_calls: self.set_calls,
            set_new: self.set_new,
            set_unchanged: self.set_unchanged,
            set_replaced: self.set_replaced,
            set_rejected: self.set_rejected,
            del_calls: self.del_calls,
            del_hits: self.del_hits,
            del_misses: self.del_misses,
            evict_calls: self.evict_calls,
            evicted_entries: self.evicted_entries,
            evicted_bytes: self.evicted_bytes,
            promotions: self.promotions,
            clear_calls: self.clear_calls,
            cache_len: len,
            size_bytes: size,
            capacity_bytes: capacity,
        }
    }
}

impl ByteLfuMetricsRecorder for ByteLfuMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    fn record_set_call(&mut self) {
        self.set_calls += 1;
    }

    fn record_set_new(&mut self) {
        self.set_new += 1;
    }

    fn record_set_unchanged(&mut self) {
        self.set_unchanged += 1;
    }

    fn record_set_replaced(&mut self) {
        self.set_replaced += 1;
    }

    fn record_set_rejected(&mut self) {
        self.set_rejected += 1;
    }

    fn record_del_hit(&mut self) {
        self.del_calls += 1;
        self.del_hits += 1;
    }

    fn record_del_miss(&mut self) {
        self.del_calls += 1;
        self.del_misses += 1;
    }

    fn record_evict_call(&mut self) {
        self.evict_calls += 1;
    }

    fn record_evicted_entry(&mut self, bytes: usize) {
        self.evicted_entries += 1;
        self.evicted_bytes += bytes as u64;
    }

    fn record_promotion(&mut self) {
        self.promotions += 1;
    }

    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_updates_counters() {
        let mut m = ByteLfuMetrics::default();
        m.record_get_hit();
        m.record_get_miss();
        m.record_get_miss();
        m.record_set_call();
        m.record_set_new();
        m.record_evict_call();
        m.record_evicted_entry(10);
        m.record_evicted_entry(5);
        m.record_del_miss();

        assert_eq!(m.get_calls, 3);
        assert_eq!(m.get_hits, 1);
        assert_eq!(m.get_misses, 2);
        assert_eq!(m.set_calls, 1);
        assert_eq!(m.set_new, 1);
        assert_eq!(m.evicted_entries, 2);
        assert_eq!(m.evicted_bytes, 15);
        assert_eq!(m.del_calls, 1);
        assert_eq!(m.del_misses, 1);
    }

    #[test]
    fn snapshot_carries_gauges() {
        let mut m = ByteLfuMetrics::default();
        m.record_promotion();
        let snap = m.snapshot_with(3, 42, 100);
        assert_eq!(snap.promotions, 1);
        assert_eq!(snap.cache_len, 3);
        assert_eq!(snap.size_bytes, 42);
        assert_eq!(snap.capacity_bytes, 100);
    }
}
