//! # Metrics Traits
//!
//! ```text
//!   ┌──────────────────────────┐
//!   │  ByteLfuMetricsRecorder  │   written under the cache lock
//!   │  get/set/del/evict       │
//!   └────────────┬─────────────┘
//!                │ snapshot()
//!                ▼
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │───►│ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```
//!
//! Recorders only write counters; providers only read; exporters only publish.

/// Counters recorded by the byte-bounded LFU cache.
pub trait ByteLfuMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_set_call(&mut self);
    fn record_set_new(&mut self);
    fn record_set_unchanged(&mut self);
    fn record_set_replaced(&mut self);
    fn record_set_rejected(&mut self);
    fn record_del_hit(&mut self);
    fn record_del_miss(&mut self);
    fn record_evict_call(&mut self);
    fn record_evicted_entry(&mut self, bytes: usize);
    fn record_promotion(&mut self);
    fn record_clear(&mut self);
}

/// Produce a point-in-time copy of metrics.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Publish metrics to a monitoring backend.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
