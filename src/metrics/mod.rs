//! Cache metrics, compiled in with the `metrics` feature.
//!
//! Recording, snapshotting and export are separate concerns:
//! [`ByteLfuMetrics`] is written by the cache under its lock,
//! [`ByteLfuMetricsSnapshot`] is a plain copy taken on demand, and
//! [`PrometheusTextExporter`] publishes snapshots.

pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use exporter::PrometheusTextExporter;
pub use metrics_impl::ByteLfuMetrics;
pub use snapshot::ByteLfuMetricsSnapshot;
pub use traits::{ByteLfuMetricsRecorder, MetricsExporter, MetricsSnapshotProvider};
