pub use crate::builder::ByteLfuBuilder;
pub use crate::ds::{ScoreSkipList, SkipListConfig, SlotId, UniqueInstant};
pub use crate::error::{CacheError, ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::{ByteLfuMetricsSnapshot, MetricsExporter, MetricsSnapshotProvider};
pub use crate::policy::byte_lfu::{ByteLfuCache, ByteLfuCore};
pub use crate::units::ByteSize;
