//! strcache: a byte-bounded LFU cache for string keys and byte values.
//!
//! Values are charged by their length against a fixed byte budget. When a new
//! value does not fit, the least frequently read entries are evicted first,
//! oldest first among equals. Frequency and recency are tracked by a skip list
//! ordered by `(access count, instant)`.
//!
//! ```
//! use strcache::{ByteLfuCache, ByteSize};
//!
//! let cache = ByteLfuCache::with_byte_size(ByteSize::KB);
//! cache.set("user:1", b"alice").unwrap();
//! assert_eq!(&*cache.get("user:1").unwrap(), b"alice");
//! assert_eq!(cache.size(), 5);
//! ```
//!
//! ## Modules
//!
//! - [`ds`]: the score-ordered skip list, its arena and instant source.
//! - [`policy`]: the cache itself.
//! - [`builder`]: validated construction with index tuning.
//! - [`metrics`]: counters and a Prometheus text exporter (`metrics` feature).

pub mod builder;
pub mod ds;
pub mod error;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod policy;
pub mod prelude;
pub mod units;

pub use builder::ByteLfuBuilder;
pub use error::{CacheError, ConfigError, InvariantError};
pub use policy::byte_lfu::{ByteLfuCache, ByteLfuCore};
pub use units::ByteSize;
