//! Builder for [`ByteLfuCache`].
//!
//! Collects the byte budget and the tuning knobs of the underlying skip list,
//! validates them once, and hands back a ready cache.
//!
//! ## Example
//!
//! ```rust
//! use strcache::builder::ByteLfuBuilder;
//! use strcache::units::ByteSize;
//!
//! let cache = ByteLfuBuilder::new(0)
//!     .byte_size(ByteSize::KB * 10)
//!     .max_level(16)
//!     .probability(0.5)
//!     .seed(42)
//!     .build();
//!
//! cache.set("greeting", b"hello").unwrap();
//! assert_eq!(cache.capacity(), 10 * 1024);
//! ```

use crate::ds::skiplist::SkipListConfig;
use crate::error::ConfigError;
use crate::policy::byte_lfu::{ByteLfuCache, ByteLfuCore};
use crate::units::ByteSize;

/// Builder for creating [`ByteLfuCache`] instances.
#[derive(Debug, Clone)]
pub struct ByteLfuBuilder {
    capacity: usize,
    index: SkipListConfig,
}

impl ByteLfuBuilder {
    /// Creates a builder with a budget of `capacity` bytes and default index
    /// parameters.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            index: SkipListConfig::default(),
        }
    }

    /// Sets the budget in bytes.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the budget with [`ByteSize`] units, clamping at `usize::MAX`.
    pub fn byte_size(mut self, size: ByteSize) -> Self {
        self.capacity = size.to_usize_saturating();
        self
    }

    /// Sets the maximum tower height of the index.
    pub fn max_level(mut self, max_level: usize) -> Self {
        self.index.max_level = max_level;
        self
    }

    /// Sets the level promotion probability of the index.
    pub fn probability(mut self, probability: f64) -> Self {
        self.index.probability = probability;
        self
    }

    /// Sets the seed of the index height generator.
    pub fn seed(mut self, seed: u64) -> Self {
        self.index.seed = seed;
        self
    }

    /// Builds the unsynchronized core.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the index parameters are invalid.
    pub fn try_build_core(self) -> Result<ByteLfuCore, ConfigError> {
        self.index.validate()?;
        Ok(ByteLfuCore::with_index_config(self.capacity, self.index))
    }

    /// Builds the thread-safe cache.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the index parameters are invalid.
    pub fn try_build(self) -> Result<ByteLfuCache, ConfigError> {
        self.try_build_core().map(ByteLfuCache::from_core)
    }

    /// Builds the thread-safe cache.
    ///
    /// # Panics
    ///
    /// Panics if `max_level` is zero or `probability` is outside `(0, 1)`.
    pub fn build(self) -> ByteLfuCache {
        match self.try_build() {
            Ok(cache) => cache,
            Err(err) => panic!("invalid cache configuration: {err}"),
        }
    }
}

impl Default for ByteLfuBuilder {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_capacity() {
        let cache = ByteLfuBuilder::new(64).build();
        assert_eq!(cache.capacity(), 64);

        let cache = ByteLfuBuilder::default().capacity(8).build();
        assert_eq!(cache.capacity(), 8);

        let cache = ByteLfuBuilder::new(1).byte_size(ByteSize::MB * 2).build();
        assert_eq!(cache.capacity(), 2 * 1024 * 1024);
    }

    #[test]
    fn test_builder_rejects_bad_index_params() {
        let err = ByteLfuBuilder::new(8).max_level(0).try_build().unwrap_err();
        assert!(err.message().contains("max_level"));

        for p in [0.0, 1.0, -0.5, f64::NAN] {
            let err = ByteLfuBuilder::new(8).probability(p).try_build().unwrap_err();
            assert!(err.message().contains("probability"), "{p}: {err}");
        }
    }

    #[test]
    #[should_panic(expected = "invalid cache configuration")]
    fn test_build_panics_on_bad_params() {
        let _ = ByteLfuBuilder::new(8).max_level(0).build();
    }

    #[test]
    fn test_single_level_index_still_works() {
        let mut core = ByteLfuBuilder::new(6).max_level(1).try_build_core().unwrap();
        for key in ["a", "b", "c", "d"] {
            core.set(key, b"xx").unwrap();
        }
        core.get("c").unwrap();
        assert_eq!(core.keys_by_frequency(), vec!["b", "d", "c"]);
        core.check_invariants().unwrap();
    }

    #[test]
    fn test_same_seed_same_behaviour() {
        let build = || ByteLfuBuilder::new(32).seed(7).build();
        let (a, b) = (build(), build());
        for cache in [&a, &b] {
            for i in 0..10u8 {
                cache.set(&i.to_string(), [i; 3]).unwrap();
            }
            cache.get("4").unwrap();
        }
        assert_eq!(a.keys_by_frequency(), b.keys_by_frequency());
    }
}
