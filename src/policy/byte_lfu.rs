//! # Byte-Bounded LFU Cache
//!
//! A string-keyed cache with a byte budget. Entries are kept in a
//! [`ScoreSkipList`] ordered by `(access count, instant)`, so the head is the
//! least frequently used entry and, among equals, the least recently touched.
//! Eviction walks from the head until enough bytes are reclaimed.
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────────────┐
//!   │ ByteLfuCache  (Clone; Arc<Mutex<ByteLfuCore>>)                    │
//!   │                                                                   │
//!   │   ByteLfuCore                                                     │
//!   │   ┌──────────────────────────┐   ┌─────────────────────────────┐  │
//!   │   │ map: FxHashMap<String,   │   │ index: ScoreSkipList<       │  │
//!   │   │            SlotId>       │──►│   String, Arc<[u8]>>        │  │
//!   │   └──────────────────────────┘   │ head ─► (1,t0) ─► (1,t3) ─► │  │
//!   │                                  │         (2,t5) ─► (7,t1)    │  │
//!   │   size / capacity  (bytes)       └─────────────────────────────┘  │
//!   └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Method  | Effect                                                          |
//! |---------|-----------------------------------------------------------------|
//! | `set`   | no-op for an identical value; otherwise replace with score 1,   |
//! |         | evicting from the head when the budget is short                 |
//! | `get`   | returns the value and bumps its score by one                    |
//! | `del`   | removes the entry                                               |
//!
//! `set` fails with [`CacheError::NoSpace`] only when the value alone is
//! larger than the capacity; `get`/`del` fail with [`CacheError::NotFound`].
//! A failing call never changes the cache.
//!
//! ## Eviction
//!
//! ```text
//!   need 4 bytes, 1 free  → shortfall 3
//!
//!   head ─► ["3": 3 B] ─► ["2": 4 B] ─► ...
//!              ▲
//!            victims = ["3"]   (collected first, removed afterwards)
//! ```
//!
//! ## Thread Safety
//!
//! - `ByteLfuCore` is **not** thread-safe; every operation takes `&mut self`.
//! - `ByteLfuCache` serializes every call behind one `parking_lot::Mutex`.
//!
//! ## Example Usage
//!
//! ```
//! use strcache::ByteLfuCache;
//!
//! let cache = ByteLfuCache::new(10);
//! cache.set("2", b"AA").unwrap();
//! cache.set("3", b"AAA").unwrap();
//! assert_eq!(cache.keys_by_frequency(), vec!["2", "3"]);
//!
//! cache.get("2").unwrap();
//! assert_eq!(cache.keys_by_frequency(), vec!["3", "2"]);
//! assert_eq!(cache.size(), 5);
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::ds::skiplist::{ScoreSkipList, SkipListConfig};
use crate::ds::slot_arena::SlotId;
use crate::error::{CacheError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::ByteLfuMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::ByteLfuMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{ByteLfuMetricsRecorder, MetricsSnapshotProvider};
use crate::units::ByteSize;

/// Score given to freshly inserted entries.
const INITIAL_SCORE: i64 = 1;

/// Unsynchronized byte-bounded LFU cache.
pub struct ByteLfuCore {
    index: ScoreSkipList<String, Arc<[u8]>>,
    map: FxHashMap<String, SlotId>,
    size: usize,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: ByteLfuMetrics,
}

impl ByteLfuCore {
    /// Creates an empty cache holding at most `capacity` bytes of values.
    pub fn new(capacity: usize) -> Self {
        Self::with_index(capacity, ScoreSkipList::new())
    }

    /// Creates an empty cache sized with [`ByteSize`] units.
    ///
    /// Sizes beyond `usize::MAX` are clamped.
    pub fn with_byte_size(capacity: ByteSize) -> Self {
        Self::new(capacity.to_usize_saturating())
    }

    pub(crate) fn with_index_config(capacity: usize, config: SkipListConfig) -> Self {
        Self::with_index(capacity, ScoreSkipList::with_config(config))
    }

    fn with_index(capacity: usize, index: ScoreSkipList<String, Arc<[u8]>>) -> Self {
        Self {
            index,
            map: FxHashMap::default(),
            size: 0,
            capacity,
            #[cfg(feature = "metrics")]
            metrics: ByteLfuMetrics::default(),
        }
    }

    /// Stores `value` under `key`.
    ///
    /// Storing a value identical to the current one is a no-op that keeps the
    /// entry's score. A different value replaces the entry with a fresh one
    /// at score 1. When the budget is short, entries are evicted from the
    /// least frequently used end until the value fits.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NoSpace`] if `value` is longer than the whole
    /// capacity. The cache is left untouched, including any previous value
    /// under `key`.
    pub fn set(&mut self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        #[cfg(feature = "metrics")]
        self.metrics.record_set_call();

        let existing = self.map.get(key).copied();
        if let Some(id) = existing
            && self
                .index
                .entry(id)
                .is_some_and(|entry| &entry.value[..] == value)
        {
            #[cfg(feature = "metrics")]
            self.metrics.record_set_unchanged();
            return Ok(());
        }

        let needed = value.len();
        if needed > self.capacity {
            #[cfg(feature = "metrics")]
            self.metrics.record_set_rejected();
            tracing::debug!(key, needed, capacity = self.capacity, "rejecting oversized value");
            return Err(CacheError::NoSpace {
                needed,
                capacity: self.capacity,
            });
        }

        if existing.is_some() {
            self.remove_entry(key);
            #[cfg(feature = "metrics")]
            self.metrics.record_set_replaced();
        } else {
            #[cfg(feature = "metrics")]
            self.metrics.record_set_new();
        }

        let free = self.capacity - self.size;
        if needed > free {
            self.evict(needed - free);
        }

        let id = self.index.insert(INITIAL_SCORE, key.to_owned(), Arc::from(value));
        self.map.insert(key.to_owned(), id);
        self.size += needed;
        Ok(())
    }

    /// Returns the value under `key` and raises its score by one.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NotFound`] if `key` is absent.
    pub fn get(&mut self, key: &str) -> Result<Arc<[u8]>, CacheError> {
        let Some(&id) = self.map.get(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return Err(CacheError::not_found(key));
        };
        let Some((score, instant, value)) = self
            .index
            .entry(id)
            .map(|entry| (entry.score, entry.instant, Arc::clone(entry.value)))
        else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return Err(CacheError::not_found(key));
        };

        if let Some(moved) = self.index.update(score, key, instant, score.saturating_add(1))
            && moved != id
            && let Some(slot) = self.map.get_mut(key)
        {
            *slot = moved;
        }

        #[cfg(feature = "metrics")]
        {
            self.metrics.record_get_hit();
            self.metrics.record_promotion();
        }
        Ok(value)
    }

    /// Removes `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NotFound`] if `key` is absent.
    pub fn del(&mut self, key: &str) -> Result<(), CacheError> {
        match self.remove_entry(key) {
            Some(_) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_del_hit();
                Ok(())
            },
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_del_miss();
                Err(CacheError::not_found(key))
            },
        }
    }

    /// Returns the number of live keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the total bytes of stored values.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the byte budget.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if `key` is present. Does not touch its score.
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Returns the access score of `key` without changing it.
    pub fn frequency(&self, key: &str) -> Option<i64> {
        let id = self.map.get(key)?;
        self.index.entry(*id).map(|entry| entry.score)
    }

    /// Returns the keys from least to most frequently used.
    pub fn keys_by_frequency(&self) -> Vec<String> {
        self.index
            .iter()
            .map(|(_, entry)| entry.key.clone())
            .collect()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
        self.index.clear();
        self.map.clear();
        self.size = 0;
    }

    /// Verifies size and cardinality accounting and the index invariants.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.index.check_invariants()?;

        if self.map.len() != self.index.len() {
            return Err(InvariantError::new(format!(
                "map holds {} keys but index holds {} nodes",
                self.map.len(),
                self.index.len()
            )));
        }

        let mut total = 0usize;
        for (key, id) in &self.map {
            let entry = self.index.entry(*id).ok_or_else(|| {
                InvariantError::new(format!("key {:?} maps to stale SlotId {:?}", key, id))
            })?;
            if entry.key != key {
                return Err(InvariantError::new(format!(
                    "key {:?} maps to node keyed {:?}",
                    key, entry.key
                )));
            }
            total += entry.value.len();
        }

        if total != self.size {
            return Err(InvariantError::new(format!(
                "size is {} but stored values total {}",
                self.size, total
            )));
        }
        if self.size > self.capacity {
            return Err(InvariantError::new(format!(
                "size {} exceeds capacity {}",
                self.size, self.capacity
            )));
        }
        Ok(())
    }

    /// Drops `key` from the map and the index; returns the freed bytes.
    fn remove_entry(&mut self, key: &str) -> Option<usize> {
        let id = *self.map.get(key)?;
        let (score, instant, bytes) = self
            .index
            .entry(id)
            .map(|entry| (entry.score, entry.instant, entry.value.len()))?;
        if !self.index.delete(score, key, instant) {
            return None;
        }
        self.map.remove(key);
        self.size -= bytes;
        Some(bytes)
    }

    /// Frees at least `shortfall` bytes, starting from the head.
    fn evict(&mut self, shortfall: usize) {
        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        let mut victims = Vec::new();
        let mut remaining = shortfall;
        let mut cursor = self.index.head();
        while remaining > 0
            && let Some(id) = cursor
            && let Some(entry) = self.index.entry(id)
        {
            remaining = remaining.saturating_sub(entry.value.len());
            victims.push(entry.key.clone());
            cursor = self.index.next(id);
        }

        let mut freed = 0;
        for key in &victims {
            if let Some(bytes) = self.remove_entry(key) {
                freed += bytes;
                #[cfg(feature = "metrics")]
                self.metrics.record_evicted_entry(bytes);
            }
        }
        tracing::debug!(
            shortfall,
            freed,
            evicted = victims.len(),
            "evicted least frequently used entries"
        );
    }
}

#[cfg(feature = "metrics")]
impl MetricsSnapshotProvider<ByteLfuMetricsSnapshot> for ByteLfuCore {
    fn snapshot(&self) -> ByteLfuMetricsSnapshot {
        self.metrics
            .snapshot_with(self.map.len(), self.size, self.capacity)
    }
}

impl fmt::Debug for ByteLfuCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteLfuCore")
            .field("len", &self.map.len())
            .field("size", &self.size)
            .field("capacity", &self.capacity)
            .field("level", &self.index.level())
            .finish_non_exhaustive()
    }
}

/// Thread-safe byte-bounded LFU cache.
///
/// Clones share the same underlying cache.
#[derive(Clone)]
pub struct ByteLfuCache {
    inner: Arc<Mutex<ByteLfuCore>>,
}

impl ByteLfuCache {
    /// Creates an empty cache holding at most `capacity` bytes of values.
    ///
    /// # Example
    ///
    /// ```
    /// use strcache::ByteLfuCache;
    ///
    /// let cache = ByteLfuCache::new(1024);
    /// assert_eq!(cache.capacity(), 1024);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self::from_core(ByteLfuCore::new(capacity))
    }

    /// Creates an empty cache sized with [`ByteSize`] units.
    ///
    /// ```
    /// use strcache::{ByteLfuCache, ByteSize};
    ///
    /// let cache = ByteLfuCache::with_byte_size(10 * ByteSize::KB);
    /// assert_eq!(cache.capacity(), 10 * 1024);
    /// ```
    pub fn with_byte_size(capacity: ByteSize) -> Self {
        Self::from_core(ByteLfuCore::with_byte_size(capacity))
    }

    pub(crate) fn from_core(core: ByteLfuCore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(core)),
        }
    }

    /// See [`ByteLfuCore::set`].
    pub fn set(&self, key: &str, value: impl AsRef<[u8]>) -> Result<(), CacheError> {
        self.inner.lock().set(key, value.as_ref())
    }

    /// See [`ByteLfuCore::get`].
    pub fn get(&self, key: &str) -> Result<Arc<[u8]>, CacheError> {
        self.inner.lock().get(key)
    }

    /// See [`ByteLfuCore::del`].
    pub fn del(&self, key: &str) -> Result<(), CacheError> {
        self.inner.lock().del(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn size(&self) -> usize {
        self.inner.lock().size()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn frequency(&self, key: &str) -> Option<i64> {
        self.inner.lock().frequency(key)
    }

    pub fn keys_by_frequency(&self) -> Vec<String> {
        self.inner.lock().keys_by_frequency()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.lock().check_invariants()
    }

    /// Runs `f` with exclusive access to the underlying core.
    pub fn with_core<R>(&self, f: impl FnOnce(&mut ByteLfuCore) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

#[cfg(feature = "metrics")]
impl MetricsSnapshotProvider<ByteLfuMetricsSnapshot> for ByteLfuCache {
    fn snapshot(&self) -> ByteLfuMetricsSnapshot {
        self.inner.lock().snapshot()
    }
}

impl fmt::Debug for ByteLfuCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.lock();
        f.debug_struct("ByteLfuCache")
            .field("len", &core.len())
            .field("size", &core.size())
            .field("capacity", &core.capacity())
            .finish_non_exhaustive()
    }
}
