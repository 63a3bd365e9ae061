//! Score-ordered skip list backed by `SlotArena`.
//!
//! Entries are ordered by `(score, instant)`: lower score first, and for equal
//! scores the older instant first. Instants come from a [`UniqueInstant`]
//! owned by the list, so insertion order breaks score ties.
//!
//! ## Architecture
//!
//! ```text
//!   header (max_level slots)
//!   L2 ─────────────────────────► [B] ───────────────────────► nil
//!   L1 ──────────► [A] ─────────► [B] ──────────► [D] ───────► nil
//!   L0 ──► [X] ──► [A] ──► [C] ──► [B] ──► [E] ──► [D] ──────► nil
//!           ◄──────  back references on L0 only  ──────►       ▲
//!                                                             tail
//!
//!   arena (SlotArena<Node<K, V>>)
//!   Node { key, value, score, instant, back: Option<SlotId>,
//!          forward: Vec<Option<SlotId>> /* one per level */ }
//! ```
//!
//! A predecessor of `None` stands for the header sentinel.
//!
//! ## Operations
//!
//! | Method                    | Cost          | Notes                                  |
//! |---------------------------|---------------|----------------------------------------|
//! | `insert`                  | O(log n) exp. | assigns a fresh instant                |
//! | `delete`                  | O(log n) exp. | exact `(score, key, instant)` match    |
//! | `update`                  | O(log n) exp. | in place when the L0 position holds    |
//! | `head`/`tail`/`next`/`prev` | O(1)        |                                        |
//! | `first_in_range`/`last_in_range` | O(log n) exp. | by score                        |
//! | `delete_range_by_score`   | O(log n + k)  |                                        |
//!
//! Node heights come from a seeded `StdRng`, so a list built with the same
//! [`SkipListConfig`] and the same operation sequence has the same shape.

use std::borrow::Borrow;
use std::fmt;
use std::ops::{Bound, RangeBounds};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ds::instant::UniqueInstant;
use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::{ConfigError, InvariantError};

pub const DEFAULT_MAX_LEVEL: usize = 32;
pub const DEFAULT_PROBABILITY: f64 = 0.25;
pub const DEFAULT_SEED: u64 = 0;

/// Construction parameters for [`ScoreSkipList`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkipListConfig {
    /// Maximum tower height. Must be at least 1.
    pub max_level: usize,
    /// Chance of growing a tower by one more level. Must be in `(0, 1)`.
    pub probability: f64,
    /// Seed for the height generator.
    pub seed: u64,
}

impl Default for SkipListConfig {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            probability: DEFAULT_PROBABILITY,
            seed: DEFAULT_SEED,
        }
    }
}

impl SkipListConfig {
    /// Checks the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `max_level` is zero or `probability` is not
    /// a finite value strictly between 0 and 1.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_level == 0 {
            return Err(ConfigError::new("max_level must be greater than zero"));
        }
        if !self.probability.is_finite() || self.probability <= 0.0 || self.probability >= 1.0 {
            return Err(ConfigError::new(format!(
                "probability must be in (0.0, 1.0), got {}",
                self.probability
            )));
        }
        Ok(())
    }
}

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    score: i64,
    instant: i64,
    back: Option<SlotId>,
    forward: Vec<Option<SlotId>>,
}

/// Borrowed view of a live node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a, K, V> {
    pub key: &'a K,
    pub value: &'a V,
    pub score: i64,
    pub instant: i64,
}

impl<K, V> Node<K, V> {
    fn view(&self) -> Entry<'_, K, V> {
        Entry {
            key: &self.key,
            value: &self.value,
            score: self.score,
            instant: self.instant,
        }
    }
}

/// Skip list ordered by `(score, instant)`.
#[derive(Debug)]
pub struct ScoreSkipList<K, V> {
    arena: SlotArena<Node<K, V>>,
    header: Vec<Option<SlotId>>,
    tail: Option<SlotId>,
    level: usize,
    max_level: usize,
    probability: f64,
    rng: StdRng,
    clock: UniqueInstant,
}

impl<K, V> ScoreSkipList<K, V> {
    /// Creates an empty list with [`SkipListConfig::default`].
    pub fn new() -> Self {
        Self::from_valid_config(SkipListConfig::default())
    }

    /// Creates an empty list from explicit parameters.
    ///
    /// # Panics
    ///
    /// Panics if the parameters are invalid. See [`try_with_config`](Self::try_with_config).
    pub fn with_params(max_level: usize, probability: f64, seed: u64) -> Self {
        Self::with_config(SkipListConfig {
            max_level,
            probability,
            seed,
        })
    }

    /// Creates an empty list from `config`.
    ///
    /// # Panics
    ///
    /// Panics if `config` is invalid. See [`try_with_config`](Self::try_with_config).
    pub fn with_config(config: SkipListConfig) -> Self {
        match Self::try_with_config(config) {
            Ok(list) => list,
            Err(e) => panic!("{}", e),
        }
    }

    /// Creates an empty list from `config`, returning an error on invalid parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when [`SkipListConfig::validate`] fails.
    pub fn try_with_config(config: SkipListConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: SkipListConfig) -> Self {
        Self {
            arena: SlotArena::new(),
            header: vec![None; config.max_level],
            tail: None,
            level: 1,
            max_level: config.max_level,
            probability: config.probability,
            rng: StdRng::seed_from_u64(config.seed),
            clock: UniqueInstant::new(),
        }
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns the highest populated level (at least 1).
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// Returns the minimum node.
    pub fn head(&self) -> Option<SlotId> {
        self.header[0]
    }

    /// Returns the maximum node.
    pub fn tail(&self) -> Option<SlotId> {
        self.tail
    }

    /// Returns the node after `id` in ascending order.
    pub fn next(&self, id: SlotId) -> Option<SlotId> {
        self.forward(Some(id), 0)
    }

    /// Returns the node before `id` in ascending order.
    pub fn prev(&self, id: SlotId) -> Option<SlotId> {
        self.arena.get(id).and_then(|node| node.back)
    }

    /// Returns a view of the node `id`, or `None` if the handle is stale.
    pub fn entry(&self, id: SlotId) -> Option<Entry<'_, K, V>> {
        self.arena.get(id).map(Node::view)
    }

    /// Iterates nodes from head to tail.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            current: self.head(),
            remaining: self.len(),
        }
    }

    /// Removes every node. Configuration and RNG state are kept.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.header.fill(None);
        self.tail = None;
        self.level = 1;
    }

    /// Inserts a node with a fresh instant and returns its handle.
    pub fn insert(&mut self, score: i64, key: K, value: V) -> SlotId {
        let instant = self.clock.now();
        self.link(score, key, value, instant)
    }

    /// Returns the first node (lowest order) whose score lies in `range`.
    pub fn first_in_range<R: RangeBounds<i64>>(&self, range: R) -> Option<SlotId> {
        let mut x = None;
        for lvl in (0..self.level).rev() {
            while let Some(next) = self.forward(x, lvl)
                && self.score_of(next).is_some_and(|s| below_start(&range, s))
            {
                x = Some(next);
            }
        }
        let candidate = self.forward(x, 0)?;
        let score = self.score_of(candidate)?;
        (!past_end(&range, score)).then_some(candidate)
    }

    /// Returns the last node (highest order) whose score lies in `range`.
    pub fn last_in_range<R: RangeBounds<i64>>(&self, range: R) -> Option<SlotId> {
        let mut x = None;
        for lvl in (0..self.level).rev() {
            while let Some(next) = self.forward(x, lvl)
                && self.score_of(next).is_some_and(|s| !past_end(&range, s))
            {
                x = Some(next);
            }
        }
        let candidate = x?;
        let score = self.score_of(candidate)?;
        (!below_start(&range, score)).then_some(candidate)
    }

    /// Removes every node whose score lies in `range` and returns how many
    /// were removed.
    pub fn delete_range_by_score<R: RangeBounds<i64>>(&mut self, range: R) -> usize {
        let mut update = vec![None; self.max_level];
        let mut x = None;
        for lvl in (0..self.level).rev() {
            while let Some(next) = self.forward(x, lvl)
                && self.score_of(next).is_some_and(|s| below_start(&range, s))
            {
                x = Some(next);
            }
            update[lvl] = x;
        }

        let mut removed = 0;
        let mut cursor = self.forward(x, 0);
        while let Some(id) = cursor
            && self.score_of(id).is_some_and(|s| !past_end(&range, s))
        {
            cursor = self.next(id);
            if self.detach(id, &update).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Verifies the ordering, linkage, tower and length invariants.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.level == 0 || self.level > self.max_level {
            return Err(InvariantError::new(format!(
                "level {} outside 1..={}",
                self.level, self.max_level
            )));
        }
        if self.level > 1 && self.header[self.level - 1].is_none() {
            return Err(InvariantError::new(format!(
                "top level {} is empty",
                self.level - 1
            )));
        }
        if let Some(lvl) = (self.level..self.max_level).find(|&lvl| self.header[lvl].is_some()) {
            return Err(InvariantError::new(format!(
                "header slot {} populated above level {}",
                lvl, self.level
            )));
        }

        // Level 0: full chain, back references, ordering.
        let mut per_level = vec![0usize; self.level];
        let mut count = 0;
        let mut prev: Option<SlotId> = None;
        let mut cursor = self.header[0];
        while let Some(id) = cursor {
            count += 1;
            if count > self.arena.len() {
                return Err(InvariantError::new("level 0 chain longer than arena"));
            }
            let node = self
                .arena
                .get(id)
                .ok_or_else(|| InvariantError::new(format!("level 0: stale SlotId {:?}", id)))?;
            let height = node.forward.len();
            if height == 0 || height > self.level {
                return Err(InvariantError::new(format!(
                    "node {:?} has height {} with list level {}",
                    id, height, self.level
                )));
            }
            for slot in per_level.iter_mut().take(height) {
                *slot += 1;
            }
            if node.back != prev {
                return Err(InvariantError::new(format!(
                    "node {:?} back reference {:?}, expected {:?}",
                    id, node.back, prev
                )));
            }
            if let Some(prev_id) = prev
                && let Some(prev_node) = self.arena.get(prev_id)
                && (prev_node.score, prev_node.instant) > (node.score, node.instant)
            {
                return Err(InvariantError::new(format!(
                    "level 0 out of order: ({}, {}) before ({}, {})",
                    prev_node.score, prev_node.instant, node.score, node.instant
                )));
            }
            prev = Some(id);
            cursor = node.forward[0];
        }
        if self.tail != prev {
            return Err(InvariantError::new(format!(
                "tail {:?} but last node is {:?}",
                self.tail, prev
            )));
        }
        if count != self.arena.len() {
            return Err(InvariantError::new(format!(
                "level 0 holds {} nodes but arena holds {}",
                count,
                self.arena.len()
            )));
        }

        // Upper levels: ordered subsequences containing exactly the tall nodes.
        for (lvl, &expected) in per_level.iter().enumerate().skip(1) {
            let mut steps = 0;
            let mut last: Option<(i64, i64)> = None;
            let mut cursor = self.header[lvl];
            while let Some(id) = cursor {
                steps += 1;
                if steps > expected {
                    return Err(InvariantError::new(format!(
                        "level {} links more than {} nodes",
                        lvl, expected
                    )));
                }
                let node = self.arena.get(id).ok_or_else(|| {
                    InvariantError::new(format!("level {}: stale SlotId {:?}", lvl, id))
                })?;
                if node.forward.len() <= lvl {
                    return Err(InvariantError::new(format!(
                        "node {:?} linked on level {} with height {}",
                        id,
                        lvl,
                        node.forward.len()
                    )));
                }
                let key = (node.score, node.instant);
                if last.is_some_and(|l| l > key) {
                    return Err(InvariantError::new(format!("level {} out of order", lvl)));
                }
                last = Some(key);
                cursor = node.forward[lvl];
            }
            if steps != expected {
                return Err(InvariantError::new(format!(
                    "level {} links {} nodes, expected {}",
                    lvl, steps, expected
                )));
            }
        }

        Ok(())
    }

    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.max_level && self.rng.gen_bool(self.probability) {
            level += 1;
        }
        level
    }

    fn score_of(&self, id: SlotId) -> Option<i64> {
        self.arena.get(id).map(|node| node.score)
    }

    fn forward(&self, from: Option<SlotId>, lvl: usize) -> Option<SlotId> {
        match from {
            None => self.header[lvl],
            Some(id) => self
                .arena
                .get(id)
                .and_then(|node| node.forward.get(lvl).copied().flatten()),
        }
    }

    fn set_forward(&mut self, from: Option<SlotId>, lvl: usize, to: Option<SlotId>) {
        match from {
            None => self.header[lvl] = to,
            Some(id) => {
                if let Some(node) = self.arena.get_mut(id) {
                    node.forward[lvl] = to;
                }
            },
        }
    }

    fn set_back(&mut self, id: SlotId, back: Option<SlotId>) {
        if let Some(node) = self.arena.get_mut(id) {
            node.back = back;
        }
    }

    // True if `id` orders strictly before `(score, instant)`.
    fn precedes(&self, id: SlotId, score: i64, instant: i64) -> bool {
        self.arena
            .get(id)
            .is_some_and(|node| node.score < score || (node.score == score && node.instant < instant))
    }

    /// Per level, the last node ordering strictly before `(score, instant)`.
    fn find_predecessors(&self, score: i64, instant: i64) -> Vec<Option<SlotId>> {
        let mut update = vec![None; self.max_level];
        let mut x = None;
        for lvl in (0..self.level).rev() {
            while let Some(next) = self.forward(x, lvl)
                && self.precedes(next, score, instant)
            {
                x = Some(next);
            }
            update[lvl] = x;
        }
        update
    }

    fn link(&mut self, score: i64, key: K, value: V, instant: i64) -> SlotId {
        let update = self.find_predecessors(score, instant);
        let height = self.random_level();
        // Slots above the old level already point at the header.
        if height > self.level {
            self.level = height;
        }

        let forward = (0..height).map(|lvl| self.forward(update[lvl], lvl)).collect();
        let id = self.arena.insert(Node {
            key,
            value,
            score,
            instant,
            back: update[0],
            forward,
        });
        for (lvl, pred) in update.iter().enumerate().take(height) {
            self.set_forward(*pred, lvl, Some(id));
        }
        match self.next(id) {
            Some(next) => self.set_back(next, Some(id)),
            None => self.tail = Some(id),
        }
        id
    }

    /// Unsplices `id` given its predecessors and frees its slot.
    fn detach(&mut self, id: SlotId, update: &[Option<SlotId>]) -> Option<Node<K, V>> {
        let (back, height) = {
            let node = self.arena.get(id)?;
            (node.back, node.forward.len())
        };
        for (lvl, pred) in update.iter().enumerate().take(height.min(self.level)) {
            if self.forward(*pred, lvl) == Some(id) {
                let next = self.forward(Some(id), lvl);
                self.set_forward(*pred, lvl, next);
            }
        }
        match self.next(id) {
            Some(next) => self.set_back(next, back),
            None => self.tail = back,
        }
        while self.level > 1 && self.header[self.level - 1].is_none() {
            self.level -= 1;
        }
        self.arena.remove(id)
    }

    /// Finds the node matching `(score, key, instant)` and its predecessors.
    ///
    /// Nodes sharing `(score, instant)` are walked on level 0 until the key
    /// matches; each skipped node becomes the predecessor on its levels.
    fn locate<Q>(&self, score: i64, key: &Q, instant: i64) -> Option<(SlotId, Vec<Option<SlotId>>)>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        let mut update = self.find_predecessors(score, instant);
        let mut cursor = self.forward(update[0], 0);
        while let Some(id) = cursor {
            let node = self.arena.get(id)?;
            if node.score != score || node.instant != instant {
                return None;
            }
            let candidate: &Q = node.key.borrow();
            if candidate == key {
                return Some((id, update));
            }
            for slot in update.iter_mut().take(node.forward.len()) {
                *slot = Some(id);
            }
            cursor = node.forward[0];
        }
        None
    }

    /// Removes the node matching all of `score`, `key` and `instant`.
    ///
    /// Returns `false` without mutating anything if no node matches.
    pub fn delete<Q>(&mut self, score: i64, key: &Q, instant: i64) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        let Some((id, update)) = self.locate(score, key, instant) else {
            return false;
        };
        self.detach(id, &update).is_some()
    }

    /// Moves the node matching `(score, key, instant)` to `new_score`.
    ///
    /// If `new_score` lies strictly between the scores of the node's level-0
    /// neighbours, the node keeps its handle and links and only its score and
    /// instant change. Otherwise it is removed and reinserted with a fresh
    /// instant, and the new handle is returned. Returns `None` without
    /// mutating anything if no node matches.
    pub fn update<Q>(&mut self, score: i64, key: &Q, instant: i64, new_score: i64) -> Option<SlotId>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        let (id, update) = self.locate(score, key, instant)?;
        let (back, next) = {
            let node = self.arena.get(id)?;
            (node.back, node.forward[0])
        };

        let after_prev = back.is_none_or(|p| self.score_of(p).is_some_and(|s| s < new_score));
        let before_next = next.is_none_or(|n| self.score_of(n).is_some_and(|s| s > new_score));
        if after_prev && before_next {
            let now = self.clock.now();
            let node = self.arena.get_mut(id)?;
            node.score = new_score;
            node.instant = now;
            return Some(id);
        }

        tracing::trace!(from = score, to = new_score, "relocating skip list node");
        let node = self.detach(id, &update)?;
        let now = self.clock.now();
        Some(self.link(new_score, node.key, node.value, now))
    }
}

impl<K, V> Default for ScoreSkipList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V> fmt::Display for ScoreSkipList<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for lvl in (0..self.level).rev() {
            write!(f, "L{}:", lvl)?;
            let mut cursor = self.header[lvl];
            while let Some(id) = cursor {
                let Some(node) = self.arena.get(id) else {
                    break;
                };
                write!(
                    f,
                    " [{:?} score={} instant={}] ->",
                    node.key, node.score, node.instant
                )?;
                cursor = node.forward[lvl];
            }
            writeln!(f, " nil")?;
        }
        Ok(())
    }
}

fn below_start<R: RangeBounds<i64>>(range: &R, score: i64) -> bool {
    match range.start_bound() {
        Bound::Included(start) => score < *start,
        Bound::Excluded(start) => score <= *start,
        Bound::Unbounded => false,
    }
}

fn past_end<R: RangeBounds<i64>>(range: &R, score: i64) -> bool {
    match range.end_bound() {
        Bound::Included(end) => score > *end,
        Bound::Excluded(end) => score >= *end,
        Bound::Unbounded => false,
    }
}

/// Ascending iterator over `(SlotId, Entry)`.
pub struct Iter<'a, K, V> {
    list: &'a ScoreSkipList<K, V>,
    current: Option<SlotId>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (SlotId, Entry<'a, K, V>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = node.forward[0];
        self.remaining = self.remaining.saturating_sub(1);
        Some((id, node.view()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> std::iter::FusedIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a ScoreSkipList<K, V> {
    type Item = (SlotId, Entry<'a, K, V>);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
