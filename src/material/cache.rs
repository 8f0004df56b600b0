// SPDX-License-Identifier: MPL-2.0
//! LRU cache of decoded textures with generation-stamped loads.
//!
//! Each synthesis pass opens a new load generation via
//! [`TextureCache::begin_generation`] and asks [`TextureCache::plan`] which
//! of its textures still need reading. Completed loads are stored by
//! [`TextureKey`], so a load that finishes after a newer pass can only
//! fill the cache for that key; it never changes what a newer material
//! samples. Only failures from the current generation are reported.

use super::texture::{TextureImage, TextureKey};
use crate::error::Error;
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;

/// Default number of decoded textures kept in memory (all sets fit).
pub const DEFAULT_CAPACITY: usize = 16;

/// Minimum capacity: one body set and the metal set, three channels each.
pub const MIN_CAPACITY: usize = 6;

/// A texture read the caller should start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    pub key: TextureKey,
    pub generation: u64,
}

/// What happened to a completed load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The image is now cached. `current` is false for a superseded load.
    Stored { current: bool },
    /// The load failed. `report` is true when the failure belongs to the
    /// current generation and should be shown to the user.
    Failed { error: Error, report: bool },
}

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Decoded texture cache.
#[derive(Debug)]
pub struct TextureCache {
    entries: LruCache<TextureKey, TextureImage>,
    /// Keys being read, with the generation that requested them.
    in_flight: HashMap<TextureKey, u64>,
    generation: u64,
    stats: CacheStats,
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl TextureCache {
    /// Creates a cache; capacities below [`MIN_CAPACITY`] are raised to it.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(MIN_CAPACITY)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            in_flight: HashMap::new(),
            generation: 0,
            stats: CacheStats::default(),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Starts a new load generation and returns its number.
    pub fn begin_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Returns the loads needed for `keys` in the current generation.
    ///
    /// Cached keys are touched so they survive eviction; keys already being
    /// read are re-stamped with the current generation instead of being
    /// requested twice.
    pub fn plan(&mut self, keys: impl IntoIterator<Item = TextureKey>) -> Vec<LoadRequest> {
        let generation = self.generation;
        let mut requests = Vec::new();
        for key in keys {
            if self.entries.get(&key).is_some() {
                self.stats.hits += 1;
                continue;
            }
            self.stats.misses += 1;
            match self.in_flight.insert(key, generation) {
                Some(_) => {}
                None => requests.push(LoadRequest { key, generation }),
            }
        }
        requests
    }

    /// Records a finished load.
    pub fn complete(
        &mut self,
        generation: u64,
        key: TextureKey,
        result: Result<TextureImage, Error>,
    ) -> LoadOutcome {
        // The latest stamp wins: a key re-requested by a newer pass counts
        // as current even if the read was started earlier.
        let stamp = self.in_flight.remove(&key).unwrap_or(generation).max(generation);
        let current = stamp == self.generation;

        match result {
            Ok(image) => {
                if let Some((evicted, _)) = self.entries.push(key, image) {
                    if evicted != key {
                        self.stats.evictions += 1;
                        tracing::debug!(texture = %evicted, "evicted texture from cache");
                    }
                }
                LoadOutcome::Stored { current }
            }
            Err(error) => LoadOutcome::Failed {
                error,
                report: current,
            },
        }
    }

    /// Returns a cached image and marks it recently used.
    pub fn get(&mut self, key: &TextureKey) -> Option<&TextureImage> {
        self.entries.get(key)
    }

    /// Returns a cached image without touching recency.
    #[must_use]
    pub fn peek(&self, key: &TextureKey) -> Option<&TextureImage> {
        self.entries.peek(key)
    }

    #[must_use]
    pub fn is_loading(&self, key: &TextureKey) -> bool {
        self.in_flight.contains_key(key)
    }

    /// Number of reads started but not completed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::texture::{TextureChannel, TextureSet};

    fn key(set: TextureSet) -> TextureKey {
        TextureKey::new(set, TextureChannel::BaseColor)
    }

    fn image() -> TextureImage {
        TextureImage::solid([255, 255, 255, 255])
    }

    #[test]
    fn plan_requests_only_missing_keys() {
        let mut cache = TextureCache::default();
        let generation = cache.begin_generation();
        let requests = cache.plan([key(TextureSet::Denim), key(TextureSet::Metall)]);
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.generation == generation));

        cache.complete(generation, key(TextureSet::Denim), Ok(image()));
        cache.begin_generation();
        let requests = cache.plan([key(TextureSet::Denim), key(TextureSet::Fabric)]);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].key, key(TextureSet::Fabric));
    }

    #[test]
    fn in_flight_keys_are_not_requested_twice() {
        let mut cache = TextureCache::default();
        cache.begin_generation();
        assert_eq!(cache.plan([key(TextureSet::Denim)]).len(), 1);
        cache.begin_generation();
        assert!(cache.plan([key(TextureSet::Denim)]).is_empty());
        assert!(cache.is_loading(&key(TextureSet::Denim)));
    }

    #[test]
    fn superseded_load_is_stored_but_not_current() {
        let mut cache = TextureCache::default();
        let first = cache.begin_generation();
        cache.plan([key(TextureSet::Leather)]);
        cache.begin_generation();
        cache.plan([key(TextureSet::Denim)]);

        let outcome = cache.complete(first, key(TextureSet::Leather), Ok(image()));
        assert_eq!(outcome, LoadOutcome::Stored { current: false });
        assert!(cache.peek(&key(TextureSet::Leather)).is_some());
    }

    #[test]
    fn re_requested_key_counts_as_current() {
        let mut cache = TextureCache::default();
        let first = cache.begin_generation();
        cache.plan([key(TextureSet::Denim)]);
        cache.begin_generation();
        cache.plan([key(TextureSet::Denim)]);

        let outcome = cache.complete(first, key(TextureSet::Denim), Ok(image()));
        assert_eq!(outcome, LoadOutcome::Stored { current: true });
    }

    #[test]
    fn stale_failures_are_not_reported() {
        let mut cache = TextureCache::default();
        let first = cache.begin_generation();
        cache.plan([key(TextureSet::Fabric)]);
        cache.begin_generation();

        match cache.complete(first, key(TextureSet::Fabric), Err(Error::Texture("gone".into()))) {
            LoadOutcome::Failed { report, .. } => assert!(!report),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(cache.pending(), 0);
    }

    #[test]
    fn current_failures_are_reported_and_retried_on_next_plan() {
        let mut cache = TextureCache::default();
        let generation = cache.begin_generation();
        cache.plan([key(TextureSet::Fabric)]);
        match cache.complete(generation, key(TextureSet::Fabric), Err(Error::Texture("gone".into()))) {
            LoadOutcome::Failed { report, .. } => assert!(report),
            other => panic!("expected failure, got {:?}", other),
        }
        cache.begin_generation();
        assert_eq!(cache.plan([key(TextureSet::Fabric)]).len(), 1);
    }

    #[test]
    fn capacity_is_raised_to_minimum() {
        assert_eq!(TextureCache::new(0).capacity(), MIN_CAPACITY);
        assert_eq!(TextureCache::new(32).capacity(), 32);
    }

    #[test]
    fn least_recently_used_entry_is_evicted() {
        let mut cache = TextureCache::new(MIN_CAPACITY);
        let generation = cache.begin_generation();
        let keys: Vec<TextureKey> = [TextureSet::Denim, TextureSet::Fabric, TextureSet::Leather]
            .into_iter()
            .flat_map(TextureSet::keys)
            .collect();
        for key in &keys {
            cache.complete(generation, *key, Ok(image()));
        }
        assert_eq!(cache.len(), MIN_CAPACITY);
        assert!(cache.peek(&keys[0]).is_none());
        assert!(cache.peek(&keys[8]).is_some());
        assert_eq!(cache.stats().evictions, 3);
    }
}
