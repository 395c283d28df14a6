//! Bounded in-memory response cache with TTL expiry and hit-count eviction.
//!
//! One mutex guards the whole map. `get` takes it too, since a hit bumps the
//! entry's hit counter.

use super::key::CacheKey;
use routewise_core::{CacheConfig, IgnoreLock as _, Priority, RouteResult, TaskCategory};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Number of categories reported in [`CacheStats::top_categories`].
const TOP_CATEGORIES: usize = 5;

/// A cached route result with bookkeeping.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    pub result: RouteResult,
    pub created_at: Instant,
    pub hit_count: u64,
    pub task_category: TaskCategory,
    /// Normalized input the key was derived from; guards against hash collisions
    pub fingerprint: String,
    /// Insertion order, for entries created within the same clock tick
    sequence: u64,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    next_sequence: u64,
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    /// Number of entries in the cache
    pub size: usize,
    /// Capacity bound
    pub max_size: usize,
    /// Sum of hit counts over live entries
    pub total_hits: u64,
    /// Average hits per live entry; zero when empty
    pub hit_rate: f64,
    /// Most common categories by entry count, descending
    pub top_categories: Vec<(TaskCategory, usize)>,
}

/// A preloaded query, as accepted by [`ResponseCache::preload`].
#[derive(Debug, Clone)]
pub struct PreloadEntry {
    pub input: String,
    pub category: TaskCategory,
    pub priority: Priority,
    pub result: RouteResult,
}

/// Bounded, time-limited map from request fingerprint to route result.
pub struct ResponseCache {
    state: Mutex<CacheState>,
    enabled: bool,
    max_size: usize,
    ttl: Duration,
}

impl ResponseCache {
    /// Creates an enabled cache. A `max_size` of zero is raised to one.
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            enabled: true,
            max_size: max_size.max(1),
            ttl,
        }
    }

    /// Creates a cache from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(
            config.max_size,
            Duration::from_secs(config.ttl_minutes.saturating_mul(60)),
        )
        .with_enabled(config.enabled)
    }

    /// When disabled, `get` always misses and `put` stores nothing.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    pub const fn max_size(&self) -> usize {
        self.max_size
    }

    /// Looks up a result, counting a hit. Expired entries are removed and reported as a miss.
    pub fn get(
        &self,
        input: &str,
        category: TaskCategory,
        priority: Priority,
    ) -> Option<RouteResult> {
        if !self.enabled {
            return None;
        }

        let cache_key = CacheKey::new(input, category, priority);
        let mut state = self.state.lock_ignore_poison();

        let entry = state.entries.get_mut(&cache_key.key)?;
        if entry.is_expired(self.ttl) {
            state.entries.remove(&cache_key.key);
            drop(state);
            tracing::debug!(key = %cache_key.key, "cache entry expired");
            return None;
        }
        if entry.fingerprint != cache_key.fingerprint {
            tracing::debug!(key = %cache_key.key, "cache key collision, treating as miss");
            return None;
        }

        entry.hit_count += 1;
        let hits = entry.hit_count;
        let result = entry.result.clone();
        drop(state);

        tracing::debug!(key = %cache_key.key, hits, "cache hit");
        Some(result)
    }

    /// Stores a result, evicting one entry first when a new key would exceed capacity.
    ///
    /// Replacing an existing key resets its hit count and age.
    pub fn put(
        &self,
        input: &str,
        category: TaskCategory,
        priority: Priority,
        result: RouteResult,
    ) {
        if !self.enabled {
            return;
        }

        let cache_key = CacheKey::new(input, category, priority);
        let mut state = self.state.lock_ignore_poison();

        if !state.entries.contains_key(&cache_key.key) && state.entries.len() >= self.max_size {
            Self::evict_one(&mut state);
        }

        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.entries.insert(
            cache_key.key.clone(),
            CacheEntry {
                key: cache_key.key.clone(),
                result,
                created_at: Instant::now(),
                hit_count: 0,
                task_category: category,
                fingerprint: cache_key.fingerprint,
                sequence,
            },
        );
        let size = state.entries.len();
        drop(state);

        tracing::debug!(key = %cache_key.key, size, "cache set");
    }

    /// Removes the entry with the fewest hits, oldest first on ties.
    fn evict_one(state: &mut CacheState) {
        let victim = state
            .entries
            .values()
            .min_by_key(|entry| (entry.hit_count, entry.created_at, entry.sequence))
            .map(|entry| entry.key.clone());

        if let Some(key) = victim {
            state.entries.remove(&key);
            tracing::debug!(%key, "cache eviction");
        }
    }

    /// Inserts each entry through [`Self::put`].
    pub fn preload(&self, entries: impl IntoIterator<Item = PreloadEntry>) -> usize {
        let mut count = 0;
        for entry in entries {
            self.put(&entry.input, entry.category, entry.priority, entry.result);
            count += 1;
        }
        tracing::info!("Preloaded {count} cache entries");
        count
    }

    /// Hit count of the entry for this request, if present and live.
    pub fn hit_count(&self, input: &str, category: TaskCategory, priority: Priority) -> Option<u64> {
        let cache_key = CacheKey::new(input, category, priority);
        let state = self.state.lock_ignore_poison();
        state
            .entries
            .get(&cache_key.key)
            .filter(|entry| !entry.is_expired(self.ttl))
            .map(|entry| entry.hit_count)
    }

    /// Removes every expired entry; returns how many were dropped.
    pub fn remove_expired(&self) -> usize {
        let ttl = self.ttl;
        let mut state = self.state.lock_ignore_poison();
        let before = state.entries.len();
        state.entries.retain(|_, entry| !entry.is_expired(ttl));
        let removed = before - state.entries.len();
        drop(state);

        if removed > 0 {
            tracing::info!("Cache sweep removed {removed} expired entries");
        }
        removed
    }

    /// Removes every entry of `category`; returns how many were dropped.
    pub fn invalidate_category(&self, category: TaskCategory) -> usize {
        let mut state = self.state.lock_ignore_poison();
        let before = state.entries.len();
        state
            .entries
            .retain(|_, entry| entry.task_category != category);
        let removed = before - state.entries.len();
        drop(state);

        tracing::info!("Invalidated {removed} cache entries for {category}");
        removed
    }

    /// Clears all entries from the cache
    pub fn clear(&self) {
        self.state.lock_ignore_poison().entries.clear();
        tracing::info!("Cache cleared");
    }

    pub fn len(&self) -> usize {
        self.state.lock_ignore_poison().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns cache statistics over every stored entry.
    ///
    /// Expired entries count until a lookup or sweep removes them, so
    /// `size` always equals [`Self::len`].
    pub fn stats(&self) -> CacheStats {
        let (size, total_hits, counts) = {
            let state = self.state.lock_ignore_poison();
            let mut total_hits = 0_u64;
            let mut counts: HashMap<TaskCategory, usize> = HashMap::new();
            for entry in state.entries.values() {
                total_hits += entry.hit_count;
                *counts.entry(entry.task_category).or_default() += 1;
            }
            (state.entries.len(), total_hits, counts)
        };

        let mut top_categories: Vec<(TaskCategory, usize)> = counts.into_iter().collect();
        top_categories.sort_by(|left, right| right.1.cmp(&left.1).then(left.0.cmp(&right.0)));
        top_categories.truncate(TOP_CATEGORIES);

        CacheStats {
            size,
            max_size: self.max_size,
            total_hits,
            hit_rate: if size == 0 {
                0.0
            } else {
                total_hits as f64 / size as f64
            },
            top_categories,
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}
