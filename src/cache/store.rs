//! TTL + tag-index cache store.

use super::types::{CacheConfig, CacheHealth, CacheHealthStatus, CacheStats};
use dashmap::DashMap;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Health thresholds. Deterministic functions of the two inputs so the
/// status is testable via table.
const MEMORY_CRITICAL_PCT: f64 = 90.0;
const MEMORY_WARNING_PCT: f64 = 80.0;
const HIT_RATE_CRITICAL_PCT: f64 = 30.0;
const HIT_RATE_WARNING_PCT: f64 = 50.0;

struct CacheEntry {
    value: Value,
    expires_at: Instant,
    tags: Vec<String>,
    size_bytes: u64,
}

/// Concurrent key/value store with per-entry TTL and tag→keys indices.
///
/// All maps are `DashMap`s and all counters are atomics, so parallel callers
/// never serialize behind a single lock. Invalidation-by-tag detaches the
/// tag's key set in one step and deletes outside any held guard.
///
/// Accepted race: a `set` under a tag that is concurrently being invalidated
/// may or may not survive, depending on whether the index detach happened
/// before or after the set's index append. Either outcome leaves the indices
/// consistent.
pub struct TaggedCache {
    entries: DashMap<String, CacheEntry>,
    tag_index: DashMap<String, HashSet<String>>,
    config: CacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    deletes: AtomicU64,
    approx_bytes: AtomicU64,
    get_nanos: AtomicU64,
}

impl TaggedCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            tag_index: DashMap::new(),
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            sets: AtomicU64::new(0),
            deletes: AtomicU64::new(0),
            approx_bytes: AtomicU64::new(0),
            get_nanos: AtomicU64::new(0),
        }
    }

    /// Stores `value` under `key` with `expiry = now + ttl` and appends the
    /// key to every tag's index. Replacing an existing entry scrubs its old
    /// tags and byte accounting first.
    pub fn set(&self, key: &str, value: Value, ttl: Option<Duration>, tags: &[String]) {
        let ttl = ttl.unwrap_or(self.config.default_ttl);
        // Cheap size estimate; exact accounting is not worth a serialization pass
        let size_bytes = value.to_string().len() as u64;

        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
            tags: tags.to_vec(),
            size_bytes,
        };

        if let Some(old) = self.entries.insert(key.to_string(), entry) {
            self.detach_from_tags(key, &old.tags);
            self.approx_bytes.fetch_sub(old.size_bytes, Ordering::Relaxed);
        }
        self.approx_bytes.fetch_add(size_bytes, Ordering::Relaxed);

        for tag in tags {
            self.tag_index
                .entry(tag.clone())
                .or_default()
                .insert(key.to_string());
        }

        self.sets.fetch_add(1, Ordering::Relaxed);
        tracing::trace!("Cached {} with {} tag(s)", key, tags.len());
    }

    /// Returns the stored value, or `None` for absent and expired keys.
    /// Expired entries are removed on access. Every call counts as a hit or
    /// a miss for health reporting.
    pub fn get(&self, key: &str) -> Option<Value> {
        let started = Instant::now();

        let result = match self.entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(entry) => {
                // Expired: drop the guard before removing
                let tags = entry.tags.clone();
                let size = entry.size_bytes;
                drop(entry);
                self.entries.remove(key);
                self.detach_from_tags(key, &tags);
                self.approx_bytes.fetch_sub(size, Ordering::Relaxed);
                None
            }
            None => None,
        };

        match &result {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        self.get_nanos
            .fetch_add(started.elapsed().as_nanos() as u64, Ordering::Relaxed);

        result
    }

    /// Removes one entry and scrubs its tag-index references.
    pub fn remove(&self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some((_, entry)) => {
                self.detach_from_tags(key, &entry.tags);
                self.approx_bytes
                    .fetch_sub(entry.size_bytes, Ordering::Relaxed);
                self.deletes.fetch_add(1, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// Deletes every key referencing any of `tags`, cascading the removal
    /// through all other tag indices those keys belonged to. Returns the
    /// number of entries removed.
    ///
    /// The tag's key set is detached in a single `remove` (collect), then
    /// keys are deleted one by one (delete) without holding the index guard,
    /// keeping the lock hold bounded.
    pub fn invalidate_by_tags(&self, tags: &[String]) -> usize {
        let mut keys: HashSet<String> = HashSet::new();
        for tag in tags {
            if let Some((_, tagged_keys)) = self.tag_index.remove(tag) {
                keys.extend(tagged_keys);
            }
        }

        let mut removed = 0;
        for key in &keys {
            if self.remove(key) {
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::debug!("Invalidated {} entries via {} tag(s)", removed, tags.len());
        }
        removed
    }

    /// Drops every entry and index. Counters are preserved.
    pub fn clear(&self) {
        let dropped = self.entries.len() as u64;
        self.entries.clear();
        self.tag_index.clear();
        self.approx_bytes.store(0, Ordering::Relaxed);
        self.deletes.fetch_add(dropped, Ordering::Relaxed);
    }

    /// Snapshot of the counters. Sweeps expired entries first so entry and
    /// byte figures reflect live data, not keys nobody re-read since expiry.
    pub fn stats(&self) -> CacheStats {
        self.evict_expired();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            entries: self.entries.len(),
            approx_bytes: self.approx_bytes.load(Ordering::Relaxed),
        }
    }

    /// Deterministic health classification from memory usage and hit rate.
    pub fn get_health(&self) -> CacheHealth {
        let stats = self.stats();
        let hit_rate = stats.hit_rate();
        let memory_usage_percent =
            stats.approx_bytes as f64 / self.config.max_bytes as f64 * 100.0;

        let status = health_status(memory_usage_percent, hit_rate);

        let mut recommendations = Vec::new();
        if memory_usage_percent > MEMORY_WARNING_PCT {
            recommendations.push(
                "Memory usage is high: lower TTLs or raise the byte budget".to_string(),
            );
        }
        if hit_rate < HIT_RATE_WARNING_PCT {
            recommendations
                .push("Hit rate is low: review key construction and TTLs".to_string());
        }

        let reads = stats.hits + stats.misses;
        let response_time_ms = if reads == 0 {
            0.0
        } else {
            self.get_nanos.load(Ordering::Relaxed) as f64 / reads as f64 / 1_000_000.0
        };

        CacheHealth {
            status,
            hit_rate,
            memory_usage_percent,
            response_time_ms,
            recommendations,
        }
    }

    /// Removes every entry past its expiry. Keys are collected first, then
    /// removed under a re-check so a concurrent `set` of a fresh value under
    /// the same key is never dropped.
    fn evict_expired(&self) {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| entry.value().expires_at <= now)
            .map(|entry| entry.key().clone())
            .collect();

        for key in expired {
            if let Some((_, entry)) = self
                .entries
                .remove_if(&key, |_, e| e.expires_at <= Instant::now())
            {
                self.detach_from_tags(&key, &entry.tags);
                self.approx_bytes
                    .fetch_sub(entry.size_bytes, Ordering::Relaxed);
                self.deletes.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn detach_from_tags(&self, key: &str, tags: &[String]) {
        for tag in tags {
            if let Some(mut tagged_keys) = self.tag_index.get_mut(tag) {
                tagged_keys.remove(key);
                if tagged_keys.is_empty() {
                    drop(tagged_keys);
                    self.tag_index
                        .remove_if(tag, |_, tagged_keys| tagged_keys.is_empty());
                }
            }
        }
    }
}

impl Default for TaggedCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

/// Threshold table: usage > 90% or hit rate < 30% is Critical; usage > 80%
/// or hit rate < 50% is Warning; anything else is Healthy.
pub fn health_status(memory_usage_percent: f64, hit_rate: f64) -> CacheHealthStatus {
    if memory_usage_percent > MEMORY_CRITICAL_PCT || hit_rate < HIT_RATE_CRITICAL_PCT {
        CacheHealthStatus::Critical
    } else if memory_usage_percent > MEMORY_WARNING_PCT || hit_rate < HIT_RATE_WARNING_PCT {
        CacheHealthStatus::Warning
    } else {
        CacheHealthStatus::Healthy
    }
}
