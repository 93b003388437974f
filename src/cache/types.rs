use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Construction-time tunables for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Budget the memory-usage percentage is computed against.
    pub max_bytes: u64,
    /// TTL applied when the caller does not pass one explicitly.
    pub default_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_bytes: 64 * 1024 * 1024,
            default_ttl: Duration::from_secs(300),
        }
    }
}

/// Counter snapshot used by health reporting and operational logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    pub entries: usize,
    /// Approximate payload bytes currently held.
    pub approx_bytes: u64,
}

impl CacheStats {
    /// Hit rate in percent. Reports 100 before any read so an idle cache is
    /// not flagged unhealthy.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            100.0
        } else {
            self.hits as f64 / total as f64 * 100.0
        }
    }
}

/// Coarse health classification, derived deterministically from memory usage
/// and hit rate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheHealthStatus {
    Healthy,
    Warning,
    Critical,
}

/// Health report surfaced to operators; cache failures never surface through
/// caller-facing request paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheHealth {
    pub status: CacheHealthStatus,
    pub hit_rate: f64,
    pub memory_usage_percent: f64,
    /// Mean `get` latency over the cache's lifetime.
    pub response_time_ms: f64,
    pub recommendations: Vec<String>,
}
