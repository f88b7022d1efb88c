//! Compiled rule caching.
//!
//! Compiling a rule builds a [`Regex`](regex::Regex), which is far more
//! expensive than matching with one. The router compiles a rule every time a
//! route is added and every time a route is removed by rule, so the same
//! strings come through repeatedly. [`PatternCache`] keeps the most recently
//! used compilations in an [`lru`] cache keyed by the raw rule text.
//!
//! Gated behind the `cache` feature.
//!
//! # Examples
//!
//! ```
//! use spa_navigator::cache::PatternCache;
//! use spa_navigator::rule::CompiledRule;
//!
//! let mut cache = PatternCache::new();
//! assert!(cache.get("user/{id}").is_none());
//!
//! cache.insert("user/{id}".to_string(), CompiledRule::from_path("user/{id}"));
//! assert!(cache.get("user/{id}").is_some());
//! assert_eq!(cache.stats().hits, 1);
//! assert_eq!(cache.stats().misses, 1);
//! ```

use crate::rule::CompiledRule;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Counters tracking cache effectiveness.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: usize,
    /// Lookups that had to compile.
    pub misses: usize,
    /// Number of full invalidations (via [`PatternCache::clear`]).
    pub invalidations: usize,
}

impl CacheStats {
    /// Hit rate in `0.0..=1.0`, or `0.0` before the first lookup.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache from rule text to its compiled form.
#[derive(Debug)]
pub struct PatternCache {
    entries: LruCache<String, CompiledRule>,
    stats: CacheStats,
}

impl PatternCache {
    const DEFAULT_CAPACITY: usize = 128;

    /// Create a cache with the default capacity (128 rules).
    pub fn new() -> Self {
        Self::with_capacity(NonZeroUsize::new(Self::DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }

    /// Create a cache holding at most `capacity` rules.
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Look up a compiled rule. Updates hit/miss stats.
    pub fn get(&mut self, rule: &str) -> Option<CompiledRule> {
        if let Some(compiled) = self.entries.get(rule) {
            self.stats.hits += 1;
            trace_log!("Pattern cache hit for rule '{}'", rule);
            Some(compiled.clone())
        } else {
            self.stats.misses += 1;
            trace_log!("Pattern cache miss for rule '{}'", rule);
            None
        }
    }

    /// Store a compiled rule, evicting the least recently used one when full.
    pub fn insert(&mut self, rule: String, compiled: CompiledRule) {
        self.entries.push(rule, compiled);
    }

    /// Drop every entry and count an invalidation.
    pub fn clear(&mut self) {
        let len = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += 1;
        debug_log!(
            "Pattern cache cleared: {} entries removed (hit rate: {:.1}%)",
            len,
            self.stats.hit_rate() * 100.0
        );
    }

    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled(rule: &str) -> CompiledRule {
        CompiledRule::from_path(rule)
    }

    #[test]
    fn test_cache_miss_then_hit() {
        let mut cache = PatternCache::new();
        assert!(cache.get("about").is_none());
        cache.insert("about".to_string(), compiled("about"));
        assert!(cache.get("about").is_some());
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_least_recently_used_is_evicted() {
        let mut cache = PatternCache::with_capacity(NonZeroUsize::new(2).unwrap());
        cache.insert("a".to_string(), compiled("a"));
        cache.insert("b".to_string(), compiled("b"));
        cache.get("a");
        cache.insert("c".to_string(), compiled("c"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
    }

    #[test]
    fn test_clear_counts_invalidation() {
        let mut cache = PatternCache::new();
        cache.insert("a".to_string(), compiled("a"));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().invalidations, 1);
    }

    #[test]
    fn test_hit_rate() {
        let mut cache = PatternCache::new();
        cache.get("x");
        cache.insert("x".to_string(), compiled("x"));
        cache.get("x");
        cache.get("x");
        cache.get("y");
        assert!((cache.stats().hit_rate() - 0.5).abs() < 0.001);
    }
}
