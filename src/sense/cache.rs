//! Memo of word-pair similarity contributions.
//!
//! The cache maps an *unordered* pair of word texts to the contribution the
//! pair adds to a bag similarity score. Keys are canonicalized by ordering the
//! two texts, so `("london", "england")` and `("england", "london")` share one
//! entry and a single lookup covers both orderings.
//!
//! Capacity is fixed at construction. Once full, inserting a new pair evicts
//! the least recently used one (both `get` hits and inserts count as use).
//! All state sits behind one mutex, so every lookup and every insert is atomic
//! and concurrent inserts of the same pair resolve last-writer-wins.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use linked_hash_map::LinkedHashMap;
use serde::{Deserialize, Serialize};

/// Canonical key of an unordered word pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    low: String,
    high: String,
}

impl PairKey {
    /// Build the key for `a` and `b` in either order.
    pub fn new(a: &str, b: &str) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self {
            low: low.to_string(),
            high: high.to_string(),
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.low, self.high)
    }
}

/// Counters describing cache behavior since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
    pub len: usize,
    pub capacity: usize,
}

/// Bounded LRU map from unordered word pairs to contributions.
pub struct SimilarityCache {
    /// Front is the least recently used pair.
    entries: Mutex<LinkedHashMap<PairKey, f64>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    evictions: AtomicU64,
}

impl SimilarityCache {
    /// Create an empty cache holding at most `capacity` pairs (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(LinkedHashMap::new()),
            capacity: capacity.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            inserts: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    // Cached values are plain f64s, so a panic mid-update cannot leave a
    // half-written entry behind; keep using the state after poisoning.
    fn lock(&self) -> MutexGuard<'_, LinkedHashMap<PairKey, f64>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up the contribution of the pair `(a, b)` in either order.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let key = PairKey::new(a, b);
        let found = self.lock().get_refresh(&key).copied();
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Store the contribution of the pair `(a, b)`, replacing any previous value.
    pub fn insert(&self, a: &str, b: &str, value: f64) {
        let key = PairKey::new(a, b);
        let mut entries = self.lock();

        // Re-inserting an existing key updates it and moves it to the back.
        if entries.contains_key(&key) {
            entries.insert(key, value);
            return;
        }

        if entries.len() >= self.capacity {
            if let Some((oldest, _)) = entries.pop_front() {
                tracing::trace!(pair = %oldest, "evicting least recently used pair");
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }

        entries.insert(key, value);
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    /// Return the cached contribution, computing and storing it on a miss.
    ///
    /// `compute` runs without the lock held.
    pub fn get_or_insert_with(&self, a: &str, b: &str, compute: impl FnOnce() -> f64) -> f64 {
        if let Some(v) = self.get(a, b) {
            return v;
        }
        let value = compute();
        self.insert(a, b, value);
        value
    }

    /// Whether the pair is cached, without touching recency or counters.
    pub fn contains(&self, a: &str, b: &str) -> bool {
        self.lock().contains_key(&PairKey::new(a, b))
    }

    /// Number of cached pairs.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of cached pairs.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            len: self.len(),
            capacity: self.capacity,
        }
    }
}

impl fmt::Debug for SimilarityCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimilarityCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}
