//! Time-bounded cache of domain availability results
//!
//! Entries expire on read: an entry older than the TTL is reported as absent
//! and a fresh probe is expected. There is no other eviction; a session only
//! ever touches a few hundred domains.

use crate::types::Availability;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::time::Duration;

const SHARDS: usize = 16;

/// Last known availability of one domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub domain: String,
    pub availability: Availability,
    pub recorded_at: DateTime<Utc>,
}

/// Process-wide result cache, shared by reference between validators.
///
/// Keys are spread over independently locked shards so lookups on different
/// domains rarely contend. Concurrent writes to one key are last-write-wins.
pub struct ResultCache {
    ttl: chrono::Duration,
    shards: Vec<RwLock<HashMap<String, CacheEntry>>>,
}

impl ResultCache {
    /// Create a cache with the default 300s TTL
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(300))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::seconds(300));
        Self {
            ttl,
            shards: (0..SHARDS).map(|_| RwLock::new(HashMap::new())).collect(),
        }
    }

    fn shard(&self, domain: &str) -> &RwLock<HashMap<String, CacheEntry>> {
        let mut hasher = DefaultHasher::new();
        domain.hash(&mut hasher);
        &self.shards[(hasher.finish() as usize) % SHARDS]
    }

    /// Look up a domain as of now
    pub fn get(&self, domain: &str) -> Option<CacheEntry> {
        self.get_at(domain, Utc::now())
    }

    /// Look up a domain as of `now`; expired entries read as absent
    pub fn get_at(&self, domain: &str, now: DateTime<Utc>) -> Option<CacheEntry> {
        let shard = self.shard(domain).read();
        shard
            .get(domain)
            .filter(|entry| now - entry.recorded_at < self.ttl)
            .cloned()
    }

    /// Record an observed availability
    pub fn put(&self, domain: &str, availability: Availability, recorded_at: DateTime<Utc>) {
        let entry = CacheEntry {
            domain: domain.to_string(),
            availability,
            recorded_at,
        };
        self.shard(domain).write().insert(domain.to_string(), entry);
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.read().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ttl(&self) -> Duration {
        self.ttl.to_std().unwrap_or_default()
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}
