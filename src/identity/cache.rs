/// Profile Cache - in-memory memoization of resolved profiles
use crate::{config::CachePolicy, identity::Profile, metrics};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Cached profile entry
#[derive(Debug, Clone)]
pub struct CachedProfile {
    pub profile: Profile,
    pub cached_at: DateTime<Utc>,
}

/// Case-insensitive key -> profile store.
///
/// Clones share the same map, so one instance constructed at startup can be
/// handed to every resolver for the life of the process.
#[derive(Clone)]
pub struct ProfileCache {
    entries: Arc<RwLock<HashMap<String, CachedProfile>>>,
    policy: CachePolicy,
}

impl Default for ProfileCache {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}

impl ProfileCache {
    /// Create a new, empty profile cache
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            policy,
        }
    }

    /// Staleness policy this cache was built with
    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// Get cached profile
    pub async fn get(&self, key: &str) -> Option<Profile> {
        let normalized = key.to_lowercase();

        let expired = {
            let entries = self.entries.read().await;
            match entries.get(&normalized) {
                Some(entry) if !self.is_expired(entry) => {
                    debug!("Profile cache HIT: {}", normalized);
                    return Some(entry.profile.clone());
                }
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            // Cache expired, delete it unless a fresh entry replaced it meanwhile
            debug!("Profile cache EXPIRED: {}", normalized);
            self.remove_if_expired(&normalized).await;
        } else {
            debug!("Profile cache MISS: {}", normalized);
        }

        None
    }

    /// Cache profile, replacing any previous entry
    pub async fn set(&self, key: &str, profile: Profile) {
        let normalized = key.to_lowercase();
        debug!("Profile cache SET: {}", normalized);

        let mut entries = self.entries.write().await;
        entries.insert(
            normalized,
            CachedProfile {
                profile,
                cached_at: Utc::now(),
            },
        );
        metrics::record_cache_size(entries.len());
    }

    /// Remove one entry, or every entry when `key` is `None`
    pub async fn clear(&self, key: Option<&str>) {
        let mut entries = self.entries.write().await;
        match key {
            Some(key) => {
                entries.remove(&key.to_lowercase());
            }
            None => entries.clear(),
        }
        metrics::record_cache_size(entries.len());
    }

    /// Number of cached profiles (expired entries included until touched)
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn remove_if_expired(&self, normalized: &str) {
        let mut entries = self.entries.write().await;
        let still_expired = entries
            .get(normalized)
            .map(|entry| self.is_expired(entry))
            .unwrap_or(false);
        if still_expired {
            entries.remove(normalized);
            metrics::record_cache_size(entries.len());
        }
    }

    fn is_expired(&self, entry: &CachedProfile) -> bool {
        match self.policy.ttl {
            Some(ttl) => Utc::now() - entry.cached_at >= ttl,
            None => false,
        }
    }
}
