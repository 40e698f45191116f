//! Response caches keyed by [`RequestFingerprint`].
//!
//! Caches store wire DTOs. Readers always get an owned copy, never a
//! reference into the cache.

use std::{
    collections::{BTreeMap, HashMap},
    marker::PhantomData,
    path::PathBuf,
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use movies_client::RequestFingerprint;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::{
    error::StorageError,
    storage::{read_json, write_json_atomic},
};

#[async_trait]
pub trait ResponseCache<T>: Send + Sync {
    /// Returns the stored payload if present and still valid. Never fails:
    /// any read problem is reported as a miss.
    async fn get(&self, fingerprint: &RequestFingerprint) -> Option<T>;

    /// Stores `payload` under `fingerprint`, replacing any previous entry.
    async fn put(&self, fingerprint: RequestFingerprint, payload: T) -> Result<(), StorageError>;
}

/// Decides whether a stored entry may still be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    #[default]
    NeverExpire,
    MaxAge(Duration),
}

impl CachePolicy {
    pub fn is_valid(&self, stored_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            CachePolicy::NeverExpire => true,
            CachePolicy::MaxAge(max_age) => now - stored_at <= *max_age,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedEntry<T> {
    pub fingerprint: RequestFingerprint,
    pub payload: T,
    pub stored_at: DateTime<Utc>,
}

impl<T> CachedEntry<T> {
    fn new(fingerprint: RequestFingerprint, payload: T) -> Self {
        Self {
            fingerprint,
            payload,
            stored_at: Utc::now(),
        }
    }
}

pub struct InMemoryResponseCache<T> {
    policy: CachePolicy,
    entries: RwLock<HashMap<RequestFingerprint, CachedEntry<T>>>,
}

impl<T> InMemoryResponseCache<T> {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl<T> Default for InMemoryResponseCache<T> {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}

#[async_trait]
impl<T> ResponseCache<T> for InMemoryResponseCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn get(&self, fingerprint: &RequestFingerprint) -> Option<T> {
        let entries = self.entries.read().await;
        entries
            .get(fingerprint)
            .filter(|entry| self.policy.is_valid(entry.stored_at, Utc::now()))
            .map(|entry| entry.payload.clone())
    }

    async fn put(&self, fingerprint: RequestFingerprint, payload: T) -> Result<(), StorageError> {
        let entry = CachedEntry::new(fingerprint.clone(), payload);
        self.entries.write().await.insert(fingerprint, entry);
        Ok(())
    }
}

/// Cache persisted as one JSON object mapping the rendered fingerprint to
/// its entry. Writes are serialized and replace the file atomically.
pub struct FileResponseCache<T> {
    path: PathBuf,
    policy: CachePolicy,
    write_lock: Mutex<()>,
    _payload: PhantomData<fn() -> T>,
}

type CacheFile<T> = BTreeMap<String, CachedEntry<T>>;

impl<T> FileResponseCache<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>, policy: CachePolicy) -> Self {
        Self {
            path: path.into(),
            policy,
            write_lock: Mutex::new(()),
            _payload: PhantomData,
        }
    }

    async fn load(&self) -> CacheFile<T> {
        match read_json(&self.path).await {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                warn!("ignoring unreadable response cache: {e}");
                CacheFile::new()
            }
        }
    }
}

#[async_trait]
impl<T> ResponseCache<T> for FileResponseCache<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn get(&self, fingerprint: &RequestFingerprint) -> Option<T> {
        let mut entries = self.load().await;
        let entry = entries.remove(&fingerprint.to_string())?;
        // Rendered keys are not guaranteed injective; compare the full key.
        if entry.fingerprint != *fingerprint {
            return None;
        }
        if !self.policy.is_valid(entry.stored_at, Utc::now()) {
            debug!("cache entry for {fingerprint} expired");
            return None;
        }
        Some(entry.payload)
    }

    async fn put(&self, fingerprint: RequestFingerprint, payload: T) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await;
        let now = Utc::now();
        entries.retain(|_, entry| self.policy.is_valid(entry.stored_at, now));
        entries.insert(fingerprint.to_string(), CachedEntry::new(fingerprint, payload));
        write_json_atomic(&self.path, &entries).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use reqwest::Method;
    use serde_json::Map;
    use tempfile::TempDir;

    use super::*;

    fn fingerprint(query: &str) -> RequestFingerprint {
        let params = BTreeMap::from([("query".to_string(), query.to_string())]);
        RequestFingerprint::new(&Method::GET, "search/movie", &params, &Map::new())
    }

    #[test]
    fn max_age_policy_rejects_old_entries() {
        let now = Utc::now();
        let policy = CachePolicy::MaxAge(Duration::seconds(60));
        assert!(policy.is_valid(now - Duration::seconds(30), now));
        assert!(!policy.is_valid(now - Duration::seconds(61), now));
        assert!(CachePolicy::NeverExpire.is_valid(now - Duration::days(3650), now));
    }

    #[tokio::test]
    async fn in_memory_cache_returns_copies() {
        let cache = InMemoryResponseCache::<Vec<u32>>::default();
        assert!(cache.get(&fingerprint("dune")).await.is_none());

        cache.put(fingerprint("dune"), vec![1, 2]).await.unwrap();
        let mut copy = cache.get(&fingerprint("dune")).await.unwrap();
        copy.push(3);

        assert_eq!(cache.get(&fingerprint("dune")).await, Some(vec![1, 2]));
        assert!(cache.get(&fingerprint("alien")).await.is_none());
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn expired_in_memory_entries_are_misses() {
        let cache = InMemoryResponseCache::<u32>::new(CachePolicy::MaxAge(Duration::seconds(-1)));
        cache.put(fingerprint("dune"), 7).await.unwrap();
        assert!(cache.get(&fingerprint("dune")).await.is_none());
    }

    #[tokio::test]
    async fn file_cache_persists_between_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");

        let cache = FileResponseCache::<String>::new(&path, CachePolicy::NeverExpire);
        cache.put(fingerprint("dune"), "arrakis".to_string()).await.unwrap();
        cache.put(fingerprint("alien"), "nostromo".to_string()).await.unwrap();

        let reopened = FileResponseCache::<String>::new(&path, CachePolicy::NeverExpire);
        assert_eq!(reopened.get(&fingerprint("dune")).await.as_deref(), Some("arrakis"));
        assert_eq!(reopened.get(&fingerprint("alien")).await.as_deref(), Some("nostromo"));
        assert!(reopened.get(&fingerprint("heat")).await.is_none());
    }

    #[tokio::test]
    async fn corrupt_cache_file_reads_as_empty_and_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        tokio::fs::write(&path, "[garbage").await.unwrap();

        let cache = FileResponseCache::<u32>::new(&path, CachePolicy::NeverExpire);
        assert!(cache.get(&fingerprint("dune")).await.is_none());

        cache.put(fingerprint("dune"), 1).await.unwrap();
        assert_eq!(cache.get(&fingerprint("dune")).await, Some(1));
    }

    #[tokio::test]
    async fn file_cache_drops_expired_entries_on_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        let stale = CachedEntry {
            fingerprint: fingerprint("dune"),
            payload: 1,
            stored_at: Utc::now() - Duration::days(1),
        };
        let existing = CacheFile::from([(stale.fingerprint.to_string(), stale)]);
        write_json_atomic(&path, &existing).await.unwrap();

        let cache = FileResponseCache::<u32>::new(&path, CachePolicy::MaxAge(Duration::seconds(60)));
        cache.put(fingerprint("alien"), 2).await.unwrap();

        let stored: CacheFile<u32> = read_json(&path).await.unwrap().unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored.contains_key(&fingerprint("alien").to_string()));
    }
}
