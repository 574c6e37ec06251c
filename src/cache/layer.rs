//! Cache layer that orchestrates caching logic with network fetching.

use chrono::{DateTime, Duration, Utc};
use color_eyre::{eyre::eyre, Result};
use std::future::Future;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use super::storage::CacheStorage;
use super::traits::{CacheResult, CacheSource, Cacheable, Snapshot};

/// How long a snapshot is served before it is refetched.
pub const DEFAULT_STALE_TIME_MINUTES: i64 = 10;

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Two-tier snapshot cache: an in-memory slot mirrored into a durable store.
///
/// Both tiers hold identical contents and share one expiry. With
/// [`NoopStorage`](super::storage::NoopStorage) as the backend the cache is
/// memory-only.
pub struct CacheLayer<T, S: CacheStorage> {
  key: String,
  memory: Arc<Mutex<Option<Snapshot<T>>>>,
  storage: Arc<S>,
  /// How long before cached data is considered stale
  stale_time: Duration,
  clock: Clock,
}

impl<T: Cacheable, S: CacheStorage> CacheLayer<T, S> {
  /// Create a new cache layer for the snapshot stored under `key`.
  pub fn new(key: impl Into<String>, storage: S) -> Self {
    Self {
      key: key.into(),
      memory: Arc::new(Mutex::new(None)),
      storage: Arc::new(storage),
      stale_time: Duration::minutes(DEFAULT_STALE_TIME_MINUTES),
      clock: Arc::new(Utc::now),
    }
  }

  /// Replace the time source.
  #[cfg(test)]
  pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
    self.clock = Arc::new(clock);
    self
  }

  fn is_fresh(&self, cached_at: DateTime<Utc>) -> bool {
    (self.clock)() - cached_at < self.stale_time
  }

  fn memory_snapshot(&self) -> Result<Option<Snapshot<T>>> {
    let slot = self
      .memory
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    Ok(slot.clone())
  }

  fn set_memory(&self, snapshot: Snapshot<T>) -> Result<()> {
    let mut slot = self
      .memory
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    *slot = Some(snapshot);
    Ok(())
  }

  /// Fetch the snapshot with a cache-first strategy.
  ///
  /// 1. Fresh in-memory snapshot - return it without I/O
  /// 2. Fresh durable snapshot - load it into memory and return it
  /// 3. Otherwise run `fetcher`, then store the result in both tiers
  ///
  /// A failed fetch leaves both tiers untouched, so the next call fetches again.
  pub async fn fetch_snapshot<F, Fut>(&self, fetcher: F) -> Result<CacheResult<Vec<T>>>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
  {
    if let Some(cached) = self.memory_snapshot()? {
      if self.is_fresh(cached.cached_at) {
        return Ok(CacheResult::new(
          cached.entities,
          CacheSource::Memory,
          cached.cached_at,
        ));
      }
      debug!(key = %self.key, "memory snapshot expired");
    }

    match self.storage.load_snapshot::<T>(&self.key) {
      Ok(Some(stored)) if self.is_fresh(stored.cached_at) => {
        debug!(key = %self.key, count = stored.entities.len(), "serving durable snapshot");
        let cached_at = stored.cached_at;
        self.set_memory(stored.clone())?;
        return Ok(CacheResult::new(
          stored.entities,
          CacheSource::Storage,
          cached_at,
        ));
      }
      Ok(_) => {}
      Err(e) => warn!(key = %self.key, error = %e, "durable snapshot unreadable, treating as miss"),
    }

    let entities = fetcher().await?;
    let snapshot = Snapshot::new(entities, (self.clock)());

    if let Err(e) = self.storage.store_snapshot(&self.key, &snapshot) {
      warn!(key = %self.key, error = %e, "failed to persist snapshot");
    }
    let cached_at = snapshot.cached_at;
    let entities = snapshot.entities.clone();
    self.set_memory(snapshot)?;

    Ok(CacheResult::new(entities, CacheSource::Network, cached_at))
  }

  /// Drop the in-memory snapshot. The durable tier is left alone.
  pub fn invalidate(&self) -> Result<()> {
    let mut slot = self
      .memory
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    *slot = None;
    Ok(())
  }

  /// Drop both tiers.
  pub fn purge(&self) -> Result<()> {
    self.invalidate()?;
    self.storage.remove_snapshot(&self.key)
  }
}

impl<T, S: CacheStorage> Clone for CacheLayer<T, S> {
  fn clone(&self) -> Self {
    Self {
      key: self.key.clone(),
      memory: Arc::clone(&self.memory),
      storage: Arc::clone(&self.storage),
      stale_time: self.stale_time,
      clock: Arc::clone(&self.clock),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::storage::{NoopStorage, SqliteStorage};
  use serde::{Deserialize, Serialize};
  use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

  #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
  struct Item(String);

  impl Cacheable for Item {
    fn entity_type() -> &'static str {
      "item"
    }
  }

  fn items(ids: &[&str]) -> Vec<Item> {
    ids.iter().map(|s| Item(s.to_string())).collect()
  }

  /// Clock that only moves when told to.
  fn manual_clock() -> (Arc<AtomicI64>, impl Fn() -> DateTime<Utc> + Send + Sync + 'static) {
    let base = Utc::now();
    let offset = Arc::new(AtomicI64::new(0));
    let handle = Arc::clone(&offset);
    let clock = move || base + Duration::seconds(handle.load(Ordering::SeqCst));
    (offset, clock)
  }

  #[tokio::test]
  async fn test_second_call_within_window_skips_fetch() {
    let calls = AtomicUsize::new(0);
    let cache: CacheLayer<Item, _> = CacheLayer::new("k", NoopStorage);

    let first = cache
      .fetch_snapshot(|| async {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(items(&["b", "a"]))
      })
      .await
      .unwrap();
    let second = cache
      .fetch_snapshot(|| async {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(items(&["zzz"]))
      })
      .await
      .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(first.source, CacheSource::Network);
    assert_eq!(second.source, CacheSource::Memory);
    assert_eq!(first.data, second.data);
  }

  #[tokio::test]
  async fn test_expired_memory_refetches() {
    let (offset, clock) = manual_clock();
    let cache: CacheLayer<Item, _> = CacheLayer::new("k", NoopStorage).with_clock(clock);

    cache
      .fetch_snapshot(|| async { Ok(items(&["old"])) })
      .await
      .unwrap();
    offset.store(11 * 60, Ordering::SeqCst);

    let result = cache
      .fetch_snapshot(|| async { Ok(items(&["new"])) })
      .await
      .unwrap();

    assert_eq!(result.source, CacheSource::Network);
    assert_eq!(result.data, items(&["new"]));
  }

  #[tokio::test]
  async fn test_durable_snapshot_loads_into_memory() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    storage
      .store_snapshot("k", &Snapshot::new(items(&["stored"]), Utc::now()))
      .unwrap();
    let cache: CacheLayer<Item, _> = CacheLayer::new("k", storage);

    let first = cache
      .fetch_snapshot(|| async { Err(eyre!("network should not be used")) })
      .await
      .unwrap();
    let second = cache
      .fetch_snapshot(|| async { Err(eyre!("network should not be used")) })
      .await
      .unwrap();

    assert_eq!(first.source, CacheSource::Storage);
    assert_eq!(second.source, CacheSource::Memory);
    assert_eq!(second.data, items(&["stored"]));
  }

  #[tokio::test]
  async fn test_expired_durable_snapshot_refetches_and_updates_timestamp() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    let old = Utc::now() - Duration::minutes(30);
    storage
      .store_snapshot("k", &Snapshot::new(items(&["stale"]), old))
      .unwrap();
    let cache: CacheLayer<Item, _> = CacheLayer::new("k", storage);

    let result = cache
      .fetch_snapshot(|| async { Ok(items(&["fresh"])) })
      .await
      .unwrap();

    assert_eq!(result.source, CacheSource::Network);
    let stored: Snapshot<Item> = cache.storage.load_snapshot("k").unwrap().unwrap();
    assert_eq!(stored.entities, items(&["fresh"]));
    assert!(stored.cached_at > old);
  }

  #[tokio::test]
  async fn test_failed_fetch_is_not_cached() {
    let calls = AtomicUsize::new(0);
    let cache: CacheLayer<Item, _> = CacheLayer::new("k", SqliteStorage::open_in_memory().unwrap());

    let failed = cache
      .fetch_snapshot(|| async {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(eyre!("boom"))
      })
      .await;
    assert!(failed.is_err());

    let retried = cache
      .fetch_snapshot(|| async {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(items(&["a"]))
      })
      .await
      .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(retried.source, CacheSource::Network);
  }

  #[tokio::test]
  async fn test_invalidate_falls_back_to_durable_tier() {
    let cache: CacheLayer<Item, _> = CacheLayer::new("k", SqliteStorage::open_in_memory().unwrap());
    cache
      .fetch_snapshot(|| async { Ok(items(&["a"])) })
      .await
      .unwrap();

    cache.invalidate().unwrap();
    let result = cache
      .fetch_snapshot(|| async { Ok(items(&["b"])) })
      .await
      .unwrap();

    assert_eq!(result.source, CacheSource::Storage);
    assert_eq!(result.data, items(&["a"]));
  }

  #[tokio::test]
  async fn test_purge_forces_network() {
    let cache: CacheLayer<Item, _> = CacheLayer::new("k", SqliteStorage::open_in_memory().unwrap());
    cache
      .fetch_snapshot(|| async { Ok(items(&["a"])) })
      .await
      .unwrap();

    cache.purge().unwrap();
    let result = cache
      .fetch_snapshot(|| async { Ok(items(&["b"])) })
      .await
      .unwrap();

    assert_eq!(result.source, CacheSource::Network);
  }

  #[tokio::test]
  async fn test_clones_share_memory_slot() {
    let cache: CacheLayer<Item, _> = CacheLayer::new("k", NoopStorage);
    let other = cache.clone();

    cache
      .fetch_snapshot(|| async { Ok(items(&["a"])) })
      .await
      .unwrap();
    let result = other
      .fetch_snapshot(|| async { Ok(items(&["b"])) })
      .await
      .unwrap();

    assert_eq!(result.source, CacheSource::Memory);
  }
}
