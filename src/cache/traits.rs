//! Core traits and types for the caching system.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

/// Trait for entities that can be cached in snapshots.
pub trait Cacheable: Clone + Send + Sync + Serialize + DeserializeOwned {
  /// Entity type name for storage organization (e.g., "repository")
  fn entity_type() -> &'static str;
}

/// A whole ordered list captured at one point in time.
///
/// Snapshots are the unit of caching: they are stored, read and replaced
/// atomically, never patched entry by entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
  /// The cached entities in order
  pub entities: Vec<T>,
  /// When the snapshot was captured
  pub cached_at: DateTime<Utc>,
}

impl<T> Snapshot<T> {
  pub fn new(entities: Vec<T>, cached_at: DateTime<Utc>) -> Self {
    Self {
      entities,
      cached_at,
    }
  }
}

/// Result from a cache operation, including data and metadata about the source.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: CacheSource,
  /// When the data was captured
  pub cached_at: DateTime<Utc>,
}

impl<T> CacheResult<T> {
  pub fn new(data: T, source: CacheSource, cached_at: DateTime<Utc>) -> Self {
    Self {
      data,
      source,
      cached_at,
    }
  }
}

/// Indicates where cached data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Fresh data from network
  Network,
  /// In-memory snapshot, no I/O performed
  Memory,
  /// Durable snapshot loaded into memory
  Storage,
}
