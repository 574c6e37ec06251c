//! Cache storage trait and SQLite implementation.

use chrono::{DateTime, SecondsFormat, Utc};
use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

use super::traits::{Cacheable, Snapshot};

/// Trait for the durable tier of the snapshot cache.
///
/// Backends store one ordered snapshot per key. Reads that hit undecodable
/// data report a miss rather than an error.
pub trait CacheStorage: Send + Sync {
  /// Get the snapshot stored under `key`.
  fn load_snapshot<T: Cacheable>(&self, key: &str) -> Result<Option<Snapshot<T>>>;

  /// Replace the snapshot stored under `key`.
  fn store_snapshot<T: Cacheable>(&self, key: &str, snapshot: &Snapshot<T>) -> Result<()>;

  /// Remove the snapshot stored under `key`.
  fn remove_snapshot(&self, key: &str) -> Result<()>;
}

/// Storage implementation that doesn't cache anything.
/// Used when the durable tier is disabled - the cache is then memory-only.
pub struct NoopStorage;

impl CacheStorage for NoopStorage {
  fn load_snapshot<T: Cacheable>(&self, _key: &str) -> Result<Option<Snapshot<T>>> {
    Ok(None) // Always miss
  }

  fn store_snapshot<T: Cacheable>(&self, _key: &str, _snapshot: &Snapshot<T>) -> Result<()> {
    Ok(()) // Discard
  }

  fn remove_snapshot(&self, _key: &str) -> Result<()> {
    Ok(())
  }
}

/// SQLite-based cache storage implementation.
pub struct SqliteStorage {
  conn: Mutex<Connection>,
}

impl SqliteStorage {
  /// Create a new SQLite storage at the default location.
  pub fn open() -> Result<Self> {
    Self::open_at(&Self::default_path()?)
  }

  /// Create a new SQLite storage at an explicit path.
  pub fn open_at(path: &Path) -> Result<Self> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create cache directory: {}", e))?;
    }

    let conn = Connection::open(path)
      .map_err(|e| eyre!("Failed to open cache database at {}: {}", path.display(), e))?;

    debug!(path = %path.display(), "opened snapshot cache");
    Self::with_connection(conn)
  }

  /// Create a storage that lives only as long as this value.
  #[cfg(test)]
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()
      .map_err(|e| eyre!("Failed to open in-memory cache database: {}", e))?;
    Self::with_connection(conn)
  }

  fn with_connection(conn: Connection) -> Result<Self> {
    let storage = Self {
      conn: Mutex::new(conn),
    };
    storage.run_migrations()?;
    Ok(storage)
  }

  /// Get the default database path.
  pub fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("folio").join("cache.db"))
  }

  /// Run database migrations for cache tables.
  fn run_migrations(&self) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute_batch(CACHE_SCHEMA)
      .map_err(|e| eyre!("Failed to run cache migrations: {}", e))?;

    Ok(())
  }

  #[cfg(test)]
  fn write_raw(&self, key: &str, entity_type: &str, data: &[u8], cached_at: &str) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    conn
      .execute(
        "INSERT OR REPLACE INTO snapshot_cache
           (snapshot_key, entity_type, data, cached_at, entity_count)
         VALUES (?, ?, ?, ?, 0)",
        params![key, entity_type, data, cached_at],
      )
      .map_err(|e| eyre!("Failed to write raw snapshot: {}", e))?;
    Ok(())
  }
}

/// Schema for cache tables.
const CACHE_SCHEMA: &str = r#"
-- One ordered snapshot per key (serialized JSON array)
CREATE TABLE IF NOT EXISTS snapshot_cache (
    snapshot_key TEXT PRIMARY KEY,
    entity_type TEXT NOT NULL,
    data BLOB NOT NULL,
    cached_at TEXT NOT NULL,
    entity_count INTEGER NOT NULL
);
"#;

impl CacheStorage for SqliteStorage {
  fn load_snapshot<T: Cacheable>(&self, key: &str) -> Result<Option<Snapshot<T>>> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    let entity_type = T::entity_type();

    let row: Option<(Vec<u8>, String)> = conn
      .query_row(
        "SELECT data, cached_at FROM snapshot_cache
         WHERE snapshot_key = ? AND entity_type = ?",
        params![key, entity_type],
        |row| Ok((row.get(0)?, row.get(1)?)),
      )
      .optional()
      .map_err(|e| eyre!("Failed to read snapshot: {}", e))?;

    let Some((data, cached_at_str)) = row else {
      return Ok(None);
    };

    let cached_at = match parse_datetime(&cached_at_str) {
      Some(t) => t,
      None => {
        warn!(key, value = %cached_at_str, "discarding snapshot with bad timestamp");
        return Ok(None);
      }
    };

    match serde_json::from_slice::<Vec<T>>(&data) {
      Ok(entities) => Ok(Some(Snapshot::new(entities, cached_at))),
      Err(e) => {
        warn!(key, error = %e, "discarding undecodable snapshot");
        Ok(None)
      }
    }
  }

  fn store_snapshot<T: Cacheable>(&self, key: &str, snapshot: &Snapshot<T>) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    let data = serde_json::to_vec(&snapshot.entities)
      .map_err(|e| eyre!("Failed to serialize snapshot: {}", e))?;

    conn
      .execute(
        "INSERT OR REPLACE INTO snapshot_cache
           (snapshot_key, entity_type, data, cached_at, entity_count)
         VALUES (?, ?, ?, ?, ?)",
        params![
          key,
          T::entity_type(),
          data,
          format_datetime(snapshot.cached_at),
          snapshot.entities.len()
        ],
      )
      .map_err(|e| eyre!("Failed to store snapshot: {}", e))?;

    Ok(())
  }

  fn remove_snapshot(&self, key: &str) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    conn
      .execute(
        "DELETE FROM snapshot_cache WHERE snapshot_key = ?",
        params![key],
      )
      .map_err(|e| eyre!("Failed to remove snapshot: {}", e))?;
    Ok(())
  }
}

/// Backend chosen at startup (`cache.enabled` in config, `--no-cache` flag).
pub enum AnyStorage {
  Sqlite(SqliteStorage),
  Noop(NoopStorage),
}

impl CacheStorage for AnyStorage {
  fn load_snapshot<T: Cacheable>(&self, key: &str) -> Result<Option<Snapshot<T>>> {
    match self {
      Self::Sqlite(s) => s.load_snapshot(key),
      Self::Noop(s) => s.load_snapshot(key),
    }
  }

  fn store_snapshot<T: Cacheable>(&self, key: &str, snapshot: &Snapshot<T>) -> Result<()> {
    match self {
      Self::Sqlite(s) => s.store_snapshot(key, snapshot),
      Self::Noop(s) => s.store_snapshot(key, snapshot),
    }
  }

  fn remove_snapshot(&self, key: &str) -> Result<()> {
    match self {
      Self::Sqlite(s) => s.remove_snapshot(key),
      Self::Noop(s) => s.remove_snapshot(key),
    }
  }
}

fn format_datetime(t: DateTime<Utc>) -> String {
  t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .ok()
    .map(|dt| dt.with_timezone(&Utc))
}
