//! Generic snapshot cache with a pluggable durable tier.
//!
//! This module provides a GitHub-agnostic caching mechanism that:
//! - Holds one ordered snapshot per cache in memory
//! - Mirrors it into durable storage (SQLite) or nowhere (memory-only)
//! - Expires both tiers together after a fixed window
//! - Never caches failures

mod layer;
mod storage;
mod traits;

pub use layer::CacheLayer;
pub use storage::{AnyStorage, NoopStorage, SqliteStorage};
pub use traits::{CacheSource, Cacheable};
