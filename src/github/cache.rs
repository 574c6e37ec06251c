//! Caching implementations for GitHub types.

use sha2::{Digest, Sha256};

use crate::cache::Cacheable;

use super::types::Repository;

impl Cacheable for Repository {
  fn entity_type() -> &'static str {
    "repository"
  }
}

/// Key of the repository-list snapshot.
///
/// Derived from everything that decides the list's contents, so a build for
/// another owner or allow-list never reads a foreign snapshot.
pub fn snapshot_key(owner: &str, collab: &[String], featured: &[String]) -> String {
  let input = format!(
    "repos:{}:{}:{}",
    owner.to_lowercase(),
    collab.join(","),
    featured.join(",")
  );

  // SHA256 hash for stable, fixed-length keys
  let mut hasher = Sha256::new();
  hasher.update(input.as_bytes());
  hex::encode(hasher.finalize())
}
