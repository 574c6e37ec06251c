//! Repository data provider: the cached, ranked repository list.

use async_trait::async_trait;
use color_eyre::Result;
use futures::future::join_all;
use std::cmp::Ordering;
use tracing::{debug, info, warn};

use crate::cache::{AnyStorage, CacheLayer, CacheSource};
use crate::profile;

use super::cache::snapshot_key;
use super::client::GithubClient;
use super::types::Repository;

/// Which repositories make up the list and how they are ranked.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
  pub owner: String,
  pub featured: Vec<String>,
  /// `owner/name` pairs
  pub collab: Vec<String>,
}

impl Default for ProviderSettings {
  fn default() -> Self {
    Self {
      owner: profile::OWNER.to_string(),
      featured: profile::FEATURED_REPOS.iter().map(|s| s.to_string()).collect(),
      collab: profile::COLLAB_REPOS.iter().map(|s| s.to_string()).collect(),
    }
  }
}

/// Read access to the repository list, as seen by the console.
#[async_trait]
pub trait RepoSource: Send + Sync {
  /// The ranked repository list (cached).
  async fn repositories(&self) -> Result<Vec<Repository>>;

  /// A single repository fetched fresh; `Ok(None)` if it does not exist.
  #[allow(dead_code)]
  async fn repository(&self, name: &str) -> Result<Option<Repository>>;

  /// Drop every cached snapshot so the next listing hits the network.
  fn refresh(&self) -> Result<()>;

  fn owner(&self) -> &str;

  fn is_featured(&self, name: &str) -> bool;
}

/// GitHub-backed repository provider with a two-tier snapshot cache.
#[derive(Clone)]
pub struct RepositoryProvider {
  client: GithubClient,
  cache: CacheLayer<Repository, AnyStorage>,
  settings: ProviderSettings,
}

impl RepositoryProvider {
  pub fn new(client: GithubClient, storage: AnyStorage, settings: ProviderSettings) -> Self {
    let key = snapshot_key(&settings.owner, &settings.collab, &settings.featured);
    Self::with_cache(client, CacheLayer::new(key, storage), settings)
  }

  pub fn with_cache(
    client: GithubClient,
    cache: CacheLayer<Repository, AnyStorage>,
    settings: ProviderSettings,
  ) -> Self {
    Self {
      client,
      cache,
      settings,
    }
  }

  /// Get the ranked repository list, from cache when fresh.
  pub async fn get_repositories(&self) -> Result<Vec<Repository>> {
    let result = self.cache.fetch_snapshot(|| self.fetch_ranked()).await?;
    match result.source {
      CacheSource::Network => info!(count = result.data.len(), "fetched repository list"),
      source => debug!(?source, cached_at = %result.cached_at, "repository list from cache"),
    }
    Ok(result.data)
  }

  /// Get one of the owner's repositories directly, bypassing the cache.
  #[allow(dead_code)]
  pub async fn get_repository(&self, name: &str) -> Result<Option<Repository>> {
    let repo = self.client.get_repo(&self.settings.owner, name).await?;
    Ok(repo.map(|r| r.into_repository(false)))
  }

  async fn fetch_ranked(&self) -> Result<Vec<Repository>> {
    // Own repositories and collaborations are requested concurrently; only
    // the former is allowed to fail the whole fetch.
    let own = self.client.list_user_repos(&self.settings.owner);
    let collab = join_all(self.settings.collab.iter().map(|full| self.fetch_collab(full)));
    let (own, collab) = futures::join!(own, collab);

    let collab: Vec<Repository> = collab.into_iter().flatten().collect();
    Ok(merge_and_rank(own?, collab, &self.settings.featured))
  }

  async fn fetch_collab(&self, full_name: &str) -> Option<Repository> {
    let Some((owner, name)) = full_name.split_once('/') else {
      warn!(repo = full_name, "collaboration entry is not owner/name");
      return None;
    };

    match self.client.get_repo(owner, name).await {
      Ok(Some(repo)) => Some(repo.into_repository(true)),
      Ok(None) => {
        warn!(repo = full_name, "collaboration repository not found");
        None
      }
      Err(e) => {
        warn!(repo = full_name, error = %e, "failed to fetch collaboration repository");
        None
      }
    }
  }
}

#[async_trait]
impl RepoSource for RepositoryProvider {
  async fn repositories(&self) -> Result<Vec<Repository>> {
    self.get_repositories().await
  }

  async fn repository(&self, name: &str) -> Result<Option<Repository>> {
    self.get_repository(name).await
  }

  fn refresh(&self) -> Result<()> {
    self.cache.purge()
  }

  fn owner(&self) -> &str {
    &self.settings.owner
  }

  fn is_featured(&self, name: &str) -> bool {
    self.settings.featured.iter().any(|f| f == name)
  }
}

/// Merge collaborations into the owner's list, drop forks and rank.
///
/// Ranking: featured names first, then more stars, then more recently
/// updated. The sort is stable, so full ties keep their input order.
pub fn merge_and_rank(
  own: Vec<Repository>,
  collab: Vec<Repository>,
  featured: &[String],
) -> Vec<Repository> {
  let mut repos: Vec<Repository> = own
    .into_iter()
    .chain(collab)
    .filter(|r| !r.fork || r.is_collab)
    .collect();

  let is_featured = |r: &Repository| featured.iter().any(|f| *f == r.name);
  repos.sort_by(|a, b| rank(a, b, is_featured(a), is_featured(b)));
  repos
}

fn rank(a: &Repository, b: &Repository, a_featured: bool, b_featured: bool) -> Ordering {
  b_featured
    .cmp(&a_featured)
    .then_with(|| b.stargazers_count.cmp(&a.stargazers_count))
    .then_with(|| b.updated_at.cmp(&a.updated_at))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::{NoopStorage, SqliteStorage};
  use crate::config::GithubConfig;
  use chrono::{DateTime, Duration, TimeZone, Utc};
  use mockito::{Matcher, Server};
  use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};
  use std::sync::Arc;

  fn repo(name: &str, stars: u64, day: u32) -> Repository {
    Repository {
      name: name.to_string(),
      description: None,
      language: None,
      stargazers_count: stars,
      updated_at: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
      html_url: String::new(),
      clone_url: String::new(),
      homepage: None,
      fork: false,
      owner: None,
      is_collab: false,
    }
  }

  fn names(repos: &[Repository]) -> Vec<&str> {
    repos.iter().map(|r| r.name.as_str()).collect()
  }

  fn featured(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn test_featured_sort_before_everything() {
    let own = vec![
      repo("popular", 500, 20),
      repo("focus", 0, 1),
      repo("recent", 10, 28),
      repo("site", 1, 2),
    ];

    let ranked = merge_and_rank(own, vec![], &featured(&["focus", "site"]));

    assert_eq!(names(&ranked), vec!["site", "focus", "popular", "recent"]);
  }

  #[test]
  fn test_stars_then_recency_within_group() {
    let own = vec![
      repo("old-star", 5, 1),
      repo("new-star", 5, 9),
      repo("none", 0, 30),
      repo("most", 8, 1),
    ];

    let ranked = merge_and_rank(own, vec![], &[]);

    assert_eq!(names(&ranked), vec!["most", "new-star", "old-star", "none"]);
  }

  #[test]
  fn test_forks_dropped_unless_collab() {
    let mut fork = repo("fork", 100, 1);
    fork.fork = true;
    let mut collab = repo("collab-fork", 0, 1);
    collab.fork = true;
    collab.is_collab = true;

    let ranked = merge_and_rank(vec![fork, repo("mine", 0, 1)], vec![collab], &[]);

    assert_eq!(names(&ranked), vec!["mine", "collab-fork"]);
  }

  fn repo_json(name: &str, stars: u64, updated: &str, fork: bool) -> serde_json::Value {
    serde_json::json!({
      "name": name,
      "description": null,
      "language": "Rust",
      "stargazers_count": stars,
      "updated_at": updated,
      "html_url": format!("https://github.com/o/{}", name),
      "clone_url": format!("https://github.com/o/{}.git", name),
      "fork": fork,
    })
  }

  fn settings(collab: &[&str]) -> ProviderSettings {
    ProviderSettings {
      owner: "o".to_string(),
      featured: featured(&["focus"]),
      collab: collab.iter().map(|s| s.to_string()).collect(),
    }
  }

  fn client_for(server: &Server) -> GithubClient {
    GithubClient::new(&GithubConfig {
      api_url: server.url(),
      request_timeout_secs: 5,
    })
    .unwrap()
  }

  async fn mock_list(server: &mut Server, body: serde_json::Value, hits: usize) -> mockito::Mock {
    server
      .mock("GET", "/users/o/repos")
      .match_query(Matcher::Any)
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(body.to_string())
      .expect(hits)
      .create_async()
      .await
  }

  #[tokio::test]
  async fn test_second_call_uses_cache() {
    let mut server = Server::new_async().await;
    let body = serde_json::json!([
      repo_json("b", 1, "2024-01-02T00:00:00Z", false),
      repo_json("focus", 0, "2024-01-01T00:00:00Z", false),
      repo_json("a", 1, "2024-01-03T00:00:00Z", false),
    ]);
    let mock = mock_list(&mut server, body, 1).await;

    let provider = RepositoryProvider::new(
      client_for(&server),
      AnyStorage::Noop(NoopStorage),
      settings(&[]),
    );

    let first = provider.get_repositories().await.unwrap();
    let second = provider.get_repositories().await.unwrap();

    mock.assert_async().await;
    assert_eq!(names(&first), vec!["focus", "a", "b"]);
    assert_eq!(first, second);
  }

  #[tokio::test]
  async fn test_expired_window_refetches() {
    let mut server = Server::new_async().await;
    let body = serde_json::json!([repo_json("a", 0, "2024-01-01T00:00:00Z", false)]);
    let mock = mock_list(&mut server, body, 2).await;

    let base: DateTime<Utc> = Utc::now();
    let offset = Arc::new(AtomicI64::new(0));
    let handle = Arc::clone(&offset);
    let cache = CacheLayer::new("k", AnyStorage::Sqlite(SqliteStorage::open_in_memory().unwrap()))
      .with_clock(move || base + Duration::minutes(handle.load(AtomicOrdering::SeqCst)));
    let provider = RepositoryProvider::with_cache(client_for(&server), cache, settings(&[]));

    provider.get_repositories().await.unwrap();
    offset.store(10, AtomicOrdering::SeqCst);
    provider.get_repositories().await.unwrap();

    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_collab_failure_is_tolerated() {
    let mut server = Server::new_async().await;
    let body = serde_json::json!([repo_json("mine", 0, "2024-01-01T00:00:00Z", false)]);
    mock_list(&mut server, body, 1).await;
    server
      .mock("GET", "/repos/friend/shared")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(repo_json("shared", 3, "2024-01-01T00:00:00Z", true).to_string())
      .create_async()
      .await;
    server
      .mock("GET", "/repos/friend/broken")
      .with_status(500)
      .create_async()
      .await;

    let provider = RepositoryProvider::new(
      client_for(&server),
      AnyStorage::Noop(NoopStorage),
      settings(&["friend/shared", "friend/broken", "not-a-pair"]),
    );

    let repos = provider.get_repositories().await.unwrap();

    assert_eq!(names(&repos), vec!["shared", "mine"]);
    assert!(repos[0].is_collab);
  }

  #[tokio::test]
  async fn test_own_list_failure_fails_and_is_not_cached() {
    let mut server = Server::new_async().await;
    let failing = server
      .mock("GET", "/users/o/repos")
      .match_query(Matcher::Any)
      .with_status(500)
      .create_async()
      .await;

    let provider = RepositoryProvider::new(
      client_for(&server),
      AnyStorage::Noop(NoopStorage),
      settings(&[]),
    );
    assert!(provider.get_repositories().await.is_err());
    failing.remove_async().await;

    let body = serde_json::json!([repo_json("a", 0, "2024-01-01T00:00:00Z", false)]);
    mock_list(&mut server, body, 1).await;
    let repos = provider.get_repositories().await.unwrap();
    assert_eq!(names(&repos), vec!["a"]);
  }

  #[tokio::test]
  async fn test_get_repository_bypasses_cache() {
    let mut server = Server::new_async().await;
    let mock = server
      .mock("GET", "/repos/o/a")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(repo_json("a", 2, "2024-01-01T00:00:00Z", false).to_string())
      .expect(2)
      .create_async()
      .await;

    let provider = RepositoryProvider::new(
      client_for(&server),
      AnyStorage::Noop(NoopStorage),
      settings(&[]),
    );

    assert!(provider.get_repository("a").await.unwrap().is_some());
    assert!(provider.get_repository("a").await.unwrap().is_some());
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_get_repository_not_found() {
    let mut server = Server::new_async().await;
    server
      .mock("GET", "/repos/o/nope")
      .with_status(404)
      .create_async()
      .await;

    let provider = RepositoryProvider::new(
      client_for(&server),
      AnyStorage::Noop(NoopStorage),
      settings(&[]),
    );

    assert!(provider.get_repository("nope").await.unwrap().is_none());
  }
}
