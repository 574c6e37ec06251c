use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// A repository as listed by the console
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
  pub name: String,
  pub description: Option<String>,
  pub language: Option<String>,
  pub stargazers_count: u64,
  pub updated_at: DateTime<Utc>,
  pub html_url: String,
  pub clone_url: String,
  pub homepage: Option<String>,
  pub fork: bool,
  pub owner: Option<String>,
  /// Fetched through the collaboration allow-list
  #[serde(default)]
  pub is_collab: bool,
}

/// Display-ready projection of a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoView {
  pub name: String,
  pub description: String,
  pub language: String,
  pub stars: u64,
  pub url: String,
  pub homepage: Option<String>,
  pub updated: String,
  pub is_collab: bool,
  pub owner: String,
}

pub const UNKNOWN_LANGUAGE: &str = "Unknown";
pub const NO_DESCRIPTION: &str = "No description";

/// Project a repository for display, filling in defaults.
pub fn format_repo(repo: &Repository, default_owner: &str) -> RepoView {
  RepoView {
    name: repo.name.clone(),
    description: repo
      .description
      .clone()
      .filter(|d| !d.is_empty())
      .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
    language: repo
      .language
      .clone()
      .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string()),
    stars: repo.stargazers_count,
    url: repo.html_url.clone(),
    homepage: repo.homepage.clone().filter(|h| !h.is_empty()),
    updated: repo
      .updated_at
      .with_timezone(&Local)
      .format("%b %-d, %Y")
      .to_string(),
    is_collab: repo.is_collab,
    owner: repo
      .owner
      .clone()
      .unwrap_or_else(|| default_owner.to_string()),
  }
}
