//! Serde-deserializable types matching GitHub REST API responses.
//!
//! These types are separate from domain types to allow clean deserialization
//! while keeping domain types focused on application needs. Only the fields
//! the console reads are declared; everything else in the payload is ignored.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::types::Repository;

#[derive(Debug, Deserialize)]
pub struct ApiOwner {
  pub login: String,
}

/// Element of `GET /users/{owner}/repos`, and the body of `GET /repos/{owner}/{name}`
#[derive(Debug, Deserialize)]
pub struct ApiRepository {
  pub name: String,
  pub description: Option<String>,
  pub language: Option<String>,
  #[serde(default)]
  pub stargazers_count: u64,
  pub updated_at: DateTime<Utc>,
  #[serde(default)]
  pub html_url: String,
  #[serde(default)]
  pub clone_url: String,
  pub homepage: Option<String>,
  #[serde(default)]
  pub fork: bool,
  pub owner: Option<ApiOwner>,
}

impl ApiRepository {
  /// Convert to the domain type. `is_collab` is decided by how the
  /// repository was fetched, never by the payload.
  pub fn into_repository(self, is_collab: bool) -> Repository {
    Repository {
      name: self.name,
      description: self.description,
      language: self.language,
      stargazers_count: self.stargazers_count,
      updated_at: self.updated_at,
      html_url: self.html_url,
      clone_url: self.clone_url,
      homepage: self.homepage.filter(|h| !h.trim().is_empty()),
      fork: self.fork,
      owner: self.owner.map(|o| o.login),
      is_collab,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_trimmed_payload() {
    let json = r#"{
      "id": 1,
      "name": "focus",
      "full_name": "felixlynch10/focus",
      "description": null,
      "language": "Rust",
      "stargazers_count": 3,
      "updated_at": "2024-05-01T12:00:00Z",
      "html_url": "https://github.com/felixlynch10/focus",
      "clone_url": "https://github.com/felixlynch10/focus.git",
      "homepage": "",
      "fork": false,
      "owner": { "login": "felixlynch10", "id": 7 }
    }"#;

    let api: ApiRepository = serde_json::from_str(json).unwrap();
    let repo = api.into_repository(false);

    assert_eq!(repo.name, "focus");
    assert_eq!(repo.description, None);
    assert_eq!(repo.language.as_deref(), Some("Rust"));
    assert_eq!(repo.stargazers_count, 3);
    assert_eq!(repo.homepage, None);
    assert_eq!(repo.owner.as_deref(), Some("felixlynch10"));
    assert!(!repo.is_collab);
  }

  #[test]
  fn test_payload_cannot_claim_collab() {
    let json = r#"{
      "name": "x",
      "updated_at": "2024-05-01T12:00:00Z",
      "fork": true,
      "isCollab": true
    }"#;

    let api: ApiRepository = serde_json::from_str(json).unwrap();
    assert!(!api.into_repository(false).is_collab);
  }
}
