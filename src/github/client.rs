use crate::config::GithubConfig;
use crate::github::api_types::ApiRepository;
use crate::github::types::Repository;
use color_eyre::{eyre::eyre, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Upper bound GitHub accepts for `per_page`
pub const PAGE_SIZE: u32 = 100;

/// GitHub REST API client (unauthenticated)
#[derive(Clone)]
pub struct GithubClient {
  http: reqwest::Client,
  base_url: Url,
}

impl GithubClient {
  pub fn new(config: &GithubConfig) -> Result<Self> {
    let base_url = Url::parse(&config.api_url)
      .map_err(|e| eyre!("Invalid GitHub API url {}: {}", config.api_url, e))?;
    if base_url.cannot_be_a_base() {
      return Err(eyre!("Invalid GitHub API url {}", config.api_url));
    }

    let mut headers = HeaderMap::new();
    headers.insert(
      ACCEPT,
      HeaderValue::from_static("application/vnd.github+json"),
    );

    let http = reqwest::Client::builder()
      .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
      .default_headers(headers)
      .timeout(Duration::from_secs(config.request_timeout_secs))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { http, base_url })
  }

  fn endpoint(&self, segments: &[&str]) -> Url {
    let mut url = self.base_url.clone();
    // cannot_be_a_base was rejected in new(), so segments are always available
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    url
  }

  /// List an owner's public repositories, most recently updated first (single page)
  pub async fn list_user_repos(&self, owner: &str) -> Result<Vec<Repository>> {
    let mut url = self.endpoint(&["users", owner, "repos"]);
    url
      .query_pairs_mut()
      .append_pair("sort", "updated")
      .append_pair("per_page", &PAGE_SIZE.to_string());

    debug!(%url, "listing repositories");
    let response = self
      .http
      .get(url)
      .send()
      .await
      .map_err(|e| eyre!("Failed to reach GitHub: {}", e))?;

    let status = response.status();
    if !status.is_success() {
      return Err(eyre!("GitHub API error: {}", status));
    }

    let repos: Vec<ApiRepository> = response
      .json()
      .await
      .map_err(|e| eyre!("Failed to parse repository list: {}", e))?;

    Ok(
      repos
        .into_iter()
        .map(|r| r.into_repository(false))
        .collect(),
    )
  }

  /// Get a single repository. `Ok(None)` when GitHub answers 404.
  pub async fn get_repo(&self, owner: &str, name: &str) -> Result<Option<ApiRepository>> {
    let url = self.endpoint(&["repos", owner, name]);

    debug!(%url, "fetching repository");
    let response = self
      .http
      .get(url)
      .send()
      .await
      .map_err(|e| eyre!("Failed to reach GitHub: {}", e))?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    if !status.is_success() {
      return Err(eyre!("GitHub API error for {}/{}: {}", owner, name, status));
    }

    let repo: ApiRepository = response
      .json()
      .await
      .map_err(|e| eyre!("Failed to parse repository {}/{}: {}", owner, name, e))?;

    Ok(Some(repo))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use mockito::{Matcher, Server};

  fn client_for(server: &Server) -> GithubClient {
    GithubClient::new(&GithubConfig {
      api_url: server.url(),
      request_timeout_secs: 5,
    })
    .unwrap()
  }

  fn repo_json(name: &str) -> serde_json::Value {
    serde_json::json!({
      "name": name,
      "description": "desc",
      "language": "Rust",
      "stargazers_count": 1,
      "updated_at": "2024-01-01T00:00:00Z",
      "html_url": format!("https://github.com/o/{}", name),
      "clone_url": format!("https://github.com/o/{}.git", name),
      "homepage": null,
      "fork": false,
      "owner": { "login": "o" }
    })
  }

  #[tokio::test]
  async fn test_list_user_repos_sends_paging_query() {
    let mut server = Server::new_async().await;
    let mock = server
      .mock("GET", "/users/o/repos")
      .match_query(Matcher::AllOf(vec![
        Matcher::UrlEncoded("sort".into(), "updated".into()),
        Matcher::UrlEncoded("per_page".into(), "100".into()),
      ]))
      .match_header("user-agent", Matcher::Regex("^folio/".into()))
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(serde_json::json!([repo_json("a"), repo_json("b")]).to_string())
      .create_async()
      .await;

    let repos = client_for(&server).list_user_repos("o").await.unwrap();

    mock.assert_async().await;
    assert_eq!(repos.len(), 2);
    assert_eq!(repos[0].name, "a");
    assert!(repos.iter().all(|r| !r.is_collab));
  }

  #[tokio::test]
  async fn test_list_user_repos_rate_limited_is_error() {
    let mut server = Server::new_async().await;
    server
      .mock("GET", "/users/o/repos")
      .match_query(Matcher::Any)
      .with_status(403)
      .with_body(r#"{"message":"API rate limit exceeded"}"#)
      .create_async()
      .await;

    let err = client_for(&server).list_user_repos("o").await.unwrap_err();
    assert!(err.to_string().contains("403"));
  }

  #[tokio::test]
  async fn test_get_repo_not_found_is_none() {
    let mut server = Server::new_async().await;
    server
      .mock("GET", "/repos/o/missing")
      .with_status(404)
      .create_async()
      .await;

    let repo = client_for(&server).get_repo("o", "missing").await.unwrap();
    assert!(repo.is_none());
  }

  #[tokio::test]
  async fn test_get_repo_server_error_is_error() {
    let mut server = Server::new_async().await;
    server
      .mock("GET", "/repos/o/a")
      .with_status(502)
      .create_async()
      .await;

    assert!(client_for(&server).get_repo("o", "a").await.is_err());
  }

  #[test]
  fn test_endpoint_keeps_base_path() {
    let client = GithubClient::new(&GithubConfig {
      api_url: "https://ghe.example.com/api/v3/".to_string(),
      request_timeout_secs: 5,
    })
    .unwrap();

    let url = client.endpoint(&["repos", "o", "a"]);
    assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/repos/o/a");
  }

  #[test]
  fn test_invalid_base_url_is_error() {
    let result = GithubClient::new(&GithubConfig {
      api_url: "not a url".to_string(),
      request_timeout_secs: 5,
    });
    assert!(result.is_err());
  }
}
