pub mod api_types;
pub mod cache;
pub mod client;
pub mod provider;
pub mod types;

pub use client::GithubClient;
pub use provider::{ProviderSettings, RepoSource, RepositoryProvider};
pub use types::{format_repo, RepoView, Repository};
