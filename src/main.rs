mod app;
mod cache;
mod config;
mod console;
mod event;
mod github;
mod logging;
mod profile;
mod ui;

use cache::{AnyStorage, NoopStorage, SqliteStorage};
use clap::Parser;
use color_eyre::Result;
use github::{GithubClient, ProviderSettings, RepositoryProvider};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "A terminal portfolio: browse GitHub projects from a shell-like TUI")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./folio.yaml or $XDG_CONFIG_HOME/folio/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Keep the repository cache in memory only
  #[arg(long)]
  no_cache: bool,

  /// Log filter directive, e.g. "debug" or "folio=trace"
  #[arg(long)]
  log_level: Option<String>,
}

/// Pick the durable cache tier. An unusable database degrades to memory only.
fn open_storage(config: &config::CacheConfig, disabled: bool) -> AnyStorage {
  if disabled || !config.enabled {
    info!("durable cache disabled");
    return AnyStorage::Noop(NoopStorage);
  }

  let opened = match &config.path {
    Some(path) => SqliteStorage::open_at(path),
    None => SqliteStorage::open(),
  };
  match opened {
    Ok(storage) => AnyStorage::Sqlite(storage),
    Err(e) => {
      warn!(error = %e, "cache database unavailable, caching in memory only");
      AnyStorage::Noop(NoopStorage)
    }
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Override log level if specified on command line
  if let Some(level) = args.log_level {
    config.log.level = level;
  }

  let _guard = logging::init(&config.log)?;
  info!(version = env!("CARGO_PKG_VERSION"), "starting folio");

  let client = GithubClient::new(&config.github)?;
  let storage = open_storage(&config.cache, args.no_cache);
  let provider = RepositoryProvider::new(client, storage, ProviderSettings::default());

  // Initialize and run the app
  let mut app = app::App::new(config, Arc::new(provider));
  app.run().await?;

  Ok(())
}
