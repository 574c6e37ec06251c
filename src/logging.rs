use color_eyre::{eyre::eyre, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

const LOG_FILE: &str = "folio.log";

/// Default log location: $XDG_DATA_HOME/folio/folio.log
pub fn default_path() -> PathBuf {
  dirs::data_dir()
    .unwrap_or_else(std::env::temp_dir)
    .join("folio")
    .join(LOG_FILE)
}

/// Build the filter: `RUST_LOG` wins over the configured level.
fn env_filter(level: &str) -> EnvFilter {
  EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Split a log path into its directory and file name
fn split_path(path: &Path) -> Result<(PathBuf, String)> {
  let file = path
    .file_name()
    .and_then(|f| f.to_str())
    .ok_or_else(|| eyre!("Invalid log file path: {}", path.display()))?
    .to_string();
  let dir = path
    .parent()
    .filter(|p| !p.as_os_str().is_empty())
    .map(Path::to_path_buf)
    .unwrap_or_else(|| PathBuf::from("."));
  Ok((dir, file))
}

/// Install the global subscriber writing to the log file.
///
/// The terminal belongs to the TUI, so nothing is ever written to stdout.
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init(config: &LogConfig) -> Result<WorkerGuard> {
  let path = config.file.clone().unwrap_or_else(default_path);
  let (dir, file) = split_path(&path)?;
  std::fs::create_dir_all(&dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let (writer, guard) = tracing_appender::non_blocking(rolling::never(&dir, file));

  let file_layer = tracing_subscriber::fmt::layer()
    .with_writer(writer)
    .with_ansi(false)
    .with_target(true);

  tracing_subscriber::registry()
    .with(env_filter(&config.level))
    .with(file_layer)
    .try_init()
    .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

  Ok(guard)
}
