use crate::config::LoggingConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "saviour.log";
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

pub fn init(log_dir: &Path, cfg: &LoggingConfig, stderr: bool) -> anyhow::Result<()> {
  fs::create_dir_all(log_dir)?;

  let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
  let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
  let _ = FILE_GUARD.set(guard);

  let file_layer = tracing_subscriber::fmt::layer()
    .with_ansi(false)
    .with_writer(file_writer)
    .with_target(true);

  let stderr_layer = stderr.then(|| {
    tracing_subscriber::fmt::layer()
      .with_ansi(false)
      .with_writer(std::io::stderr)
      .with_target(false)
  });

  tracing_subscriber::registry()
    .with(level_filter(&cfg.level))
    .with(file_layer)
    .with(stderr_layer)
    .try_init()?;

  let removed = remove_expired(log_dir, cfg.retention_days, SystemTime::now());
  if !removed.is_empty() {
    tracing::info!(count = removed.len(), "removed expired log files");
  }
  Ok(())
}

fn level_filter(level: &str) -> EnvFilter {
  EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

// retention_days = 0 keeps everything.
fn remove_expired(log_dir: &Path, retention_days: u64, now: SystemTime) -> Vec<PathBuf> {
  expired_log_files(log_dir, retention_days, now)
    .into_iter()
    .filter(|path| match fs::remove_file(path) {
      Ok(()) => true,
      Err(e) => {
        tracing::warn!(path = %path.display(), error = %e, "could not remove expired log file");
        false
      }
    })
    .collect()
}

fn expired_log_files(log_dir: &Path, retention_days: u64, now: SystemTime) -> Vec<PathBuf> {
  if retention_days == 0 {
    return Vec::new();
  }
  let cutoff = now
    .checked_sub(DAY.saturating_mul(u32::try_from(retention_days).unwrap_or(u32::MAX)))
    .unwrap_or(SystemTime::UNIX_EPOCH);

  let Ok(entries) = fs::read_dir(log_dir) else {
    return Vec::new();
  };

  let mut out: Vec<PathBuf> = entries
    .flatten()
    .filter(|entry| is_rolled_log(&entry.path()))
    .filter(|entry| {
      entry
        .metadata()
        .and_then(|m| m.modified())
        .map(|modified| modified < cutoff)
        .unwrap_or(false)
    })
    .map(|entry| entry.path())
    .collect();
  out.sort();
  out
}

fn is_rolled_log(path: &Path) -> bool {
  path
    .file_name()
    .and_then(|n| n.to_str())
    .is_some_and(|name| name == LOG_FILE_NAME || name.starts_with(&format!("{LOG_FILE_NAME}.")))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn fixture() -> (tempfile::TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let rolled = dir.path().join("saviour.log.2026-10-19");
    let unrelated = dir.path().join("notes.txt");
    fs::write(&rolled, "x").unwrap();
    fs::write(&unrelated, "y").unwrap();
    (dir, rolled, unrelated)
  }

  #[test]
  fn recognizes_rolled_log_files_only() {
    assert!(is_rolled_log(Path::new("/tmp/logs/saviour.log")));
    assert!(is_rolled_log(Path::new("/tmp/logs/saviour.log.2026-10-19")));
    assert!(!is_rolled_log(Path::new("/tmp/logs/other.log")));
    assert!(!is_rolled_log(Path::new("/tmp/logs/config.toml")));
  }

  #[test]
  fn fresh_files_are_kept() {
    let (dir, rolled, unrelated) = fixture();
    assert!(remove_expired(dir.path(), 14, SystemTime::now()).is_empty());
    assert!(rolled.exists());
    assert!(unrelated.exists());
  }

  #[test]
  fn files_past_retention_are_removed() {
    let (dir, rolled, unrelated) = fixture();
    let later = SystemTime::now() + DAY * 15;

    assert_eq!(expired_log_files(dir.path(), 14, later), vec![rolled.clone()]);
    assert_eq!(remove_expired(dir.path(), 14, later), vec![rolled.clone()]);
    assert!(!rolled.exists());
    assert!(unrelated.exists());
  }

  #[test]
  fn zero_retention_keeps_everything() {
    let (dir, rolled, _) = fixture();
    let much_later = SystemTime::now() + DAY * 3650;
    assert!(expired_log_files(dir.path(), 0, much_later).is_empty());
    assert!(rolled.exists());
  }

  #[test]
  fn missing_directory_yields_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let gone = dir.path().join("absent");
    assert!(expired_log_files(&gone, 1, SystemTime::now()).is_empty());
  }
}
