use std::path::{Path, PathBuf};

pub const HOME_ENV: &str = "SAVIOUR_HOME";

pub fn base_dir() -> anyhow::Result<PathBuf> {
  if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
    return Ok(PathBuf::from(home));
  }
  Ok(std::env::current_dir()?.join(".saviour"))
}

pub fn config_path(base: &Path) -> PathBuf {
  base.join("config.toml")
}

pub fn logs_dir(base: &Path) -> PathBuf {
  base.join("logs")
}
