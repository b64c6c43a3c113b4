use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct Config {
  pub simulation: SimulationConfig,
  pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
  #[serde(default = "default_tick_seconds")]
  pub tick_seconds: u64,

  #[serde(default = "default_emit_probability")]
  pub emit_probability: f64,

  #[serde(default = "default_scan_seconds")]
  pub scan_seconds: u64,
}

impl SimulationConfig {
  pub fn tick_period(&self) -> Duration {
    Duration::from_secs(self.tick_seconds)
  }

  pub fn scan_duration(&self) -> Duration {
    Duration::from_secs(self.scan_seconds)
  }

  pub fn validate(&self) -> Option<String> {
    if self.tick_seconds == 0 {
      return Some("tick_seconds must be > 0".to_string());
    }
    if self.scan_seconds == 0 {
      return Some("scan_seconds must be > 0".to_string());
    }
    if !(0.0..=1.0).contains(&self.emit_probability) {
      return Some(format!(
        "emit_probability must be within [0, 1]: {}",
        self.emit_probability
      ));
    }
    None
  }

  pub fn or_default_if_invalid(self) -> Self {
    match self.validate() {
      None => self,
      Some(reason) => {
        tracing::warn!(
          reason = %reason,
          "simulation config invalid; using defaults"
        );
        Self::default()
      }
    }
  }
}

impl Default for SimulationConfig {
  fn default() -> Self {
    Self {
      tick_seconds: default_tick_seconds(),
      emit_probability: default_emit_probability(),
      scan_seconds: default_scan_seconds(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
  #[serde(default = "default_log_level")]
  pub level: String,

  #[serde(default = "default_retention_days")]
  pub retention_days: u64,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: default_log_level(),
      retention_days: default_retention_days(),
    }
  }
}

fn default_tick_seconds() -> u64 {
  10
}

fn default_emit_probability() -> f64 {
  0.3
}

fn default_scan_seconds() -> u64 {
  3
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_retention_days() -> u64 {
  14
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
  #[serde(default)]
  pub simulation: Option<SimulationConfig>,

  #[serde(default)]
  pub logging: Option<LoggingConfig>,
}

impl ConfigFile {
  fn normalize(self) -> Config {
    let mut cfg = Config::default();
    if let Some(s) = self.simulation {
      cfg.simulation = s.or_default_if_invalid();
    }
    if let Some(l) = self.logging {
      cfg.logging = l;
    }
    cfg
  }

  fn needs_upgrade(&self) -> bool {
    self.simulation.is_none() || self.logging.is_none()
  }
}

pub fn load_or_create_default(path: &Path) -> anyhow::Result<Config> {
  let parent = path
    .parent()
    .ok_or_else(|| anyhow::anyhow!("config path has no parent: {}", path.display()))?;
  fs::create_dir_all(parent)?;

  if !path.exists() {
    let cfg = Config::default();
    write_atomic(path, &toml::to_string_pretty(&to_config_file(&cfg))?)?;
    return Ok(cfg);
  }

  let raw = fs::read_to_string(path)?;
  match toml::from_str::<ConfigFile>(&raw) {
    Ok(file) => {
      let needs_upgrade = file.needs_upgrade();
      let cfg = file.normalize();
      if needs_upgrade {
        let backup = parent.join(format!("config.toml.bak-{}", unix_seconds()));
        let _ = fs::copy(path, &backup);
        let _ = write_atomic(path, &toml::to_string_pretty(&to_config_file(&cfg))?);
        eprintln!(
          "Saviour: upgraded config defaults written to {} (backup: {})",
          path.display(),
          backup.display()
        );
      }
      Ok(cfg)
    }
    Err(e) => {
      let cfg = Config::default();
      let backup = parent.join(format!("config.toml.bad-{}", unix_seconds()));
      let _ = fs::rename(path, &backup);
      write_atomic(path, &toml::to_string_pretty(&to_config_file(&cfg))?)?;
      eprintln!(
        "Saviour: invalid config at {} (backed up to {}): {e}",
        path.display(),
        backup.display()
      );
      Ok(cfg)
    }
  }
}

fn to_config_file(cfg: &Config) -> ConfigFile {
  ConfigFile {
    simulation: Some(cfg.simulation.clone()),
    logging: Some(cfg.logging.clone()),
  }
}

fn unix_seconds() -> u64 {
  std::time::SystemTime::now()
    .duration_since(std::time::UNIX_EPOCH)
    .unwrap_or_default()
    .as_secs()
}

fn write_atomic(path: &Path, contents: &str) -> anyhow::Result<()> {
  let parent = path
    .parent()
    .ok_or_else(|| anyhow::anyhow!("file path has no parent: {}", path.display()))?;
  let tmp = parent.join(format!(
    ".{}.tmp",
    path.file_name().unwrap_or_default().to_string_lossy()
  ));

  fs::write(&tmp, contents)?;
  fs::rename(&tmp, path)?;
  Ok(())
}
