use crate::charts::{self, HourlyBucket, SeverityCount};
use crate::config::SimulationConfig;
use crate::generator;
use crate::scheduler::{Scheduler, TimerHandle};
use crate::seed;
use crate::types::{SecurityMetrics, SystemStatus, ThreatEvent};
use crate::window::EventWindow;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::time::Duration;

const RISK_SCORE_MAX: f64 = 100.0;
const MAX_RISK_INCREMENT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
  Tick,
  ScanComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanRequest {
  Started,
  AlreadyRunning,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
  pub revision: u64,
  pub now_unix_ms: u64,
  pub threats: Vec<ThreatEvent>,
  pub metrics: SecurityMetrics,
  pub status: SystemStatus,
  pub scanning: bool,
  pub active_threats: usize,
  pub high_severity_threats: usize,
  pub timeline: Vec<HourlyBucket>,
  pub severity_distribution: Vec<SeverityCount>,
}

pub struct Dashboard {
  settings: SimulationConfig,
  scheduler: Scheduler<Task>,
  window: EventWindow,
  metrics: SecurityMetrics,
  status: SystemStatus,
  scanning: bool,
  tick_timer: Option<TimerHandle>,
  scan_timer: Option<TimerHandle>,
  rng: StdRng,
  revision: u64,
}

impl Dashboard {
  pub fn new(settings: SimulationConfig, now_unix_ms: u64) -> Self {
    Self::with_rng(settings, now_unix_ms, StdRng::from_entropy())
  }

  // Out-of-range settings fall back to defaults so `tick` never panics.
  pub fn with_rng(settings: SimulationConfig, now_unix_ms: u64, rng: StdRng) -> Self {
    Self {
      window: EventWindow::with_seed(seed::threats(now_unix_ms)),
      metrics: seed::metrics(now_unix_ms),
      status: seed::system_status(now_unix_ms),
      scheduler: Scheduler::starting_at(now_unix_ms),
      scanning: false,
      tick_timer: None,
      scan_timer: None,
      rng,
      revision: 0,
      settings: settings.or_default_if_invalid(),
    }
  }

  // At most one periodic tick is ever pending.
  pub fn mount(&mut self) {
    if self.tick_timer.is_some() {
      return;
    }
    let period = self.settings.tick_period();
    self.tick_timer = Some(self.scheduler.schedule_every(period, Task::Tick));
    tracing::debug!(period_seconds = period.as_secs(), "dashboard mounted");
  }

  // A scan in flight is abandoned: the busy flag clears and `last_scan` keeps
  // its previous value.
  pub fn unmount(&mut self) {
    if let Some(h) = self.tick_timer.take() {
      self.scheduler.cancel(h);
    }
    if let Some(h) = self.scan_timer.take() {
      self.scheduler.cancel(h);
      tracing::info!("scan abandoned on teardown");
    }
    if self.scanning {
      self.scanning = false;
      self.bump();
    }
    tracing::debug!("dashboard unmounted");
  }

  pub fn is_mounted(&self) -> bool {
    self.tick_timer.is_some()
  }

  pub fn tick(&mut self) -> Option<&ThreatEvent> {
    if !self.rng.gen_bool(self.settings.emit_probability) {
      tracing::trace!("tick: no new threat");
      return None;
    }

    let now = self.scheduler.now_unix_ms();
    let threat = generator::generate_with(&mut self.rng, now);
    let increment = self.rng.gen_range(0.0..MAX_RISK_INCREMENT);
    self.record(threat, increment);
    self.window.newest()
  }

  fn record(&mut self, threat: ThreatEvent, risk_increment: f64) {
    tracing::info!(
      threat_id = %threat.id,
      category = %threat.category,
      severity = threat.severity.as_str(),
      status = threat.status.as_str(),
      "threat detected: {}",
      threat.title
    );

    self.window.push(threat);
    self.metrics.threats_detected += 1;
    let raised = (self.metrics.risk_score + risk_increment.max(0.0)).min(RISK_SCORE_MAX);
    self.metrics.risk_score = self.metrics.risk_score.max(raised);
    tracing::debug!(risk_score = self.metrics.risk_score, "risk score updated");
    self.bump();
  }

  pub fn start_scan(&mut self) -> ScanRequest {
    if self.scanning {
      tracing::debug!("scan requested while busy; ignored");
      return ScanRequest::AlreadyRunning;
    }
    self.scanning = true;
    self.scan_timer = Some(
      self
        .scheduler
        .schedule_once(self.settings.scan_duration(), Task::ScanComplete),
    );
    tracing::info!(started_at_unix_ms = self.scheduler.now_unix_ms(), "scan started");
    self.bump();
    ScanRequest::Started
  }

  fn complete_scan(&mut self) {
    self.scan_timer = None;
    self.scanning = false;
    self.metrics.last_scan_unix_ms = self.scheduler.now_unix_ms();
    tracing::info!(
      last_scan_unix_ms = self.metrics.last_scan_unix_ms,
      "scan complete"
    );
    self.bump();
  }

  pub fn is_scanning(&self) -> bool {
    self.scanning
  }

  pub fn advance(&mut self, by: Duration) {
    let ms = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
    let target = self.scheduler.now_unix_ms().saturating_add(ms);
    self.advance_to(target);
  }

  pub fn advance_to(&mut self, unix_ms: u64) {
    while let Some((_, task)) = self.scheduler.pop_due(unix_ms) {
      match task {
        Task::Tick => {
          self.tick();
        }
        Task::ScanComplete => self.complete_scan(),
      }
    }
    self.scheduler.advance_to(unix_ms);
  }

  pub fn now_unix_ms(&self) -> u64 {
    self.scheduler.now_unix_ms()
  }

  pub fn threats(&self) -> &EventWindow {
    &self.window
  }

  pub fn metrics(&self) -> &SecurityMetrics {
    &self.metrics
  }

  pub fn status(&self) -> &SystemStatus {
    &self.status
  }

  pub fn active_threat_count(&self) -> usize {
    self.window.active_count()
  }

  pub fn high_severity_count(&self) -> usize {
    self.window.high_severity_count()
  }

  pub fn revision(&self) -> u64 {
    self.revision
  }

  pub fn snapshot(&self) -> Snapshot {
    let now = self.now_unix_ms();
    Snapshot {
      revision: self.revision,
      now_unix_ms: now,
      threats: self.window.iter().cloned().collect(),
      metrics: self.metrics.clone(),
      status: self.status.clone(),
      scanning: self.scanning,
      active_threats: self.active_threat_count(),
      high_severity_threats: self.high_severity_count(),
      timeline: charts::hourly_timeline(self.window.iter(), now),
      severity_distribution: charts::severity_distribution(self.window.iter()),
    }
  }

  fn bump(&mut self) {
    self.revision = self.revision.wrapping_add(1);
  }
}
