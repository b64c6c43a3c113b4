use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatCategory {
  Malware,
  Phishing,
  NetworkIntrusion,
  Ddos,
  InsiderThreat,
  ZeroDay,
  BruteForce,
  DataExfiltration,
  SuspiciousBehavior,
  InvalidIp,
  MaliciousFile,
}

impl ThreatCategory {
  pub const ALL: [ThreatCategory; 11] = [
    ThreatCategory::Malware,
    ThreatCategory::Phishing,
    ThreatCategory::NetworkIntrusion,
    ThreatCategory::Ddos,
    ThreatCategory::InsiderThreat,
    ThreatCategory::ZeroDay,
    ThreatCategory::BruteForce,
    ThreatCategory::DataExfiltration,
    ThreatCategory::SuspiciousBehavior,
    ThreatCategory::InvalidIp,
    ThreatCategory::MaliciousFile,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      ThreatCategory::Malware => "malware",
      ThreatCategory::Phishing => "phishing",
      ThreatCategory::NetworkIntrusion => "network_intrusion",
      ThreatCategory::Ddos => "ddos",
      ThreatCategory::InsiderThreat => "insider_threat",
      ThreatCategory::ZeroDay => "zero_day",
      ThreatCategory::BruteForce => "brute_force",
      ThreatCategory::DataExfiltration => "data_exfiltration",
      ThreatCategory::SuspiciousBehavior => "suspicious_behavior",
      ThreatCategory::InvalidIp => "invalid_ip",
      ThreatCategory::MaliciousFile => "malicious_file",
    }
  }
}

impl std::fmt::Display for ThreatCategory {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// Variant order is the escalation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatSeverity {
  Low,
  Medium,
  High,
  Critical,
}

impl ThreatSeverity {
  pub fn as_str(self) -> &'static str {
    match self {
      ThreatSeverity::Low => "low",
      ThreatSeverity::Medium => "medium",
      ThreatSeverity::High => "high",
      ThreatSeverity::Critical => "critical",
    }
  }

  pub fn is_high(self) -> bool {
    self >= ThreatSeverity::High
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatStatus {
  Active,
  Mitigated,
  Investigating,
  Resolved,
}

impl ThreatStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      ThreatStatus::Active => "active",
      ThreatStatus::Mitigated => "mitigated",
      ThreatStatus::Investigating => "investigating",
      ThreatStatus::Resolved => "resolved",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
  pub ip: String,
  pub country: String,
  pub city: String,
}

// Category-dependent extras. Never validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatMetadata {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub file_hash: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub process_id: Option<u32>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub user_id: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub port: Option<u16>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub protocol: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatEvent {
  pub id: String,
  pub timestamp_unix_ms: u64,
  pub category: ThreatCategory,
  pub severity: ThreatSeverity,
  pub status: ThreatStatus,
  pub title: String,
  pub description: String,
  pub source: String,
  pub target: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub action_taken: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub mitigation: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub location: Option<Location>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub metadata: Option<ThreatMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityMetrics {
  pub threats_detected: u64,
  pub threats_mitigated: u64,
  pub threats_blocked: u64,
  pub systems_protected: u64,
  // In [0, 100]; only ever increases.
  pub risk_score: f64,
  pub last_scan_unix_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
  Safe,
  Warning,
  Danger,
}

impl OverallStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      OverallStatus::Safe => "safe",
      OverallStatus::Warning => "warning",
      OverallStatus::Danger => "danger",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStatus {
  pub overall: OverallStatus,
  pub firewall: bool,
  pub antivirus: bool,
  pub real_time_protection: bool,
  pub last_update_unix_ms: u64,
  pub connected_devices: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTriggers {
  pub severity: Vec<ThreatSeverity>,
  pub categories: Vec<ThreatCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleActions {
  #[serde(default)]
  pub isolate: bool,
  #[serde(default)]
  pub block_ip: bool,
  #[serde(default)]
  pub quarantine: bool,
  #[serde(default)]
  pub notify: bool,
  #[serde(default)]
  pub escalate: bool,
}

impl RuleActions {
  pub fn names(&self) -> Vec<&'static str> {
    let mut out = Vec::new();
    if self.isolate {
      out.push("isolate");
    }
    if self.block_ip {
      out.push("block_ip");
    }
    if self.quarantine {
      out.push("quarantine");
    }
    if self.notify {
      out.push("notify");
    }
    if self.escalate {
      out.push("escalate");
    }
    out
  }
}

// Rules are data only. Nothing matches them against incoming events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationRule {
  pub id: String,
  pub name: String,
  pub description: String,
  pub enabled: bool,
  pub triggers: RuleTriggers,
  pub actions: RuleActions,
}

pub fn now_unix_ms() -> u64 {
  use std::time::{SystemTime, UNIX_EPOCH};
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .unwrap_or_default()
    .as_millis() as u64
}
