use crate::types::{
  AutomationRule, Location, OverallStatus, RuleActions, RuleTriggers, SecurityMetrics,
  SystemStatus, ThreatCategory, ThreatEvent, ThreatMetadata, ThreatSeverity, ThreatStatus,
};

const MINUTE_MS: u64 = 60 * 1000;

// Newest first.
pub fn threats(now_unix_ms: u64) -> Vec<ThreatEvent> {
  let ago = |minutes: u64| now_unix_ms.saturating_sub(minutes * MINUTE_MS);

  vec![
    ThreatEvent {
      id: "1".to_string(),
      timestamp_unix_ms: ago(5),
      category: ThreatCategory::Malware,
      severity: ThreatSeverity::High,
      status: ThreatStatus::Active,
      title: "Ransomware Detection".to_string(),
      description: "Suspicious file encryption activity detected in Documents folder".to_string(),
      source: "192.168.1.100".to_string(),
      target: "DESKTOP-USER01".to_string(),
      action_taken: None,
      mitigation: None,
      location: Some(location("45.76.123.45", "Russia", "Moscow")),
      metadata: Some(ThreatMetadata {
        file_hash: Some("a1b2c3d4e5f6".to_string()),
        process_id: Some(4521),
        user_id: Some("user01".to_string()),
        ..ThreatMetadata::default()
      }),
    },
    ThreatEvent {
      id: "2".to_string(),
      timestamp_unix_ms: ago(10),
      category: ThreatCategory::BruteForce,
      severity: ThreatSeverity::Medium,
      status: ThreatStatus::Mitigated,
      title: "Multiple Failed Login Attempts".to_string(),
      description: "15 failed SSH login attempts from external IP".to_string(),
      source: "203.45.67.89".to_string(),
      target: "server.company.com".to_string(),
      action_taken: Some("IP address blocked for 24 hours".to_string()),
      mitigation: None,
      location: Some(location("203.45.67.89", "China", "Beijing")),
      metadata: Some(ThreatMetadata {
        port: Some(22),
        protocol: Some("SSH".to_string()),
        ..ThreatMetadata::default()
      }),
    },
    ThreatEvent {
      id: "3".to_string(),
      timestamp_unix_ms: ago(20),
      category: ThreatCategory::Phishing,
      severity: ThreatSeverity::Medium,
      status: ThreatStatus::Investigating,
      title: "Suspicious Email Activity".to_string(),
      description: "Email with suspicious attachment sent to multiple users".to_string(),
      source: "attacker@suspicious-domain.com".to_string(),
      target: "Multiple users".to_string(),
      action_taken: None,
      mitigation: None,
      location: None,
      metadata: Some(ThreatMetadata {
        file_hash: Some("x7y8z9a1b2c3".to_string()),
        ..ThreatMetadata::default()
      }),
    },
    ThreatEvent {
      id: "4".to_string(),
      timestamp_unix_ms: ago(30),
      category: ThreatCategory::DataExfiltration,
      severity: ThreatSeverity::High,
      status: ThreatStatus::Resolved,
      title: "Unusual Data Transfer".to_string(),
      description: "Large file transfer to external cloud service detected".to_string(),
      source: "LAPTOP-FINANCE02".to_string(),
      target: "unknown-cloud-service.com".to_string(),
      action_taken: Some("Transfer blocked, files quarantined".to_string()),
      mitigation: Some("Network access restricted for affected device".to_string()),
      location: None,
      metadata: None,
    },
    ThreatEvent {
      id: "5".to_string(),
      timestamp_unix_ms: ago(45),
      category: ThreatCategory::NetworkIntrusion,
      severity: ThreatSeverity::Low,
      status: ThreatStatus::Resolved,
      title: "Port Scan Detected".to_string(),
      description: "External scanner probing network ports".to_string(),
      source: "156.78.90.123".to_string(),
      target: "Network perimeter".to_string(),
      action_taken: Some("Firewall rule updated".to_string()),
      mitigation: None,
      location: Some(location("156.78.90.123", "United States", "New York")),
      metadata: None,
    },
  ]
}

pub fn metrics(now_unix_ms: u64) -> SecurityMetrics {
  SecurityMetrics {
    threats_detected: 247,
    threats_mitigated: 234,
    threats_blocked: 89,
    systems_protected: 156,
    risk_score: 15.0,
    last_scan_unix_ms: now_unix_ms.saturating_sub(10 * MINUTE_MS),
  }
}

pub fn system_status(now_unix_ms: u64) -> SystemStatus {
  SystemStatus {
    overall: OverallStatus::Warning,
    firewall: true,
    antivirus: true,
    real_time_protection: true,
    last_update_unix_ms: now_unix_ms.saturating_sub(60 * MINUTE_MS),
    connected_devices: 156,
  }
}

pub fn automation_rules() -> Vec<AutomationRule> {
  vec![
    AutomationRule {
      id: "rule-1".to_string(),
      name: "High Threat Auto-Isolation".to_string(),
      description: "Automatically isolate systems when high or critical threats are detected"
        .to_string(),
      enabled: true,
      triggers: RuleTriggers {
        severity: vec![ThreatSeverity::High, ThreatSeverity::Critical],
        categories: vec![ThreatCategory::Malware, ThreatCategory::DataExfiltration],
      },
      actions: RuleActions {
        isolate: true,
        notify: true,
        escalate: true,
        ..RuleActions::default()
      },
    },
    AutomationRule {
      id: "rule-2".to_string(),
      name: "Brute Force Protection".to_string(),
      description: "Block IPs after multiple failed login attempts".to_string(),
      enabled: true,
      triggers: RuleTriggers {
        severity: vec![ThreatSeverity::Medium, ThreatSeverity::High],
        categories: vec![ThreatCategory::BruteForce],
      },
      actions: RuleActions {
        block_ip: true,
        notify: true,
        ..RuleActions::default()
      },
    },
    AutomationRule {
      id: "rule-3".to_string(),
      name: "Malicious File Quarantine".to_string(),
      description: "Quarantine detected malicious files".to_string(),
      enabled: true,
      triggers: RuleTriggers {
        severity: vec![
          ThreatSeverity::Medium,
          ThreatSeverity::High,
          ThreatSeverity::Critical,
        ],
        categories: vec![ThreatCategory::Malware, ThreatCategory::MaliciousFile],
      },
      actions: RuleActions {
        quarantine: true,
        notify: true,
        ..RuleActions::default()
      },
    },
  ]
}

fn location(ip: &str, country: &str, city: &str) -> Location {
  Location {
    ip: ip.to_string(),
    country: country.to_string(),
    city: city.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  #[test]
  fn seed_window_is_newest_first_with_unique_ids() {
    let now = 1_700_000_000_000u64;
    let seed = threats(now);
    assert_eq!(seed.len(), 5);
    assert!(seed
      .windows(2)
      .all(|w| w[0].timestamp_unix_ms > w[1].timestamp_unix_ms));
    let ids: HashSet<_> = seed.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids.len(), 5);
  }

  #[test]
  fn seed_statuses_match_dashboard_fixture() {
    let statuses: Vec<_> = threats(0).iter().map(|t| t.status).collect();
    assert_eq!(
      statuses,
      vec![
        ThreatStatus::Active,
        ThreatStatus::Mitigated,
        ThreatStatus::Investigating,
        ThreatStatus::Resolved,
        ThreatStatus::Resolved,
      ]
    );
  }

  #[test]
  fn initial_metrics_and_status() {
    let now = 1_700_000_000_000u64;
    let m = metrics(now);
    assert_eq!(m.threats_detected, 247);
    assert_eq!(m.risk_score, 15.0);
    assert_eq!(m.last_scan_unix_ms, now - 600_000);

    let s = system_status(now);
    assert_eq!(s.overall, OverallStatus::Warning);
    assert!(s.firewall && s.antivirus && s.real_time_protection);
    assert_eq!(s.last_update_unix_ms, now - 3_600_000);
  }

  #[test]
  fn automation_rules_are_enabled_data() {
    let rules = automation_rules();
    assert_eq!(
      rules.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
      vec!["rule-1", "rule-2", "rule-3"]
    );
    assert!(rules.iter().all(|r| r.enabled));
  }
}
