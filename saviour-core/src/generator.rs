use crate::types::{
  now_unix_ms, ThreatCategory, ThreatEvent, ThreatMetadata, ThreatSeverity, ThreatStatus,
};
use rand::Rng;

// Generation draws from narrower sets than the type enumerations. The other
// categories, `critical` and `resolved` only ever come from seed data.
pub const GENERATED_CATEGORIES: [ThreatCategory; 5] = [
  ThreatCategory::Malware,
  ThreatCategory::Phishing,
  ThreatCategory::NetworkIntrusion,
  ThreatCategory::BruteForce,
  ThreatCategory::SuspiciousBehavior,
];

pub const GENERATED_SEVERITIES: [ThreatSeverity; 3] = [
  ThreatSeverity::Low,
  ThreatSeverity::Medium,
  ThreatSeverity::High,
];

pub const GENERATED_STATUSES: [ThreatStatus; 3] = [
  ThreatStatus::Active,
  ThreatStatus::Investigating,
  ThreatStatus::Mitigated,
];

const SOURCE_SUBNETS: [&str; 3] = ["192.168.1.", "10.0.0.", "172.16.0."];

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn titles(category: ThreatCategory) -> &'static [&'static str; 3] {
  match category {
    ThreatCategory::Malware => &[
      "Trojan detected in system files",
      "Suspicious executable found",
      "Virus signature match",
    ],
    ThreatCategory::Phishing => &[
      "Suspicious email link clicked",
      "Fake login page detected",
      "Social engineering attempt",
    ],
    ThreatCategory::NetworkIntrusion => &[
      "Unauthorized access attempt",
      "Port scanning activity",
      "Suspicious network traffic",
    ],
    ThreatCategory::BruteForce => &[
      "Multiple login failures",
      "Password attack detected",
      "Account lockout triggered",
    ],
    _ => &[
      "Unusual file access pattern",
      "Abnormal network activity",
      "Process behavior anomaly",
    ],
  }
}

pub fn generate() -> ThreatEvent {
  generate_with(&mut rand::thread_rng(), now_unix_ms())
}

pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, now_unix_ms: u64) -> ThreatEvent {
  let category = pick(rng, &GENERATED_CATEGORIES);
  let severity = pick(rng, &GENERATED_SEVERITIES);
  let status = pick(rng, &GENERATED_STATUSES);
  let title = pick(rng, titles(category));

  let subnet = pick(rng, &SOURCE_SUBNETS);
  let source = format!("{subnet}{}", rng.gen_range(0..255u32));
  let target = format!("System-{}", rng.gen_range(0..100u32));

  let metadata = ThreatMetadata {
    process_id: Some(rng.gen_range(0..9999u32)),
    port: Some(rng.gen_range(0..u16::MAX)),
    ..ThreatMetadata::default()
  };

  ThreatEvent {
    id: new_id(rng, now_unix_ms),
    timestamp_unix_ms: now_unix_ms,
    category,
    severity,
    status,
    title: title.to_string(),
    description: format!("Automated threat detection system flagged this {category} activity"),
    source,
    target,
    action_taken: None,
    mitigation: None,
    location: None,
    metadata: Some(metadata),
  }
}

fn pick<R: Rng + ?Sized, T: Copy>(rng: &mut R, items: &[T]) -> T {
  items[rng.gen_range(0..items.len())]
}

fn new_id<R: Rng + ?Sized>(rng: &mut R, now_unix_ms: u64) -> String {
  let suffix: String = (0..ID_SUFFIX_LEN)
    .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
    .collect();
  format!("{now_unix_ms}{suffix}")
}
