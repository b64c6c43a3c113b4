use crate::types::{ThreatEvent, ThreatSeverity};
use serde::Serialize;

const HOUR_MS: u64 = 60 * 60 * 1000;
const TIMELINE_HOURS: u64 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyBucket {
  // UTC
  pub hour: u8,
  pub label: String,
  pub threats: usize,
  pub high: usize,
  pub medium: usize,
  pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeverityCount {
  pub severity: ThreatSeverity,
  pub name: &'static str,
  pub count: usize,
}

pub fn hour_of_day(unix_ms: u64) -> u8 {
  ((unix_ms / HOUR_MS) % 24) as u8
}

// Oldest first. Buckets match on hour of day only; the date is ignored.
pub fn hourly_timeline<'a>(
  threats: impl IntoIterator<Item = &'a ThreatEvent>,
  now_unix_ms: u64,
) -> Vec<HourlyBucket> {
  let mut buckets: Vec<HourlyBucket> = (0..TIMELINE_HOURS)
    .map(|i| {
      let at = now_unix_ms.saturating_sub((TIMELINE_HOURS - 1 - i) * HOUR_MS);
      let hour = hour_of_day(at);
      HourlyBucket {
        hour,
        label: format!("{hour:02}"),
        threats: 0,
        high: 0,
        medium: 0,
        low: 0,
      }
    })
    .collect();

  for t in threats {
    let hour = hour_of_day(t.timestamp_unix_ms);
    let Some(bucket) = buckets.iter_mut().find(|b| b.hour == hour) else {
      continue;
    };
    bucket.threats += 1;
    match t.severity {
      ThreatSeverity::High | ThreatSeverity::Critical => bucket.high += 1,
      ThreatSeverity::Medium => bucket.medium += 1,
      ThreatSeverity::Low => bucket.low += 1,
    }
  }

  buckets
}

pub fn severity_distribution<'a>(
  threats: impl IntoIterator<Item = &'a ThreatEvent>,
) -> Vec<SeverityCount> {
  let mut counts = [0usize; 4];
  for t in threats {
    counts[t.severity as usize] += 1;
  }

  [
    (ThreatSeverity::Low, "Low"),
    (ThreatSeverity::Medium, "Medium"),
    (ThreatSeverity::High, "High"),
    (ThreatSeverity::Critical, "Critical"),
  ]
  .into_iter()
  .map(|(severity, name)| SeverityCount {
    severity,
    name,
    count: counts[severity as usize],
  })
  .filter(|c| c.count > 0)
  .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seed;

  // 2023-11-14T22:13:20Z
  const NOW: u64 = 1_700_000_000_000;

  #[test]
  fn timeline_has_24_distinct_hours_ending_now() {
    let buckets = hourly_timeline(std::iter::empty::<&ThreatEvent>(), NOW);
    assert_eq!(buckets.len(), 24);
    assert_eq!(buckets.last().map(|b| b.hour), Some(22));
    assert_eq!(buckets.first().map(|b| b.hour), Some(23));
    assert_eq!(buckets[23].label, "22");
    assert_eq!(buckets[0].label, "23");
    assert!(buckets.iter().all(|b| b.threats == 0));
  }

  #[test]
  fn seed_threats_land_in_their_hours() {
    let seed = seed::threats(NOW);
    let buckets = hourly_timeline(seed.iter(), NOW);
    let total: usize = buckets.iter().map(|b| b.threats).sum();
    assert_eq!(total, 5);

    // 22:13 minus 5..45 minutes: 22:08, 22:03 | 21:53, 21:43, 21:28.
    let current = &buckets[23];
    assert_eq!(current.threats, 2);
    assert_eq!((current.high, current.medium, current.low), (1, 1, 0));
    let previous = &buckets[22];
    assert_eq!(previous.threats, 3);
    assert_eq!((previous.high, previous.medium, previous.low), (1, 1, 1));
  }

  #[test]
  fn timeline_ignores_date() {
    let mut t = seed::threats(NOW).remove(0);
    t.timestamp_unix_ms = NOW - 48 * HOUR_MS;
    let buckets = hourly_timeline([&t], NOW);
    assert_eq!(buckets[23].threats, 1);
  }

  #[test]
  fn distribution_skips_empty_severities() {
    let seed = seed::threats(NOW);
    let dist = severity_distribution(seed.iter());
    assert_eq!(
      dist
        .iter()
        .map(|c| (c.name, c.count))
        .collect::<Vec<_>>(),
      vec![("Low", 1), ("Medium", 2), ("High", 2)]
    );
  }

  #[test]
  fn critical_counts_as_high_in_timeline() {
    let mut t = seed::threats(NOW).remove(0);
    t.severity = ThreatSeverity::Critical;
    let buckets = hourly_timeline([&t], NOW);
    assert_eq!(buckets.iter().map(|b| b.high).sum::<usize>(), 1);
    let dist = severity_distribution([&t]);
    assert_eq!(dist.len(), 1);
    assert_eq!(dist[0].name, "Critical");
  }
}
