use crate::types::{ThreatEvent, ThreatStatus};
use std::collections::VecDeque;

pub const WINDOW_CAPACITY: usize = 20;

// Newest first. Events are never mutated once pushed; the oldest fall off the back.
#[derive(Debug, Clone)]
pub struct EventWindow {
  events: VecDeque<ThreatEvent>,
}

impl EventWindow {
  pub fn with_seed(seed: Vec<ThreatEvent>) -> Self {
    let mut events: VecDeque<ThreatEvent> = seed.into();
    events.truncate(WINDOW_CAPACITY);
    Self { events }
  }

  pub fn push(&mut self, event: ThreatEvent) {
    self.events.push_front(event);
    self.events.truncate(WINDOW_CAPACITY);
  }

  pub fn newest(&self) -> Option<&ThreatEvent> {
    self.events.front()
  }

  pub fn iter(&self) -> impl Iterator<Item = &ThreatEvent> + '_ {
    self.events.iter()
  }

  pub fn active_count(&self) -> usize {
    self
      .events
      .iter()
      .filter(|t| t.status == ThreatStatus::Active)
      .count()
  }

  pub fn high_severity_count(&self) -> usize {
    self.events.iter().filter(|t| t.severity.is_high()).count()
  }

  #[cfg(test)]
  pub(crate) fn len(&self) -> usize {
    self.events.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seed;

  fn event(id: &str) -> ThreatEvent {
    let mut t = seed::threats(0).remove(0);
    t.id = id.to_string();
    t
  }

  #[test]
  fn push_prepends_and_caps() {
    let mut w = EventWindow::with_seed(Vec::new());
    for i in 0..(WINDOW_CAPACITY + 5) {
      w.push(event(&i.to_string()));
      assert!(w.len() <= WINDOW_CAPACITY);
    }
    assert_eq!(w.len(), WINDOW_CAPACITY);
    let ids: Vec<_> = w.iter().take(3).map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["24", "23", "22"]);
    assert_eq!(w.iter().last().map(|t| t.id.as_str()), Some("5"));
    assert_eq!(w.newest().map(|t| t.id.as_str()), Some("24"));
  }

  #[test]
  fn seed_counts() {
    let w = EventWindow::with_seed(seed::threats(0));
    assert_eq!(w.len(), 5);
    assert_eq!(w.active_count(), 1);
    assert_eq!(w.high_severity_count(), 2);
    // Derived counters are pure reads.
    assert_eq!(w.active_count(), w.active_count());
    assert_eq!(w.high_severity_count(), w.high_severity_count());
  }

  #[test]
  fn oversized_seed_keeps_newest() {
    let seed: Vec<_> = (0..30).map(|i| event(&i.to_string())).collect();
    let w = EventWindow::with_seed(seed);
    assert_eq!(w.len(), WINDOW_CAPACITY);
    assert_eq!(w.newest().map(|t| t.id.as_str()), Some("0"));
    assert_eq!(w.iter().last().map(|t| t.id.as_str()), Some("19"));
  }
}
