use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Timer<T> {
  deadline_unix_ms: u64,
  period_ms: Option<u64>,
  task: T,
}

// Cooperative timers on a virtual clock. Equal deadlines fire in arm order.
#[derive(Debug)]
pub struct Scheduler<T> {
  now_unix_ms: u64,
  next_id: u64,
  next_seq: u64,
  // (deadline, arm sequence, timer id). Cancelled ids are skipped lazily.
  queue: BinaryHeap<Reverse<(u64, u64, u64)>>,
  timers: HashMap<u64, Timer<T>>,
}

impl<T: Clone> Scheduler<T> {
  pub fn starting_at(now_unix_ms: u64) -> Self {
    Self {
      now_unix_ms,
      next_id: 0,
      next_seq: 0,
      queue: BinaryHeap::new(),
      timers: HashMap::new(),
    }
  }

  pub fn now_unix_ms(&self) -> u64 {
    self.now_unix_ms
  }

  pub fn schedule_once(&mut self, delay: Duration, task: T) -> TimerHandle {
    self.arm(duration_ms(delay), None, task)
  }

  pub fn schedule_every(&mut self, period: Duration, task: T) -> TimerHandle {
    let period_ms = duration_ms(period).max(1);
    self.arm(period_ms, Some(period_ms), task)
  }

  pub fn cancel(&mut self, handle: TimerHandle) -> bool {
    self.timers.remove(&handle.0).is_some()
  }

  #[cfg(test)]
  fn is_pending(&self, handle: TimerHandle) -> bool {
    self.timers.contains_key(&handle.0)
  }

  #[cfg(test)]
  fn pending(&self) -> usize {
    self.timers.len()
  }

  #[cfg(test)]
  fn next_deadline(&mut self) -> Option<u64> {
    self.discard_cancelled();
    self.queue.peek().map(|Reverse((deadline, _, _))| *deadline)
  }

  pub fn pop_due(&mut self, until_unix_ms: u64) -> Option<(TimerHandle, T)> {
    self.discard_cancelled();
    let Reverse((deadline, _, id)) = *self.queue.peek()?;
    if deadline > until_unix_ms {
      return None;
    }
    self.queue.pop();

    self.now_unix_ms = self.now_unix_ms.max(deadline);
    let handle = TimerHandle(id);

    let timer = self.timers.get_mut(&id)?;
    match timer.period_ms {
      Some(period_ms) => {
        timer.deadline_unix_ms = deadline.saturating_add(period_ms);
        let next = timer.deadline_unix_ms;
        let task = timer.task.clone();
        self.push(next, id);
        Some((handle, task))
      }
      None => self.timers.remove(&id).map(|t| (handle, t.task)),
    }
  }

  // Never moves the clock back.
  pub fn advance_to(&mut self, unix_ms: u64) {
    self.now_unix_ms = self.now_unix_ms.max(unix_ms);
  }

  fn arm(&mut self, delay_ms: u64, period_ms: Option<u64>, task: T) -> TimerHandle {
    let id = self.next_id;
    self.next_id += 1;

    let deadline_unix_ms = self.now_unix_ms.saturating_add(delay_ms);
    self.timers.insert(
      id,
      Timer {
        deadline_unix_ms,
        period_ms,
        task,
      },
    );
    self.push(deadline_unix_ms, id);
    TimerHandle(id)
  }

  fn push(&mut self, deadline: u64, id: u64) {
    let seq = self.next_seq;
    self.next_seq += 1;
    self.queue.push(Reverse((deadline, seq, id)));
  }

  fn discard_cancelled(&mut self) {
    while let Some(Reverse((deadline, _, id))) = self.queue.peek() {
      let live = self
        .timers
        .get(id)
        .map(|t| t.deadline_unix_ms == *deadline)
        .unwrap_or(false);
      if live {
        break;
      }
      self.queue.pop();
    }
  }
}

fn duration_ms(d: Duration) -> u64 {
  u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
  use super::*;

  const START: u64 = 1_700_000_000_000;

  fn drain(s: &mut Scheduler<&'static str>, until: u64) -> Vec<(u64, &'static str)> {
    let mut out = Vec::new();
    while let Some((_, task)) = s.pop_due(until) {
      out.push((s.now_unix_ms(), task));
    }
    s.advance_to(until);
    out
  }

  #[test]
  fn one_shot_fires_once_at_deadline() {
    let mut s = Scheduler::starting_at(START);
    let h = s.schedule_once(Duration::from_secs(3), "scan");
    assert!(drain(&mut s, START + 2_999).is_empty());
    assert_eq!(drain(&mut s, START + 3_000), vec![(START + 3_000, "scan")]);
    assert!(!s.is_pending(h));
    assert!(drain(&mut s, START + 60_000).is_empty());
  }

  #[test]
  fn periodic_rearms_each_period() {
    let mut s = Scheduler::starting_at(START);
    s.schedule_every(Duration::from_secs(10), "tick");
    let fired = drain(&mut s, START + 35_000);
    assert_eq!(
      fired,
      vec![
        (START + 10_000, "tick"),
        (START + 20_000, "tick"),
        (START + 30_000, "tick"),
      ]
    );
    assert_eq!(s.now_unix_ms(), START + 35_000);
    assert_eq!(s.next_deadline(), Some(START + 40_000));
  }

  #[test]
  fn cancel_stops_pending_timers() {
    let mut s = Scheduler::starting_at(START);
    let tick = s.schedule_every(Duration::from_secs(10), "tick");
    let scan = s.schedule_once(Duration::from_secs(3), "scan");
    assert_eq!(s.pending(), 2);

    assert!(s.cancel(tick));
    assert!(s.cancel(scan));
    assert!(!s.cancel(scan));
    assert_eq!(s.pending(), 0);
    assert!(drain(&mut s, START + 100_000).is_empty());
    assert_eq!(s.next_deadline(), None);
  }

  #[test]
  fn equal_deadlines_fire_in_arm_order() {
    let mut s = Scheduler::starting_at(START);
    s.schedule_once(Duration::from_secs(1), "a");
    s.schedule_once(Duration::from_secs(1), "b");
    s.schedule_once(Duration::from_millis(500), "c");
    let order: Vec<_> = drain(&mut s, START + 1_000)
      .into_iter()
      .map(|(_, t)| t)
      .collect();
    assert_eq!(order, vec!["c", "a", "b"]);
  }

  #[test]
  fn clock_never_moves_backwards() {
    let mut s: Scheduler<&'static str> = Scheduler::starting_at(START);
    s.advance_to(START + 5_000);
    s.advance_to(START);
    assert_eq!(s.now_unix_ms(), START + 5_000);
  }
}
